//! The glob-to-regex compiler.
//!
//! Translates an EditorConfig section header (a shell-glob dialect with
//! `**`, brace alternation, numeric ranges, and path-aware `*`/`**`
//! semantics) into a [`regex::Regex`] anchored against a normalized absolute
//! path. Ported from the `doTranslate` pass of the upstream
//! editorconfig-core-py reference (`fnmatch.py`), generalized from a single
//! `fnmatch`-style translator into one that also bakes in the
//! EditorConfig-specific anchoring rule (floating vs. directory-anchored).
//!
//! The compiler never rejects a glob: unmatched bracket/brace openers
//! degrade to literals, matching the reference implementation's leniency.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use regex::Regex;

/// Characters that select "in braces" mode, where a bare `,` becomes the
/// alternation operator rather than a literal comma.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Default,
    InBraces,
}

type Cache = Mutex<HashMap<(String, String), Regex>>;

static CACHE: LazyLock<Cache> = LazyLock::new(|| Mutex::new(HashMap::new()));

/// Compiles `header` (the raw text of a `[header]` section, as found in the
/// configuration file located in `anchor_dir`) into a regex matching a
/// normalized absolute path.
///
/// Memoized process-wide, keyed by `(header, anchor_dir)`; the cache is
/// purely an optimization and is never observable from the result.
pub(crate) fn compile(anchor_dir: &str, header: &str) -> Regex {
    let key = (header.to_owned(), anchor_dir.to_owned());

    if let Some(re) = CACHE.lock().unwrap().get(&key) {
        return re.clone();
    }

    let re = compile_uncached(anchor_dir, header);
    CACHE.lock().unwrap().insert(key, re.clone());
    re
}

fn compile_uncached(anchor_dir: &str, header: &str) -> Regex {
    // A glob with no `/` is floating: it matches at any depth beneath the
    // declaring directory, which is equivalent to prepending `**/`. Folding
    // the anchor directory and the (possibly prefixed) header into a single
    // string before translating lets the `/**/ ` lookahead in `translate`
    // turn the seam between them into "zero or more path components",
    // exactly as it would for a `/**/ ` occurring inside a raw glob.
    let dir = anchor_dir.trim_end_matches('/');
    let floating = !has_top_level_separator(header);
    let combined = if floating {
        format!("{dir}/**/{header}")
    } else {
        // A leading `/` is the documented anchor to the config file's own
        // directory (e.g. `[/src/*.py]`); strip it before joining so the
        // seam stays a single `/` instead of doubling up.
        format!("{dir}/{}", header.strip_prefix('/').unwrap_or(header))
    };

    let chars: Vec<char> = combined.chars().collect();
    let body = translate(&chars, Mode::Default);
    let source = format!("^{body}$");

    Regex::new(&source).unwrap_or_else(|e| {
        log::warn!("glob {header:?} under {anchor_dir:?} compiled to an invalid regex ({e}); treating as non-matching");
        // A character class that can never be satisfied: matches nothing,
        // on any input, including the empty string.
        Regex::new(r"[^\s\S]").expect("static never-match pattern is valid")
    })
}

/// Whether `header` contains a `/` outside of any brace group.
fn has_top_level_separator(header: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = header.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Direct port of `doTranslate` from the Python reference: a single
/// left-to-right pass building a regex source fragment (no anchors, no
/// surrounding group) for `pat`.
fn translate(pat: &[char], mode: Mode) -> String {
    let length = pat.len();
    let mut index = 0;
    let mut regex = String::new();

    while index < length {
        let current = pat[index];
        index += 1;

        match current {
            '*' => {
                if index < length && pat[index] == '*' {
                    regex.push_str(".*");
                    index += 1;
                } else {
                    regex.push_str("[^/]*");
                }
            }
            '?' => regex.push('.'),
            '[' => match closing_bracket_index(pat, index, mode) {
                Some(pos) => {
                    regex.push('[');
                    regex.push_str(&character_class(pat, index, pos));
                    regex.push(']');
                    index = pos + 1;
                }
                None => regex.push_str("\\["),
            },
            '{' => {
                let (close, has_comma) = closing_brace_index(pat, index);
                match close {
                    Some(pos) => {
                        if !has_comma {
                            let inner = &pat[index..pos];
                            if let Some((lo, hi)) = numeric_range(inner) {
                                regex.push_str(&num_range_re(lo, hi));
                            } else {
                                let inner = translate(inner, Mode::Default);
                                regex.push_str(&format!("\\{{{inner}\\}}"));
                            }
                        } else {
                            let inner = translate(&pat[index..pos], Mode::InBraces);
                            regex.push_str(&format!("(?:{inner})"));
                        }
                        index = pos + 1;
                    }
                    None => regex.push_str("\\{"),
                }
            }
            ',' => {
                if mode == Mode::InBraces {
                    regex.push('|');
                } else {
                    regex.push_str("\\,");
                }
            }
            '/' => {
                if pat[index..].starts_with(&['*', '*', '/']) {
                    regex.push_str("(?:/|/.*/)");
                    index += 3;
                } else {
                    regex.push('/');
                }
            }
            '\\' => {
                let escaped = if index < length {
                    let c = pat[index];
                    index += 1;
                    c
                } else {
                    '\\'
                };
                regex.push_str(&regex::escape(&escaped.to_string()));
            }
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }

    regex
}

/// Characters that must be backslash-escaped to appear literally inside a
/// regex character class (`[...]`).
const CHARACTER_CLASS_SPECIAL: [char; 4] = ['^', '-', ']', '\\'];

fn character_class(pat: &[char], start: usize, end: usize) -> String {
    let mut index = start;
    let mut result = String::new();

    if index < end && (pat[index] == '!' || pat[index] == '^') {
        index += 1;
        result.push('^');
    }

    while index < end {
        match pat[index] {
            '\\' => {
                if index + 1 < end {
                    index += 1;
                    if CHARACTER_CLASS_SPECIAL.contains(&pat[index]) {
                        result.push('\\');
                    }
                    result.push(pat[index]);
                } else {
                    result.push_str("\\\\");
                }
            }
            '-' => result.push('-'),
            c => {
                if CHARACTER_CLASS_SPECIAL.contains(&c) {
                    result.push('\\');
                }
                result.push(c);
            }
        }
        index += 1;
    }

    result
}

/// Finds the index of the closing `]` for a class opened just before
/// `start`. Aborts (returns `None`, causing the `[` to be treated as a
/// literal) on an unescaped `/`, on a `,` while `mode` is `InBraces`, or on
/// reaching the end of input.
fn closing_bracket_index(pat: &[char], start: usize, mode: Mode) -> Option<usize> {
    let length = pat.len();
    let mut index = start;
    while index < length && pat[index] != ']' {
        if pat[index] == '/' {
            return None;
        }
        if pat[index] == ',' && mode == Mode::InBraces {
            return None;
        }
        if pat[index] == '\\' {
            index += 1;
        }
        index += 1;
    }
    (index < length).then_some(index)
}

/// Finds the index of the closing `}` for a brace group opened just before
/// `start`, tracking nested braces, and whether a top-level comma was seen
/// anywhere within. An unclosed nested group still contributes its commas
/// to `has_comma`, matching the reference's leniency.
fn closing_brace_index(pat: &[char], start: usize) -> (Option<usize>, bool) {
    let length = pat.len();
    let mut index = start;
    let mut has_comma = false;

    while index < length && pat[index] != '}' {
        match pat[index] {
            ',' => has_comma = true,
            '{' => {
                let (pos, inner_comma) = closing_brace_index(pat, index + 1);
                match pos {
                    Some(pos) => index = pos,
                    None => has_comma |= inner_comma,
                }
            }
            '\\' => index += 1,
            _ => {}
        }
        index += 1;
    }

    if index < length { (Some(index), has_comma) } else { (None, has_comma) }
}

/// If `inner` is exactly `<sign>?<digits>..<sign>?<digits>`, returns the two
/// endpoints together with their raw (sign- and zero-preserving) spellings.
fn numeric_range(inner: &[char]) -> Option<(NumEndpoint, NumEndpoint)> {
    let s: String = inner.iter().collect();
    let (lo, rest) = split_signed_int(&s)?;
    let rest = rest.strip_prefix("..")?;
    let (hi, rest) = split_signed_int(rest)?;
    if !rest.is_empty() {
        return None;
    }
    Some((lo, hi))
}

#[derive(Clone)]
struct NumEndpoint {
    value: i64,
    raw: String,
}

fn split_signed_int(s: &str) -> Option<(NumEndpoint, &str)> {
    let mut chars = s.char_indices();
    let mut end = 0;
    let mut saw_digit = false;

    if let Some((_, c)) = chars.clone().next()
        && (c == '+' || c == '-')
    {
        chars.next();
        end += c.len_utf8();
    }

    for (i, c) in chars {
        if c.is_ascii_digit() {
            saw_digit = true;
            end = i + c.len_utf8();
        } else {
            break;
        }
    }

    if !saw_digit {
        return None;
    }

    let raw = &s[..end];
    let value: i64 = raw.parse().ok()?;
    Some((NumEndpoint { value, raw: raw.to_owned() }, &s[end..]))
}

/// True if `raw`'s digits (sign aside) start with a `0` and there is at
/// least one more digit after it -- the "justified" zero-padding trigger.
fn has_leading_zero(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    digits.len() >= 2 && digits.starts_with('0')
}

/// `{m..n}` numeric range expansion, under the justified zero-padding
/// semantics (the only mode the EditorConfig spec ever exercises): if
/// either endpoint has a leading zero, every match is padded to the widest
/// endpoint's width; otherwise no padding is required.
fn num_range_re(lo: NumEndpoint, hi: NumEndpoint) -> String {
    let width: i64 = if has_leading_zero(&lo.raw) || has_leading_zero(&hi.raw) {
        let w = |raw: &str| raw.replace('+', "").chars().count() as i64;
        w(&lo.raw).max(w(&hi.raw))
    } else {
        -1
    };

    let mut start = lo.value.min(hi.value);
    let end = lo.value.max(hi.value);

    let mut neg_part = String::new();

    if start < 0 {
        let neg_start = if end < 0 { -end } else { 1 };
        let neg_end = -start;
        let mut neg_width = width;
        if end >= 0 {
            neg_width -= 1;
        }
        let inner = num_re(neg_width, neg_start, neg_end, "");
        neg_part = format!("\\-(?:{inner})");
        if end < 0 {
            return format!("(?:{neg_part})");
        }
        neg_part.push('|');
        start = 0;
    }

    let pos_part = num_re(width, start, end, "");
    format!("(?:{neg_part}{pos_part})")
}

fn digits(num: i64) -> u32 {
    let num = num.abs();
    if num < 10 {
        1
    } else if num < 100 {
        2
    } else if num < 1000 {
        3
    } else {
        let mut n = num / 1000;
        let mut d = 3;
        while n > 0 {
            n /= 10;
            d += 1;
        }
        d
    }
}

/// Builds a regex alternation matching every integer in `[min, max]`
/// (inclusive, both non-negative), zero-padded to `width` when `width > 0`,
/// followed by the literal `suffix`. Ported from `num_re`/`globRange2Re` in
/// the Python reference, which splits the interval along decade boundaries
/// so each segment can be expressed as a fixed-width prefix plus a small
/// digit class.
fn num_re(a_width: i64, min: i64, max: i64, suffix: &str) -> String {
    let width = if a_width > 0 { a_width as usize } else { 0 };
    let width10s = if a_width > 0 { (a_width - 1) as usize } else { 0 };

    if min == max {
        return format!("{min:0width$}{suffix}");
    }
    if min / 10 == max / 10 {
        return if min >= 10 || width10s > 0 {
            format!("{:0w$}[{}-{}]{suffix}", min / 10, min % 10, max % 10, w = width10s)
        } else {
            format!("[{}-{}]{suffix}", min % 10, max % 10)
        };
    }

    let mut re = String::new();
    let push = |re: &mut String, piece: String| {
        if !re.is_empty() {
            re.push('|');
        }
        re.push_str(&piece);
    };

    let mut new_min = if min == 0 || min % 10 != 0 {
        let boundary = (min / 10 + 1) * 10;
        push(&mut re, num_re(width as i64, min, boundary - 1, suffix));
        boundary
    } else {
        min
    };

    let mut new_suffix = format!("{suffix}[0-9]");
    let mut div: i64 = 1;
    while digits(new_min) < digits(max) {
        div *= 10;
        let next_min = 10i64.pow(digits(new_min));
        push(
            &mut re,
            num_re(
                width as i64 - digits(new_min) as i64 + 1,
                new_min / div,
                (next_min - 1) / div,
                &new_suffix,
            ),
        );
        new_min = next_min;
        new_suffix.push_str("[0-9]");
    }

    let mut div = 10i64.pow(digits(new_min) - 1);
    while div > 1 {
        let mut new_max = (max / div) * div;
        if new_max + div - 1 == max {
            new_max = max;
        }
        if new_min != new_max {
            let mut x = div;
            let mut nsuf = String::new();
            while x > 1 {
                nsuf.push_str("[0-9]");
                x /= 10;
            }
            push(
                &mut re,
                num_re(
                    width as i64 - digits(new_min) as i64 + 1,
                    new_min / div,
                    (new_max - 1) / div,
                    &nsuf,
                ),
            );
        }
        new_min = new_max;
        div /= 10;
    }

    if new_min < max {
        push(&mut re, num_re(width10s as i64, new_min / 10, max / 10, &format!("[0-{}]", max % 10)));
    } else if new_min % 10 != 9 {
        push(&mut re, max.to_string());
    }

    re
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(dir: &str, header: &str, path: &str) -> bool {
        compile_uncached(dir, header).is_match(path)
    }

    #[test]
    fn floating_glob_matches_any_depth() {
        assert!(matches("/a", "*.py", "/a/b/c.py"));
        assert!(matches("/a", "*.py", "/a/c.py"));
        assert!(!matches("/a", "*.py", "/other/c.py"));
    }

    #[test]
    fn anchored_glob_requires_subtree() {
        assert!(matches("/a/b", "src/*.rs", "/a/b/src/main.rs"));
        assert!(!matches("/a/b", "src/*.rs", "/a/src/main.rs"));
    }

    #[test]
    fn leading_slash_anchor_does_not_double_the_separator() {
        assert!(matches("/a", "/src/*.py", "/a/src/foo.py"));
        assert!(matches("/a", "/top.txt", "/a/top.txt"));
        assert!(!matches("/a", "/src/*.py", "/a/other/foo.py"));
    }

    #[test]
    fn double_star_crosses_directories() {
        assert!(matches("/r", "**/test/*.py", "/r/x/y/test/a.py"));
        assert!(matches("/r", "**/test/*.py", "/r/test/a.py"));
        assert!(!matches("/r", "**/test/*.py", "/r/test/a/b.py"));
    }

    #[test]
    fn brace_numeric_range() {
        assert!(matches("/p", "file{1..10}.txt", "/p/file7.txt"));
        assert!(matches("/p", "file{1..10}.txt", "/p/file10.txt"));
        assert!(!matches("/p", "file{1..10}.txt", "/p/file0.txt"));
        assert!(!matches("/p", "file{1..10}.txt", "/p/file11.txt"));
    }

    #[test]
    fn justified_zero_padded_range() {
        assert!(matches("/p", "log{01..10}.txt", "/p/log07.txt"));
        assert!(!matches("/p", "log{01..10}.txt", "/p/log7.txt"));
        assert!(matches("/p", "log{01..10}.txt", "/p/log10.txt"));
    }

    #[test]
    fn brace_alternation() {
        assert!(matches("/p", "*.{js,ts}", "/p/a.js"));
        assert!(matches("/p", "*.{js,ts}", "/p/a.ts"));
        assert!(!matches("/p", "*.{js,ts}", "/p/a.go"));
    }

    #[test]
    fn nested_brace_alternation() {
        assert!(matches("/p", "a{b,c{d,e}}.txt", "/p/acd.txt"));
        assert!(matches("/p", "a{b,c{d,e}}.txt", "/p/ace.txt"));
        assert!(matches("/p", "a{b,c{d,e}}.txt", "/p/ab.txt"));
        assert!(!matches("/p", "a{b,c{d,e}}.txt", "/p/af.txt"));
    }

    #[test]
    fn character_class_negation_and_escape() {
        assert!(matches("/p", "[!abc]oo.txt", "/p/foo.txt"));
        assert!(!matches("/p", "[!abc]oo.txt", "/p/aoo.txt"));
        assert!(matches("/p", "\\[a\\].txt", "/p/[a].txt"));
    }

    #[test]
    fn graceful_degradation_of_unclosed_class() {
        assert!(matches("/p", "foo[bar", "/p/foo[bar"));
        assert!(!matches("/p", "foo[bar", "/p/foobar"));
    }

    #[test]
    fn graceful_degradation_of_unclosed_brace() {
        assert!(matches("/p", "foo{bar", "/p/foo{bar"));
    }

    #[test]
    fn single_element_braces_are_literal() {
        assert!(matches("/p", "a{s1}b", "/p/a{s1}b"));
        assert!(!matches("/p", "a{s1}b", "/p/as1b"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        assert!(matches("/p", "fo?.txt", "/p/foo.txt"));
        assert!(!matches("/p", "fo?.txt", "/p/fo.txt"));
        assert!(!matches("/p", "fo?.txt", "/p/fooo.txt"));
    }

    #[test]
    fn star_does_not_cross_separator() {
        assert!(matches("/p", "a/*.txt", "/p/a/b.txt"));
        assert!(!matches("/p", "a/*.txt", "/p/a/b/c.txt"));
    }

    #[test]
    fn mixed_sign_range() {
        assert!(matches("/p", "v{-2..3}.txt", "/p/v-2.txt"));
        assert!(matches("/p", "v{-2..3}.txt", "/p/v0.txt"));
        assert!(matches("/p", "v{-2..3}.txt", "/p/v3.txt"));
        assert!(!matches("/p", "v{-2..3}.txt", "/p/v-3.txt"));
        assert!(!matches("/p", "v{-2..3}.txt", "/p/v4.txt"));
    }

    #[test]
    fn cache_returns_equivalent_regex() {
        let a = compile("/a", "*.py");
        let b = compile("/a", "*.py");
        assert_eq!(a.as_str(), b.as_str());
    }
}
