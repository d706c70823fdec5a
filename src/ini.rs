//! A minimal INI reader tuned to the EditorConfig dialect: `[header]`
//! sections, `key = value` / `key : value` declarations, `;`/`#` comments,
//! and a handful of silent-skip leniencies the reference implementation
//! relies on.

use crate::error::Error;
use std::path::{Path, PathBuf};

/// Length past which a line (or, separately, a section name) is skipped
/// rather than parsed, matching reference behavior.
const MAX_LINE_LENGTH: usize = 1024;

#[derive(Debug, Clone)]
pub(crate) struct Section {
    pub(crate) header: String,
    pub(crate) declarations: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ConfigFile {
    pub(crate) root: bool,
    pub(crate) sections: Vec<Section>,
}

/// Reads and parses `path`. A missing or unreadable file yields an empty,
/// non-root config rather than an error, per spec.md's non-error list.
pub(crate) fn read(path: &Path) -> Result<ConfigFile, Error> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return Ok(ConfigFile::default()),
    };
    let text = decode(&bytes);
    parse(&text, path)
}

fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

fn parse(text: &str, path: &Path) -> Result<ConfigFile, Error> {
    let mut file = ConfigFile::default();
    let mut current: Option<Section> = None;

    for (lineno, raw_line) in text.lines().enumerate() {
        let line_no = lineno + 1;
        let line = raw_line.trim_end_matches('\r');

        if line.len() > MAX_LINE_LENGTH {
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            if let Some(header) = parse_header(rest, path, line_no)? {
                if let Some(section) = current.take() {
                    file.sections.push(section);
                }
                current = Some(Section { header, declarations: Vec::new() });
            }
            continue;
        }

        let Some((key, value)) = split_declaration(trimmed) else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim().to_owned();

        match &mut current {
            Some(section) => {
                if let Some(slot) = section.declarations.iter_mut().find(|(k, _)| *k == key) {
                    slot.1 = value;
                } else {
                    section.declarations.push((key, value));
                }
            }
            None if key == "root" => {
                file.root = value.eq_ignore_ascii_case("true");
            }
            None => {}
        }
    }

    if let Some(section) = current.take() {
        file.sections.push(section);
    }

    Ok(file)
}

/// `rest` is everything after the opening `[`. Returns `None` for headers
/// over the length cap, which are skipped silently rather than rejected.
fn parse_header(rest: &str, path: &Path, line_no: usize) -> Result<Option<String>, Error> {
    let Some(end) = find_unescaped_close(rest) else {
        return Err(Error::Parse {
            path: owned(path),
            line: line_no,
            message: "section header is missing its closing ']'".to_owned(),
        });
    };
    let header = &rest[..end];
    if header.len() > MAX_LINE_LENGTH {
        return Ok(None);
    }
    Ok(Some(header.to_owned()))
}

fn find_unescaped_close(s: &str) -> Option<usize> {
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            ']' => return Some(char_index_to_byte(s, i)),
            _ => i += 1,
        }
    }
    None
}

fn char_index_to_byte(s: &str, char_index: usize) -> usize {
    s.char_indices().nth(char_index).map(|(b, _)| b).unwrap_or(s.len())
}

/// Splits on the first `=` or `:`, whichever comes first.
fn split_declaration(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(['=', ':'])?;
    Some((&line[..idx], &line[idx + 1..]))
}

fn owned(path: &Path) -> PathBuf {
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, text: &str) -> ConfigFile {
        parse(text, Path::new(path)).unwrap()
    }

    #[test]
    fn parses_root_declaration_case_insensitively() {
        let f = file("/a/.editorconfig", "ROOT = True\n[*]\nkey=val");
        assert!(f.root);
        assert_eq!(f.sections.len(), 1);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let f = file("/a/.editorconfig", "; comment\n\n# another\n[*]\n; in section\nk=v");
        assert_eq!(f.sections[0].declarations, [("k".to_owned(), "v".to_owned())]);
    }

    #[test]
    fn colon_and_equals_both_separate_declarations() {
        let f = file("/a/.editorconfig", "[*]\na = 1\nb : 2");
        assert_eq!(
            f.sections[0].declarations,
            [("a".to_owned(), "1".to_owned()), ("b".to_owned(), "2".to_owned())]
        );
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let f = file("/a/.editorconfig", "[*]\nk=1\nk=2");
        assert_eq!(f.sections[0].declarations, [("k".to_owned(), "2".to_owned())]);
    }

    #[test]
    fn keys_are_lowercased_headers_are_not() {
        let f = file("/a/.editorconfig", "[*.PY]\nIndent_Style=Tab");
        assert_eq!(f.sections[0].header, "*.PY");
        assert_eq!(f.sections[0].declarations[0].0, "indent_style");
    }

    #[test]
    fn unclosed_header_is_a_parse_error() {
        let err = parse("[unterminated\nk=v", Path::new("/a/.editorconfig")).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn overlong_line_is_skipped_not_errored() {
        let long_value = "x".repeat(2000);
        let text = format!("[*]\nk={long_value}\nm=ok");
        let f = file("/a/.editorconfig", &text);
        assert_eq!(f.sections[0].declarations, [("m".to_owned(), "ok".to_owned())]);
    }

    #[test]
    fn missing_file_yields_empty_non_root_config() {
        let f = read(Path::new("/does/not/exist/.editorconfig")).unwrap();
        assert!(!f.root);
        assert!(f.sections.is_empty());
    }

    #[test]
    fn declarations_before_any_section_only_affect_root() {
        let f = file("/a/.editorconfig", "root=true\nstray=value\n[*]\nk=v");
        assert!(f.root);
        assert_eq!(f.sections.len(), 1);
        assert_eq!(f.sections[0].declarations, [("k".to_owned(), "v".to_owned())]);
    }

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"[*]\nk=v");
        assert_eq!(decode(&bytes), "[*]\nk=v");
    }
}
