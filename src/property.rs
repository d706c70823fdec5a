//! The resolved property map and typed accessors for the EditorConfig
//! "Supported" properties.

/// Insertion-ordered map from lower-cased option name to its (canonicalized)
/// string value. Small and flat by construction: a resolved file typically
/// carries a handful of properties, so a `Vec` with linear scan beats a
/// hash table's bookkeeping overhead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap(Vec<(String, String)>);

impl PropertyMap {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts or overwrites `key`, preserving its original insertion
    /// position on overwrite.
    pub(crate) fn set(&mut self, key: &str, value: &str) {
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value.to_owned();
        } else {
            self.0.push((key.to_owned(), value.to_owned()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indent_style(&self) -> Option<IndentStyle> {
        self.get(keys::INDENT_STYLE).and_then(IndentStyle::parse)
    }

    pub fn indent_size(&self) -> Option<IndentSize> {
        self.get(keys::INDENT_SIZE).and_then(IndentSize::parse)
    }

    pub fn tab_width(&self) -> Option<u32> {
        self.get(keys::TAB_WIDTH).and_then(|v| v.parse().ok())
    }

    pub fn end_of_line(&self) -> Option<EndOfLine> {
        self.get(keys::END_OF_LINE).and_then(EndOfLine::parse)
    }

    pub fn charset(&self) -> Option<Charset> {
        self.get(keys::CHARSET).and_then(Charset::parse)
    }

    pub fn trim_trailing_whitespace(&self) -> Option<bool> {
        self.get(keys::TRIM_TRAILING_WHITESPACE).and_then(parse_bool)
    }

    pub fn insert_final_newline(&self) -> Option<bool> {
        self.get(keys::INSERT_FINAL_NEWLINE).and_then(parse_bool)
    }
}

/// Canonical option-name constants, shared with the resolver so the merge,
/// canonicalization, and validation steps all agree on spelling.
pub(crate) mod keys {
    pub(crate) const INDENT_STYLE: &str = "indent_style";
    pub(crate) const INDENT_SIZE: &str = "indent_size";
    pub(crate) const TAB_WIDTH: &str = "tab_width";
    pub(crate) const END_OF_LINE: &str = "end_of_line";
    pub(crate) const CHARSET: &str = "charset";
    pub(crate) const TRIM_TRAILING_WHITESPACE: &str = "trim_trailing_whitespace";
    pub(crate) const INSERT_FINAL_NEWLINE: &str = "insert_final_newline";

    /// Options canonicalization lower-cases, in the order spec.md lists them.
    pub(crate) const LOWERCASED: &[&str] = &[
        END_OF_LINE,
        INDENT_STYLE,
        INDENT_SIZE,
        INSERT_FINAL_NEWLINE,
        TRIM_TRAILING_WHITESPACE,
        CHARSET,
    ];
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

macro_rules! case_insensitive_enum {
    ($name:ident { $( $variant:ident => $text:literal ),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            fn parse(s: &str) -> Option<Self> {
                $( if s.eq_ignore_ascii_case($text) { return Some(Self::$variant); } )+
                None
            }
        }
    };
}

case_insensitive_enum!(IndentStyle { Tab => "tab", Space => "space" });
case_insensitive_enum!(EndOfLine { Lf => "lf", Cr => "cr", Crlf => "crlf" });
case_insensitive_enum!(Charset {
    Latin1 => "latin1",
    Utf8 => "utf-8",
    Utf8Bom => "utf-8-bom",
    Utf16Be => "utf-16be",
    Utf16Le => "utf-16le",
});

/// `indent_size` is either a column count or the literal `tab` (meaning
/// "use `tab_width`"), per spec.md's canonicalization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentSize {
    Tab,
    Columns(u32),
}

impl IndentSize {
    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("tab") {
            Some(Self::Tab)
        } else {
            s.parse().ok().map(Self::Columns)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_preserves_position() {
        let mut map = PropertyMap::new();
        map.set("a", "1");
        map.set("b", "2");
        map.set("a", "3");
        assert_eq!(map.iter().collect::<Vec<_>>(), [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn typed_getters_parse_known_values() {
        let mut map = PropertyMap::new();
        map.set("indent_style", "tab");
        map.set("indent_size", "tab");
        map.set("trim_trailing_whitespace", "true");
        assert_eq!(map.indent_style(), Some(IndentStyle::Tab));
        assert_eq!(map.indent_size(), Some(IndentSize::Tab));
        assert_eq!(map.trim_trailing_whitespace(), Some(true));
    }
}
