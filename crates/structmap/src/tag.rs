//! Field annotations.
//!
//! [`Tags`] is an ordered `key -> value` bag attached to each record field.
//! The engine never reads it; mutation steps do, usually through
//! [`TagValue::parse`], which splits a value of the form `name[,flag...]`.

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("malformed tag at byte {0}")]
    Malformed(usize),
    #[error("unterminated quoted value at byte {0}")]
    Unterminated(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(IndexMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value stored under `key`, split into name and flags.
    pub fn lookup(&self, key: &str) -> Option<TagValue<'_>> {
        self.get(key).map(TagValue::parse)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses a struct-tag string such as `structmap:"user,required" default:"15"`.
    pub fn parse(input: &str) -> Result<Self, TagError> {
        let bytes = input.as_bytes();
        let mut tags = Tags::new();
        let mut i = 0;
        loop {
            while i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
            if i >= bytes.len() {
                return Ok(tags);
            }

            let key_start = i;
            while i < bytes.len() && bytes[i] > b' ' && bytes[i] != b':' && bytes[i] != b'"' {
                i += 1;
            }
            if i == key_start || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
                return Err(TagError::Malformed(i));
            }
            let key = &input[key_start..i];
            i += 2;

            let mut value = String::new();
            let mut closed = false;
            while i < bytes.len() {
                match bytes[i] {
                    b'"' => {
                        closed = true;
                        i += 1;
                        break;
                    }
                    b'\\' if i + 1 < bytes.len() => {
                        let Some(escaped) = input[i + 1..].chars().next() else {
                            return Err(TagError::Malformed(i));
                        };
                        value.push(unescape(escaped));
                        i += 1 + escaped.len_utf8();
                    }
                    _ => {
                        let ch_len = utf8_len(bytes[i]);
                        value.push_str(&input[i..i + ch_len]);
                        i += ch_len;
                    }
                }
            }
            if !closed {
                return Err(TagError::Unterminated(i));
            }
            tags.insert(key, value);
        }
    }
}

/// Control escapes are interpreted; any other escaped char stands for itself.
fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

fn utf8_len(first: u8) -> usize {
    match first {
        0xF0..=0xFF => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One tag value split as `name[,flag...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue<'a> {
    pub name: &'a str,
    pub flags: Vec<&'a str>,
}

impl<'a> TagValue<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let mut parts = raw.split(',');
        let name = parts.next().unwrap_or_default().trim();
        let flags = parts.map(str::trim).filter(|flag| !flag.is_empty()).collect();
        Self { name, flags }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| *f == flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_value_splits_name_and_flags() {
        let tag = TagValue::parse("user,required, omitempty");
        assert_eq!(tag.name, "user");
        assert_eq!(tag.flags, vec!["required", "omitempty"]);
        assert!(tag.has_flag("required"));
        assert!(!tag.has_flag("user"));

        let tag = TagValue::parse(",noembedded");
        assert_eq!(tag.name, "");
        assert!(tag.has_flag("noembedded"));

        let tag = TagValue::parse("");
        assert_eq!(tag.name, "");
        assert!(tag.flags.is_empty());
    }

    #[test]
    fn parses_struct_tag_syntax() {
        let tags = Tags::parse(r#"structmap:"user,required" default:"15""#).unwrap();
        assert_eq!(tags.get("structmap"), Some("user,required"));
        assert_eq!(tags.get("default"), Some("15"));
        assert_eq!(tags.lookup("structmap").unwrap().name, "user");
        assert_eq!(tags.get("json"), None);
    }

    #[test]
    fn parses_escapes_and_unicode() {
        let tags = Tags::parse(r#"a:"say \"hi\"" b:"naïve""#).unwrap();
        assert_eq!(tags.get("a"), Some(r#"say "hi""#));
        assert_eq!(tags.get("b"), Some("naïve"));
    }

    #[test]
    fn escaped_multibyte_char_is_kept_whole() {
        let tags = Tags::parse("a:\"\\é\" b:\"x\\€y\"").unwrap();
        assert_eq!(tags.get("a"), Some("é"));
        assert_eq!(tags.get("b"), Some("x€y"));
    }

    #[test]
    fn control_escapes_are_interpreted() {
        let tags = Tags::parse(r#"a:"one\ntwo\tthree" b:"back\\slash""#).unwrap();
        assert_eq!(tags.get("a"), Some("one\ntwo\tthree"));
        assert_eq!(tags.get("b"), Some("back\\slash"));
    }

    #[test]
    fn rejects_malformed_tags() {
        assert_eq!(Tags::parse("structmap"), Err(TagError::Malformed(9)));
        assert!(matches!(Tags::parse(r#"a:"open"#), Err(TagError::Unterminated(_))));
        assert!(Tags::parse("").unwrap().is_empty());
    }

    #[test]
    fn builder_keeps_order() {
        let tags = Tags::new().with("json", "a").with("bson", "b");
        let keys: Vec<&str> = tags.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["json", "bson"]);
    }
}
