use crate::tag::{TagValue, Tags};
use crate::types::Type;
use crate::value::Value;

/// Per-field working state threaded through the mutation pipeline.
///
/// `name` starts empty. Right after the first mutation the decoder falls back
/// to [`FieldPart::ident`] if it is still empty and looks the name up in the
/// source mapping, filling `value` when the key exists.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPart {
    pub name: String,
    /// `None` while the key is absent from the source mapping.
    pub value: Option<Value>,
    pub ty: Type,
    pub tags: Tags,
    pub skip: bool,
    /// Read the member's fields from the parent mapping instead of from the
    /// member's own value. Only meaningful for record members.
    pub embedded: bool,
    ident: &'static str,
}

impl FieldPart {
    pub fn new(ident: &'static str, ty: Type, tags: Tags, embedded: bool) -> Self {
        Self {
            name: String::new(),
            value: None,
            ty,
            tags,
            skip: false,
            embedded,
            ident,
        }
    }

    /// Identifier the field was declared with.
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn tag(&self, key: &str) -> Option<TagValue<'_>> {
        self.tags.lookup(key)
    }

    /// Whether a non-null value is present.
    pub fn has_value(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unnamed_and_empty() {
        let part = FieldPart::new("age", Type::Bool, Tags::new(), false);
        assert!(part.name.is_empty());
        assert!(part.value.is_none());
        assert!(!part.skip);
        assert_eq!(part.ident(), "age");
    }

    #[test]
    fn null_is_not_a_value() {
        let mut part = FieldPart::new("age", Type::Bool, Tags::new(), false);
        part.value = Some(Value::Null);
        assert!(!part.has_value());
        part.value = Some(Value::from(true));
        assert!(part.has_value());
    }

    #[test]
    fn tag_lookup_parses() {
        let tags = Tags::new().with("structmap", "user,required");
        let part = FieldPart::new("username", Type::String, tags, false);
        let tag = part.tag("structmap").unwrap();
        assert_eq!(tag.name, "user");
        assert!(tag.has_flag("required"));
        assert!(part.tag("json").is_none());
    }
}
