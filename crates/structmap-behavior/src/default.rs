//! Fallback values for keys missing from the source mapping or set to null.

use structmap::{BoxError, FieldPart, Mutation, Value};

/// Fills an absent or null value with the name part of the field's `key`
/// tag, as a string. Follow it with a cast step when the field is not a
/// string.
#[derive(Debug, Clone)]
pub struct FromTag {
    key: String,
}

pub fn from_tag(key: impl Into<String>) -> FromTag {
    FromTag { key: key.into() }
}

impl Mutation for FromTag {
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError> {
        if field.has_value() {
            return Ok(());
        }
        let value = match field.tag(&self.key) {
            Some(tag) if !tag.name.is_empty() => Value::from(tag.name),
            _ => return Ok(()),
        };
        field.value = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structmap::{Tags, Type};

    #[test]
    fn fills_only_absent_values() {
        let tags = Tags::new().with("default", "15");
        let mut absent = FieldPart::new("age", Type::String, tags.clone(), false);
        from_tag("default").mutate(&mut absent).unwrap();
        assert_eq!(absent.value, Some(Value::from("15")));

        let mut present = FieldPart::new("age", Type::String, tags, false);
        present.value = Some(Value::from("18"));
        from_tag("default").mutate(&mut present).unwrap();
        assert_eq!(present.value, Some(Value::from("18")));
    }

    #[test]
    fn null_is_replaced() {
        let mut field = FieldPart::new("age", Type::String, Tags::new().with("default", "1"), false);
        field.value = Some(Value::Null);
        from_tag("default").mutate(&mut field).unwrap();
        assert_eq!(field.value, Some(Value::from("1")));
    }

    #[test]
    fn empty_default_is_ignored() {
        let mut field = FieldPart::new("age", Type::String, Tags::new().with("default", ""), false);
        from_tag("default").mutate(&mut field).unwrap();
        assert!(field.value.is_none());
    }
}
