//! Steps driven by flags in a field's tag (`name,flag1,flag2`).

use structmap::{BoxError, FieldPart, Mutation};
use tracing::trace;

use crate::BehaviorError;

pub const REQUIRED: &str = "required";
pub const NO_EMBEDDED: &str = "noembedded";
pub const SKIP: &str = "skip";

fn has_flag(field: &FieldPart, key: &str, flag: &str) -> bool {
    field.tag(key).is_some_and(|tag| tag.has_flag(flag))
}

/// Fails with [`BehaviorError::Required`] when a field flagged `required`
/// has no value (absent or null). Place it after any default step.
#[derive(Debug, Clone)]
pub struct Required {
    key: String,
}

pub fn required(key: impl Into<String>) -> Required {
    Required { key: key.into() }
}

impl Mutation for Required {
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError> {
        if has_flag(field, &self.key, REQUIRED) && !field.has_value() {
            return Err(Box::new(BehaviorError::Required {
                field: field.name.clone(),
            }));
        }
        Ok(())
    }
}

/// Makes a member flagged `noembedded` read its own sub-mapping instead of
/// sharing the parent's keys.
#[derive(Debug, Clone)]
pub struct NoEmbedded {
    key: String,
}

pub fn no_embedded(key: impl Into<String>) -> NoEmbedded {
    NoEmbedded { key: key.into() }
}

impl Mutation for NoEmbedded {
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError> {
        if field.embedded && has_flag(field, &self.key, NO_EMBEDDED) {
            trace!(field = field.ident(), "embedding disabled");
            field.embedded = false;
        }
        Ok(())
    }
}

/// Skips fields tagged `-` or flagged `skip`.
#[derive(Debug, Clone)]
pub struct Skip {
    key: String,
}

pub fn skip(key: impl Into<String>) -> Skip {
    Skip { key: key.into() }
}

impl Mutation for Skip {
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError> {
        if let Some(tag) = field.tag(&self.key) {
            if tag.name == "-" || tag.has_flag(SKIP) {
                field.skip = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structmap::{Tags, Type, Value};

    fn tagged(raw: &str, embedded: bool) -> FieldPart {
        FieldPart::new("field", Type::String, Tags::new().with("structmap", raw), embedded)
    }

    #[test]
    fn required_rejects_absent_and_null() {
        let step = required("structmap");
        let mut field = tagged("user,required", false);
        field.name = "user".into();
        let err = step.mutate(&mut field).unwrap_err();
        assert_eq!(err.to_string(), "field user is required");

        field.value = Some(Value::Null);
        assert!(step.mutate(&mut field).is_err());

        field.value = Some(Value::from(""));
        assert!(step.mutate(&mut field).is_ok());
    }

    #[test]
    fn required_ignores_unflagged_fields() {
        let mut field = tagged("user", false);
        assert!(required("structmap").mutate(&mut field).is_ok());
        let mut other_key = tagged("user,required", false);
        assert!(required("json").mutate(&mut other_key).is_ok());
    }

    #[test]
    fn no_embedded_clears_flag() {
        let mut field = tagged(",noembedded", true);
        no_embedded("structmap").mutate(&mut field).unwrap();
        assert!(!field.embedded);

        let mut kept = tagged("", true);
        no_embedded("structmap").mutate(&mut kept).unwrap();
        assert!(kept.embedded);
    }

    #[test]
    fn skip_on_dash_or_flag() {
        for raw in ["-", "name,skip"] {
            let mut field = tagged(raw, false);
            skip("structmap").mutate(&mut field).unwrap();
            assert!(field.skip, "{raw}");
        }
        let mut field = tagged("name", false);
        skip("structmap").mutate(&mut field).unwrap();
        assert!(!field.skip);
    }
}
