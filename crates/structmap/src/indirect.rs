//! Helpers that see through chains of indirection.

use crate::error::StoreError;
use crate::record::Record;
use crate::target::Target;
use crate::types::{Kind, Type};
use crate::value::Value;

/// Innermost non-indirection type.
pub fn resolve_type(ty: &Type) -> &Type {
    match ty {
        Type::Ptr(inner) => resolve_type(inner),
        other => other,
    }
}

/// Innermost non-indirection value. With `unwrap_dynamic`, [`Value::Any`]
/// layers are stripped as well.
pub fn resolve_value(value: &Value, unwrap_dynamic: bool) -> &Value {
    match value {
        Value::Ptr(inner) => resolve_value(inner, unwrap_dynamic),
        Value::Any(inner) if unwrap_dynamic => resolve_value(inner, unwrap_dynamic),
        other => other,
    }
}

/// Stores `value` in the innermost slot behind `target`, reusing layers that
/// are already allocated and allocating the missing ones.
///
/// `Value::Null` is stored in the outermost slot, which clears it when it is
/// optional.
pub fn assign_through(target: &mut dyn Target, value: Value) -> Result<(), StoreError> {
    if value.is_null() || target.declared_type().kind() != Kind::Indirection {
        return target.store(value);
    }
    match target.elem_mut() {
        Some(inner) => assign_through(inner, value),
        None => Err(StoreError::new(&value, target.declared_type())),
    }
}

/// Record write handle behind `target`, allocating through indirection.
pub fn record_through(target: &mut dyn Target) -> Option<&mut dyn Record> {
    if target.declared_type().kind() == Kind::Indirection {
        record_through(target.elem_mut()?)
    } else {
        target.as_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumberType;

    #[test]
    fn resolve_type_strips_every_layer() {
        let ty = Type::ptr(Type::ptr(Type::ptr(Type::String)));
        assert_eq!(resolve_type(&ty), &Type::String);
        let ty = Type::seq(Type::ptr(Type::Bool));
        assert_eq!(resolve_type(&ty), &ty);
    }

    #[test]
    fn resolve_value_respects_dynamic_flag() {
        let value = Value::ptr(Value::any(Value::ptr("A")));
        assert_eq!(resolve_value(&value, true), &Value::from("A"));
        assert_eq!(resolve_value(&value, false), &Value::any(Value::ptr("A")));
        assert_eq!(resolve_value(&Value::Null, true), &Value::Null);
    }

    #[test]
    fn assign_through_three_layers() {
        let mut slot: Option<Option<Option<String>>> = None;
        assign_through(&mut slot, Value::from("A")).unwrap();
        assert_eq!(slot, Some(Some(Some("A".to_string()))));
    }

    #[test]
    fn assign_through_reuses_allocated_layers() {
        let mut slot: Option<Box<Option<i64>>> = Some(Box::new(Some(1)));
        let before: *const Option<i64> = slot.as_deref().unwrap();
        assign_through(&mut slot, Value::from(2i64)).unwrap();
        let after: *const Option<i64> = slot.as_deref().unwrap();
        assert_eq!(before, after);
        assert_eq!(slot, Some(Box::new(Some(2))));
    }

    #[test]
    fn assign_through_plain_slot() {
        let mut slot = 0u16;
        assign_through(&mut slot, Value::from(7u16)).unwrap();
        assert_eq!(slot, 7);
        let err = assign_through(&mut slot, Value::from("7")).unwrap_err();
        assert_eq!(err.expected, Type::Number(NumberType::U16));
    }

    #[test]
    fn assign_null_clears_outer_layer() {
        let mut slot: Option<Option<u8>> = Some(Some(3));
        assign_through(&mut slot, Value::Null).unwrap();
        assert_eq!(slot, None);
    }

    #[test]
    fn record_through_non_record_is_none() {
        let mut slot: Option<String> = None;
        assert!(record_through(&mut slot).is_none());
    }
}
