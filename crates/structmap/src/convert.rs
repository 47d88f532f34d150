//! Strict conversion applied by the decoder before assignment.
//!
//! Only shape-preserving conversions are attempted here: numeric width
//! changes that keep the value exact, and element-wise conversion of
//! sequences and maps. Lenient conversions (string to number and so on) are
//! the job of a cast mutation.

use crate::indirect::resolve_value;
use crate::types::Type;
use crate::value::{Mapping, Value};

/// Converts a resolved, non-null `value` to the shape of `to`.
pub(crate) fn convert(value: &Value, to: &Type) -> Option<Value> {
    match (to, value) {
        (Type::Dynamic, v) => Some(v.clone()),
        (Type::Ptr(inner), v) => convert(v, inner),
        (Type::Bool, Value::Bool(b)) => Some(Value::Bool(*b)),
        (Type::String, Value::String(s)) => Some(Value::String(s.clone())),
        (Type::Number(ty), Value::Number(n)) => n.to_type(*ty).map(Value::Number),
        (Type::Seq(elem), Value::Seq(items)) => convert_items(items, elem).map(Value::Seq),
        (Type::Array(elem, len), Value::Seq(items)) if items.len() == *len => {
            convert_items(items, elem).map(Value::Seq)
        }
        (Type::Map(elem), Value::Map(entries)) => entries
            .iter()
            .map(|(key, item)| convert_element(item, elem).map(|v| (key.clone(), v)))
            .collect::<Option<Mapping>>()
            .map(Value::Map),
        (Type::Opaque(ty), Value::Opaque(opaque)) if opaque.opaque_type() == *ty => {
            Some(Value::Opaque(opaque.clone()))
        }
        _ => None,
    }
}

fn convert_items(items: &[Value], elem: &Type) -> Option<Vec<Value>> {
    items.iter().map(|item| convert_element(item, elem)).collect()
}

fn convert_element(item: &Value, elem: &Type) -> Option<Value> {
    let item = resolve_value(item, true);
    if item.is_null() {
        return matches!(elem, Type::Ptr(_) | Type::Dynamic).then_some(Value::Null);
    }
    convert(item, elem)
}
