//! Lenient conversion of a field's value into the shape of its type.
//!
//! The decoder only performs exact conversions. [`ToType`] runs earlier, as
//! a pipeline step, and bridges the usual gaps between loosely typed input
//! (environment variables, query strings, YAML) and the record:
//!
//! | from \ to | bool | number | String |
//! |-----------|------|--------|--------|
//! | bool      | =    | 0 / 1  | `"true"` / `"false"` |
//! | number    | != 0 | checked width | decimal |
//! | String    | `true`, `1`, `t`, ... | parsed | = |
//!
//! Sequences, fixed arrays and maps are cast element by element. Opaque
//! targets go through the [`Casters`] registered for their Rust type.

mod casters;

use structmap::{
    resolve_type, resolve_value, BoxError, FieldPart, Kind, Mapping, Mutation, Number, NumberType,
    Type, Value,
};
use thiserror::Error;
use tracing::trace;

use crate::BehaviorError;

pub use casters::Casters;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CastError {
    #[error("no conversion from {from} to {to}")]
    NoConvertible { from: String, to: String },
    #[error("cannot parse {input:?} as {to}")]
    Parse { input: String, to: String },
    #[error("{value} does not fit in {to}")]
    OutOfRange { value: String, to: String },
    #[error("expected {expected} elements, found {found}")]
    Length { expected: usize, found: usize },
    #[error("{0}")]
    Custom(String),
}

impl CastError {
    pub fn no_convertible(from: &Value, to: &Type) -> Self {
        CastError::NoConvertible {
            from: from.type_name(),
            to: to.to_string(),
        }
    }

    pub fn custom(message: impl std::fmt::Display) -> Self {
        CastError::Custom(message.to_string())
    }
}

/// Casts `value` to the shape of `to`.
///
/// Indirection on either side is resolved first; a null value stays null.
/// Record types are returned unchanged, the decoder walks them itself.
pub fn cast(value: &Value, to: &Type, casters: &Casters) -> Result<Value, CastError> {
    let value = resolve_value(value, true);
    if value.is_null() {
        return Ok(Value::Null);
    }
    match to {
        Type::Dynamic | Type::Record(_) => Ok(value.clone()),
        Type::Ptr(inner) => cast(value, inner, casters),
        Type::Bool => to_bool(value).map(Value::Bool),
        Type::String => to_string(value).map(Value::String),
        Type::Number(ty) => to_number(value, *ty).map(Value::Number),
        Type::Seq(elem) => match value {
            Value::Seq(items) => cast_items(items, elem, casters).map(Value::Seq),
            other => Err(CastError::no_convertible(other, to)),
        },
        Type::Array(elem, len) => match value {
            Value::Seq(items) if items.len() == *len => {
                cast_items(items, elem, casters).map(Value::Seq)
            }
            Value::Seq(items) => Err(CastError::Length {
                expected: *len,
                found: items.len(),
            }),
            other => Err(CastError::no_convertible(other, to)),
        },
        Type::Map(elem) => match value {
            Value::Map(entries) => entries
                .iter()
                .map(|(key, item)| cast_element(item, elem, casters).map(|v| (key.clone(), v)))
                .collect::<Result<Mapping, _>>()
                .map(Value::Map),
            other => Err(CastError::no_convertible(other, to)),
        },
        Type::Opaque(ty) => match value {
            Value::Opaque(opaque) if opaque.opaque_type() == *ty => Ok(value.clone()),
            other => casters
                .cast(*ty, other)
                .unwrap_or_else(|| Err(CastError::no_convertible(other, to))),
        },
    }
}

fn cast_items(items: &[Value], elem: &Type, casters: &Casters) -> Result<Vec<Value>, CastError> {
    items.iter().map(|item| cast_element(item, elem, casters)).collect()
}

fn cast_element(item: &Value, elem: &Type, casters: &Casters) -> Result<Value, CastError> {
    let item = resolve_value(item, true);
    if item.is_null() && !matches!(elem, Type::Ptr(_) | Type::Dynamic) {
        return Err(CastError::no_convertible(item, elem));
    }
    cast(item, elem, casters)
}

fn to_bool(value: &Value) -> Result<bool, CastError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if !n.as_f64().is_finite() => Err(CastError::OutOfRange {
            value: n.to_string(),
            to: Type::Bool.to_string(),
        }),
        Value::Number(n) => Ok(n.as_f64() != 0.0),
        Value::String(s) => parse_bool(s).ok_or_else(|| CastError::Parse {
            input: s.clone(),
            to: Type::Bool.to_string(),
        }),
        other => Err(CastError::no_convertible(other, &Type::Bool)),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn to_string(value: &Value) -> Result<String, CastError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(CastError::no_convertible(other, &Type::String)),
    }
}

fn to_number(value: &Value, ty: NumberType) -> Result<Number, CastError> {
    let out_of_range = |value: String| CastError::OutOfRange {
        value,
        to: ty.to_string(),
    };
    match value {
        Value::Number(n) => n.to_type(ty).ok_or_else(|| out_of_range(n.to_string())),
        Value::Bool(b) => {
            Number::from_i128(i128::from(*b), ty).ok_or_else(|| out_of_range(b.to_string()))
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<i128>() {
                return Number::from_i128(n, ty).ok_or_else(|| out_of_range(s.clone()));
            }
            match trimmed.parse::<f64>() {
                Ok(f) => Number::from_f64(f, ty).ok_or_else(|| out_of_range(s.clone())),
                Err(_) => Err(CastError::Parse {
                    input: s.clone(),
                    to: ty.to_string(),
                }),
            }
        }
        other => Err(CastError::no_convertible(other, &Type::Number(ty))),
    }
}

/// Pipeline step casting each field's value with [`cast`]. Fields holding
/// records and fields without a value are left alone.
#[derive(Debug, Clone, Default)]
pub struct ToType {
    casters: Casters,
}

pub fn to_type() -> ToType {
    ToType::default()
}

pub fn to_type_with(casters: Casters) -> ToType {
    ToType { casters }
}

impl Mutation for ToType {
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError> {
        if resolve_type(&field.ty).kind() == Kind::Aggregate {
            return Ok(());
        }
        let Some(value) = field.value.as_ref() else {
            return Ok(());
        };
        match cast(value, &field.ty, &self.casters) {
            Ok(converted) => {
                trace!(field = field.ident(), ty = %field.ty, "cast");
                field.value = Some(converted);
                Ok(())
            }
            Err(source) => Err(Box::new(BehaviorError::Cast {
                field: field.name.clone(),
                source,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(value: impl Into<Value>, to: &Type) -> Result<Value, CastError> {
        cast(&value.into(), to, &Casters::new())
    }

    const I32: Type = Type::Number(NumberType::I32);

    #[test]
    fn strings_to_numbers() {
        assert_eq!(plain("1832", &I32), Ok(Value::from(1832i32)));
        assert_eq!(plain(" 7 ", &I32), Ok(Value::from(7i32)));
        assert_eq!(
            plain("2.5", &Type::Number(NumberType::F32)),
            Ok(Value::from(2.5f32))
        );
        assert_eq!(plain("2.0", &I32), Ok(Value::from(2i32)));
        assert!(matches!(plain("2.5", &I32), Err(CastError::OutOfRange { .. })));
        assert!(matches!(plain("abc", &I32), Err(CastError::Parse { .. })));
        assert!(matches!(
            plain("-1", &Type::Number(NumberType::U8)),
            Err(CastError::OutOfRange { .. })
        ));
    }

    #[test]
    fn bools_and_numbers() {
        assert_eq!(plain(1, &Type::Bool), Ok(Value::Bool(true)));
        assert_eq!(plain(0.0, &Type::Bool), Ok(Value::Bool(false)));
        assert_eq!(plain(true, &Type::Number(NumberType::U32)), Ok(Value::from(1u32)));
        assert_eq!(plain(false, &Type::Number(NumberType::F32)), Ok(Value::from(0f32)));
        assert_eq!(plain("T", &Type::Bool), Ok(Value::Bool(true)));
        assert!(matches!(plain("yes", &Type::Bool), Err(CastError::Parse { .. })));
    }

    #[test]
    fn non_finite_numbers_are_not_bools() {
        assert!(matches!(plain(f64::NAN, &Type::Bool), Err(CastError::OutOfRange { .. })));
        assert!(matches!(
            plain(f32::NEG_INFINITY, &Type::Bool),
            Err(CastError::OutOfRange { .. })
        ));
    }

    #[test]
    fn f32_overflow_is_out_of_range() {
        let f32_ty = Type::Number(NumberType::F32);
        assert!(matches!(plain(1e300, &f32_ty), Err(CastError::OutOfRange { .. })));
        assert!(matches!(plain("-1e300", &f32_ty), Err(CastError::OutOfRange { .. })));
        assert_eq!(plain("1e30", &f32_ty), Ok(Value::from(1e30f64 as f32)));
    }

    #[test]
    fn scalars_to_string() {
        assert_eq!(plain(0, &Type::String), Ok(Value::from("0")));
        assert_eq!(plain(20.5, &Type::String), Ok(Value::from("20.5")));
        assert_eq!(plain(true, &Type::String), Ok(Value::from("true")));
        assert_eq!(
            plain(vec![1], &Type::String),
            Err(CastError::NoConvertible {
                from: "Vec<Value>".into(),
                to: "String".into()
            })
        );
    }

    #[test]
    fn through_indirection() {
        let nested = Value::ptr(Value::ptr(0));
        let ty = Type::seq(Type::ptr(Type::String));
        assert_eq!(
            plain(vec![nested, Value::Null], &ty),
            Ok(Value::Seq(vec![Value::from("0"), Value::Null]))
        );
        assert_eq!(plain(Value::Null, &Type::String), Ok(Value::Null));
    }

    #[test]
    fn null_element_needs_optional_slot() {
        let ty = Type::seq(Type::String);
        assert!(matches!(
            plain(vec![Value::Null], &ty),
            Err(CastError::NoConvertible { .. })
        ));
    }

    #[test]
    fn arrays_check_length() {
        let ty = Type::array(Type::Number(NumberType::I64), 3);
        assert!(plain(vec!["1", "2", "3"], &ty).is_ok());
        assert_eq!(
            plain(vec![1, 2], &ty),
            Err(CastError::Length {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn map_values() {
        let from: Mapping = [("1", "2"), ("2", "1")].into_iter().collect();
        let ty = Type::map(Type::ptr(I32));
        let expected: Mapping = [("1", 2i32), ("2", 1i32)].into_iter().collect();
        assert_eq!(plain(from, &ty), Ok(Value::Map(expected)));
    }

    #[test]
    fn records_pass_through() {
        let from: Mapping = [("street", 1)].into_iter().collect();
        let value = Value::Map(from);
        assert_eq!(plain(value.clone(), &Type::Record("Address")), Ok(value));
    }

    #[test]
    fn step_reports_field_name() {
        let mut field = FieldPart::new("count", I32, Default::default(), false);
        field.name = "n".into();
        field.value = Some(Value::from("x"));
        let err = to_type().mutate(&mut field).unwrap_err();
        let err = err.downcast::<BehaviorError>().unwrap();
        assert!(matches!(*err, BehaviorError::Cast { ref field, .. } if field == "n"));

        let mut absent = FieldPart::new("count", I32, Default::default(), false);
        assert!(to_type().mutate(&mut absent).is_ok());
        assert!(absent.value.is_none());
    }
}
