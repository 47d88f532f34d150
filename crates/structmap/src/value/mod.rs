//! Dynamically-typed source values.
//!
//! Every value read from a [`Mapping`] is a [`Value`]: a tagged union whose
//! tag is inspected at runtime by the decoder and by the cast steps.

mod de;
mod mapping;
mod number;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use mapping::Mapping;
pub use number::{Number, NumberType};

use crate::types::{Kind, OpaqueType};

/// A dynamically-typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value (`null`, a nil pointer, an empty option).
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Seq(Vec<Value>),
    Map(Mapping),
    /// A reference to another value.
    Ptr(Box<Value>),
    /// A value held behind a dynamically-typed slot.
    Any(Box<Value>),
    /// An arbitrary Rust value, only assignable to a field of the same type.
    Opaque(Opaque),
}

impl Value {
    pub fn ptr(value: impl Into<Value>) -> Self {
        Value::Ptr(Box::new(value.into()))
    }

    pub fn any(value: impl Into<Value>) -> Self {
        Value::Any(Box::new(value.into()))
    }

    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Opaque::new(value))
    }

    /// Structural kind, `None` for [`Value::Null`].
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Value::Null => None,
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Opaque(_) => {
                Some(Kind::Scalar)
            }
            Value::Seq(_) => Some(Kind::Sequence),
            Value::Map(_) => Some(Kind::Mapping),
            Value::Ptr(_) | Value::Any(_) => Some(Kind::Indirection),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human readable runtime type, used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Number(n) => n.number_type().name().to_string(),
            Value::String(_) => "String".to_string(),
            Value::Seq(_) => "Vec<Value>".to_string(),
            Value::Map(_) => "Mapping".to_string(),
            Value::Ptr(inner) => format!("Ptr<{}>", inner.type_name()),
            Value::Any(inner) => format!("Any<{}>", inner.type_name()),
            Value::Opaque(opaque) => opaque.type_name().to_string(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integral numbers that fit an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number()?.as_i128().and_then(|n| i64::try_from(n).ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(|n| n.as_f64())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Type-erased Rust value stored in [`Value::Opaque`].
#[derive(Clone)]
pub struct Opaque {
    ty: OpaqueType,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            ty: OpaqueType::of::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn opaque_type(&self) -> OpaqueType {
        self.ty
    }

    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.ty.name()).finish()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

macro_rules! value_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

value_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(json_number(&n)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(Mapping::from(map)),
        }
    }
}

fn json_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::I64(i)
    } else if let Some(u) = n.as_u64() {
        Number::U64(u)
    } else {
        Number::F64(n.as_f64().unwrap_or(f64::NAN))
    }
}
