//! Write handles for record field slots.
//!
//! [`Target`] is implemented for every Rust type a record field may have.
//! The decoder converts a source [`Value`] into the exact shape reported by
//! [`Target::declared_type`] and then stores it through the handle.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, SystemTime};

use indexmap::IndexMap;

use crate::error::StoreError;
use crate::indirect::assign_through;
use crate::record::Record;
use crate::types::{NumberType, Type};
use crate::value::{Number, Value};

pub trait Target {
    /// Type shared by every value of `Self`.
    fn target_type() -> Type
    where
        Self: Sized;

    fn declared_type(&self) -> Type;

    /// Stores a value already converted to [`Target::declared_type`] (minus
    /// indirection). `Value::Null` clears optional slots.
    fn store(&mut self, value: Value) -> Result<(), StoreError>;

    /// The slot behind one layer of indirection, allocated when absent.
    fn elem_mut(&mut self) -> Option<&mut dyn Target> {
        None
    }

    fn as_record(&mut self) -> Option<&mut dyn Record> {
        None
    }
}

impl Target for bool {
    fn target_type() -> Type {
        Type::Bool
    }

    fn declared_type(&self) -> Type {
        Type::Bool
    }

    fn store(&mut self, value: Value) -> Result<(), StoreError> {
        match value {
            Value::Bool(b) => {
                *self = b;
                Ok(())
            }
            other => Err(StoreError::new(&other, Type::Bool)),
        }
    }
}

macro_rules! number_target {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Target for $ty {
                fn target_type() -> Type {
                    Type::Number(NumberType::$variant)
                }

                fn declared_type(&self) -> Type {
                    Type::Number(NumberType::$variant)
                }

                fn store(&mut self, value: Value) -> Result<(), StoreError> {
                    match value {
                        Value::Number(Number::$variant(n)) => {
                            *self = n;
                            Ok(())
                        }
                        other => Err(StoreError::new(&other, Type::Number(NumberType::$variant))),
                    }
                }
            }
        )*
    };
}

number_target! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl Target for String {
    fn target_type() -> Type {
        Type::String
    }

    fn declared_type(&self) -> Type {
        Type::String
    }

    fn store(&mut self, value: Value) -> Result<(), StoreError> {
        match value {
            Value::String(s) => {
                *self = s;
                Ok(())
            }
            other => Err(StoreError::new(&other, Type::String)),
        }
    }
}

impl Target for Value {
    fn target_type() -> Type {
        Type::Dynamic
    }

    fn declared_type(&self) -> Type {
        Type::Dynamic
    }

    fn store(&mut self, value: Value) -> Result<(), StoreError> {
        *self = value;
        Ok(())
    }
}

impl<T: Target + Default> Target for Option<T> {
    fn target_type() -> Type {
        Type::ptr(T::target_type())
    }

    fn declared_type(&self) -> Type {
        Self::target_type()
    }

    fn store(&mut self, value: Value) -> Result<(), StoreError> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).store(value)
    }

    fn elem_mut(&mut self) -> Option<&mut dyn Target> {
        Some(self.get_or_insert_with(T::default))
    }
}

impl<T: Target> Target for Box<T> {
    fn target_type() -> Type {
        T::target_type()
    }

    fn declared_type(&self) -> Type {
        (**self).declared_type()
    }

    fn store(&mut self, value: Value) -> Result<(), StoreError> {
        (**self).store(value)
    }

    fn elem_mut(&mut self) -> Option<&mut dyn Target> {
        (**self).elem_mut()
    }

    fn as_record(&mut self) -> Option<&mut dyn Record> {
        (**self).as_record()
    }
}

impl<T: Target + Default> Target for Vec<T> {
    fn target_type() -> Type {
        Type::seq(T::target_type())
    }

    fn declared_type(&self) -> Type {
        Self::target_type()
    }

    fn store(&mut self, value: Value) -> Result<(), StoreError> {
        match value {
            Value::Seq(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let mut slot = T::default();
                    assign_through(&mut slot, item)?;
                    out.push(slot);
                }
                *self = out;
                Ok(())
            }
            other => Err(StoreError::new(&other, Self::target_type())),
        }
    }
}

impl<T: Target + Default, const N: usize> Target for [T; N] {
    fn target_type() -> Type {
        Type::array(T::target_type(), N)
    }

    fn declared_type(&self) -> Type {
        Self::target_type()
    }

    fn store(&mut self, value: Value) -> Result<(), StoreError> {
        match value {
            Value::Seq(items) if items.len() == N => {
                let mut out: [T; N] = std::array::from_fn(|_| T::default());
                for (slot, item) in out.iter_mut().zip(items) {
                    assign_through(slot, item)?;
                }
                *self = out;
                Ok(())
            }
            other => Err(StoreError::new(&other, Self::target_type())),
        }
    }
}

macro_rules! map_target {
    ($($map:ident),* $(,)?) => {
        $(
            impl<T: Target + Default> Target for $map<String, T> {
                fn target_type() -> Type {
                    Type::map(T::target_type())
                }

                fn declared_type(&self) -> Type {
                    Self::target_type()
                }

                fn store(&mut self, value: Value) -> Result<(), StoreError> {
                    match value {
                        Value::Map(entries) => {
                            let mut out = $map::default();
                            for (key, item) in entries {
                                let mut slot = T::default();
                                assign_through(&mut slot, item)?;
                                out.insert(key, slot);
                            }
                            *self = out;
                            Ok(())
                        }
                        other => Err(StoreError::new(&other, Self::target_type())),
                    }
                }
            }
        )*
    };
}

map_target!(HashMap, BTreeMap, IndexMap);

/// Implements [`Target`] for `Clone + Send + Sync` types that are only ever
/// assigned from a [`Value::Opaque`] holding the same type.
#[macro_export]
macro_rules! impl_opaque {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Target for $ty {
                fn target_type() -> $crate::Type {
                    $crate::Type::opaque::<$ty>()
                }

                fn declared_type(&self) -> $crate::Type {
                    $crate::Type::opaque::<$ty>()
                }

                fn store(
                    &mut self,
                    value: $crate::Value,
                ) -> ::core::result::Result<(), $crate::StoreError> {
                    if let $crate::Value::Opaque(opaque) = &value {
                        if let ::core::option::Option::Some(inner) = opaque.downcast_ref::<$ty>() {
                            *self = ::core::clone::Clone::clone(inner);
                            return ::core::result::Result::Ok(());
                        }
                    }
                    ::core::result::Result::Err($crate::StoreError::new(
                        &value,
                        $crate::Type::opaque::<$ty>(),
                    ))
                }
            }
        )+
    };
}

impl_opaque!(Duration, SystemTime);
