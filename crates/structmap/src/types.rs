//! Runtime descriptors for the declared type of a record field.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

pub use crate::value::NumberType;

/// Structural kind shared by types and values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Scalar,
    Indirection,
    Aggregate,
    Sequence,
    Mapping,
}

/// Identity of a Rust type carried through [`Type::Opaque`] and
/// [`Opaque`](crate::Opaque) values.
#[derive(Debug, Clone, Copy)]
pub struct OpaqueType {
    id: TypeId,
    name: &'static str,
}

impl OpaqueType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for OpaqueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OpaqueType {}

impl Hash for OpaqueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Declared type of a field, as reported by its [`Target`](crate::Target).
///
/// `Option<T>` maps to [`Type::Ptr`], so `Option<Option<String>>` is two
/// layers of indirection around [`Type::String`]. `Box<T>` is transparent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Number(NumberType),
    String,
    /// A field holding a [`Value`](crate::Value) as-is.
    Dynamic,
    Ptr(Box<Type>),
    Seq(Box<Type>),
    Array(Box<Type>, usize),
    /// String-keyed map with values of the inner type.
    Map(Box<Type>),
    Record(&'static str),
    Opaque(OpaqueType),
}

impl Type {
    pub fn ptr(inner: Type) -> Self {
        Type::Ptr(Box::new(inner))
    }

    pub fn seq(elem: Type) -> Self {
        Type::Seq(Box::new(elem))
    }

    pub fn array(elem: Type, len: usize) -> Self {
        Type::Array(Box::new(elem), len)
    }

    pub fn map(value: Type) -> Self {
        Type::Map(Box::new(value))
    }

    pub fn opaque<T: 'static>() -> Self {
        Type::Opaque(OpaqueType::of::<T>())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Type::Bool | Type::Number(_) | Type::String | Type::Dynamic | Type::Opaque(_) => {
                Kind::Scalar
            }
            Type::Ptr(_) => Kind::Indirection,
            Type::Seq(_) | Type::Array(..) => Kind::Sequence,
            Type::Map(_) => Kind::Mapping,
            Type::Record(_) => Kind::Aggregate,
        }
    }

    /// Number of `Ptr` layers wrapped around the innermost type.
    pub fn depth(&self) -> usize {
        match self {
            Type::Ptr(inner) => 1 + inner.depth(),
            _ => 0,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("bool"),
            Type::Number(n) => f.write_str(n.name()),
            Type::String => f.write_str("String"),
            Type::Dynamic => f.write_str("Value"),
            Type::Ptr(inner) => write!(f, "Option<{inner}>"),
            Type::Seq(elem) => write!(f, "Vec<{elem}>"),
            Type::Array(elem, len) => write!(f, "[{elem}; {len}]"),
            Type::Map(value) => write!(f, "Map<String, {value}>"),
            Type::Record(name) => f.write_str(name),
            Type::Opaque(opaque) => f.write_str(opaque.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_every_shape() {
        assert_eq!(Type::Bool.kind(), Kind::Scalar);
        assert_eq!(Type::Dynamic.kind(), Kind::Scalar);
        assert_eq!(Type::ptr(Type::String).kind(), Kind::Indirection);
        assert_eq!(Type::array(Type::Bool, 3).kind(), Kind::Sequence);
        assert_eq!(Type::map(Type::String).kind(), Kind::Mapping);
        assert_eq!(Type::Record("Person").kind(), Kind::Aggregate);
        assert_eq!(Type::opaque::<std::time::Duration>().kind(), Kind::Scalar);
    }

    #[test]
    fn display_reads_like_rust() {
        let ty = Type::ptr(Type::seq(Type::map(Type::Number(NumberType::I32))));
        assert_eq!(ty.to_string(), "Option<Vec<Map<String, i32>>>");
        assert_eq!(Type::array(Type::String, 3).to_string(), "[String; 3]");
    }

    #[test]
    fn depth_counts_ptr_layers() {
        assert_eq!(Type::String.depth(), 0);
        assert_eq!(Type::ptr(Type::ptr(Type::ptr(Type::String))).depth(), 3);
    }

    #[test]
    fn opaque_identity_is_type_id() {
        assert_eq!(Type::opaque::<u8>(), Type::opaque::<u8>());
        assert_ne!(Type::opaque::<u8>(), Type::opaque::<u16>());
    }
}
