use thiserror::Error;

use crate::types::Type;
use crate::value::Value;

/// Error reported by a mutation step.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// A mutation step failed; its error is kept as reported.
    #[error("{0}")]
    Mutation(BoxError),
    #[error("field {field} is not an embedded record, expected its value to be a mapping")]
    EmbeddingShape { field: String },
    #[error("field {field} value of type {source_type} is not assignable to type {target_type}")]
    TypeMismatch {
        field: String,
        source_type: String,
        target_type: String,
    },
    #[error("decode target of type {type_name} is not a record")]
    NotARecord { type_name: String },
    #[error("decode aborted: {0}")]
    Internal(String),
}

impl DecodeError {
    /// The step error, when this is [`DecodeError::Mutation`] of type `E`.
    pub fn mutation_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            DecodeError::Mutation(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// A [`Target`](crate::Target) was handed a value of the wrong shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("value of type {found} cannot be stored as {expected}")]
pub struct StoreError {
    pub found: String,
    pub expected: Type,
}

impl StoreError {
    pub fn new(found: &Value, expected: Type) -> Self {
        Self {
            found: found.type_name(),
            expected,
        }
    }
}
