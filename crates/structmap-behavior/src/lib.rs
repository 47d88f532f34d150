//! Standard field mutations for the `structmap` decoder.
//!
//! - [`name`]: where a field's key comes from (tags, case conversion).
//! - [`flag`]: tag flags (`required`, `noembedded`, `skip`).
//! - [`default`]: fallback values for absent keys.
//! - [`cast`]: lenient conversion of a value to the field's type.
//!
//! A typical pipeline names fields first, then fills defaults, then checks
//! flags, then casts:
//!
//! ```
//! use structmap::{impl_record, Decoder, Mapping, Value};
//! use structmap_behavior::{cast, default, flag, name};
//!
//! #[derive(Debug, Default)]
//! struct Listen {
//!     host: String,
//!     port: u16,
//! }
//! impl_record!(Listen {
//!     host => { structmap: "host,required" },
//!     port => { default: "8080" },
//! });
//!
//! let decoder = Decoder::new()
//!     .with(name::from_tag("structmap"))
//!     .with(default::from_tag("default"))
//!     .with(flag::required("structmap"))
//!     .with(cast::to_type());
//!
//! let from: Mapping = [("host", Value::from("0.0.0.0"))].into_iter().collect();
//! let mut listen = Listen::default();
//! decoder.decode(&from, &mut listen).unwrap();
//! assert_eq!(listen.port, 8080);
//! ```

use std::sync::Arc;

use structmap::{BoxError, FieldPart, Mutation};
use thiserror::Error;

pub mod cast;
pub mod default;
pub mod flag;
pub mod name;

pub use cast::{CastError, Casters};

/// Errors raised by the standard steps. The decoder reports them through
/// `DecodeError::Mutation`, from which they can be downcast.
#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("field {field} is required")]
    Required { field: String },
    #[error("field {field} cannot be cast")]
    Cast {
        field: String,
        #[source]
        source: CastError,
    },
}

/// Wraps a closure as a shareable step, for pipelines assembled with
/// `Decoder::with_mutations`.
pub fn new<F>(f: F) -> Arc<dyn Mutation>
where
    F: Fn(&mut FieldPart) -> Result<(), BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}
