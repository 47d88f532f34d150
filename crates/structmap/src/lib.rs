//! structmap - decode dynamically-shaped key/value data into typed records.
//!
//! A [`Mapping`] of dynamic [`Value`]s (as produced by a config parser, a
//! request body or a database row) is decoded into any type implementing
//! [`Record`]. Each field goes through the [`Decoder`]'s ordered pipeline of
//! [`Mutation`]s (naming, defaults, flags, casts) before the engine assigns
//! it, recursing into nested and embedded records and resolving any depth of
//! `Option` indirection.
//!
//! ```
//! use structmap::{impl_record, mutation_fn, Decoder, Mapping, Value};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Server {
//!     host: String,
//!     port: Option<u16>,
//! }
//! impl_record!(Server { host, port => { key: "listen_port" } });
//!
//! let decoder = Decoder::new().with(mutation_fn(|field| {
//!     if let Some(tag) = field.tag("key") {
//!         field.name = tag.name.to_string();
//!     }
//!     Ok(())
//! }));
//!
//! let from: Mapping = [("host", Value::from("localhost")), ("listen_port", Value::from(8080))]
//!     .into_iter()
//!     .collect();
//! let mut server = Server::default();
//! decoder.decode(&from, &mut server).unwrap();
//! assert_eq!(server, Server { host: "localhost".into(), port: Some(8080) });
//! ```

mod convert;
mod decoder;
mod error;
mod field;
mod indirect;
mod mutation;
mod record;
mod tag;
mod target;
mod types;
mod value;

pub use decoder::Decoder;
pub use error::{BoxError, DecodeError, StoreError};
pub use field::FieldPart;
pub use indirect::{assign_through, record_through, resolve_type, resolve_value};
pub use mutation::{mutation_fn, Mutation};
pub use record::{Fields, Record, RecordField};
pub use tag::{TagError, TagValue, Tags};
pub use target::Target;
pub use types::{Kind, OpaqueType, Type};
pub use value::{Mapping, Number, NumberType, Opaque, Value};
