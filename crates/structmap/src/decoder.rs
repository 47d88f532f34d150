//! The decode engine.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::convert::convert;
use crate::error::DecodeError;
use crate::field::FieldPart;
use crate::indirect::{assign_through, record_through, resolve_type, resolve_value};
use crate::mutation::Mutation;
use crate::record::{Record, RecordField};
use crate::target::Target;
use crate::types::Kind;
use crate::value::{Mapping, Value};

/// Decodes [`Mapping`]s into [`Record`]s through an ordered mutation
/// pipeline.
///
/// The pipeline is fixed once the decoder is built and shared read-only by
/// every call, so one decoder can serve concurrent calls on distinct
/// targets.
#[derive(Clone, Default)]
pub struct Decoder {
    mutations: Vec<Arc<dyn Mutation>>,
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("mutations_count", &self.mutations.len())
            .finish()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mutations<I>(mutations: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Mutation>>,
    {
        Self {
            mutations: mutations.into_iter().collect(),
        }
    }

    /// Appends a step and returns the decoder.
    pub fn with<M: Mutation + 'static>(mut self, mutation: M) -> Self {
        self.add_mutation(mutation);
        self
    }

    /// Appends a step to the end of the pipeline.
    pub fn add_mutation<M: Mutation + 'static>(&mut self, mutation: M) {
        self.mutations.push(Arc::new(mutation));
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Decodes `from` into `to`.
    ///
    /// Fields already assigned when an error occurs keep their new values.
    /// A panic raised while decoding, including one raised by a mutation, is
    /// reported as [`DecodeError::Internal`].
    pub fn decode<R: Record + ?Sized>(&self, from: &Mapping, to: &mut R) -> Result<(), DecodeError> {
        guard(|| self.decode_record(from, to))
    }

    /// Decodes into an arbitrary slot, which must hold a record (possibly
    /// behind indirection, allocated on demand). A slot of any other type
    /// is rejected before it is touched.
    pub fn decode_target(&self, from: &Mapping, to: &mut dyn Target) -> Result<(), DecodeError> {
        let declared = to.declared_type();
        let not_a_record = || DecodeError::NotARecord {
            type_name: declared.to_string(),
        };
        if resolve_type(&declared).kind() != Kind::Aggregate {
            return Err(not_a_record());
        }
        guard(|| match record_through(to) {
            Some(record) => self.decode_record(from, record),
            None => Err(not_a_record()),
        })
    }

    fn decode_record<R: Record + ?Sized>(&self, from: &Mapping, to: &mut R) -> Result<(), DecodeError> {
        trace!(record = to.type_name(), "decoding record");
        for field in to.fields() {
            self.decode_field(from, field)?;
        }
        Ok(())
    }

    fn decode_field(&self, from: &Mapping, field: RecordField<'_>) -> Result<(), DecodeError> {
        let declared = field.declared_type();
        let mut part = FieldPart::new(
            field.ident(),
            declared.clone(),
            field.tags().clone(),
            field.is_embedded(),
        );

        if self.mutations.is_empty() {
            lookup(from, &mut part);
        }
        for (i, mutation) in self.mutations.iter().enumerate() {
            mutation.mutate(&mut part).map_err(DecodeError::Mutation)?;
            if i == 0 {
                lookup(from, &mut part);
            }
        }

        if part.skip {
            trace!(field = part.ident(), "skipped by mutation");
            return Ok(());
        }

        let slot = field.into_slot();
        let target = resolve_type(&declared);

        if target.kind() == Kind::Aggregate {
            let sub = if part.embedded {
                from
            } else {
                match part.value.as_ref().map(|v| resolve_value(v, true)) {
                    Some(Value::Map(sub)) => sub,
                    _ => return Err(DecodeError::EmbeddingShape { field: part.name }),
                }
            };
            let Some(record) = record_through(slot) else {
                return Err(DecodeError::NotARecord {
                    type_name: declared.to_string(),
                });
            };
            return self.decode_record(sub, record);
        }

        let Some(raw) = part.value.as_ref() else {
            trace!(field = part.ident(), name = %part.name, "no value");
            return Ok(());
        };
        let value = resolve_value(raw, true);
        if value.is_null() {
            trace!(field = part.ident(), name = %part.name, "null value");
            return Ok(());
        }

        let mismatch = || DecodeError::TypeMismatch {
            field: part.ident().to_string(),
            source_type: value.type_name(),
            target_type: target.to_string(),
        };
        let converted = convert(value, target).ok_or_else(mismatch)?;
        debug!(field = part.ident(), name = %part.name, ty = %declared, "assigning");
        assign_through(slot, converted).map_err(|_| mismatch())
    }
}

fn lookup(from: &Mapping, part: &mut FieldPart) {
    if part.name.is_empty() {
        part.name = part.ident().to_string();
    }
    if let Some(value) = from.get(&part.name) {
        part.value = Some(value.clone());
    }
}

fn guard<F>(decode: F) -> Result<(), DecodeError>
where
    F: FnOnce() -> Result<(), DecodeError>,
{
    panic::catch_unwind(AssertUnwindSafe(decode)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!(%message, "decode panicked");
        Err(DecodeError::Internal(message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
