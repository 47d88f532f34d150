use crate::error::BoxError;
use crate::field::FieldPart;

/// One step of the decoder's pipeline.
///
/// Steps run in configuration order, once per field, for every record the
/// decoder walks (nested ones included). By convention the first step names
/// the field.
pub trait Mutation: Send + Sync {
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError>;
}

impl<F> Mutation for F
where
    F: Fn(&mut FieldPart) -> Result<(), BoxError> + Send + Sync,
{
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError> {
        self(field)
    }
}

/// Pins a closure to the [`Mutation`] signature so its argument and error
/// types need no annotation.
pub fn mutation_fn<F>(f: F) -> F
where
    F: Fn(&mut FieldPart) -> Result<(), BoxError> + Send + Sync,
{
    f
}
