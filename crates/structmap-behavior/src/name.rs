//! Naming steps. They decide which source key a field is read from and are
//! meant to sit first in the pipeline, since the decoder looks the key up
//! right after the first step.

use std::sync::Arc;

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use structmap::{BoxError, FieldPart, Mutation};

/// Names the field after the `name` part of its `key` tag. Fields without
/// the tag, or with an empty name (`",required"`), are left alone.
#[derive(Debug, Clone)]
pub struct FromTag {
    key: String,
}

pub fn from_tag(key: impl Into<String>) -> FromTag {
    FromTag { key: key.into() }
}

impl Mutation for FromTag {
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError> {
        let name = match field.tag(&self.key) {
            Some(tag) if !tag.name.is_empty() => tag.name.to_string(),
            _ => return Ok(()),
        };
        field.name = name;
        Ok(())
    }
}

/// Does nothing; the decoder then uses the field identifier as the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

pub fn noop() -> Noop {
    Noop
}

impl Mutation for Noop {
    fn mutate(&self, _field: &mut FieldPart) -> Result<(), BoxError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// `snake_case`
    Snake,
    /// `lowerCamelCase`
    Camel,
    /// `UpperCamelCase`
    Pascal,
    /// `kebab-case`
    Kebab,
    /// `SHOUTY_SNAKE_CASE`
    ShoutySnake,
}

impl Case {
    pub fn convert(self, ident: &str) -> String {
        match self {
            Case::Snake => ident.to_snake_case(),
            Case::Camel => ident.to_lower_camel_case(),
            Case::Pascal => ident.to_upper_camel_case(),
            Case::Kebab => ident.to_kebab_case(),
            Case::ShoutySnake => ident.to_shouty_snake_case(),
        }
    }
}

/// Names the field after its identifier converted to `case`.
#[derive(Debug, Clone, Copy)]
pub struct FromCase {
    case: Case,
}

pub fn from_case(case: Case) -> FromCase {
    FromCase { case }
}

impl Mutation for FromCase {
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError> {
        field.name = self.case.convert(field.ident());
        Ok(())
    }
}

/// Tries naming steps in order and keeps the first non-empty name.
///
/// ```
/// use structmap_behavior::name::{self, Case};
///
/// let naming = name::discovery()
///     .or(name::from_tag("json"))
///     .or(name::from_tag("bson"))
///     .or(name::from_case(Case::Snake));
/// assert_eq!(naming.len(), 3);
/// ```
#[derive(Clone, Default)]
pub struct Discovery {
    steps: Vec<Arc<dyn Mutation>>,
}

pub fn discovery() -> Discovery {
    Discovery::default()
}

impl Discovery {
    pub fn or<M: Mutation + 'static>(mut self, step: M) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl Mutation for Discovery {
    fn mutate(&self, field: &mut FieldPart) -> Result<(), BoxError> {
        for step in &self.steps {
            step.mutate(field)?;
            if !field.name.is_empty() {
                break;
            }
        }
        Ok(())
    }
}
