//! Record introspection.
//!
//! A record lists its observable members, in declaration order, as
//! [`RecordField`]s: an identifier, annotations, an embedded flag and an
//! exclusive write handle to the member. Members left out of
//! [`Record::fields`] are never read nor written by the decoder.

use crate::tag::Tags;
use crate::target::Target;
use crate::types::Type;

/// Members of one record, in declaration order.
pub type Fields<'a> = Vec<RecordField<'a>>;

pub trait Record {
    /// Observable members in declaration order.
    fn fields(&mut self) -> Fields<'_>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// One declared member of a record, borrowed for the duration of a decode.
pub struct RecordField<'a> {
    ident: &'static str,
    tags: Tags,
    embedded: bool,
    slot: &'a mut dyn Target,
}

impl<'a> RecordField<'a> {
    pub fn new<T: Target>(ident: &'static str, slot: &'a mut T) -> Self {
        Self {
            ident,
            tags: Tags::new(),
            embedded: false,
            slot,
        }
    }

    /// Marks the member as embedded: its own fields are read from the
    /// parent's mapping.
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    pub fn declared_type(&self) -> Type {
        self.slot.declared_type()
    }

    pub fn slot(&mut self) -> &mut dyn Target {
        &mut *self.slot
    }

    pub fn into_slot(self) -> &'a mut dyn Target {
        self.slot
    }
}

impl std::fmt::Debug for RecordField<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordField")
            .field("ident", &self.ident)
            .field("type", &self.declared_type())
            .field("tags", &self.tags)
            .field("embedded", &self.embedded)
            .finish()
    }
}

/// Implements [`Target`] for a type that already implements [`Record`], so
/// it can appear as a (possibly optional or embedded) member of another
/// record.
#[macro_export]
macro_rules! record_target {
    ($ty:ident) => {
        impl $crate::Target for $ty {
            fn target_type() -> $crate::Type {
                $crate::Type::Record(::core::stringify!($ty))
            }

            fn declared_type(&self) -> $crate::Type {
                $crate::Type::Record(::core::stringify!($ty))
            }

            fn store(
                &mut self,
                value: $crate::Value,
            ) -> ::core::result::Result<(), $crate::StoreError> {
                ::core::result::Result::Err($crate::StoreError::new(
                    &value,
                    $crate::Type::Record(::core::stringify!($ty)),
                ))
            }

            fn as_record(&mut self) -> ::core::option::Option<&mut dyn $crate::Record> {
                ::core::option::Option::Some(self)
            }
        }
    };
}

/// Implements [`Record`] and [`Target`] for a struct by listing its fields.
///
/// ```
/// use structmap::impl_record;
///
/// #[derive(Default)]
/// struct Base {
///     id: u64,
/// }
/// impl_record!(Base { id });
///
/// #[derive(Default)]
/// struct User {
///     base: Base,
///     name: Option<String>,
///     username: String,
/// }
/// impl_record!(User {
///     #[embedded] base,
///     name,
///     username => { structmap: "user,required" },
/// });
/// ```
///
/// Each entry is the field identifier, optionally preceded by builder flags
/// (`#[embedded]`) and followed by `=> { key: "value", ... }` tags.
#[macro_export]
macro_rules! impl_record {
    ($ty:ident {
        $(
            $(#[$flag:ident])*
            $field:ident $(=> { $($key:ident : $value:literal),* $(,)? })?
        ),* $(,)?
    }) => {
        impl $crate::Record for $ty {
            fn fields(&mut self) -> $crate::Fields<'_> {
                ::std::vec![
                    $(
                        $crate::RecordField::new(::core::stringify!($field), &mut self.$field)
                            $(.$flag())*
                            $($(.tag(::core::stringify!($key), $value))*)?
                    ),*
                ]
            }

            fn type_name(&self) -> &'static str {
                ::core::stringify!($ty)
            }
        }

        $crate::record_target!($ty);
    };
}
