use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use structmap::{OpaqueType, Value};

use super::CastError;

type CastFn = dyn Fn(&Value) -> Result<Value, CastError> + Send + Sync;

/// Conversions into opaque Rust types, keyed by the target type.
///
/// ```
/// use std::time::Duration;
/// use structmap::Value;
/// use structmap_behavior::cast::{CastError, Casters};
///
/// let casters = Casters::new().register(|value: &Value| match value.as_f64() {
///     Some(secs) if secs >= 0.0 => Ok(Duration::from_secs_f64(secs)),
///     _ => Err(CastError::custom("expected a number of seconds")),
/// });
/// assert!(casters.contains::<Duration>());
/// ```
#[derive(Clone, Default)]
pub struct Casters {
    by_type: HashMap<OpaqueType, Arc<CastFn>>,
}

impl Casters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` as the conversion into `T`, replacing any earlier one.
    /// `f` receives the resolved, non-null source value.
    pub fn register<T, F>(mut self, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Value) -> Result<T, CastError> + Send + Sync + 'static,
    {
        let caster: Arc<CastFn> =
            Arc::new(move |value: &Value| f(value).map(Value::opaque::<T>));
        self.by_type.insert(OpaqueType::of::<T>(), caster);
        self
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.by_type.contains_key(&OpaqueType::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Runs the conversion registered for `ty`, `None` when there is none.
    pub(crate) fn cast(&self, ty: OpaqueType, value: &Value) -> Option<Result<Value, CastError>> {
        self.by_type.get(&ty).map(|f| f(value))
    }
}

impl fmt::Debug for Casters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.by_type.keys().map(OpaqueType::name))
            .finish()
    }
}
