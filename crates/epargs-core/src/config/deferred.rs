use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A value that is either known now or computed when the arguments are rendered.
///
/// Configuration files only ever produce [`Deferred::Fixed`]. Hosts register
/// [`Deferred::Computed`] values through
/// [`check_severity_with`](super::ErrorProneOptions::check_severity_with) and
/// [`option_value_with`](super::ErrorProneOptions::option_value_with); the
/// closure runs on every render and never for a disabled task.
pub enum Deferred<T> {
    Fixed(T),
    Computed(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Deferred<T> {
    pub fn computed(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Deferred::Computed(Arc::new(f))
    }

    /// The current value, running the closure of a computed value.
    pub fn get(&self) -> T {
        match self {
            Deferred::Fixed(value) => value.clone(),
            Deferred::Computed(f) => f(),
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Deferred::Computed(_))
    }
}

impl<T> From<T> for Deferred<T> {
    fn from(value: T) -> Self {
        Deferred::Fixed(value)
    }
}

impl<T: Clone> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        match self {
            Deferred::Fixed(value) => Deferred::Fixed(value.clone()),
            Deferred::Computed(f) => Deferred::Computed(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Fixed(value) => value.fmt(f),
            Deferred::Computed(_) => f.write_str("<computed>"),
        }
    }
}

/// Computed values are serialized as their current value.
impl<T: Serialize + Clone> Serialize for Deferred<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Deferred<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Deferred::Fixed)
    }
}
