//! Pluggable suppliers of extra Error Prone arguments.

use crate::error::ArgsResult;
use std::fmt;
use std::sync::Arc;

/// A supplier of additional Error Prone arguments.
///
/// Providers are evaluated lazily: [`arguments`](ArgumentProvider::arguments)
/// is only called when the options are rendered, and never when the plugin is
/// disabled. Their output goes through the same white space validation as
/// every other rendered argument. A provider that fails aborts the render.
///
/// # Example
///
/// ```
/// use epargs_core::{ArgsResult, ArgumentProvider, ErrorProneOptions};
///
/// struct NullAwayPackages;
///
/// impl ArgumentProvider for NullAwayPackages {
///     fn arguments(&self) -> ArgsResult<Vec<String>> {
///         Ok(vec!["-XepOpt:NullAway:AnnotatedPackages=com.example".to_string()])
///     }
/// }
///
/// let options = ErrorProneOptions::builder()
///     .enabled(true)
///     .argument_provider(NullAwayPackages)
///     .build();
/// assert_eq!(
///     epargs_core::assemble(&options).unwrap(),
///     vec!["-XepOpt:NullAway:AnnotatedPackages=com.example"]
/// );
/// ```
pub trait ArgumentProvider: Send + Sync {
    /// Human-readable name for this provider.
    ///
    /// Defaults to the unqualified type name (e.g., `"StaticArguments"`).
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Produce the arguments, in the order they must appear.
    fn arguments(&self) -> ArgsResult<Vec<String>>;
}

impl<F> ArgumentProvider for F
where
    F: Fn() -> Vec<String> + Send + Sync,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn arguments(&self) -> ArgsResult<Vec<String>> {
        Ok(self())
    }
}

/// A provider returning a fixed list of arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticArguments(pub Vec<String>);

impl StaticArguments {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }
}

impl ArgumentProvider for StaticArguments {
    fn arguments(&self) -> ArgsResult<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Registered providers, kept in registration order.
#[derive(Clone, Default)]
pub struct ArgumentProviders {
    providers: Vec<Arc<dyn ArgumentProvider>>,
}

impl ArgumentProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: Arc<dyn ArgumentProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ArgumentProvider>> {
        self.providers.iter()
    }

    /// Names of the registered providers, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }
}

impl fmt::Debug for ArgumentProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
