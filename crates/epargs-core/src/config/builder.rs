use super::*;

/// Builder for constructing [`ErrorProneOptions`].
///
/// Uses the `&mut Self` return pattern for chaining setter calls. Entries are
/// accepted as-is; [`build_validated`](Self::build_validated) is the single
/// point where they are checked, by rendering the result once.
///
/// **Note:** `build()` and `build_validated()` drain the builder's state.
/// A second call will produce default options. Create a new builder if needed.
///
/// # Examples
///
/// ```rust
/// use epargs_core::{CheckSeverity, ErrorProneOptions};
///
/// let options = ErrorProneOptions::builder()
///     .enabled(true)
///     .disable_all_checks(true)
///     .check_severity("Foo", CheckSeverity::Error)
///     .option_value("NullAway:Mode", "Strict")
///     .build_validated()
///     .expect("valid options");
/// assert!(options.is_enabled());
/// ```
#[derive(Default)]
pub struct ErrorProneOptionsBuilder {
    options: ErrorProneOptions,
}

impl ErrorProneOptionsBuilder {
    /// Prefer [`ErrorProneOptions::builder()`] over calling this directly.
    fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&mut self, enabled: bool) -> &mut Self {
        self.options.enabled = Some(enabled);
        self
    }

    pub fn disable_all_checks(&mut self, value: bool) -> &mut Self {
        self.options.disable_all_checks = value;
        self
    }

    pub fn disable_all_warnings(&mut self, value: bool) -> &mut Self {
        self.options.disable_all_warnings = value;
        self
    }

    pub fn all_errors_as_warnings(&mut self, value: bool) -> &mut Self {
        self.options.all_errors_as_warnings = value;
        self
    }

    pub fn all_suggestions_as_warnings(&mut self, value: bool) -> &mut Self {
        self.options.all_suggestions_as_warnings = value;
        self
    }

    pub fn all_disabled_checks_as_warnings(&mut self, value: bool) -> &mut Self {
        self.options.all_disabled_checks_as_warnings = value;
        self
    }

    pub fn disable_warnings_in_generated_code(&mut self, value: bool) -> &mut Self {
        self.options.disable_warnings_in_generated_code = value;
        self
    }

    pub fn ignore_unknown_check_names(&mut self, value: bool) -> &mut Self {
        self.options.ignore_unknown_check_names = value;
        self
    }

    pub fn ignore_suppression_annotations(&mut self, value: bool) -> &mut Self {
        self.options.ignore_suppression_annotations = value;
        self
    }

    pub fn compiling_test_only_code(&mut self, value: bool) -> &mut Self {
        self.options.compiling_test_only_code = Some(value);
        self
    }

    pub fn excluded_paths(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.options.excluded_paths = Some(pattern.into());
        self
    }

    pub fn check(&mut self, name: impl Into<String>) -> &mut Self {
        self.options.check(name);
        self
    }

    pub fn check_severity(&mut self, name: impl Into<String>, severity: CheckSeverity) -> &mut Self {
        self.options.check_severity(name, severity);
        self
    }

    pub fn check_severity_with(
        &mut self,
        name: impl Into<String>,
        severity: impl Fn() -> CheckSeverity + Send + Sync + 'static,
    ) -> &mut Self {
        self.options.check_severity_with(name, severity);
        self
    }

    pub fn enable<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.enable(names);
        self
    }

    pub fn disable<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.disable(names);
        self
    }

    pub fn warn<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.warn(names);
        self
    }

    pub fn error<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.error(names);
        self
    }

    pub fn option(&mut self, name: impl Into<String>) -> &mut Self {
        self.options.option(name);
        self
    }

    pub fn option_bool(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.options.option_bool(name, value);
        self
    }

    pub fn option_value(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.options.option_value(name, value);
        self
    }

    pub fn option_value_with(
        &mut self,
        name: impl Into<String>,
        value: impl Fn() -> String + Send + Sync + 'static,
    ) -> &mut Self {
        self.options.option_value_with(name, value);
        self
    }

    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.options.arg(arg);
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.args(args);
        self
    }

    pub fn argument_provider(&mut self, provider: impl ArgumentProvider + 'static) -> &mut Self {
        self.options.argument_provider(provider);
        self
    }

    /// Build the options without checking them.
    ///
    /// Invalid entries surface later, when the options are rendered.
    pub fn build(&mut self) -> ErrorProneOptions {
        std::mem::take(&mut self.options)
    }

    /// Build the options and render them once, returning the first
    /// configuration error.
    ///
    /// Disabled options always succeed, whatever they contain.
    pub fn build_validated(&mut self) -> ArgsResult<ErrorProneOptions> {
        let options = self.build();
        crate::assembler::assemble(&options)?;
        Ok(options)
    }
}

impl ErrorProneOptions {
    /// Create a new [`ErrorProneOptionsBuilder`].
    pub fn builder() -> ErrorProneOptionsBuilder {
        ErrorProneOptionsBuilder::new()
    }
}
