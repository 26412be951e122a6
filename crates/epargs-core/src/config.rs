//! Error Prone options and the build configuration file
//!
//! [`ErrorProneOptions`] is the configuration snapshot rendered into
//! `-Xplugin:ErrorProne ...`. It accepts any value as-is; syntactic checks
//! only happen when it is rendered (see [`crate::assemble`]). Check severities
//! and option values may be [`Deferred`], computed at render time.

use crate::error::{ArgsError, ArgsResult};
use crate::providers::{ArgumentProvider, ArgumentProviders};
use crate::severity::CheckSeverity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod builder;
mod deferred;
mod ordered;
mod schema;

pub use builder::ErrorProneOptionsBuilder;
pub use deferred::Deferred;
pub use ordered::OrderedMap;
pub use schema::generate_schema;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".epargs.toml";

/// Error Prone options attached to one compile task.
///
/// `enabled` and `compiling_test_only_code` are tri-state: `None` means "not
/// configured", letting source-set conventions fill them in without
/// overriding an explicit choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(description = "Error Prone options for a compile task")]
pub struct ErrorProneOptions {
    /// Whether the plugin runs at all. Unset means disabled unless a
    /// source-set convention enables it.
    #[schemars(description = "Enable Error Prone for this task")]
    pub enabled: Option<bool>,

    #[schemars(description = "Disable all checks (-XepDisableAllChecks)")]
    pub disable_all_checks: bool,

    #[schemars(description = "Disable all warnings (-XepDisableAllWarnings)")]
    pub disable_all_warnings: bool,

    #[schemars(description = "Report all errors as warnings (-XepAllErrorsAsWarnings)")]
    pub all_errors_as_warnings: bool,

    #[schemars(description = "Report all suggestions as warnings (-XepAllSuggestionsAsWarnings)")]
    pub all_suggestions_as_warnings: bool,

    #[schemars(
        description = "Enable all disabled checks as warnings (-XepAllDisabledChecksAsWarnings)"
    )]
    pub all_disabled_checks_as_warnings: bool,

    #[schemars(
        description = "Disable warnings in generated code (-XepDisableWarningsInGeneratedCode)"
    )]
    pub disable_warnings_in_generated_code: bool,

    #[schemars(description = "Ignore unknown check names (-XepIgnoreUnknownCheckNames)")]
    pub ignore_unknown_check_names: bool,

    #[schemars(
        description = "Ignore @SuppressWarnings-style annotations (-XepIgnoreSuppressionAnnotations)"
    )]
    pub ignore_suppression_annotations: bool,

    /// Unset means "not a test source set" unless a convention says otherwise.
    #[schemars(description = "Compiled code is test-only (-XepCompilingTestOnlyCode)")]
    pub compiling_test_only_code: Option<bool>,

    #[schemars(description = "Regular expression of paths to exclude (-XepExcludedPaths)")]
    pub excluded_paths: Option<String>,

    /// Check name to severity, in insertion order.
    #[schemars(
        with = "BTreeMap<String, CheckSeverity>",
        description = "Check severities (-Xep:<name>[:SEVERITY])"
    )]
    pub checks: OrderedMap<Deferred<CheckSeverity>>,

    /// Check option name to value, in insertion order.
    #[schemars(
        with = "BTreeMap<String, String>",
        description = "Check options (-XepOpt:<name>=<value>)"
    )]
    pub check_options: OrderedMap<Deferred<String>>,

    #[schemars(description = "Additional raw Error Prone arguments")]
    pub extra_args: Vec<String>,

    /// Evaluated at render time, after `extra_args`.
    #[serde(skip)]
    #[schemars(skip)]
    pub argument_providers: ArgumentProviders,
}

impl ErrorProneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn is_compiling_test_only_code(&self) -> bool {
        self.compiling_test_only_code.unwrap_or(false)
    }

    /// Set `enabled` only if it was not explicitly configured.
    pub fn enabled_by_convention(&mut self, value: bool) {
        self.enabled.get_or_insert(value);
    }

    /// Set `compiling_test_only_code` only if it was not explicitly configured.
    pub fn compiling_test_only_code_by_convention(&mut self, value: bool) {
        self.compiling_test_only_code.get_or_insert(value);
    }

    /// Add a check at its default severity.
    pub fn check(&mut self, name: impl Into<String>) {
        self.check_severity(name, CheckSeverity::Default);
    }

    /// Set the severity of a check. An existing check keeps its position.
    pub fn check_severity(&mut self, name: impl Into<String>, severity: CheckSeverity) {
        self.checks.insert(name, severity.into());
    }

    /// Set the severity of a check to a value computed at render time.
    pub fn check_severity_with(
        &mut self,
        name: impl Into<String>,
        severity: impl Fn() -> CheckSeverity + Send + Sync + 'static,
    ) {
        self.checks.insert(name, Deferred::computed(severity));
    }

    /// Set the severity of several checks.
    pub fn checks<I, S>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (S, CheckSeverity)>,
        S: Into<String>,
    {
        self.checks
            .extend(pairs.into_iter().map(|(name, severity)| (name, severity.into())));
    }

    /// Enable checks at their default severity; useful after `disable_all_checks`.
    pub fn enable<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_all(names, CheckSeverity::Default);
    }

    pub fn disable<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_all(names, CheckSeverity::Off);
    }

    pub fn warn<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_all(names, CheckSeverity::Warn);
    }

    pub fn error<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_all(names, CheckSeverity::Error);
    }

    fn set_all<I, S>(&mut self, names: I, severity: CheckSeverity)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.check_severity(name, severity);
        }
    }

    /// Add a check option with the value `"true"`.
    pub fn option(&mut self, name: impl Into<String>) {
        self.option_bool(name, true);
    }

    pub fn option_bool(&mut self, name: impl Into<String>, value: bool) {
        self.option_value(name, value.to_string());
    }

    pub fn option_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.check_options.insert(name, Deferred::Fixed(value.into()));
    }

    /// Set a check option to a value computed at render time.
    pub fn option_value_with(
        &mut self,
        name: impl Into<String>,
        value: impl Fn() -> String + Send + Sync + 'static,
    ) {
        self.check_options.insert(name, Deferred::computed(value));
    }

    /// Append a raw Error Prone argument.
    pub fn arg(&mut self, arg: impl Into<String>) {
        self.extra_args.push(arg.into());
    }

    pub fn args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
    }

    /// Register a provider evaluated at render time.
    pub fn argument_provider(&mut self, provider: impl ArgumentProvider + 'static) {
        self.argument_providers.push(Arc::new(provider));
    }

    /// Register an already shared provider.
    pub fn shared_argument_provider(&mut self, provider: Arc<dyn ArgumentProvider>) {
        self.argument_providers.push(provider);
    }
}

/// Compile-task settings read from the `[task]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(description = "Compile task settings")]
pub struct TaskConfig {
    /// Source set whose primary compilation this task drives, if any.
    #[schemars(description = "Source set compiled by this task (e.g. \"main\", \"test\")")]
    pub source_set: Option<String>,

    #[schemars(description = "Run the compiler in a separate process")]
    pub fork: bool,

    #[schemars(description = "Java home of a command-line compiler (requires fork)")]
    pub java_home: Option<PathBuf>,

    #[schemars(description = "javac executable of a command-line compiler (requires fork)")]
    pub executable: Option<PathBuf>,

    #[schemars(description = "JVM arguments for the forked compiler process")]
    pub jvm_args: Vec<String>,

    /// Language version of an explicitly configured toolchain.
    #[schemars(description = "Toolchain language version (e.g. \"17\")")]
    pub toolchain: Option<String>,
}

/// Description of the runtime executing the build tool, read from `[runtime]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(description = "Runtime executing the build tool")]
pub struct RuntimeConfig {
    /// Overrides detection from `JAVA_HOME`.
    #[schemars(description = "Runtime version (e.g. \"21\"); detected from JAVA_HOME when unset")]
    pub version: Option<String>,

    #[schemars(description = "Java home of the runtime; defaults to $JAVA_HOME")]
    pub java_home: Option<PathBuf>,

    /// JVM options the runtime was started with, inspected for existing grants.
    #[schemars(description = "JVM options the runtime was started with")]
    pub jvm_args: Vec<String>,
}

/// Complete `.epargs.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(description = "epargs configuration file")]
pub struct BuildConfig {
    pub errorprone: ErrorProneOptions,
    pub task: TaskConfig,
    pub runtime: RuntimeConfig,
}

impl BuildConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> ArgsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ArgsError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        Self::from_toml_str(&content).map_err(|e| ArgsError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Load `path` if given, else `.epargs.toml` in `dir` if present, else defaults.
    pub fn load_or_default(path: Option<&Path>, dir: &Path) -> ArgsResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading default configuration file");
            return Self::load(candidate);
        }
        Ok(Self::default())
    }
}

/// Warning from configuration validation.
///
/// These never block rendering; they point at likely mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The field path that has the issue (e.g., "errorprone.excluded_paths")
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}
