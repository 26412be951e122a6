//! Compile-task model: ties options, toolchain and launch mode together.

use crate::assembler;
use crate::config::{BuildConfig, ErrorProneOptions};
use crate::error::{ArgsError, ArgsResult};
use crate::fork::{ForkDecision, decide_fork};
use crate::toolchain::{
    JavaVersion, ModuleAccess, RuntimeProbe, Toolchain, current_runtime_probe,
};
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// Source-set names treated as test code: `test`, `integrationTest`, `testFixtures`, ...
pub const TEST_SOURCE_SET_PATTERN: &str = r"^(t|.*T)est(\p{Uppercase}.*)?$";

static TEST_SOURCE_SET_REGEX: OnceLock<Regex> = OnceLock::new();

fn test_source_set_regex() -> &'static Regex {
    TEST_SOURCE_SET_REGEX.get_or_init(|| Regex::new(TEST_SOURCE_SET_PATTERN).unwrap())
}

pub fn is_test_source_set(name: &str) -> bool {
    test_source_set_regex().is_match(name)
}

/// Name of the primary compile task of a source set (`compileJava`, `compileTestJava`).
pub fn compile_task_name(source_set: &str) -> String {
    if source_set == "main" {
        return "compileJava".to_string();
    }
    let mut chars = source_set.chars();
    match chars.next() {
        Some(first) => format!("compile{}{}Java", first.to_uppercase(), chars.as_str()),
        None => "compileJava".to_string(),
    }
}

/// Settings of a forked compiler process.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ForkOptions {
    pub java_home: Option<PathBuf>,
    pub executable: Option<PathBuf>,
    pub jvm_args: Vec<String>,
}

/// The runtime executing the build tool.
///
/// Holds the capability source inspected by the grant probe and the cache
/// the probe result lives in.
#[derive(Debug, Clone)]
pub struct RuntimeInfo<'p> {
    pub version: JavaVersion,
    access: Arc<dyn ModuleAccess>,
    probe: &'p RuntimeProbe,
}

impl RuntimeInfo<'static> {
    /// Runtime backed by the process-wide probe cache.
    pub fn current(version: JavaVersion, access: Arc<dyn ModuleAccess>) -> Self {
        Self::with_probe(version, access, current_runtime_probe())
    }
}

impl<'p> RuntimeInfo<'p> {
    pub fn with_probe(
        version: JavaVersion,
        access: Arc<dyn ModuleAccess>,
        probe: &'p RuntimeProbe,
    ) -> Self {
        Self {
            version,
            access,
            probe,
        }
    }

    /// Whether this runtime needs grants to host the plugin in-process.
    pub fn needs_grants(&self) -> ArgsResult<bool> {
        self.probe.needs_grants(self.version, self.access.as_ref())
    }
}

/// A Java compile task with Error Prone options attached.
#[derive(Debug, Clone)]
pub struct CompileTask {
    pub name: String,
    pub options: ErrorProneOptions,
    pub source_set: Option<String>,
    pub fork: bool,
    pub fork_options: ForkOptions,
    /// Language version of an explicitly configured toolchain.
    pub toolchain: Option<JavaVersion>,
}

impl CompileTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: ErrorProneOptions::default(),
            source_set: None,
            fork: false,
            fork_options: ForkOptions::default(),
            toolchain: None,
        }
    }

    /// The primary compile task of a source set, with conventions applied.
    pub fn for_source_set(source_set: &str) -> Self {
        let mut task = Self::new(compile_task_name(source_set));
        task.apply_source_set_conventions(source_set);
        task
    }

    /// Build a task from a loaded configuration file.
    pub fn from_config(config: BuildConfig) -> ArgsResult<Self> {
        let toolchain = config
            .task
            .toolchain
            .as_deref()
            .map(|v| {
                v.parse::<JavaVersion>()
                    .map_err(|message| ArgsError::InvalidConfiguration {
                        message,
                        value: v.to_string(),
                    })
            })
            .transpose()?;

        let name = config
            .task
            .source_set
            .as_deref()
            .map(compile_task_name)
            .unwrap_or_else(|| "compileJava".to_string());

        let mut task = Self {
            name,
            options: config.errorprone,
            source_set: None,
            fork: config.task.fork,
            fork_options: ForkOptions {
                java_home: config.task.java_home,
                executable: config.task.executable,
                jvm_args: config.task.jvm_args,
            },
            toolchain,
        };
        if let Some(source_set) = config.task.source_set {
            task.apply_source_set_conventions(&source_set);
        }
        Ok(task)
    }

    /// Apply the defaults of a source set's primary compile task.
    ///
    /// Error Prone is enabled unless the toolchain is too old to run it, and
    /// test-only code is flagged for test-like source sets. Explicitly
    /// configured values are kept.
    pub fn apply_source_set_conventions(&mut self, source_set: &str) {
        let supported = self
            .toolchain
            .is_none_or(|v| v.is_compatible_with(JavaVersion::MINIMUM_SUPPORTED));
        self.options.enabled_by_convention(supported);
        self.options
            .compiling_test_only_code_by_convention(is_test_source_set(source_set));
        self.source_set = Some(source_set.to_string());
    }

    /// Forking with a custom Java home or executable: the compiler version
    /// cannot be known.
    pub fn is_command_line(&self) -> bool {
        self.fork
            && (self.fork_options.java_home.is_some() || self.fork_options.executable.is_some())
    }

    /// Version of the compiler this task runs.
    ///
    /// The toolchain version if configured; unknown for a command-line
    /// compiler; otherwise the runtime executing the build tool.
    pub fn compiler_version(&self, current: JavaVersion) -> Option<JavaVersion> {
        match self.toolchain {
            Some(version) => Some(version),
            None if self.is_command_line() => None,
            None => Some(current),
        }
    }

    pub fn toolchain_descriptor(&self, current: JavaVersion) -> Option<Toolchain> {
        self.compiler_version(current)
            .map(|version| Toolchain::new(version, current))
    }

    /// Arguments appended to the compiler command line.
    pub fn compiler_arguments(&self) -> ArgsResult<Vec<String>> {
        assembler::compiler_arguments(&self.options)
    }

    /// JVM arguments the plugin contributes to the forked compiler.
    pub fn jvm_arguments(&self, current: JavaVersion) -> Vec<String> {
        crate::toolchain::jvm_arguments(&self.options, self.toolchain_descriptor(current))
    }

    /// User JVM arguments followed by the plugin's.
    pub fn all_jvm_arguments(&self, current: JavaVersion) -> Vec<String> {
        let mut args = self.fork_options.jvm_args.clone();
        args.extend(self.jvm_arguments(current));
        args
    }

    /// Decide, right before compiling, whether the task must fork, and apply it.
    pub fn configure_forking(&mut self, runtime: &RuntimeInfo<'_>) -> ArgsResult<ForkDecision> {
        let decision = decide_fork(
            self.options.is_enabled(),
            self.toolchain_descriptor(runtime.version),
            self.fork,
            || runtime.needs_grants(),
        )?;
        if decision.apply(&mut self.fork) {
            tracing::debug!(task = %self.name, "forcing out-of-process compilation");
        }
        Ok(decision)
    }
}
