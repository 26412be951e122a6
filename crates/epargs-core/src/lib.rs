//! # epargs-core
//!
//! Core of the Error Prone compiler integration.
//!
//! Covers:
//! - Check severities and the options model
//! - Rendering options into `-Xplugin:ErrorProne ...` compiler arguments
//! - Validation of check names and rendered arguments
//! - Toolchain compatibility and the JVM grants needed on JDK 16+
//! - Deciding whether the compiler must be forked

pub mod assembler;
pub mod config;
pub mod error;
pub mod fork;
pub mod providers;
pub mod severity;
pub mod task;
pub mod toolchain;
pub mod validation;

pub use assembler::{
    COMPANION_COMPILER_ARGS, PLUGIN_NAME, assemble, compiler_arguments, plugin_directive,
};
pub use config::{
    BuildConfig, ConfigWarning, DEFAULT_CONFIG_FILE, Deferred, ErrorProneOptions,
    ErrorProneOptionsBuilder, RuntimeConfig, TaskConfig, generate_schema,
};
pub use error::{ArgsError, ArgsResult};
pub use fork::{ForkDecision, decide_fork};
pub use providers::{ArgumentProvider, ArgumentProviders, StaticArguments};
pub use severity::CheckSeverity;
pub use task::{CompileTask, ForkOptions, RuntimeInfo, is_test_source_set};
pub use toolchain::{
    GrantRequirement, JVM_ARGS_STRONG_ENCAPSULATION, JavaVersion, JvmOptionsAccess,
    MockModuleAccess, ModuleAccess, PackageAccess, RuntimeProbe, Toolchain, jvm_arguments,
};
