//! Toolchain versions and the JVM arguments the plugin needs on them
//!
//! Error Prone reaches into `jdk.compiler` internals. On JDK 16+ those
//! packages are strongly encapsulated, so the compiler JVM must be started
//! with explicit `--add-exports`/`--add-opens` grants.

use crate::config::ErrorProneOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod probe;

pub use probe::{
    EXPORTED_TYPES, GrantRequirement, JvmOptionsAccess, LookupError, MockModuleAccess,
    ModuleAccess, OPENED_TYPES, PackageAccess, RuntimeProbe, current_runtime_probe,
    probe_grants,
};

/// Grants exposing the compiler internals used by Error Prone to unnamed modules.
///
/// Every package owning a type in [`EXPORTED_TYPES`] or [`OPENED_TYPES`] is
/// listed here.
pub const JVM_ARGS_STRONG_ENCAPSULATION: &[&str] = &[
    "--add-exports=jdk.compiler/com.sun.tools.javac.api=ALL-UNNAMED",
    "--add-exports=jdk.compiler/com.sun.tools.javac.file=ALL-UNNAMED",
    "--add-exports=jdk.compiler/com.sun.tools.javac.main=ALL-UNNAMED",
    "--add-exports=jdk.compiler/com.sun.tools.javac.model=ALL-UNNAMED",
    "--add-exports=jdk.compiler/com.sun.tools.javac.parser=ALL-UNNAMED",
    "--add-exports=jdk.compiler/com.sun.tools.javac.processing=ALL-UNNAMED",
    "--add-exports=jdk.compiler/com.sun.tools.javac.tree=ALL-UNNAMED",
    "--add-exports=jdk.compiler/com.sun.tools.javac.util=ALL-UNNAMED",
    "--add-opens=jdk.compiler/com.sun.tools.javac.code=ALL-UNNAMED",
    "--add-opens=jdk.compiler/com.sun.tools.javac.comp=ALL-UNNAMED",
];

/// Major version of a Java runtime or language level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct JavaVersion(u32);

impl JavaVersion {
    pub const VERSION_1_8: JavaVersion = JavaVersion(8);
    pub const VERSION_11: JavaVersion = JavaVersion(11);
    pub const VERSION_16: JavaVersion = JavaVersion(16);

    /// Lowest compiler version the plugin may run on.
    pub const MINIMUM_SUPPORTED: JavaVersion = JavaVersion::VERSION_11;

    /// First version enforcing strong encapsulation of JDK internals.
    pub const STRONG_ENCAPSULATION: JavaVersion = JavaVersion::VERSION_16;

    pub const fn of(major: u32) -> Self {
        JavaVersion(major)
    }

    pub const fn major(self) -> u32 {
        self.0
    }

    /// True if code for `other` can be compiled or run on this version.
    pub fn is_compatible_with(self, other: JavaVersion) -> bool {
        self >= other
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= 8 {
            write!(f, "1.{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for JavaVersion {
    type Err = String;

    /// Accepts `8`, `1.8`, `1.8.0_292`, `17`, `17.0.2`, `21-ea` and quoted forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('"');
        let mut components = trimmed.split(['.', '_', '-', '+']);
        let first = components.next().unwrap_or_default();
        let major_text = if first == "1" {
            components.next().unwrap_or_default()
        } else {
            first
        };
        match major_text.parse::<u32>() {
            Ok(major) if major > 0 => Ok(JavaVersion(major)),
            _ => Err(format!("invalid Java version '{}'", s)),
        }
    }
}

/// The compiler runtime a task will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    pub version: JavaVersion,
    /// Same runtime as the one executing the build tool.
    pub is_current_runtime: bool,
}

impl Toolchain {
    pub fn new(version: JavaVersion, current: JavaVersion) -> Self {
        Self {
            version,
            is_current_runtime: version == current,
        }
    }
}

/// JVM arguments the forked compiler needs for the plugin.
///
/// Empty when the plugin is disabled, when no compiler version could be
/// determined, or when the compiler is older than
/// [`JavaVersion::MINIMUM_SUPPORTED`]. Otherwise the fixed
/// [`JVM_ARGS_STRONG_ENCAPSULATION`] list, independently of whether the
/// toolchain is the current runtime.
pub fn jvm_arguments(options: &ErrorProneOptions, toolchain: Option<Toolchain>) -> Vec<String> {
    if !options.is_enabled() {
        return Vec::new();
    }
    match toolchain {
        Some(toolchain)
            if toolchain
                .version
                .is_compatible_with(JavaVersion::MINIMUM_SUPPORTED) =>
        {
            JVM_ARGS_STRONG_ENCAPSULATION
                .iter()
                .map(|s| s.to_string())
                .collect()
        }
        _ => Vec::new(),
    }
}
