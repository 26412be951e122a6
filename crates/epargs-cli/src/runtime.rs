//! Detection of the runtime executing the build tool.
//!
//! The version comes from `[runtime].version` (or `--runtime-version`), else
//! from the `release` file of the Java home. The module access granted to the
//! plugin is derived from the JVM options the runtime runs with.

use anyhow::{Context, Result, bail};
use epargs_core::{JavaVersion, JvmOptionsAccess, RuntimeConfig};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const COMPILER_MODULE: &str = "jdk.compiler";

/// Values read from `$JAVA_HOME/release`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub java_version: Option<String>,
    pub modules: Option<Vec<String>>,
}

impl ReleaseInfo {
    /// Parse `KEY="value"` lines; unknown keys are ignored.
    pub fn parse(content: &str) -> Self {
        let values: HashMap<&str, &str> = content
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim(), value.trim().trim_matches('"')))
            .collect();
        Self {
            java_version: values.get("JAVA_VERSION").map(|v| v.to_string()),
            modules: values
                .get("MODULES")
                .map(|v| v.split_whitespace().map(str::to_string).collect()),
        }
    }

    /// Read the release file of a Java home, if it has one.
    pub fn read(java_home: &Path) -> Result<Option<Self>> {
        let path = java_home.join("release");
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no release file");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(Self::parse(&content)))
    }

    /// Without a `MODULES` line the runtime is assumed to be a full JDK.
    pub fn has_compiler_module(&self) -> bool {
        self.modules
            .as_ref()
            .is_none_or(|modules| modules.iter().any(|m| m == COMPILER_MODULE))
    }
}

/// Process environment relevant to runtime detection.
#[derive(Debug, Clone, Default)]
pub struct RuntimeEnv {
    pub java_home: Option<PathBuf>,
    pub jdk_java_options: Option<String>,
}

impl RuntimeEnv {
    pub fn from_env() -> Self {
        Self {
            java_home: std::env::var_os("JAVA_HOME").map(PathBuf::from),
            jdk_java_options: std::env::var("JDK_JAVA_OPTIONS").ok(),
        }
    }
}

#[derive(Debug)]
pub struct DetectedRuntime {
    pub version: JavaVersion,
    pub access: JvmOptionsAccess,
}

pub fn detect(config: &RuntimeConfig, env: &RuntimeEnv) -> Result<DetectedRuntime> {
    let java_home = config.java_home.as_ref().or(env.java_home.as_ref());
    let release = match java_home {
        Some(home) => ReleaseInfo::read(home)?,
        None => None,
    };

    let version = match (&config.version, release.as_ref().and_then(|r| r.java_version.as_ref())) {
        (Some(version), _) => version
            .parse::<JavaVersion>()
            .map_err(anyhow::Error::msg)
            .context("Invalid runtime version")?,
        (None, Some(version)) => version
            .parse::<JavaVersion>()
            .map_err(anyhow::Error::msg)
            .context("Invalid JAVA_VERSION in release file")?,
        (None, None) => bail!(
            "Cannot determine the runtime version: set [runtime].version, pass --runtime-version or point JAVA_HOME at a JDK"
        ),
    };

    let has_compiler_module = release.as_ref().is_none_or(ReleaseInfo::has_compiler_module);
    let jvm_args: Vec<&str> = config
        .jvm_args
        .iter()
        .map(String::as_str)
        .chain(env.jdk_java_options.iter().flat_map(|o| o.split_whitespace()))
        .collect();
    tracing::debug!(%version, has_compiler_module, jvm_args = jvm_args.len(), "detected runtime");

    Ok(DetectedRuntime {
        version,
        access: JvmOptionsAccess::new(has_compiler_module, jvm_args),
    })
}
