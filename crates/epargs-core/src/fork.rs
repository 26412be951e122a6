//! Whether the compiler must run out of process.
//!
//! JVM arguments can only be applied to a process being started, so when the
//! in-process compiler would need grants the task has to fork.

use crate::error::{ArgsError, ArgsResult};
use crate::toolchain::{JavaVersion, Toolchain};
use serde::Serialize;

/// Outcome of the fork decision for one compile task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ForkDecision {
    /// The plugin is disabled; nothing to do.
    Disabled,
    /// The plugin runs on a supported compiler.
    Supported {
        /// The task must be switched to out-of-process compilation.
        force_fork: bool,
    },
}

impl ForkDecision {
    pub fn forces_fork(self) -> bool {
        matches!(self, ForkDecision::Supported { force_fork: true })
    }

    /// Apply the decision to a task's fork flag.
    ///
    /// Only ever sets the flag; an explicit `true` is never reverted.
    /// Returns whether the flag was changed.
    pub fn apply(self, fork: &mut bool) -> bool {
        if self.forces_fork() && !*fork {
            *fork = true;
            return true;
        }
        false
    }
}

/// Decide how the compiler must be launched.
///
/// `current_runtime_needs_grants` is only called when it matters: the plugin
/// is enabled, the task is not already forking and the compiler is the
/// runtime executing the build tool.
///
/// Fails with [`ArgsError::UnsupportedToolchain`] when the plugin is enabled
/// and the compiler version is unknown or older than
/// [`JavaVersion::MINIMUM_SUPPORTED`], whether or not the task forks.
pub fn decide_fork<F>(
    enabled: bool,
    toolchain: Option<Toolchain>,
    fork_requested: bool,
    current_runtime_needs_grants: F,
) -> ArgsResult<ForkDecision>
where
    F: FnOnce() -> ArgsResult<bool>,
{
    if !enabled {
        return Ok(ForkDecision::Disabled);
    }

    let toolchain = match toolchain {
        Some(toolchain)
            if toolchain
                .version
                .is_compatible_with(JavaVersion::MINIMUM_SUPPORTED) =>
        {
            toolchain
        }
        other => {
            return Err(ArgsError::UnsupportedToolchain {
                floor: JavaVersion::MINIMUM_SUPPORTED.major(),
                found: other.map(|t| t.version.major()),
            });
        }
    };

    let force_fork =
        !fork_requested && toolchain.is_current_runtime && current_runtime_needs_grants()?;
    tracing::debug!(
        version = %toolchain.version,
        is_current_runtime = toolchain.is_current_runtime,
        fork_requested,
        force_fork,
        "fork decision"
    );
    Ok(ForkDecision::Supported { force_fork })
}
