//! Error types for argument assembly and toolchain detection

use std::path::PathBuf;
use thiserror::Error;

pub type ArgsResult<T> = Result<T, ArgsError>;

/// Errors raised while rendering arguments or deciding how to launch the compiler.
///
/// All variants are local and synchronous: nothing is handed to the compiler
/// process once one of them has been returned.
#[derive(Error, Debug)]
pub enum ArgsError {
    /// User-supplied data violates a syntactic invariant of the rendered flags.
    #[error("{message}")]
    InvalidConfiguration { message: String, value: String },

    /// The plugin is enabled on a compiler runtime below the supported floor.
    #[error("Must not enable ErrorProne when compiling with JDK < {floor}")]
    UnsupportedToolchain {
        floor: u32,
        /// Resolved compiler version, if one could be determined.
        found: Option<u32>,
    },

    /// The toolchain probe itself is broken; this is a defect, not a user error.
    #[error("toolchain probe invariant violated while inspecting {type_name}: {message}")]
    Internal { type_name: String, message: String },

    /// An argument provider could not produce its arguments.
    #[error("Argument provider '{name}' failed: {message}")]
    Provider { name: String, message: String },

    #[error("Failed to load configuration: {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ArgsError {
    pub(crate) fn colon_in_check_name(name: &str) -> Self {
        Self::InvalidConfiguration {
            message: format!(
                "Error Prone check name cannot contain a colon (\":\"): \"{}\".",
                name
            ),
            value: name.to_string(),
        }
    }

    pub(crate) fn whitespace_in_argument(arg: &str) -> Self {
        Self::InvalidConfiguration {
            message: format!(
                "Error Prone options cannot contain white space: \"{}\".",
                arg
            ),
            value: arg.to_string(),
        }
    }

    /// True for errors caused by user configuration rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ArgsError::InvalidConfiguration { .. }
                | ArgsError::Provider { .. }
                | ArgsError::Config { .. }
        )
    }
}
