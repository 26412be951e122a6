//! Argument provider backed by a file, read each time arguments are rendered.

use anyhow::{Context, Result};
use epargs_core::{ArgsError, ArgsResult, ArgumentProvider};
use std::path::{Path, PathBuf};

/// One argument per line; blank lines and `#` comments are skipped.
///
/// Lines are only trimmed at the ends, so an argument with inner white
/// space is passed through and rejected when rendered.
#[derive(Debug, Clone)]
pub struct ArgsFileProvider {
    path: PathBuf,
}

impl ArgsFileProvider {
    /// Fails if the file cannot be read now.
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::metadata(path)
            .with_context(|| format!("Failed to read argument file: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

pub fn parse_args(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

impl ArgumentProvider for ArgsFileProvider {
    fn name(&self) -> &str {
        "args-file"
    }

    fn arguments(&self) -> ArgsResult<Vec<String>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| ArgsError::Provider {
            name: self.name().to_string(),
            message: format!("cannot read {}: {}", self.path.display(), e),
        })?;
        Ok(parse_args(&content))
    }
}
