//! Check severity levels

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a single Error Prone check.
///
/// `Default` leaves the check at the severity the check author chose; the
/// other variants override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[schemars(description = "Severity of an Error Prone check")]
pub enum CheckSeverity {
    /// Keep the check's own default severity
    #[default]
    Default,
    /// Disable the check
    Off,
    /// Report findings as warnings
    Warn,
    /// Report findings as errors
    Error,
}

impl CheckSeverity {
    pub const ALL: [CheckSeverity; 4] = [
        CheckSeverity::Default,
        CheckSeverity::Off,
        CheckSeverity::Warn,
        CheckSeverity::Error,
    ];

    /// Suffix appended to `-Xep:<name>`: empty for `Default`, `:<NAME>` otherwise.
    pub fn as_arg(self) -> &'static str {
        match self {
            CheckSeverity::Default => "",
            CheckSeverity::Off => ":OFF",
            CheckSeverity::Warn => ":WARN",
            CheckSeverity::Error => ":ERROR",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CheckSeverity::Default => "DEFAULT",
            CheckSeverity::Off => "OFF",
            CheckSeverity::Warn => "WARN",
            CheckSeverity::Error => "ERROR",
        }
    }
}

impl fmt::Display for CheckSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CheckSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckSeverity::ALL
            .into_iter()
            .find(|severity| severity.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown check severity '{}', expected one of DEFAULT, OFF, WARN, ERROR",
                    s
                )
            })
    }
}

/// Accepts the same spellings as [`FromStr`]: names are case-insensitive.
impl<'de> Deserialize<'de> for CheckSeverity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
