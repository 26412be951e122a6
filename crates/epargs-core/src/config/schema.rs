use super::*;
use regex::Regex;
use std::collections::HashMap;

/// Raw flags that duplicate a boolean toggle, paired with the toggle's field name.
const TOGGLE_FLAGS: &[(&str, &str)] = &[
    ("-XepDisableAllChecks", "disable_all_checks"),
    ("-XepDisableAllWarnings", "disable_all_warnings"),
    ("-XepAllErrorsAsWarnings", "all_errors_as_warnings"),
    ("-XepAllSuggestionsAsWarnings", "all_suggestions_as_warnings"),
    ("-XepAllDisabledChecksAsWarnings", "all_disabled_checks_as_warnings"),
    (
        "-XepDisableWarningsInGeneratedCode",
        "disable_warnings_in_generated_code",
    ),
    ("-XepIgnoreUnknownCheckNames", "ignore_unknown_check_names"),
    ("-XepIgnoreSuppressionAnnotations", "ignore_suppression_annotations"),
    ("-XepCompilingTestOnlyCode", "compiling_test_only_code"),
];

impl ErrorProneOptions {
    /// Validate the options and return any warnings.
    ///
    /// This never fails and never reports what rendering rejects (colons in
    /// check names, white space in arguments); it only points at likely
    /// mistakes:
    /// - `excluded_paths` that is not a valid regular expression
    /// - check names that differ only by case
    /// - check option names written as full `-XepOpt:` flags
    /// - raw arguments duplicating a boolean toggle
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Some(pattern) = &self.excluded_paths {
            if let Err(e) = Regex::new(pattern) {
                warnings.push(ConfigWarning {
                    field: "errorprone.excluded_paths".to_string(),
                    message: format!("'{}' is not a valid regular expression: {}", pattern, e),
                    suggestion: Some(
                        "Error Prone matches excluded paths as a Java regular expression"
                            .to_string(),
                    ),
                });
            }
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for name in self.checks.keys() {
            if let Some(previous) = seen.insert(name.to_lowercase(), name) {
                warnings.push(ConfigWarning {
                    field: "errorprone.checks".to_string(),
                    message: format!(
                        "checks '{}' and '{}' differ only by case; check names are case-sensitive",
                        previous, name
                    ),
                    suggestion: None,
                });
            }
        }

        for name in self.check_options.keys() {
            if name.starts_with("-XepOpt:") {
                warnings.push(ConfigWarning {
                    field: "errorprone.check_options".to_string(),
                    message: format!("option name '{}' already contains the -XepOpt: prefix", name),
                    suggestion: Some(format!(
                        "use '{}' as the option name",
                        name.trim_start_matches("-XepOpt:")
                    )),
                });
            }
        }

        for arg in &self.extra_args {
            if let Some((flag, field)) = TOGGLE_FLAGS.iter().find(|(flag, _)| arg == flag) {
                warnings.push(ConfigWarning {
                    field: "errorprone.extra_args".to_string(),
                    message: format!("'{}' is passed as a raw argument", flag),
                    suggestion: Some(format!("set errorprone.{} = true instead", field)),
                });
            }
        }

        warnings
    }
}

/// Generate a JSON Schema for the [`BuildConfig`] file format.
///
/// This can be used to provide editor autocompletion and validation
/// for `.epargs.toml` configuration files.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(BuildConfig)
}
