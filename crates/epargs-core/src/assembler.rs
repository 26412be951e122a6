//! Rendering of [`ErrorProneOptions`] into compiler arguments.
//!
//! Order matters: Error Prone applies flags left to right, so later flags
//! (checks, options, raw arguments, providers) override the global toggles.

use crate::config::ErrorProneOptions;
use crate::error::ArgsResult;
use crate::validation::{validate_check_name, validate_no_whitespace};

/// Name of the javac plugin, as passed to `-Xplugin:`.
pub const PLUGIN_NAME: &str = "ErrorProne";

/// Compiler flags always passed alongside the plugin directive.
pub const COMPANION_COMPILER_ARGS: &[&str] = &[
    "-XDcompilePolicy=simple",
    "--should-stop=ifError=FLOW",
    // Needed by recent Error Prone releases on JDK 21, harmless elsewhere.
    "-XDaddTypeAnnotationsToSymbol=true",
];

/// Render the options into the ordered list of Error Prone arguments.
///
/// Returns an empty list when the plugin is disabled, without reading any
/// other field. Otherwise every check name is checked for colons and every
/// produced argument for white space; the first violation aborts rendering.
pub fn assemble(options: &ErrorProneOptions) -> ArgsResult<Vec<String>> {
    if !options.is_enabled() {
        return Ok(Vec::new());
    }

    let toggles = [
        ("-XepDisableAllChecks", options.disable_all_checks),
        ("-XepDisableAllWarnings", options.disable_all_warnings),
        ("-XepAllErrorsAsWarnings", options.all_errors_as_warnings),
        (
            "-XepAllSuggestionsAsWarnings",
            options.all_suggestions_as_warnings,
        ),
        (
            "-XepAllDisabledChecksAsWarnings",
            options.all_disabled_checks_as_warnings,
        ),
        (
            "-XepDisableWarningsInGeneratedCode",
            options.disable_warnings_in_generated_code,
        ),
        (
            "-XepIgnoreUnknownCheckNames",
            options.ignore_unknown_check_names,
        ),
        (
            "-XepIgnoreSuppressionAnnotations",
            options.ignore_suppression_annotations,
        ),
        (
            "-XepCompilingTestOnlyCode",
            options.is_compiling_test_only_code(),
        ),
    ];

    let mut args: Vec<String> = toggles
        .iter()
        .filter(|(_, set)| *set)
        .map(|(flag, _)| flag.to_string())
        .collect();

    if let Some(pattern) = &options.excluded_paths {
        args.push(format!("-XepExcludedPaths:{}", pattern));
    }

    for (name, severity) in options.checks.iter() {
        validate_check_name(name)?;
        args.push(format!("-Xep:{}{}", name, severity.get().as_arg()));
    }

    // Option names are not checked for colons: "NullAway:Mode" is legal.
    for (name, value) in options.check_options.iter() {
        args.push(format!("-XepOpt:{}={}", name, value.get()));
    }

    args.extend(options.extra_args.iter().cloned());

    for provider in options.argument_providers.iter() {
        let produced = provider.arguments()?;
        tracing::trace!(
            provider = provider.name(),
            count = produced.len(),
            "argument provider evaluated"
        );
        args.extend(produced);
    }

    for arg in &args {
        validate_no_whitespace(arg)?;
    }

    tracing::debug!(count = args.len(), "rendered Error Prone arguments");
    Ok(args)
}

/// The `-Xplugin:ErrorProne ...` directive: plugin name and arguments joined by single spaces.
pub fn plugin_directive(args: &[String]) -> String {
    let mut directive = format!("-Xplugin:{}", PLUGIN_NAME);
    for arg in args {
        directive.push(' ');
        directive.push_str(arg);
    }
    directive
}

/// Full list of arguments to append to the compiler command line.
///
/// Empty when the plugin is disabled; otherwise the plugin directive followed
/// by [`COMPANION_COMPILER_ARGS`].
pub fn compiler_arguments(options: &ErrorProneOptions) -> ArgsResult<Vec<String>> {
    if !options.is_enabled() {
        return Ok(Vec::new());
    }
    let args = assemble(options)?;
    let mut compiler_args = Vec::with_capacity(1 + COMPANION_COMPILER_ARGS.len());
    compiler_args.push(plugin_directive(&args));
    compiler_args.extend(COMPANION_COMPILER_ARGS.iter().map(|s| s.to_string()));
    Ok(compiler_args)
}
