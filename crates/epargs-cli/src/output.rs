//! Text and JSON rendering of command results.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use epargs_core::{ArgsError, ConfigWarning, ForkDecision, JavaVersion};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything decided for one compile task, right before compilation.
#[derive(Debug, Serialize)]
pub struct LaunchPlan {
    pub task: String,
    pub source_set: Option<String>,
    pub enabled: bool,
    pub runtime_version: JavaVersion,
    pub compiler_version: Option<JavaVersion>,
    pub fork_requested: bool,
    pub decision: ForkDecision,
    pub fork: bool,
    pub compiler_args: Vec<String>,
    pub jvm_args: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    valid: bool,
    error: Option<String>,
    warnings: Vec<WarningEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct WarningEntry<'a> {
    field: &'a str,
    message: &'a str,
    suggestion: Option<&'a str>,
}

pub fn print_list(format: OutputFormat, items: &[String]) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}

pub fn print_plan(format: OutputFormat, plan: &LaunchPlan) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", format_plan(plan)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(plan)?),
    }
    Ok(())
}

fn format_plan(plan: &LaunchPlan) -> String {
    let mut out = String::new();
    match &plan.source_set {
        Some(source_set) => {
            out.push_str(&format!("task:             {} (source set {})\n", plan.task, source_set))
        }
        None => out.push_str(&format!("task:             {}\n", plan.task)),
    }
    out.push_str(&format!("enabled:          {}\n", plan.enabled));
    out.push_str(&format!("runtime version:  {}\n", plan.runtime_version));
    let compiler = match plan.compiler_version {
        Some(version) if version == plan.runtime_version => format!("{} (current runtime)", version),
        Some(version) => version.to_string(),
        None => "unknown".to_string(),
    };
    out.push_str(&format!("compiler version: {}\n", compiler));
    let fork = if plan.decision.forces_fork() {
        format!("{} -> {} (forced)", plan.fork_requested, plan.fork)
    } else {
        plan.fork.to_string()
    };
    out.push_str(&format!("fork:             {}\n", fork));
    push_section(&mut out, "compiler args", &plan.compiler_args);
    if plan.fork {
        push_section(&mut out, "jvm args", &plan.jvm_args);
    }
    out
}

fn push_section(out: &mut String, title: &str, items: &[String]) {
    out.push_str(&format!("{}:\n", title));
    if items.is_empty() {
        out.push_str("  (none)\n");
    }
    for item in items {
        out.push_str(&format!("  {}\n", item));
    }
}

pub fn print_check(
    format: OutputFormat,
    warnings: &[ConfigWarning],
    error: Option<&ArgsError>,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for warning in warnings {
                eprintln!(
                    "{} {}: {}",
                    "warning:".yellow().bold(),
                    warning.field,
                    warning.message
                );
                if let Some(suggestion) = &warning.suggestion {
                    eprintln!("  {} {}", "help:".cyan(), suggestion);
                }
            }
            match error {
                Some(e) => eprintln!("{} {}", "error:".red().bold(), e),
                None => println!(
                    "{} configuration is valid ({} warning{})",
                    "ok:".green().bold(),
                    warnings.len(),
                    if warnings.len() == 1 { "" } else { "s" }
                ),
            }
        }
        OutputFormat::Json => {
            let report = CheckReport {
                valid: error.is_none(),
                error: error.map(|e| e.to_string()),
                warnings: warnings
                    .iter()
                    .map(|w| WarningEntry {
                        field: &w.field,
                        message: &w.message,
                        suggestion: w.suggestion.as_deref(),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
