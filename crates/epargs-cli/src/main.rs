//! epargs CLI: renders Error Prone compiler and JVM arguments for a compile task.

mod args_file;
mod output;
mod runtime;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use epargs_core::{BuildConfig, CompileTask, RuntimeConfig, RuntimeInfo};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::args_file::ArgsFileProvider;
use crate::output::{LaunchPlan, OutputFormat};
use crate::runtime::RuntimeEnv;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "EPARGS_LOG";

#[derive(Parser, Debug)]
#[command(name = "epargs", version, about = "Error Prone compiler argument planner")]
struct Cli {
    /// Configuration file (defaults to .epargs.toml in the working directory)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Source set whose primary compilation the task drives
    #[arg(long, global = true)]
    source_set: Option<String>,

    /// Toolchain language version (e.g. 17)
    #[arg(long, global = true)]
    toolchain: Option<String>,

    /// Run the compiler in a separate process
    #[arg(long, global = true)]
    fork: bool,

    /// Version of the runtime executing the build tool
    #[arg(long, global = true)]
    runtime_version: Option<String>,

    /// File with extra Error Prone arguments, one per line
    #[arg(long, global = true)]
    args_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the arguments appended to the compiler command line
    CompilerArgs,
    /// Print the JVM arguments of the forked compiler
    JvmArgs,
    /// Decide whether the compiler must fork and print the launch plan
    Plan,
    /// Print the JSON schema of the configuration file
    Schema,
    /// Validate the configuration
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Schema => {
            let schema = epargs_core::generate_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::CompilerArgs => {
            let (task, _) = load_task(&cli)?;
            let args = task.compiler_arguments()?;
            output::print_list(cli.format, &args)?;
        }
        Commands::JvmArgs => {
            let (task, runtime_config) = load_task(&cli)?;
            let detected = runtime::detect(&runtime_config, &RuntimeEnv::from_env())?;
            let args = task.all_jvm_arguments(detected.version);
            output::print_list(cli.format, &args)?;
        }
        Commands::Plan => {
            let (mut task, runtime_config) = load_task(&cli)?;
            let detected = runtime::detect(&runtime_config, &RuntimeEnv::from_env())?;
            let current = detected.version;
            let runtime = RuntimeInfo::current(current, Arc::new(detected.access));
            let fork_requested = task.fork;
            let decision = task.configure_forking(&runtime)?;
            let plan = LaunchPlan {
                task: task.name.clone(),
                source_set: task.source_set.clone(),
                enabled: task.options.is_enabled(),
                runtime_version: current,
                compiler_version: task.compiler_version(current),
                fork_requested,
                decision,
                fork: task.fork,
                compiler_args: task.compiler_arguments()?,
                jvm_args: task.all_jvm_arguments(current),
            };
            output::print_plan(cli.format, &plan)?;
        }
        Commands::Check => {
            let (task, _) = load_task(&cli)?;
            let warnings = task.options.validate();
            let rendered = task.compiler_arguments();
            output::print_check(cli.format, &warnings, rendered.as_ref().err())?;
            if rendered.is_err() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Load the configuration, apply command-line overrides and build the task.
fn load_task(cli: &Cli) -> Result<(CompileTask, RuntimeConfig)> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let mut config = BuildConfig::load_or_default(cli.config.as_deref(), &cwd)?;
    apply_overrides(cli, &mut config);
    let runtime_config = config.runtime.clone();

    let mut task = CompileTask::from_config(config)?;
    if let Some(path) = &cli.args_file {
        task.options.argument_provider(ArgsFileProvider::open(path)?);
    }
    tracing::debug!(task = %task.name, enabled = task.options.is_enabled(), "compile task configured");
    Ok((task, runtime_config))
}

/// Command-line flags take precedence over the configuration file.
fn apply_overrides(cli: &Cli, config: &mut BuildConfig) {
    if let Some(source_set) = &cli.source_set {
        config.task.source_set = Some(source_set.clone());
    }
    if let Some(toolchain) = &cli.toolchain {
        config.task.toolchain = Some(toolchain.clone());
    }
    if cli.fork {
        config.task.fork = true;
    }
    if let Some(version) = &cli.runtime_version {
        config.runtime.version = Some(version.clone());
    }
}
