//! Cross-crate integration tests verifying contracts between workspace crates.
//!
//! These tests simulate how the CLI (or any other host) drives epargs-core:
//! load a configuration, attach providers, render arguments and decide the
//! launch mode against a runtime description.

use epargs_core::{
    ArgsResult, ArgumentProvider, BuildConfig, CompileTask, ErrorProneOptions, ForkDecision, JavaVersion,
    JvmOptionsAccess, RuntimeInfo, RuntimeProbe,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Configuration contracts
// ============================================================================

#[test]
fn config_file_round_trips_through_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(epargs_core::DEFAULT_CONFIG_FILE);
    std::fs::write(
        &path,
        "[errorprone]\nall_errors_as_warnings = true\n\n[task]\nsource_set = \"main\"\n",
    )
    .unwrap();

    let config = BuildConfig::load_or_default(None, dir.path()).unwrap();
    let task = CompileTask::from_config(config).unwrap();
    assert_eq!(
        task.compiler_arguments().unwrap()[0],
        "-Xplugin:ErrorProne -XepAllErrorsAsWarnings"
    );
}

#[test]
fn config_errors_carry_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[errorprone]\nunknown = 1\n").unwrap();
    let err = BuildConfig::load(&path).unwrap_err();
    assert!(err.is_user_error());
    assert!(err.to_string().contains("bad.toml"));
    assert!(std::error::Error::source(&err).is_some());
}

// ============================================================================
// Provider contracts
// ============================================================================

#[derive(Debug)]
struct HostProvider;

impl ArgumentProvider for HostProvider {
    fn name(&self) -> &str {
        "host"
    }

    fn arguments(&self) -> ArgsResult<Vec<String>> {
        Ok(vec!["-XepOpt:NullAway:AnnotatedPackages=com.example".to_string()])
    }
}

#[derive(Debug, Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

impl ArgumentProvider for CountingProvider {
    fn arguments(&self) -> ArgsResult<Vec<String>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![format!("-XepOpt:Host:Call={}", call)])
    }
}

#[test]
fn host_providers_render_after_configured_arguments() {
    let mut options = ErrorProneOptions::builder()
        .enabled(true)
        .arg("-XepPatchChecks:Foo")
        .build();
    options.argument_provider(HostProvider);
    assert_eq!(options.argument_providers.names(), vec!["host"]);
    assert_eq!(
        epargs_core::assemble(&options).unwrap(),
        vec![
            "-XepPatchChecks:Foo",
            "-XepOpt:NullAway:AnnotatedPackages=com.example"
        ]
    );
}

#[test]
fn one_shared_provider_serves_several_tasks() {
    let shared = Arc::new(CountingProvider::default());

    let mut main = CompileTask::for_source_set("main");
    main.options.shared_argument_provider(shared.clone());
    let mut test = CompileTask::for_source_set("test");
    test.options.shared_argument_provider(shared.clone());

    assert_eq!(main.options.argument_providers.names(), vec!["CountingProvider"]);
    assert_eq!(
        epargs_core::assemble(&main.options).unwrap(),
        vec!["-XepOpt:Host:Call=0"]
    );
    assert_eq!(
        epargs_core::assemble(&test.options).unwrap(),
        vec!["-XepCompilingTestOnlyCode", "-XepOpt:Host:Call=1"]
    );
    assert_eq!(shared.calls.load(Ordering::SeqCst), 2);
    assert_eq!(Arc::strong_count(&shared), 3);
}

// ============================================================================
// Launch contracts
// ============================================================================

#[test]
fn host_runtime_description_drives_fork_decision() {
    let probe = RuntimeProbe::new();
    let access = JvmOptionsAccess::new(true, ["-Xmx2g"]);
    let runtime = RuntimeInfo::with_probe(JavaVersion::of(21), Arc::new(access), &probe);

    let mut task = CompileTask::for_source_set("test");
    let decision = task.configure_forking(&runtime).unwrap();
    assert_eq!(decision, ForkDecision::Supported { force_fork: true });
    assert!(task.fork);
    assert_eq!(probe.cached(), Some(true));

    let jvm_args = task.all_jvm_arguments(runtime.version);
    assert_eq!(jvm_args, epargs_core::JVM_ARGS_STRONG_ENCAPSULATION.to_vec());
}

#[test]
fn disabled_task_never_touches_the_runtime() {
    let probe = RuntimeProbe::new();
    let runtime = RuntimeInfo::with_probe(
        JavaVersion::of(21),
        Arc::new(JvmOptionsAccess::new(true, Vec::<String>::new())),
        &probe,
    );
    let mut task = CompileTask::new("compileCustomJava");
    assert_eq!(task.configure_forking(&runtime).unwrap(), ForkDecision::Disabled);
    assert_eq!(probe.cached(), None);
    assert!(!task.fork);
}
