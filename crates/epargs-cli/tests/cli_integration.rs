use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn epargs(dir: &TempDir) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("epargs");
    cmd.current_dir(dir.path())
        .env_remove("JAVA_HOME")
        .env_remove("JDK_JAVA_OPTIONS")
        .env_remove("EPARGS_LOG");
    cmd
}

fn project(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".epargs.toml"), config).unwrap();
    dir
}

const MAIN_TASK: &str = r#"
[errorprone]
disable_all_checks = true

[errorprone.checks]
Foo = "ERROR"

[errorprone.check_options]
"NullAway:Mode" = "Strict"

[task]
source_set = "main"
"#;

#[test]
fn test_compiler_args_text() {
    let dir = project(MAIN_TASK);
    epargs(&dir)
        .arg("compiler-args")
        .assert()
        .success()
        .stdout(
            "-Xplugin:ErrorProne -XepDisableAllChecks -Xep:Foo:ERROR -XepOpt:NullAway:Mode=Strict\n\
             -XDcompilePolicy=simple\n\
             --should-stop=ifError=FLOW\n\
             -XDaddTypeAnnotationsToSymbol=true\n",
        );
}

#[test]
fn test_compiler_args_json() {
    let dir = project(MAIN_TASK);
    let output = epargs(&dir)
        .args(["--format", "json", "compiler-args"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let args: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(args.len(), 4);
    assert!(args[0].starts_with("-Xplugin:ErrorProne "));
}

#[test]
fn test_disabled_task_prints_nothing() {
    let dir = project("[errorprone]\nenabled = false\n\n[errorprone.checks]\n\"Bad:Name\" = \"OFF\"\n");
    epargs(&dir).arg("compiler-args").assert().success().stdout("");
}

#[test]
fn test_colon_in_check_name_fails() {
    let dir = project("[errorprone]\nenabled = true\n\n[errorprone.checks]\n\"Foo:Bar\" = \"WARN\"\n");
    epargs(&dir)
        .arg("compiler-args")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Foo:Bar"));
}

#[test]
fn test_args_file_is_appended() {
    let dir = project("[task]\nsource_set = \"test\"\n");
    fs::write(dir.path().join("ep.args"), "# extra\n-XepPatchChecks:Foo\n").unwrap();
    epargs(&dir)
        .args(["--args-file", "ep.args", "compiler-args"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "-Xplugin:ErrorProne -XepCompilingTestOnlyCode -XepPatchChecks:Foo\n",
        ));
}

#[test]
fn test_args_file_with_whitespace_fails() {
    let dir = project("[task]\nsource_set = \"main\"\n");
    fs::write(dir.path().join("ep.args"), "foo bar\n").unwrap();
    epargs(&dir)
        .args(["--args-file", "ep.args", "compiler-args"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"foo bar\""));
}

#[test]
fn test_jvm_args_include_grants() {
    let dir = project("[task]\nsource_set = \"main\"\nfork = true\njvm_args = [\"-Xmx1g\"]\n");
    epargs(&dir)
        .args(["--runtime-version", "21", "jvm-args"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-Xmx1g\n--add-exports=jdk.compiler/"))
        .stdout(predicate::str::contains(
            "--add-opens=jdk.compiler/com.sun.tools.javac.comp=ALL-UNNAMED",
        ));
}

#[test]
fn test_jvm_args_need_runtime_version() {
    let dir = project("[task]\nsource_set = \"main\"\n");
    epargs(&dir)
        .arg("jvm-args")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot determine the runtime version"));
}

#[test]
fn test_plan_forces_fork_on_encapsulated_runtime() {
    let dir = project("[task]\nsource_set = \"main\"\n");
    let output = epargs(&dir)
        .args(["--runtime-version", "21", "--format", "json", "plan"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["task"], "compileJava");
    assert_eq!(plan["fork_requested"], false);
    assert_eq!(plan["fork"], true);
    assert_eq!(plan["decision"]["force_fork"], true);
    assert_eq!(plan["jvm_args"].as_array().unwrap().len(), 10);
}

#[test]
fn test_plan_keeps_in_process_on_old_runtime() {
    let dir = project("[task]\nsource_set = \"main\"\n");
    epargs(&dir)
        .args(["--runtime-version", "11", "plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fork:             false"));
}

#[test]
fn test_plan_respects_runtime_grants() {
    let grants = [
        "--add-exports=jdk.compiler/com.sun.tools.javac.api=ALL-UNNAMED",
        "--add-exports=jdk.compiler/com.sun.tools.javac.file=ALL-UNNAMED",
        "--add-exports=jdk.compiler/com.sun.tools.javac.main=ALL-UNNAMED",
        "--add-exports=jdk.compiler/com.sun.tools.javac.model=ALL-UNNAMED",
        "--add-exports=jdk.compiler/com.sun.tools.javac.parser=ALL-UNNAMED",
        "--add-exports=jdk.compiler/com.sun.tools.javac.processing=ALL-UNNAMED",
        "--add-exports=jdk.compiler/com.sun.tools.javac.tree=ALL-UNNAMED",
        "--add-exports=jdk.compiler/com.sun.tools.javac.util=ALL-UNNAMED",
        "--add-opens=jdk.compiler/com.sun.tools.javac.code=ALL-UNNAMED",
        "--add-opens=jdk.compiler/com.sun.tools.javac.comp=ALL-UNNAMED",
    ];
    let dir = project("[task]\nsource_set = \"main\"\n");
    epargs(&dir)
        .args(["--runtime-version", "21", "plan"])
        .env("JDK_JAVA_OPTIONS", grants.join(" "))
        .assert()
        .success()
        .stdout(predicate::str::contains("fork:             false"));
}

#[test]
fn test_plan_rejects_java_8_toolchain() {
    let dir = project("[errorprone]\nenabled = true\n");
    epargs(&dir)
        .args(["--runtime-version", "21", "--toolchain", "8", "plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Must not enable ErrorProne when compiling with JDK < 11",
        ));
}

#[test]
fn test_plan_reads_java_home_release() {
    let dir = project("[task]\nsource_set = \"main\"\n");
    let jdk = TempDir::new().unwrap();
    fs::write(
        jdk.path().join("release"),
        "JAVA_VERSION=\"17.0.9\"\nMODULES=\"java.base jdk.compiler\"\n",
    )
    .unwrap();
    epargs(&dir)
        .env("JAVA_HOME", jdk.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("runtime version:  17"))
        .stdout(predicate::str::contains("(forced)"));
}

#[test]
fn test_check_reports_warnings() {
    let dir = project("[errorprone]\nenabled = true\nextra_args = [\"-XepDisableAllChecks\"]\n");
    epargs(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration is valid (1 warning)"))
        .stderr(predicate::str::contains("errorprone.extra_args"));
}

#[test]
fn test_check_json_invalid() {
    let dir = project("[errorprone]\nenabled = true\n\n[errorprone.checks]\n\"A:B\" = \"OFF\"\n");
    let output = epargs(&dir)
        .args(["--format", "json", "check"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert!(report["error"].as_str().unwrap().contains("A:B"));
}

#[test]
fn test_unknown_config_key_fails() {
    let dir = project("[errorprone]\nenabeld = true\n");
    epargs(&dir)
        .arg("compiler-args")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_explicit_config_path() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("custom.toml"), MAIN_TASK).unwrap();
    epargs(&dir)
        .args(["--config", "custom.toml", "compiler-args"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-Xep:Foo:ERROR"));
}

#[test]
fn test_schema_is_json() {
    let dir = TempDir::new().unwrap();
    let output = epargs(&dir).arg("schema").output().unwrap();
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"]["errorprone"].is_object());
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    let dir = project(MAIN_TASK);
    epargs(&dir)
        .args(["--verbose", "compiler-args"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-Xplugin:ErrorProne"))
        .stderr(predicate::str::contains("rendered Error Prone arguments"));
}
