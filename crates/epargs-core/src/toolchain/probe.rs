//! Capability probe: does the current runtime already grant the plugin access
//! to the compiler internals?
//!
//! The probe works against a [`ModuleAccess`] source so it can be tested with
//! [`MockModuleAccess`] instead of a real module system.

use super::JavaVersion;
use crate::error::{ArgsError, ArgsResult};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use thiserror::Error;

/// Module owning the probed types.
pub const COMPILER_MODULE: &str = "jdk.compiler";

/// Types whose packages must be exported to the plugin.
pub const EXPORTED_TYPES: &[&str] = &[
    "com.sun.tools.javac.api.BasicJavacTask",
    "com.sun.tools.javac.api.JavacTrees",
    "com.sun.tools.javac.file.JavacFileManager",
    "com.sun.tools.javac.main.JavaCompiler",
    "com.sun.tools.javac.model.JavacElements",
    "com.sun.tools.javac.parser.JavacParser",
    "com.sun.tools.javac.processing.JavacProcessingEnvironment",
    "com.sun.tools.javac.tree.JCTree",
    "com.sun.tools.javac.util.JCDiagnostic",
];

/// Types whose packages must be opened (deep reflection) to the plugin.
pub const OPENED_TYPES: &[&str] = &[
    "com.sun.tools.javac.code.Symbol",
    "com.sun.tools.javac.comp.Enter",
];

/// Access the unnamed module has to the package owning a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackageAccess {
    pub exported: bool,
    pub opened: bool,
}

impl PackageAccess {
    pub const NONE: PackageAccess = PackageAccess {
        exported: false,
        opened: false,
    };
    pub const EXPORTED: PackageAccess = PackageAccess {
        exported: true,
        opened: false,
    };
    pub const OPEN: PackageAccess = PackageAccess {
        exported: true,
        opened: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The type does not exist in this runtime.
    #[error("type not found: {0}")]
    NotFound(String),
    /// Anything else went wrong while inspecting the type.
    #[error("{0}")]
    Inspection(String),
}

/// Source of module access information for a runtime.
pub trait ModuleAccess: Send + Sync + fmt::Debug {
    /// Access granted to the unnamed module on the package owning `type_name`.
    fn lookup(&self, type_name: &str) -> Result<PackageAccess, LookupError>;
}

/// Outcome of the capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantRequirement {
    /// Some package is not exported or opened to the plugin.
    Needed,
    /// Every package is already accessible.
    NotNeeded,
    /// A probed type could not be found.
    Indeterminate,
}

impl GrantRequirement {
    /// Indeterminate results count as needed: adding grants is always safe.
    pub fn is_needed(self) -> bool {
        !matches!(self, GrantRequirement::NotNeeded)
    }
}

/// Inspect every probed type once and decide whether grants are needed.
///
/// Stops at the first inaccessible or missing type. Lookup failures other
/// than "not found" mean the source itself is broken and are returned as
/// [`ArgsError::Internal`].
pub fn probe_grants(source: &dyn ModuleAccess) -> ArgsResult<GrantRequirement> {
    let checks = EXPORTED_TYPES
        .iter()
        .map(|t| (*t, false))
        .chain(OPENED_TYPES.iter().map(|t| (*t, true)));

    for (type_name, needs_open) in checks {
        let access = match source.lookup(type_name) {
            Ok(access) => access,
            Err(LookupError::NotFound(_)) => {
                tracing::debug!(type_name, "probed type not found");
                return Ok(GrantRequirement::Indeterminate);
            }
            Err(LookupError::Inspection(message)) => {
                return Err(ArgsError::Internal {
                    type_name: type_name.to_string(),
                    message,
                });
            }
        };
        let granted = if needs_open {
            access.opened
        } else {
            access.exported
        };
        if !granted {
            tracing::debug!(type_name, needs_open, "package not accessible to unnamed module");
            return Ok(GrantRequirement::Needed);
        }
    }
    Ok(GrantRequirement::NotNeeded)
}

/// Once-per-process cache of "does this runtime need grants".
///
/// The first successful computation is stored and never recomputed. A mutex
/// serializes the first computation so the probe never runs twice; errors are
/// not cached.
#[derive(Debug)]
pub struct RuntimeProbe {
    result: OnceLock<bool>,
    init: Mutex<()>,
}

impl RuntimeProbe {
    pub const fn new() -> Self {
        Self {
            result: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Cached result, if the probe already ran.
    pub fn cached(&self) -> Option<bool> {
        self.result.get().copied()
    }

    /// Whether a runtime of `version` needs grants passed as JVM arguments.
    ///
    /// Runtimes older than [`JavaVersion::STRONG_ENCAPSULATION`] never do and
    /// are not probed.
    pub fn needs_grants(
        &self,
        version: JavaVersion,
        source: &dyn ModuleAccess,
    ) -> ArgsResult<bool> {
        if let Some(needed) = self.cached() {
            tracing::trace!(needed, "runtime probe cache hit");
            return Ok(needed);
        }
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(needed) = self.cached() {
            return Ok(needed);
        }

        let needed = if version.is_compatible_with(JavaVersion::STRONG_ENCAPSULATION) {
            probe_grants(source)?.is_needed()
        } else {
            false
        };
        tracing::debug!(%version, needed, "probed current runtime for strong encapsulation");
        // Only this thread can set it while holding the guard.
        let _ = self.result.set(needed);
        Ok(needed)
    }
}

impl Default for RuntimeProbe {
    fn default() -> Self {
        Self::new()
    }
}

static CURRENT_RUNTIME_PROBE: RuntimeProbe = RuntimeProbe::new();

/// The process-wide probe for the runtime executing the build tool.
pub fn current_runtime_probe() -> &'static RuntimeProbe {
    &CURRENT_RUNTIME_PROBE
}

/// Access derived from the options a runtime was started with.
///
/// A package counts as exported (opened) to the unnamed module when an
/// `--add-exports` (`--add-opens`) option for `jdk.compiler/<package>` targets
/// `ALL-UNNAMED`. Opening a package also exports it. A runtime without the
/// `jdk.compiler` module reports every type as not found.
#[derive(Debug, Clone, Default)]
pub struct JvmOptionsAccess {
    has_compiler_module: bool,
    exported: HashSet<String>,
    opened: HashSet<String>,
}

impl JvmOptionsAccess {
    pub fn new<I, S>(has_compiler_module: bool, jvm_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut access = Self {
            has_compiler_module,
            ..Self::default()
        };
        let mut pending: Option<bool> = None;
        for arg in jvm_args {
            let arg = arg.as_ref();
            if let Some(open) = pending.take() {
                access.record(arg, open);
                continue;
            }
            match arg {
                "--add-exports" => pending = Some(false),
                "--add-opens" => pending = Some(true),
                _ => {
                    if let Some(value) = arg.strip_prefix("--add-exports=") {
                        access.record(value, false);
                    } else if let Some(value) = arg.strip_prefix("--add-opens=") {
                        access.record(value, true);
                    }
                }
            }
        }
        access
    }

    /// Record a `module/package=target(,target)*` grant.
    fn record(&mut self, value: &str, open: bool) {
        let Some((source, targets)) = value.split_once('=') else {
            return;
        };
        let Some((module, package)) = source.split_once('/') else {
            return;
        };
        if module != COMPILER_MODULE || !targets.split(',').any(|t| t == "ALL-UNNAMED") {
            return;
        }
        self.exported.insert(package.to_string());
        if open {
            self.opened.insert(package.to_string());
        }
    }
}

impl ModuleAccess for JvmOptionsAccess {
    fn lookup(&self, type_name: &str) -> Result<PackageAccess, LookupError> {
        let package = match type_name.rsplit_once('.') {
            Some((package, _)) if package.starts_with("com.sun.tools.javac") => package,
            _ => return Err(LookupError::NotFound(type_name.to_string())),
        };
        if !self.has_compiler_module {
            return Err(LookupError::NotFound(type_name.to_string()));
        }
        Ok(PackageAccess {
            exported: self.exported.contains(package),
            opened: self.opened.contains(package),
        })
    }
}

/// In-memory [`ModuleAccess`] for tests.
///
/// Types default to [`PackageAccess::NONE`] unless configured otherwise;
/// every lookup is counted.
#[derive(Debug, Default)]
pub struct MockModuleAccess {
    types: HashMap<String, Result<PackageAccess, LookupError>>,
    default: Option<PackageAccess>,
    lookups: AtomicUsize,
}

impl MockModuleAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source where every probed package is exported and opened.
    pub fn fully_open() -> Self {
        let mut mock = Self::new();
        mock.default = Some(PackageAccess::OPEN);
        mock
    }

    /// A source where nothing is accessible.
    pub fn encapsulated() -> Self {
        let mut mock = Self::new();
        mock.default = Some(PackageAccess::NONE);
        mock
    }

    pub fn set_access(&mut self, type_name: impl Into<String>, access: PackageAccess) {
        self.types.insert(type_name.into(), Ok(access));
    }

    pub fn set_missing(&mut self, type_name: impl Into<String>) {
        let type_name = type_name.into();
        self.types
            .insert(type_name.clone(), Err(LookupError::NotFound(type_name)));
    }

    pub fn set_failure(&mut self, type_name: impl Into<String>, message: impl Into<String>) {
        self.types
            .insert(type_name.into(), Err(LookupError::Inspection(message.into())));
    }

    /// Number of lookups performed so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ModuleAccess for MockModuleAccess {
    fn lookup(&self, type_name: &str) -> Result<PackageAccess, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match self.types.get(type_name) {
            Some(result) => result.clone(),
            None => Ok(self.default.unwrap_or(PackageAccess::NONE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_fully_open_runtime_needs_nothing() {
        let source = MockModuleAccess::fully_open();
        assert_eq!(probe_grants(&source).unwrap(), GrantRequirement::NotNeeded);
        assert_eq!(source.lookups(), EXPORTED_TYPES.len() + OPENED_TYPES.len());
    }

    #[test]
    fn test_encapsulated_runtime_needs_grants() {
        let source = MockModuleAccess::encapsulated();
        assert_eq!(probe_grants(&source).unwrap(), GrantRequirement::Needed);
        // stops at the first inaccessible type
        assert_eq!(source.lookups(), 1);
    }

    #[test]
    fn test_exported_but_not_opened_needs_grants() {
        let mut source = MockModuleAccess::new();
        for t in EXPORTED_TYPES {
            source.set_access(*t, PackageAccess::EXPORTED);
        }
        source.set_access("com.sun.tools.javac.code.Symbol", PackageAccess::OPEN);
        source.set_access("com.sun.tools.javac.comp.Enter", PackageAccess::EXPORTED);
        assert_eq!(probe_grants(&source).unwrap(), GrantRequirement::Needed);
    }

    #[test]
    fn test_single_unexported_package_needs_grants() {
        let mut source = MockModuleAccess::fully_open();
        source.set_access("com.sun.tools.javac.util.JCDiagnostic", PackageAccess::NONE);
        assert!(probe_grants(&source).unwrap().is_needed());
    }

    #[test]
    fn test_missing_type_is_indeterminate_and_needed() {
        let mut source = MockModuleAccess::fully_open();
        source.set_missing("com.sun.tools.javac.main.JavaCompiler");
        let result = probe_grants(&source).unwrap();
        assert_eq!(result, GrantRequirement::Indeterminate);
        assert!(result.is_needed());
    }

    #[test]
    fn test_inspection_failure_is_internal_error() {
        let mut source = MockModuleAccess::fully_open();
        source.set_failure("com.sun.tools.javac.tree.JCTree", "illegal access");
        let err = probe_grants(&source).unwrap_err();
        assert!(matches!(
            err,
            ArgsError::Internal { ref type_name, .. } if type_name == "com.sun.tools.javac.tree.JCTree"
        ));
    }

    #[test]
    fn test_runtime_probe_runs_once() {
        let probe = RuntimeProbe::new();
        let source = MockModuleAccess::encapsulated();
        assert!(probe.needs_grants(JavaVersion::of(21), &source).unwrap());
        let after_first = source.lookups();
        assert!(probe.needs_grants(JavaVersion::of(21), &source).unwrap());
        assert_eq!(source.lookups(), after_first);
        assert_eq!(probe.cached(), Some(true));
    }

    #[test]
    fn test_runtime_probe_result_is_sticky() {
        let probe = RuntimeProbe::new();
        assert!(!probe
            .needs_grants(JavaVersion::of(21), &MockModuleAccess::fully_open())
            .unwrap());
        // a different source is never consulted again
        let other = MockModuleAccess::encapsulated();
        assert!(!probe.needs_grants(JavaVersion::of(21), &other).unwrap());
        assert_eq!(other.lookups(), 0);
    }

    #[test]
    fn test_runtime_probe_skips_old_runtimes() {
        let probe = RuntimeProbe::new();
        let source = MockModuleAccess::encapsulated();
        assert!(!probe.needs_grants(JavaVersion::of(11), &source).unwrap());
        assert_eq!(source.lookups(), 0);
    }

    #[test]
    fn test_runtime_probe_does_not_cache_errors() {
        let probe = RuntimeProbe::new();
        let mut broken = MockModuleAccess::fully_open();
        broken.set_failure("com.sun.tools.javac.api.BasicJavacTask", "boom");
        assert!(probe.needs_grants(JavaVersion::of(17), &broken).is_err());
        assert_eq!(probe.cached(), None);
    }

    #[test]
    fn test_runtime_probe_concurrent_first_use() {
        let probe = Arc::new(RuntimeProbe::new());
        let source = Arc::new(MockModuleAccess::fully_open());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let probe = Arc::clone(&probe);
                let source = Arc::clone(&source);
                std::thread::spawn(move || {
                    probe.needs_grants(JavaVersion::of(21), source.as_ref()).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert!(!handle.join().unwrap());
        }
        assert_eq!(source.lookups(), EXPORTED_TYPES.len() + OPENED_TYPES.len());
    }

    #[test]
    fn test_jvm_options_access_parses_both_forms() {
        let mut args: Vec<String> = vec!["-Xmx1g".to_string()];
        for package in ["api", "file", "main", "model", "parser", "processing", "tree"] {
            args.push(format!(
                "--add-exports=jdk.compiler/com.sun.tools.javac.{}=ALL-UNNAMED",
                package
            ));
        }
        args.push("--add-exports".to_string());
        args.push("jdk.compiler/com.sun.tools.javac.util=ALL-UNNAMED".to_string());
        args.push("--add-opens=jdk.compiler/com.sun.tools.javac.code=ALL-UNNAMED".to_string());
        args.push("--add-opens".to_string());
        args.push("jdk.compiler/com.sun.tools.javac.comp=some.module,ALL-UNNAMED".to_string());

        let access = JvmOptionsAccess::new(true, &args);
        assert_eq!(probe_grants(&access).unwrap(), GrantRequirement::NotNeeded);
    }

    #[test]
    fn test_jvm_options_access_ignores_named_targets() {
        let access = JvmOptionsAccess::new(
            true,
            ["--add-exports=jdk.compiler/com.sun.tools.javac.api=some.module"],
        );
        assert_eq!(
            access.lookup("com.sun.tools.javac.api.JavacTrees"),
            Ok(PackageAccess::NONE)
        );
    }

    #[test]
    fn test_jvm_options_access_open_implies_export() {
        let access = JvmOptionsAccess::new(
            true,
            ["--add-opens=jdk.compiler/com.sun.tools.javac.code=ALL-UNNAMED"],
        );
        assert_eq!(
            access.lookup("com.sun.tools.javac.code.Symbol"),
            Ok(PackageAccess::OPEN)
        );
    }

    #[test]
    fn test_jvm_options_access_without_compiler_module() {
        let access = JvmOptionsAccess::new(false, Vec::<String>::new());
        assert_eq!(probe_grants(&access).unwrap(), GrantRequirement::Indeterminate);
    }

    #[test]
    fn test_no_options_means_grants_needed() {
        let access = JvmOptionsAccess::new(true, Vec::<String>::new());
        assert_eq!(probe_grants(&access).unwrap(), GrantRequirement::Needed);
    }
}
