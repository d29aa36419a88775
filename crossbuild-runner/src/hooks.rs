//! Host-build-tool extension points.
//!
//! The host tool defines four named extension points and crossbuild
//! registers typed callbacks against them — explicit plugin registration,
//! never runtime patching of host tasks. Task points run callbacks in
//! registration order; the package point lets callbacks append files to
//! the host's artifact list.

use std::path::PathBuf;
use std::sync::Arc;

use crossbuild_core::GlobalOptions;
use crossbuild_sync::resolver;

use crate::aggregate::{aggregate_flags, ExitStatus};
use crate::clean;
use crate::compiler::Compiler;
use crate::error::RunnerError;
use crate::orchestrator;

/// Named extension points exposed by the host build tool.
///
/// There is deliberately no test point: the host's test task invokes
/// [`crate::testrun::run_tests`] directly rather than going through a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionPoint {
    BeforeCompile,
    AfterCompile,
    BeforeClean,
    /// Contributes files to the host artifact; takes package hooks, not
    /// task hooks.
    OnPackage,
}

/// A callback wrapping a host task; returns its own combined status.
pub type TaskHook = Box<dyn Fn() -> Result<ExitStatus, RunnerError> + Send + Sync>;

/// A callback appending files to the host's artifact file list.
pub type PackageHook = Box<dyn Fn(&mut Vec<PathBuf>) -> Result<(), RunnerError> + Send + Sync>;

/// Registered callbacks for every extension point.
#[derive(Default)]
pub struct HookRegistry {
    before_compile: Vec<TaskHook>,
    after_compile: Vec<TaskHook>,
    before_clean: Vec<TaskHook>,
    on_package: Vec<PackageHook>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task callback at a task-shaped extension point.
    pub fn register_task(
        &mut self,
        point: ExtensionPoint,
        hook: TaskHook,
    ) -> Result<(), RunnerError> {
        match point {
            ExtensionPoint::BeforeCompile => self.before_compile.push(hook),
            ExtensionPoint::AfterCompile => self.after_compile.push(hook),
            ExtensionPoint::BeforeClean => self.before_clean.push(hook),
            ExtensionPoint::OnPackage => {
                return Err(RunnerError::Hook(
                    "OnPackage takes package hooks; use register_package",
                ))
            }
        }
        Ok(())
    }

    /// Register a package callback at the `OnPackage` point.
    pub fn register_package(&mut self, hook: PackageHook) {
        self.on_package.push(hook);
    }

    /// Run every task callback at `point` in registration order and
    /// aggregate their statuses (all-succeed).
    pub fn dispatch(&self, point: ExtensionPoint) -> Result<ExitStatus, RunnerError> {
        let hooks = match point {
            ExtensionPoint::BeforeCompile => &self.before_compile,
            ExtensionPoint::AfterCompile => &self.after_compile,
            ExtensionPoint::BeforeClean => &self.before_clean,
            ExtensionPoint::OnPackage => {
                return Err(RunnerError::Hook(
                    "OnPackage is dispatched via collect_package_files",
                ))
            }
        };

        let mut flags = Vec::with_capacity(hooks.len());
        for hook in hooks {
            flags.push(hook()?.success());
        }
        Ok(aggregate_flags(flags))
    }

    /// Let every `OnPackage` callback append to the host artifact list.
    pub fn collect_package_files(&self, files: &mut Vec<PathBuf>) -> Result<(), RunnerError> {
        for hook in &self.on_package {
            hook(files)?;
        }
        Ok(())
    }

    /// The stock wiring: host compile then a crossbuild one-shot build,
    /// host clean preceded by crossbuild clean, and jar-tagged job source
    /// trees contributed to the host artifact.
    pub fn standard(options: GlobalOptions, compiler: Arc<dyn Compiler>) -> Self {
        let mut registry = Self::new();

        {
            let options = options.clone();
            let compiler = Arc::clone(&compiler);
            let hook: TaskHook =
                Box::new(move || orchestrator::run_once(&options, Arc::clone(&compiler)));
            // Registration target is statically valid; the error arm is
            // unreachable for task points.
            let _ = registry.register_task(ExtensionPoint::AfterCompile, hook);
        }

        {
            let options = options.clone();
            let hook: TaskHook = Box::new(move || {
                clean::clean(&options)?;
                Ok(ExitStatus::Success)
            });
            let _ = registry.register_task(ExtensionPoint::BeforeClean, hook);
        }

        let jar_sources: Vec<PathBuf> = options
            .builds
            .iter()
            .filter(|job| job.jar)
            .map(|job| job.source_path.clone())
            .collect();
        registry.register_package(Box::new(move |files| {
            for source in &jar_sources {
                if source.is_dir() {
                    files.extend(resolver::walk(source)?);
                }
            }
            Ok(())
        }));

        registry
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn task_hooks_run_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            registry
                .register_task(
                    ExtensionPoint::BeforeCompile,
                    Box::new(move || {
                        order.lock().unwrap().push(tag);
                        Ok(ExitStatus::Success)
                    }),
                )
                .unwrap();
        }

        let status = registry.dispatch(ExtensionPoint::BeforeCompile).unwrap();
        assert_eq!(status, ExitStatus::Success);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn failing_hook_fails_the_dispatch_aggregate() {
        let mut registry = HookRegistry::new();
        registry
            .register_task(
                ExtensionPoint::AfterCompile,
                Box::new(|| Ok(ExitStatus::Failure)),
            )
            .unwrap();
        registry
            .register_task(
                ExtensionPoint::AfterCompile,
                Box::new(|| Ok(ExitStatus::Success)),
            )
            .unwrap();

        let status = registry.dispatch(ExtensionPoint::AfterCompile).unwrap();
        assert_eq!(status, ExitStatus::Failure);
    }

    #[test]
    fn package_point_rejects_task_hooks() {
        let mut registry = HookRegistry::new();
        let err = registry
            .register_task(ExtensionPoint::OnPackage, Box::new(|| Ok(ExitStatus::Success)))
            .unwrap_err();
        assert!(matches!(err, RunnerError::Hook(_)));
        assert!(matches!(
            registry.dispatch(ExtensionPoint::OnPackage),
            Err(RunnerError::Hook(_))
        ));
    }

    #[test]
    fn package_hooks_append_to_the_artifact_list() {
        let mut registry = HookRegistry::new();
        registry.register_package(Box::new(|files| {
            files.push(PathBuf::from("src-cljs/core.cljs"));
            Ok(())
        }));

        let mut files = vec![PathBuf::from("host/artifact.txt")];
        registry.collect_package_files(&mut files).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("host/artifact.txt"),
                PathBuf::from("src-cljs/core.cljs"),
            ]
        );
    }

    #[test]
    fn unregistered_point_dispatches_to_success() {
        let registry = HookRegistry::new();
        let status = registry.dispatch(ExtensionPoint::BeforeClean).unwrap();
        assert_eq!(status, ExitStatus::Success);
    }
}
