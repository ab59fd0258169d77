//! Build phase state machine
//!
//! `NotStarted -> Build -> (Install | Done) -> Done`. The descriptor is parsed
//! and syntax-checked once; each phase extracts and runs its own routine. Any
//! failure ends the run.

use crate::errors::DuncError;
use dunc_ast::{Descriptor, ExtractError};
use dunc_config::BuildConfig;
use dunc_logger as logger;
use dunc_python::Bridge;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const BUILD_ROUTINE: &str = "build";
pub const INSTALL_ROUTINE: &str = "install";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Build,
    Install,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::NotStarted => "not started",
            Phase::Build => "build",
            Phase::Install => "install",
            Phase::Done => "done",
        };
        write!(f, "{}", name)
    }
}

pub struct BuildOrchestrator {
    config: Arc<BuildConfig>,
    phase: Phase,
}

impl BuildOrchestrator {
    pub fn new(config: Arc<BuildConfig>) -> Self {
        BuildOrchestrator {
            config,
            phase: Phase::NotStarted,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&mut self) -> Result<(), DuncError> {
        if !self.config.is_build() {
            return Err(DuncError::Environment);
        }

        self.transition(Phase::Build);
        let project_file = self.config.project_file()?;
        if !project_file.is_file() {
            return Err(DuncError::MissingProjectFile(project_file.to_path_buf()));
        }
        let descriptor = Descriptor::load(project_file)?;
        debug!(
            "Top-level functions in {:?}: {:?}",
            descriptor.path(),
            descriptor.routine_names()
        );

        let bridge = Bridge::get()?;
        bridge.check_syntax(&descriptor)?;
        if let Some(build) = bridge.extract(&descriptor, BUILD_ROUTINE, true)? {
            logger::output("Executing build function...");
            build.invoke(&self.config)?;
        }

        if self.config.is_install() {
            self.transition(Phase::Install);
            logger::output("Executing install function...");
            let install = bridge
                .extract(&descriptor, INSTALL_ROUTINE, false)?
                .ok_or_else(|| ExtractError::NotFound(INSTALL_ROUTINE.to_string()))?;
            install.invoke(&self.config)?;
        }

        self.transition(Phase::Done);
        Ok(())
    }

    fn transition(&mut self, next: Phase) {
        logger::step(&format!("Phase {} -> {}", self.phase, next));
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dunc_config::keys;
    use std::collections::HashMap;

    fn orchestrator(vars: &[(&str, &str)]) -> BuildOrchestrator {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BuildOrchestrator::new(Arc::new(BuildConfig::from_source(&vars)))
    }

    #[test]
    fn test_requires_build_environment() {
        let mut orchestrator = orchestrator(&[]);
        assert!(matches!(orchestrator.run(), Err(DuncError::Environment)));
        assert_eq!(orchestrator.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_project_file_must_be_configured() {
        let mut orchestrator = orchestrator(&[(keys::BUILD_ENV, "1")]);
        assert!(matches!(orchestrator.run(), Err(DuncError::Config(_))));
        assert_eq!(orchestrator.phase(), Phase::Build);
    }

    #[test]
    fn test_project_file_must_exist() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let missing = dir.path().join("package.py");
        let missing = missing.to_string_lossy();
        let mut orchestrator =
            orchestrator(&[(keys::BUILD_ENV, "1"), (keys::PROJECT_FILE, &missing)]);

        let err = orchestrator.run();
        assert!(matches!(err, Err(DuncError::MissingProjectFile(ref p)) if p == &dir.path().join("package.py")));
    }

    #[test]
    fn test_parse_errors_stop_before_python() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let package = dir.path().join("package.py");
        std::fs::write(&package, "def build(:\n    pass\n").unwrap_or_else(|e| panic!("{e}"));
        let package = package.to_string_lossy();
        let mut orchestrator =
            orchestrator(&[(keys::BUILD_ENV, "1"), (keys::PROJECT_FILE, &package)]);

        let err = orchestrator.run();
        assert!(matches!(err, Err(DuncError::Extract(ExtractError::Parse { .. }))));
    }
}
