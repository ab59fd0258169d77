//! dunc: run the build and install functions of a rez `package.py`
//!
//! This library exposes the orchestrator and CLI options for the binary and
//! its tests.

pub mod common;
pub mod errors;
pub mod orchestrator;

pub use common::GlobalOpts;
pub use dunc_logger as logger;
pub use errors::DuncError;
pub use orchestrator::{BuildOrchestrator, Phase};
