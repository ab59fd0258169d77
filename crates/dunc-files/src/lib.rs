//! Glob resolution and file installation
//!
//! [`PatternResolver`] expands a shell glob under a root directory into
//! [`ResolvedFile`] entries, and [`FileInstaller`] places those entries under
//! an install root by copying or, for local builds, symlinking them.
//!
//! Installation is strictly sequential and takes no locks. Two dunc processes
//! installing into the same root at the same time can leave a mix of both
//! results behind; rez never does this for a single package variant.

pub mod errors;
pub mod installer;
pub mod pattern;
mod platform;
pub mod resolver;

pub use errors::FilesError;
pub use installer::{FileInstaller, InstallMethod, InstallReport, InstallTarget, InstalledFile};
pub use pattern::GlobPattern;
pub use resolver::{PatternResolver, ResolvedFile};
