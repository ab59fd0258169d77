//! Placing resolved files under the install root
//!
//! Every entry is validated before anything is written, then files are placed
//! one at a time in order. A failure stops the batch where it happened: files
//! already placed stay, later ones are not attempted.

use crate::errors::FilesError;
use crate::platform;
use crate::resolver::ResolvedFile;
use dunc_config::BuildConfig;
use dunc_logger as logger;
use std::fmt;
use std::fs::{self, File, FileTimes};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// A batch of files to install
#[derive(Debug, Clone, Default)]
pub struct InstallTarget {
    /// Defaults to the install root; relative values are anchored under it
    pub destination_root: Option<PathBuf>,
    pub entries: Vec<ResolvedFile>,
    pub symlink: bool,
    pub executable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    Copy,
    Link,
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallMethod::Copy => write!(f, "copy"),
            InstallMethod::Link => write!(f, "link"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub method: InstallMethod,
}

#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub files: Vec<InstalledFile>,
}

/// Copies or links files into the install tree
pub struct FileInstaller<'a> {
    config: &'a BuildConfig,
}

impl<'a> FileInstaller<'a> {
    pub fn new(config: &'a BuildConfig) -> Self {
        FileInstaller { config }
    }

    pub fn install(&self, target: &InstallTarget) -> Result<InstallReport, FilesError> {
        for entry in &target.entries {
            validate_relative(entry.relative_path())?;
        }

        let mut report = InstallReport::default();
        if target.entries.is_empty() {
            debug!("Nothing to install");
            return Ok(report);
        }

        let destination_root = self
            .config
            .anchor_to_install(target.destination_root.as_deref())?;
        let method = self.method_for(target.symlink)?;
        debug!(
            "Installing {} files into {:?} ({}, executable: {})",
            target.entries.len(),
            destination_root,
            method,
            target.executable
        );

        let width = target
            .entries
            .iter()
            .map(|entry| entry.relative_path().to_string_lossy().chars().count())
            .max()
            .unwrap_or(0)
            + 2;

        for entry in &target.entries {
            let source = entry.source();
            let destination = destination_root.join(entry.relative_path());

            logger::output(&format!(
                "- [{}] {:<width$} -> {}",
                method,
                entry.relative_path().to_string_lossy(),
                destination.display(),
                width = width
            ));

            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| FilesError::io("create directory", parent, e))?;
            }

            match method {
                InstallMethod::Link => link_file(&source, &destination)?,
                InstallMethod::Copy => copy_file(&source, &destination)?,
            }

            if target.executable {
                platform::add_execute_bits(&destination)
                    .map_err(|e| FilesError::io("set permissions on", &destination, e))?;
            }

            report.files.push(InstalledFile {
                source,
                destination,
                method,
            });
        }

        Ok(report)
    }

    /// Links are only used for local builds on platforms that support them
    fn method_for(&self, symlink: bool) -> Result<InstallMethod, FilesError> {
        if !symlink {
            return Ok(InstallMethod::Copy);
        }
        if !platform::SYMLINKS_SUPPORTED {
            logger::info("Symlinks are not supported on this platform, copying instead");
            return Ok(InstallMethod::Copy);
        }
        if !self.config.is_local()? {
            logger::info("Not a local build, copying instead of linking");
            return Ok(InstallMethod::Copy);
        }
        Ok(InstallMethod::Link)
    }
}

fn validate_relative(path: &Path) -> Result<(), FilesError> {
    if path.is_absolute() || path.has_root() {
        return Err(FilesError::AbsolutePath(path.to_path_buf()));
    }
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(FilesError::EscapesRoot(path.to_path_buf()));
    }
    Ok(())
}

fn link_file(source: &Path, destination: &Path) -> Result<(), FilesError> {
    if let Ok(meta) = fs::symlink_metadata(destination) {
        if is_source_entry(source, destination, &meta) {
            debug!("{:?} is the source itself, leaving it in place", destination);
            return Ok(());
        }
        fs::remove_file(destination)
            .map_err(|e| FilesError::io("remove existing", destination, e))?;
    }

    let target =
        std::path::absolute(source).map_err(|e| FilesError::io("resolve", source, e))?;
    platform::symlink_file(&target, destination)
        .map_err(|e| FilesError::io("create symlink", destination, e))
}

fn copy_file(source: &Path, destination: &Path) -> Result<(), FilesError> {
    if let Ok(meta) = fs::symlink_metadata(destination) {
        if is_source_entry(source, destination, &meta) {
            debug!("{:?} is already in place", destination);
            return Ok(());
        }
        // never write through a link left by an earlier local install
        if meta.file_type().is_symlink() {
            fs::remove_file(destination)
                .map_err(|e| FilesError::io("remove existing", destination, e))?;
        }
    }

    fs::copy(source, destination).map_err(|e| FilesError::io("copy", source, e))?;

    if let Err(e) = copy_times(source, destination) {
        debug!("Could not copy timestamps to {:?}: {}", destination, e);
    }
    Ok(())
}

/// Whether the existing `destination` is the source entry itself, or a hard
/// link to it. Removing or truncating it would destroy the source.
fn is_source_entry(source: &Path, destination: &Path, meta: &fs::Metadata) -> bool {
    let same_path = match (std::path::absolute(source), std::path::absolute(destination)) {
        (Ok(src), Ok(dst)) => src == dst,
        _ => false,
    };
    same_path || (!meta.file_type().is_symlink() && platform::same_file(source, destination))
}

fn copy_times(source: &Path, destination: &Path) -> std::io::Result<()> {
    let meta = fs::metadata(source)?;
    let times = FileTimes::new()
        .set_accessed(meta.accessed()?)
        .set_modified(meta.modified()?);
    File::options()
        .write(true)
        .open(destination)
        .or_else(|_| File::open(destination))?
        .set_times(times)
}
