//! Pattern resolution against a source root

use crate::errors::FilesError;
use crate::pattern::GlobPattern;
use dunc_config::BuildConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// A file found under `root`, addressed by its path relative to that root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedFile {
    root: PathBuf,
    relative_path: PathBuf,
}

impl ResolvedFile {
    pub fn new(root: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
        ResolvedFile {
            root: root.into(),
            relative_path: relative_path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Full path of the file on disk
    pub fn source(&self) -> PathBuf {
        self.root.join(&self.relative_path)
    }
}

/// Expands glob patterns under the build's source root
pub struct PatternResolver<'a> {
    config: &'a BuildConfig,
}

impl<'a> PatternResolver<'a> {
    pub fn new(config: &'a BuildConfig) -> Self {
        PatternResolver { config }
    }

    /// Resolve `pattern` under `root`
    ///
    /// `root` defaults to the source root; a relative `root` is taken relative
    /// to the source root rather than the working directory. Only regular
    /// files (or symlinks to them) are returned, sorted by walk order.
    /// Symlinked directories are descended into and reported under the
    /// link's own path.
    pub fn resolve(
        &self,
        pattern: &str,
        root: Option<&Path>,
        recursive: bool,
    ) -> Result<Vec<ResolvedFile>, FilesError> {
        let root = self.config.anchor_to_source(root)?;
        if !root.is_dir() {
            return Err(FilesError::RootNotFound(root));
        }

        let glob = GlobPattern::new(pattern, recursive)?;
        debug!(
            "Resolving '{}' under {:?} (recursive: {})",
            glob.as_str(),
            root,
            recursive
        );

        let mut walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        if let Some(depth) = glob.max_depth() {
            walker = walker.max_depth(depth);
        }

        let mut files = Vec::new();
        for entry in walker.into_iter() {
            let entry = match entry {
                Ok(entry) => entry,
                // symlink loops and broken links land here
                Err(e) => {
                    debug!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            if !glob.matches(relative) || !is_regular_file(&entry) {
                continue;
            }

            trace!("Matched {:?}", relative);
            files.push(ResolvedFile::new(root.clone(), relative));
        }

        debug!("Pattern '{}' matched {} files", glob.as_str(), files.len());
        Ok(files)
    }
}

/// With `follow_links` the entry's type is already that of the link target
fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
}
