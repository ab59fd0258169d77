//! Descriptor parsing and routine slicing
//!
//! Only direct children of the module are considered. A routine defined inside
//! a class, another function or an `if` block is not an entry point, and the
//! first top-level definition with a given name wins.

use crate::errors::ExtractError;
use ast_grep_core::source::StrDoc;
use ast_grep_core::{AstGrep, Node};
use ast_grep_language::Python;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

#[cfg(test)]
mod tests;

type PyNode<'r> = Node<'r, StrDoc<Python>>;

/// Source text of a single top-level routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineSource {
    pub name: String,
    /// Exact text of the definition, decorators included
    pub text: String,
    /// 1-based line of the definition's first line in the descriptor
    pub start_line: usize,
}

impl RoutineSource {
    /// The routine text shifted down to its original line
    ///
    /// Compiling this instead of `text` keeps traceback line numbers in sync
    /// with the descriptor file.
    pub fn line_preserving_source(&self) -> String {
        let mut source = "\n".repeat(self.start_line.saturating_sub(1));
        source.push_str(&self.text);
        if !source.ends_with('\n') {
            source.push('\n');
        }
        source
    }
}

/// A parsed project descriptor
#[derive(Debug, Clone)]
pub struct Descriptor {
    path: PathBuf,
    content: String,
}

impl Descriptor {
    /// Read and parse a descriptor from disk
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let content = fs::read_to_string(path).map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(path, content)
    }

    /// Parse descriptor text; `path` is only used for reporting
    pub fn from_source(
        path: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Result<Self, ExtractError> {
        let path = path.into();
        let content = content.into();
        debug!("Parsing descriptor: {:?}", path);

        let sg = AstGrep::new(&content, Python);
        if let Some(offset) = first_error_offset(&sg.root()) {
            return Err(ExtractError::Parse {
                line: line_at(&content, offset),
                path,
            });
        }

        Ok(Descriptor { path, content })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Names of all top-level routines, in file order
    pub fn routine_names(&self) -> Vec<String> {
        self.top_level_routines()
            .into_iter()
            .map(|routine| routine.name)
            .collect()
    }

    /// First top-level routine called `name`
    pub fn find_routine(&self, name: &str) -> Option<RoutineSource> {
        self.top_level_routines()
            .into_iter()
            .find(|routine| routine.name == name)
    }

    /// Look up `name`, treating absence as an error unless `optional`
    pub fn lookup(&self, name: &str, optional: bool) -> Result<Option<RoutineSource>, ExtractError> {
        match self.find_routine(name) {
            Some(routine) => {
                debug!(
                    "Found routine '{}' at {:?}:{}",
                    name, self.path, routine.start_line
                );
                Ok(Some(routine))
            }
            None if optional => {
                debug!("Optional routine '{}' not defined in {:?}", name, self.path);
                Ok(None)
            }
            None => Err(ExtractError::NotFound(name.to_string())),
        }
    }

    fn top_level_routines(&self) -> Vec<RoutineSource> {
        let sg = AstGrep::new(&self.content, Python);
        let root = sg.root();
        let mut routines = Vec::new();

        for node in root.children() {
            let Some(name) = routine_name(&node) else {
                continue;
            };
            let range = node.range();
            trace!("Top-level routine '{}' at bytes {:?}", name, range);
            routines.push(RoutineSource {
                name,
                text: node.text().to_string(),
                start_line: line_at(&self.content, range.start),
            });
        }

        routines
    }
}

/// Name of a synchronous function defined by `node`, if it defines one
fn routine_name(node: &PyNode<'_>) -> Option<String> {
    match node.kind().as_ref() {
        "function_definition" => {
            let is_async = node
                .children()
                .next()
                .is_some_and(|first| first.kind() == "async");
            if is_async {
                return None;
            }
            node.field("name").map(|name| name.text().to_string())
        }
        "decorated_definition" => node
            .field("definition")
            .and_then(|definition| routine_name(&definition)),
        _ => None,
    }
}

fn first_error_offset(node: &PyNode<'_>) -> Option<usize> {
    if node.kind() == "ERROR" {
        return Some(node.range().start);
    }
    node.children().find_map(|child| first_error_offset(&child))
}

fn line_at(content: &str, offset: usize) -> usize {
    content[..offset.min(content.len())].matches('\n').count() + 1
}
