//! Compiling and running a single descriptor routine
//!
//! The routine's source is compiled under the descriptor's own file name with
//! its original line offset, then executed into an empty namespace. Only the
//! `def` statement (and its decorators) runs at extraction time; the body runs
//! on [`ExtractedRoutine::invoke`].

use crate::context;
use crate::errors::BridgeError;
use crate::exceptions::DuncError;
use crate::utils::format_python_error;
use crate::Bridge;
use dunc_ast::Descriptor;
use dunc_config::BuildConfig;
use dunc_logger as logger;
use pyo3::exceptions::PySyntaxError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};
use std::sync::Arc;
use std::time::Instant;

/// A routine compiled in isolation, ready to be called
pub struct ExtractedRoutine {
    name: String,
    callable: Py<PyAny>,
}

impl Bridge {
    /// Compile the whole descriptor to an AST without running any of it
    ///
    /// Catches source the tree-sitter grammar tolerates but CPython rejects,
    /// such as Python 2 `print` statements outside the routines.
    pub fn check_syntax(&self, descriptor: &Descriptor) -> Result<(), BridgeError> {
        let filename = descriptor.path().to_string_lossy().into_owned();

        pyo3::Python::attach(|py| {
            let only_ast = PyModule::import(py, "ast")?.getattr("PyCF_ONLY_AST")?;
            PyModule::import(py, "builtins")?
                .getattr("compile")?
                .call1((descriptor.content(), filename.as_str(), "exec", only_ast))
                .map_err(|e| syntax_error(py, descriptor, e))?;
            Ok(())
        })
    }

    /// Extract the top-level routine `name` from `descriptor`
    ///
    /// Returns `Ok(None)` when the routine is absent and `optional` is set.
    pub fn extract(
        &self,
        descriptor: &Descriptor,
        name: &str,
        optional: bool,
    ) -> Result<Option<ExtractedRoutine>, BridgeError> {
        let Some(source) = descriptor.lookup(name, optional)? else {
            logger::debug(&format!(
                "No '{}' function in {}",
                name,
                descriptor.path().display()
            ));
            return Ok(None);
        };

        logger::debug(&format!(
            "Compiling '{}' from {} (line {})",
            name,
            descriptor.path().display(),
            source.start_line
        ));
        let filename = descriptor.path().to_string_lossy().into_owned();
        let code = source.line_preserving_source();

        pyo3::Python::attach(|py| {
            let builtins = PyModule::import(py, "builtins")?;

            let compiled = builtins
                .getattr("compile")?
                .call1((code, filename.as_str(), "exec"))
                .map_err(|e| syntax_error(py, descriptor, e))?;

            let namespace = PyDict::new(py);
            builtins
                .getattr("exec")?
                .call1((compiled, &namespace))
                .map_err(|e| routine_error(py, name, &e))?;

            let callable = namespace.get_item(name)?.ok_or_else(|| {
                BridgeError::Python(format!("'{}' was not defined by its own source", name))
            })?;

            Ok(Some(ExtractedRoutine {
                name: name.to_string(),
                callable: callable.unbind(),
            }))
        })
    }
}

impl ExtractedRoutine {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the routine with no arguments
    ///
    /// `config` is what the `dunc` module sees for the duration of the call.
    pub fn invoke(&self, config: &Arc<BuildConfig>) -> Result<(), BridgeError> {
        let _context = context::enter(Arc::clone(config));
        let call_start = Instant::now();

        let result = pyo3::Python::attach(|py| {
            let outcome = self
                .callable
                .bind(py)
                .call0()
                .map(|_| ())
                .map_err(|e| routine_error(py, &self.name, &e));
            flush_std_streams(py);
            outcome
        });

        logger::debug(&format!(
            "The {} function took {:?}",
            self.name,
            call_start.elapsed()
        ));
        result
    }
}

fn syntax_error(py: Python<'_>, descriptor: &Descriptor, err: PyErr) -> BridgeError {
    if err.is_instance_of::<PySyntaxError>(py) {
        BridgeError::Syntax {
            path: descriptor.path().to_path_buf(),
            message: err.value(py).to_string(),
        }
    } else {
        BridgeError::from(err)
    }
}

/// The interpreter is never finalized, so buffered prints would be lost
fn flush_std_streams(py: Python<'_>) {
    let Ok(sys) = PyModule::import(py, "sys") else {
        return;
    };
    for stream in ["stdout", "stderr"] {
        if let Ok(stream) = sys.getattr(stream) {
            let _ = stream.call_method0("flush");
        }
    }
}

/// `dunc.DuncError` stays a plain message; anything else keeps its traceback
fn routine_error(py: Python<'_>, routine: &str, err: &PyErr) -> BridgeError {
    if err.is_instance_of::<DuncError>(py) {
        return BridgeError::Dunc(err.value(py).to_string());
    }
    BridgeError::RoutineFailed {
        routine: routine.to_string(),
        traceback: format_python_error(py, err),
    }
}
