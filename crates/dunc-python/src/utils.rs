use pyo3::prelude::*;
use pyo3::types::PyModule;

/// Render a Python exception the way the interpreter would print it
pub fn format_python_error(py: Python<'_>, err: &PyErr) -> String {
    let formatted = PyModule::import(py, "traceback").and_then(|traceback| {
        traceback
            .getattr("format_exception")?
            .call1((err.get_type(py), err.value(py), err.traceback(py)))?
            .extract::<Vec<String>>()
    });

    match formatted {
        Ok(lines) => lines.concat(),
        Err(_) => format!("{}\n", err),
    }
}
