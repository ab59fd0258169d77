//! The `dunc` module imported by descriptor routines

use crate::context;
use crate::exceptions::{
    config_error, files_error, ConfigError, DuncError, PathError, RootNotFoundError,
};
use dunc_config::BuildConfig;
use dunc_files::{FileInstaller, InstallTarget, PatternResolver, ResolvedFile};
use pyo3::prelude::*;
use pyo3::types::PyModule;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const MODULE_NAME: &str = "dunc";

/// A file found by `find_files`, relative to the directory it was found in
#[pyclass(name = "ResolvedFile", module = "dunc", frozen)]
pub struct PyResolvedFile {
    inner: ResolvedFile,
}

#[pymethods]
impl PyResolvedFile {
    #[new]
    fn new(root: PathBuf, relative_path: PathBuf) -> Self {
        PyResolvedFile {
            inner: ResolvedFile::new(root, relative_path),
        }
    }

    #[getter]
    fn root(&self) -> String {
        display(self.inner.root())
    }

    #[getter]
    fn relative_path(&self) -> String {
        display(self.inner.relative_path())
    }

    fn __fspath__(&self) -> String {
        display(self.inner.relative_path())
    }

    fn __str__(&self) -> String {
        display(self.inner.relative_path())
    }

    fn __repr__(&self) -> String {
        format!(
            "ResolvedFile(root={:?}, relative_path={:?})",
            display(self.inner.root()),
            display(self.inner.relative_path())
        )
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn active_config() -> PyResult<Arc<BuildConfig>> {
    context::current().ok_or_else(|| {
        DuncError::new_err("dunc helpers are only available while a build routine is running")
    })
}

#[pyfunction]
fn is_build() -> PyResult<bool> {
    Ok(active_config()?.is_build())
}

#[pyfunction]
fn is_install() -> PyResult<bool> {
    Ok(active_config()?.is_install())
}

#[pyfunction]
fn get_build_path() -> PyResult<String> {
    active_config()?
        .build_path()
        .map(display)
        .map_err(config_error)
}

#[pyfunction]
fn get_install_path() -> PyResult<String> {
    active_config()?
        .install_path()
        .map(display)
        .map_err(config_error)
}

#[pyfunction]
fn get_source_path() -> PyResult<String> {
    active_config()?
        .source_path()
        .map(display)
        .map_err(config_error)
}

#[pyfunction]
fn get_project_file() -> PyResult<String> {
    active_config()?
        .project_file()
        .map(display)
        .map_err(config_error)
}

#[pyfunction]
fn get_project_name() -> PyResult<String> {
    active_config()?
        .project_name()
        .map(str::to_string)
        .map_err(config_error)
}

#[pyfunction]
fn get_project_version() -> PyResult<String> {
    active_config()?
        .project_version()
        .map(str::to_string)
        .map_err(config_error)
}

#[pyfunction]
fn get_is_release() -> PyResult<bool> {
    active_config()?.is_release().map_err(config_error)
}

#[pyfunction]
fn get_is_local() -> PyResult<bool> {
    active_config()?.is_local().map_err(config_error)
}

#[pyfunction]
fn get_clobber() -> PyResult<bool> {
    Ok(active_config()?.clobber())
}

/// Resolve `pattern` under `root`, which defaults to the source root
#[pyfunction]
#[pyo3(signature = (pattern, recursive = true, root = None))]
fn find_files(
    pattern: &str,
    recursive: bool,
    root: Option<PathBuf>,
) -> PyResult<Vec<PyResolvedFile>> {
    let config = active_config()?;
    debug!("find_files({:?}, recursive={}, root={:?})", pattern, recursive, root);
    let files = PatternResolver::new(&config)
        .resolve(pattern, root.as_deref(), recursive)
        .map_err(files_error)?;
    Ok(files
        .into_iter()
        .map(|inner| PyResolvedFile { inner })
        .collect())
}

/// Install `files` under `install_path`, which defaults to the install root
///
/// Entries are `ResolvedFile` objects or paths relative to the source root.
#[pyfunction]
#[pyo3(signature = (files, install_path = None, symlink = false, executable = false))]
fn install_files(
    files: &Bound<'_, PyAny>,
    install_path: Option<PathBuf>,
    symlink: bool,
    executable: bool,
) -> PyResult<()> {
    let config = active_config()?;

    let mut entries = Vec::new();
    for item in files.try_iter()? {
        let item = item?;
        if let Ok(resolved) = item.cast::<PyResolvedFile>() {
            entries.push(resolved.get().inner.clone());
            continue;
        }
        let relative: PathBuf = item.extract()?;
        let source_root = config.source_path().map_err(config_error)?;
        entries.push(ResolvedFile::new(source_root, relative));
    }

    debug!(
        "install_files: {} entries, install_path={:?}, symlink={}, executable={}",
        entries.len(),
        install_path,
        symlink,
        executable
    );
    let target = InstallTarget {
        destination_root: install_path,
        entries,
        symlink,
        executable,
    };
    FileInstaller::new(&config)
        .install(&target)
        .map_err(files_error)?;
    Ok(())
}

/// Build the module and publish it in `sys.modules`
pub fn register(py: Python<'_>) -> PyResult<()> {
    let module = PyModule::new(py, MODULE_NAME)?;

    module.add_class::<PyResolvedFile>()?;
    module.add_function(wrap_pyfunction!(is_build, &module)?)?;
    module.add_function(wrap_pyfunction!(is_install, &module)?)?;
    module.add_function(wrap_pyfunction!(get_build_path, &module)?)?;
    module.add_function(wrap_pyfunction!(get_install_path, &module)?)?;
    module.add_function(wrap_pyfunction!(get_source_path, &module)?)?;
    module.add_function(wrap_pyfunction!(get_project_file, &module)?)?;
    module.add_function(wrap_pyfunction!(get_project_name, &module)?)?;
    module.add_function(wrap_pyfunction!(get_project_version, &module)?)?;
    module.add_function(wrap_pyfunction!(get_is_release, &module)?)?;
    module.add_function(wrap_pyfunction!(get_is_local, &module)?)?;
    module.add_function(wrap_pyfunction!(get_clobber, &module)?)?;
    module.add_function(wrap_pyfunction!(find_files, &module)?)?;
    module.add_function(wrap_pyfunction!(install_files, &module)?)?;

    module.add("DuncError", py.get_type::<DuncError>())?;
    module.add("DunkError", py.get_type::<DuncError>())?;
    module.add("ConfigError", py.get_type::<ConfigError>())?;
    module.add("RootNotFoundError", py.get_type::<RootNotFoundError>())?;
    module.add("PathError", py.get_type::<PathError>())?;
    module.add("__version__", env!("CARGO_PKG_VERSION"))?;

    PyModule::import(py, "sys")?
        .getattr("modules")?
        .set_item(MODULE_NAME, &module)?;
    Ok(())
}
