//! Exception classes exported by the `dunc` module
//!
//! Every failure of a dunc helper is raised as a subclass of `DuncError` so
//! descriptors can catch them all at once, and so the bridge can tell dunc
//! failures apart from bugs in a routine.

use dunc_config::ConfigError as BuildConfigError;
use dunc_files::FilesError;
use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::PyErr;

create_exception!(dunc, DuncError, PyException, "Base class for all dunc errors.");
create_exception!(
    dunc,
    ConfigError,
    DuncError,
    "A required build variable is missing or invalid."
);
create_exception!(
    dunc,
    RootNotFoundError,
    DuncError,
    "The root directory of a file search does not exist."
);
create_exception!(
    dunc,
    PathError,
    DuncError,
    "A path that must be relative was absolute or left its root."
);

pub fn config_error(err: BuildConfigError) -> PyErr {
    ConfigError::new_err(err.to_string())
}

pub fn files_error(err: FilesError) -> PyErr {
    let message = err.to_string();
    match err {
        FilesError::RootNotFound(_) => RootNotFoundError::new_err(message),
        FilesError::AbsolutePath(_) | FilesError::EscapesRoot(_) => PathError::new_err(message),
        FilesError::Config(_) => ConfigError::new_err(message),
        FilesError::InvalidPattern { .. } | FilesError::Io { .. } => DuncError::new_err(message),
    }
}
