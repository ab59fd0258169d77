//! Embedded interpreter start-up
//!
//! The interpreter is started once per process. Start-up also registers the
//! `dunc` module so routines can import it without it being installed.

use crate::errors::BridgeError;
use crate::module;
use dunc_logger as logger;
use once_cell::sync::OnceCell;
use pyo3::prelude::*;
use pyo3::types::PyModule;

pub struct Bridge {}

static BRIDGE_INSTANCE: OnceCell<Result<Bridge, BridgeError>> = OnceCell::new();

impl Bridge {
    /// Get or initialize the bridge singleton
    pub fn get() -> Result<&'static Bridge, BridgeError> {
        match BRIDGE_INSTANCE.get_or_init(Bridge::initialize) {
            Ok(bridge) => Ok(bridge),
            Err(e) => Err(BridgeError::Initialization(format!("{}", e))),
        }
    }

    fn initialize() -> Result<Bridge, BridgeError> {
        let start_time = std::time::Instant::now();

        pyo3::Python::initialize();
        logger::debug(&format!(
            "pyo3::Python::initialize took: {:?}",
            start_time.elapsed()
        ));

        pyo3::Python::attach(|py| {
            // routines import from the source tree, which must stay clean
            let sys = PyModule::import(py, "sys")
                .map_err(|e| BridgeError::Python(format!("Failed to import sys module: {}", e)))?;
            sys.setattr("dont_write_bytecode", true).map_err(|e| {
                BridgeError::Python(format!("Failed to disable bytecode generation: {}", e))
            })?;

            module::register(py).map_err(|e| {
                BridgeError::Initialization(format!(
                    "Failed to register the '{}' module: {}",
                    module::MODULE_NAME,
                    e
                ))
            })?;

            logger::debug(&format!("Embedded Python {}", py.version()));
            Ok::<(), BridgeError>(())
        })?;

        logger::debug(&format!(
            "Total bridge initialization took: {:?}",
            start_time.elapsed()
        ));
        Ok(Bridge {})
    }
}
