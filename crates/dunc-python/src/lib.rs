//! Python bridge for descriptor routines
//!
//! The bridge owns the embedded interpreter and does two things:
//! 1. Compiles a single routine sliced out of a descriptor into a fresh,
//!    otherwise empty namespace and hands back a callable for it
//! 2. Registers the `dunc` module that routines import to find and install
//!    files
//!
//! Only the routine's own source is ever executed; the descriptor's
//! module-level statements never run.

mod context;
pub mod errors;
mod exceptions;
mod initialization;
mod module;
mod routine;
mod utils;

pub use errors::BridgeError;
pub use initialization::Bridge;
pub use module::MODULE_NAME;
pub use routine::ExtractedRoutine;
