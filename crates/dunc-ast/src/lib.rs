//! Entry-point discovery in rez package descriptors
//!
//! A descriptor (`package.py`) is plain Python. dunc never executes it as a
//! whole: this crate parses it with ast-grep, finds a named top-level routine
//! and hands back only that routine's source text. Compiling and running the
//! slice is the job of the Python bridge.

pub mod descriptor;
pub mod errors;

pub use descriptor::{Descriptor, RoutineSource};
pub use errors::ExtractError;
