//! Error handling module
//!
//! `types` holds the library's own failure type, [`IodineError`]. `context`
//! holds the `Result` extensions and macros for wrapping payload errors into
//! [`AnnotatedError`](crate::AnnotatedError)s.

pub mod types;
pub mod context;

pub use types::{IodineError, IodineResult};
pub use context::{AnnotateResultExt, IodineResultExt};
