//! Iodine error annotation library
//!
//! Wraps an error with a growing history of stack entries. Each entry records
//! the host, the source location that wrapped or annotated the error, and a
//! snapshot of ambient key/value context merged with caller-supplied data.
//! Annotated errors render as JSON for log pipelines or as text for terminals.
//!
//! ```rust
//! use iodine::{context_data, AnnotatedError, ContextData};
//!
//! iodine::set_global_state("request", "7f3a");
//! let mut err = AnnotatedError::new("disk full", context_data!("volume" => "/data"));
//! err.annotate(ContextData::new());
//!
//! let text = err.emit_human_readable();
//! assert_eq!(text.lines().count(), 3);
//! assert!(text.contains("request:7f3a"));
//! ```

pub mod annotated;
pub mod capture;
pub mod config;
pub mod errors;
pub mod logging;
pub mod render;
pub mod state;

// Re-export commonly used types for convenience
pub use annotated::{AnnotatedError, EmbeddedError};
pub use capture::{
    Annotator, CallSite, HostResolver, NoHostResolver, StackEntry, StaticHostResolver,
    SystemHostResolver,
};
pub use config::{IodineConfig, OutputFormat};
pub use errors::{AnnotateResultExt, IodineError, IodineResult, IodineResultExt};
pub use render::ErrorReport;
pub use state::{
    clear_global_state, get_global_state, global_store, set_global_state, ContextData,
    ContextStore,
};
