//! The annotated error type
//!
//! An [`AnnotatedError`] wraps an underlying error and grows a history of
//! [`StackEntry`] values as it propagates: one when it is created, one more for
//! every [`annotate`](AnnotatedError::annotate) call along the way. The
//! wrapped error is never altered; `Display` and `source()` forward to it.

use crate::capture::{Annotator, CallSite, StackEntry};
use crate::state::ContextData;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use tracing::debug;

/// Boxed underlying error
pub type EmbeddedError = Box<dyn StdError + Send + Sync + 'static>;

/// An error enriched with an ordered, append-only history of stack entries
///
/// The embedded error is skipped during serialization; its message is kept
/// in `ErrorMessage` instead.
///
/// # Example
///
/// ```rust
/// use iodine::{AnnotatedError, ContextData};
///
/// let mut err = AnnotatedError::new("disk full", ContextData::new());
/// err.annotate(ContextData::from([("volume".to_string(), "/data".to_string())]));
///
/// assert_eq!(err.to_string(), "disk full");
/// assert_eq!(err.stack().len(), 2);
/// ```
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnnotatedError {
    #[serde(skip)]
    embedded: EmbeddedError,
    error_message: String,
    stack: Vec<StackEntry>,
}

impl AnnotatedError {
    /// Wraps `err`, recording the caller's location and the global context
    ///
    /// The embedded error's message is cached here. Its message must not
    /// change afterwards: `Display` forwards to the live error while
    /// [`error_message`](Self::error_message) returns the cached copy.
    #[track_caller]
    pub fn new(err: impl Into<EmbeddedError>, data: ContextData) -> Self {
        Self::with_annotator(Annotator::global(), err, data)
    }

    /// Wraps `err` using an explicit capture context
    #[track_caller]
    pub fn with_annotator(
        annotator: &Annotator,
        err: impl Into<EmbeddedError>,
        data: ContextData,
    ) -> Self {
        Self::wrap_at(annotator, CallSite::caller(), err.into(), data)
    }

    /// Wraps `err` at an explicitly supplied call site
    pub fn new_at(
        annotator: &Annotator,
        site: CallSite,
        err: impl Into<EmbeddedError>,
        data: ContextData,
    ) -> Self {
        Self::wrap_at(annotator, site, err.into(), data)
    }

    fn wrap_at(annotator: &Annotator, site: CallSite, embedded: EmbeddedError, data: ContextData) -> Self {
        let entry = annotator.capture_at(site, data);
        let error_message = embedded.to_string();
        debug!(error_message = %error_message, at = %entry.location(), "wrapped error");

        Self {
            embedded,
            error_message,
            stack: vec![entry],
        }
    }

    /// Appends one entry at the caller's location and returns `self` for chaining
    #[track_caller]
    pub fn annotate(&mut self, info: ContextData) -> &mut Self {
        self.annotate_with(Annotator::global(), info)
    }

    /// Like [`annotate`](Self::annotate) with an explicit capture context
    #[track_caller]
    pub fn annotate_with(&mut self, annotator: &Annotator, info: ContextData) -> &mut Self {
        self.annotate_at(annotator, CallSite::caller(), info)
    }

    /// Appends one entry at an explicitly supplied call site
    pub fn annotate_at(&mut self, annotator: &Annotator, site: CallSite, info: ContextData) -> &mut Self {
        let entry = annotator.capture_at(site, info);
        debug!(depth = self.stack.len() + 1, at = %entry.location(), "annotated error");
        self.stack.push(entry);
        self
    }

    /// Consuming form of [`annotate`](Self::annotate), handy in `map_err`
    #[track_caller]
    pub fn annotated(mut self, info: ContextData) -> Self {
        self.annotate_at(Annotator::global(), CallSite::caller(), info);
        self
    }

    /// Message of the embedded error, as it was when this error was created
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Stack entries, oldest first. Never empty.
    pub fn stack(&self) -> &[StackEntry] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn embedded(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.embedded.as_ref()
    }

    pub fn into_embedded(self) -> EmbeddedError {
        self.embedded
    }

    /// Downcasts the embedded error to a concrete type
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.embedded.downcast_ref::<E>()
    }
}

impl fmt::Display for AnnotatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.embedded, f)
    }
}

impl fmt::Debug for AnnotatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedError")
            .field("embedded", &self.embedded)
            .field("error_message", &self.error_message)
            .field("stack", &self.stack)
            .finish()
    }
}

impl StdError for AnnotatedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.embedded.as_ref())
    }
}
