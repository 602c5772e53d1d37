//! Result extensions and macros for wrapping and annotating errors
//!
//! These are thin conveniences over [`AnnotatedError::new`] and
//! [`AnnotatedError::annotate`] for use at `?` sites. Each one records the
//! location of the code that invoked it.

use crate::annotated::{AnnotatedError, EmbeddedError};
use crate::state::ContextData;

/// Extension trait for wrapping any error into an [`AnnotatedError`]
pub trait IodineResultExt<T> {
    /// Wrap the error, if any, attaching `data` to the first stack entry
    fn iodine(self, data: ContextData) -> Result<T, AnnotatedError>;

    /// Wrap the error with a lazily built context map
    fn iodine_with<F>(self, f: F) -> Result<T, AnnotatedError>
    where
        F: FnOnce() -> ContextData;
}

impl<T, E> IodineResultExt<T> for Result<T, E>
where
    E: Into<EmbeddedError>,
{
    #[track_caller]
    fn iodine(self, data: ContextData) -> Result<T, AnnotatedError> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(AnnotatedError::new(e, data)),
        }
    }

    #[track_caller]
    fn iodine_with<F>(self, f: F) -> Result<T, AnnotatedError>
    where
        F: FnOnce() -> ContextData,
    {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(AnnotatedError::new(e, f())),
        }
    }
}

/// Extension trait for adding a stack entry to an already annotated error
pub trait AnnotateResultExt<T> {
    fn annotate_err(self, info: ContextData) -> Result<T, AnnotatedError>;
}

impl<T> AnnotateResultExt<T> for Result<T, AnnotatedError> {
    #[track_caller]
    fn annotate_err(self, info: ContextData) -> Result<T, AnnotatedError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.annotated(info)),
        }
    }
}

/// Build a [`ContextData`](crate::ContextData) map from `key => value` pairs
///
/// Keys and values may be anything implementing `ToString`.
#[macro_export]
macro_rules! context_data {
    () => {
        $crate::ContextData::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut data = $crate::ContextData::new();
        $(
            data.insert($key.to_string(), $value.to_string());
        )+
        data
    }};
}

/// Wrap an error at the macro's call site using the global context
///
/// Usage:
/// ```rust
/// use iodine::iodine;
///
/// let io = std::io::Error::new(std::io::ErrorKind::Other, "short write");
/// let err = iodine!(io, "object" => "a.jpg");
/// assert_eq!(err.stack()[0].line, line!() - 1);
/// ```
#[macro_export]
macro_rules! iodine {
    ($err:expr) => {
        $crate::AnnotatedError::new_at(
            $crate::Annotator::global(),
            $crate::CallSite::new(file!(), line!()),
            $err,
            $crate::ContextData::new(),
        )
    };
    ($err:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::AnnotatedError::new_at(
            $crate::Annotator::global(),
            $crate::CallSite::new(file!(), line!()),
            $err,
            $crate::context_data!($($key => $value),+),
        )
    };
}

/// Append a stack entry at the macro's call site; evaluates to `&mut AnnotatedError`
#[macro_export]
macro_rules! annotate {
    ($err:expr) => {
        $err.annotate_at(
            $crate::Annotator::global(),
            $crate::CallSite::new(file!(), line!()),
            $crate::ContextData::new(),
        )
    };
    ($err:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $err.annotate_at(
            $crate::Annotator::global(),
            $crate::CallSite::new(file!(), line!()),
            $crate::context_data!($($key => $value),+),
        )
    };
}
