//! Unanticipated errors that fall outside the [`Exception`](super::Exception)
//! taxonomy.

use std::fmt;
use std::panic::Location;

/// An unexpected failure, always answered with 500.
///
/// Records the source location it was raised at. Constructors and the
/// `From<anyhow::Error>` conversion are `#[track_caller]`, so a `?` or a
/// `RuntimeError::new` call site is what gets recorded. Errors wrapped with
/// [`RuntimeError::from_boxed`] have no known raise site.
#[derive(Debug)]
pub struct RuntimeError {
    error: anyhow::Error,
    location: Option<&'static Location<'static>>,
}

impl RuntimeError {
    #[track_caller]
    pub fn new<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            error: anyhow::Error::msg(message),
            location: Some(Location::caller()),
        }
    }

    #[track_caller]
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            error: anyhow::Error::new(error),
            location: Some(Location::caller()),
        }
    }

    /// Wrap an error caught at a type-erased boundary.
    ///
    /// The place it was caught says nothing about where it was raised, so
    /// no location is recorded.
    pub fn from_boxed(error: super::BoxError) -> Self {
        Self {
            error: anyhow::anyhow!(error),
            location: None,
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Messages of the underlying causes, outermost first
    pub fn causes(&self) -> Vec<String> {
        self.error.chain().skip(1).map(ToString::to_string).collect()
    }

    pub fn location(&self) -> Option<&'static Location<'static>> {
        self.location
    }

    /// The source file the error was raised in
    pub fn file(&self) -> Option<&'static str> {
        self.location.map(Location::file)
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.error
    }
}

impl From<anyhow::Error> for RuntimeError {
    #[track_caller]
    fn from(error: anyhow::Error) -> Self {
        Self {
            error,
            location: Some(Location::caller()),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}
