use crate::common::ErrorResponse;
use axum::http::{HeaderMap, StatusCode};
use std::error::Error;
use strum_macros::{Display, IntoStaticStr};

pub mod handler;
pub mod layer;
pub(crate) mod render;
pub mod runtime;

pub use handler::ExceptionHandler;
pub use layer::{ExceptionLayer, ExceptionMiddleware};
pub use runtime::RuntimeError;

/// A type-erased error caught by a filter
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Domain exceptions raised by application code.
///
/// Each variant carries a human readable message. The HTTP status is fixed
/// by the variant, see [`ExceptionKind::status`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Exception {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    /// Generic application failure, rendered as 500
    #[error("{0}")]
    Application(String),
}

impl Exception {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::MethodNotAllowed(message.into())
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::Application(message.into())
    }

    pub fn kind(&self) -> ExceptionKind {
        match self {
            Self::BadRequest(_) => ExceptionKind::BadRequest,
            Self::NotFound(_) => ExceptionKind::NotFound,
            Self::MethodNotAllowed(_) => ExceptionKind::MethodNotAllowed,
            Self::Application(_) => ExceptionKind::Application,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::MethodNotAllowed(message)
            | Self::Application(message) => message,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }
}

/// The kind of an [`Exception`], without its payload.
///
/// Displays as a stable snake_case code, e.g. `method_not_allowed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ExceptionKind {
    BadRequest,
    NotFound,
    MethodNotAllowed,
    Application,
}

impl ExceptionKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Application => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Page title for this kind.
    ///
    /// Reason phrase casing differs between kinds and is kept as is; clients
    /// match on these strings.
    pub fn title(self) -> String {
        match self {
            Self::BadRequest => "400 Bad Request".to_string(),
            Self::NotFound => "404 Not found".to_string(),
            Self::MethodNotAllowed => "405 Method not allowed".to_string(),
            Self::Application => generic_title(self.status()),
        }
    }
}

/// Title used for errors without a dedicated reason phrase
pub fn generic_title(status: StatusCode) -> String {
    format!("Error {}", status.as_u16())
}

/// The ExceptionFilter trait
///
/// Filters turn errors raised during request processing into responses.
/// They must always return a valid response and never fail themselves.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Catch an error raised while serving a request with the given headers
    fn catch(&self, headers: &HeaderMap, error: BoxError) -> ErrorResponse;
}
