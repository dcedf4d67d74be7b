//! # DarkMatter
//!
//! Exception handling for the DarkMatter web framework.
//!
//! Errors raised while serving a request are turned into well-formed HTTP
//! responses. The status code follows from the kind of error, the body is an
//! HTML page or a JSON envelope depending on the request's `Accept` header.
//!
//! ## Features
//!
//! - **Exception taxonomy**: `BadRequest` (400), `NotFound` (404),
//!   `MethodNotAllowed` (405) and generic application errors (500)
//! - **Runtime errors**: unexpected failures remember where they were raised,
//!   shown on error pages in debug mode only
//! - **Content negotiation**: `application/json` clients get
//!   `{"errors": [...]}`, everyone else an HTML page
//! - **Injected logging**: every handled error is logged exactly once through
//!   a [`Logger`](logger::Logger)
//! - **Tower integration**: [`ExceptionLayer`](exception::ExceptionLayer)
//!   answers inner service errors
//!
//! ## Quick Start
//!
//! ```rust
//! use darkmatter::prelude::*;
//! use axum::http::{HeaderMap, HeaderValue, header};
//!
//! let config = ConfigService::from_json_str(r#"{"app": {"debug": false}}"#).unwrap();
//! let handler = ExceptionHandler::new(&config, Arc::new(TracingLogger)).unwrap();
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
//!
//! let response = handler.handle_exception(&headers, &Exception::bad_request("missing name"));
//! assert_eq!(response.status(), StatusCode::BAD_REQUEST);
//! assert!(response.body().contains("missing name"));
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod exception;
pub mod logger;
pub mod negotiation;

// Re-export core types
pub use common::ErrorResponse;
pub use config::{ConfigService, ExceptionSettings};
pub use error::{DarkMatterError, Result};
pub use exception::{Exception, ExceptionFilter, ExceptionHandler, ExceptionLayer, RuntimeError};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use darkmatter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::ErrorResponse;
    pub use crate::config::{ConfigService, ExceptionSettings};
    pub use crate::error::{DarkMatterError, Result};
    pub use crate::exception::{
        BoxError, Exception, ExceptionFilter, ExceptionHandler, ExceptionKind, ExceptionLayer,
        RuntimeError,
    };
    pub use crate::logger::{LogEntry, LogError, Logger, MemoryLogger, NullLogger, TracingLogger};
    pub use crate::negotiation::{Representation, negotiate};
    pub use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
