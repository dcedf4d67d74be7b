use crate::negotiation::Representation;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// A rendered error response
///
/// Carries the status, the negotiated representation and the rendered body.
/// Built once by the exception handler and never modified afterwards.
///
/// # Example
/// ```
/// use darkmatter::common::ErrorResponse;
/// use darkmatter::negotiation::Representation;
/// use axum::http::StatusCode;
///
/// let response = ErrorResponse::new(StatusCode::NOT_FOUND, Representation::Json, "{}");
/// assert_eq!(response.status(), StatusCode::NOT_FOUND);
/// assert_eq!(response.content_type(), "application/json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    status: StatusCode,
    representation: Representation,
    body: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, representation: Representation, body: impl Into<String>) -> Self {
        Self {
            status,
            representation,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn content_type(&self) -> &'static str {
        self.representation.content_type()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type())],
            self.body,
        )
            .into_response()
    }
}
