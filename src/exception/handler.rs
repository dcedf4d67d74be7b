//! Exception handler
//!
//! Turns domain exceptions and runtime errors into negotiated error
//! responses. The request headers are passed on every call, so one handler
//! can be shared by all requests.

use super::render::{ErrorPages, ErrorView};
use super::{BoxError, Exception, ExceptionFilter, RuntimeError, generic_title};
use crate::common::ErrorResponse;
use crate::config::{ConfigService, ExceptionSettings};
use crate::error::Result;
use crate::logger::{LogEntry, Logger};
use crate::negotiation::Representation;
use axum::http::{HeaderMap, StatusCode};
use std::sync::Arc;
use uuid::Uuid;

const RUNTIME_KIND: &str = "runtime";
const HIDDEN_MESSAGE: &str = "Internal Server Error";

/// Maps errors to HTTP responses
///
/// # Example
/// ```
/// use darkmatter::config::ConfigService;
/// use darkmatter::exception::{Exception, ExceptionHandler};
/// use darkmatter::logger::NullLogger;
/// use axum::http::{HeaderMap, StatusCode};
/// use std::sync::Arc;
///
/// let handler = ExceptionHandler::new(&ConfigService::empty(), Arc::new(NullLogger)).unwrap();
/// let response = handler.handle_exception(&HeaderMap::new(), &Exception::not_found("no user"));
///
/// assert_eq!(response.status(), StatusCode::NOT_FOUND);
/// assert!(response.body().contains("<title>404 Not found</title>"));
/// ```
#[derive(Clone)]
pub struct ExceptionHandler {
    settings: ExceptionSettings,
    logger: Arc<dyn Logger>,
    pages: Arc<ErrorPages>,
}

impl ExceptionHandler {
    /// Fails only if the embedded error page template does not compile.
    pub fn new(config: &ConfigService, logger: Arc<dyn Logger>) -> Result<Self> {
        Self::with_settings(ExceptionSettings::from_config(config), logger)
    }

    pub fn with_settings(settings: ExceptionSettings, logger: Arc<dyn Logger>) -> Result<Self> {
        Ok(Self {
            settings,
            logger,
            pages: Arc::new(ErrorPages::new()?),
        })
    }

    pub fn settings(&self) -> &ExceptionSettings {
        &self.settings
    }

    /// Handle an unanticipated error. Always 500.
    ///
    /// The message, cause chain and source location are only rendered in
    /// debug mode. The log entry always carries them.
    pub fn handle_error(&self, headers: &HeaderMap, error: &RuntimeError) -> ErrorResponse {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let location = error.location().map(ToString::to_string);
        let entry = LogEntry {
            id: Uuid::new_v4(),
            kind: RUNTIME_KIND,
            status,
            message: error.message(),
            location: location.clone(),
        };
        self.log(&entry);

        let view = if self.settings.debug {
            ErrorView {
                id: entry.id,
                status,
                code: RUNTIME_KIND,
                title: generic_title(status),
                message: entry.message,
                location,
                causes: error.causes(),
            }
        } else {
            ErrorView {
                id: entry.id,
                status,
                code: RUNTIME_KIND,
                title: generic_title(status),
                message: HIDDEN_MESSAGE.to_string(),
                location: None,
                causes: Vec::new(),
            }
        };
        self.respond(headers, &view)
    }

    /// Handle a domain exception. The status follows from its kind.
    pub fn handle_exception(&self, headers: &HeaderMap, exception: &Exception) -> ErrorResponse {
        let kind = exception.kind();
        let entry = LogEntry {
            id: Uuid::new_v4(),
            kind: kind.code(),
            status: kind.status(),
            message: exception.message().to_string(),
            location: None,
        };
        self.log(&entry);

        let view = ErrorView {
            id: entry.id,
            status: entry.status,
            code: entry.kind,
            title: kind.title(),
            message: entry.message,
            location: None,
            causes: Vec::new(),
        };
        self.respond(headers, &view)
    }

    fn respond(&self, headers: &HeaderMap, view: &ErrorView) -> ErrorResponse {
        let representation = Representation::from_headers(headers);
        let body = self.pages.render(view, representation, &self.settings);
        ErrorResponse::new(view.status, representation, body)
    }

    fn log(&self, entry: &LogEntry) {
        if let Err(e) = self.logger.log(entry) {
            tracing::warn!("Failed to log error {}: {}", entry.id, e);
        }
    }
}

impl ExceptionFilter for ExceptionHandler {
    fn catch(&self, headers: &HeaderMap, error: BoxError) -> ErrorResponse {
        let error = match error.downcast::<Exception>() {
            Ok(exception) => return self.handle_exception(headers, &exception),
            Err(error) => error,
        };
        match error.downcast::<RuntimeError>() {
            Ok(runtime) => self.handle_error(headers, &runtime),
            Err(other) => self.handle_error(headers, &RuntimeError::from_boxed(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{LogError, MemoryLogger};
    use axum::http::{HeaderValue, header};

    struct BrokenLogger;

    impl Logger for BrokenLogger {
        fn log(&self, _entry: &LogEntry) -> std::result::Result<(), LogError> {
            Err(LogError::Unavailable("disk full".to_string()))
        }
    }

    fn handler(debug: bool) -> (ExceptionHandler, MemoryLogger) {
        let logger = MemoryLogger::new();
        let handler = ExceptionHandler::with_settings(
            ExceptionSettings::default().debug(debug),
            Arc::new(logger.clone()),
        )
        .unwrap();
        (handler, logger)
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_runtime_error_in_debug_mode_shows_location() {
        let (handler, logger) = handler(true);
        let error = RuntimeError::new("Test");

        let response = handler.handle_error(&HeaderMap::new(), &error);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body().contains("<title>Error 500</title>"));
        assert!(response.body().contains("handler.rs"));
        assert!(response.body().contains(">Test<"));
        assert_eq!(logger.len(), 1);
    }

    #[test]
    fn test_runtime_error_hides_details_outside_debug_mode() {
        let (handler, logger) = handler(false);
        let error = RuntimeError::new("password=hunter2");

        let response = handler.handle_error(&HeaderMap::new(), &error);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.body().contains("handler.rs"));
        assert!(!response.body().contains("hunter2"));
        assert!(response.body().contains(HIDDEN_MESSAGE));

        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "password=hunter2");
        assert!(entries[0].location.as_deref().unwrap().contains("handler.rs"));
    }

    #[test]
    fn test_runtime_error_as_json_hides_details_outside_debug_mode() {
        let (handler, logger) = handler(false);
        let error = RuntimeError::new("password=hunter2");

        let response = handler.handle_error(&json_headers(), &error);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.body().contains("hunter2"));
        assert!(!response.body().contains("handler.rs"));

        let decoded: serde_json::Value = serde_json::from_str(response.body()).unwrap();
        let entry = &decoded["errors"][0];
        assert_eq!(entry["message"], HIDDEN_MESSAGE);
        assert_eq!(entry["status"], 500);
        assert!(entry.get("location").is_none());
        assert!(entry.get("causes").is_none());
        assert_eq!(entry["id"], logger.entries()[0].id.to_string());
    }

    #[test]
    fn test_runtime_error_as_json() {
        let (handler, _) = handler(true);
        let error = RuntimeError::new("boom");

        let response = handler.handle_error(&json_headers(), &error);
        let decoded: serde_json::Value = serde_json::from_str(response.body()).unwrap();

        assert_eq!(decoded["errors"][0]["status"], 500);
        assert_eq!(decoded["errors"][0]["code"], "runtime");
        assert_eq!(decoded["errors"][0]["message"], "boom");
        assert!(
            decoded["errors"][0]["location"]
                .as_str()
                .unwrap()
                .contains("handler.rs")
        );
    }

    #[test]
    fn test_exception_statuses_and_titles() {
        let (handler, logger) = handler(false);
        let cases = [
            (Exception::bad_request("bad request"), 400, "400 Bad Request"),
            (Exception::not_found("not found"), 404, "404 Not found"),
            (
                Exception::method_not_allowed("method not allowed"),
                405,
                "405 Method not allowed",
            ),
            (Exception::application("foobar error"), 500, "Error 500"),
        ];

        for (exception, status, title) in &cases {
            let response = handler.handle_exception(&HeaderMap::new(), exception);
            assert_eq!(response.status().as_u16(), *status);
            assert_eq!(response.representation(), Representation::Html);
            assert!(response.body().contains(&format!("<title>{title}</title>")));
            assert!(response.body().contains(exception.message()));
        }
        assert_eq!(logger.len(), cases.len());
    }

    #[test]
    fn test_exception_as_json() {
        let (handler, logger) = handler(false);
        let response =
            handler.handle_exception(&json_headers(), &Exception::application("json error"));

        assert_eq!(response.content_type(), "application/json");
        let decoded: serde_json::Value = serde_json::from_str(response.body()).unwrap();
        assert_eq!(decoded["errors"][0]["message"], "json error");
        assert_eq!(
            decoded["errors"][0]["id"],
            logger.entries()[0].id.to_string()
        );
    }

    #[test]
    fn test_failing_logger_does_not_change_response() {
        let handler =
            ExceptionHandler::with_settings(ExceptionSettings::default(), Arc::new(BrokenLogger))
                .unwrap();

        let response =
            handler.handle_exception(&HeaderMap::new(), &Exception::not_found("gone"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.body().contains("<title>404 Not found</title>"));

        let response = handler.handle_error(&HeaderMap::new(), &RuntimeError::new("x"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_catch_dispatches_on_error_type() {
        let (handler, logger) = handler(true);

        let response = handler.catch(
            &HeaderMap::new(),
            Box::new(Exception::method_not_allowed("POST only")),
        );
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = handler.catch(&HeaderMap::new(), Box::new(RuntimeError::new("inner")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body().contains("inner"));

        let io = std::io::Error::other("socket closed");
        let response = handler.catch(&json_headers(), Box::new(io));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let decoded: serde_json::Value = serde_json::from_str(response.body()).unwrap();
        assert_eq!(decoded["errors"][0]["message"], "socket closed");
        assert!(decoded["errors"][0].get("location").is_none());

        let entries = logger.entries();
        assert_eq!(entries.len(), 3);
        assert!(entries[2].location.is_none());
    }

    #[test]
    fn test_foreign_error_page_does_not_blame_the_handler() {
        let (handler, _) = handler(true);
        let io = std::io::Error::other("socket closed");

        let response = handler.catch(&HeaderMap::new(), Box::new(io));
        assert!(response.body().contains("socket closed"));
        assert!(!response.body().contains("handler.rs"));
        assert!(!response.body().contains("Raised at"));
    }
}
