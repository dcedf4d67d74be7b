//! Body rendering for error responses.
//!
//! HTML pages go through a tera template embedded with `include_str!`, so
//! every value is autoescaped. JSON bodies are the serialized view wrapped in
//! an `errors` envelope.

use crate::config::ExceptionSettings;
use crate::error::Result;
use crate::negotiation::Representation;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tera::{Context, Tera};
use uuid::Uuid;

const ERROR_PAGE: &str = "error.html";

/// Served when the template itself fails to render.
const FALLBACK_PAGE: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Error</title>\n</head>\n<body>\n<h1>Error</h1>\n</body>\n</html>\n";

const FALLBACK_JSON: &str = r#"{"errors":[{"message":"Internal Server Error"}]}"#;

/// Everything a rendered error page may show
#[derive(Debug, Serialize)]
pub(crate) struct ErrorView {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub code: &'static str,
    pub title: String,
    pub message: String,
    pub id: Uuid,
    /// Only set when debug details may be disclosed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

fn serialize_status<S: Serializer>(
    status: &StatusCode,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    errors: &'a [ErrorView],
    timestamp: DateTime<Utc>,
}

/// Renders error views in either representation
#[derive(Clone)]
pub(crate) struct ErrorPages {
    engine: Tera,
}

impl ErrorPages {
    pub fn new() -> Result<Self> {
        let mut engine = Tera::default();
        engine.add_raw_template(ERROR_PAGE, include_str!("../../templates/error.html"))?;
        Ok(Self { engine })
    }

    pub fn render(
        &self,
        view: &ErrorView,
        representation: Representation,
        settings: &ExceptionSettings,
    ) -> String {
        match representation {
            Representation::Html => self.render_html(view, settings),
            Representation::Json => render_json(view),
        }
    }

    fn render_html(&self, view: &ErrorView, settings: &ExceptionSettings) -> String {
        let context = match Context::from_serialize(view) {
            Ok(mut context) => {
                context.insert("app_name", &settings.app_name);
                context
            }
            Err(e) => {
                tracing::error!("Failed to build context for error page {}: {}", view.id, e);
                return FALLBACK_PAGE.to_string();
            }
        };

        self.engine
            .render(ERROR_PAGE, &context)
            .unwrap_or_else(|e| {
                tracing::error!("Failed to render error page {}: {}", view.id, e);
                FALLBACK_PAGE.to_string()
            })
    }
}

fn render_json(view: &ErrorView) -> String {
    let envelope = ErrorEnvelope {
        errors: std::slice::from_ref(view),
        timestamp: Utc::now(),
    };
    serde_json::to_string(&envelope).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize error {}: {}", view.id, e);
        FALLBACK_JSON.to_string()
    })
}
