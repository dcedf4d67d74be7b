//! Content negotiation for error responses.

use axum::http::{HeaderMap, header};

const JSON_MEDIA_TYPE: &str = "application/json";

/// How an error response body is represented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representation {
    #[default]
    Html,
    Json,
}

impl Representation {
    /// Negotiate from every `Accept` header present on a request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| negotiate(Some(value)) == Representation::Json);

        if wants_json {
            Representation::Json
        } else {
            Representation::Html
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Representation::Html => "text/html; charset=utf-8",
            Representation::Json => JSON_MEDIA_TYPE,
        }
    }
}

/// Pick a representation from an `Accept` header value.
///
/// Any listed media range equal to `application/json` (parameters ignored)
/// selects JSON. Everything else, including a missing header, is HTML.
///
/// Quality values are not weighed: `application/json;q=0` still selects
/// JSON, since the media type is listed.
pub fn negotiate(accept: Option<&str>) -> Representation {
    let Some(accept) = accept else {
        return Representation::Html;
    };

    let wants_json = accept.split(',').any(|range| {
        range
            .split(';')
            .next()
            .map(str::trim)
            .is_some_and(|media| media.eq_ignore_ascii_case(JSON_MEDIA_TYPE))
    });

    if wants_json {
        Representation::Json
    } else {
        Representation::Html
    }
}
