//! Logging capability injected into the exception handler.
//!
//! Every handled error produces exactly one [`LogEntry`]. Logging is
//! best-effort: the handler reports a failed [`Logger::log`] through
//! `tracing` and still returns its response.

use axum::http::StatusCode;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Log sink unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write log entry: {0}")]
    Write(String),
}

/// A record of one handled error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Reference id, also shown in the response body
    pub id: Uuid,
    /// Stable code of the error kind, e.g. `not_found` or `runtime`
    pub kind: &'static str,
    pub status: StatusCode,
    pub message: String,
    /// Where a runtime error was raised
    pub location: Option<String>,
}

pub trait Logger: Send + Sync + 'static {
    fn log(&self, entry: &LogEntry) -> Result<(), LogError>;
}

/// Emits entries as `tracing` events: `warn` for client errors, `error`
/// otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, entry: &LogEntry) -> Result<(), LogError> {
        let location = entry.location.as_deref().unwrap_or("-");
        if entry.status.is_client_error() {
            tracing::warn!(
                error.id = %entry.id,
                error.kind = entry.kind,
                error.location = location,
                http.status = entry.status.as_u16(),
                "{}",
                entry.message
            );
        } else {
            tracing::error!(
                error.id = %entry.id,
                error.kind = entry.kind,
                error.location = location,
                http.status = entry.status.as_u16(),
                "{}",
                entry.message
            );
        }
        Ok(())
    }
}

/// Discards every entry
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _entry: &LogEntry) -> Result<(), LogError> {
        Ok(())
    }
}

/// Keeps entries in memory so they can be inspected later.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Logger for MemoryLogger {
    fn log(&self, entry: &LogEntry) -> Result<(), LogError> {
        self.entries
            .lock()
            .map_err(|_| LogError::Unavailable("memory log lock poisoned".to_string()))?
            .push(entry.clone());
        Ok(())
    }
}
