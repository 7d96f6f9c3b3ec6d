//! Error types for the student records client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the
//! record does not exist" from other failures. A 4xx carrying an `{"error":
//! "..."}` payload is a `Validation` failure whose message is meant for the
//! user. 5xx responses are `Server`; anything else non-2xx is `HttpError`
//! with the raw status and body for debugging.

use serde::Deserialize;
use thiserror::Error;

use crate::http::TransportError;
use crate::types::{Field, StudentId};
use crate::view::ActionKind;

/// Errors returned by `StudentClient` parse methods and `RecordStore`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server rejected the payload with a user-facing message.
    #[error("rejected by server (HTTP {status}): {message}")]
    Validation { status: u16, message: String },

    /// The server returned a 5xx status.
    #[error("server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: String,
}

/// Extract the `error` string of a `{"error": "..."}` body, if present.
pub(crate) fn error_payload(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.error)
}

impl ApiError {
    /// Message the server addressed to the user, if it sent one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::Validation { message, .. } => Some(message.clone()),
            ApiError::Server { body, .. } => error_payload(body),
            _ => None,
        }
    }
}

/// Errors returned by `StudentView` when an action cannot start.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("a {0} request is already in flight")]
    InFlight(ActionKind),

    #[error("the view has been unmounted")]
    Unmounted,

    #[error("no student with id {0} in the current list")]
    UnknownStudent(StudentId),

    #[error("failed to build request: {0}")]
    Request(String),
}
