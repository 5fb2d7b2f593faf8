//! Remote data client for the attendance backend.
//!
//! Split in two layers:
//! - [`Transport`] moves one request and one JSON response over the wire. The
//!   production implementation is [`HttpTransport`]; tests script their own.
//! - [`RemoteClient`] knows resource paths and response envelopes, and converts every
//!   failure into the crate's error taxonomy.

pub mod client;
pub mod http;

pub use client::RemoteClient;
pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// HTTP verbs used by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read a collection
    Get,
    /// Create a record or upload a file
    Post,
    /// Update a record
    Put,
    /// Remove a record
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// One multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    /// Plain text value
    Text(String),
    /// File attachment
    File {
        /// File name sent to the server
        file_name: String,
        /// File contents
        bytes: Vec<u8>,
    },
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `application/json`
    Json(Value),
    /// `multipart/form-data`, fields in insertion order
    Form(Vec<(String, FormField)>),
}

impl Payload {
    /// Starts an empty multipart body.
    #[must_use]
    pub const fn form() -> Self {
        Self::Form(Vec::new())
    }

    /// Appends a text field. No-op on JSON payloads.
    #[must_use]
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Self::Form(fields) = &mut self {
            fields.push((name.to_string(), FormField::Text(value.into())));
        }
        self
    }

    /// Appends a file field. No-op on JSON payloads.
    #[must_use]
    pub fn file(mut self, name: &str, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        if let Self::Form(fields) = &mut self {
            fields.push((
                name.to_string(),
                FormField::File {
                    file_name: file_name.into(),
                    bytes,
                },
            ));
        }
        self
    }

    /// Text value of a form field, if present.
    #[must_use]
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match self {
            Self::Form(fields) => fields.iter().find_map(|(field, value)| match value {
                FormField::Text(text) if field == name => Some(text.as_str()),
                _ => None,
            }),
            Self::Json(_) => None,
        }
    }
}

/// A request relative to the backend base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb
    pub method: Method,
    /// Path without a leading slash, e.g. `crs/remove/R210387`
    pub path: String,
    /// Body, if any
    pub body: Option<Payload>,
}

impl ApiRequest {
    /// Request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Attaches a body.
    #[must_use]
    pub fn with_body(mut self, body: Payload) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status code and decoded body of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status
    pub status: u16,
    /// JSON body; `None` when the body was empty or not JSON
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Top-level field of a JSON object body.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.get(name))
    }

    /// The `message` field of the body, if the server sent one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.field("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }
}

/// Failure below the HTTP status level: nothing usable came back.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS, timeout and similar failures
    #[error("network error: {0}")]
    Network(String),
    /// The request could not be built
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Moves a single request to the backend and returns its response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request`. Non-2xx statuses are returned as responses, not errors.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_builder_keeps_order() {
        let payload = Payload::form()
            .text("id", "R1")
            .file("file", "a.xlsx", vec![1, 2])
            .text("replace", "false");
        let Payload::Form(fields) = &payload else {
            panic!("expected form payload");
        };
        let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["id", "file", "replace"]);
        assert_eq!(payload.text_field("replace"), Some("false"));
        assert_eq!(payload.text_field("file"), None);
    }

    #[test]
    fn test_response_message_ignores_empty() {
        let response = ApiResponse {
            status: 400,
            body: Some(json!({"message": ""})),
        };
        assert!(!response.is_success());
        assert_eq!(response.message(), None);
    }
}
