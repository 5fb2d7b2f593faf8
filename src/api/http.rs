//! `reqwest`-backed transport.

use super::{ApiRequest, ApiResponse, FormField, Method, Payload, Transport, TransportError};
use crate::config::ApiConfig;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Async HTTP transport against a fixed base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Builds a transport from the `[api]` configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Base URL every request path is joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> std::result::Result<Url, TransportError> {
        join_url(&self.base_url, path)
    }
}

/// Joins `path` onto `base`, keeping any path prefix the base already has.
pub(crate) fn join_url(base: &Url, path: &str) -> std::result::Result<Url, TransportError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|e| TransportError::InvalidRequest(format!("bad path {path:?}: {e}")))
}

/// Parses a response body. Empty and non-JSON bodies (HTML error or wake-up pages)
/// decode to `None` so callers can tell them apart from JSON.
fn decode_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text)
        .inspect_err(|e| debug!("Response body is not JSON: {}", e))
        .ok()
}

fn multipart_form(fields: Vec<(String, FormField)>) -> Form {
    fields
        .into_iter()
        .fold(Form::new(), |form, (name, field)| match field {
            FormField::Text(text) => form.text(name, text),
            FormField::File { file_name, bytes } => {
                form.part(name, Part::bytes(bytes).file_name(file_name))
            }
        })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        debug!("{} {}", request.method, url);

        let builder = match request.method {
            Method::Get => self.http_client.get(url.clone()),
            Method::Post => self.http_client.post(url.clone()),
            Method::Put => self.http_client.put(url.clone()),
            Method::Delete => self.http_client.delete(url.clone()),
        };
        let builder = match request.body {
            Some(Payload::Json(value)) => builder.json(&value),
            Some(Payload::Form(fields)) => builder.multipart(multipart_form(fields)),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("{url}: {e}")))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("reading body from {url}: {e}")))?;
        trace!("{} {} -> {}: {}", request.method, url, status, text);

        Ok(ApiResponse {
            status,
            body: decode_body(&text),
        })
    }
}
