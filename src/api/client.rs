//! Typed operations on backend collections.
//!
//! The client is stateless: it never touches a list state. Callers merge what it
//! returns.

use super::{ApiRequest, ApiResponse, Method, Payload, Transport};
use crate::entities::{Record, Resource};
use crate::errors::{Error, Result};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

/// Remote data client over any [`Transport`]
#[derive(Debug, Clone)]
pub struct RemoteClient<T> {
    transport: T,
}

impl<T: Transport> RemoteClient<T> {
    /// Wraps a transport.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Reads a whole collection, mapping year codes to display codes.
    ///
    /// A body without the collection key is treated as an empty collection.
    pub async fn fetch_list<R: Record>(&self) -> Result<Vec<R>> {
        let resource = R::RESOURCE;
        let fetch_error = |message: String| Error::Fetch {
            resource: resource.to_string(),
            message,
        };

        let response = self
            .transport
            .send(ApiRequest::new(Method::Get, resource.path()))
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if !response.is_success() {
            return Err(fetch_error(failure_message(&response)));
        }

        // Only a JSON object without the key means an empty collection.
        let Some(Value::Object(body)) = &response.body else {
            return Err(fetch_error(
                "unexpected response shape: expected a JSON object".to_string(),
            ));
        };
        let mut records: Vec<R> = match body.get(resource.collection_key()) {
            None | Some(Value::Null) => {
                warn!("Response for {resource} had no {:?} key", resource.collection_key());
                Vec::new()
            }
            Some(items) => serde_json::from_value(items.clone())
                .map_err(|e| fetch_error(format!("unexpected response shape: {e}")))?,
        };
        records.iter_mut().for_each(Record::normalize_year);

        info!("Fetched {} {} records", records.len(), resource);
        Ok(records)
    }

    /// `POST /<collection>/add`; returns the record as the server stored it.
    pub async fn create<R: Record>(&self, payload: Payload) -> Result<R> {
        let request = ApiRequest::new(Method::Post, format!("{}/add", R::RESOURCE.path()))
            .with_body(payload);
        let record = self.write::<R>(request, "add").await?;
        info!("Created {} {}", R::LABEL, record.key());
        Ok(record)
    }

    /// `PUT /<collection>/update/<key>`; returns the record as the server stored it.
    pub async fn update<R: Record>(&self, key: &str, payload: Payload) -> Result<R> {
        let path = keyed_path(R::RESOURCE, "update", key)?;
        let request = ApiRequest::new(Method::Put, path).with_body(payload);
        let record = self.write::<R>(request, "update").await?;
        info!("Updated {} {}", R::LABEL, key);
        Ok(record)
    }

    /// `DELETE /<collection>/remove/<key>`.
    pub async fn delete<R: Record>(&self, key: &str) -> Result<()> {
        let request = ApiRequest::new(Method::Delete, keyed_path(R::RESOURCE, "remove", key)?);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| Error::Delete {
                message: format!("Failed to remove {} {key}: {e}", R::LABEL),
            })?;
        if !response.is_success() {
            return Err(Error::Delete {
                message: response.message().map_or_else(
                    || format!("Failed to remove {} {key} (HTTP {})", R::LABEL, response.status),
                    ToString::to_string,
                ),
            });
        }
        info!("Removed {} {}", R::LABEL, key);
        Ok(())
    }

    /// Posts a spreadsheet upload and returns the server's summary message.
    pub async fn upload(&self, resource: Resource, payload: Payload) -> Result<String> {
        let path = resource.upload_path().ok_or_else(|| Error::Write {
            message: format!("{resource} does not accept uploads"),
        })?;
        let response = self
            .transport
            .send(ApiRequest::new(Method::Post, path).with_body(payload))
            .await
            .map_err(|e| Error::Write {
                message: format!("Upload to {resource} failed: {e}"),
            })?;
        if !response.is_success() {
            return Err(Error::Write {
                message: response.message().map_or_else(
                    || format!("Upload to {resource} failed (HTTP {})", response.status),
                    ToString::to_string,
                ),
            });
        }

        let message = response
            .message()
            .unwrap_or("Upload completed")
            .to_string();
        info!("Upload to {resource}: {message}");
        Ok(message)
    }

    async fn write<R: Record>(&self, request: ApiRequest, verb: &str) -> Result<R> {
        debug!("{} {}", request.method, request.path);
        let generic = || format!("Failed to {verb} {}", R::LABEL);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| Error::Write {
                message: format!("{}: {e}", generic()),
            })?;

        let refused = response.field("success").and_then(Value::as_bool) == Some(false);
        if !response.is_success() || refused {
            return Err(Error::Write {
                message: response
                    .message()
                    .map_or_else(generic, ToString::to_string),
            });
        }

        let raw = response
            .field(R::SINGULAR)
            .filter(|v| !v.is_null())
            .ok_or_else(|| Error::Write {
                message: format!("{}: response had no {:?}", generic(), R::SINGULAR),
            })?;
        let mut record: R = serde_json::from_value(raw.clone()).map_err(|e| Error::Write {
            message: format!("{}: unexpected response shape: {e}", generic()),
        })?;
        record.normalize_year();
        Ok(record)
    }
}

/// `<collection>/<action>/<key>` with the key percent-encoded as a single segment.
fn keyed_path(resource: Resource, action: &str, key: &str) -> Result<String> {
    if key.trim().is_empty() || key == "." || key == ".." {
        return Err(Error::validation(
            "key",
            format!("{key:?} does not name a {resource} record"),
        ));
    }

    let mut url = Url::parse("http://localhost/").map_err(|e| Error::Config {
        message: format!("Failed to build request path: {e}"),
    })?;
    url.path_segments_mut()
        .map_err(|()| Error::Config {
            message: "Failed to build request path".to_string(),
        })?
        .pop_if_empty()
        .push(resource.path())
        .push(action)
        .push(key);
    Ok(url.path().trim_start_matches('/').to_string())
}

fn failure_message(response: &ApiResponse) -> String {
    response
        .message()
        .map_or_else(|| format!("HTTP {}", response.status), ToString::to_string)
}
