//! REST adapter for an Appwrite-compatible backend.
//!
//! One [`AppwriteClient`] implements every backend trait. The session cookie
//! set by a login lives in the HTTP client's cookie jar, so all clones of a
//! client act as the same identity.

mod account;
mod databases;
mod storage;

use std::time::Instant;

use blogwright_api_types::ApiErrorBody;
use bytes::Bytes;
use metrics::{counter, histogram};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::backend::BackendError;
use crate::config::BackendSettings;

use super::error::InfraError;

/// Response shape version the wire types are written against.
pub const RESPONSE_FORMAT: &str = "1.4.0";

pub const METRIC_BACKEND_REQUESTS: &str = "blogwright_backend_requests_total";
pub const METRIC_BACKEND_REQUEST_MS: &str = "blogwright_backend_request_ms";

const PROJECT_HEADER: HeaderName = HeaderName::from_static("x-appwrite-project");
const RESPONSE_FORMAT_HEADER: HeaderName = HeaderName::from_static("x-appwrite-response-format");

#[derive(Clone, Debug)]
pub struct AppwriteClient {
    http: Client,
    endpoint: Url,
    project_id: String,
}

impl AppwriteClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, InfraError> {
        Self::connect(settings.endpoint.clone(), &settings.project_id)
    }

    /// Build a client for `endpoint` (e.g. `https://cloud.appwrite.io/v1`).
    pub fn connect(endpoint: Url, project_id: &str) -> Result<Self, InfraError> {
        if project_id.trim().is_empty() {
            return Err(InfraError::configuration("backend project id is required"));
        }
        if endpoint.cannot_be_a_base() {
            return Err(InfraError::configuration(format!(
                "backend endpoint `{endpoint}` cannot carry a path"
            )));
        }

        let mut headers = HeaderMap::new();
        let project = HeaderValue::from_str(project_id).map_err(|err| {
            InfraError::configuration(format!("invalid backend project id: {err}"))
        })?;
        headers.insert(PROJECT_HEADER, project);
        headers.insert(
            RESPONSE_FORMAT_HEADER,
            HeaderValue::from_static(RESPONSE_FORMAT),
        );

        let http = Client::builder()
            .user_agent(Self::user_agent())
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            http,
            endpoint,
            project_id: project_id.to_string(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("blogwright/", env!("CARGO_PKG_VERSION"))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Endpoint URL extended with percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::invalid_request("endpoint cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let bytes = self.dispatch(operation, request).await?;
        serde_json::from_slice(&bytes).map_err(BackendError::decode)
    }

    async fn execute_unit(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<(), BackendError> {
        self.dispatch(operation, request).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Bytes, BackendError> {
        let started_at = Instant::now();
        let result = Self::send(request).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(BackendError::Api { .. }) => "rejected",
            Err(_) => "failed",
        };
        counter!(
            METRIC_BACKEND_REQUESTS,
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
        histogram!(METRIC_BACKEND_REQUEST_MS, "operation" => operation)
            .record(started_at.elapsed().as_secs_f64() * 1000.0);
        debug!(operation, outcome, "Backend request finished");

        result
    }

    async fn send(request: RequestBuilder) -> Result<Bytes, BackendError> {
        let resp = request.send().await.map_err(BackendError::transport)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(BackendError::transport)?;
        if status.is_success() {
            return Ok(bytes);
        }

        Err(match serde_json::from_slice::<ApiErrorBody>(&bytes) {
            Ok(body) => BackendError::api(status.as_u16(), body.error_type, body.message),
            Err(_) => {
                let text = String::from_utf8_lossy(&bytes).trim().to_string();
                let message = if text.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    text
                };
                BackendError::api(status.as_u16(), "", message)
            }
        })
    }
}
