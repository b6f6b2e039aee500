//! Executes `HttpRequest` values.
//!
//! # Design
//! The stores never talk to the network directly; they hand the request built
//! by `ApiClient` to a `Transport` and parse whatever comes back. Tests plug in
//! scripted transports, the default runs over `ureq`.
//!
//! One `execute` call is exactly one network round-trip. There are no retries
//! and no timeouts here: a transport that hangs hangs its caller.

use std::sync::Arc;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Send `request` and return the response, whatever its status.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request).await
    }
}

/// Blocking `ureq` agent driven from tokio's blocking pool.
///
/// Must be used from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        // 4xx/5xx come back as data; `ApiClient` interprets the status.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        let method = request.method;
        let path = request.path.clone();

        let response = tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))??;

        tracing::debug!(%method, %path, status = response.status, "request completed");
        Ok(response)
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    let HttpRequest {
        method,
        path,
        headers,
        body,
    } = request;

    let result = match method {
        HttpMethod::Get => with_headers(agent.get(&path), &headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&path), &headers).call(),
        HttpMethod::Post => send(with_headers(agent.post(&path), &headers), body),
        HttpMethod::Put => send(with_headers(agent.put(&path), &headers), body),
        HttpMethod::Patch => send(with_headers(agent.patch(&path), &headers), body),
    };
    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
