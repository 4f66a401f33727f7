// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use remedia_app::{BackendUnreachable, Outcome, PredictRequest, ResultPayload};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";

/// Blocking client for the prediction service. Cheap to clone; clones share
/// the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        if timeout.is_zero() {
            bail!("service.timeout must be positive");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends one prediction request and returns the decoded body. Every
    /// failure keeps its detail here; [`Client::dispatch`] is where the detail
    /// is dropped.
    pub fn predict(&self, request: &PredictRequest) -> Result<Value> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .map_err(|error| connection_error(self.endpoint.as_str(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context("decode prediction response")
    }

    /// Sends one request and collapses every failure into
    /// [`BackendUnreachable`]. The underlying error is logged, not returned.
    pub fn dispatch(&self, request: &PredictRequest) -> Outcome {
        match self.predict(request) {
            Ok(body) => Ok(ResultPayload::from_value(&body)),
            Err(error) => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    error = %format!("{error:#}"),
                    "prediction request failed"
                );
                Err(BackendUnreachable)
            }
        }
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("service.endpoint must not be empty");
    }
    let url = Url::parse(trimmed).with_context(|| {
        format!("service.endpoint {trimmed:?} is not a URL; use e.g. {DEFAULT_ENDPOINT}")
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("service.endpoint must use http or https, got {other:?}"),
    }
}

fn connection_error(endpoint: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("request to {endpoint} timed out ({error})");
    }
    anyhow!("cannot reach {endpoint} -- make sure the prediction service is running ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<Value>(body)
        && let Some(message) = parsed.get("error").and_then(Value::as_str)
        && !message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}
