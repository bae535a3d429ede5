// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thin HTTP client for the Notion pages and database endpoints.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secretary_core::SecretaryError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
}

impl NotionClient {
    pub fn new(
        token: &str,
        api_version: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, SecretaryError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| SecretaryError::Config(format!("invalid Notion token header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "Notion-Version",
            HeaderValue::from_str(api_version).map_err(|e| {
                SecretaryError::Config(format!("invalid Notion API version header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SecretaryError::TaskStore {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, SecretaryError> {
        let request = self.client.post(self.url(path)).json(body);
        send(request).await
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, SecretaryError> {
        let request = self.client.patch(self.url(path)).json(body);
        send(request).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SecretaryError> {
        send(self.client.get(self.url(path))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, SecretaryError> {
    let response = request.send().await.map_err(|e| SecretaryError::TaskStore {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    })?;

    let status = response.status();
    debug!(status = %status, url = %response.url(), "notion response received");
    let body = response.text().await.map_err(|e| SecretaryError::TaskStore {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;

    if !status.is_success() {
        // Notion errors look like {"object":"error","code":"...","message":"..."}.
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                let code = v.get("code")?.as_str()?.to_string();
                let message = v.get("message")?.as_str()?.to_string();
                Some(format!("Notion API error ({code}): {message}"))
            })
            .unwrap_or_else(|| format!("Notion returned {status}: {body}"));
        return Err(SecretaryError::task_store(message));
    }

    serde_json::from_str(&body).map_err(|e| SecretaryError::TaskStore {
        message: format!("failed to parse Notion response: {e}"),
        source: Some(Box::new(e)),
    })
}
