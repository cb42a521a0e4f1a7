use std::time::Duration;

use hivemon_common::rule::{AlertPayload, AlertRecord, HiveRecord};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Typed client for the monitoring backend. Holds the bearer credential
/// issued by the authentication service; a missing credential fails every
/// call before any request leaves the process.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_alerts(&self) -> Result<Vec<AlertRecord>, ApiError> {
        let req = self.http.get(self.url("/api/alerts"));
        json_body(self.send(req).await?).await
    }

    pub async fn get_alert(&self, id: &str) -> Result<AlertRecord, ApiError> {
        let req = self.http.get(self.url(&format!("/api/alerts/{id}")));
        json_body(self.send(req).await?).await
    }

    pub async fn create_alert(&self, payload: &AlertPayload) -> Result<AlertRecord, ApiError> {
        let req = self.http.post(self.url("/api/alerts")).json(payload);
        json_body(self.send(req).await?).await
    }

    pub async fn update_alert(
        &self,
        id: &str,
        payload: &AlertPayload,
    ) -> Result<AlertRecord, ApiError> {
        let req = self
            .http
            .put(self.url(&format!("/api/alerts/{id}")))
            .json(payload);
        json_body(self.send(req).await?).await
    }

    pub async fn delete_alert(&self, id: &str) -> Result<(), ApiError> {
        let req = self.http.delete(self.url(&format!("/api/alerts/{id}")));
        self.send(req).await?;
        Ok(())
    }

    /// Requests the Triggered → Normal transition. The response body is
    /// discarded: the authoritative status is whatever the next re-fetch
    /// returns, never something the client decides locally.
    pub async fn reset_alert(&self, id: &str) -> Result<(), ApiError> {
        let req = self.http.post(self.url(&format!("/api/alerts/{id}/reset")));
        self.send(req).await?;
        Ok(())
    }

    pub async fn list_hives(&self) -> Result<Vec<HiveRecord>, ApiError> {
        let req = self.http.get(self.url("/api/hives"));
        json_body(self.send(req).await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::NotAuthenticated)?;
        let resp = req
            .bearer_auth(token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }
        let code = status.as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = extract_message(&body)
            .unwrap_or_else(|| format!("request failed with status {code}"));
        Err(ApiError::Rejected {
            status: code,
            message,
        })
    }
}

async fn json_body<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pulls a displayable message out of a structured error body, in the order
/// the backend populates them: `message`, then `error`, then the joined
/// values of a per-field `errors` map.
fn extract_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["message", "error"] {
        if let Some(m) = parsed.get(key).and_then(|v| v.as_str()) {
            if !m.is_empty() {
                return Some(m.to_string());
            }
        }
    }
    if let Some(map) = parsed.get("errors").and_then(|v| v.as_object()) {
        let joined: Vec<&str> = map.values().filter_map(|v| v.as_str()).collect();
        if !joined.is_empty() {
            return Some(joined.join(", "));
        }
    }
    None
}
