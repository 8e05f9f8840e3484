use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::error::ApiError;
use crate::session::SessionStore;

/// Authenticated access to the PetMatch backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;
}

pub struct HttpApiClient<S: SessionStore> {
    client: reqwest::Client,
    base_url: String,
    session_store: Arc<S>,
}

impl<S: SessionStore> HttpApiClient<S> {
    pub fn new(base_url: &str, session_store: Arc<S>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl<S: SessionStore> ApiClient for HttpApiClient<S> {
    #[instrument(skip(self, body))]
    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(token) = self.session_store.auth_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("Backend responded with {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Pulls the human readable message out of an error response body
fn server_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
