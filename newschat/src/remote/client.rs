//! HTTP client for the question-answering API.

use async_trait::async_trait;

use crate::error::RemoteError;

use super::types::{Answer, AskRequest, AskResponse};

/// Path of the question endpoint, relative to the API base URL.
pub const ASK_PATH: &str = "/news-chat";

/// Anything that can answer a question within a session.
///
/// Implementations issue one request per call and never retry.
#[async_trait]
pub trait AskBackend: Send + Sync {
    async fn ask(&self, question: &str, session_id: &str, model: &str)
        -> Result<Answer, RemoteError>;
}

/// Client for the news question-answering service.
#[derive(Debug, Clone)]
pub struct NewsChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl NewsChatClient {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &str) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{ASK_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AskBackend for NewsChatClient {
    async fn ask(
        &self,
        question: &str,
        session_id: &str,
        model: &str,
    ) -> Result<Answer, RemoteError> {
        let body = AskRequest {
            question: question.to_string(),
            session_id: session_id.to_string(),
            model: model.to_string(),
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(RemoteError::Transport)?;

        if !resp.status().is_success() {
            return Err(RemoteError::Status(resp.status()));
        }

        let response: AskResponse = resp.json().await.map_err(RemoteError::Decode)?;
        Ok(response.into())
    }
}
