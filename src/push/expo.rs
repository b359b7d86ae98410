use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{PushError, PushMessage, PushSender, PushTicket};

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    data: Vec<PushTicket>,
    #[serde(default)]
    errors: Vec<RelayError>,
}

#[derive(Debug, Deserialize)]
struct RelayError {
    message: String,
}

/// HTTP client for the Expo push relay.
#[derive(Debug, Clone)]
pub struct ExpoClient {
    http: reqwest::Client,
    url: String,
    access_token: Option<String>,
}

impl ExpoClient {
    pub fn new(url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            access_token,
        }
    }
}

#[async_trait]
impl PushSender for ExpoClient {
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        let mut request = self
            .http
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(messages);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await?
            .error_for_status()?
            .json::<SendResponse>()
            .await?;

        if let Some(err) = response.errors.first() {
            return Err(PushError::Rejected(err.message.clone()));
        }
        debug!(tickets = response.data.len(), "push relay answered");
        Ok(response.data)
    }
}
