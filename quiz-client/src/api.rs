use async_trait::async_trait;
use quiz_types::{
    CompleteSessionRequest, CompleteSessionResponse, Quiz, StartSessionResponse,
    SubmitAnswerRequest,
};
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, error};

use crate::error::ClientError;

/// The backend calls a quiz attempt depends on.
#[async_trait]
pub trait QuizApi: Send + Sync + 'static {
    async fn fetch_quiz(&self, quiz_id: &str) -> Result<Quiz, ClientError>;

    async fn start_session(&self, quiz_id: &str) -> Result<StartSessionResponse, ClientError>;

    async fn submit_answer(
        &self,
        quiz_id: &str,
        request: &SubmitAnswerRequest,
    ) -> Result<(), ClientError>;

    async fn complete_session(
        &self,
        quiz_id: &str,
        request: &CompleteSessionRequest,
    ) -> Result<CompleteSessionResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpQuizApi {
    client: Client,
    base_url: String,
}

impl HttpQuizApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn quiz_url(&self, quiz_id: &str, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}/quiz/{}/{}/", self.base_url, quiz_id, action),
            None => format!("{}/quiz/{}/", self.base_url, quiz_id),
        }
    }

    async fn post<B, R>(&self, url: String, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Default,
    {
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or("No body".into());
        if !status.is_success() {
            error!("Quiz API request failed: {} - {}", status, text);
            return Err(ClientError::Api(status, text));
        }

        parse_body(status, &text)
    }
}

/// Empty success bodies decode to the type's default.
fn parse_body<R>(status: StatusCode, text: &str) -> Result<R, ClientError>
where
    R: DeserializeOwned + Default,
{
    if text.trim().is_empty() || status == StatusCode::NO_CONTENT {
        return Ok(R::default());
    }
    Ok(serde_json::from_str(text)?)
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn fetch_quiz(&self, quiz_id: &str) -> Result<Quiz, ClientError> {
        let url = self.quiz_url(quiz_id, None);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let text = response.text().await.unwrap_or("No body".into());
        if !status.is_success() {
            error!("Failed to fetch quiz {}: {} - {}", quiz_id, status, text);
            return Err(ClientError::Api(status, text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn start_session(&self, quiz_id: &str) -> Result<StartSessionResponse, ClientError> {
        let url = self.quiz_url(quiz_id, Some("start_session"));
        let response: Option<StartSessionResponse> =
            self.post(url, &serde_json::json!({})).await?;
        response.ok_or_else(|| {
            ClientError::Api(StatusCode::BAD_GATEWAY, "Session start returned no body".into())
        })
    }

    async fn submit_answer(
        &self,
        quiz_id: &str,
        request: &SubmitAnswerRequest,
    ) -> Result<(), ClientError> {
        let url = self.quiz_url(quiz_id, Some("submit_answer"));
        let _: Option<serde_json::Value> = self.post(url, request).await?;
        Ok(())
    }

    async fn complete_session(
        &self,
        quiz_id: &str,
        request: &CompleteSessionRequest,
    ) -> Result<CompleteSessionResponse, ClientError> {
        let url = self.quiz_url(quiz_id, Some("complete_session"));
        self.post(url, request).await
    }
}
