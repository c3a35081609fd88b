//! Remote scoring API
//!
//! The controller talks to the server only through [`QuizApi`], so hosts can
//! swap the HTTP implementation for a scripted one. [`HttpApi`] is the real
//! thing, built on `reqwest` (which uses `fetch` when compiled to wasm).
//!
//! Futures are not required to be `Send`: the controller runs on a single
//! cooperative thread, which is all a browser offers anyway.

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    config::ClientConfig,
    constants::api::DEFAULT_ERROR_DETAIL,
    error::ApiError,
    model::{
        AnswerResponse, AnswerSubmission, ScoreboardEntry, SessionId, StartSessionRequest,
        StartSessionResponse, SubjectInfo, SubjectList,
    },
};

/// Operations offered by the scoring server
#[async_trait(?Send)]
pub trait QuizApi {
    /// `GET /subjects`
    async fn subjects(&self) -> Result<Vec<SubjectInfo>, ApiError>;

    /// `GET /scoreboard?limit=N`
    async fn scoreboard(&self, limit: usize) -> Result<Vec<ScoreboardEntry>, ApiError>;

    /// `POST /sessions`
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, ApiError>;

    /// `POST /sessions/{id}/answer`
    async fn submit_answer(
        &self,
        session_id: &SessionId,
        submission: &AnswerSubmission,
    ) -> Result<AnswerResponse, ApiError>;
}

/// HTTP implementation of [`QuizApi`]
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Creates a client for the configured base URL
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), &config.base_url)
    }

    /// Creates a client reusing an existing `reqwest::Client`
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        log::debug!("GET {path}");
        let response = self.client.get(self.url(path)).send().await?;
        read_json(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        log::debug!("POST {path}");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let detail = error_detail(&body);
        log::warn!("request failed with status {status}: {detail}");
        return Err(ApiError::Status { status, detail });
    }

    Ok(serde_json::from_slice(&body)?)
}

#[async_trait(?Send)]
impl QuizApi for HttpApi {
    async fn subjects(&self) -> Result<Vec<SubjectInfo>, ApiError> {
        let list: SubjectList = self.get("/subjects").await?;
        Ok(list.subjects)
    }

    async fn scoreboard(&self, limit: usize) -> Result<Vec<ScoreboardEntry>, ApiError> {
        self.get(&format!("/scoreboard?limit={limit}")).await
    }

    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, ApiError> {
        self.post("/sessions", request).await
    }

    async fn submit_answer(
        &self,
        session_id: &SessionId,
        submission: &AnswerSubmission,
    ) -> Result<AnswerResponse, ApiError> {
        self.post(&format!("/sessions/{session_id}/answer"), submission)
            .await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Items(Vec<DetailItem>),
    #[allow(dead_code)]
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct DetailItem {
    #[serde(default)]
    msg: Option<String>,
}

/// Extracts the user-facing message from an error response body
///
/// The server sends `detail` either as a string or as a list of `{msg}`
/// objects; anything else falls back to a generic message.
pub fn error_detail(body: &[u8]) -> String {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail)
        .and_then(|detail| match detail {
            Detail::Message(message) => Some(message),
            Detail::Items(items) => items.into_iter().next().and_then(|item| item.msg),
            Detail::Other(_) => None,
        })
        .filter(|message| !message.is_empty());

    detail.unwrap_or_else(|| DEFAULT_ERROR_DETAIL.to_owned())
}
