use super::prompt::ChatRequest;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::{future::Future, time::Duration};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("provider returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response contained no choices")]
    NoChoices,
    #[error("model returned no text")]
    EmptyReply,
}

/// The two calls the app makes against a chat-completion provider.
pub trait ChatBackend {
    /// Cheap authenticated call used only to check the key.
    fn list_models(&self) -> impl Future<Output = Result<Vec<String>, ApiError>>;

    /// One round trip; returns the first choice's content as-is.
    fn complete(&self, request: &ChatRequest) -> impl Future<Output = Result<String, ApiError>>;
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    base: Url,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_base: &str, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("headline-check/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            http,
            base: base_url(api_base)?,
            api_key: api_key.into(),
        })
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let resp = req.bearer_auth(&self.api_key).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        let message = error_message(&body);
        tracing::warn!(%status, "provider error: {}", message);
        if status == StatusCode::UNAUTHORIZED {
            Err(ApiError::Unauthorized(message))
        } else {
            Err(ApiError::Status { status, message })
        }
    }
}

impl ChatBackend for OpenAiClient {
    async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        let url = self.base.join("models")?;
        let body = self.send(self.http.get(url)).await?;
        parse_model_list(&body)
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ApiError> {
        let url = self.base.join("chat/completions")?;
        tracing::debug!(model = %request.model, temperature = ?request.temperature, "sending chat completion");
        let body = self.send(self.http.post(url).json(request)).await?;
        parse_completion(&body)
    }
}

/// `Url::join` drops the last path segment unless the base ends in '/'.
fn base_url(api_base: &str) -> Result<Url, url::ParseError> {
    if api_base.ends_with('/') {
        Url::parse(api_base)
    } else {
        Url::parse(&format!("{api_base}/"))
    }
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelObject>,
}

#[derive(Deserialize)]
struct ModelObject {
    id: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn parse_model_list(body: &str) -> Result<Vec<String>, ApiError> {
    let list: ModelList = serde_json::from_str(body)?;
    Ok(list.data.into_iter().map(|m| m.id).collect())
}

fn parse_completion(body: &str) -> Result<String, ApiError> {
    let resp: CompletionResponse = serde_json::from_str(body)?;
    let first = resp.choices.into_iter().next().ok_or(ApiError::NoChoices)?;
    first.message.content.ok_or(ApiError::EmptyReply)
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => env.error.message,
        Err(_) if body.trim().is_empty() => "no details given".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factcheck::ModelSpec;
    use crate::util::test_server::serve_once;

    #[test]
    fn base_url_keeps_version_segment() {
        let base = base_url("https://api.openai.com/v1").unwrap();
        assert_eq!(
            base.join("chat/completions").unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
        let base = base_url("http://localhost:8080/v1/").unwrap();
        assert_eq!(base.join("models").unwrap().as_str(), "http://localhost:8080/v1/models");
    }

    #[test]
    fn completion_returns_first_choice_verbatim() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  No. The moon is rock.\n"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "second"}, "finish_reason": "stop"}
            ]
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "  No. The moon is rock.\n");
    }

    #[test]
    fn completion_without_choices_is_an_error() {
        assert!(matches!(
            parse_completion(r#"{"choices": []}"#),
            Err(ApiError::NoChoices)
        ));
        assert!(matches!(parse_completion("<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn null_content_is_reported() {
        let body = r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": null, "refusal": "I can't help with that."}}]}"#;
        assert!(matches!(parse_completion(body), Err(ApiError::EmptyReply)));
    }

    #[test]
    fn model_list_ids() {
        let body = r#"{"object":"list","data":[{"id":"gpt-4o-mini","object":"model"},{"id":"o1","object":"model"}]}"#;
        assert_eq!(parse_model_list(body).unwrap(), vec!["gpt-4o-mini", "o1"]);
    }

    #[test]
    fn provider_error_detail_is_extracted() {
        let body = r#"{"error":{"message":"Incorrect API key provided: sk-xx.","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided: sk-xx.");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "no details given");
    }

    #[test]
    fn rejects_unparseable_base() {
        assert!(matches!(
            OpenAiClient::new("not a url", "sk-test"),
            Err(ApiError::BaseUrl(_))
        ));
    }

    fn client_for(base: &str) -> OpenAiClient {
        OpenAiClient::new(&format!("{base}/v1"), "sk-test-123").unwrap()
    }

    #[tokio::test]
    async fn model_probe_sends_bearer_key() {
        let (base, server) = serve_once(
            "200 OK",
            "application/json",
            br#"{"object":"list","data":[{"id":"gpt-4o-mini","object":"model"}]}"#.to_vec(),
        )
        .await;
        let models = client_for(&base).list_models().await.unwrap();
        assert_eq!(models, vec!["gpt-4o-mini"]);

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(lower.starts_with("get /v1/models http/1.1"));
        assert!(lower.contains("authorization: bearer sk-test-123"));
        // key is sent verbatim, only the header name is case-insensitive
        assert!(request.contains("Bearer sk-test-123"));
    }

    #[tokio::test]
    async fn unauthorized_carries_provider_message() {
        let (base, server) = serve_once(
            "401 Unauthorized",
            "application/json",
            br#"{"error":{"message":"Incorrect API key","type":"invalid_request_error","code":"invalid_api_key"}}"#.to_vec(),
        )
        .await;
        let err = client_for(&base).list_models().await.unwrap_err();
        match err {
            ApiError::Unauthorized(message) => assert_eq!(message, "Incorrect API key"),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn other_failures_keep_their_status() {
        let (base, server) = serve_once(
            "429 Too Many Requests",
            "application/json",
            br#"{"error":{"message":"You exceeded your current quota"}}"#.to_vec(),
        )
        .await;
        let request = ChatRequest::fact_check("x", &ModelSpec::new("GPT-4o mini", "gpt-4o-mini"), 0.3);
        let err = client_for(&base).complete(&request).await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(message, "You exceeded your current quota");
            }
            other => panic!("expected Status, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn completion_posts_json_body_and_returns_content() {
        let (base, server) = serve_once(
            "200 OK",
            "application/json",
            br#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Unlikely."}}]}"#.to_vec(),
        )
        .await;
        let request = ChatRequest::fact_check(
            "The moon is made of cheese",
            &ModelSpec::new("o1", "o1"),
            0.7,
        );
        let text = client_for(&base).complete(&request).await.unwrap();
        assert_eq!(text, "Unlikely.");

        let raw = server.await.unwrap();
        assert!(raw.to_ascii_lowercase().starts_with("post /v1/chat/completions http/1.1"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk-test-123"));
        let body = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["model"], "o1");
        assert!(sent.get("temperature").is_none());
        assert_eq!(
            sent["messages"][0]["content"],
            "I saw something today that claimed The moon is made of cheese. Do you think that this is likely to be true?"
        );
    }
}
