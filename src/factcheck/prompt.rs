use super::models::ModelSpec;
use serde::Serialize;

pub fn build_prompt(headline: &str) -> String {
    format!(
        "I saw something today that claimed {headline}. Do you think that this is likely to be true?"
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of a `chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl ChatRequest {
    /// Single user turn for `headline`. `temperature` is dropped when the
    /// model does not take one.
    pub fn fact_check(headline: &str, model: &ModelSpec, temperature: f64) -> Self {
        Self {
            model: model.id.clone(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: build_prompt(headline),
            }],
            temperature: model.supports_temperature.then_some(temperature),
        }
    }
}
