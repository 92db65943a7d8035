mod client;
mod models;
mod prompt;

use crate::session::Session;
use crate::ui;
use crate::util::sanitize::sanitize_block;
use anyhow::Result;
use thiserror::Error;

pub use client::{ApiError, ChatBackend, OpenAiClient};
pub use models::{ModelCatalog, ModelSpec};
pub use prompt::ChatRequest;

/// Where the prompt wording and the breaking-news caveat come from.
pub const METHOD_REFERENCE: &str = "DeVerna et al. (2024), \"Fact-checking information from large language models \
can decrease headline discernment\", PNAS, https://doi.org/10.1073/pnas.2322823121";

#[derive(Debug, Error)]
pub enum FactCheckError {
    #[error("the API key has not been validated; restart and enter a valid key")]
    NotReady,
    #[error("please provide a headline to fact check")]
    EmptyHeadline,
    #[error("temperature must be between 0.0 and 1.0, got {0}")]
    TemperatureOutOfRange(f64),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactCheck {
    pub prompt: String,
    pub model: ModelSpec,
    /// Set when the session had a temperature the model could not take.
    pub temperature_ignored: bool,
    pub text: String,
}

/// Check the session's headline with its model. Nothing is sent unless the
/// key was accepted and the headline is non-blank.
pub async fn dispatch<B: ChatBackend>(session: &Session, backend: &B) -> Result<FactCheck, FactCheckError> {
    if !session.is_ready() {
        return Err(FactCheckError::NotReady);
    }
    if session.headline.trim().is_empty() {
        return Err(FactCheckError::EmptyHeadline);
    }

    let model = session.model();
    let request = ChatRequest::fact_check(&session.headline, model, session.temperature());
    let prompt = request.messages[0].content.clone();
    let text = backend.complete(&request).await?;
    tracing::info!(model = %model.id, chars = text.len(), "fact check complete");

    Ok(FactCheck {
        prompt,
        model: model.clone(),
        temperature_ignored: !model.supports_temperature,
        text,
    })
}

/// Ask for a headline, then check it.
pub async fn run<B: ChatBackend>(session: &mut Session, backend: &B, header: Option<&str>) -> Result<()> {
    ui::print_header(header);
    println!("Fact check an article");
    ui::note("You can enter any headline: real, fake, or complete nonsense. Results will vary accordingly.");
    println!();
    session.headline = ui::prompt_text("Article headline", &session.headline)?;
    check_headline(session, backend).await
}

/// Check whatever headline the session holds and show the result.
pub async fn check_headline<B: ChatBackend>(session: &Session, backend: &B) -> Result<()> {
    if !session.headline.trim().is_empty() && session.is_ready() {
        println!();
        println!("Fact-checking with {}...", session.model().label);
    }

    match dispatch(session, backend).await {
        Ok(check) => {
            println!("Prompt: {}", sanitize_block(&check.prompt));
            println!("Model: {}", check.model.label);
            if check.temperature_ignored {
                ui::note(&format!(
                    "{} does not accept a temperature; the setting had no effect.",
                    check.model.label
                ));
            }
            println!();
            ui::success("Fact-checking result:");
            println!("{}", sanitize_block(&check.text));
        }
        Err(FactCheckError::EmptyHeadline) => {
            ui::warn("Please provide the article headline.");
        }
        Err(err) => {
            ui::error(&format!("Fact check failed: {}", err));
        }
    }
    ui::pause()
}
