//! Client for `OpenAI`-style `/chat/completions` endpoints. Groq, `OpenAI`,
//! and most self-hosted servers speak this protocol.

use serde::{Deserialize, Serialize};

use super::{ChatOptions, LlmProvider, LlmResponse, Message, StopReason};
use crate::AiError;

/// A chat-completions endpoint plus the credentials and model to use.
pub struct ChatCompletionsProvider {
    api_key: String,
    model: String,
    endpoint: String,
    http: reqwest::Client,
}

impl ChatCompletionsProvider {
    /// `base_url` is the API root, e.g. `https://api.groq.com/openai/v1`.
    #[must_use]
    pub fn new(api_key: String, model: String, base_url: &str) -> Self {
        Self {
            api_key,
            model,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            http: reqwest::Client::new(),
        }
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Turn<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Turn<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionBody {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl<'a> CompletionRequest<'a> {
    /// The system prompt always goes first, ahead of the conversation.
    fn new(
        model: &'a str,
        system_prompt: &'a str,
        messages: &'a [Message],
        options: &ChatOptions,
    ) -> Self {
        let messages = std::iter::once(Turn {
            role: "system",
            content: system_prompt,
        })
        .chain(messages.iter().map(|m| Turn {
            role: &m.role,
            content: &m.content,
        }))
        .collect();

        Self {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }
}

fn decode_reply(body: &str) -> Result<LlmResponse, AiError> {
    let body: CompletionBody = serde_json::from_str(body)?;

    let Some(choice) = body.choices.into_iter().next() else {
        return Err(AiError::Provider {
            message: "completion response contained no choices".to_string(),
        });
    };

    Ok(LlmResponse {
        text: choice
            .message
            .content
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        stop_reason: if choice.finish_reason.as_deref() == Some("length") {
            StopReason::MaxTokens
        } else {
            StopReason::EndTurn
        },
    })
}

/// Pulls the provider's own error message out of a failed response,
/// or falls back to the status line and raw body.
fn decode_failure(status: reqwest::StatusCode, body: &str) -> AiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map_or_else(|_| format!("HTTP {status}: {body}"), |e| e.error.message);
    AiError::Provider { message }
}

#[async_trait::async_trait]
impl LlmProvider for ChatCompletionsProvider {
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<LlmResponse, AiError> {
        let request = CompletionRequest::new(&self.model, system_prompt, messages, options);

        log::debug!(
            "POST {} model={} turns={}",
            self.endpoint,
            self.model,
            request.messages.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            decode_reply(&body)
        } else {
            Err(decode_failure(status, &body))
        }
    }
}
