//! LLM provider abstraction and the environment-driven factory.

pub mod chat_completions;

use serde::{Deserialize, Serialize};

use crate::AiError;

/// Groq's `OpenAI`-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// `OpenAI`'s endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Message content.
    pub content: String,
}

impl Message {
    /// A user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// An assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling settings for a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    /// Sampling temperature; lower is more deterministic.
    pub temperature: f32,
    /// Upper bound on reply length.
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_tokens: 300,
        }
    }
}

/// A model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    /// Reply text, trimmed.
    pub text: String,
    /// Why generation stopped.
    pub stop_reason: StopReason,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Model finished its response naturally.
    EndTurn,
    /// Maximum tokens reached.
    MaxTokens,
}

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails.
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<LlmResponse, AiError>;
}

/// Hosted services the factory knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Groq's hosted Llama models.
    Groq,
    /// `OpenAI`.
    OpenAi,
}

impl ProviderKind {
    /// Detection order when `AI_PROVIDER` is unset.
    const DETECTION_ORDER: &[Self] = &[Self::Groq, Self::OpenAi];

    /// Parses an `AI_PROVIDER` value.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Config`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self, AiError> {
        match name.trim().to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" | "gpt" => Ok(Self::OpenAi),
            other => Err(AiError::Config {
                message: format!("Unknown AI provider: {other}. Use 'groq' or 'openai'."),
            }),
        }
    }

    /// Environment variable holding the API key.
    #[must_use]
    pub const fn key_var(self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Model used when `AI_MODEL` is unset.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Groq => "llama3-8b-8192",
            Self::OpenAi => "gpt-4o",
        }
    }

    /// API root used when `AI_BASE_URL` is unset.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Groq => GROQ_BASE_URL,
            Self::OpenAi => OPENAI_BASE_URL,
        }
    }
}

/// Creates an LLM provider from environment variables.
///
/// `AI_PROVIDER` picks the service explicitly; when unset, the first of
/// `GROQ_API_KEY` or `OPENAI_API_KEY` that is present decides, and Groq is
/// assumed if neither is. `AI_MODEL` overrides the default model and
/// `AI_BASE_URL` points at another compatible server.
///
/// # Errors
///
/// Returns [`AiError::Config`] if the provider name is unknown or its API
/// key is not set.
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, AiError> {
    let kind = match std::env::var("AI_PROVIDER") {
        Ok(name) => ProviderKind::from_name(&name)?,
        Err(_) => detect_provider(|var| std::env::var(var).is_ok()),
    };

    let api_key = std::env::var(kind.key_var()).map_err(|_| AiError::Config {
        message: format!("{} environment variable not set", kind.key_var()),
    })?;
    let model = std::env::var("AI_MODEL").unwrap_or_else(|_| kind.default_model().to_string());
    let base_url =
        std::env::var("AI_BASE_URL").unwrap_or_else(|_| kind.default_base_url().to_string());

    log::info!("Fallback model: {kind:?} {model} at {base_url}");

    Ok(Box::new(chat_completions::ChatCompletionsProvider::new(
        api_key, model, &base_url,
    )))
}

/// Picks the first provider whose key variable `is_set`.
fn detect_provider(is_set: impl Fn(&str) -> bool) -> ProviderKind {
    if let Some(kind) = ProviderKind::DETECTION_ORDER
        .iter()
        .copied()
        .find(|kind| is_set(kind.key_var()))
    {
        log::info!("Auto-detected AI provider {kind:?} ({} found)", kind.key_var());
        return kind;
    }

    log::warn!(
        "No AI credentials detected. Set GROQ_API_KEY or OPENAI_API_KEY, \
         or set AI_PROVIDER explicitly."
    );
    ProviderKind::Groq
}
