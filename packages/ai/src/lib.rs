#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hosted language-model fallback for questions the intent engine cannot
//! answer.
//!
//! Talks to Groq, `OpenAI`, or any server exposing the same
//! chat-completions API (set `AI_BASE_URL`). The [`FallbackResponder`]
//! wraps a provider and never fails: provider errors come back as an
//! annotated string.

pub mod providers;

use std::sync::Arc;

use thiserror::Error;

use crate::providers::{ChatOptions, LlmProvider, Message, StopReason};

/// System prompt for every fallback request.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful chatbot that answers questions about potholes in San Antonio.";

/// Prefix marking a fallback failure in the returned text.
pub const FALLBACK_ERROR_PREFIX: &str = "⚠️ Error using fallback model:";

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

enum Backend {
    Provider(Arc<dyn LlmProvider>),
    Unconfigured(String),
}

/// Free-form answers from a hosted language model.
pub struct FallbackResponder {
    backend: Backend,
    options: ChatOptions,
}

impl FallbackResponder {
    /// Wraps a configured provider.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            backend: Backend::Provider(provider),
            options: ChatOptions::default(),
        }
    }

    /// A responder with no provider. Every [`Self::ask`] returns the
    /// annotated `reason`.
    #[must_use]
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unconfigured(reason.into()),
            options: ChatOptions::default(),
        }
    }

    /// Builds a responder from the environment, falling back to
    /// [`Self::unconfigured`] if no provider can be created.
    #[must_use]
    pub fn from_env() -> Self {
        match providers::create_provider_from_env() {
            Ok(provider) => Self::new(Arc::from(provider)),
            Err(e) => {
                log::warn!("Fallback model unavailable: {e}");
                Self::unconfigured(e.to_string())
            }
        }
    }

    /// Overrides the sampling options.
    #[must_use]
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Asks the model, with `context` sent as a prior assistant turn.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the responder is unconfigured or the provider
    /// request fails.
    pub async fn try_ask(&self, query: &str, context: Option<&str>) -> Result<String, AiError> {
        let provider = match &self.backend {
            Backend::Provider(provider) => provider,
            Backend::Unconfigured(reason) => {
                return Err(AiError::Config {
                    message: reason.clone(),
                });
            }
        };

        let mut messages = Vec::with_capacity(2);
        if let Some(context) = context.filter(|c| !c.is_empty()) {
            messages.push(Message::assistant(context));
        }
        messages.push(Message::user(query));

        let response = provider
            .chat(SYSTEM_PROMPT, &messages, &self.options)
            .await?;

        if response.stop_reason == StopReason::MaxTokens {
            log::warn!(
                "Fallback reply hit the {} token limit and may be cut off",
                self.options.max_tokens
            );
        }

        Ok(response.text)
    }

    /// Asks the model and returns its reply, or the annotated error if the
    /// request fails.
    pub async fn ask(&self, query: &str, context: Option<&str>) -> String {
        match self.try_ask(query, context).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("Fallback model request failed: {e}");
                format!("{FALLBACK_ERROR_PREFIX} {e}")
            }
        }
    }
}
