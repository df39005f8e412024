#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns a raw question into a displayable answer.
//!
//! A query is normalized, matched against the intent table, and either
//! answered from the datasets or handed to the [`FallbackResponder`]. A
//! handler error never escapes: it is logged, an apology scoped to the
//! intent is shown, and the raw question still goes to the fallback model.
//! Every path through [`QueryResolver::handle_query`] yields a string.

use std::sync::Arc;

use pothole_assistant_ai::FallbackResponder;
use pothole_assistant_dataset_models::Datasets;
use pothole_assistant_intent::handlers::REPAIR_TIME_EXPLANATION_QUESTION;
use pothole_assistant_intent::matcher::{match_intent, normalize};
use pothole_assistant_intent::{IntentError, run};
use pothole_assistant_intent_models::{Intent, IntentOutcome};

/// Where the synchronous half of resolution ended up.
#[derive(Debug)]
pub enum Resolution {
    /// A handler ran and produced an outcome.
    Answered {
        /// Matched intent.
        intent: Intent,
        /// What the handler returned.
        outcome: IntentOutcome,
    },
    /// No intent matched.
    Unmatched,
    /// A handler ran and failed.
    Failed {
        /// Matched intent.
        intent: Intent,
        /// Why it failed.
        error: IntentError,
    },
}

/// Answers pothole questions from a fixed set of datasets.
///
/// Holds the datasets behind an [`Arc`] and never mutates them, so one
/// resolver can serve any number of calls.
pub struct QueryResolver {
    datasets: Arc<Datasets>,
    fallback: FallbackResponder,
    explain_repair_time: bool,
}

impl QueryResolver {
    /// Creates a resolver. Repair-time answers are followed by a model
    /// explanation unless disabled with
    /// [`Self::with_repair_time_explanation`].
    #[must_use]
    pub const fn new(datasets: Arc<Datasets>, fallback: FallbackResponder) -> Self {
        Self {
            datasets,
            fallback,
            explain_repair_time: true,
        }
    }

    /// Toggles the model explanation appended to repair-time answers.
    #[must_use]
    pub fn with_repair_time_explanation(mut self, enabled: bool) -> Self {
        self.explain_repair_time = enabled;
        self
    }

    /// The datasets this resolver answers from.
    #[must_use]
    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    /// Normalizes, matches, and runs the handler, without touching the
    /// fallback model.
    #[must_use]
    pub fn resolve(&self, query: &str) -> Resolution {
        let normalized = normalize(query);

        let Some(intent) = match_intent(&normalized) else {
            log::debug!("No intent matched '{normalized}'");
            return Resolution::Unmatched;
        };

        log::debug!("Matched intent {intent} for '{normalized}'");

        match run(intent, &self.datasets, &normalized) {
            Ok(outcome) => Resolution::Answered { intent, outcome },
            Err(error) => Resolution::Failed { intent, error },
        }
    }

    /// Answers a question.
    ///
    /// Unmatched questions go to the fallback model verbatim (not
    /// normalized). So do questions whose handler fails, after an apology.
    pub async fn handle_query(&self, query: &str) -> String {
        match self.resolve(query) {
            Resolution::Answered { intent, outcome } => {
                if intent == Intent::AvgRepairTime && outcome.is_answer() && self.explain_repair_time
                {
                    let base = outcome.into_text();
                    let explanation = self
                        .fallback
                        .ask(REPAIR_TIME_EXPLANATION_QUESTION, Some(&base))
                        .await;
                    return format!("{base}\n\n*Explanation:* {explanation}");
                }
                outcome.into_text()
            }
            Resolution::Unmatched => {
                log::info!("Routing unmatched question to the fallback model");
                self.fallback.ask(query, None).await
            }
            Resolution::Failed { intent, error } => {
                log::error!("{intent} handler failed: {error}");
                let reply = self.fallback.ask(query, None).await;
                format!("{}\n\n{reply}", apology(intent))
            }
        }
    }
}

/// User-facing apology for a failed handler.
#[must_use]
pub fn apology(intent: Intent) -> String {
    format!(
        "Sorry, I ran into a problem working out {} from the city data.",
        intent.topic()
    )
}
