//! First-match-wins keyword dispatch over [`INTENT_RULES`].

use pothole_assistant_intent_models::{INTENT_RULES, Intent, IntentRule};

/// Trims and lower-cases a raw query.
#[must_use]
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Returns the first intent in [`INTENT_RULES`] whose trigger fires.
///
/// `normalized_query` must already be passed through [`normalize`].
#[must_use]
pub fn match_intent(normalized_query: &str) -> Option<Intent> {
    match_intent_in(INTENT_RULES, normalized_query)
}

/// Same as [`match_intent`] over an arbitrary rule table.
#[must_use]
pub fn match_intent_in(rules: &[IntentRule], normalized_query: &str) -> Option<Intent> {
    rules
        .iter()
        .find(|rule| rule.trigger.fires(normalized_query))
        .map(|rule| rule.intent)
}
