//! In-memory record of one chat session. Nothing is persisted.

use std::fmt::Write as _;

/// A question and the answer shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// What the user typed, trimmed.
    pub question: String,
    /// The resolver's reply.
    pub answer: String,
}

/// Every exchange in the current session, oldest first.
#[derive(Debug, Default)]
pub struct Transcript {
    exchanges: Vec<Exchange>,
}

impl Transcript {
    /// Appends an exchange.
    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.exchanges.push(Exchange {
            question: question.into(),
            answer: answer.into(),
        });
    }

    /// Number of exchanges so far.
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// Whether nothing has been asked yet.
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Renders every exchange in order, numbered from 1.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No questions asked yet.".to_string();
        }

        let mut out = String::new();
        for (i, exchange) in self.exchanges.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            writeln!(out, "{}. You: {}", i + 1, exchange.question).unwrap();
            writeln!(out, "   Assistant: {}", exchange.answer).unwrap();
        }
        out
    }
}
