use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::AccountStore;
use crate::error::{Result, TtsError};

/// Longest feedback message accepted
pub const MAX_FEEDBACK_CHARS: usize = 5000;

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackEntry {
    pub id: String,
    pub account_id: Option<String>,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

impl AccountStore {
    /// Store a feedback report; anonymous reports are allowed
    pub fn submit_feedback(&self, account_id: Option<&str>, text: &str) -> Result<FeedbackEntry> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TtsError::InvalidRequest(
                "Feedback cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_FEEDBACK_CHARS {
            return Err(TtsError::InvalidRequest(format!(
                "Feedback is limited to {} characters",
                MAX_FEEDBACK_CHARS
            )));
        }

        let entry = FeedbackEntry {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.map(str::to_string),
            text: text.to_string(),
            submitted_at: Utc::now(),
        };

        tracing::info!(
            feedback_id = %entry.id,
            account = entry.account_id.as_deref().unwrap_or("anonymous"),
            "Feedback received: {}",
            entry.text
        );

        self.feedback.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    /// All feedback, oldest first
    pub fn feedback(&self) -> Vec<FeedbackEntry> {
        let mut entries: Vec<_> = self.feedback.iter().map(|e| e.value().clone()).collect();
        entries.sort_by_key(|e| e.submitted_at);
        entries
    }
}
