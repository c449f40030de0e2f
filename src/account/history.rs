use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::AccountStore;
use crate::audio::{is_wav, wav_duration_ms};
use crate::config::constants::{HISTORY_PREVIEW_CHARS, MAX_HISTORY_ITEMS};
use crate::error::{Result, TtsError};

/// One past synthesis as listed to the user
#[derive(Debug, Clone, Serialize)]
pub struct AudioHistoryItem {
    pub id: String,
    /// Leading characters of the input followed by "..."
    pub text: String,
    pub voice_name: String,
    pub timestamp: DateTime<Utc>,
    pub content_type: String,
    pub duration_ms: Option<f64>,
}

pub(crate) struct StoredAudio {
    item: AudioHistoryItem,
    audio: Bytes,
}

pub(crate) fn preview_text(text: &str) -> String {
    let head: String = text.chars().take(HISTORY_PREVIEW_CHARS).collect();
    format!("{}...", head)
}

impl AccountStore {
    /// Remember a finished synthesis; the oldest entry drops off past the cap
    pub fn record_history(
        &self,
        id: &str,
        text: &str,
        voice_name: &str,
        audio: Bytes,
        content_type: &str,
    ) -> Result<AudioHistoryItem> {
        let duration_ms = if is_wav(&audio) {
            wav_duration_ms(&audio).ok()
        } else {
            None
        };

        let item = AudioHistoryItem {
            id: Uuid::new_v4().to_string(),
            text: preview_text(text),
            voice_name: voice_name.to_string(),
            timestamp: Utc::now(),
            content_type: content_type.to_string(),
            duration_ms,
        };

        let mut record = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| TtsError::AccountNotFound(id.to_string()))?;

        record.history.push_front(StoredAudio {
            item: item.clone(),
            audio,
        });
        record.history.truncate(MAX_HISTORY_ITEMS);

        Ok(item)
    }

    /// History of an account, newest first
    pub fn history(&self, id: &str) -> Result<Vec<AudioHistoryItem>> {
        let record = self
            .accounts
            .get(id)
            .ok_or_else(|| TtsError::AccountNotFound(id.to_string()))?;
        Ok(record.history.iter().map(|s| s.item.clone()).collect())
    }

    /// Stored audio and its content type
    pub fn history_audio(&self, id: &str, item_id: &str) -> Result<(Bytes, String)> {
        let record = self
            .accounts
            .get(id)
            .ok_or_else(|| TtsError::AccountNotFound(id.to_string()))?;

        record
            .history
            .iter()
            .find(|s| s.item.id == item_id)
            .map(|s| (s.audio.clone(), s.item.content_type.clone()))
            .ok_or_else(|| TtsError::HistoryNotFound(item_id.to_string()))
    }
}
