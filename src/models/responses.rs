use serde::Serialize;

use crate::account::{AudioHistoryItem, PaymentSubmission, UserState};
use crate::catalog::{Language, Plan, Tier, VoiceOption};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub name: &'static str,
}

impl From<Language> for LanguageInfo {
    fn from(language: Language) -> Self {
        Self {
            code: language.code(),
            name: language.name(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}

/// Public view of a catalog voice
#[derive(Debug, Serialize)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub language: Language,
    pub tier: Tier,
    pub is_unlimited: bool,
    pub preview_text: String,
    /// Present when the caller identified an account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessible: Option<bool>,
}

impl VoiceInfo {
    pub fn new(voice: &VoiceOption, account_tier: Option<Tier>) -> Self {
        Self {
            id: voice.id.clone(),
            name: voice.name.clone(),
            description: voice.description.to_string(),
            language: voice.language,
            tier: voice.tier,
            is_unlimited: voice.is_unlimited,
            preview_text: voice.preview_text.to_string(),
            accessible: account_tier.map(|tier| tier.can_access(voice.tier)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceInfo>,
}

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: &'static [Plan],
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub account_id: String,
    pub state: UserState,
}

#[derive(Debug, Serialize)]
pub struct ReferralResponse {
    pub code: String,
    pub message: String,
    pub referral_count: u32,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub items: Vec<AudioHistoryItem>,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub status: String,
    pub message: String,
    pub payment: PaymentSubmission,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub payment: PaymentSubmission,
    pub state: UserState,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}
