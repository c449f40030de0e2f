use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum TtsError {
    // I/O errors
    Io(std::io::Error),

    // Request validation errors
    InvalidRequest(String),
    EmptyText,
    TextTooLong(usize),
    InvalidSpeed(f32),
    InvalidPitch(i32),
    InvalidUtr(String),
    InvalidReferral(String),

    // Lookup errors
    VoiceNotFound(String),
    AccountNotFound(String),
    HistoryNotFound(String),
    PlanNotFound(String),
    PaymentNotFound(String),

    // Entitlement errors
    VoiceLocked { voice: String, tier: String },
    InsufficientBalance { requested: usize, remaining: usize },

    // Upstream provider errors
    MissingApiKey,
    RateLimited,
    Upstream { status: u16, body: String },
    Network(String),
    Timeout(String),
    MalformedResponse(String),
    EmptyAudio,
    TextInsteadOfAudio(String),
    ContentBlocked,
    JobFailed(String),
    PollTimeout { job_id: String, attempts: u32 },

    // Audio processing errors
    AudioDecode(String),
    AudioEncoding(String),

    // Request handling took longer than the server allows
    RequestTimeout(Duration),

    // Internal errors
    Unknown(String),
}

impl TtsError {
    /// Upstream HTTP status, when the error came from a non-success reply.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            TtsError::Upstream { status, .. } => Some(*status),
            TtsError::RateLimited => Some(429),
            _ => None,
        }
    }
}

impl fmt::Display for TtsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtsError::Io(e) => write!(f, "I/O error: {}", e),
            TtsError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            TtsError::EmptyText => write!(f, "Text cannot be empty"),
            TtsError::TextTooLong(max) => write!(
                f,
                "Character count per speech exceeds the {} limit.",
                max
            ),
            TtsError::InvalidSpeed(speed) => {
                write!(f, "Invalid speed: {} (must be 0.5-2.0)", speed)
            }
            TtsError::InvalidPitch(pitch) => {
                write!(f, "Invalid pitch: {} (must be -10 to 10)", pitch)
            }
            TtsError::InvalidUtr(msg) => write!(f, "{}", msg),
            TtsError::InvalidReferral(msg) => write!(f, "Invalid referral code: {}", msg),
            TtsError::VoiceNotFound(id) => write!(f, "Invalid voice selected: {}", id),
            TtsError::AccountNotFound(id) => write!(f, "Account not found: {}", id),
            TtsError::HistoryNotFound(id) => write!(f, "History item not found: {}", id),
            TtsError::PlanNotFound(id) => write!(f, "Plan not found: {}", id),
            TtsError::PaymentNotFound(utr) => write!(f, "No payment submitted for UTR {}", utr),
            TtsError::VoiceLocked { voice, tier } => write!(
                f,
                "Voice {} requires the {} plan. Upgrade your plan.",
                voice, tier
            ),
            TtsError::InsufficientBalance { .. } => {
                write!(f, "Insufficient total character balance. Upgrade your plan.")
            }
            TtsError::MissingApiKey => write!(f, "API key missing on server"),
            TtsError::RateLimited => write!(
                f,
                "Rate limit exceeded or API quota reached. Please wait a minute before trying again."
            ),
            TtsError::Upstream { status, body } => {
                write!(f, "Provider error {}: {}", status, body)
            }
            TtsError::Network(msg) => write!(f, "Provider unreachable: {}", msg),
            TtsError::Timeout(msg) => write!(f, "Provider timed out: {}", msg),
            TtsError::MalformedResponse(msg) => {
                write!(f, "Provider returned a malformed response: {}", msg)
            }
            TtsError::EmptyAudio => write!(f, "Provider returned an empty response"),
            TtsError::TextInsteadOfAudio(text) => {
                write!(f, "The model returned text instead of audio: {}...", text)
            }
            TtsError::ContentBlocked => {
                write!(f, "Synthesis rejected or content blocked by safety filters.")
            }
            TtsError::JobFailed(msg) => write!(f, "Synthesis job failed: {}", msg),
            TtsError::PollTimeout { job_id, attempts } => write!(
                f,
                "Synthesis job {} not finished after {} status checks",
                job_id, attempts
            ),
            TtsError::AudioDecode(msg) => {
                write!(f, "Audio data was corrupt and could not be decoded: {}", msg)
            }
            TtsError::AudioEncoding(msg) => write!(f, "Audio encoding error: {}", msg),
            TtsError::RequestTimeout(limit) => write!(
                f,
                "Request timed out after {:.1} seconds",
                limit.as_secs_f64()
            ),
            TtsError::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for TtsError {}

// Conversions
impl From<std::io::Error> for TtsError {
    fn from(err: std::io::Error) -> Self {
        TtsError::Io(err)
    }
}

impl From<hound::Error> for TtsError {
    fn from(err: hound::Error) -> Self {
        TtsError::AudioEncoding(err.to_string())
    }
}

impl From<serde_json::Error> for TtsError {
    fn from(err: serde_json::Error) -> Self {
        TtsError::MalformedResponse(err.to_string())
    }
}

impl From<base64::DecodeError> for TtsError {
    fn from(err: base64::DecodeError) -> Self {
        TtsError::AudioDecode(err.to_string())
    }
}

impl From<reqwest::Error> for TtsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TtsError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            TtsError::Upstream {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            TtsError::Network(err.to_string())
        }
    }
}

// Axum integration
impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            TtsError::EmptyText
            | TtsError::TextTooLong(_)
            | TtsError::InvalidSpeed(_)
            | TtsError::InvalidPitch(_)
            | TtsError::InvalidRequest(_)
            | TtsError::InvalidUtr(_)
            | TtsError::InvalidReferral(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            TtsError::VoiceLocked { .. } | TtsError::InsufficientBalance { .. } => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            TtsError::VoiceNotFound(_)
            | TtsError::AccountNotFound(_)
            | TtsError::HistoryNotFound(_)
            | TtsError::PlanNotFound(_)
            | TtsError::PaymentNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            TtsError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            TtsError::Upstream { status, .. } if status >= 500 => {
                tracing::warn!("Upstream failure: {}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "The synthesis engine is momentarily overloaded. Please try again.".to_string(),
                )
            }
            TtsError::Upstream { .. }
            | TtsError::Network(_)
            | TtsError::MalformedResponse(_)
            | TtsError::EmptyAudio
            | TtsError::TextInsteadOfAudio(_)
            | TtsError::ContentBlocked
            | TtsError::JobFailed(_)
            | TtsError::AudioDecode(_) => {
                tracing::warn!("Upstream failure: {}", self);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            TtsError::Timeout(_) | TtsError::PollTimeout { .. } => {
                tracing::warn!("Upstream timeout: {}", self);
                (StatusCode::GATEWAY_TIMEOUT, self.to_string())
            }
            TtsError::RequestTimeout(_) => {
                tracing::warn!("{}", self);
                (StatusCode::REQUEST_TIMEOUT, self.to_string())
            }
            TtsError::MissingApiKey => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            axum::Json(serde_json::json!({
                "status": "error",
                "error": message
            })),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, TtsError>;
