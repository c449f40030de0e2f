//! Upstream speech synthesis providers
//!
//! Every provider goes through the same pipeline: send the request, map the
//! HTTP status to an error, then hand the body to [`normalize::classify`] so
//! whatever shape the reply takes ends up as one [`AudioBlob`].

pub mod deapi;
pub mod gemini;
pub mod normalize;
pub mod prompt;
pub mod retry;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{Emotion, VoiceOption};
use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{Result, TtsError};

pub use deapi::DeapiProvider;
pub use gemini::GeminiProvider;
pub use normalize::{AudioBlob, AudioFormat, JobStatus, JobTicket, UpstreamPayload};
pub use retry::{with_retry, RetryPolicy};

/// Longest slice of an error body kept in error messages
const MAX_ERROR_BODY: usize = 500;

/// One synthesis job as handed to a provider
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: VoiceOption,
    pub speed: f32,
    pub pitch: i32,
    pub emotion: Option<Emotion>,
}

#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Short provider identifier used in logs and `/health`
    fn name(&self) -> &'static str;

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioBlob>;
}

/// Build the provider selected in `config`
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn SpeechProvider>> {
    if config.api_key.is_none() {
        tracing::warn!(
            "No API key configured for provider '{}'; synthesis requests will fail",
            config.kind.as_str()
        );
    }

    let provider: Arc<dyn SpeechProvider> = match config.kind {
        ProviderKind::Deapi => Arc::new(DeapiProvider::new(config.clone())?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(config.clone())?),
    };
    Ok(provider)
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TtsError::Unknown(format!("Failed to build HTTP client: {}", e)))
}

/// Check the status of an upstream reply and return its content type and body
pub(crate) async fn read_body(response: reqwest::Response) -> Result<(Option<String>, Bytes)> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.bytes().await?;

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TtsError::RateLimited);
    }

    if !status.is_success() {
        let text = String::from_utf8_lossy(&body);
        if text.contains("RESOURCE_EXHAUSTED") {
            return Err(TtsError::RateLimited);
        }
        return Err(TtsError::Upstream {
            status: status.as_u16(),
            body: text.chars().take(MAX_ERROR_BODY).collect(),
        });
    }

    Ok((content_type, body))
}

/// Check the status of an upstream reply and classify its body
pub(crate) async fn read_payload(response: reqwest::Response) -> Result<UpstreamPayload> {
    let (content_type, body) = read_body(response).await?;
    normalize::classify(content_type.as_deref(), &body)
}
