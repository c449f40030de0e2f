use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::normalize::{extract_payload, AudioBlob, UpstreamPayload};
use super::prompt::build_style_prompt;
use super::retry::with_retry;
use super::{http_client, read_body, SpeechProvider, SynthesisRequest};
use crate::config::constants::DEFAULT_SAMPLE_RATE;
use crate::config::ProviderConfig;
use crate::error::{Result, TtsError};

/// Characters of a stray text reply quoted back in the error
const TEXT_PREVIEW_CHARS: usize = 100;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Gemini `generateContent` speech client
///
/// Delivery controls are expressed through a style prompt. Audio comes back
/// as inline 24 kHz PCM and is wrapped into WAV.
pub struct GeminiProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = http_client(config.request_timeout)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(request: &SynthesisRequest) -> Value {
        let prompt = build_style_prompt(
            &request.text,
            request.speed,
            request.pitch,
            request.emotion,
            &request.voice.persona,
        );

        let safety_settings: Vec<Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| json!({ "category": category, "threshold": "BLOCK_NONE" }))
            .collect();

        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": request.voice.prebuilt_voice }
                    }
                }
            },
            "safetySettings": safety_settings
        })
    }

    async fn generate(&self, request: &SynthesisRequest, api_key: &str) -> Result<AudioBlob> {
        debug!(
            text_len = request.text.len(),
            voice = %request.voice.id,
            prebuilt = request.voice.prebuilt_voice,
            "Gemini synthesis request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&Self::request_body(request))
            .send()
            .await?;

        let (_, body) = read_body(response).await?;
        let value: Value = serde_json::from_slice(&body)?;

        extract_audio(&value)?.into_wav(DEFAULT_SAMPLE_RATE)
    }
}

/// Pull the inline audio out of a `generateContent` reply
fn extract_audio(value: &Value) -> Result<AudioBlob> {
    let candidate = value
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .ok_or_else(|| TtsError::MalformedResponse("No candidates returned".to_string()))?;

    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .ok_or(TtsError::ContentBlocked)?;

    let audio_part = parts.iter().find(|part| {
        part.get("inlineData")
            .and_then(|d| d.get("data"))
            .and_then(Value::as_str)
            .map_or(false, |data| !data.trim().is_empty())
    });

    let Some(part) = audio_part else {
        let text = parts
            .iter()
            .find_map(|part| part.get("text").and_then(Value::as_str));
        return match text {
            Some(text) => Err(TtsError::TextInsteadOfAudio(
                text.chars().take(TEXT_PREVIEW_CHARS).collect(),
            )),
            None => Err(TtsError::EmptyAudio),
        };
    };

    match extract_payload(part)? {
        UpstreamPayload::Audio(blob) => Ok(blob),
        other => Err(TtsError::MalformedResponse(format!(
            "inline data did not carry audio: {:?}",
            other
        ))),
    }
}

#[async_trait]
impl SpeechProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioBlob> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(TtsError::MissingApiKey)?;

        with_retry(self.config.retry, || self.generate(request, api_key)).await
    }
}
