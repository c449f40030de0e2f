use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use super::normalize::{AudioBlob, JobTicket, UpstreamPayload};
use super::retry::with_retry;
use super::{http_client, read_payload, SpeechProvider, SynthesisRequest};
use crate::config::constants::DEFAULT_SAMPLE_RATE;
use crate::config::ProviderConfig;
use crate::error::{Result, TtsError};

const SUBMIT_PATH: &str = "/api/v1/client/txt2audio";
const STATUS_PATH: &str = "/api/v1/client/request-status";

#[derive(Debug, Serialize)]
struct Txt2AudioRequest<'a> {
    text: &'a str,
    model: &'a str,
    voice: &'a str,
    response_format: &'static str,
    lang: &'static str,
    format: &'static str,
    sample_rate: u32,
    speed: f32,
}

/// deAPI text-to-audio client
///
/// Submissions may answer with audio, a download link, or a request id that
/// is polled until the job settles.
pub struct DeapiProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl DeapiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = http_client(config.request_timeout)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn submit(&self, request: &SynthesisRequest, api_key: &str) -> Result<AudioBlob> {
        let body = Txt2AudioRequest {
            text: &request.text,
            model: &self.config.model,
            voice: &self.config.upstream_voice,
            response_format: "base64",
            lang: request.voice.language.locale(),
            format: "wav",
            sample_rate: DEFAULT_SAMPLE_RATE,
            speed: request.speed,
        };

        debug!(
            text_len = request.text.len(),
            lang = body.lang,
            voice = %request.voice.id,
            "deAPI synthesis request"
        );

        let response = self
            .client
            .post(self.endpoint(SUBMIT_PATH))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        match read_payload(response).await? {
            UpstreamPayload::Audio(blob) => Ok(blob),
            UpstreamPayload::Location(url) => self.download(&url).await,
            UpstreamPayload::Ticket(ticket) => self.poll(ticket, api_key).await,
        }
    }

    /// Fetch audio from a result link
    async fn download(&self, url: &str) -> Result<AudioBlob> {
        debug!(url, "Downloading synthesized audio");
        let response = self.client.get(url).send().await?;

        match read_payload(response).await? {
            UpstreamPayload::Audio(blob) => Ok(blob),
            other => Err(TtsError::MalformedResponse(format!(
                "result link did not return audio: {:?}",
                other
            ))),
        }
    }

    /// Poll a queued job at a fixed interval until it yields audio or fails
    async fn poll(&self, ticket: JobTicket, api_key: &str) -> Result<AudioBlob> {
        let attempts = self.config.poll_attempts;
        info!(job_id = %ticket.id, attempts, "Synthesis queued upstream, polling");

        let url = self.endpoint(&format!("{}/{}", STATUS_PATH, ticket.id));

        for attempt in 1..=attempts {
            tokio::time::sleep(self.config.poll_interval).await;

            let response = self.client.get(&url).bearer_auth(api_key).send().await?;

            match read_payload(response).await {
                Ok(UpstreamPayload::Audio(blob)) => {
                    debug!(job_id = %ticket.id, attempt, "Job finished");
                    return Ok(blob);
                }
                Ok(UpstreamPayload::Location(link)) => {
                    debug!(job_id = %ticket.id, attempt, "Job finished with result link");
                    return self.download(&link).await;
                }
                // Still queued or running
                Ok(UpstreamPayload::Ticket(_)) | Err(TtsError::EmptyAudio) => {
                    debug!(job_id = %ticket.id, attempt, "Job pending");
                }
                Err(e) => return Err(e),
            }
        }

        Err(TtsError::PollTimeout {
            job_id: ticket.id,
            attempts,
        })
    }
}

#[async_trait]
impl SpeechProvider for DeapiProvider {
    fn name(&self) -> &'static str {
        "deapi"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioBlob> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(TtsError::MissingApiKey)?;

        with_retry(self.config.retry, || self.submit(request, api_key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    #[test]
    fn test_request_body_shape() {
        let body = Txt2AudioRequest {
            text: "Hello",
            model: "Kokoro",
            voice: "af_alloy",
            response_format: "base64",
            lang: "en-us",
            format: "wav",
            sample_rate: 24000,
            speed: 1.0,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["text"], "Hello");
        assert_eq!(value["model"], "Kokoro");
        assert_eq!(value["voice"], "af_alloy");
        assert_eq!(value["response_format"], "base64");
        assert_eq!(value["lang"], "en-us");
        assert_eq!(value["format"], "wav");
        assert_eq!(value["sample_rate"], 24000);
        assert_eq!(value["speed"], 1.0);
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let mut config = ProviderConfig::new(ProviderKind::Deapi, None);
        config.base_url = "http://localhost:9000/".to_string();
        let provider = DeapiProvider::new(config).unwrap();
        assert_eq!(
            provider.endpoint(SUBMIT_PATH),
            "http://localhost:9000/api/v1/client/txt2audio"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let provider =
            DeapiProvider::new(ProviderConfig::new(ProviderKind::Deapi, None)).unwrap();
        let request = SynthesisRequest {
            text: "Hello".to_string(),
            voice: crate::catalog::find_voice("en-legacy-ai").unwrap().clone(),
            speed: 1.0,
            pitch: 0,
            emotion: None,
        };
        assert!(matches!(
            provider.synthesize(&request).await,
            Err(TtsError::MissingApiKey)
        ));
    }
}
