//! Response-shape adapter for upstream TTS replies.
//!
//! Providers answer the same request in several ways: a raw audio body, JSON
//! carrying base64 audio under one of several keys at varying depth, JSON
//! pointing at a download URL, or JSON describing an asynchronous job that has
//! to be polled. Everything here turns those replies into one
//! [`UpstreamPayload`].

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::VecDeque;

use crate::audio::wav_utils::encode_pcm16_wav;
use crate::error::{Result, TtsError};

/// How deep into nested JSON the payload search goes
pub const MAX_SEARCH_DEPTH: usize = 4;

/// Keys whose string value may hold base64 audio
const AUDIO_KEYS: [&str; 7] = [
    "data",
    "audio_content",
    "audioContent",
    "audio",
    "base64",
    "audio_base64",
    "b64_json",
];

/// Smallest decoded payload accepted as untagged raw PCM (about 10 ms at 24 kHz)
///
/// Shorter strings under generic keys like `data` are usually status words or
/// error text that happen to be valid base64.
pub const MIN_UNTAGGED_PCM_BYTES: usize = 480;

/// Keys whose string value may hold a download URL
const URL_KEYS: [&str; 5] = ["url", "result_url", "audio_url", "download_url", "output_url"];

/// Keys identifying an asynchronous job
const TICKET_KEYS: [&str; 3] = ["request_id", "job_id", "task_id"];

lazy_static! {
    /// `data:audio/wav;base64,` and friends
    static ref DATA_URI_PREFIX: Regex = Regex::new(r"^data:[^,]*;base64,").unwrap();
}

/// Container format of a decoded audio payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    /// Headerless little-endian 16-bit PCM
    RawPcm,
}

impl AudioFormat {
    /// Detect the container from magic bytes; unknown data is treated as raw PCM
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
            AudioFormat::Wav
        } else if bytes.starts_with(b"ID3") || is_mpeg_frame_header(bytes) {
            AudioFormat::Mp3
        } else if bytes.starts_with(b"OggS") {
            AudioFormat::Ogg
        } else if bytes.starts_with(b"fLaC") {
            AudioFormat::Flac
        } else {
            AudioFormat::RawPcm
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::RawPcm => "audio/L16",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Flac => "flac",
            AudioFormat::RawPcm => "pcm",
        }
    }
}

/// MPEG-1/2/2.5 Layer III frame header with a usable bitrate and sample rate
fn is_mpeg_frame_header(bytes: &[u8]) -> bool {
    if bytes.len() < 4 || bytes[0] != 0xFF || (bytes[1] & 0xE0) != 0xE0 {
        return false;
    }
    let version = (bytes[1] >> 3) & 0b11;
    let layer = (bytes[1] >> 1) & 0b11;
    let bitrate = bytes[2] >> 4;
    let sample_rate = (bytes[2] >> 2) & 0b11;

    version != 0b01 && layer == 0b01 && bitrate != 0 && bitrate != 0b1111 && sample_rate != 0b11
}

/// Decoded audio bytes plus their container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioBlob {
    /// Wrap bytes, sniffing the format. Empty audio is an error.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        let format = AudioFormat::sniff(&bytes);
        Ok(Self { bytes, format })
    }

    /// Wrap bytes the caller knows to be raw PCM
    pub fn raw_pcm(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        Ok(Self {
            bytes,
            format: AudioFormat::RawPcm,
        })
    }

    /// Put raw PCM into a mono WAV container; containers pass through
    pub fn into_wav(self, sample_rate: u32) -> Result<Self> {
        match self.format {
            AudioFormat::RawPcm => Ok(Self {
                bytes: encode_pcm16_wav(&self.bytes, sample_rate, 1)?,
                format: AudioFormat::Wav,
            }),
            _ => Ok(self),
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// State of an asynchronous synthesis job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Done,
    Failed(String),
}

impl JobStatus {
    pub fn parse(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "done" | "completed" | "complete" | "succeeded" | "success" | "finished" => {
                JobStatus::Done
            }
            "failed" | "error" | "cancelled" | "canceled" => JobStatus::Failed(status.to_string()),
            _ => JobStatus::Pending,
        }
    }
}

/// Handle for a job that has not produced audio yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTicket {
    pub id: String,
    pub status: JobStatus,
}

/// What an upstream reply turned out to contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamPayload {
    Audio(AudioBlob),
    /// Audio must be downloaded from this URL
    Location(String),
    Ticket(JobTicket),
}

/// Strip a data-URI prefix and all whitespace from a base64 string
pub fn clean_base64(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = DATA_URI_PREFIX.replace(trimmed, "");
    without_prefix.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Decode base64 audio, tolerating missing padding and the URL-safe alphabet
pub fn decode_base64(raw: &str) -> Result<Vec<u8>> {
    let cleaned = clean_base64(raw);
    if cleaned.is_empty() {
        return Err(TtsError::EmptyAudio);
    }

    let mut last_error = None;
    for engine in [&STANDARD, &STANDARD_NO_PAD, &URL_SAFE, &URL_SAFE_NO_PAD] {
        match engine.decode(cleaned.as_bytes()) {
            Ok(bytes) => return Ok(bytes),
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) => Err(e.into()),
        None => Err(TtsError::EmptyAudio),
    }
}

fn is_url(value: &str) -> bool {
    let value = value.trim_start();
    value.starts_with("https://") || value.starts_with("http://")
}

fn is_pcm_mime(mime: &str) -> bool {
    let mime = mime.to_lowercase();
    mime.contains("l16") || mime.contains("pcm")
}

/// Classify a whole upstream reply
pub fn classify(content_type: Option<&str>, body: &[u8]) -> Result<UpstreamPayload> {
    let content_type = content_type.unwrap_or("").to_lowercase();

    if content_type.starts_with("audio/") || content_type.starts_with("application/octet-stream")
    {
        let blob = if is_pcm_mime(&content_type) {
            AudioBlob::raw_pcm(body.to_vec())?
        } else {
            AudioBlob::new(body.to_vec())?
        };
        return Ok(UpstreamPayload::Audio(blob));
    }

    // Some gateways send audio as text/plain or without a content type
    let sniffed = AudioFormat::sniff(body);
    if sniffed != AudioFormat::RawPcm {
        return Ok(UpstreamPayload::Audio(AudioBlob::new(body.to_vec())?));
    }

    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(TtsError::EmptyAudio);
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        TtsError::MalformedResponse(format!(
            "expected audio or JSON ({}): {}",
            if content_type.is_empty() {
                "no content type"
            } else {
                content_type.as_str()
            },
            e
        ))
    })?;

    extract_payload(&value)
}

/// Search a JSON reply for audio, a download URL or a job ticket
///
/// The search is breadth-first so shallow matches win. Audio or a URL found
/// anywhere beats a job ticket; a failed job status beats a pending ticket.
pub fn extract_payload(value: &Value) -> Result<UpstreamPayload> {
    let mut queue: VecDeque<(&Value, usize)> = VecDeque::new();
    queue.push_back((value, 0));

    let mut ticket: Option<JobTicket> = None;
    let mut failure: Option<String> = None;
    let mut decode_error: Option<TtsError> = None;

    while let Some((node, depth)) = queue.pop_front() {
        match node {
            Value::Object(map) => {
                let pcm_hint = ["mimeType", "mime_type", "content_type"]
                    .iter()
                    .filter_map(|k| map.get(*k).and_then(Value::as_str))
                    .any(is_pcm_mime);

                for key in AUDIO_KEYS {
                    if let Some(Value::String(s)) = map.get(key) {
                        if s.trim().is_empty() {
                            continue;
                        }
                        if is_url(s) {
                            return Ok(UpstreamPayload::Location(s.trim().to_string()));
                        }
                        match decode_base64(s) {
                            Ok(bytes) => {
                                if let Some(blob) = plausible_audio(bytes, pcm_hint) {
                                    return Ok(UpstreamPayload::Audio(blob));
                                }
                            }
                            Err(e) => {
                                decode_error.get_or_insert(e);
                            }
                        }
                    }
                }

                for key in URL_KEYS {
                    if let Some(Value::String(s)) = map.get(key) {
                        if is_url(s) {
                            return Ok(UpstreamPayload::Location(s.trim().to_string()));
                        }
                    }
                }

                let status = map.get("status").and_then(Value::as_str).map(JobStatus::parse);

                if let Some(JobStatus::Failed(status_text)) = &status {
                    if failure.is_none() {
                        let detail = ["error", "message", "detail"]
                            .iter()
                            .find_map(|k| match map.get(*k) {
                                Some(Value::String(s)) => Some(s.clone()),
                                Some(other @ Value::Object(_)) => Some(other.to_string()),
                                _ => None,
                            })
                            .unwrap_or_else(|| status_text.clone());
                        failure = Some(detail);
                    }
                }

                if ticket.is_none() {
                    let id = TICKET_KEYS
                        .iter()
                        .find_map(|k| map.get(*k).and_then(value_as_id))
                        .or_else(|| {
                            status
                                .as_ref()
                                .and_then(|_| map.get("id").and_then(value_as_id))
                        });
                    if let Some(id) = id {
                        ticket = Some(JobTicket {
                            id,
                            status: status.clone().unwrap_or(JobStatus::Pending),
                        });
                    }
                }

                if depth < MAX_SEARCH_DEPTH {
                    for child in map.values() {
                        if child.is_object() || child.is_array() {
                            queue.push_back((child, depth + 1));
                        }
                    }
                }
            }
            // Arrays do not add a level; `candidates[0]` sits beside `candidates`
            Value::Array(items) => {
                for child in items {
                    if child.is_object() || child.is_array() {
                        queue.push_back((child, depth));
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(detail) = failure {
        return Err(TtsError::JobFailed(detail));
    }

    match (ticket, decode_error) {
        (Some(ticket), _) => Ok(UpstreamPayload::Ticket(ticket)),
        (None, Some(e)) => Err(e),
        (None, None) => Err(TtsError::EmptyAudio),
    }
}

/// Accept decoded bytes as audio only when they look like it
fn plausible_audio(bytes: Vec<u8>, pcm_hint: bool) -> Option<AudioBlob> {
    if bytes.is_empty() {
        return None;
    }
    if pcm_hint {
        return AudioBlob::raw_pcm(bytes).ok();
    }
    let format = AudioFormat::sniff(&bytes);
    if format == AudioFormat::RawPcm && bytes.len() < MIN_UNTAGGED_PCM_BYTES {
        return None;
    }
    Some(AudioBlob { bytes, format })
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
