use serde::Deserialize;

use crate::catalog::Emotion;

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    /// Falls back to the first accessible voice of `language`
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub pitch: i32,
    #[serde(default)]
    pub emotion: Option<Emotion>,
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct VoicesQuery {
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedeemReferralRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub plan_id: String,
    #[serde(default)]
    pub utr: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_request_full_deserialization() {
        let json = r#"{
            "text": "Hello world",
            "voice_id": "en-simple-boy",
            "language": "en",
            "speed": 1.5,
            "pitch": -4,
            "emotion": "cheerful"
        }"#;

        let req: SynthesizeRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.text, "Hello world");
        assert_eq!(req.voice_id.as_deref(), Some("en-simple-boy"));
        assert_eq!(req.language.as_deref(), Some("en"));
        assert_eq!(req.speed, 1.5);
        assert_eq!(req.pitch, -4);
        assert_eq!(req.emotion, Some(Emotion::Cheerful));
    }

    #[test]
    fn test_synthesize_request_minimal_deserialization() {
        let json = r#"{"text": "Hello"}"#;

        let req: SynthesizeRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.text, "Hello");
        assert_eq!(req.voice_id, None);
        assert_eq!(req.language, None);
        assert_eq!(req.speed, 1.0);
        assert_eq!(req.pitch, 0);
        assert_eq!(req.emotion, None);
    }

    #[test]
    fn test_synthesize_request_unknown_emotion() {
        let json = r#"{"text": "Hello", "emotion": "furious"}"#;
        assert!(serde_json::from_str::<SynthesizeRequest>(json).is_err());
    }

    #[test]
    fn test_synthesize_request_missing_text() {
        let json = r#"{"voice_id": "en-legacy-ai"}"#;
        assert!(serde_json::from_str::<SynthesizeRequest>(json).is_err());
    }

    #[test]
    fn test_synthesize_request_unicode_text() {
        let json = r#"{"text": "नमस्ते दुनिया"}"#;
        let req: SynthesizeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.text.chars().count(), 13);
    }

    #[test]
    fn test_payment_request_default_utr() {
        let req: PaymentRequest = serde_json::from_str(r#"{"plan_id": "pro"}"#).unwrap();
        assert_eq!(req.plan_id, "pro");
        assert_eq!(req.utr, "");
    }

    #[test]
    fn test_small_requests() {
        let req: RedeemReferralRequest =
            serde_json::from_str(r#"{"code": "VOX-ABC123"}"#).unwrap();
        assert_eq!(req.code, "VOX-ABC123");

        let req: FeedbackRequest = serde_json::from_str(r#"{"text": "Nice"}"#).unwrap();
        assert_eq!(req.text, "Nice");
    }
}
