use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use voxnova_server::auth::AdminKeys;
use voxnova_server::catalog::Emotion;
use voxnova_server::config::ServerConfig;
use voxnova_server::error::{Result, TtsError};
use voxnova_server::provider::{AudioBlob, SpeechProvider, SynthesisRequest};
use voxnova_server::rate_limit::RateLimitConfig;
use voxnova_server::server::{create_router, AppState};

/// Provider double that returns a short PCM clip or a 503, and keeps every request
struct StubProvider {
    calls: AtomicU32,
    fail: bool,
    delay: Option<Duration>,
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl StubProvider {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            fail,
            delay: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            fail: false,
            delay: Some(delay),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_emotion(&self) -> Option<Emotion> {
        self.requests.lock().unwrap().last().and_then(|r| r.emotion)
    }
}

#[async_trait]
impl SpeechProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioBlob> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(TtsError::Upstream {
                status: 503,
                body: "overloaded".to_string(),
            });
        }
        AudioBlob::raw_pcm(vec![0u8; 4800])
    }
}

fn test_app(provider: Arc<StubProvider>, rate_limit: Option<RateLimitConfig>, admin: AdminKeys) -> Router {
    let config = ServerConfig {
        rate_limit,
        ..ServerConfig::default()
    };
    create_router(AppState::new(provider, config, admin))
}

fn default_app() -> Router {
    test_app(StubProvider::new(false), None, AdminKeys::empty())
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str, account: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(id) = account {
        builder = builder.header("x-account-id", id);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, account: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(id) = account {
        builder = builder.header("x-account-id", id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn create_account(app: &Router) -> (String, Value) {
    let response = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/accounts")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["account_id"].as_str().unwrap().to_string();
    (id, json["state"].clone())
}

async fn balance(app: &Router, account: &str) -> u64 {
    let json = body_json(send(app, get("/account", Some(account))).await).await;
    json["state"]["characters_remaining"].as_u64().unwrap()
}

#[tokio::test]
async fn test_health_reports_provider() {
    let app = default_app();
    let response = send(&app, get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["provider"], "stub");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = default_app();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-42")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-42");
}

#[tokio::test]
async fn test_new_account_starts_on_free_tier() {
    let app = default_app();
    let (id, state) = create_account(&app).await;

    assert_eq!(state["tier"], "free");
    assert_eq!(state["characters_remaining"], 12_000);
    assert!(state["referral_code"].as_str().unwrap().starts_with("VOX-"));

    let json = body_json(send(&app, get("/account", Some(&id))).await).await;
    assert_eq!(json["account_id"], id);
}

#[tokio::test]
async fn test_account_header_required() {
    let app = default_app();

    let response = send(&app, get("/account", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, get("/account", Some("no-such-account"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn test_languages_and_plans() {
    let app = default_app();

    let json = body_json(send(&app, get("/languages", None)).await).await;
    let languages = json["languages"].as_array().unwrap();
    assert_eq!(languages.len(), 22);
    assert!(languages.iter().any(|l| l["code"] == "hi" && l["name"] == "Hindi"));

    let json = body_json(send(&app, get("/plans", None)).await).await;
    let ids: Vec<&str> = json["plans"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["starter", "elite", "pro"]);
}

#[tokio::test]
async fn test_voices_filtered_by_language() {
    let app = default_app();
    let (id, _) = create_account(&app).await;

    let json = body_json(send(&app, get("/voices?language=hi", Some(&id))).await).await;
    let voices = json["voices"].as_array().unwrap();

    assert!(!voices.is_empty());
    assert!(voices.iter().all(|v| v["language"] == "hi"));
    assert!(voices.iter().all(|v| v.get("persona").is_none()));

    let locked = voices.iter().find(|v| v["id"] == "hi-sophisticated").unwrap();
    assert_eq!(locked["accessible"], false);
    let free = voices.iter().find(|v| v["id"] == "hi-legacy-ai").unwrap();
    assert_eq!(free["accessible"], true);
}

#[tokio::test]
async fn test_voices_unknown_language() {
    let app = default_app();
    let response = send(&app, get("/voices?language=xx", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tts_success_debits_and_records_history() {
    let provider = StubProvider::new(false);
    let app = test_app(provider.clone(), None, AdminKeys::empty());
    let (id, _) = create_account(&app).await;

    let response = send(
        &app,
        post_json("/tts", Some(&id), json!({"text": "Hello", "voice_id": "en-simple-boy"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "audio/wav");
    assert_eq!(
        response.headers().get("x-characters-remaining").unwrap(),
        "11995"
    );
    let history_id = response
        .headers()
        .get("x-history-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let audio = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&audio[..4], b"RIFF");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let json = body_json(send(&app, get("/history", Some(&id))).await).await;
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], history_id.as_str());
    assert_eq!(items[0]["text"], "Hello...");

    let replay = send(
        &app,
        get(&format!("/history/{}/audio", history_id), Some(&id)),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::OK);
    let replayed = to_bytes(replay.into_body(), usize::MAX).await.unwrap();
    assert_eq!(replayed, audio);
}

#[tokio::test]
async fn test_tts_default_voice_for_language() {
    let app = default_app();
    let (id, _) = create_account(&app).await;

    let response = send(
        &app,
        post_json("/tts", Some(&id), json!({"text": "नमस्ते", "language": "hi"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(send(&app, get("/history", Some(&id))).await).await;
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_tts_rejects_empty_and_long_text() {
    let provider = StubProvider::new(false);
    let app = test_app(provider.clone(), None, AdminKeys::empty());
    let (id, _) = create_account(&app).await;

    let response = send(&app, post_json("/tts", Some(&id), json!({"text": "   "}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let long_text = "a".repeat(2501);
    let response = send(&app, post_json("/tts", Some(&id), json!({"text": long_text}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Character count per speech exceeds the 2500 limit."
    );

    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert_eq!(balance(&app, &id).await, 12_000);
}

#[tokio::test]
async fn test_tts_rejects_out_of_range_controls() {
    let app = default_app();
    let (id, _) = create_account(&app).await;

    let response = send(
        &app,
        post_json("/tts", Some(&id), json!({"text": "Hi", "speed": 3.0})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        post_json("/tts", Some(&id), json!({"text": "Hi", "pitch": -11})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tts_locked_voice_is_forbidden() {
    let provider = StubProvider::new(false);
    let app = test_app(provider.clone(), None, AdminKeys::empty());
    let (id, _) = create_account(&app).await;

    let response = send(
        &app,
        post_json("/tts", Some(&id), json!({"text": "Hi", "voice_id": "hi-sophisticated"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert_eq!(balance(&app, &id).await, 12_000);
}

#[tokio::test]
async fn test_tts_unknown_voice() {
    let app = default_app();
    let (id, _) = create_account(&app).await;

    let response = send(
        &app,
        post_json("/tts", Some(&id), json!({"text": "Hi", "voice_id": "zz-nobody"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tts_upstream_failure_refunds() {
    let provider = StubProvider::new(true);
    let app = test_app(provider.clone(), None, AdminKeys::empty());
    let (id, _) = create_account(&app).await;

    let response = send(&app, post_json("/tts", Some(&id), json!({"text": "Hello"}))).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(balance(&app, &id).await, 12_000);

    let json = body_json(send(&app, get("/history", Some(&id))).await).await;
    assert!(json["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_voice_preview_is_free() {
    let app = default_app();

    let request = Request::builder()
        .method("POST")
        .uri("/voices/en-legacy-ai/preview")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "audio/wav");
}

#[tokio::test]
async fn test_referral_flow() {
    let app = default_app();
    let (owner, owner_state) = create_account(&app).await;
    let (friend, _) = create_account(&app).await;
    let code = owner_state["referral_code"].as_str().unwrap().to_string();

    let json = body_json(send(&app, get("/account/referral", Some(&owner))).await).await;
    assert_eq!(json["code"], code.as_str());
    assert!(json["message"].as_str().unwrap().contains(&code));

    let response = send(
        &app,
        post_json(
            "/account/referral",
            Some(&friend),
            json!({"code": code.to_lowercase()}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["state"]["characters_remaining"], 12_500);

    assert_eq!(balance(&app, &owner).await, 12_500);
    let json = body_json(send(&app, get("/account/referral", Some(&owner))).await).await;
    assert_eq!(json["referral_count"], 1);

    // A second redemption is refused
    let response = send(
        &app,
        post_json("/account/referral", Some(&friend), json!({"code": code})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // So is redeeming your own code
    let response = send(
        &app,
        post_json("/account/referral", Some(&owner), json!({"code": code})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plan_payment_instructions() {
    let app = default_app();

    let json = body_json(send(&app, get("/plans/pro/payment", None)).await).await;
    assert_eq!(json["plan_id"], "pro");
    assert_eq!(json["amount_inr"], 249);
    let link = json["upi_link"].as_str().unwrap();
    assert!(link.starts_with("upi://pay?"));
    assert!(link.contains("am=249"));

    let response = send(&app, get("/plans/platinum/payment", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_submission_validation() {
    let app = default_app();
    let (id, _) = create_account(&app).await;

    let response = send(
        &app,
        post_json("/payments", Some(&id), json!({"plan_id": "pro"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Please enter the UTR number first.");

    let response = send(
        &app,
        post_json("/payments", Some(&id), json!({"plan_id": "pro", "utr": "12AB"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        post_json("/payments", Some(&id), json!({"plan_id": "pro", "utr": "123456789012"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "pending");
    assert!(json["message"].as_str().unwrap().contains("123456789012"));

    let response = send(
        &app,
        post_json("/payments", Some(&id), json!({"plan_id": "pro", "utr": "123456789012"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_approval_requires_admin_key() {
    let app = test_app(
        StubProvider::new(false),
        None,
        AdminKeys::from_keys(["operator-secret"]),
    );
    let (id, _) = create_account(&app).await;

    let response = send(
        &app,
        post_json("/payments", Some(&id), json!({"plan_id": "pro", "utr": "987654321098"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let approve = |key: Option<&str>| {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/payments/987654321098/approve");
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        builder.body(Body::empty()).unwrap()
    };

    assert_eq!(send(&app, approve(None)).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        send(&app, approve(Some("wrong"))).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let response = send(&app, approve(Some("operator-secret"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["payment"]["status"], "approved");
    assert_eq!(json["state"]["tier"], "pro");
    assert_eq!(json["state"]["characters_remaining"], 82_000);

    // The upgraded account can now use elite voices and the emotion engine
    let response = send(
        &app,
        post_json(
            "/tts",
            Some(&id),
            json!({"text": "Hi", "voice_id": "hi-sophisticated", "emotion": "cheerful"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_payment_approval_disabled_without_keys() {
    let app = default_app();
    let request = Request::builder()
        .method("POST")
        .uri("/payments/123456789012/approve")
        .header("x-api-key", "anything")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Admin API is disabled on this server");
}

#[tokio::test]
async fn test_feedback() {
    let app = default_app();

    let response = send(&app, post_json("/feedback", None, json!({"text": "Voice cut off"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Report logged. Thank you.");

    let response = send(&app, post_json("/feedback", None, json!({"text": ""}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rate_limit_applies_to_synthesis_only() {
    let config = RateLimitConfig {
        per_second: 1,
        burst_size: 2,
    };
    let app = test_app(StubProvider::new(false), Some(config), AdminKeys::empty());
    let (id, _) = create_account(&app).await;

    for _ in 0..2 {
        let response = send(&app, post_json("/tts", Some(&id), json!({"text": "Hi"}))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(&app, post_json("/tts", Some(&id), json!({"text": "Hi"}))).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response
        .headers()
        .get("retry-after")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);

    // Other accounts have their own bucket
    let (other, _) = create_account(&app).await;
    let response = send(&app, post_json("/tts", Some(&other), json!({"text": "Hi"}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Non-synthesis routes are never throttled
    for _ in 0..10 {
        assert_eq!(send(&app, get("/health", None)).await.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_made_up_account_ids_share_one_bucket() {
    let provider = StubProvider::new(false);
    let config = ServerConfig {
        rate_limit: Some(RateLimitConfig {
            per_second: 1,
            burst_size: 1,
        }),
        ..ServerConfig::default()
    };
    let state = AppState::new(provider.clone(), config, AdminKeys::empty());
    let limiter = state.rate_limiter.clone().unwrap();
    let app = create_router(state);

    let mut allowed = 0;
    for i in 0..20 {
        let request = Request::builder()
            .method("POST")
            .uri("/voices/en-legacy-ai/preview")
            .header("x-account-id", format!("made-up-{}", i))
            .header("x-forwarded-for", "198.51.100.7")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        match response.status() {
            StatusCode::OK => allowed += 1,
            StatusCode::TOO_MANY_REQUESTS => {}
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(allowed, 1);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(limiter.tracked_clients_count(), 1);
}

#[tokio::test]
async fn test_timed_out_synthesis_is_refunded() {
    let provider = StubProvider::slow(Duration::from_millis(500));
    let config = ServerConfig {
        request_timeout: Duration::from_millis(100),
        rate_limit: None,
        ..ServerConfig::default()
    };
    let app = create_router(AppState::new(provider.clone(), config, AdminKeys::empty()));
    let (id, _) = create_account(&app).await;

    let response = send(&app, post_json("/tts", Some(&id), json!({"text": "Hello world"}))).await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert!(json["error"].as_str().unwrap().contains("timed out"));

    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(balance(&app, &id).await, 12_000);
    let json = body_json(send(&app, get("/history", Some(&id))).await).await;
    assert!(json["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_emotion_reaches_provider_only_for_pro() {
    let provider = StubProvider::new(false);
    let app = test_app(
        provider.clone(),
        None,
        AdminKeys::from_keys(["operator-secret"]),
    );
    let (id, _) = create_account(&app).await;
    let speak = || post_json("/tts", Some(&id), json!({"text": "Hi", "emotion": "cheerful"}));

    assert_eq!(send(&app, speak()).await.status(), StatusCode::OK);
    assert_eq!(provider.last_emotion(), None);

    let response = send(
        &app,
        post_json("/payments", Some(&id), json!({"plan_id": "pro", "utr": "112233445566"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let approve = Request::builder()
        .method("POST")
        .uri("/payments/112233445566/approve")
        .header("x-api-key", "operator-secret")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, approve).await.status(), StatusCode::OK);

    assert_eq!(send(&app, speak()).await.status(), StatusCode::OK);
    assert_eq!(provider.last_emotion(), Some(Emotion::Cheerful));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}
