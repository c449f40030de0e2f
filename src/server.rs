use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::account::{payment_instructions, referral_message, AccountStore, PaymentInstructions};
use crate::auth::{admin_auth_middleware, AdminKeys};
use crate::catalog::{default_voice_for, find_plan, find_voice, plans, voice_catalog, Language, Tier};
use crate::config::constants::{
    DEFAULT_SAMPLE_RATE, MAX_PITCH, MAX_SPEED, MAX_TEXT_LENGTH, MIN_PITCH, MIN_SPEED,
};
use crate::config::ServerConfig;
use crate::error::{Result, TtsError};
use crate::logging::middleware::{access_log_middleware, request_id_middleware};
use crate::models::requests::{
    FeedbackRequest, PaymentRequest, RedeemReferralRequest, SynthesizeRequest, VoicesQuery,
};
use crate::models::responses::{
    AccountResponse, ApprovalResponse, HealthResponse, HistoryResponse, LanguageInfo,
    LanguagesResponse, MessageResponse, PaymentResponse, PlansResponse, ReferralResponse,
    VoiceInfo, VoicesResponse,
};
use crate::provider::{AudioBlob, SpeechProvider, SynthesisRequest};
use crate::rate_limit::{rate_limit_middleware, PerClientRateLimiter, RateLimitState};
use crate::utils::header_utils::extract_account_id;

const HISTORY_ID_HEADER: &str = "x-history-id";
const CHARACTERS_REMAINING_HEADER: &str = "x-characters-remaining";

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SpeechProvider>,
    pub accounts: Arc<AccountStore>,
    pub admin_keys: AdminKeys,
    pub rate_limiter: Option<PerClientRateLimiter>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(provider: Arc<dyn SpeechProvider>, config: ServerConfig, admin_keys: AdminKeys) -> Self {
        let rate_limiter = config.rate_limit.clone().map(PerClientRateLimiter::new);
        Self {
            provider,
            accounts: Arc::new(AccountStore::new()),
            admin_keys,
            rate_limiter,
            config: Arc::new(config),
        }
    }
}

// Helper Functions

fn require_account(headers: &HeaderMap) -> Result<String> {
    extract_account_id(headers)
        .ok_or_else(|| TtsError::InvalidRequest("X-Account-Id header is required".to_string()))
}

fn parse_language(value: Option<&str>) -> Result<Option<Language>> {
    value
        .map(|v| v.parse::<Language>().map_err(TtsError::InvalidRequest))
        .transpose()
}

fn audio_response(audio: Bytes, content_type: &str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type.to_string())],
        audio,
    )
        .into_response()
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| TtsError::Unknown(format!("Invalid header value: {}", e)))
}

/// Raw PCM is not playable in a browser; everything else is served as-is
fn playable(blob: AudioBlob) -> Result<AudioBlob> {
    blob.into_wav(DEFAULT_SAMPLE_RATE)
}

// HTTP Handlers

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.provider.name().to_string(),
    })
}

async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: Language::ALL.iter().copied().map(LanguageInfo::from).collect(),
    })
}

/// List the voice catalog, optionally for one language
async fn list_voices(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<VoicesQuery>,
) -> Result<Json<VoicesResponse>> {
    let language = parse_language(query.language.as_deref())?;

    let tier = match extract_account_id(&headers) {
        Some(id) => Some(state.accounts.get(&id)?.tier),
        None => None,
    };

    let voices = voice_catalog()
        .iter()
        .filter(|voice| language.map_or(true, |lang| voice.language == lang))
        .map(|voice| VoiceInfo::new(voice, tier))
        .collect();

    Ok(Json(VoicesResponse { voices }))
}

/// Speak a voice's sample sentence; previews are free
async fn preview_voice(
    State(state): State<AppState>,
    Path(voice_id): Path<String>,
) -> Result<Response> {
    let voice = find_voice(&voice_id).ok_or_else(|| TtsError::VoiceNotFound(voice_id.clone()))?;

    tracing::debug!("Preview request - voice='{}'", voice.id);

    let request = SynthesisRequest {
        text: voice.preview_text.to_string(),
        voice: voice.clone(),
        speed: 1.0,
        pitch: 0,
        emotion: None,
    };

    let blob = playable(state.provider.synthesize(&request).await?)?;
    let content_type = blob.content_type();
    Ok(audio_response(Bytes::from(blob.bytes), content_type))
}

async fn list_plans() -> Json<PlansResponse> {
    Json(PlansResponse { plans: plans() })
}

async fn create_account(State(state): State<AppState>) -> (StatusCode, Json<AccountResponse>) {
    let (account_id, user_state) = state.accounts.create();
    (
        StatusCode::CREATED,
        Json(AccountResponse {
            account_id,
            state: user_state,
        }),
    )
}

async fn get_account(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AccountResponse>> {
    let account_id = require_account(&headers)?;
    let user_state = state.accounts.get(&account_id)?;
    Ok(Json(AccountResponse {
        account_id,
        state: user_state,
    }))
}

async fn get_referral(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReferralResponse>> {
    let account_id = require_account(&headers)?;
    let user_state = state.accounts.get(&account_id)?;
    Ok(Json(ReferralResponse {
        message: referral_message(&user_state.referral_code),
        code: user_state.referral_code,
        referral_count: user_state.referral_count,
    }))
}

async fn redeem_referral(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RedeemReferralRequest>,
) -> Result<Json<AccountResponse>> {
    let account_id = require_account(&headers)?;
    let user_state = state.accounts.redeem_referral(&account_id, &req.code)?;
    Ok(Json(AccountResponse {
        account_id,
        state: user_state,
    }))
}

/// Generate speech for an account
async fn synthesize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SynthesizeRequest>,
) -> Result<Response> {
    let account_id = require_account(&headers)?;
    let user = state.accounts.get(&account_id)?;

    tracing::debug!(
        "TTS request - text_len={}, voice={:?}, speed={}, pitch={}",
        req.text.len(),
        req.voice_id,
        req.speed,
        req.pitch
    );

    if req.text.trim().is_empty() {
        return Err(TtsError::EmptyText);
    }

    let chars = req.text.chars().count();
    if chars > MAX_TEXT_LENGTH {
        return Err(TtsError::TextTooLong(MAX_TEXT_LENGTH));
    }

    state.accounts.check_balance(&account_id, chars)?;

    let voice = match req.voice_id.as_deref() {
        Some(id) => find_voice(id).ok_or_else(|| TtsError::VoiceNotFound(id.to_string()))?,
        None => {
            let language = parse_language(req.language.as_deref())?.unwrap_or(Language::En);
            default_voice_for(language, user.tier)
                .ok_or_else(|| TtsError::VoiceNotFound(format!("default for {}", language)))?
        }
    };

    if !user.tier.can_access(voice.tier) {
        return Err(TtsError::VoiceLocked {
            voice: voice.name.clone(),
            tier: voice.tier.to_string(),
        });
    }

    if !(MIN_SPEED..=MAX_SPEED).contains(&req.speed) {
        return Err(TtsError::InvalidSpeed(req.speed));
    }

    if !(MIN_PITCH..=MAX_PITCH).contains(&req.pitch) {
        return Err(TtsError::InvalidPitch(req.pitch));
    }

    // The emotion engine is a pro feature; others are served without it
    let emotion = if user.tier == Tier::Pro {
        req.emotion
    } else {
        None
    };

    let request = SynthesisRequest {
        text: req.text,
        voice: voice.clone(),
        speed: req.speed,
        pitch: req.pitch,
        emotion,
    };

    // Held until the audio is ready; an error or a dropped request refunds it
    let debit = state.accounts.reserve(&account_id, chars)?;

    let blob = state.provider.synthesize(&request).await.and_then(playable)?;

    let content_type = blob.content_type();
    let audio = Bytes::from(blob.bytes);

    let item = state.accounts.record_history(
        &account_id,
        &request.text,
        &voice.name,
        audio.clone(),
        content_type,
    )?;
    let remaining = state.accounts.get(&account_id)?.characters_remaining;

    tracing::info!(
        account = %account_id,
        voice = %voice.id,
        chars,
        bytes = audio.len(),
        provider = state.provider.name(),
        "Synthesis completed"
    );

    let mut response = audio_response(audio, content_type);
    let response_headers = response.headers_mut();
    response_headers.insert(HISTORY_ID_HEADER, header_value(&item.id)?);
    response_headers.insert(CHARACTERS_REMAINING_HEADER, HeaderValue::from(remaining));

    debit.commit();
    Ok(response)
}

async fn list_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<HistoryResponse>> {
    let account_id = require_account(&headers)?;
    Ok(Json(HistoryResponse {
        items: state.accounts.history(&account_id)?,
    }))
}

async fn history_audio(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
) -> Result<Response> {
    let account_id = require_account(&headers)?;
    let (audio, content_type) = state.accounts.history_audio(&account_id, &item_id)?;
    Ok(audio_response(audio, &content_type))
}

async fn plan_payment(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> Result<Json<PaymentInstructions>> {
    let plan = find_plan(&plan_id).ok_or_else(|| TtsError::PlanNotFound(plan_id.clone()))?;
    Ok(Json(payment_instructions(
        plan,
        &state.config.upi_payee,
        &state.config.upi_payee_name,
    )?))
}

async fn submit_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>)> {
    let account_id = require_account(&headers)?;
    let (payment, message) = state
        .accounts
        .submit_utr(&account_id, &req.plan_id, &req.utr)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(PaymentResponse {
            status: "pending".to_string(),
            message,
            payment,
        }),
    ))
}

async fn approve_payment(
    State(state): State<AppState>,
    Path(utr): Path<String>,
) -> Result<Json<ApprovalResponse>> {
    let (payment, user_state) = state.accounts.approve_payment(&utr)?;
    Ok(Json(ApprovalResponse {
        payment,
        state: user_state,
    }))
}

async fn submit_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<MessageResponse>> {
    let account_id = extract_account_id(&headers);
    state
        .accounts
        .submit_feedback(account_id.as_deref(), &req.text)?;

    Ok(Json(MessageResponse {
        status: "success".to_string(),
        message: "Report logged. Thank you.".to_string(),
    }))
}

/// Abort a request that runs past `limit`, answering with the usual error body
///
/// The handler future is dropped, so anything it holds (such as a pending
/// debit) is released.
async fn timeout_middleware(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => TtsError::RequestTimeout(limit).into_response(),
    }
}

/// Create and configure the HTTP server router
pub fn create_router(state: AppState) -> Router<()> {
    // Browsers read the balance and history id from response headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(HISTORY_ID_HEADER),
            HeaderName::from_static(CHARACTERS_REMAINING_HEADER),
            HeaderName::from_static("x-request-id"),
        ]);

    // Synthesis costs upstream quota, so only these routes are throttled
    let mut synthesis = Router::new()
        .route("/tts", post(synthesize))
        .route("/voices/:id/preview", post(preview_voice));
    if let Some(limiter) = state.rate_limiter.clone() {
        let limit_state = RateLimitState {
            limiter,
            accounts: state.accounts.clone(),
        };
        synthesis = synthesis.route_layer(middleware::from_fn_with_state(
            limit_state,
            rate_limit_middleware,
        ));
    }

    let admin = Router::new()
        .route("/payments/:utr/approve", post(approve_payment))
        .route_layer(middleware::from_fn_with_state(
            state.admin_keys.clone(),
            admin_auth_middleware,
        ));

    let request_timeout = state.config.request_timeout;

    Router::new()
        .route("/health", get(health_check))
        .route("/languages", get(list_languages))
        .route("/voices", get(list_voices))
        .route("/plans", get(list_plans))
        .route("/plans/:id/payment", get(plan_payment))
        .route("/accounts", post(create_account))
        .route("/account", get(get_account))
        .route("/account/referral", get(get_referral).post(redeem_referral))
        .route("/history", get(list_history))
        .route("/history/:id/audio", get(history_audio))
        .route("/payments", post(submit_payment))
        .route("/feedback", post(submit_feedback))
        .merge(synthesis)
        .merge(admin)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            request_timeout,
            timeout_middleware,
        ))
        .layer(middleware::from_fn(access_log_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}
