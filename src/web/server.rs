use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use crate::catalog::{CorpusCache, CorpusError};
use crate::cli::{load_corpus, NormalizerChoice, ServeArgs};
use crate::matching::engine::{CheckError, ComparisonConfig, ComparisonEngine};
use crate::normalize::Normalizer;
use crate::report::ComparisonReport;
use crate::transcribe::{is_failure, HttpTranscriber};
use crate::utils::validation::{
    parse_chapter, parse_verse, validate_audio, validate_chapter, validate_filename,
    validate_transcription, ValidationError, MAX_AUDIO_SIZE,
};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 10;
pub const MAX_TEXT_FIELD_SIZE: usize = 1024; // 1KB, numbers only
pub const MAX_BODY_SIZE: usize = MAX_AUDIO_SIZE + 1024 * 1024;

/// Covers the transcriber's own timeout plus alignment
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Header carrying the API token
pub const API_TOKEN_HEADER: &str = "x-api-token";

/// Shared application state
pub struct AppState {
    pub cache: CorpusCache,
    pub normalizer: Normalizer,

    /// Inference endpoint for `/api/analyze`; audio analysis is disabled without it
    pub transcriber: Option<HttpTranscriber>,

    /// Required `X-API-TOKEN` value; `/api` is open when unset
    pub api_token: Option<String>,
}

/// Request body of `POST /api/check`
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub chapter: u32,
    pub verse: Option<u32>,
    pub transcription: String,

    #[serde(default)]
    pub include_basmalah: bool,
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, error_type: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
            error_type: error_type.to_string(),
            details: None,
        }),
    )
        .into_response()
}

fn validation_response(error: &ValidationError) -> Response {
    let (status, error_type) = match error {
        ValidationError::EmptyTranscription => (StatusCode::BAD_REQUEST, "empty_transcription"),
        ValidationError::TranscriptionTooLong(_) => {
            (StatusCode::PAYLOAD_TOO_LARGE, "transcription_too_long")
        }
        ValidationError::InvalidChapter(_) => (StatusCode::BAD_REQUEST, "invalid_chapter"),
        ValidationError::InvalidVerse(_) => (StatusCode::BAD_REQUEST, "invalid_verse"),
        ValidationError::EmptyAudio => (StatusCode::BAD_REQUEST, "empty_audio"),
        ValidationError::AudioTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "audio_too_large"),
        ValidationError::UnknownAudioFormat => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unknown_audio_format")
        }
        ValidationError::FilenameTooLong
        | ValidationError::InvalidFilename
        | ValidationError::EmptyFilename => (StatusCode::BAD_REQUEST, "invalid_filename"),
    };
    error_response(status, error_type, &error.to_string())
}

fn check_error_response(error: &CheckError) -> Response {
    match error {
        CheckError::Corpus(CorpusError::ChapterNotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "chapter_not_found", &error.to_string())
        }
        CheckError::VerseNotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, "verse_not_found", &error.to_string())
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(create_safe_error_response(
                "internal_error",
                "The recitation could not be checked",
                Some(&error.to_string()),
            )),
        )
            .into_response(),
    }
}

/// Reject the request unless it carries the configured token
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(());
    };

    let provided = headers
        .get(API_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    if provided == Some(expected) {
        Ok(())
    } else {
        warn!("Rejected request with missing or invalid API token");
        Err(error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Invalid or missing API token",
        ))
    }
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs, normalizer: NormalizerChoice) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, normalizer).await })
}

/// Build the shared state from command-line arguments
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded, the normalizer is
/// unavailable, or the transcriber client cannot be built.
pub fn build_state(args: &ServeArgs, normalizer: NormalizerChoice) -> anyhow::Result<AppState> {
    let corpus = load_corpus(args.corpus.as_deref())?;
    info!(
        chapters = corpus.len(),
        script = corpus.script(),
        "Loaded corpus"
    );

    let transcriber = match (&args.transcriber_url, &args.transcriber_key) {
        (Some(url), Some(key)) => Some(HttpTranscriber::new(url.as_str(), key.as_str())?),
        (None, None) => {
            info!("No transcriber configured; /api/analyze is disabled");
            None
        }
        _ => {
            warn!("Transcriber needs both a URL and a key; /api/analyze is disabled");
            None
        }
    };

    if args.api_token.is_none() {
        warn!("No API token configured; /api endpoints are unauthenticated");
    }

    Ok(AppState {
        cache: CorpusCache::new(corpus),
        normalizer: normalizer.build()?,
        transcriber,
        api_token: args.api_token.clone(),
    })
}

/// Create the application router with its security layers.
///
/// Rate limiting is keyed on the peer address and is added by the server,
/// so the router can also be driven directly in tests.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/check", post(check_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/chapters/{number}", get(chapter_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-xss-protection"),
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("strict-transport-security"),
                    HeaderValue::from_static("max-age=31536000; includeSubDomains"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                ))
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
}

async fn run_server(args: ServeArgs, normalizer: NormalizerChoice) -> anyhow::Result<()> {
    let state = Arc::new(build_state(&args, normalizer)?);

    // 10 requests per second per IP, bursts of 50
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10)
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?;

    let app = create_router(state).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    });

    let addr = format!("{}:{}", args.address, args.port);
    info!(address = %addr, "Starting recital-check web server");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "recital-check",
    }))
}

/// Grade a transcription given as text
async fn check_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CheckRequest>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    if let Err(e) = validate_chapter(request.chapter) {
        return validation_response(&e);
    }
    if request.verse == Some(0) {
        return validation_response(&ValidationError::InvalidVerse("0".to_string()));
    }
    if !is_failure(&request.transcription) {
        if let Err(e) = validate_transcription(&request.transcription) {
            return validation_response(&e);
        }
    }

    info!(
        chapter = request.chapter,
        verse = request.verse,
        chars = request.transcription.chars().count(),
        "Check request"
    );
    match run_check(
        &state,
        request.chapter,
        request.verse,
        request.include_basmalah,
        &request.transcription,
    ) {
        Ok(report) => Json(report).into_response(),
        Err(e) => check_error_response(&e),
    }
}

/// Form fields of `POST /api/analyze`
#[derive(Debug, Default)]
struct AnalyzeForm {
    audio: Option<Vec<u8>>,
    filename: Option<String>,
    surah: Option<String>,
    ayah_number: Option<String>,
}

/// Transcribe an uploaded recording, then grade it
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let Some(transcriber) = state.transcriber.as_ref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "transcriber_unavailable",
            "Audio analysis is not configured on this server",
        );
    };

    let form = match read_analyze_form(&mut multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    // An empty surah field means chapter 1
    let chapter = match form.surah.as_deref().map(str::trim) {
        None | Some("") => 1,
        Some(raw) => match parse_chapter(raw) {
            Ok(chapter) => chapter,
            Err(e) => return validation_response(&e),
        },
    };
    let verse = match form.ayah_number.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match parse_verse(raw) {
            Ok(verse) => Some(verse),
            Err(e) => return validation_response(&e),
        },
    };

    let Some(audio) = form.audio else {
        return validation_response(&ValidationError::EmptyAudio);
    };
    let format = match validate_audio(&audio) {
        Ok(format) => format,
        Err(e) => return validation_response(&e),
    };

    info!(
        chapter,
        verse,
        bytes = audio.len(),
        format = ?format,
        file = form.filename.as_deref().unwrap_or("-"),
        "Analyze request"
    );
    let transcription = transcriber.transcribe(audio, format.content_type()).await;
    if !is_failure(&transcription) {
        if let Err(e) = validate_transcription(&transcription) {
            warn!(error = %e, "Rejecting transcriber output");
            return validation_response(&e);
        }
    }

    match run_check(&state, chapter, verse, false, &transcription) {
        Ok(report) => Json(report).into_response(),
        Err(e) => check_error_response(&e),
    }
}

async fn read_analyze_form(multipart: &mut Multipart) -> Result<AnalyzeForm, Response> {
    let mut form = AnalyzeForm::default();
    let mut fields_received = 0usize;

    loop {
        if fields_received >= MAX_MULTIPART_FIELDS {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "field_limit_exceeded",
                "Too many form fields",
            ));
        }

        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(create_safe_error_response(
                        "invalid_form",
                        "Malformed multipart form",
                        Some(&e.to_string()),
                    )),
                )
                    .into_response());
            }
        };
        fields_received += 1;

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                if let Some(filename) = field.file_name() {
                    match validate_filename(filename) {
                        Ok(filename) => form.filename = Some(filename),
                        Err(e) => return Err(validation_response(&e)),
                    }
                }
                let bytes = field.bytes().await.map_err(|e| {
                    error_response(StatusCode::BAD_REQUEST, "invalid_form", &e.body_text())
                })?;
                if bytes.len() > MAX_AUDIO_SIZE {
                    return Err(validation_response(&ValidationError::AudioTooLarge(
                        bytes.len(),
                    )));
                }
                form.audio = Some(bytes.to_vec());
            }
            "surah" | "ayah_number" => {
                let text = field.text().await.map_err(|e| {
                    error_response(StatusCode::BAD_REQUEST, "invalid_form", &e.body_text())
                })?;
                if text.len() > MAX_TEXT_FIELD_SIZE {
                    return Err(error_response(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        "field_too_large",
                        "Form field exceeds size limit",
                    ));
                }
                if name == "surah" {
                    form.surah = Some(text);
                } else {
                    form.ayah_number = Some(text);
                }
            }
            _ => {
                // Unknown fields are ignored
            }
        }
    }

    Ok(form)
}

/// Canonical verses of a chapter, raw and normalized
async fn chapter_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(number): Path<String>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let number = match parse_chapter(&number) {
        Ok(number) => number,
        Err(e) => return validation_response(&e),
    };

    match state.cache.chapter(number) {
        Ok(chapter) => {
            let verses: Vec<serde_json::Value> = chapter
                .verses
                .iter()
                .map(|verse| {
                    serde_json::json!({
                        "number": verse.number,
                        "text": verse.text,
                        "normalized_text": state.normalizer.normalize(&verse.text),
                    })
                })
                .collect();
            Json(serde_json::json!({
                "number": chapter.number,
                "name": chapter.name,
                "verse_count": chapter.len(),
                "verses": verses,
            }))
            .into_response()
        }
        Err(e) => check_error_response(&CheckError::Corpus(e)),
    }
}

fn run_check(
    state: &AppState,
    chapter: u32,
    verse: Option<u32>,
    include_basmalah: bool,
    transcription: &str,
) -> Result<ComparisonReport, CheckError> {
    let config = ComparisonConfig {
        exclude_basmalah: !include_basmalah,
        ..ComparisonConfig::default()
    };
    let engine = ComparisonEngine::with_config(&state.normalizer, config);

    let report = match verse {
        Some(verse) => engine.check_verse(&state.cache, chapter, verse, transcription)?,
        None => engine.check_chapter(&state.cache, chapter, transcription)?,
    };
    info!(
        chapter,
        verse,
        status = %report.status,
        ratio = report.ratio,
        "Check complete"
    );
    Ok(report)
}
