//! HTTP API tests, driving the router without a listening socket

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use recital_check::transcribe::HttpTranscriber;
use recital_check::utils::validation::MAX_TRANSCRIPTION_CHARS;
use recital_check::web::server::{create_router, AppState};
use recital_check::{CorpusCache, Normalizer, VerseCorpus};

const BOUNDARY: &str = "recital-check-test-boundary";

/// A WAV header is enough for format detection
const WAV_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

fn state(api_token: Option<&str>, transcriber: Option<HttpTranscriber>) -> Arc<AppState> {
    Arc::new(AppState {
        cache: CorpusCache::new(VerseCorpus::load_embedded().unwrap()),
        normalizer: Normalizer::detect(),
        transcriber,
        api_token: api_token.map(str::to_string),
    })
}

fn app() -> Router {
    create_router(state(None, None))
}

/// Transcriber on a port nothing listens on
fn unreachable_transcriber() -> HttpTranscriber {
    HttpTranscriber::new("http://127.0.0.1:9/transcribe", "test-key").unwrap()
}

/// Transcriber backed by a local endpoint answering every request with `text`
async fn mock_transcriber(text: String) -> HttpTranscriber {
    let endpoint = Router::new().route(
        "/transcribe",
        axum::routing::post(move || {
            let text = text.clone();
            async move { axum::Json(serde_json::json!({ "text": text })) }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, endpoint).await.unwrap() });

    HttpTranscriber::new(format!("http://{addr}/transcribe"), "test-key").unwrap()
}

fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(fields: &[(&str, &str)], audio: Option<&[u8]>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(audio) = audio {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"recitation.wav\"\r\nContent-Type: audio/wav\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(audio);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "recital-check");
}

#[tokio::test]
async fn test_check_verse() {
    let (status, json) = send(
        app(),
        json_request(
            "/api/check",
            &serde_json::json!({
                "chapter": 112,
                "verse": 1,
                "transcription": "قل هو الله أحد",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "correct");
    assert_eq!(json["chapter"], 112);
    assert_eq!(json["verse"], 1);
    assert_eq!(json["ratio"], 1.0);
}

#[tokio::test]
async fn test_check_chapter_breakdown() {
    let (status, json) = send(
        app(),
        json_request(
            "/api/check",
            &serde_json::json!({
                "chapter": 112,
                "transcription": "قل هو الله أحد الله الصمد لم يلد ولم يولد ولم يكن له كفوا أحد",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "correct");
    assert_eq!(json["breakdown"]["total_verses"], 4);
    // One Equal block spans the whole chapter and every verse takes it whole
    assert_eq!(json["breakdown"]["verses"][3]["hypothesis_span"]["start"], 0);
    assert_eq!(json["breakdown"]["verses"][3]["hypothesis_span"]["end"], 15);
}

#[tokio::test]
async fn test_check_include_basmalah() {
    let (status, json) = send(
        app(),
        json_request(
            "/api/check",
            &serde_json::json!({
                "chapter": 1,
                "transcription": "بسم الله الرحمن الرحيم الحمد لله رب العالمين",
                "include_basmalah": true,
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["breakdown"]["total_verses"], 7);
    assert_eq!(json["breakdown"]["verses"][0]["number"], 1);
}

#[tokio::test]
async fn test_check_not_found() {
    let (status, json) = send(
        app(),
        json_request(
            "/api/check",
            &serde_json::json!({"chapter": 112, "verse": 9, "transcription": "قل"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_type"], "verse_not_found");

    let (status, json) = send(
        app(),
        json_request(
            "/api/check",
            &serde_json::json!({"chapter": 2, "transcription": "الم"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_type"], "chapter_not_found");
}

#[tokio::test]
async fn test_check_bad_input() {
    let (status, json) = send(
        app(),
        json_request(
            "/api/check",
            &serde_json::json!({"chapter": 0, "transcription": "قل"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_chapter");

    let (status, json) = send(
        app(),
        json_request(
            "/api/check",
            &serde_json::json!({"chapter": 112, "verse": 0, "transcription": "قل"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_verse");

    let (status, json) = send(
        app(),
        json_request(
            "/api/check",
            &serde_json::json!({"chapter": 112, "transcription": "  "}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "empty_transcription");
}

#[tokio::test]
async fn test_api_token_required() {
    let app = create_router(state(Some("secret"), None));
    let body = serde_json::json!({"chapter": 112, "verse": 2, "transcription": "الله الصمد"});

    let (status, json) = send(app.clone(), json_request("/api/check", &body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error_type"], "unauthorized");

    let mut request = json_request("/api/check", &body);
    request
        .headers_mut()
        .insert("x-api-token", "wrong".parse().unwrap());
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut request = json_request("/api/check", &body);
    request
        .headers_mut()
        .insert("x-api-token", "secret".parse().unwrap());
    let (status, json) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "correct");

    // Health stays open
    let (status, _) = send(
        app,
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_chapter_endpoint() {
    let (status, json) = send(
        app(),
        Request::get("/api/chapters/112").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Al-Ikhlas");
    assert_eq!(json["verse_count"], 4);
    assert_eq!(json["verses"][1]["normalized_text"], "الله الصمد");

    let (status, _) = send(
        app(),
        Request::get("/api/chapters/abc").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app(),
        Request::get("/api/chapters/2").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analyze_without_transcriber() {
    let (status, json) = send(
        app(),
        multipart_request(&[("surah", "112")], Some(WAV_BYTES)),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error_type"], "transcriber_unavailable");
}

#[tokio::test]
async fn test_analyze_transcriber_failure_is_reported() {
    let app = create_router(state(None, Some(unreachable_transcriber())));

    let (status, json) = send(
        app,
        multipart_request(&[("surah", ""), ("ayah_number", "2")], Some(WAV_BYTES)),
    )
    .await;

    // Empty surah means chapter 1
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "error");
    assert_eq!(json["chapter"], 1);
    assert_eq!(json["verse"], 2);
    assert!(json["error"].as_str().unwrap().starts_with("[ERROR]"));
}

#[tokio::test]
async fn test_analyze_bad_form() {
    let app = create_router(state(None, Some(unreachable_transcriber())));

    let (status, json) = send(
        app.clone(),
        multipart_request(&[("surah", "abc")], Some(WAV_BYTES)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_chapter");

    let (status, json) = send(
        app.clone(),
        multipart_request(&[("surah", "112")], Some(b"plain text, not audio")),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json["error_type"], "unknown_audio_format");

    let (status, json) = send(app, multipart_request(&[("surah", "112")], None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "empty_audio");
}

#[tokio::test]
async fn test_analyze_grades_transcription() {
    let transcriber = mock_transcriber("الله الصمد".to_string()).await;
    let app = create_router(state(None, Some(transcriber)));

    let (status, json) = send(
        app,
        multipart_request(&[("surah", "112"), ("ayah_number", "2")], Some(WAV_BYTES)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "correct");
    assert_eq!(json["chapter"], 112);
    assert_eq!(json["verse"], 2);
    assert_eq!(json["transcription"], "الله الصمد");
}

#[tokio::test]
async fn test_analyze_rejects_oversized_transcription() {
    let text = "قل ".repeat(MAX_TRANSCRIPTION_CHARS / 3 + 1);
    let transcriber = mock_transcriber(text).await;
    let app = create_router(state(None, Some(transcriber)));

    let (status, json) = send(
        app,
        multipart_request(&[("surah", "112")], Some(WAV_BYTES)),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error_type"], "transcription_too_long");
}
