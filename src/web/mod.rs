//! HTTP API for grading recitations.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! recital-check serve
//!
//! # Require a token and enable audio analysis
//! RECITAL_API_TOKEN=... TRANSCRIBER_URL=https://... TRANSCRIBER_API_KEY=... \
//!     recital-check serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `POST /api/check` - Grade a transcription (JSON body)
//! - `POST /api/analyze` - Transcribe and grade an audio upload (multipart form)
//! - `GET /api/chapters/{number}` - Verses of one chapter
//!
//! When a token is configured, every `/api` route requires it in the
//! `X-API-TOKEN` header.

pub mod server;
