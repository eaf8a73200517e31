//! Command-line interface for recital-check.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **check**: Grade a recitation of a verse or a whole chapter
//! - **compare**: Compare two free texts
//! - **corpus**: List, show, or export chapters of the verse corpus
//! - **serve**: Start the HTTP API
//!
//! ## Usage
//!
//! ```text
//! # Check a transcription of chapter 112, verse 1
//! recital-check check "قل هو الله احد" --chapter 112 --verse 1
//!
//! # Check a whole chapter from a transcript file, as JSON
//! recital-check check --transcript ikhlas.txt --chapter 112 --format json
//!
//! # Transcribe a recording first (endpoint and key from the environment)
//! TRANSCRIBER_URL=https://... TRANSCRIBER_API_KEY=... \
//!     recital-check check --audio ikhlas.wav --chapter 112
//!
//! # Start the API
//! recital-check serve --port 8080
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::catalog::VerseCorpus;
use crate::normalize::{Normalizer, PreferredSettings};

pub mod check;
pub mod compare;
pub mod corpus;
pub mod output;

#[derive(Parser)]
#[command(name = "recital-check")]
#[command(version)]
#[command(about = "Grade Quran recitation transcripts against the reference text")]
#[command(
    long_about = "recital-check compares an automatic transcription of a recitation with the canonical verse text.\n\nIt normalizes both texts, aligns them word by word and letter by letter, and reports:\n- An overall similarity score and grade (correct, partial, incorrect)\n- The words that were replaced, missed or added\n- A per-verse breakdown when a whole chapter is checked"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Text normalization strategy
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub normalizer: NormalizerChoice,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Grade a recitation against a verse or a whole chapter
    Check(check::CheckArgs),

    /// Compare a reference text with a hypothesis text
    Compare(compare::CompareArgs),

    /// Inspect the verse corpus
    Corpus(corpus::CorpusArgs),

    /// Start the HTTP API
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Token required in the X-API-TOKEN header of /api requests
    #[arg(long, env = "RECITAL_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Inference endpoint used by /api/analyze
    #[arg(long, env = "TRANSCRIBER_URL")]
    pub transcriber_url: Option<String>,

    /// Bearer token for the inference endpoint
    #[arg(long, env = "TRANSCRIBER_API_KEY", hide_env_values = true)]
    pub transcriber_key: Option<String>,

    /// Path to custom corpus file
    #[arg(long)]
    pub corpus: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Which normalizer to use
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum NormalizerChoice {
    /// Preferred when compiled in, fallback otherwise
    #[default]
    Auto,
    /// Preferred only; fails if not compiled in
    Preferred,
    /// Fallback only
    Fallback,
}

impl NormalizerChoice {
    /// # Errors
    ///
    /// Returns an error if `Preferred` is requested but unavailable.
    pub fn build(self) -> anyhow::Result<Normalizer> {
        match self {
            Self::Auto => Ok(Normalizer::detect()),
            Self::Preferred => Normalizer::preferred(PreferredSettings::default())
                .context("Cannot use --normalizer preferred"),
            Self::Fallback => Ok(Normalizer::fallback()),
        }
    }
}

/// Load the corpus from `path`, or the embedded one
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_corpus(path: Option<&Path>) -> anyhow::Result<VerseCorpus> {
    match path {
        Some(path) => VerseCorpus::load_from_file(path)
            .with_context(|| format!("Failed to load corpus from {}", path.display())),
        None => Ok(VerseCorpus::load_embedded()?),
    }
}

/// Read a transcript from a file, or stdin for `-`
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn read_text_input(path: &Path) -> anyhow::Result<String> {
    use std::io::Read;

    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}
