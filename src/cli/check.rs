use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;

use crate::catalog::{CorpusCache, CorpusError};
use crate::cli::output::print_report;
use crate::cli::{load_corpus, read_text_input, NormalizerChoice, OutputFormat};
use crate::matching::engine::{
    CheckError, ComparisonConfig, ComparisonEngine, DEFAULT_MAX_WORD_DIFFS,
};
use crate::transcribe::{is_failure, HttpTranscriber};
use crate::utils::validation::{validate_audio, validate_transcription};

#[derive(Args)]
pub struct CheckArgs {
    /// Transcription text (or use --transcript / --audio)
    #[arg(conflicts_with_all = ["transcript", "audio"])]
    pub text: Option<String>,

    /// Read the transcription from a file; use '-' for stdin
    #[arg(short, long, conflicts_with = "audio")]
    pub transcript: Option<PathBuf>,

    /// Transcribe this recording with the inference endpoint first
    #[arg(long)]
    pub audio: Option<PathBuf>,

    /// Chapter (surah) number
    #[arg(short, long, required = true, value_parser = clap::value_parser!(u32).range(1..=114))]
    pub chapter: u32,

    /// Verse (ayah) number; omit to check the whole chapter
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub verse: Option<u32>,

    /// Keep a leading basmalah verse when checking a whole chapter
    #[arg(long)]
    pub include_basmalah: bool,

    /// Maximum number of word mistakes listed
    #[arg(long, default_value_t = DEFAULT_MAX_WORD_DIFFS)]
    pub max_word_diffs: usize,

    /// Path to custom corpus file
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Inference endpoint for --audio
    #[arg(long, env = "TRANSCRIBER_URL")]
    pub transcriber_url: Option<String>,

    /// Bearer token for the inference endpoint
    #[arg(long, env = "TRANSCRIBER_API_KEY", hide_env_values = true)]
    pub transcriber_key: Option<String>,
}

/// Execute check subcommand
///
/// # Errors
///
/// Returns an error if the transcription cannot be obtained, the corpus
/// cannot be loaded, or the chapter or verse does not exist.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: CheckArgs,
    format: OutputFormat,
    normalizer: NormalizerChoice,
    verbose: bool,
) -> anyhow::Result<()> {
    let normalizer = normalizer.build()?;
    let transcription = obtain_transcription(&args)?;
    if !is_failure(&transcription) {
        validate_transcription(&transcription)?;
    }

    let corpus = load_corpus(args.corpus.as_deref())?;
    if verbose {
        eprintln!(
            "Loaded corpus with {} chapters ({} script)",
            corpus.len(),
            corpus.script()
        );
    }
    let available: Vec<String> = corpus
        .chapters()
        .iter()
        .map(|chapter| chapter.number.to_string())
        .collect();
    let cache = CorpusCache::new(corpus);

    let config = ComparisonConfig {
        max_word_diffs: args.max_word_diffs,
        exclude_basmalah: !args.include_basmalah,
    };
    let engine = ComparisonEngine::with_config(&normalizer, config);

    let result = match args.verse {
        Some(verse) => engine.check_verse(&cache, args.chapter, verse, &transcription),
        None => engine.check_chapter(&cache, args.chapter, &transcription),
    };
    let report = result.map_err(|error| {
        let missing = matches!(error, CheckError::Corpus(CorpusError::ChapterNotFound(_)));
        let error = anyhow::Error::from(error);
        if missing && args.corpus.is_none() {
            error.context(format!(
                "The embedded corpus only holds chapters {}; pass --corpus with a full corpus file",
                available.join(", ")
            ))
        } else {
            error
        }
    })?;

    print_report(&report, format, verbose)
}

fn obtain_transcription(args: &CheckArgs) -> anyhow::Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.transcript {
        return read_text_input(path);
    }
    if let Some(path) = &args.audio {
        return transcribe_file(args, path);
    }
    bail!("No transcription given: pass it as an argument, with --transcript, or with --audio")
}

fn transcribe_file(args: &CheckArgs, path: &std::path::Path) -> anyhow::Result<String> {
    let (Some(url), Some(key)) = (&args.transcriber_url, &args.transcriber_key) else {
        bail!("--audio needs --transcriber-url and --transcriber-key (or TRANSCRIBER_URL and TRANSCRIBER_API_KEY)");
    };

    let audio =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let format = validate_audio(&audio)?;
    let transcriber = HttpTranscriber::new(url.as_str(), key.as_str())?;

    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(transcriber.transcribe(audio, format.content_type())))
}
