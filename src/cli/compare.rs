use clap::Args;

use crate::cli::output::print_report;
use crate::cli::{NormalizerChoice, OutputFormat};
use crate::matching::engine::{ComparisonConfig, ComparisonEngine, DEFAULT_MAX_WORD_DIFFS};
use crate::utils::validation::validate_transcription;

#[derive(Args)]
pub struct CompareArgs {
    /// Reference text
    #[arg(required = true)]
    pub reference: String,

    /// Hypothesis text, e.g. a transcription
    #[arg(required = true)]
    pub hypothesis: String,

    /// Maximum number of word mistakes listed
    #[arg(long, default_value_t = DEFAULT_MAX_WORD_DIFFS)]
    pub max_word_diffs: usize,
}

/// Execute compare subcommand
///
/// # Errors
///
/// Returns an error if either text is empty or too long.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: CompareArgs,
    format: OutputFormat,
    normalizer: NormalizerChoice,
    verbose: bool,
) -> anyhow::Result<()> {
    let normalizer = normalizer.build()?;
    validate_transcription(&args.reference)?;
    validate_transcription(&args.hypothesis)?;

    let config = ComparisonConfig {
        max_word_diffs: args.max_word_diffs,
        ..ComparisonConfig::default()
    };
    let engine = ComparisonEngine::with_config(&normalizer, config);
    let report = engine.compare(&args.reference, &args.hypothesis);

    print_report(&report, format, verbose)
}
