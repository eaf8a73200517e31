use crate::cli::OutputFormat;
use crate::core::types::{OpKind, Status};
use crate::report::{ComparisonReport, WordDiff};

/// Print a report in the requested format
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_report(
    report: &ComparisonReport,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print_text_report(report, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Tsv => print_tsv_report(report),
    }
    Ok(())
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Correct => "CORRECT",
        Status::Partial => "PARTIAL",
        Status::Incorrect => "INCORRECT",
        Status::Error => "ERROR",
    }
}

fn print_text_report(report: &ComparisonReport, verbose: bool) {
    if report.is_error() {
        println!("Result: {}", status_label(report.status));
        if let Some(error) = &report.error {
            println!("   {error}");
        }
        println!("\n{}", report.advice);
        return;
    }

    println!(
        "Result: {} ({:.2}%)",
        status_label(report.status),
        report.score_percent
    );
    match (report.chapter, report.verse) {
        (Some(chapter), Some(verse)) => println!("   Chapter {chapter}, verse {verse}"),
        (Some(chapter), None) => println!("   Chapter {chapter}"),
        _ => {}
    }

    if verbose {
        println!("   Normalizer: {:?}", report.normalization.strategy);
        println!("   Reference:  {}", report.normalized_reference);
        println!("   Heard:      {}", report.normalized_hypothesis);
    }

    if !report.word_diffs.is_empty() {
        println!("\nMistakes ({} total):", report.mistake_count());
        for diff in &report.word_diffs {
            println!("   {}", describe_diff(diff));
        }
    }

    if let Some(breakdown) = &report.breakdown {
        println!(
            "\nVerses: {}/{} correct",
            breakdown.correct_verses, breakdown.total_verses
        );
        for verse in &breakdown.verses {
            println!(
                "   [{:>3}] {:<9} {:>6.2}%  {}",
                verse.number,
                verse.grade.to_string(),
                verse.ratio * 100.0,
                verse.hypothesis_slice
            );
            if verbose && !verse.char_error_ranges.is_empty() {
                let ranges: Vec<String> = verse
                    .char_error_ranges
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!("         letters: {}", ranges.join(" "));
            }
        }
    }

    println!("\n{}", report.advice);
}

fn describe_diff(diff: &WordDiff) -> String {
    match diff.kind {
        OpKind::Replace => format!("replaced: {} -> {}", diff.reference, diff.hypothesis),
        OpKind::Delete => format!("missing:  {}", diff.reference),
        OpKind::Insert => format!("extra:    {}", diff.hypothesis),
        OpKind::Equal => format!("equal:    {}", diff.reference),
    }
}

fn print_tsv_report(report: &ComparisonReport) {
    println!("scope\tchapter\tverse\tstatus\tratio\tword_errors");

    let chapter = report
        .chapter
        .map_or_else(|| "-".to_string(), |c| c.to_string());
    let verse = report
        .verse
        .map_or_else(|| "-".to_string(), |v| v.to_string());
    println!(
        "overall\t{chapter}\t{verse}\t{}\t{:.4}\t{}",
        report.status,
        report.ratio,
        report.mistake_count()
    );

    if let Some(breakdown) = &report.breakdown {
        for v in &breakdown.verses {
            let errors = v
                .word_operations
                .iter()
                .filter(|op| op.kind != OpKind::Equal)
                .count();
            println!(
                "verse\t{chapter}\t{}\t{}\t{:.4}\t{errors}",
                v.number, v.grade, v.ratio
            );
        }
    }
}
