use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};

use crate::catalog::{CorpusError, VerseSource};
use crate::cli::{load_corpus, NormalizerChoice, OutputFormat};
use crate::core::verse::Chapter;

#[derive(Args)]
pub struct CorpusArgs {
    #[command(subcommand)]
    pub command: CorpusCommands,
}

#[derive(Subcommand)]
pub enum CorpusCommands {
    /// List all chapters in the corpus
    List {
        /// Path to custom corpus file
        #[arg(long)]
        corpus: Option<PathBuf>,
    },

    /// Show the verses of a chapter
    Show {
        /// Chapter number
        #[arg(required = true)]
        number: u32,

        /// Path to custom corpus file
        #[arg(long)]
        corpus: Option<PathBuf>,
    },

    /// Export the corpus as JSON
    Export {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to custom corpus file to export (defaults to embedded)
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
}

/// Execute corpus subcommand
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded, the chapter does not
/// exist, or the export cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: CorpusArgs,
    format: OutputFormat,
    normalizer: NormalizerChoice,
    verbose: bool,
) -> anyhow::Result<()> {
    match args.command {
        CorpusCommands::List { corpus } => list_chapters(corpus.as_deref(), format),
        CorpusCommands::Show { number, corpus } => {
            show_chapter(number, corpus.as_deref(), format, normalizer, verbose)
        }
        CorpusCommands::Export { output, corpus } => {
            export_corpus(output.as_deref(), corpus.as_deref(), verbose)
        }
    }
}

fn list_chapters(path: Option<&std::path::Path>, format: OutputFormat) -> anyhow::Result<()> {
    let corpus = load_corpus(path)?;

    match format {
        OutputFormat::Text => {
            println!("Chapters in corpus ({} script):\n", corpus.script());
            for entry in corpus.chapters() {
                println!(
                    "  {:>3}  {:<20} {} verses",
                    entry.number,
                    entry.name.as_deref().unwrap_or("-"),
                    entry.verses.len()
                );
            }
            println!("\nTotal: {} chapters", corpus.len());
        }
        OutputFormat::Json => {
            let chapters: Vec<serde_json::Value> = corpus
                .chapters()
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "number": entry.number,
                        "name": entry.name,
                        "verse_count": entry.verses.len(),
                    })
                })
                .collect();
            let output = serde_json::json!({
                "script": corpus.script(),
                "count": chapters.len(),
                "chapters": chapters,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("number\tname\tverse_count");
            for entry in corpus.chapters() {
                println!(
                    "{}\t{}\t{}",
                    entry.number,
                    entry.name.as_deref().unwrap_or(""),
                    entry.verses.len()
                );
            }
        }
    }

    Ok(())
}

fn show_chapter(
    number: u32,
    path: Option<&std::path::Path>,
    format: OutputFormat,
    normalizer: NormalizerChoice,
    verbose: bool,
) -> anyhow::Result<()> {
    let corpus = load_corpus(path)?;
    let normalizer = normalizer.build()?;

    let texts = match corpus.verse_texts(number) {
        Ok(texts) => texts,
        Err(CorpusError::ChapterNotFound(n)) => {
            anyhow::bail!("Chapter {n} not found in corpus ({} chapters available)", corpus.len())
        }
        Err(e) => return Err(e.into()),
    };
    let mut chapter = Chapter::from_texts(number, texts);
    if let Some(name) = corpus.chapter_name(number) {
        chapter = chapter.with_name(name);
    }

    match format {
        OutputFormat::Text => {
            println!(
                "Chapter {}: {}",
                chapter.number,
                chapter.name.as_deref().unwrap_or("-")
            );
            println!("Verses: {}\n", chapter.len());
            for verse in &chapter.verses {
                println!("  [{:>3}] {}", verse.number, verse.text);
                if verbose {
                    println!("        {}", normalizer.normalize(&verse.text));
                }
            }
        }
        OutputFormat::Json => {
            let verses: Vec<serde_json::Value> = chapter
                .verses
                .iter()
                .map(|verse| {
                    serde_json::json!({
                        "number": verse.number,
                        "text": verse.text,
                        "normalized_text": normalizer.normalize(&verse.text),
                    })
                })
                .collect();
            let output = serde_json::json!({
                "number": chapter.number,
                "name": chapter.name,
                "verses": verses,
                "normalization": normalizer.info(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("number\ttext\tnormalized_text");
            for verse in &chapter.verses {
                println!(
                    "{}\t{}\t{}",
                    verse.number,
                    verse.text,
                    normalizer.normalize(&verse.text)
                );
            }
        }
    }

    Ok(())
}

fn export_corpus(
    output: Option<&std::path::Path>,
    path: Option<&std::path::Path>,
    verbose: bool,
) -> anyhow::Result<()> {
    let corpus = load_corpus(path)?;
    let json = corpus.to_json()?;

    match output {
        Some(output) => {
            std::fs::write(output, &json)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            if verbose {
                eprintln!("Exported {} chapters to {}", corpus.len(), output.display());
            }
        }
        None => println!("{json}"),
    }

    Ok(())
}
