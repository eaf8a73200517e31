use clap::Parser;
use tracing_subscriber::EnvFilter;

use recital_check::{cli, web};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("recital_check=debug,info")
    } else {
        EnvFilter::new("recital_check=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Check(args) => {
            cli::check::run(args, cli.format, cli.normalizer, cli.verbose)?;
        }
        cli::Commands::Compare(args) => {
            cli::compare::run(args, cli.format, cli.normalizer, cli.verbose)?;
        }
        cli::Commands::Corpus(args) => {
            cli::corpus::run(args, cli.format, cli.normalizer, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args, cli.normalizer)?;
        }
    }

    Ok(())
}
