//! Tonecap CLI - tone-styled image captions with relevant hashtags.
//!
//! Tonecap asks a vision model for three candidate captions and rewrites
//! them in a chosen tone, adding emoji or keyword-matched hashtags.
//!
//! # Usage
//!
//! ```bash
//! # Guided mode: prompts for an image and a tone
//! tonecap
//!
//! # Caption a single image
//! tonecap caption beach.jpg --tone promotional
//!
//! # Run the HTTP backend
//! tonecap serve --port 8000
//!
//! # View configuration
//! tonecap config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

#[cfg(test)]
mod testing;

/// Tonecap - tone-styled image captions with relevant hashtags.
#[derive(Parser, Debug)]
#[command(name = "tonecap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(flatten)]
    model: cli::ModelArgs,

    /// Omit to start the guided interactive flow
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Caption an image in the chosen tone
    Caption(cli::caption::CaptionArgs),

    /// Run the HTTP caption backend
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match tonecap_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `tonecap config path`."
            );
            tonecap_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Tonecap v{}", tonecap_core::VERSION);

    let overrides = cli.model.into();
    match cli.command {
        None => cli::interactive::run(config, overrides).await,
        Some(Commands::Caption(args)) => cli::caption::execute(config, overrides, args).await,
        Some(Commands::Serve(args)) => cli::serve::execute(config, overrides, args).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
    }
}
