//! pixbatch - upload images or zip archives and get resized JPEGs back.
//!
//! Archive members are accepted by their leading bytes (JPEG, PNG, GIF),
//! never by file name. Each accepted member is resized to the requested
//! width and stored under a fresh name.
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP service
//! pixbatch serve --bind 127.0.0.1:3000
//!
//! # Resize every image in an archive to 64px wide
//! pixbatch process photos.zip --width 64 --format jsonl
//!
//! # Resize or inspect one file
//! pixbatch resize cat.png --width 32
//! pixbatch probe cat.png
//!
//! # View configuration
//! pixbatch config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

/// pixbatch - content-sniffing image batch resizer.
#[derive(Parser, Debug)]
#[command(name = "pixbatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP upload service
    Serve(cli::serve::ServeArgs),

    /// Resize every image in a zip archive
    Process(cli::process::ProcessArgs),

    /// Resize a single image file
    Resize(cli::resize::ResizeArgs),

    /// Print the format and dimensions of an image file
    Probe(cli::probe::ProbeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match pixbatch_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `pixbatch config path`."
            );
            pixbatch_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("pixbatch v{}", pixbatch_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Process(args) => cli::process::execute(args, config).await,
        Commands::Resize(args) => cli::resize::execute(args, config).await,
        Commands::Probe(args) => cli::probe::execute(args).await,
        Commands::Config(args) => cli::config::execute(args, config).await,
    }
}
