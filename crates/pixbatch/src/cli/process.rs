//! The `pixbatch process` command: run a zip archive through the batch
//! pipeline without the HTTP server.

use clap::{Args, ValueEnum};
use pixbatch_core::pipeline::validate_width;
use pixbatch_core::{Config, ImageService, LocalImageStore, OutputFormat as CoreOutputFormat};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// JSON array of locations, empty strings for skipped entries
    Locations,
    /// JSON array of entry reports
    Json,
    /// One entry report per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Locations => CoreOutputFormat::Locations,
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Zip archive to process
    #[arg(required = true)]
    pub input: PathBuf,

    /// Target width in pixels (defaults to resize.default_width)
    #[arg(short, long)]
    pub width: Option<i64>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Report entries in archive order instead of completion order
    #[arg(long)]
    pub ordered: bool,

    /// Pretty-print array formats
    #[arg(long)]
    pub pretty: bool,

    /// Directory for derivatives (overrides storage.image_dir)
    #[arg(long)]
    pub image_dir: Option<PathBuf>,
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(dir) = args.image_dir.clone() {
        config.storage.image_dir = dir;
    }

    let size = tokio::fs::metadata(&args.input).await?.len();
    let cap = config.server.max_upload_bytes() as u64;
    if size > cap {
        anyhow::bail!(
            "{} is {} bytes, over the {} MB upload cap (server.max_upload_mb)",
            args.input.display(),
            size,
            config.server.max_upload_mb
        );
    }

    let width = match args.width {
        Some(w) => validate_width(w)?,
        None => config.resize.default_width,
    };

    let store = LocalImageStore::new(config.image_dir());
    store.init().await?;
    let service = ImageService::new(&config, Arc::new(store));

    let data = tokio::fs::read(&args.input).await?;
    tracing::info!(
        "Processing {:?} ({} bytes) at width {}",
        args.input,
        data.len(),
        width
    );

    let start = Instant::now();
    let mut outcome = service.process_archive(data.into(), width).await?;
    if args.ordered {
        outcome = outcome.into_input_order();
    }
    tracing::info!(
        "{} of {} entries saved in {:.2?}",
        outcome.saved_count(),
        outcome.len(),
        start.elapsed()
    );

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = pixbatch_core::OutputWriter::new(writer, args.format.into(), args.pretty);
    writer.write_batch(&outcome)?;

    if let Some(path) = &args.output {
        tracing::info!("Output written to {:?}", path);
    }

    Ok(())
}
