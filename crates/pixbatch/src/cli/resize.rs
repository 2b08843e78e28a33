//! The `pixbatch resize` command for a single local image.

use bytes::Bytes;
use clap::Args;
use pixbatch_core::pipeline::{is_image, sized_location, validate_width};
use pixbatch_core::{Config, Resizer};
use std::path::PathBuf;

/// Arguments for the `resize` command.
#[derive(Args, Debug)]
pub struct ResizeArgs {
    /// Image file to resize
    #[arg(required = true)]
    pub input: PathBuf,

    /// Target width in pixels
    #[arg(short, long)]
    pub width: i64,

    /// Output file (defaults to `<width>x<name>` next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the resize command.
pub async fn execute(args: ResizeArgs, config: Config) -> anyhow::Result<()> {
    let width = validate_width(args.width)?;
    let data = tokio::fs::read(&args.input).await?;
    if !is_image(&data) {
        anyhow::bail!("{} is not a JPEG, PNG or GIF image", args.input.display());
    }

    let name = args.input.to_string_lossy().into_owned();
    let resized = Resizer::new(&config)
        .resize_blocking(&name, Bytes::from(data), width)
        .await?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(sized_location(&name, width)));
    tokio::fs::write(&output, &resized).await?;

    tracing::info!("Wrote {} bytes to {:?}", resized.len(), output);
    println!("{}", output.display());
    Ok(())
}
