//! The `pixbatch probe` command: report format and dimensions of a file.

use clap::Args;
use pixbatch_core::pipeline::classify::classify_file;
use pixbatch_core::pipeline::probe_dimensions;
use pixbatch_core::PipelineError;
use serde_json::json;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Arguments for the `probe` command.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// File to inspect
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute the probe command.
///
/// Only the signature and the image header are read.
pub async fn execute(args: ProbeArgs) -> anyhow::Result<()> {
    let Some(kind) = classify_file(&args.input)? else {
        anyhow::bail!("{} is not a JPEG, PNG or GIF image", args.input.display());
    };
    let dims = probe_dimensions(BufReader::new(File::open(&args.input)?)).map_err(|source| {
        PipelineError::Decode {
            name: args.input.display().to_string(),
            source,
        }
    })?;

    let report = json!({
        "path": args.input,
        "format": kind.extension(),
        "mime_type": kind.mime_type(),
        "width": dims.width,
        "height": dims.height,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
