//! The `pixbatch serve` command.

use clap::Args;
use pixbatch_core::Config;

use super::config::ConfigOverrides;
use crate::server;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.overrides.apply(&mut config)?;
    server::serve(&config).await
}
