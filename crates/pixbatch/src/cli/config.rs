//! The `pixbatch config` command, plus the overrides `serve` shares with it.

use clap::{Args, Subcommand};
use pixbatch_core::Config;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Command-line and environment overrides applied on top of the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Socket address to listen on (overrides server.bind_addr)
    #[arg(short, long, env = "PIXBATCH_BIND")]
    pub bind: Option<String>,

    /// Directory for uploads and derivatives (overrides storage.image_dir)
    #[arg(long, env = "PIXBATCH_IMAGE_DIR")]
    pub image_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Apply the overrides and re-validate the result.
    pub fn apply(self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(bind) = self.bind {
            config.server.bind_addr = bind;
        }
        if let Some(dir) = self.image_dir {
            config.storage.image_dir = dir;
        }
        config.validate()?;
        Ok(())
    }
}

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration, overrides included
    Show {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// Show config file path
    Path,

    /// Write a validated config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// Validate a config file without starting anything
    Check {
        /// File to check (defaults to the standard location)
        file: Option<PathBuf>,
    },
}

/// Execute the config command against the already loaded `config`.
pub async fn execute(args: ConfigArgs, mut config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { overrides } => {
            overrides.apply(&mut config)?;
            println!("{}", config.to_toml()?);
            print!("{}", effective_summary(&config, &Config::default_path()));
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force, overrides } => {
            let path = Config::default_path();
            write_config(&path, overrides, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::Check { file } => {
            let path = file.unwrap_or_else(Config::default_path);
            let checked = Config::load_from(&path)?;
            println!("{}: ok", path.display());
            print!("{}", effective_summary(&checked, &path));
        }
    }

    Ok(())
}

/// Derived values that are not visible in the TOML itself.
fn effective_summary(config: &Config, path: &Path) -> String {
    let mut out = String::new();
    let source = if path.exists() { "" } else { " (not present, defaults)" };
    let _ = writeln!(out, "# config file: {}{}", path.display(), source);
    let _ = writeln!(out, "# image directory: {}", config.image_dir().display());
    let _ = writeln!(
        out,
        "# request body cap: {} bytes",
        config.server.max_upload_bytes()
    );
    let _ = writeln!(
        out,
        "# archive entry cap: {} bytes",
        config.limits.max_entry_bytes()
    );
    let _ = writeln!(
        out,
        "# widths: default {}, presets {:?}, max {}",
        config.resize.default_width,
        config.resize.preset_widths,
        config.limits.max_image_dimension
    );
    out
}

/// Write defaults plus `overrides` to `path`, refusing to clobber unless
/// `force` is set.
fn write_config(path: &Path, overrides: ConfigOverrides, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let mut config = Config::default();
    overrides.apply(&mut config)?;
    let toml = config.to_toml()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml)?;
    Ok(())
}
