//! droidcfg CLI tool.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "droidcfg")]
#[command(about = "Android build descriptor loader and validator", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by commands that load a descriptor.
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Path to the build descriptor
    #[arg(long, short, env = "DROIDCFG_FILE", default_value = droidcfg_config::DEFAULT_DESCRIPTOR_PATH)]
    pub file: PathBuf,

    /// Java properties file with project metadata (e.g. android/local.properties)
    #[arg(long, env = "DROIDCFG_PROPERTIES")]
    pub properties: Option<PathBuf>,

    /// Signing registry file
    #[arg(long, env = "DROIDCFG_SIGNING")]
    pub signing: Option<PathBuf>,

    /// Flutter build name, e.g. 1.2.3+4
    #[arg(long)]
    pub build_name: Option<String>,

    /// Resolve references without Flutter toolchain defaults
    #[arg(long)]
    pub no_flutter_defaults: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a build descriptor
    Validate {
        #[command(flatten)]
        load: LoadArgs,

        /// Also check plugin order against the built-in catalog
        #[arg(long)]
        plugins: bool,
    },
    /// Print the resolved descriptor
    Show {
        #[command(flatten)]
        load: LoadArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Show only this build type, with its suffixes applied
        #[arg(long)]
        variant: Option<String>,
    },
    /// Print a descriptor in canonical KDL form, keeping comments
    Fmt {
        /// Path to the build descriptor
        #[arg(default_value = droidcfg_config::DEFAULT_DESCRIPTOR_PATH)]
        path: PathBuf,

        /// Rewrite the file in place
        #[arg(long)]
        write: bool,

        /// Exit with an error if the file is not canonical
        #[arg(long, conflicts_with = "write")]
        check: bool,
    },
    /// Resolve a single metadata reference
    Resolve {
        /// Reference name, e.g. flutter.versionCode
        name: String,

        #[command(flatten)]
        load: LoadArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { load, plugins } => {
            commands::validate(&load, plugins)?;
        }
        Commands::Show {
            load,
            json,
            variant,
        } => {
            commands::show::show(&load, json, variant.as_deref())?;
        }
        Commands::Fmt { path, write, check } => {
            commands::fmt::fmt(&path, write, check)?;
        }
        Commands::Resolve { name, load } => {
            commands::resolve(&name, &load)?;
        }
    }

    Ok(())
}
