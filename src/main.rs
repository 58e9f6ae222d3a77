mod commands;

use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use tsxkit::{Config, TilesetLoader, DEFAULT_CONFIG_PATH};

/// Inspect, validate and format Tiled tilesets (.tsx).
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// YAML configuration file. Defaults are used if it does not exist.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    /// Directory tileset paths are relative to.
    #[arg(long, value_name = "DIR", global = true)]
    root: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check tilesets for duplicate ids, broken frame references and malformed metadata.
    Validate {
        #[arg(required = true)]
        paths: Vec<String>,
        /// Open referenced images and compare their real size with the declared size.
        #[arg(long)]
        check_images: bool,
        /// Fail on warnings as well as errors.
        #[arg(long)]
        strict: bool,
    },
    /// Print a summary of a tileset.
    Info {
        path: String,
    },
    /// Rewrite tilesets in the layout the editor saves them in.
    Fmt {
        #[arg(required = true)]
        paths: Vec<String>,
        /// Only list files that would change.
        #[arg(long)]
        check: bool,
    },
    /// Print a tileset as YAML.
    Dump {
        path: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[cfg(feature = "profile")]
    let _profile_guard = init_profiling();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
/// Returns false if the command completed but found problems.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = Config::load(&cli.config)?;
    let mut loader = TilesetLoader::default();
    loader.set_path_prefix(cli.root);

    match cli.command {
        Command::Validate { paths, check_images, strict } => {
            config.validation.check_images |= check_images;
            Ok(commands::validate(&loader, &paths, &config.validation, strict))
        },
        Command::Info { path } => {
            commands::info(&loader, &path)?;
            Ok(true)
        },
        Command::Fmt { paths, check } => commands::fmt(&loader, &paths, check),
        Command::Dump { path } => {
            commands::dump(&loader, &path)?;
            Ok(true)
        },
    }
}

#[cfg(feature = "profile")]
fn init_profiling() -> tracing_chrome::FlushGuard {
    use tracing_subscriber::prelude::*;
    let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new().build();
    let subscriber = tracing_subscriber::registry().with(chrome_layer);
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        log::warn!("Failed to install profiler: {err}");
    }
    guard
}
