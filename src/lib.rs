//! hf-subdir: download one directory of a Hugging Face repository.
//!
//! Given a web URL such as
//! `https://huggingface.co/<namespace>/<repo>/tree/<branch>/<directory>`,
//! hf-subdir resolves the repository and directory, plans a local
//! destination, and fetches only the files under that directory.
//!
//! # Modules
//!
//! - [`hf`]: URL resolution, inclusion patterns, fetch planning and the Hub backend
//! - [`error`]: Error types for hf-subdir operations

pub mod error;
pub mod hf;

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

pub use error::HfSubdirError;

use hf::fetch::{self, DownloadRequest, FetchOptions, SnapshotDownload};
use hf::hub::HubSnapshot;

const EXAMPLE_URL: &str = "https://huggingface.co/username/repo-name/tree/main/models";

/// The hf-subdir CLI application.
#[derive(Parser)]
#[command(name = "hf-subdir")]
#[command(version, author, about)]
#[command(
    after_help = "Example: hf-subdir https://huggingface.co/runwayml/stable-diffusion-v1-5/tree/main/vae"
)]
struct Cli {
    /// Hugging Face URL (e.g. 'https://huggingface.co/username/repo-name/tree/main/directory').
    url: String,

    /// Local directory name to save files into (default: derived from the URL).
    #[arg(long)]
    local_dir: Option<String>,

    /// Base directory the local directory is created in (default: current directory).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Hugging Face API token for private repositories.
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Maximum number of concurrent file downloads.
    #[arg(
        long,
        default_value_t = fetch::DEFAULT_MAX_WORKERS,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_workers: usize,

    /// Branch, tag or commit to download from.
    #[arg(long, default_value = fetch::DEFAULT_REVISION)]
    revision: String,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Run the hf-subdir CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), HfSubdirError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = std::io::stdout();
    run_with(cli, &HubSnapshot, &mut stdout.lock())
}

/// Execute a parsed command line against `downloader`, writing the user
/// facing lines to `out`.
///
/// URL and missing-directory problems are reported with the usage text and
/// do not count as failures; transfer errors are returned.
fn run_with<D, W>(cli: Cli, downloader: &D, out: &mut W) -> Result<(), HfSubdirError>
where
    D: SnapshotDownload + ?Sized,
    W: Write,
{
    let target = match hf::resolve::parse_hf_url(&cli.url) {
        Ok(target) => target,
        Err(err) => {
            writeln!(out, "Error: {}", err)?;
            write_help(out)?;
            return Ok(());
        }
    };

    let options = FetchOptions {
        local_dir: cli.local_dir,
        output_dir: cli.output_dir,
        token: cli.token,
        max_workers: cli.max_workers,
        revision: cli.revision,
    };

    let request = match DownloadRequest::new(&target, options) {
        Ok(request) => request,
        Err(HfSubdirError::MissingDirectory { .. }) => {
            writeln!(out, "Error: Please specify a directory in the URL")?;
            writeln!(out, "Example: {}", EXAMPLE_URL)?;
            write_help(out)?;
            return Ok(());
        }
        Err(other) => return Err(other),
    };

    writeln!(out, "Repository: {}", request.repo_id)?;
    writeln!(out, "Directory: {}", request.directory)?;
    writeln!(
        out,
        "Downloading from {}/{}/ to {}",
        request.repo_id,
        request.directory,
        request.destination.display()
    )?;

    match fetch::download_directory(request, downloader) {
        Ok(path) => {
            writeln!(out, "Download completed! Files saved to: {}", path.display())?;
            Ok(())
        }
        Err(err) => {
            writeln!(out, "Error downloading files: {}", err)?;
            Err(err)
        }
    }
}

fn write_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", Cli::command().render_help())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
