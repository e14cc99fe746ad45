//! Replay a frame message transcript and print what the host observed.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use frameport_app::EmbedOptions;
use frameport_core::{Ambient, NoAttributes, config};
use frameport_harness::PAGE_LOCATION;
use frameport_replay::{Record, Replay, ReplayError, parse_transcript};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Replay recorded notebook frame messages through the embedding runtime.
///
/// Prints one JSON object per line for every message posted to the frame
/// and every host callback that fired.
#[derive(Parser, Debug)]
#[command(name = "frameport-replay")]
#[command(version)]
struct Args {
    /// Notebook URL loaded into the frame
    #[arg(long)]
    src: Option<String>,

    /// Location of the host page, used to resolve the notebook origin
    #[arg(long, default_value = PAGE_LOCATION)]
    page: String,

    /// File with initial notebook content to inject on ready
    #[arg(long)]
    content: Option<PathBuf>,

    /// Base URL handed to the notebook with its initial content
    #[arg(long)]
    base_url: Option<String>,

    /// Ignore resize requests from the frame
    #[arg(long)]
    no_autosize: bool,

    /// Cancel page unloads while there are unsaved changes
    #[arg(long)]
    guard: bool,

    /// Acknowledge every save request as successful
    #[arg(long)]
    confirm_saves: bool,

    /// JSON-lines transcript of frame messages
    transcript: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "replay failed");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: Args) -> Result<(), ReplayError> {
    let mut options = EmbedOptions::new()
        .with_auto_resize(!args.no_autosize)
        .with_navigation_guard(args.guard);
    if let Some(src) = args.src {
        options = options.with_src(src);
    }
    if let Some(base_url) = args.base_url {
        options = options.with_base_url(base_url);
    }
    if let Some(path) = &args.content {
        options = options.with_content(read(path)?);
    }
    let config = config::resolve(&options, &NoAttributes, &Ambient::default());

    let entries = parse_transcript(&read(&args.transcript)?)?;
    info!(entries = entries.len(), src = %config.src, "replaying transcript");

    let mut replay = Replay::start(config, &args.page, args.confirm_saves)?;
    let records = replay.run(entries).await;
    write_records(&records)
}

fn read(path: &Path) -> Result<String, ReplayError> {
    fs::read_to_string(path).map_err(|source| ReplayError::Read { path: path.to_path_buf(), source })
}

fn write_records(records: &[Record]) -> Result<(), ReplayError> {
    let mut out = io::stdout().lock();
    for record in records {
        serde_json::to_writer(&mut out, record).map_err(io::Error::from)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
