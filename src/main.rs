use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::AsyncRead;

use keytip::combo::alias;
use keytip::config::{self, ConfigError};
use keytip::dispatch::sink::{self, FrameError, FrameSink, TextSink};
use keytip::session;
use keytip::source::SourceError;
use keytip::source::script::ScriptSource;
use keytip::tips::Tooltips;

#[derive(Parser)]
#[command(name = "keytip", about = "Live tooltips for keyboard shortcuts in progress")]
struct Cli {
    /// JSON bindings file; the built-in demo set is used when omitted.
    #[arg(long, global = true)]
    bindings: Option<PathBuf>,

    /// Output format for rendered tooltips.
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Log level for keytip (overridden by RUST_LOG).
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a key-event script and render tooltips for every event.
    Replay {
        /// Script file; reads stdin when omitted or "-".
        script: Option<PathBuf>,
    },
    /// Print how shortcut strings are normalized.
    Resolve {
        #[arg(required = true)]
        shortcuts: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One line per key event.
    Text,
    /// Length-delimited MessagePack frames.
    Msgpack,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("failed to open script {path}: {source}")]
    Script {
        path: String,
        source: std::io::Error,
    },
    #[error("frame writer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    keytip::logging::init(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "keytip failed");
            eprintln!("keytip: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Resolve { shortcuts } => {
            for raw in &shortcuts {
                let resolved = alias::resolve(raw);
                println!(
                    "{raw:>12} -> {} ({:?}) {:?}",
                    resolved.text, resolved.kind, resolved.keys
                );
            }
            Ok(())
        }
        Command::Replay { script } => {
            let bindings = match &cli.bindings {
                Some(path) => config::load(path)?,
                None => config::demo_bindings(),
            };
            replay(&bindings, script, cli.format).await
        }
    }
}

async fn replay(
    bindings: &[config::Binding],
    script: Option<PathBuf>,
    format: Format,
) -> Result<(), CliError> {
    let reader: Box<dyn AsyncRead + Unpin + Send> = match script {
        Some(path) if path.as_os_str() != "-" => {
            let file = tokio::fs::File::open(&path)
                .await
                .map_err(|source| CliError::Script {
                    path: path.display().to_string(),
                    source,
                })?;
            Box::new(file)
        }
        _ => Box::new(tokio::io::stdin()),
    };

    let mut tooltips = Tooltips::new();
    config::apply(bindings, &mut tooltips);

    let pump = match format {
        Format::Text => {
            tooltips.set_renderer(Box::new(TextSink::new(std::io::stdout())));
            None
        }
        Format::Msgpack => {
            let (frames, rx) = FrameSink::channel();
            tooltips.set_renderer(Box::new(frames));
            Some(tokio::spawn(sink::pump_frames(rx, tokio::io::stdout())))
        }
    };

    let mut source = ScriptSource::new(reader);
    let tooltips = session::run_source(tooltips, &mut source).await?;
    tracing::info!(
        shortcuts = tooltips.registry().len(),
        locked = tooltips.is_locked(),
        "replay finished"
    );
    // Dropping the renderer closes the frame channel.
    drop(tooltips);

    if let Some(pump) = pump {
        let frames = pump.await??;
        tracing::debug!(frames, "frames written");
    }
    Ok(())
}
