//! rzterm - interactive console for the rizin binary analysis engine
//!
//! Opens one binary, then reads raw keystrokes from the terminal, edits the
//! command line locally and hands each submitted command to the engine
//! session. Results are printed strictly in the order commands were entered.

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{FuturesOrdered, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rzterm::config::LoggingConfig;
use rzterm::terminal::is_quit_command;
use rzterm::{Config, ConfigLoader, Console, HistoryLog, ProcessEngine, Session, TargetFile};

/// Environment variable holding the log filter
const LOG_ENV: &str = "RZTERM_LOG";

#[derive(Parser, Debug)]
#[command(name = "rzterm", version, about = "Interactive console for the rizin binary analysis engine")]
struct Args {
    /// Binary to analyze
    file: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Analysis depth on open (1 = aa, 2 = aaa, 3 = aaaa)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    depth: Option<u8>,

    /// Enable the engine's io.cache
    #[arg(long)]
    cache: bool,

    /// Engine program to run
    #[arg(long)]
    engine: Option<String>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(depth) = self.depth {
            config.engine.analysis_depth = depth;
        }
        if self.cache {
            config.engine.cache_enabled = Some(true);
        }
        if let Some(program) = &self.engine {
            config.engine.program = program.clone();
        }
    }
}

/// Raw mode for the lifetime of the guard
struct RawModeGuard;

impl RawModeGuard {
    fn new() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Log to a file; stdout is the console surface
fn init_logging(logging: &LoggingConfig, debug: bool) -> Result<PathBuf> {
    let path = logging.resolved_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let level = if debug {
        "debug".to_string()
    } else {
        logging.level.clone()
    };
    let env_filter = env::var(LOG_ENV).unwrap_or(level);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from(env_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();

    Ok(path)
}

fn open_history(config: &Config) -> HistoryLog {
    let history = &config.history;
    match history.resolved_file() {
        Some(path) => HistoryLog::with_file(path, history.max_entries, history.persisted_entries)
            .unwrap_or_else(|e| {
                warn!("{}; starting with empty history", e);
                HistoryLog::new(history.max_entries)
            }),
        None => HistoryLog::new(history.max_entries),
    }
}

/// Forward raw stdin reads to the event loop
fn spawn_stdin_reader() -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        let mut stdin = io::stdin();
        let mut buf = [0u8; 1024];
        loop {
            match stdin.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.blocking_send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
        debug!("Input reader stopped");
    });
    rx
}

/// Key input and results, until a quit command or end of input.
///
/// Commands already queued when input stops are still rendered.
async fn run<W: Write>(
    session: &Session,
    console: &mut Console<W>,
    mut input: mpsc::Receiver<Vec<u8>>,
) -> Result<()> {
    let mut pending = FuturesOrdered::new();

    'input: loop {
        tokio::select! {
            bytes = input.recv() => {
                let Some(bytes) = bytes else {
                    info!("Input closed");
                    break 'input;
                };

                for command in console.handle_input(&bytes)? {
                    if is_quit_command(&command) {
                        break 'input;
                    }
                    // Both are queued now, so the address reflects this command.
                    let result = session.submit(&command);
                    let address = session.current_address();
                    pending.push_back(async move { (result.await, address.await) });
                }
            }
            Some((result, address)) = pending.next(), if !pending.is_empty() => {
                console.render_result(&result)?;
                console.render_prompt(&address)?;
            }
        }
    }

    if !pending.is_empty() {
        debug!("Rendering {} queued results", pending.len());
    }
    while let Some((result, address)) = pending.next().await {
        console.render_result(&result)?;
        console.render_prompt(&address)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::load(args.config.as_deref())?;
    args.apply(&mut config);
    ConfigLoader::validate_config(&config)?;

    let log_path = init_logging(&config.logging, args.debug)?;
    info!("Starting rzterm v{}", rzterm::VERSION);
    debug!("Logging to {}", log_path.display());

    let engine = ProcessEngine::new(config.engine.program.clone())
        .with_args(config.engine.extra_args.clone());
    let version = engine.check_available()?;
    info!("Engine: {}", version);

    let target = TargetFile::from_path(&args.file)?;
    let session = Session::new(engine)?;
    let summary = session
        .open(&target.path, config.engine.open_options())
        .await?;

    let history = open_history(&config);
    let mut console = Console::new(io::stdout(), history);

    let outcome = {
        let _raw = RawModeGuard::new().context("enabling raw mode")?;
        if config.display.banner {
            console.render_banner(&target, &summary)?;
        }
        let address = session.current_address().await;
        console.render_prompt(&address)?;

        run(&session, &mut console, spawn_stdin_reader()).await
    };

    println!();
    session.shutdown().await;
    info!("rzterm shutdown complete");
    outcome
}
