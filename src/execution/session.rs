//! Engine Session
//!
//! The single logical connection to one engine instance. The engine value is
//! moved onto a dedicated worker thread and only ever touched there; callers
//! hand it requests over a channel and get replies back on oneshots. The
//! channel is FIFO and the worker handles one request at a time, so at most
//! one engine call is in flight and results come back in submission order.
//!
//! Limitations: a submitted command cannot be cancelled (the engine has no
//! primitive for it), and there is no timeout, so a stalled engine call
//! stalls every request queued behind it.

use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use super::events::{EngineEvent, OutputBus, OutputSubscription};
use super::payload::{decode_payload, Decoded};
use super::rewrite::rewrite_command;
use crate::engine::{Engine, OpenOptions, TargetFile};
use crate::error::{Error, Result};
use crate::models::ExecutionResult;
use crate::terminal::output::sanitize;
use crate::terminal::prompt::DEFAULT_ADDRESS;

/// Default number of bytes shown by [`Session::hex_dump`]
pub const DEFAULT_HEX_LENGTH: usize = 256;

/// What the staged open pipeline learned about the file
#[derive(Debug, Clone, Default)]
pub struct AnalysisSummary {
    /// Functions (`aflj`)
    pub functions: Vec<Value>,
    /// Strings (`izzj`)
    pub strings: Vec<Value>,
    /// Imports (`iij`)
    pub imports: Vec<Value>,
    /// Sections (`iSj`)
    pub sections: Vec<Value>,
    /// Whether the automatic analysis pass ran
    pub analyzed: bool,
}

enum Request {
    Open {
        file: TargetFile,
        options: OpenOptions,
        reply: oneshot::Sender<Result<()>>,
    },
    Execute {
        command: String,
        dispatched: String,
        reply: oneshot::Sender<ExecutionResult>,
    },
    Address {
        reply: oneshot::Sender<String>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}

/// Decrements the in-flight counter when a submission settles or is dropped
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the engine on its own thread
struct Worker<E: Engine> {
    engine: E,
    bus: OutputBus,
    last_stderr: Arc<Mutex<String>>,
}

impl<E: Engine> Worker<E> {
    fn run(mut self, mut requests: mpsc::UnboundedReceiver<Request>) {
        while let Some(request) = requests.blocking_recv() {
            self.handle(request);
        }

        self.engine.close();
        debug!("Engine worker stopped");
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Open {
                file,
                options,
                reply,
            } => {
                let engine = &mut self.engine;
                let result = catch_unwind(AssertUnwindSafe(|| engine.open(&file, &options)))
                    .unwrap_or_else(|panic| Err(Error::EngineFault(panic_message(&*panic))));
                let _ = reply.send(result);
            }
            Request::Execute {
                command,
                dispatched,
                reply,
            } => {
                let result = self.execute(&command, &dispatched);
                let _ = reply.send(result);
            }
            Request::Address { reply } => {
                let engine = &mut self.engine;
                let address = catch_unwind(AssertUnwindSafe(|| engine.current_address()))
                    .unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());
                let _ = reply.send(address);
            }
            Request::Close { reply } => {
                self.engine.close();
                let _ = reply.send(());
            }
        }
    }

    fn execute(&mut self, command: &str, dispatched: &str) -> ExecutionResult {
        let started_at = Utc::now();
        let clock = Instant::now();
        debug!("Dispatching '{}'", dispatched);

        let engine = &mut self.engine;
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            engine
                .execute_command(dispatched)
                .map(|stdout| (stdout, engine.last_stderr()))
        }));

        let result = match outcome {
            Ok(Ok((stdout, stderr))) => {
                let stdout = sanitize(&stdout);
                let stderr = sanitize(&stderr);
                self.publish(dispatched, &stdout, &stderr);
                ExecutionResult::completed(command, dispatched, stdout, stderr)
            }
            Ok(Err(e)) => {
                error!("Engine fault on '{}': {}", dispatched, e);
                ExecutionResult::faulted(command, dispatched, e.to_string())
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                error!("Engine panicked on '{}': {}", dispatched, message);
                ExecutionResult::faulted(command, dispatched, message)
            }
        };

        if let Ok(mut slot) = self.last_stderr.lock() {
            slot.clone_from(&result.stderr);
        }

        result.timed(started_at, clock.elapsed())
    }

    fn publish(&self, dispatched: &str, stdout: &str, stderr: &str) {
        if !stderr.is_empty() {
            self.bus.publish(EngineEvent::StderrChunk {
                command: dispatched.to_string(),
                text: stderr.to_string(),
            });
        }
        if !stdout.is_empty() {
            self.bus.publish(EngineEvent::StdoutChunk {
                command: dispatched.to_string(),
                text: stdout.to_string(),
            });
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "engine panicked".to_string()
    }
}

/// Single-flight bridge between the console and one engine
#[derive(Debug)]
pub struct Session {
    requests: mpsc::UnboundedSender<Request>,
    in_flight: Arc<AtomicUsize>,
    bus: OutputBus,
    last_stderr: Arc<Mutex<String>>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::Open { file, .. } => write!(f, "Open({})", file.name),
            Request::Execute { dispatched, .. } => write!(f, "Execute({})", dispatched),
            Request::Address { .. } => write!(f, "Address"),
            Request::Close { .. } => write!(f, "Close"),
        }
    }
}

impl Session {
    /// Move `engine` onto a new worker thread and connect to it
    pub fn new<E: Engine>(engine: E) -> Result<Self> {
        let (requests, receiver) = mpsc::unbounded_channel();
        let bus = OutputBus::default();
        let last_stderr = Arc::new(Mutex::new(String::new()));

        let worker = Worker {
            engine,
            bus: bus.clone(),
            last_stderr: Arc::clone(&last_stderr),
        };
        let handle = std::thread::Builder::new()
            .name("rzterm-engine".to_string())
            .spawn(move || worker.run(receiver))?;

        Ok(Self {
            requests,
            in_flight: Arc::new(AtomicUsize::new(0)),
            bus,
            last_stderr,
            worker: Some(handle),
        })
    }

    /// Submit a user command.
    ///
    /// The command is queued immediately, so calls are executed in the order
    /// `submit` was called, whether or not the returned futures are polled in
    /// that order. Faults come back as a faulted [`ExecutionResult`]; nothing
    /// here returns an error.
    pub fn submit(&self, raw: &str) -> impl Future<Output = ExecutionResult> + Send + 'static {
        let command = raw.trim().to_string();
        let dispatched = rewrite_command(&command);
        if dispatched != command {
            info!("Injected analysis pass: '{}' -> '{}'", command, dispatched);
        }
        self.dispatch(command, dispatched)
    }

    /// Queue a command exactly as given, bypassing the rewrite rule
    fn execute_raw(&self, command: &str) -> impl Future<Output = ExecutionResult> + Send + 'static {
        self.dispatch(command.to_string(), command.to_string())
    }

    fn dispatch(
        &self,
        command: String,
        dispatched: String,
    ) -> impl Future<Output = ExecutionResult> + Send + 'static {
        let guard = InFlight::enter(&self.in_flight);
        let (reply, response) = oneshot::channel();
        let sent = self
            .requests
            .send(Request::Execute {
                command: command.clone(),
                dispatched: dispatched.clone(),
                reply,
            })
            .is_ok();

        async move {
            let _guard = guard;
            if !sent {
                return ExecutionResult::faulted(&command, &dispatched, Error::SessionClosed.to_string());
            }
            response.await.unwrap_or_else(|_| {
                ExecutionResult::faulted(&command, &dispatched, Error::WorkerGone.to_string())
            })
        }
    }

    /// Open `path` and run the staged analysis pipeline.
    ///
    /// Each stage is its own engine call with a yield in between, so the
    /// caller's runtime is never held for the whole pipeline.
    pub async fn open(&self, path: &Path, options: OpenOptions) -> Result<AnalysisSummary> {
        let file = TargetFile::from_path(path)?;
        info!("Opening {} ({} bytes)", file.name, file.size);

        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Open {
                file: file.clone(),
                options: options.clone(),
                reply,
            })
            .map_err(|_| Error::SessionClosed)?;
        response.await.map_err(|_| Error::WorkerGone)??;

        let mut summary = AnalysisSummary::default();

        if let Some(cache) = options.cache_enabled {
            tokio::task::yield_now().await;
            self.execute_raw(&format!("e io.cache={}", cache)).await;
        }

        tokio::task::yield_now().await;
        let functions = if file.size < options.auto_analyze_threshold {
            summary.analyzed = true;
            let command = format!("{};aflj", options.analysis_command());
            info!("Analyzing with '{}'", command);
            self.execute_raw(&command).await
        } else {
            info!("Skipping automatic analysis for large file");
            self.execute_raw("aflj").await
        };
        summary.functions = Self::list(&functions);

        tokio::task::yield_now().await;
        summary.strings = Self::list(&self.execute_raw("izzj").await);

        tokio::task::yield_now().await;
        summary.imports = Self::list(&self.execute_raw("iij").await);

        tokio::task::yield_now().await;
        summary.sections = Self::list(&self.execute_raw("iSj").await);

        info!(
            "Opened {}: {} functions, {} strings, {} imports, {} sections",
            file.name,
            summary.functions.len(),
            summary.strings.len(),
            summary.imports.len(),
            summary.sections.len()
        );
        Ok(summary)
    }

    fn list(result: &ExecutionResult) -> Vec<Value> {
        if result.is_fault() {
            return Vec::new();
        }
        decode_payload(&result.stdout).into_list()
    }

    /// Ask the engine for its current address.
    ///
    /// The query is queued when this is called, behind every submission made
    /// before it, so it reflects exactly their effect.
    pub fn current_address(&self) -> impl Future<Output = String> + Send + 'static {
        let (reply, response) = oneshot::channel();
        let sent = self.requests.send(Request::Address { reply }).is_ok();

        async move {
            if !sent {
                return DEFAULT_ADDRESS.to_string();
            }
            response.await.unwrap_or_else(|_| DEFAULT_ADDRESS.to_string())
        }
    }

    /// Close the engine's file; safe to call repeatedly
    pub async fn close(&self) {
        let (reply, response) = oneshot::channel();
        if self.requests.send(Request::Close { reply }).is_ok() {
            let _ = response.await;
        }
    }

    /// Close the engine and wait for the worker thread to finish
    pub async fn shutdown(mut self) {
        self.close().await;
        let worker = self.worker.take();
        drop(self);

        if let Some(handle) = worker {
            let joined = tokio::task::spawn_blocking(move || handle.join()).await;
            if !matches!(joined, Ok(Ok(()))) {
                warn!("Engine worker did not shut down cleanly");
            }
        }
    }

    /// Error-channel text of the most recent completed command
    pub fn last_stderr(&self) -> String {
        self.last_stderr
            .lock()
            .map(|stderr| stderr.clone())
            .unwrap_or_default()
    }

    /// Whether any submission is queued or running
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    /// Number of submissions queued or running
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Subscribe to sanitized engine output
    pub fn subscribe(&self) -> OutputSubscription {
        self.bus.subscribe()
    }

    /// Disassembly of the function at `address`, as JSON text
    pub async fn disassembly(&self, address: u64) -> String {
        self.submit(&format!("aa;s 0x{:x};pdfj", address)).await.stdout
    }

    /// Control-flow graph of the function at `address`
    pub async fn graph(&self, address: u64) -> Decoded {
        decode_payload(&self.submit(&format!("aa;s 0x{:x};agfj", address)).await.stdout)
    }

    /// Hex dump of `length` bytes at `address`, as JSON text
    pub async fn hex_dump(&self, address: u64, length: usize) -> String {
        self.submit(&format!("s 0x{:x};pxj {}", address, length)).await.stdout
    }
}
