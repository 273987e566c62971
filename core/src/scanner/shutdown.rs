//! Stop tokens for scan workers.
//!
//! The coordinator owns the sending half of a bounded channel whose capacity
//! equals the worker count. Shutdown sends exactly one token per worker, so
//! every send completes without blocking, and then joins every worker task.
//! Workers share the receiving half; whichever worker takes a token exits, and
//! a worker that exits never takes a second one.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownToken(());

#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: Arc<Mutex<mpsc::Receiver<ShutdownToken>>>,
}

impl ShutdownListener {
    /// Resolves once a token is available. `None` means the coordinator is
    /// gone, which workers treat as a stop request too.
    pub async fn recv(&self) -> Option<ShutdownToken> {
        self.rx.lock().await.recv().await
    }
}

pub struct ShutdownCoordinator {
    tx: mpsc::Sender<ShutdownToken>,
    handles: Vec<JoinHandle<()>>,
}

impl ShutdownCoordinator {
    pub fn new(workers: usize) -> (Self, ShutdownListener) {
        let (tx, rx) = mpsc::channel(workers.max(1));
        let coordinator = Self {
            tx,
            handles: Vec::with_capacity(workers),
        };
        let listener = ShutdownListener {
            rx: Arc::new(Mutex::new(rx)),
        };
        (coordinator, listener)
    }

    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.handles.push(handle);
    }

    /// Sends one token per tracked worker, then waits for all of them.
    /// Returns how many workers exited without panicking.
    pub async fn shutdown(self) -> usize {
        let workers = self.handles.len();
        info!(workers, "stopping scan workers");

        for _ in 0..workers {
            // Only fails once every listener is dropped, i.e. all workers are done.
            if self.tx.send(ShutdownToken(())).await.is_err() {
                debug!("all workers already exited");
                break;
            }
        }

        let mut joined = 0;
        for (id, handle) in self.handles.into_iter().enumerate() {
            match handle.await {
                Ok(()) => joined += 1,
                Err(e) => error!(worker = id, "worker task failed: {e}"),
            }
        }

        info!(joined, workers, "all scan workers stopped");
        joined
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
