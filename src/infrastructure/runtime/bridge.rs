//! Runtime bridge - connects the sync TUI thread with the async worker
//!
//! The TUI thread never performs network I/O; it sends commands over a
//! channel and drains events once per loop iteration.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tokio::runtime::Runtime;
use tracing::error;

use crate::domain::advisory::Advisory;
use crate::infrastructure::api::ApiEndpoint;
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Re-fetch the advisory feed immediately
    Refresh,
    /// Switch to a different API endpoint
    SwitchEndpoint { index: usize },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Worker is targeting this endpoint
    Connected { endpoint: String },
    /// Advisory feed fetched and decoded
    AdvisoriesLoaded { advisories: Vec<Advisory> },
    /// Fetch or decode failure; the feed keeps its previous state
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime.
    pub fn new(endpoints: Vec<ApiEndpoint>, refresh: Duration) -> anyhow::Result<Self> {
        if endpoints.is_empty() {
            anyhow::bail!("No advisory endpoints configured");
        }

        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        thread::Builder::new()
            .name("vigil-worker".to_string())
            .spawn(move || {
                let rt = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(err) => {
                        error!(%err, "failed to create Tokio runtime");
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker unavailable: {err}"),
                        });
                        return;
                    }
                };
                rt.block_on(async {
                    if let Err(err) =
                        run_async_worker(endpoints, refresh, cmd_rx, evt_tx.clone()).await
                    {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {err:#}"),
                        });
                    }
                });
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
