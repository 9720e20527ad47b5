//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI thread never awaits. It sends commands, and the worker thread
//! answers with events that are drained on every tick.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use tokio::runtime::Runtime;

use crate::infrastructure::api::DataService;
use crate::infrastructure::runtime::worker::run_async_worker;
use crate::modules::dashboard::{
    AvailabilityOutcome, AvailabilityRequest, RefreshOutcome,
};

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Run one dashboard aggregation
    Refresh,
    /// Archive or restore one record
    SetAvailability(AvailabilityRequest),
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// An aggregation settled
    RefreshFinished(RefreshOutcome),
    /// An update call settled
    AvailabilityFinished(AvailabilityOutcome),
    /// Worker-level failure
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Create a new runtime bridge around the given data service
    pub fn new(service: Arc<dyn DataService>, page_limit: u32) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = Runtime::new()?;
        log::info!("runtime started for {}", service.endpoint_name());

        // Spawn the worker thread with its own Tokio runtime
        thread::spawn(move || {
            rt.block_on(async {
                if let Err(err) =
                    run_async_worker(service, page_limit, cmd_rx, evt_tx.clone()).await
                {
                    let _ = evt_tx.send(RuntimeEvent::Error {
                        message: format!("Worker exited: {:#}", err),
                    });
                }
            });
        });

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
