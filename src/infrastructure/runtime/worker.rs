//! Async worker - runs in Tokio runtime and handles backend calls

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::infrastructure::api::DataService;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};
use crate::modules::dashboard::{AvailabilityToggler, DashboardAggregator};

/// Run the async worker loop. Each refresh and update runs as its own task.
pub async fn run_async_worker(
    service: Arc<dyn DataService>,
    page_limit: u32,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let aggregator = Arc::new(DashboardAggregator::with_page_limit(
        Arc::clone(&service),
        page_limit,
    ));
    let toggler = Arc::new(AvailabilityToggler::new(service));

    loop {
        // Process commands (non-blocking)
        loop {
            let cmd = match cmd_rx.try_recv() {
                Ok(cmd) => cmd,
                Err(std::sync::mpsc::TryRecvError::Empty) => break,
                // UI side is gone
                Err(std::sync::mpsc::TryRecvError::Disconnected) => return Ok(()),
            };

            match cmd {
                RuntimeCommand::Shutdown => return Ok(()),

                RuntimeCommand::Refresh => {
                    let aggregator = Arc::clone(&aggregator);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let outcome = aggregator.aggregate().await;
                        let _ = evt_tx.send(RuntimeEvent::RefreshFinished(outcome));
                    });
                }

                RuntimeCommand::SetAvailability(request) => {
                    let toggler = Arc::clone(&toggler);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let outcome = toggler.set_availability(request).await;
                        let _ = evt_tx.send(RuntimeEvent::AvailabilityFinished(outcome));
                    });
                }
            }
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
