//! Async worker - owns all advisory feed fetches

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::infrastructure::api::{AdvisorySource, ApiEndpoint, HttpAdvisorySource};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// Run the async worker loop: fetch the feed immediately, then on the
/// refresh interval and on explicit Refresh commands.
pub async fn run_async_worker(
    endpoints: Vec<ApiEndpoint>,
    refresh: Duration,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    if endpoints.is_empty() {
        anyhow::bail!("No endpoints configured");
    }

    let mut endpoint_index = 0usize;
    let mut source = build_source(&endpoints, endpoint_index, &evt_tx)?;

    // Commands are polled between short ticks; the std channel cannot be
    // awaited directly from here.
    let mut poll = interval(Duration::from_millis(200));
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut next_refresh = Instant::now();

    loop {
        poll.tick().await;

        let mut fetch_now = false;
        loop {
            match cmd_rx.try_recv() {
                Ok(RuntimeCommand::Shutdown) => {
                    info!("worker shutdown requested");
                    return Ok(());
                }
                Ok(RuntimeCommand::Refresh) => fetch_now = true,
                Ok(RuntimeCommand::SwitchEndpoint { index }) => {
                    if index < endpoints.len() && index != endpoint_index {
                        endpoint_index = index;
                        source = build_source(&endpoints, endpoint_index, &evt_tx)?;
                        fetch_now = true;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("command channel closed; worker stopping");
                    return Ok(());
                }
            }
        }

        if fetch_now || Instant::now() >= next_refresh {
            fetch_and_publish(source.as_ref(), &evt_tx).await;
            next_refresh = Instant::now() + refresh;
        }
    }
}

fn build_source(
    endpoints: &[ApiEndpoint],
    index: usize,
    evt_tx: &Sender<RuntimeEvent>,
) -> Result<Box<dyn AdvisorySource>> {
    let endpoint = endpoints[index].clone();
    let endpoint_label = endpoint.display();
    let source = HttpAdvisorySource::new(endpoint)?;
    info!(endpoint = %endpoint_label, "advisory source ready");
    let _ = evt_tx.send(RuntimeEvent::Connected {
        endpoint: endpoint_label,
    });
    Ok(Box::new(source))
}

async fn fetch_and_publish(source: &dyn AdvisorySource, evt_tx: &Sender<RuntimeEvent>) {
    match source.fetch_advisories().await {
        Ok(advisories) => {
            info!(
                endpoint = %source.endpoint(),
                count = advisories.len(),
                "fetched advisory feed"
            );
            if evt_tx
                .send(RuntimeEvent::AdvisoriesLoaded { advisories })
                .is_err()
            {
                warn!("event receiver dropped");
            }
        }
        Err(err) => {
            warn!(endpoint = %source.endpoint(), error = %err, "advisory fetch failed");
            let _ = evt_tx.send(RuntimeEvent::Error {
                message: format!("Fetch failed: {err}"),
            });
        }
    }
}
