//! Periodic self-ping that keeps an idling host from suspending the process.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub const KEEPALIVE_PERIOD: Duration = Duration::from_secs(14 * 60);

/// Outcome of one ping, mostly for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    Alive,
    Status(u16),
    Failed(String),
}

pub async fn ping_once(client: &reqwest::Client, url: &str) -> PingOutcome {
    match client.get(url).send().await {
        Ok(resp) if resp.status().as_u16() == 200 => {
            info!(target: "keepalive", "server is alive");
            PingOutcome::Alive
        }
        Ok(resp) => {
            let status = resp.status().as_u16();
            warn!(target: "keepalive", status, "server responded with unexpected status");
            PingOutcome::Status(status)
        }
        Err(e) => {
            error!(target: "keepalive", error = %e, "error checking server status");
            PingOutcome::Failed(e.to_string())
        }
    }
}

/// Ping `url` every `period` until `shutdown` is cancelled. The first ping
/// happens one full period after start.
pub fn spawn_keepalive(url: String, period: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // `interval` fires immediately; skip that tick.
        ticker.tick().await;

        info!(target: "keepalive", url = %url, period_secs = period.as_secs(), "keepalive started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    ping_once(&client, &url).await;
                }
            }
        }
        info!(target: "keepalive", "keepalive stopped");
    })
}
