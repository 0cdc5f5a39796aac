use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::MIN_HEALTH_INTERVAL;
use crate::service::{HealthReport, InferenceClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Offline,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Checking => "checking",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Offline => "offline",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<HealthReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
    pub probes: u64,
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Checking,
            report: None,
            checked_at: None,
            probes: 0,
        }
    }
}

/// Probes the service once. Any failure, HTTP or network, means offline.
pub fn probe_once<C: InferenceClient + ?Sized>(
    client: &C,
) -> (ConnectionStatus, Option<HealthReport>) {
    match client.health() {
        Ok(report) => (ConnectionStatus::Connected, Some(report)),
        Err(err) => {
            debug!(error = %format!("{:#}", err), "health probe failed");
            (ConnectionStatus::Offline, None)
        }
    }
}

/// Background health probe owned by whoever displays the status. Probes once
/// on start and then every `interval` (at least [`MIN_HEALTH_INTERVAL`]);
/// stopping or dropping the monitor ends the thread and waits for it.
pub struct HealthMonitor {
    state: Arc<RwLock<HealthSnapshot>>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl HealthMonitor {
    pub fn start<C>(client: Arc<C>, interval: Duration) -> Result<Self>
    where
        C: InferenceClient + 'static,
    {
        let interval = interval.max(MIN_HEALTH_INTERVAL);
        let state = Arc::new(RwLock::new(HealthSnapshot::default()));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let shared = Arc::clone(&state);

        let handle = thread::Builder::new()
            .name("health-probe".to_string())
            .spawn(move || loop {
                let (status, report) = probe_once(client.as_ref());
                {
                    let mut snapshot = shared.write();
                    if snapshot.status != status {
                        info!(%status, "service connectivity changed");
                    }
                    snapshot.status = status;
                    snapshot.report = report;
                    snapshot.checked_at = Some(Utc::now());
                    snapshot.probes += 1;
                }
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .context("failed to spawn health probe thread")?;

        debug!(interval_ms = interval.as_millis() as u64, "health monitor started");
        Ok(Self {
            state,
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state.read().status
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        self.state.read().clone()
    }

    /// Cancels the probe loop and joins the thread. Returns the final state.
    pub fn stop(mut self) -> HealthSnapshot {
        self.shutdown();
        self.snapshot()
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                debug!("health probe thread panicked");
            }
            debug!("health monitor stopped");
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
