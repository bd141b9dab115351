use anyhow::Result;
use certwatch_registry::error::RegistryError;
use certwatch_registry::HostRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use crate::pipeline::{ScanPipeline, ScanTarget};

/// Coarse refresh loop: scan every active host, write facts back, sleep.
pub struct ScanScheduler {
    registry: Arc<dyn HostRegistry>,
    pipeline: ScanPipeline,
    interval_secs: u64,
}

impl ScanScheduler {
    pub fn new(registry: Arc<dyn HostRegistry>, pipeline: ScanPipeline, interval_secs: u64) -> Self {
        Self {
            registry,
            pipeline,
            interval_secs,
        }
    }

    /// Runs scan cycles forever. Never returns; a failed cycle is logged and
    /// the next cycle retries naturally.
    pub async fn run(&self) {
        tracing::info!(interval_secs = self.interval_secs, "scan scheduler started");
        loop {
            match self.run_cycle().await {
                Ok(scanned) => tracing::info!(hosts = scanned, "scan cycle complete"),
                Err(e) => tracing::error!(error = %e, "scan cycle failed"),
            }
            sleep(Duration::from_secs(self.interval_secs)).await;
        }
    }

    /// One full cycle: list, scan through the pipeline, write back.
    ///
    /// Returns the number of hosts whose facts were refreshed. Per-host fetch
    /// failures and hosts deleted mid-cycle are skipped; a registry backend
    /// error aborts the rest of the cycle.
    pub async fn run_cycle(&self) -> Result<usize> {
        let hosts = self.registry.list_active_hosts().await?;
        if hosts.is_empty() {
            return Ok(0);
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let (target_tx, target_rx) = mpsc::channel(hosts.len());
        let producer_cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            for host in hosts {
                if producer_cancel.load(Ordering::Relaxed) {
                    break;
                }
                let target = ScanTarget {
                    hostname: host.hostname,
                    port: host.port,
                };
                if target_tx.send(target).await.is_err() {
                    break;
                }
            }
        });

        let mut outcomes = self.pipeline.run(target_rx, cancel);
        let mut refreshed = 0usize;
        while let Some(outcome) = outcomes.recv().await {
            if let Some(err) = &outcome.error {
                tracing::warn!(host = %outcome.hostname, error = %err, "certificate fetch failed");
                continue;
            }
            match self
                .registry
                .update_host_certs(&outcome.hostname, outcome.certs)
                .await
            {
                Ok(()) => {
                    refreshed += 1;
                    tracing::debug!(host = %outcome.hostname, "certificate facts refreshed");
                }
                Err(RegistryError::HostNotFound(host)) => {
                    tracing::warn!(host = %host, "host vanished before write-back, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(refreshed)
    }
}
