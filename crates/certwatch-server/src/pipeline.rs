use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::fetch::{CertFetcher, ScanOutcome};

/// One hostname/port pair queued for a fetch.
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub hostname: String,
    pub port: u16,
}

/// Bounded-concurrency fan-out/fan-in over a stream of scan targets.
///
/// `run` spawns exactly `workers` tasks that share the input channel; each
/// worker loops pulling the next target, fetching, and forwarding the outcome
/// to a single output channel. The bound is structural: a worker has at most
/// one fetch in flight, so no more than `workers` handshakes run at once.
/// Every worker owns a clone of the output sender, so the output channel
/// closes exactly when the last worker has drained the input and emitted its
/// final outcome; consumers iterate to exhaustion as the completion signal.
pub struct ScanPipeline {
    fetcher: Arc<dyn CertFetcher>,
    workers: usize,
}

impl ScanPipeline {
    pub fn new(fetcher: Arc<dyn CertFetcher>, workers: usize) -> Self {
        Self {
            fetcher,
            workers: workers.max(1),
        }
    }

    /// Starts the worker pool over `targets` and returns the outcome stream.
    ///
    /// Outcomes arrive in no particular order. Raising `cancel` stops workers
    /// from pulling new targets at their next check; fetches already in
    /// flight run to their own timeout and their outcomes are still emitted.
    pub fn run(
        &self,
        targets: mpsc::Receiver<ScanTarget>,
        cancel: Arc<AtomicBool>,
    ) -> mpsc::Receiver<ScanOutcome> {
        let (out_tx, out_rx) = mpsc::channel(self.workers);
        let targets = Arc::new(Mutex::new(targets));

        for _ in 0..self.workers {
            let targets = Arc::clone(&targets);
            let out_tx = out_tx.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let cancel = Arc::clone(&cancel);

            tokio::spawn(async move {
                loop {
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    let next = { targets.lock().await.recv().await };
                    let Some(target) = next else {
                        break;
                    };
                    let outcome = fetcher.fetch(&target.hostname, target.port).await;
                    if out_tx.send(outcome).await.is_err() {
                        // Consumer dropped the output stream.
                        break;
                    }
                }
            });
        }

        out_rx
    }
}
