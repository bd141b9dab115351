use anyhow::Result;
use certwatch_common::policy::ExpiryPolicy;
use certwatch_common::window::NotifyWindow;
use certwatch_notify::notice::expiry_notice;
use certwatch_notify::Notifier;
use certwatch_registry::HostRegistry;
use chrono::Local;
use std::sync::Arc;
use tokio::time::{sleep, Duration};

/// Fine notify loop: every tick, check the daily window; inside it, sweep all
/// hosts and notify owners of every near-expiry certificate.
pub struct ExpiryEvaluator {
    registry: Arc<dyn HostRegistry>,
    notifier: Arc<dyn Notifier>,
    policy: ExpiryPolicy,
    window: NotifyWindow,
    tick_secs: u64,
}

impl ExpiryEvaluator {
    pub fn new(
        registry: Arc<dyn HostRegistry>,
        notifier: Arc<dyn Notifier>,
        policy: ExpiryPolicy,
        window: NotifyWindow,
        tick_secs: u64,
    ) -> Self {
        Self {
            registry,
            notifier,
            policy,
            window,
            tick_secs,
        }
    }

    /// Runs window checks forever. Never returns; a failed pass is logged and
    /// the next tick retries.
    ///
    /// Passes are not memoized across ticks: while the window is open, a
    /// still-expiring certificate is re-notified on every tick until the
    /// window closes.
    pub async fn run(&self) {
        tracing::info!(
            tick_secs = self.tick_secs,
            window_start_hour = self.window.start_hour,
            window_hours = self.window.width_hours,
            "expiry evaluator started"
        );
        loop {
            sleep(Duration::from_secs(self.tick_secs)).await;
            if !self.window.contains(Local::now().naive_local()) {
                continue;
            }
            match self.run_pass().await {
                Ok(sent) => tracing::info!(notifications = sent, "notification pass complete"),
                Err(e) => tracing::error!(error = %e, "notification pass failed"),
            }
        }
    }

    /// One evaluation pass over every active host and every stored fact.
    ///
    /// Returns the number of notifications delivered. Delivery failures are
    /// logged per host and do not stop the sweep; a registry backend error
    /// aborts the pass.
    pub async fn run_pass(&self) -> Result<usize> {
        let hosts = self.registry.list_active_hosts().await?;
        let mut sent = 0usize;
        for host in &hosts {
            for fact in &host.certs {
                if !self.policy.should_warn(fact) {
                    continue;
                }
                let notice = expiry_notice(&host.hostname, fact);
                match self
                    .notifier
                    .notify(&host.users, &notice.title, &notice.body, &notice.link)
                    .await
                {
                    Ok(()) => {
                        sent += 1;
                        tracing::info!(
                            host = %host.hostname,
                            common_name = %fact.common_name,
                            expire_hours = fact.expire_hours,
                            is_ca = fact.is_ca,
                            "expiry notification sent"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            host = %host.hostname,
                            common_name = %fact.common_name,
                            error = %e,
                            "notification delivery failed"
                        );
                    }
                }
            }
        }
        Ok(sent)
    }
}
