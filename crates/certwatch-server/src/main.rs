use anyhow::Result;
use certwatch_common::policy::ExpiryPolicy;
use certwatch_common::window::NotifyWindow;
use certwatch_notify::gateway::MessageGateway;
use certwatch_notify::Notifier;
use certwatch_registry::memory::MemoryRegistry;
use certwatch_registry::HostRegistry;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use certwatch_server::config::ServerConfig;
use certwatch_server::evaluator::ExpiryEvaluator;
use certwatch_server::fetch::{CertFetcher, TlsCertFetcher};
use certwatch_server::pipeline::ScanPipeline;
use certwatch_server::scheduler::ScanScheduler;
use certwatch_server::seed;

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("failed to install default CryptoProvider: {e:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("certwatch=info".parse()?))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/certwatch.toml".to_string());
    let config = if Path::new(&config_path).exists() {
        ServerConfig::load(&config_path)?
    } else {
        tracing::warn!(path = %config_path, "config file not found, using defaults");
        ServerConfig::default()
    };

    let registry: Arc<dyn HostRegistry> = Arc::new(MemoryRegistry::new());
    if let Some(hosts_file) = &config.seed.hosts_file {
        let seeded = seed::load_hosts_file(
            &registry,
            hosts_file,
            &config.seed.users,
            config.scan.default_port,
        )
        .await?;
        tracing::info!(hosts = seeded, path = %hosts_file, "registry seeded");
    }

    let fetcher: Arc<dyn CertFetcher> =
        Arc::new(TlsCertFetcher::new(config.scan.connect_timeout_secs));
    let pipeline = ScanPipeline::new(fetcher, config.scan.concurrency);
    let scanner = ScanScheduler::new(Arc::clone(&registry), pipeline, config.scan.interval_secs);

    let notifier: Arc<dyn Notifier> = Arc::new(MessageGateway::new(
        &config.gateway.base_url,
        &config.gateway.app_key,
    ));
    let evaluator = ExpiryEvaluator::new(
        registry,
        notifier,
        ExpiryPolicy::new(config.notify.ca_warn_hours, config.notify.leaf_warn_hours),
        NotifyWindow::new(config.notify.window_start_hour, config.notify.window_hours),
        config.notify.tick_secs,
    );

    tokio::spawn(async move { scanner.run().await });
    tokio::spawn(async move { evaluator.run().await });

    signal::ctrl_c().await?;
    tracing::info!("shutting down");
    Ok(())
}
