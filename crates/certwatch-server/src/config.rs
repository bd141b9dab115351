use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of concurrent handshake workers in the scan pipeline.
    #[serde(default = "default_scan_concurrency")]
    pub concurrency: usize,
    /// Seconds between scan cycles.
    #[serde(default = "default_scan_interval_secs")]
    pub interval_secs: u64,
    /// Per-host TCP connect / TLS handshake timeout.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Port assumed when a host is registered without one.
    #[serde(default = "default_tls_port")]
    pub default_port: u16,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: default_scan_concurrency(),
            interval_secs: default_scan_interval_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            default_port: default_tls_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Seconds between window checks.
    #[serde(default = "default_notify_tick_secs")]
    pub tick_secs: u64,
    /// Local hour at which the daily delivery window opens.
    #[serde(default = "default_window_start_hour")]
    pub window_start_hour: u32,
    /// Width of the delivery window in hours.
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    /// Warning horizon for CA certificates, in hours remaining.
    #[serde(default = "default_ca_warn_hours")]
    pub ca_warn_hours: i64,
    /// Warning horizon for end-entity certificates, in hours remaining.
    #[serde(default = "default_leaf_warn_hours")]
    pub leaf_warn_hours: i64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_notify_tick_secs(),
            window_start_hour: default_window_start_hour(),
            window_hours: default_window_hours(),
            ca_warn_hours: default_ca_warn_hours(),
            leaf_warn_hours: default_leaf_warn_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub app_key: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_base_url(),
            app_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Optional hosts file loaded into the registry at startup, one
    /// `hostname[:port]` per line, `#` comments allowed.
    #[serde(default)]
    pub hosts_file: Option<String>,
    /// Users registered as owners of every seeded host.
    #[serde(default = "default_seed_users")]
    pub users: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            hosts_file: None,
            users: default_seed_users(),
        }
    }
}

fn default_scan_concurrency() -> usize {
    8
}

fn default_scan_interval_secs() -> u64 {
    3600
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_tls_port() -> u16 {
    443
}

fn default_notify_tick_secs() -> u64 {
    60
}

fn default_window_start_hour() -> u32 {
    10
}

fn default_window_hours() -> u32 {
    1
}

fn default_ca_warn_hours() -> i64 {
    5 * 30 * 24
}

fn default_leaf_warn_hours() -> i64 {
    30 * 24
}

fn default_gateway_base_url() -> String {
    "http://localhost:9990".to_string()
}

fn default_seed_users() -> Vec<String> {
    vec!["ops".to_string()]
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.scan.concurrency, 8);
        assert_eq!(config.scan.interval_secs, 3600);
        assert_eq!(config.scan.default_port, 443);
        assert_eq!(config.notify.tick_secs, 60);
        assert_eq!(config.notify.window_start_hour, 10);
        assert_eq!(config.notify.window_hours, 1);
        assert_eq!(config.notify.ca_warn_hours, 3600);
        assert_eq!(config.notify.leaf_warn_hours, 720);
        assert_eq!(config.seed.users, vec!["ops"]);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [scan]
            concurrency = 4

            [notify]
            window_start_hour = 8
            window_hours = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.concurrency, 4);
        assert_eq!(config.scan.interval_secs, 3600);
        assert_eq!(config.notify.window_start_hour, 8);
        assert_eq!(config.notify.window_hours, 2);
        assert_eq!(config.notify.leaf_warn_hours, 720);
    }
}
