use certwatch_common::types::CertFact;

/// Rendered notification content for one expiring certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub link: String,
}

/// Renders the expiry notice for a certificate observed on `hostname`.
pub fn expiry_notice(hostname: &str, fact: &CertFact) -> Notice {
    let body = format!(
        "Host: {}\nCommon name: {}\nExpires at: {}\nCA certificate: {}",
        hostname,
        fact.common_name,
        fact.not_after.format("%Y-%m-%d %H:%M:%S"),
        if fact.is_ca { "yes" } else { "no" },
    );
    Notice {
        title: "TLS certificate expiry notice".to_string(),
        body,
        link: format!("https://{hostname}"),
    }
}
