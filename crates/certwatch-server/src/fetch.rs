use async_trait::async_trait;
use certwatch_common::types::CertFact;
use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use rustls::ClientConfig;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

/// Why a handshake produced no certificate facts.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid hostname: {0}")]
    InvalidName(String),

    #[error("connection timed out after {0}s")]
    ConnectTimeout(u64),

    #[error("TCP connect failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("TLS handshake timed out after {0}s")]
    HandshakeTimeout(u64),

    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] std::io::Error),

    #[error("failed to parse certificate: {0}")]
    CertParse(String),

    #[error("server presented no certificates")]
    EmptyChain,
}

/// Result of one fetch attempt against one host.
///
/// Transient: produced by a pipeline run and consumed by the scan scheduler
/// in the same cycle. On failure `certs` is empty and `error` carries the
/// cause; a failed fetch is never an `Err` to the caller.
#[derive(Debug)]
pub struct ScanOutcome {
    pub hostname: String,
    pub certs: Vec<CertFact>,
    pub error: Option<FetchError>,
}

impl ScanOutcome {
    pub fn success(hostname: impl Into<String>, certs: Vec<CertFact>) -> Self {
        Self {
            hostname: hostname.into(),
            certs,
            error: None,
        }
    }

    pub fn failure(hostname: impl Into<String>, error: FetchError) -> Self {
        Self {
            hostname: hostname.into(),
            certs: Vec::new(),
            error: Some(error),
        }
    }
}

/// Fetches the certificate facts a host presents during a TLS handshake.
#[async_trait]
pub trait CertFetcher: Send + Sync {
    async fn fetch(&self, hostname: &str, port: u16) -> ScanOutcome;
}

/// Live fetcher: verified rustls handshake against the webpki root store.
///
/// The handshake itself performs trust-path evaluation; a host failing
/// verification surfaces as a `Handshake` error, not as facts. Connections
/// are dropped (and thereby closed) on every exit path.
pub struct TlsCertFetcher {
    connector: TlsConnector,
    timeout_secs: u64,
}

impl TlsCertFetcher {
    pub fn new(timeout_secs: u64) -> Self {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self {
            connector: TlsConnector::from(Arc::new(config)),
            timeout_secs,
        }
    }

    async fn handshake(&self, hostname: &str, port: u16) -> Result<Vec<CertFact>, FetchError> {
        let server_name = ServerName::try_from(hostname.to_string())
            .map_err(|_| FetchError::InvalidName(hostname.to_string()))?;

        let addr = format!("{hostname}:{port}");
        let tcp = timeout(
            Duration::from_secs(self.timeout_secs),
            TcpStream::connect(&addr),
        )
        .await
        .map_err(|_| FetchError::ConnectTimeout(self.timeout_secs))?
        .map_err(FetchError::Connect)?;

        let tls = timeout(
            Duration::from_secs(self.timeout_secs),
            self.connector.connect(server_name, tcp),
        )
        .await
        .map_err(|_| FetchError::HandshakeTimeout(self.timeout_secs))?
        .map_err(FetchError::Handshake)?;

        let (_io, conn) = tls.into_inner();
        let chain = conn.peer_certificates().ok_or(FetchError::EmptyChain)?;
        if chain.is_empty() {
            return Err(FetchError::EmptyChain);
        }

        let now = Utc::now();
        let mut entries = Vec::with_capacity(chain.len());
        for der in chain {
            let (_, cert) = X509Certificate::from_der(der.as_ref())
                .map_err(|e| FetchError::CertParse(e.to_string()))?;
            entries.push((cert.signature_value.data.to_vec(), cert_fact(&cert, now)));
        }
        Ok(dedup_by_signature(entries))
    }
}

#[async_trait]
impl CertFetcher for TlsCertFetcher {
    async fn fetch(&self, hostname: &str, port: u16) -> ScanOutcome {
        match self.handshake(hostname, port).await {
            Ok(certs) => ScanOutcome::success(hostname, certs),
            Err(e) => ScanOutcome::failure(hostname, e),
        }
    }
}

fn cert_fact(cert: &X509Certificate<'_>, now: DateTime<Utc>) -> CertFact {
    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_default();
    let not_before =
        DateTime::from_timestamp(cert.validity().not_before.timestamp(), 0).unwrap_or_default();
    let not_after =
        DateTime::from_timestamp(cert.validity().not_after.timestamp(), 0).unwrap_or_default();

    CertFact {
        common_name,
        is_ca: cert.is_ca(),
        not_before,
        not_after,
        expire_hours: (not_after - now).num_hours(),
    }
}

/// Keeps the first occurrence of each certificate identity, in chain order.
///
/// A chain may legitimately present the same certificate on multiple paths;
/// identity is the raw signature bytes, matching how the facts were observed
/// rather than any re-encoding of them.
fn dedup_by_signature(entries: Vec<(Vec<u8>, CertFact)>) -> Vec<CertFact> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|(sig, _)| seen.insert(sig.clone()))
        .map(|(_, fact)| fact)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn make_fact(common_name: &str) -> CertFact {
        let now = Utc::now();
        CertFact {
            common_name: common_name.to_string(),
            is_ca: false,
            not_before: now - ChronoDuration::days(30),
            not_after: now + ChronoDuration::hours(500),
            expire_hours: 500,
        }
    }

    #[test]
    fn repeated_signature_is_emitted_once() {
        let deduped = dedup_by_signature(vec![
            (vec![1, 2, 3], make_fact("leaf.test")),
            (vec![9, 9, 9], make_fact("Intermediate CA")),
            (vec![1, 2, 3], make_fact("leaf.test")),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].common_name, "leaf.test");
        assert_eq!(deduped[1].common_name, "Intermediate CA");
    }

    #[test]
    fn first_occurrence_wins_in_chain_order() {
        let deduped = dedup_by_signature(vec![
            (vec![7], make_fact("first")),
            (vec![8], make_fact("second")),
            (vec![7], make_fact("shadowed")),
            (vec![9], make_fact("third")),
        ]);
        let names: Vec<&str> = deduped.iter().map(|f| f.common_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn distinct_signatures_all_survive() {
        let entries: Vec<_> = (0u8..5).map(|i| (vec![i], make_fact("cn"))).collect();
        assert_eq!(dedup_by_signature(entries).len(), 5);
    }

    #[tokio::test]
    async fn invalid_hostname_is_a_failed_outcome() {
        let fetcher = TlsCertFetcher::new(1);
        let outcome = fetcher.fetch("not a hostname", 443).await;
        assert!(outcome.certs.is_empty());
        assert!(matches!(outcome.error, Some(FetchError::InvalidName(_))));
    }
}
