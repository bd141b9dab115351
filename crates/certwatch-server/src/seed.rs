use anyhow::{Context, Result};
use certwatch_registry::HostRegistry;
use std::sync::Arc;

/// Loads a hosts file into the registry at startup.
///
/// One `hostname[:port]` per line; blank lines and `#` comments are skipped.
/// Every listed host is registered to each of `users`. Returns the number of
/// hosts registered.
pub async fn load_hosts_file(
    registry: &Arc<dyn HostRegistry>,
    path: &str,
    users: &[String],
    default_port: u16,
) -> Result<usize> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read hosts file '{path}'"))?;

    let mut count = 0usize;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (hostname, port) = parse_target(line, default_port)
            .with_context(|| format!("invalid hosts file entry '{line}'"))?;
        for user in users {
            registry.register_host(hostname, port, user).await?;
        }
        count += 1;
    }
    Ok(count)
}

fn parse_target(line: &str, default_port: u16) -> Result<(&str, u16)> {
    match line.rsplit_once(':') {
        Some((host, port)) => {
            let port: u16 = port.parse().context("port is not a number")?;
            Ok((host, port))
        }
        None => Ok((line, default_port)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hostname_gets_default_port() {
        assert_eq!(parse_target("example.test", 443).unwrap(), ("example.test", 443));
    }

    #[test]
    fn explicit_port_is_honored() {
        assert_eq!(
            parse_target("example.test:8443", 443).unwrap(),
            ("example.test", 8443)
        );
    }

    #[test]
    fn garbage_port_is_an_error() {
        assert!(parse_target("example.test:https", 443).is_err());
    }
}
