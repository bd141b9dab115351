use async_trait::async_trait;
use certwatch_common::types::{CertFact, HostStatus, MonitoredHost};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{RegistryError, Result};
use crate::{HostRegistry, UserRemoval};

/// Non-persistent registry backed by a hostname-keyed map.
///
/// Lock poisoning is converted into a `Backend` error rather than a panic so
/// the scheduler loops survive it.
#[derive(Default)]
pub struct MemoryRegistry {
    hosts: RwLock<HashMap<String, MonitoredHost>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, MonitoredHost>>> {
        self.hosts
            .read()
            .map_err(|e| RegistryError::Backend(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, MonitoredHost>>> {
        self.hosts
            .write()
            .map_err(|e| RegistryError::Backend(format!("lock poisoned: {e}")))
    }
}

fn dedup_users(users: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    users.retain(|u| seen.insert(u.clone()));
}

#[async_trait]
impl HostRegistry for MemoryRegistry {
    async fn list_active_hosts(&self) -> Result<Vec<MonitoredHost>> {
        let hosts = self.read()?;
        Ok(hosts.values().filter(|h| h.is_active()).cloned().collect())
    }

    async fn get_host(&self, hostname: &str) -> Result<Option<MonitoredHost>> {
        let hosts = self.read()?;
        Ok(hosts.get(hostname).filter(|h| h.is_active()).cloned())
    }

    async fn update_host_certs(&self, hostname: &str, certs: Vec<CertFact>) -> Result<()> {
        let mut hosts = self.write()?;
        match hosts.get_mut(hostname).filter(|h| h.is_active()) {
            Some(host) => {
                host.certs = certs;
                host.updated_at = Utc::now();
                Ok(())
            }
            None => Err(RegistryError::HostNotFound(hostname.to_string())),
        }
    }

    async fn register_host(
        &self,
        hostname: &str,
        port: u16,
        user: &str,
    ) -> Result<MonitoredHost> {
        let mut hosts = self.write()?;
        let now = Utc::now();
        let host = hosts
            .entry(hostname.to_string())
            .or_insert_with(|| MonitoredHost {
                hostname: hostname.to_string(),
                port,
                users: Vec::new(),
                status: HostStatus::Active,
                certs: Vec::new(),
                added_at: now,
                updated_at: now,
            });
        host.users.push(user.to_string());
        dedup_users(&mut host.users);
        host.updated_at = now;
        Ok(host.clone())
    }

    async fn remove_user(&self, hostname: &str, user: &str) -> Result<UserRemoval> {
        let mut hosts = self.write()?;
        {
            let host = hosts
                .get_mut(hostname)
                .filter(|h| h.is_active())
                .ok_or_else(|| RegistryError::HostNotFound(hostname.to_string()))?;
            if !host.users.iter().any(|u| u == user) {
                return Err(RegistryError::HostNotFound(hostname.to_string()));
            }
            if host.users.len() > 1 {
                host.users.retain(|u| u != user);
                host.updated_at = Utc::now();
                return Ok(UserRemoval::UserRemoved);
            }
        }
        // Last owner: the host goes with the user.
        hosts.remove(hostname);
        Ok(UserRemoval::HostRemoved)
    }

    async fn delete_host(&self, hostname: &str) -> Result<()> {
        let mut hosts = self.write()?;
        hosts
            .remove(hostname)
            .map(|_| ())
            .ok_or_else(|| RegistryError::HostNotFound(hostname.to_string()))
    }
}
