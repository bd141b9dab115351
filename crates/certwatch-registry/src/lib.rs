//! Host-registry collaborator interface and the in-memory implementation.
//!
//! The registry is the shared resource read by both scheduler loops and
//! mutated by the scan write-back and by registration callers. Every
//! operation is a discrete call; there is no cross-call transaction, and a
//! host vanishing between a listing and a write-back surfaces as
//! [`error::RegistryError::HostNotFound`], which callers treat as a skip.

pub mod error;
pub mod memory;


use async_trait::async_trait;
use certwatch_common::types::{CertFact, MonitoredHost};

use crate::error::Result;

/// Outcome of removing a user from a host's owner list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRemoval {
    /// The user was removed; other owners remain.
    UserRemoved,
    /// The user was the last owner, so the host itself was removed.
    HostRemoved,
}

/// Registry of monitored hosts and their owning users.
///
/// Implementations must be safe to share across tasks (`Send + Sync`): the
/// coarse scan loop and the fine notify loop both hold the same handle.
#[async_trait]
pub trait HostRegistry: Send + Sync {
    /// All hosts with active status, including their last-scanned facts.
    async fn list_active_hosts(&self) -> Result<Vec<MonitoredHost>>;

    /// Looks up a single active host by hostname.
    async fn get_host(&self, hostname: &str) -> Result<Option<MonitoredHost>>;

    /// Replaces the host's certificate facts with a fresh scan result.
    ///
    /// # Errors
    ///
    /// `HostNotFound` when no active host with that hostname exists, which
    /// happens when the host was deleted after the scan cycle listed it.
    async fn update_host_certs(&self, hostname: &str, certs: Vec<CertFact>) -> Result<()>;

    /// Registers a host for a user.
    ///
    /// Creates the host on first registration; on an existing host the user
    /// is appended to the owner list (deduplicated, idempotent).
    async fn register_host(&self, hostname: &str, port: u16, user: &str)
        -> Result<MonitoredHost>;

    /// Removes a user from a host's owner list.
    ///
    /// Removing the last owner removes the host itself, preserving the
    /// invariant that an active host always has at least one owner.
    async fn remove_user(&self, hostname: &str, user: &str) -> Result<UserRemoval>;

    /// Removes a host outright, regardless of remaining owners.
    async fn delete_host(&self, hostname: &str) -> Result<()>;
}
