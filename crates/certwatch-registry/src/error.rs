/// Errors surfaced by host-registry implementations.
///
/// `HostNotFound` is the benign variant: the scan scheduler treats it as a
/// skippable race (host deleted between listing and write-back) rather than
/// a failure. `Backend` aborts the caller's current cycle.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No active host with the given hostname exists.
    #[error("registry: host not found: {0}")]
    HostNotFound(String),

    /// The backing service failed or returned an unexpected response.
    #[error("registry: backend error: {0}")]
    Backend(String),
}

/// Convenience `Result` alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
