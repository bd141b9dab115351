//! Shared data model for the certwatch workspace.
//!
//! Holds the monitored-host and certificate-fact types exchanged between the
//! scan pipeline, the host registry, and the expiry evaluator, plus the two
//! pure policies that decide when a notification fires: the per-kind warning
//! horizon ([`policy::ExpiryPolicy`]) and the daily delivery window
//! ([`window::NotifyWindow`]).

pub mod policy;
pub mod types;
pub mod window;
