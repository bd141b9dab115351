//! Notification collaborator interface and the message-gateway adapter.
//!
//! The expiry evaluator talks to a [`Notifier`]; the shipped implementation
//! ([`gateway::MessageGateway`]) forwards to an internal message service over
//! HTTP. Delivery failures are the caller's to log; they never abort an
//! evaluation pass.

pub mod error;
pub mod gateway;
pub mod notice;


use async_trait::async_trait;
use certwatch_common::types::UserId;

use crate::error::Result;

/// Outbound notification delivery channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one message to the given recipients.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport is unreachable or the gateway
    /// reports a non-success response.
    async fn notify(
        &self,
        recipients: &[UserId],
        title: &str,
        body: &str,
        link: &str,
    ) -> Result<()>;
}
