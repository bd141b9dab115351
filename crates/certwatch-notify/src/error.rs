/// Errors that can occur while delivering a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The HTTP request to the message gateway failed outright.
    #[error("notify: HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-success HTTP status.
    #[error("notify: gateway returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The gateway accepted the request but reported a failure in its
    /// response envelope.
    #[error("notify: gateway rejected message (code {code}): {msg}")]
    Gateway { code: i64, msg: String },
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
