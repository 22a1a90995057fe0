use std::time::Duration;

use thiserror::Error;

/// Failures of one terminal session to one switch.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot connect to {host}: {reason}")]
    Connect { host: String, reason: String },

    #[error("{host} rejected the credentials")]
    Auth { host: String },

    #[error("no prompt from {host} within {timeout:?}")]
    Stalled { host: String, timeout: Duration },

    #[error("session to {host} is closed")]
    Closed { host: String },

    #[error("cancelled")]
    Cancelled,

    #[error("I/O error on session to {host}: {source}")]
    Io {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),
}

/// Failures that end a whole run rather than a single hop.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("core switch {host} is unavailable")]
    CoreUnavailable { host: String },

    #[error("core switch {host} rejected the credentials")]
    CoreRejected { host: String },

    #[error("walk cancelled")]
    Cancelled,

    #[error(transparent)]
    Session(#[from] SessionError),
}
