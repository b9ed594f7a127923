//! Error types for the room server.
//!
//! [`ServerError`] covers the failures that can stop the process:
//! bad configuration, a port that cannot be bound, or a fatal serve
//! error. Nothing a client sends can produce one.

use crate::config::ConfigError;

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
