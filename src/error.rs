//! Error types

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building a channel.
///
/// The factory never terminates the process on the library path; every failure
/// is returned through one of these variants. `CredentialLoad`, `Dial`, and
/// `Tls` correspond to the three points where channel setup can fail against
/// the outside world; `Config` covers invalid caller parameters.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration or request parameters
    #[error("configuration error: {0}")]
    Config(String),

    /// The trust-root file could not be read or contained no usable certificate
    #[error("failed to load CA certificates from '{path}': {reason}")]
    CredentialLoad {
        /// Path of the certificate bundle that failed to load
        path: String,
        /// What went wrong (unreadable, unparseable, empty)
        reason: String,
    },

    /// TCP connection establishment failed
    #[error("failed to dial {target}: {source}")]
    Dial {
        /// The `host:port` target that was dialed
        target: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// The TLS handshake with the remote endpoint failed
    #[error("TLS handshake with {target} failed: {reason}")]
    Tls {
        /// The `host:port` target that was dialed
        target: String,
        /// Handshake failure detail
        reason: String,
    },

    /// I/O error on an established channel
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
