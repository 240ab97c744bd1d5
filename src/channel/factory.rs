//! The channel factory

use crate::channel::{Channel, ChannelRequest, TransportCredentials};
use crate::metrics::{counters, histograms, labels};
use crate::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default location of the test CA bundle, relative to the working directory.
pub const TEST_CA_FILE: &str = "testdata/ca.pem";

/// Builds client channels from [`ChannelRequest`] parameters.
///
/// The factory holds one piece of configuration: where the test CA bundle
/// lives. Everything else comes from the request. Each call is independent;
/// the factory keeps no connection state.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> prober_channel::Result<()> {
/// use prober_channel::{ChannelFactory, ChannelRequest};
///
/// let factory = ChannelFactory::new();
/// let request = ChannelRequest::new("localhost", 50051)
///     .use_tls(true)
///     .use_test_ca(true);
/// let channel = factory.create_channel(&request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelFactory {
    test_ca_path: PathBuf,
}

impl Default for ChannelFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelFactory {
    /// Create a factory using the default test CA location ([`TEST_CA_FILE`])
    pub fn new() -> Self {
        Self {
            test_ca_path: PathBuf::from(TEST_CA_FILE),
        }
    }

    /// Create a factory with an alternate test CA bundle
    pub fn with_test_ca_path(path: impl Into<PathBuf>) -> Self {
        Self {
            test_ca_path: path.into(),
        }
    }

    /// The test CA bundle path this factory loads when requests ask for it
    pub fn test_ca_path(&self) -> &Path {
        &self.test_ca_path
    }

    /// Create a channel for the given request.
    ///
    /// Validates the request, builds transport credentials (exactly one of
    /// plaintext, TLS with the test CA, or TLS with system trust), and dials
    /// the composed `host:port` target. The returned channel is established;
    /// its lifecycle from here on belongs to the caller.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`] — empty host, zero port, or a malformed server name
    /// * [`Error::CredentialLoad`] — the trust root could not be loaded
    /// * [`Error::Dial`] — TCP connection establishment failed
    /// * [`Error::Tls`] — the TLS handshake failed
    ///
    /// [`Error::Config`]: crate::Error::Config
    /// [`Error::CredentialLoad`]: crate::Error::CredentialLoad
    /// [`Error::Dial`]: crate::Error::Dial
    /// [`Error::Tls`]: crate::Error::Tls
    pub async fn create_channel(&self, request: &ChannelRequest) -> Result<Channel> {
        request.validate()?;

        let credentials = TransportCredentials::for_request(request, &self.test_ca_path)
            .map_err(|e| {
                counters::dial_failed(labels::FAILURE_CREDENTIAL_LOAD);
                e
            })?;

        let transport = if credentials.is_encrypted() {
            labels::TRANSPORT_TLS
        } else {
            labels::TRANSPORT_PLAINTEXT
        };
        let target = request.target();

        tracing::debug!(endpoint = %target, transport, "dialing");
        counters::dial_attempted(transport);
        let start = Instant::now();

        let channel = Channel::dial(&target, credentials).await.map_err(|e| {
            counters::dial_failed(match e {
                crate::Error::Tls { .. } => labels::FAILURE_TLS_HANDSHAKE,
                _ => labels::FAILURE_DIAL,
            });
            e
        })?;

        counters::dial_succeeded(transport);
        histograms::dial_duration(transport, start.elapsed());
        tracing::info!(endpoint = %target, transport, "channel established");

        Ok(channel)
    }

    /// Create a channel, terminating the process on any failure.
    ///
    /// This is the historical behavior of short-lived probe tools: there is
    /// nothing useful such a tool can do after a failed setup, so the error is
    /// logged and the process exits with status 1. Long-running embedders
    /// should use [`create_channel`] instead.
    ///
    /// [`create_channel`]: ChannelFactory::create_channel
    pub async fn create_channel_or_exit(&self, request: &ChannelRequest) -> Channel {
        match self.create_channel(request).await {
            Ok(channel) => channel,
            Err(e) => {
                tracing::error!(endpoint = %request.target(), error = %e, "channel setup failed");
                std::process::exit(1);
            }
        }
    }
}
