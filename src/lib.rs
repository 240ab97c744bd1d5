//! Client channel factory for RPC probing tools.
//!
//! Given a host, a port, and a handful of TLS toggles, this crate builds a
//! single ready-to-use client channel to a remote endpoint. The channel is
//! either plaintext TCP, TLS validated against a bundled test certificate
//! authority, or TLS validated against the platform trust store — exactly one
//! of the three per call.
//!
//! There is deliberately no retry policy, no pooling, and no protocol logic
//! here: construction only. The returned [`Channel`] is owned by the caller,
//! who is responsible for its whole lifecycle.
//!
//! # Quick start
//!
//! ```no_run
//! # async fn example() -> prober_channel::Result<()> {
//! use prober_channel::{ChannelFactory, ChannelRequest};
//!
//! // Plaintext channel
//! let factory = ChannelFactory::new();
//! let channel = factory
//!     .create_channel(&ChannelRequest::new("localhost", 50051))
//!     .await?;
//!
//! // TLS against system roots, validating a name other than the one dialed
//! let request = ChannelRequest::new("10.0.0.7", 443)
//!     .use_tls(true)
//!     .tls_server_name("service.example.com");
//! let channel = factory.create_channel(&request).await?;
//! # Ok(())
//! # }
//! ```
//!
//! For short-lived probe binaries that want the historical fail-fast behavior
//! (log and exit on any setup failure), see
//! [`ChannelFactory::create_channel_or_exit`].

pub mod channel;
mod error;
mod metrics;

pub use channel::{Channel, ChannelFactory, ChannelRequest, TransportCredentials, TEST_CA_FILE};
pub use error::{Error, Result};
