//! The channel handle returned to callers

use crate::channel::TransportCredentials;
use crate::{Error, Result};
use bytes::BytesMut;
use rustls_pki_types::ServerName;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Stream variant: plain or TLS-encrypted
#[allow(clippy::large_enum_variant)]
enum ChannelStream {
    /// Plain TCP connection
    Plain(TcpStream),
    /// TLS-encrypted TCP connection
    Tls(tokio_rustls::client::TlsStream<TcpStream>),
}

impl std::fmt::Debug for ChannelStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelStream::Plain(_) => f.write_str("ChannelStream::Plain(TcpStream)"),
            ChannelStream::Tls(_) => f.write_str("ChannelStream::Tls(TlsStream)"),
        }
    }
}

/// An established client channel.
///
/// Owned by the caller; this crate only constructs it. The byte-level I/O
/// surface is enough for probe tools to exercise the connection; RPC framing
/// on top is out of scope.
#[derive(Debug)]
pub struct Channel {
    target: String,
    server_name: Option<String>,
    stream: ChannelStream,
}

impl Channel {
    /// Dial `target` with the given credentials.
    ///
    /// The TCP connection and, when TLS is selected, the full handshake
    /// complete before this returns, so a returned channel is live.
    pub(crate) async fn dial(target: &str, credentials: TransportCredentials) -> Result<Self> {
        let tcp_stream = TcpStream::connect(target).await.map_err(|e| Error::Dial {
            target: target.to_string(),
            source: e,
        })?;

        let (stream, server_name) = match credentials {
            TransportCredentials::Plaintext => (ChannelStream::Plain(tcp_stream), None),
            TransportCredentials::Tls {
                client_config,
                server_name,
            } => {
                let sni = ServerName::try_from(server_name.clone()).map_err(|_| {
                    Error::Config(format!("invalid server name for TLS: {}", server_name))
                })?;

                let tls_connector = tokio_rustls::TlsConnector::from(client_config);
                let tls_stream = tls_connector
                    .connect(sni, tcp_stream)
                    .await
                    .map_err(|e| Error::Tls {
                        target: target.to_string(),
                        reason: e.to_string(),
                    })?;

                (ChannelStream::Tls(tls_stream), Some(server_name))
            }
        };

        Ok(Self {
            target: target.to_string(),
            server_name,
            stream,
        })
    }

    /// The `host:port` target this channel was dialed to
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the transport is TLS-encrypted
    pub fn is_encrypted(&self) -> bool {
        matches!(self.stream, ChannelStream::Tls(_))
    }

    /// The server name the certificate was validated against, if TLS
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Local socket address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        let addr = match &self.stream {
            ChannelStream::Plain(stream) => stream.local_addr()?,
            ChannelStream::Tls(stream) => stream.get_ref().0.local_addr()?,
        };
        Ok(addr)
    }

    /// Remote socket address
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        let addr = match &self.stream {
            ChannelStream::Plain(stream) => stream.peer_addr()?,
            ChannelStream::Tls(stream) => stream.get_ref().0.peer_addr()?,
        };
        Ok(addr)
    }

    /// Write all bytes to the channel
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        match &mut self.stream {
            ChannelStream::Plain(stream) => stream.write_all(buf).await?,
            ChannelStream::Tls(stream) => stream.write_all(buf).await?,
        }
        Ok(())
    }

    /// Flush the channel
    pub async fn flush(&mut self) -> Result<()> {
        match &mut self.stream {
            ChannelStream::Plain(stream) => stream.flush().await?,
            ChannelStream::Tls(stream) => stream.flush().await?,
        }
        Ok(())
    }

    /// Read into buffer, returning the number of bytes read
    pub async fn read_buf(&mut self, buf: &mut BytesMut) -> Result<usize> {
        let n = match &mut self.stream {
            ChannelStream::Plain(stream) => stream.read_buf(buf).await?,
            ChannelStream::Tls(stream) => stream.read_buf(buf).await?,
        };
        Ok(n)
    }

    /// Shutdown the channel
    pub async fn shutdown(&mut self) -> Result<()> {
        match &mut self.stream {
            ChannelStream::Plain(stream) => stream.shutdown().await?,
            ChannelStream::Tls(stream) => stream.shutdown().await?,
        }
        Ok(())
    }
}
