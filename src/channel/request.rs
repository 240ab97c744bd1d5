//! Channel request parameters

use crate::{Error, Result};

/// Parameters for a single channel construction.
///
/// A request is ephemeral and caller-constructed; the factory never stores it.
/// Defaults are plaintext with no server-name override.
///
/// # Examples
///
/// ```
/// use prober_channel::ChannelRequest;
///
/// // Plaintext
/// let request = ChannelRequest::new("localhost", 50051);
///
/// // TLS against the bundled test CA, overriding the validated name
/// let request = ChannelRequest::new("127.0.0.1", 8443)
///     .use_tls(true)
///     .use_test_ca(true)
///     .tls_server_name("foo.test.google.fr");
/// ```
#[derive(Debug, Clone)]
pub struct ChannelRequest {
    /// Hostname or IP literal to dial
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Override for the certificate's expected subject name.
    /// `None` or empty means "derive from the host".
    pub tls_server_name: Option<String>,
    /// Whether to encrypt the transport
    pub use_tls: bool,
    /// Whether to trust the test CA bundle instead of the system store.
    /// Ignored when `use_tls` is false.
    pub use_test_ca: bool,
}

impl ChannelRequest {
    /// Create a request with defaults (plaintext, no override)
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls_server_name: None,
            use_tls: false,
            use_test_ca: false,
        }
    }

    /// Enable or disable TLS
    pub fn use_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Select the test CA bundle instead of system trust
    pub fn use_test_ca(mut self, use_test_ca: bool) -> Self {
        self.use_test_ca = use_test_ca;
        self
    }

    /// Set the expected server name for certificate validation.
    ///
    /// An empty string behaves exactly like not setting the override.
    pub fn tls_server_name(mut self, name: impl Into<String>) -> Self {
        self.tls_server_name = Some(name.into());
        self
    }

    /// Validate request parameters
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::Config("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(Error::Config("port must be in 1..=65535".into()));
        }
        Ok(())
    }

    /// Compose the target address as `host:port`.
    ///
    /// IPv6 literals are bracketed so the result is unambiguous:
    /// `("::1", 50051)` yields `"[::1]:50051"`.
    pub fn target(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// The name to validate the server certificate against.
    ///
    /// The override wins when present and non-empty; otherwise the host is
    /// used, matching what the transport would derive from the dialed address.
    pub fn effective_server_name(&self) -> &str {
        match self.tls_server_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_plaintext() {
        let request = ChannelRequest::new("localhost", 50051);
        assert!(!request.use_tls);
        assert!(!request.use_test_ca);
        assert!(request.tls_server_name.is_none());
    }

    #[test]
    fn test_target_hostname() {
        let request = ChannelRequest::new("example.com", 443);
        assert_eq!(request.target(), "example.com:443");
    }

    #[test]
    fn test_target_ipv4() {
        let request = ChannelRequest::new("127.0.0.1", 8080);
        assert_eq!(request.target(), "127.0.0.1:8080");
    }

    #[test]
    fn test_target_ipv6_is_bracketed() {
        let request = ChannelRequest::new("::1", 50051);
        assert_eq!(request.target(), "[::1]:50051");

        let request = ChannelRequest::new("2001:db8::2", 443);
        assert_eq!(request.target(), "[2001:db8::2]:443");
    }

    #[test]
    fn test_target_already_bracketed_ipv6() {
        let request = ChannelRequest::new("[::1]", 50051);
        assert_eq!(request.target(), "[::1]:50051");
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let request = ChannelRequest::new("", 443);
        assert!(matches!(request.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let request = ChannelRequest::new("example.com", 0);
        assert!(matches!(request.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_accepts_valid_request() {
        assert!(ChannelRequest::new("example.com", 443).validate().is_ok());
    }

    #[test]
    fn test_server_name_defaults_to_host() {
        let request = ChannelRequest::new("example.com", 443).use_tls(true);
        assert_eq!(request.effective_server_name(), "example.com");
    }

    #[test]
    fn test_server_name_empty_override_same_as_none() {
        let request = ChannelRequest::new("example.com", 443)
            .use_tls(true)
            .tls_server_name("");
        assert_eq!(request.effective_server_name(), "example.com");
    }

    #[test]
    fn test_server_name_override_wins() {
        let request = ChannelRequest::new("10.1.2.3", 443)
            .use_tls(true)
            .tls_server_name("service.example.com");
        assert_eq!(request.effective_server_name(), "service.example.com");
    }
}
