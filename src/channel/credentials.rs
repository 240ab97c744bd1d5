//! Transport credential selection
//!
//! Exactly one of three security postures is selected per request: plaintext,
//! TLS trusting a test CA bundle, or TLS trusting the platform store. The
//! result is an opaque capability consumed once by the dial step.

use crate::channel::ChannelRequest;
use crate::{Error, Result};
use rustls::ClientConfig;
use rustls::RootCertStore;
use rustls_pemfile::Item;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// How the channel's transport is secured.
///
/// Produced by [`TransportCredentials::for_request`] and consumed exactly once
/// when dialing. The TLS variant carries the compiled client configuration
/// (trust roots, no client auth) and the name the server certificate must
/// present.
#[derive(Clone)]
pub enum TransportCredentials {
    /// Unauthenticated, unencrypted transport
    Plaintext,
    /// TLS with a specific trust root and expected server name
    Tls {
        /// Compiled rustls ClientConfig
        client_config: Arc<ClientConfig>,
        /// Name the server certificate is validated against
        server_name: String,
    },
}

impl std::fmt::Debug for TransportCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportCredentials::Plaintext => f.write_str("TransportCredentials::Plaintext"),
            TransportCredentials::Tls { server_name, .. } => f
                .debug_struct("TransportCredentials::Tls")
                .field("server_name", server_name)
                .field("client_config", &"<ClientConfig>")
                .finish(),
        }
    }
}

impl TransportCredentials {
    /// Build credentials for a request.
    ///
    /// When `use_tls` is false this short-circuits to [`Plaintext`] without
    /// touching the filesystem; `use_test_ca` and the server-name override are
    /// ignored. Otherwise the trust root comes from `test_ca_path` when
    /// `use_test_ca` is set, or from the system store when it is not.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialLoad`] if the test CA bundle is unreadable,
    /// unparseable, or contains no certificate, or if no system root could be
    /// loaded at all. Returns [`Error::Config`] for an invalid server name.
    ///
    /// [`Plaintext`]: TransportCredentials::Plaintext
    pub fn for_request(request: &ChannelRequest, test_ca_path: &Path) -> Result<Self> {
        if !request.use_tls {
            return Ok(TransportCredentials::Plaintext);
        }

        let server_name = parse_server_name(request.effective_server_name())?;

        let root_store = if request.use_test_ca {
            load_ca_bundle(test_ca_path)?
        } else {
            load_system_roots()?
        };

        let client_config = Arc::new(
            ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth(),
        );

        Ok(TransportCredentials::Tls {
            client_config,
            server_name,
        })
    }

    /// Whether these credentials encrypt the transport
    pub fn is_encrypted(&self) -> bool {
        matches!(self, TransportCredentials::Tls { .. })
    }

    /// The expected server name, if TLS is selected
    pub fn server_name(&self) -> Option<&str> {
        match self {
            TransportCredentials::Plaintext => None,
            TransportCredentials::Tls { server_name, .. } => Some(server_name),
        }
    }
}

/// Load trust roots from a PEM bundle on disk.
fn load_ca_bundle(path: &Path) -> Result<RootCertStore> {
    let pem_data = fs::read(path).map_err(|e| Error::CredentialLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut reader = std::io::Cursor::new(&pem_data);
    let mut root_store = RootCertStore::empty();
    let mut found_certs = 0;

    loop {
        match rustls_pemfile::read_one(&mut reader) {
            Ok(Some(Item::X509Certificate(cert))) => {
                let _ = root_store.add_parsable_certificates(std::iter::once(cert));
                found_certs += 1;
            }
            Ok(Some(_)) => {
                // Skip non-certificate items (private keys, etc.)
            }
            Ok(None) => break,
            Err(_) => {
                return Err(Error::CredentialLoad {
                    path: path.display().to_string(),
                    reason: "failed to parse PEM data".into(),
                });
            }
        }
    }

    if found_certs == 0 {
        return Err(Error::CredentialLoad {
            path: path.display().to_string(),
            reason: "no valid certificates found".into(),
        });
    }

    Ok(root_store)
}

/// Load the platform's default trust store.
fn load_system_roots() -> Result<RootCertStore> {
    let result = rustls_native_certs::load_native_certs();

    let mut store = RootCertStore::empty();
    for cert in result.certs {
        let _ = store.add_parsable_certificates(std::iter::once(cert));
    }

    // Individual load errors are tolerated as long as some root made it in
    if store.is_empty() {
        return Err(Error::CredentialLoad {
            path: "<system trust store>".into(),
            reason: "failed to load any system root certificates".into(),
        });
    }

    Ok(store)
}

/// Sanity-check a server name before handing it to the TLS layer.
///
/// Accepts DNS names and IP literals and trims a trailing dot. Colons are
/// only valid in a name that parses as an IPv6 address, so a `host:port`
/// string fails here as `Config` rather than surfacing later from the TLS
/// layer after the socket is already open.
pub fn parse_server_name(name: &str) -> Result<String> {
    let name = name.trim_end_matches('.');

    if name.is_empty() || name.len() > 253 {
        return Err(Error::Config(format!(
            "invalid server name for TLS: '{}'",
            name
        )));
    }

    let valid = if name.contains(':') {
        name.parse::<std::net::Ipv6Addr>().is_ok()
    } else {
        name.chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '.')
    };
    if !valid {
        return Err(Error::Config(format!(
            "invalid server name for TLS: '{}'",
            name
        )));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn fixture_ca_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/ca.pem")
    }

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("prober-channel-{}-{}", std::process::id(), name));
        let mut f = fs::File::create(&path).expect("create temp fixture");
        f.write_all(contents).expect("write temp fixture");
        path
    }

    #[test]
    fn test_plaintext_when_tls_disabled() {
        // test-CA flag and override are ignored without TLS; the bogus path is
        // never touched
        let request = ChannelRequest::new("example.com", 443)
            .use_test_ca(true)
            .tls_server_name("ignored.example.com");
        let creds = TransportCredentials::for_request(&request, Path::new("/nonexistent/ca.pem"))
            .expect("plaintext credentials should build");

        assert!(!creds.is_encrypted());
        assert!(creds.server_name().is_none());
    }

    #[test]
    fn test_tls_with_test_ca_fixture() {
        let request = ChannelRequest::new("localhost", 8443)
            .use_tls(true)
            .use_test_ca(true);
        let creds = TransportCredentials::for_request(&request, &fixture_ca_path())
            .expect("test CA fixture should load");

        assert!(creds.is_encrypted());
        assert_eq!(creds.server_name(), Some("localhost"));
    }

    #[test]
    fn test_tls_test_ca_missing_file() {
        let request = ChannelRequest::new("localhost", 8443)
            .use_tls(true)
            .use_test_ca(true);
        let result =
            TransportCredentials::for_request(&request, Path::new("/nonexistent/ca.pem"));

        assert!(matches!(result, Err(Error::CredentialLoad { .. })));
    }

    #[test]
    fn test_tls_test_ca_empty_bundle() {
        let path = temp_file("empty.pem", b"");
        let request = ChannelRequest::new("localhost", 8443)
            .use_tls(true)
            .use_test_ca(true);
        let result = TransportCredentials::for_request(&request, &path);
        let _ = fs::remove_file(&path);

        match result {
            Err(Error::CredentialLoad { reason, .. }) => {
                assert!(reason.contains("no valid certificates"));
            }
            other => panic!("expected CredentialLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_tls_test_ca_garbage_bundle() {
        let path = temp_file(
            "garbage.pem",
            b"-----BEGIN CERTIFICATE-----\nnot base64 at all!!\n-----END CERTIFICATE-----\n",
        );
        let request = ChannelRequest::new("localhost", 8443)
            .use_tls(true)
            .use_test_ca(true);
        let result = TransportCredentials::for_request(&request, &path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(Error::CredentialLoad { .. })));
    }

    #[test]
    fn test_tls_with_system_roots() {
        let request = ChannelRequest::new("example.com", 443).use_tls(true);
        let creds = TransportCredentials::for_request(&request, &fixture_ca_path())
            .expect("system roots should load");

        assert!(creds.is_encrypted());
        assert_eq!(creds.server_name(), Some("example.com"));
    }

    #[test]
    fn test_server_name_override_carried_into_credentials() {
        let request = ChannelRequest::new("10.0.0.1", 443)
            .use_tls(true)
            .use_test_ca(true)
            .tls_server_name("service.example.com");
        let creds = TransportCredentials::for_request(&request, &fixture_ca_path())
            .expect("credentials should build");

        assert_eq!(creds.server_name(), Some("service.example.com"));
    }

    #[test]
    fn test_parse_server_name_valid() {
        assert!(parse_server_name("localhost").is_ok());
        assert!(parse_server_name("example.com").is_ok());
        assert!(parse_server_name("svc.internal.example.com").is_ok());
    }

    #[test]
    fn test_parse_server_name_ip_literals() {
        assert!(parse_server_name("127.0.0.1").is_ok());
        assert!(parse_server_name("::1").is_ok());
        assert!(parse_server_name("2001:db8::2").is_ok());
    }

    #[test]
    fn test_parse_server_name_trailing_dot() {
        assert_eq!(parse_server_name("example.com.").unwrap(), "example.com");
    }

    #[test]
    fn test_parse_server_name_invalid() {
        assert!(parse_server_name("").is_err());
        assert!(parse_server_name("bad name.example.com").is_err());
        assert!(parse_server_name(&"x".repeat(300)).is_err());
    }

    #[test]
    fn test_parse_server_name_rejects_host_port() {
        // Colons are only for IPv6 literals; host:port must fail as Config
        // before any socket is opened
        assert!(matches!(
            parse_server_name("example.com:443"),
            Err(Error::Config(_))
        ));
        assert!(parse_server_name("127.0.0.1:8443").is_err());
        assert!(parse_server_name("not::an::address::at::all").is_err());
    }

    #[test]
    fn test_credentials_debug_hides_client_config() {
        let request = ChannelRequest::new("localhost", 8443)
            .use_tls(true)
            .use_test_ca(true);
        let creds = TransportCredentials::for_request(&request, &fixture_ca_path())
            .expect("credentials should build");

        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("server_name"));
        assert!(debug_str.contains("<ClientConfig>"));
    }
}
