//! Minimal connectivity probe.
//!
//! Dials a single endpoint and reports how the channel was established.
//! Setup failures are logged and terminate the process, which is the whole
//! point of a per-invocation probe.
//!
//! ```bash
//! cargo run --example probe -- --host localhost --port 50051
//! cargo run --example probe -- --host myservice.example.com --port 443 --use-tls
//! cargo run --example probe -- --host 127.0.0.1 --port 8443 --use-tls --use-test-ca \
//!     --tls-server-name foo.test.google.fr
//! ```

use prober_channel::{ChannelFactory, ChannelRequest};

fn usage() -> ! {
    eprintln!(
        "usage: probe --host HOST --port PORT [--use-tls] [--use-test-ca] \
         [--tls-server-name NAME]"
    );
    std::process::exit(2);
}

fn parse_args() -> ChannelRequest {
    let mut host = None;
    let mut port = None;
    let mut use_tls = false;
    let mut use_test_ca = false;
    let mut tls_server_name = String::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--host" => host = args.next(),
            "--port" => port = args.next().and_then(|p| p.parse::<u16>().ok()),
            "--use-tls" => use_tls = true,
            "--use-test-ca" => use_test_ca = true,
            "--tls-server-name" => tls_server_name = args.next().unwrap_or_default(),
            _ => usage(),
        }
    }

    let (host, port) = match (host, port) {
        (Some(h), Some(p)) => (h, p),
        _ => usage(),
    };

    ChannelRequest::new(host, port)
        .use_tls(use_tls)
        .use_test_ca(use_test_ca)
        .tls_server_name(tls_server_name)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let request = parse_args();
    let factory = ChannelFactory::new();
    let channel = factory.create_channel_or_exit(&request).await;

    println!(
        "connected to {} ({}){}",
        channel.target(),
        if channel.is_encrypted() {
            "tls"
        } else {
            "plaintext"
        },
        channel
            .server_name()
            .map(|n| format!(", validated as {}", n))
            .unwrap_or_default()
    );
}
