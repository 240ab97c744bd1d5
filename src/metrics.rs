//! Metric recording helpers
//!
//! Thin wrappers over the `metrics` facade so call sites stay one-liners and
//! metric names live in a single place. A downstream binary installs whatever
//! recorder it wants; without one these are no-ops.

pub(crate) mod labels {
    pub const TRANSPORT_PLAINTEXT: &str = "plaintext";
    pub const TRANSPORT_TLS: &str = "tls";

    pub const FAILURE_CREDENTIAL_LOAD: &str = "credential_load";
    pub const FAILURE_DIAL: &str = "dial";
    pub const FAILURE_TLS_HANDSHAKE: &str = "tls_handshake";
}

pub(crate) mod counters {
    /// A channel dial was attempted
    pub fn dial_attempted(transport: &'static str) {
        metrics::counter!("prober_channel_dials_total", "transport" => transport).increment(1);
    }

    /// A channel was established
    pub fn dial_succeeded(transport: &'static str) {
        metrics::counter!("prober_channel_dials_succeeded_total", "transport" => transport)
            .increment(1);
    }

    /// Channel setup failed
    pub fn dial_failed(stage: &'static str) {
        metrics::counter!("prober_channel_dials_failed_total", "stage" => stage).increment(1);
    }
}

pub(crate) mod histograms {
    use std::time::Duration;

    /// Time from dial start to an established channel
    pub fn dial_duration(transport: &'static str, duration: Duration) {
        metrics::histogram!("prober_channel_dial_duration_seconds", "transport" => transport)
            .record(duration.as_secs_f64());
    }
}
