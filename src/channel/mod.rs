//! Channel construction
//!
//! This module handles:
//! * Request parameters and target address composition
//! * Transport credential selection (plaintext vs TLS, test CA vs system trust)
//! * The factory that dials and returns the channel handle

mod credentials;
mod factory;
mod handle;
mod request;

pub use credentials::{parse_server_name, TransportCredentials};
pub use factory::{ChannelFactory, TEST_CA_FILE};
pub use handle::Channel;
pub use request::ChannelRequest;
