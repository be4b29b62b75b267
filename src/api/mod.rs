//! Outbound HTTP plumbing: transports, request signing and response helpers

pub mod middleware;
pub mod transport;
pub mod utils;

pub use middleware::SigningTransport;
pub use transport::Transport;
pub use utils::{join_url, merge_query_params, read_venue_response, venue_result};
