//! # VenueX Rust SDK
//!
//! One interface over heterogeneous crypto trading venue APIs.
//!
//! ## Features
//!
//! - **Request Signing**: HMAC-SHA256, JWT/ES256, static bearer tokens and MPC-delegated signing behind one [`Signer`] trait
//! - **Signing Middleware**: [`SigningTransport`] authenticates every outbound `reqwest` request
//! - **Response Normalization**: Coinbase Advanced Trade and Coinbase Prime JSON into canonical records
//! - **Error Classification**: venue errors sorted into permanent, temporary and rate-limited
//! - **Venue Client Interface**: the [`VenueClient`] trait plus a recording [`MockClient`] for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use venuex_rust_sdk::{
//!     api::{read_venue_response, SigningTransport, Transport},
//!     Credentials, Venue,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads COINBASE_KEY_NAME / COINBASE_PRIVATE_KEY (or the HMAC / bearer sets)
//!     let signer = Credentials::from_env("COINBASE")?.into_signer()?;
//!     let transport = SigningTransport::new(reqwest::Client::new(), Arc::from(signer));
//!
//!     let venue = "coinbase".parse::<Venue>()?;
//!     let request = reqwest::Client::new()
//!         .get(venue.endpoint("/api/v3/brokerage/accounts"))
//!         .build()?;
//!     let response = transport.send(request).await?;
//!
//!     let normalizer = venue.normalizer();
//!     let body = read_venue_response(response, normalizer.as_ref()).await?;
//!     let balance = normalizer.normalize_balance(&body)?;
//!     println!("{:?}: {:?} available", balance.asset_id, balance.available);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod error;
pub mod normalizer;
pub mod signer;
pub mod types;

// Re-exports for convenience
pub use api::{SigningTransport, Transport};
pub use client::{MockClient, OrderBookHandler, TradeHandler, VenueClient};
pub use error::{Result, VenueError, VenueErrorKind, VenueXError};
pub use normalizer::{CoinbaseNormalizer, Normalizer, PrimeNormalizer, Venue};
pub use signer::{Credentials, SignRequest, SignResult, Signer};
pub use types::*;
