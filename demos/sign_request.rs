//! Sign request example
//!
//! Signs the same request with every authentication scheme and prints the
//! resulting headers. Nothing is sent over the network.

use std::sync::Arc;
use tracing::info;
use venuex_rust_sdk::signer::{
    BearerConfig, BearerSigner, HmacConfig, HmacSigner, MpcConfig, MpcSigner, Sha256MessageSigner,
};
use venuex_rust_sdk::{SignRequest, Signer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let request = SignRequest::new("POST", "/api/v3/brokerage/orders")
        .with_body(r#"{"product_id":"BTC-USD","side":"BUY"}"#)
        .with_timestamp("1234567890");

    let signers: Vec<(&str, Box<dyn Signer>)> = vec![
        (
            "hmac",
            Box::new(HmacSigner::new(HmacConfig::new(
                "demo-key",
                "c2VjcmV0",
                "demo-passphrase",
            ))?) as Box<dyn Signer>,
        ),
        (
            "bearer",
            Box::new(BearerSigner::new(BearerConfig::new("demo-token"))?) as Box<dyn Signer>,
        ),
        (
            "mpc",
            Box::new(MpcSigner::new(MpcConfig::new(
                "demo-key",
                Arc::new(Sha256MessageSigner),
            ))?) as Box<dyn Signer>,
        ),
    ];

    for (name, signer) in &signers {
        let result = signer.sign(&request).await?;
        let mut headers: Vec<_> = result.headers.iter().collect();
        headers.sort();
        info!("{} signer:", name);
        for (header, value) in headers {
            info!("  {}: {}", header, value);
        }
    }

    // JWT needs a real EC key; load it from the environment when present
    match std::env::var("COINBASE_PRIVATE_KEY") {
        Ok(key) => {
            let key_name = std::env::var("COINBASE_KEY_NAME").unwrap_or_default();
            let signer = venuex_rust_sdk::signer::JwtSigner::new(
                venuex_rust_sdk::signer::JwtConfig::new(key_name, key),
            )?;
            let result = signer.sign(&request).await?;
            info!("jwt signer: Authorization={:?}", result.header("Authorization"));
        }
        Err(_) => info!("jwt signer skipped (COINBASE_PRIVATE_KEY not set)"),
    }

    Ok(())
}
