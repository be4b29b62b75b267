//! Outbound HTTP transport abstraction

use crate::error::Result;
use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use tracing::debug;

/// Sends fully built HTTP requests.
///
/// Implemented for [`reqwest::Client`]; wrap it in
/// [`super::SigningTransport`] to authenticate every request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Response produced by this transport
    type Response: Send;

    /// Send `request` and return the response
    async fn send(&self, request: Request) -> Result<Self::Response>;
}

#[async_trait]
impl Transport for Client {
    type Response = Response;

    async fn send(&self, request: Request) -> Result<Response> {
        debug!("{} {}", request.method(), request.url());
        Ok(self.execute(request).await?)
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    type Response = T::Response;

    async fn send(&self, request: Request) -> Result<Self::Response> {
        (**self).send(request).await
    }
}
