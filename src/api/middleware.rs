//! Request-signing middleware

use super::utils::merge_query_params;
use super::Transport;
use crate::error::{Result, VenueXError};
use crate::signer::{SignRequest, Signer};
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, HOST};
use reqwest::Request;
use std::sync::Arc;
use tracing::{debug, warn};

/// Signs every request before handing it to the wrapped transport.
///
/// The signer sees the URL path without the query string, the buffered
/// body and the request's headers. A `Host` header is derived from the URL
/// when the request does not carry one. Returned headers overwrite existing
/// ones and returned query parameters are merged into the URL.
#[derive(Clone)]
pub struct SigningTransport<T> {
    inner: T,
    signer: Arc<dyn Signer>,
}

impl<T> std::fmt::Debug for SigningTransport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningTransport").finish_non_exhaustive()
    }
}

impl<T: Transport> SigningTransport<T> {
    /// Wrap `inner`, signing with `signer`
    pub fn new(inner: T, signer: Arc<dyn Signer>) -> Self {
        Self { inner, signer }
    }

    /// The wrapped transport
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Sign `request` in place without sending it
    pub async fn sign_request(&self, request: &mut Request) -> Result<()> {
        let body = match request.body() {
            None => None,
            Some(body) => Some(
                body.as_bytes()
                    .ok_or_else(|| {
                        VenueXError::signing("cannot sign a streaming request body")
                    })?
                    .to_vec(),
            ),
        };

        let mut headers = request.headers().clone();
        if !headers.contains_key(HOST) {
            if let Some(host) = host_header(request.url()) {
                headers.insert(HOST, host);
            }
        }

        let mut sign_request =
            SignRequest::new(request.method().as_str(), request.url().path()).with_headers(headers);
        if let Some(body) = body {
            sign_request = sign_request.with_body(body);
        }

        let result = self.signer.sign(&sign_request).await.map_err(|e| {
            warn!(method = %request.method(), path = %request.url().path(), error = %e, "request signing failed");
            e
        })?;

        for (name, value) in &result.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                VenueXError::signing_with_source(format!("invalid header name {:?}", name), e.into())
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                VenueXError::signing_with_source(format!("invalid value for header {}", name), e.into())
            })?;
            request.headers_mut().insert(name, value);
        }

        merge_query_params(request.url_mut(), &result.query_params);

        debug!(
            method = %request.method(),
            path = %request.url().path(),
            headers = result.headers.len(),
            query_params = result.query_params.len(),
            "signed request"
        );
        Ok(())
    }
}

fn host_header(url: &url::Url) -> Option<HeaderValue> {
    let host = url.host_str()?;
    let value = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    HeaderValue::from_str(&value).ok()
}

#[async_trait]
impl<T: Transport> Transport for SigningTransport<T> {
    type Response = T::Response;

    async fn send(&self, mut request: Request) -> Result<Self::Response> {
        self.sign_request(&mut request).await?;
        self.inner.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::{BearerConfig, BearerSigner, HmacConfig, HmacSigner, SignResult};
    use reqwest::{Body, Method, Url};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// What the inner transport received
    #[derive(Debug, Clone)]
    struct Captured {
        method: Method,
        url: Url,
        headers: reqwest::header::HeaderMap,
        body: Option<Vec<u8>>,
    }

    #[derive(Default)]
    struct EchoTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        type Response = Captured;

        async fn send(&self, request: Request) -> Result<Captured> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Captured {
                method: request.method().clone(),
                url: request.url().clone(),
                headers: request.headers().clone(),
                body: request.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec),
            })
        }
    }

    /// Returns a fixed result and records the request it saw
    struct FixedSigner {
        result: SignResult,
        seen: Mutex<Option<SignRequest>>,
    }

    impl FixedSigner {
        fn new(result: SignResult) -> Self {
            Self {
                result,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Signer for FixedSigner {
        async fn sign(&self, request: &SignRequest) -> Result<SignResult> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok(self.result.clone())
        }
    }

    struct FailingSigner;

    #[async_trait]
    impl Signer for FailingSigner {
        async fn sign(&self, _request: &SignRequest) -> Result<SignResult> {
            Err(VenueXError::signing("key unavailable"))
        }
    }

    fn request(method: Method, url: &str) -> Request {
        Request::new(method, Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_signs_path_only_and_overwrites_headers() {
        let signer = Arc::new(FixedSigner::new(
            SignResult::new()
                .with_header("Authorization", "Bearer new")
                .with_header("X-Extra", "1"),
        ));
        let transport = SigningTransport::new(EchoTransport::default(), signer.clone());

        let mut req = request(Method::POST, "https://api.coinbase.com/api/v3/brokerage/orders?preview=true");
        req.headers_mut()
            .insert("Authorization", HeaderValue::from_static("Bearer old"));
        *req.body_mut() = Some(Body::from(r#"{"product_id":"BTC-USD"}"#));

        let captured = transport.send(req).await.unwrap();

        let seen = signer.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.path, "/api/v3/brokerage/orders");
        assert_eq!(seen.body.as_deref(), Some(br#"{"product_id":"BTC-USD"}"#.as_slice()));
        assert_eq!(seen.timestamp, "");
        assert_eq!(seen.host(), Some("api.coinbase.com"));

        assert_eq!(captured.headers.get("authorization").unwrap(), "Bearer new");
        assert_eq!(captured.headers.get("x-extra").unwrap(), "1");
        assert_eq!(captured.headers.get_all("authorization").iter().count(), 1);
        assert_eq!(captured.body.as_deref(), Some(br#"{"product_id":"BTC-USD"}"#.as_slice()));
        assert_eq!(captured.url.query(), Some("preview=true"));
    }

    #[tokio::test]
    async fn test_merges_query_params() {
        let signer = Arc::new(FixedSigner::new(
            SignResult::new()
                .with_query_param("signature", "abc")
                .with_query_param("limit", "50"),
        ));
        let transport = SigningTransport::new(EchoTransport::default(), signer);

        let captured = transport
            .send(request(Method::GET, "https://x.io/v1/orders?limit=10&symbol=BTC"))
            .await
            .unwrap();

        let pairs: Vec<(String, String)> = captured.url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("symbol".to_string(), "BTC".to_string()),
                ("limit".to_string(), "50".to_string()),
                ("signature".to_string(), "abc".to_string()),
            ]
        );
        assert_eq!(captured.method, Method::GET);
    }

    #[tokio::test]
    async fn test_signer_failure_is_not_forwarded() {
        let inner = Arc::new(EchoTransport::default());
        let transport = SigningTransport::new(inner.clone(), Arc::new(FailingSigner));

        let err = transport
            .send(request(Method::GET, "https://x.io/orders"))
            .await
            .unwrap_err();

        assert!(matches!(err, VenueXError::Signing { .. }));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_header_from_signer() {
        let signer = Arc::new(FixedSigner::new(SignResult::new().with_header("bad header", "v")));
        let inner = Arc::new(EchoTransport::default());
        let transport = SigningTransport::new(inner.clone(), signer);

        let err = transport
            .send(request(Method::GET, "https://x.io/"))
            .await
            .unwrap_err();
        assert!(matches!(err, VenueXError::Signing { .. }));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_explicit_host_and_port() {
        let signer = Arc::new(FixedSigner::new(SignResult::new()));
        let transport = SigningTransport::new(EchoTransport::default(), signer.clone());

        transport
            .send(request(Method::GET, "http://localhost:8080/health"))
            .await
            .unwrap();
        assert_eq!(
            signer.seen.lock().unwrap().as_ref().unwrap().host(),
            Some("localhost:8080")
        );

        let mut req = request(Method::GET, "https://x.io/health");
        req.headers_mut()
            .insert(HOST, HeaderValue::from_static("proxy.internal"));
        transport.send(req).await.unwrap();
        assert_eq!(
            signer.seen.lock().unwrap().as_ref().unwrap().host(),
            Some("proxy.internal")
        );
    }

    #[tokio::test]
    async fn test_with_real_signers() {
        let hmac = HmacSigner::new(HmacConfig::new("key", "c2VjcmV0", "pass")).unwrap();
        let transport = SigningTransport::new(EchoTransport::default(), Arc::new(hmac));
        let captured = transport
            .send(request(Method::GET, "https://api.exchange.coinbase.com/orders"))
            .await
            .unwrap();
        assert_eq!(captured.headers.get("CB-ACCESS-KEY").unwrap(), "key");
        assert!(captured.headers.contains_key("CB-ACCESS-SIGN"));

        let bearer = BearerSigner::new(BearerConfig::new("tok")).unwrap();
        let transport = SigningTransport::new(EchoTransport::default(), Arc::new(bearer));
        let captured = transport
            .send(request(Method::DELETE, "https://x.io/quotes/1"))
            .await
            .unwrap();
        assert_eq!(captured.headers.get("authorization").unwrap(), "Bearer tok");
    }
}
