//! Production HTTP client implementation using reqwest.

use std::time::Duration;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Transport settings shared by every delivery.
///
/// The defaults are the fixed policy used for all notification endpoints.
///
/// There is no separate TLS handshake budget: reqwest applies
/// `connect_timeout` to the whole connector, so TCP connect and handshake
/// share that single bound (see [`TransportPolicy::handshake_bound`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportPolicy {
    /// Bound on establishing a connection (TCP connect and TLS handshake).
    pub connect_timeout: Duration,
    /// Bound on the whole exchange: connect, send, and reading the response.
    pub request_timeout: Duration,
    /// Whether `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` are honoured.
    pub use_env_proxy: bool,
}

impl TransportPolicy {
    /// Default connection establishment bound.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default overall request bound.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Returns the longest a TLS handshake may take under this policy.
    ///
    /// Equal to `connect_timeout`, which covers the handshake too.
    #[must_use]
    pub const fn handshake_bound(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the policy with environment proxies ignored.
    #[must_use]
    pub const fn without_env_proxy(mut self) -> Self {
        self.use_env_proxy = false;
        self
    }
}

impl Default for TransportPolicy {
    fn default() -> Self {
        Self {
            connect_timeout: Self::CONNECT_TIMEOUT,
            request_timeout: Self::REQUEST_TIMEOUT,
            use_env_proxy: true,
        }
    }
}

/// Production HTTP client using reqwest.
///
/// # Example
///
/// ```no_run
/// use alert_courier::webhook::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new()?;
/// let url = Url::parse("https://hooks.example.com/alerts")?;
/// let request = HttpRequest::post(url).with_body(b"{}".to_vec());
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    policy: TransportPolicy,
}

impl ReqwestClient {
    /// Creates a client with the default [`TransportPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Client`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_policy(TransportPolicy::default())
    }

    /// Creates a client with the given transport policy.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Client`] if the TLS backend cannot be initialised.
    pub fn with_policy(policy: TransportPolicy) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(policy.connect_timeout)
            .timeout(policy.request_timeout);

        if !policy.use_env_proxy {
            builder = builder.no_proxy();
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self { inner, policy })
    }

    /// Returns the transport policy this client was built with.
    #[must_use]
    pub const fn policy(&self) -> &TransportPolicy {
        &self.policy
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .inner
            .request(req.method, req.url.as_str())
            .headers(req.headers);

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        // Reading to the end releases the connection on success and error alike.
        let body = response
            .bytes()
            .await
            .map_err(map_reqwest_error)?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}
