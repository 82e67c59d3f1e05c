//! Single-attempt delivery of a prepared payload.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue, USER_AGENT as USER_AGENT_HEADER};

use super::{DeliveryError, HttpClient, HttpRequest};

/// `User-Agent` sent with every delivery.
pub const USER_AGENT: &str = concat!("alert-courier/", env!("CARGO_PKG_VERSION"));

/// `Content-Type` sent with every delivery.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Body and credentials for one delivery.
///
/// Consumed by [`HttpDelivery::send`], so a config is sent at most once.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DeliveryConfig {
    body: Vec<u8>,
    username: String,
    password: String,
}

impl DeliveryConfig {
    /// Creates a config for `body` with no credentials.
    #[must_use]
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Sets HTTP Basic credentials.
    ///
    /// They are only sent when both are non-empty.
    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Returns the request body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the credentials that will be sent, if any.
    #[must_use]
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        (!self.username.is_empty() && !self.password.is_empty())
            .then_some((self.username.as_str(), self.password.as_str()))
    }
}

impl fmt::Debug for DeliveryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryConfig")
            .field("body_len", &self.body.len())
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .finish()
    }
}

/// Sends payloads to webhook endpoints, one attempt per call.
///
/// # Example
///
/// ```no_run
/// use alert_courier::webhook::{DeliveryConfig, HttpDelivery, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let delivery = HttpDelivery::new(ReqwestClient::new()?);
/// let url = Url::parse("https://hooks.example.com/alerts")?;
/// let config = DeliveryConfig::new(br#"{"text":"disk full"}"#.to_vec())
///     .with_basic_auth("grafana", "secret");
/// let body = delivery.send(&url, config).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpDelivery<H> {
    client: H,
}

impl<H> HttpDelivery<H> {
    /// Creates a delivery primitive over `client`.
    #[must_use]
    pub const fn new(client: H) -> Self {
        Self { client }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }
}

impl<H: HttpClient> HttpDelivery<H> {
    /// POSTs the config's body to `url` and returns the response body.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::Http`] for transport failures, unchanged
    /// - [`DeliveryError::Status`] for any non-2xx response; the body is
    ///   logged at warn level instead of being returned
    pub async fn send(&self, url: &url::Url, config: DeliveryConfig) -> Result<Vec<u8>, DeliveryError> {
        let request = build_request(url, config)?;
        let response = self.client.request(request).await?;

        if !response.is_success() {
            tracing::warn!(
                url = %url,
                status = %response.status,
                body = %response.body_lossy(),
                "HTTP request failed"
            );
            return Err(DeliveryError::Status {
                status: response.status,
            });
        }

        tracing::debug!(url = %url, status = %response.status, "Sending HTTP request succeeded");
        Ok(response.body)
    }
}

fn build_request(url: &url::Url, config: DeliveryConfig) -> Result<HttpRequest, DeliveryError> {
    let mut request = HttpRequest::post(url.clone())
        .with_header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))
        .with_header(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));

    if let Some((username, password)) = config.basic_auth() {
        let encoded = BASE64.encode(format!("{username}:{password}"));
        let mut value = HeaderValue::try_from(format!("Basic {encoded}"))
            .map_err(|e| DeliveryError::Request(e.to_string()))?;
        value.set_sensitive(true);
        request = request.with_header(AUTHORIZATION, value);
    }

    if !config.body.is_empty() {
        request = request.with_body(config.body);
    }

    Ok(request)
}
