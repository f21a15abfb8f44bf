//! HTTP client configuration and the request executor.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::request::{build_headers, parse_url, ApiRequest};
use crate::response::{decode_body, Envelope, RequestError};

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Enable gzip decompression.
    pub gzip: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("courier/{}", env!("CARGO_PKG_VERSION")),
            pool_max_idle_per_host: 10,
            gzip: true,
        }
    }
}

/// Build a configured HTTP client.
pub fn build_client(config: HttpConfig) -> Result<Client, HttpError> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .pool_max_idle_per_host(config.pool_max_idle_per_host);

    if config.gzip {
        builder = builder.gzip(true);
    }

    builder.build().map_err(HttpError::ClientBuild)
}

/// Errors raised before any request is issued.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Shared executor for API requests.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Client,
}

impl ApiClient {
    /// Create a new client with default config.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new client with custom config.
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        let inner = build_client(config)?;
        Ok(Self { inner })
    }

    /// Get the inner reqwest client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Execute one request and fold the outcome into an [`Envelope`].
    ///
    /// The future resolves exactly once; dropping it is the only
    /// cancellation. A body that fails to encode short-circuits with
    /// [`RequestError::EncodeBody`] and no network call is made.
    ///
    /// # Panics
    ///
    /// Panics if the request URL cannot be parsed.
    pub async fn perform<R, P>(&self, request: ApiRequest<'_, P>) -> Envelope<R>
    where
        R: DeserializeOwned,
        P: Serialize,
    {
        let url = parse_url(request.url);
        let headers = build_headers(request.headers);
        let mut builder = self
            .inner
            .request(request.method.clone(), url)
            .headers(headers);

        if let Some(body) = request.body {
            match serde_json::to_vec(body) {
                Ok(encoded) => builder = builder.body(encoded),
                Err(e) => return Envelope::failure(0, RequestError::EncodeBody(e)),
            }
        }

        tracing::debug!("issuing {} {}", request.method, request.url);
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Envelope::failure(0, RequestError::Transport(e)),
        };

        let status = response.status().as_u16();
        tracing::debug!("response {} for {}", status, request.url);
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Envelope::failure(status, RequestError::Read(e)),
        };

        decode_body(status, &bytes)
    }

    /// Callback form of [`ApiClient::perform`].
    ///
    /// Spawns the round trip on the runtime and invokes `handler`
    /// exactly once with the envelope. The returned handle supports
    /// abort; no other control is exposed.
    pub fn dispatch<R, P, F>(
        &self,
        method: Method,
        url: impl Into<String>,
        body: Option<P>,
        headers: Option<HashMap<String, String>>,
        handler: F,
    ) -> tokio::task::JoinHandle<()>
    where
        R: DeserializeOwned + Send + 'static,
        P: Serialize + Send + Sync + 'static,
        F: FnOnce(Envelope<R>) + Send + 'static,
    {
        let client = self.clone();
        let url = url.into();
        tokio::spawn(async move {
            let mut request = ApiRequest::new(method, &url);
            if let Some(headers) = &headers {
                request = request.headers(headers);
            }
            let envelope = match &body {
                Some(body) => client.perform(request.body(body)).await,
                None => client.perform(request).await,
            };
            handler(envelope);
        })
    }

    /// GET `url` and decode a JSON payload.
    pub async fn get<R>(&self, url: &str, headers: Option<&HashMap<String, String>>) -> Envelope<R>
    where
        R: DeserializeOwned,
    {
        let mut request = ApiRequest::new(Method::GET, url);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        self.perform(request).await
    }

    /// POST a JSON body to `url`.
    pub async fn post<R, P>(
        &self,
        url: &str,
        body: &P,
        headers: Option<&HashMap<String, String>>,
    ) -> Envelope<R>
    where
        R: DeserializeOwned,
        P: Serialize,
    {
        let mut request = ApiRequest::new(Method::POST, url).body(body);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        self.perform(request).await
    }

    /// PUT a JSON body to `url`.
    pub async fn put<R, P>(
        &self,
        url: &str,
        body: &P,
        headers: Option<&HashMap<String, String>>,
    ) -> Envelope<R>
    where
        R: DeserializeOwned,
        P: Serialize,
    {
        let mut request = ApiRequest::new(Method::PUT, url).body(body);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        self.perform(request).await
    }

    /// DELETE `url` and decode a JSON payload.
    pub async fn delete<R>(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> Envelope<R>
    where
        R: DeserializeOwned,
    {
        let mut request = ApiRequest::new(Method::DELETE, url);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        self.perform(request).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new().expect("failed to create HTTP client")
    }
}
