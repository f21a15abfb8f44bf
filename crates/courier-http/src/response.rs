//! Response envelope and error taxonomy.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Everything the executor can tell the caller about one round trip.
///
/// At most one of `data`, `api_error`, and `error` is populated; the
/// constructors keep that invariant.
#[derive(Debug)]
pub struct Envelope<T> {
    /// Decoded success payload (2xx with a well-formed body).
    pub data: Option<T>,
    /// Decoded API error payload (non-2xx with a well-formed body).
    pub api_error: Option<ApiErrorPayload>,
    /// Local, transport, or decode failure.
    pub error: Option<RequestError>,
    /// Raw HTTP status, 0 when no response was received.
    pub status: u16,
    /// Whether `status` is in the 2xx range.
    pub is_success: bool,
}

fn status_is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

impl<T> Envelope<T> {
    pub(crate) fn success(status: u16, data: T) -> Self {
        Self {
            data: Some(data),
            api_error: None,
            error: None,
            status,
            is_success: status_is_success(status),
        }
    }

    pub(crate) fn api_failure(status: u16, payload: ApiErrorPayload) -> Self {
        Self {
            data: None,
            api_error: Some(payload),
            error: None,
            status,
            is_success: status_is_success(status),
        }
    }

    pub(crate) fn failure(status: u16, error: RequestError) -> Self {
        Self {
            data: None,
            api_error: None,
            error: Some(error),
            status,
            is_success: status_is_success(status),
        }
    }

    /// Collapse the envelope into a `Result` for `?`-style call sites.
    pub fn into_result(self) -> Result<T, EnvelopeError> {
        if let Some(data) = self.data {
            return Ok(data);
        }
        if let Some(payload) = self.api_error {
            return Err(EnvelopeError::Api(payload));
        }
        Err(EnvelopeError::Request(
            self.error.unwrap_or(RequestError::Unknown),
        ))
    }
}

/// Failure side of [`Envelope::into_result`].
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The server answered with a decodable error payload.
    #[error("{0}")]
    Api(ApiErrorPayload),
    /// The request failed locally or in transit.
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// The fixed shape error responses decode into.
///
/// Unknown fields are ignored so the shape survives server additions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorPayload {
    /// Machine-readable error code.
    pub code: Option<i64>,
    /// Human-readable summary.
    pub message: Option<String>,
    /// Per-field detail lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl fmt::Display for ApiErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error")?;
        if let Some(code) = self.code {
            write!(f, " {code}")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        for line in &self.errors {
            write!(f, "\n  - {line}")?;
        }
        Ok(())
    }
}

/// Ways a round trip can fail outside the API's own error payload.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request body could not be encoded; no call was made.
    #[error("failed to encode request body to JSON: {0}")]
    EncodeBody(#[source] serde_json::Error),

    /// The request never completed.
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Read(#[source] reqwest::Error),

    /// The body did not match the expected schema.
    #[error("failed to decode response (status {status}): {source}")]
    Decode {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The call produced neither a body nor a transport error.
    #[error("request completed with no body and no error")]
    Unknown,
}

/// Decode a response body according to the status code.
///
/// A 2xx body decodes into `T`, anything else into [`ApiErrorPayload`].
/// Either decode failure lands in the envelope's `error` slot. An empty
/// body yields [`RequestError::Unknown`].
pub(crate) fn decode_body<T: DeserializeOwned>(status: u16, bytes: &[u8]) -> Envelope<T> {
    if bytes.is_empty() {
        return Envelope::failure(status, RequestError::Unknown);
    }

    if status_is_success(status) {
        match serde_json::from_slice(bytes) {
            Ok(data) => Envelope::success(status, data),
            Err(source) => Envelope::failure(status, decode_error(status, bytes, source)),
        }
    } else {
        match serde_json::from_slice::<ApiErrorPayload>(bytes) {
            Ok(payload) => {
                tracing::warn!("api error payload (status {}): {}", status, payload);
                Envelope::api_failure(status, payload)
            }
            Err(source) => Envelope::failure(status, decode_error(status, bytes, source)),
        }
    }
}

fn decode_error(status: u16, bytes: &[u8], source: serde_json::Error) -> RequestError {
    RequestError::Decode {
        status,
        body: String::from_utf8_lossy(bytes).into_owned(),
        source,
    }
}
