//! Typed HTTP request layer for Courier.
//!
//! One executor, one envelope: describe a call with an [`ApiRequest`],
//! hand it to [`ApiClient::perform`], and get back an [`Envelope`]
//! holding exactly one of the decoded payload, the API's own error
//! payload, or the local failure.

pub mod client;
pub mod request;
pub mod response;

pub use client::{build_client, ApiClient, HttpConfig, HttpError};
pub use request::{headers, ApiRequest};
pub use response::{ApiErrorPayload, Envelope, EnvelopeError, RequestError};
