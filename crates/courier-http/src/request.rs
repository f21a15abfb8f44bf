//! HTTP request descriptors.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::Serialize;

/// Header values every request carries.
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const ACCEPT_JSON: &str = "application/json";
    pub const ENCODING_GZIP: &str = "gzip";
}

/// One API call described as data.
///
/// `P` is the body type; bodiless requests leave it at the `()` default
/// so call sites never need a turbofish.
#[derive(Debug, Clone)]
pub struct ApiRequest<'a, P: Serialize = ()> {
    pub method: Method,
    pub url: &'a str,
    pub headers: Option<&'a HashMap<String, String>>,
    pub body: Option<&'a P>,
}

impl<'a> ApiRequest<'a> {
    /// Start a bodiless request.
    pub fn new(method: Method, url: &'a str) -> Self {
        Self {
            method,
            url,
            headers: None,
            body: None,
        }
    }
}

impl<'a, P: Serialize> ApiRequest<'a, P> {
    /// Attach caller headers. The fixed set still wins on conflict.
    pub fn headers(mut self, headers: &'a HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Attach a JSON body, rebinding the body type parameter.
    pub fn body<Q: Serialize>(self, body: &'a Q) -> ApiRequest<'a, Q> {
        ApiRequest {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: Some(body),
        }
    }
}

/// Parse the target URL.
///
/// WHATWG parsing percent-encodes whatever the caller left raw (spaces
/// and friends in the path or query).
///
/// # Panics
///
/// Panics if `url` is not an absolute URL. A malformed request target is
/// a programming error, not a runtime condition.
pub(crate) fn parse_url(url: &str) -> Url {
    Url::parse(url).unwrap_or_else(|e| panic!("invalid request URL {url:?}: {e}"))
}

/// Merge caller headers with the fixed set.
///
/// Caller entries go in first and the fixed three after, so the fixed
/// values win on conflict. Iteration order across caller entries is
/// whatever the map yields. Entries that are not valid header
/// names/values are skipped.
pub(crate) fn build_headers(caller: Option<&HashMap<String, String>>) -> HeaderMap {
    let mut map = HeaderMap::new();

    if let Some(caller) = caller {
        for (name, value) in caller {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                map.insert(name, value);
            }
        }
    }

    map.insert(ACCEPT, HeaderValue::from_static(headers::ACCEPT_JSON));
    map.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(headers::CONTENT_TYPE_JSON),
    );
    // Redundant with reqwest's gzip support, but always sent.
    map.insert(
        ACCEPT_ENCODING,
        HeaderValue::from_static(headers::ENCODING_GZIP),
    );

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_percent_encodes() {
        let url = parse_url("https://api.example.com/search term?q=rust http");
        assert_eq!(url.path(), "/search%20term");
        assert_eq!(url.query(), Some("q=rust%20http"));
    }

    #[test]
    #[should_panic(expected = "invalid request URL")]
    fn test_parse_url_rejects_relative() {
        parse_url("/users/usr_1");
    }

    #[test]
    fn test_fixed_headers_always_present() {
        let map = build_headers(None);
        assert_eq!(map.get(ACCEPT).unwrap(), headers::ACCEPT_JSON);
        assert_eq!(map.get(CONTENT_TYPE).unwrap(), headers::CONTENT_TYPE_JSON);
        assert_eq!(map.get(ACCEPT_ENCODING).unwrap(), headers::ENCODING_GZIP);
    }

    #[test]
    fn test_fixed_headers_win_over_caller() {
        let mut caller = HashMap::new();
        caller.insert("Content-Type".to_string(), "text/plain".to_string());
        caller.insert("Accept".to_string(), "text/html".to_string());

        let map = build_headers(Some(&caller));
        assert_eq!(map.get(CONTENT_TYPE).unwrap(), headers::CONTENT_TYPE_JSON);
        assert_eq!(map.get(ACCEPT).unwrap(), headers::ACCEPT_JSON);
    }

    #[test]
    fn test_caller_headers_pass_through() {
        let mut caller = HashMap::new();
        caller.insert("Authorization".to_string(), "Bearer tok".to_string());
        caller.insert("X-Trace-Id".to_string(), "trc_42".to_string());

        let map = build_headers(Some(&caller));
        assert_eq!(map.get("Authorization").unwrap(), "Bearer tok");
        assert_eq!(map.get("X-Trace-Id").unwrap(), "trc_42");
    }

    #[test]
    fn test_invalid_caller_header_skipped() {
        let mut caller = HashMap::new();
        caller.insert("bad name".to_string(), "value".to_string());
        caller.insert("X-Ok".to_string(), "value".to_string());

        let map = build_headers(Some(&caller));
        assert!(map.get("bad name").is_none());
        assert_eq!(map.get("X-Ok").unwrap(), "value");
    }

    #[test]
    fn test_body_rebinds_type() {
        #[derive(serde::Serialize)]
        struct Payload {
            note: &'static str,
        }

        let payload = Payload { note: "hi" };
        let request = ApiRequest::new(Method::POST, "https://api.example.com/notes").body(&payload);
        assert!(request.body.is_some());
        assert_eq!(request.method, Method::POST);
    }
}
