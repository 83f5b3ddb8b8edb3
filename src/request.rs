//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE};
use http::request::Parts;
use http::{HeaderMap, Uri};

use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        parts: Parts,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, uri: parts.uri, headers: parts.headers, body, params }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    /// Case-insensitive header lookup. Values that are not visible ASCII
    /// are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The media type without parameters, lowercased (e.g. `multipart/form-data`).
    pub fn media_type(&self) -> Option<String> {
        let value = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let essence = value.split(';').next()?.trim();
        Some(essence.to_ascii_lowercase())
    }

    /// The raw `content-type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/person/{person_id}`, `req.param("person_id")` on
    /// `/person/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Percent-decoded query parameter. For a repeated key the last value wins.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .filter(|(k, _)| k == key)
            .last()
            .map(|(_, v)| v.into_owned())
    }

    /// Value of a cookie sent in any `cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.trim_matches('"'))
    }
}

#[cfg(test)]
pub(crate) fn fixture(method: Method, uri: &str, headers: &[(&str, &str)], body: &[u8]) -> Request {
    let mut builder = http::Request::builder().uri(uri);
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }
    let (parts, ()) = builder.body(()).unwrap().into_parts();
    Request::new(method, parts, Bytes::copy_from_slice(body), HashMap::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_decoded_and_last_value_wins() {
        let req = fixture(Method::Get, "/person/detail?name=John%20Doe&age=1&age=25", &[], b"");
        assert_eq!(req.query("name").as_deref(), Some("John Doe"));
        assert_eq!(req.query("age").as_deref(), Some("25"));
        assert_eq!(req.query("missing"), None);
    }

    #[test]
    fn query_without_query_string() {
        let req = fixture(Method::Get, "/person/detail", &[], b"");
        assert_eq!(req.query("age"), None);
    }

    #[test]
    fn cookies_are_split_across_pairs_and_headers() {
        let req = fixture(
            Method::Post,
            "/contact",
            &[("cookie", "session=abc; ads=\"on\""), ("cookie", "theme=dark")],
            b"",
        );
        assert_eq!(req.cookie("ads"), Some("on"));
        assert_eq!(req.cookie("theme"), Some("dark"));
        assert_eq!(req.cookie("nope"), None);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = fixture(Method::Get, "/", &[("User-Agent", "curl/8.0")], b"");
        assert_eq!(req.header("user-agent"), Some("curl/8.0"));
    }

    #[test]
    fn media_type_strips_parameters() {
        let req = fixture(
            Method::Post,
            "/post-image",
            &[("content-type", "Multipart/Form-Data; boundary=X")],
            b"",
        );
        assert_eq!(req.media_type().as_deref(), Some("multipart/form-data"));
        assert_eq!(req.content_type(), Some("Multipart/Form-Data; boundary=X"));
    }
}
