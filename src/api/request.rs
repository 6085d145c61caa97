//! Request building blocks
//!
//! Verbs, per-call overrides, endpoint descriptors, and the small path
//! helpers resource modules use to build endpoints.

use std::collections::BTreeMap;
use std::fmt;

/// HTTP verb for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Static description of one resource operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Path template, `{id}` marks the interpolated identifier
    pub path: &'static str,
    pub method: Method,
    pub has_body: bool,
    pub has_query: bool,
}

impl EndpointDescriptor {
    pub const fn read(path: &'static str) -> Self {
        Self {
            path,
            method: Method::Get,
            has_body: false,
            has_query: false,
        }
    }

    pub const fn query(path: &'static str) -> Self {
        Self {
            path,
            method: Method::Get,
            has_body: false,
            has_query: true,
        }
    }

    pub const fn write(path: &'static str, method: Method) -> Self {
        Self {
            path,
            method,
            has_body: true,
            has_query: false,
        }
    }

    pub const fn remove(path: &'static str) -> Self {
        Self {
            path,
            method: Method::Delete,
            has_body: false,
            has_query: false,
        }
    }

    /// Fill the `{id}` placeholder with a URL-encoded identifier
    pub fn render(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => self.path.replace("{id}", &encode_segment(id)),
            None => self.path.to_string(),
        }
    }

    /// Options carrying this descriptor's verb and the given body
    pub fn options(&self, body: Option<String>) -> RequestOptions {
        RequestOptions {
            method: Some(self.method),
            body: if self.has_body { body } else { None },
            headers: BTreeMap::new(),
        }
    }
}

/// Per-call overrides applied on top of the client defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Verb; `None` means GET
    pub method: Option<Method>,
    /// Already-serialized body, sent as-is
    pub body: Option<String>,
    /// Extra headers, overriding defaults by name
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn effective_method(&self) -> Method {
        self.method.unwrap_or_default()
    }
}

/// Merge per-call headers onto defaults.
///
/// Names compare case-insensitively; an override replaces any default with
/// the same name and keeps its own spelling.
pub fn merge_headers(
    defaults: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = defaults.clone();
    for (name, value) in overrides {
        merged.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        merged.insert(name.clone(), value.clone());
    }
    merged
}

/// Percent-encode one path segment
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Append `?k=v&..` to a path. Empty filters leave the path untouched.
pub fn with_query<'a, I, K, V>(path: &str, filters: I) -> String
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: AsRef<str> + ?Sized + 'a,
    V: AsRef<str> + ?Sized + 'a,
{
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in filters {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    let query = serializer.finish();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}
