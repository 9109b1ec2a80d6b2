//! Transport-neutral request description plus the shared header and
//! percent-encoding rules used by every builder.

use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;
use hyper::header::{self, HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::context::{RequestContext, RequestOptions};
use crate::error::DavError;
use crate::webdav::types::Depth;

pub const CONTENT_TYPE_XML: &str = "application/xml";
pub const CONTENT_TYPE_TEXT_XML: &str = "text/xml";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Characters escaped inside a path. Slashes are kept as separators.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Characters escaped in a whole URL that sits in a header or query.
const QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Characters escaped in a single query-string value.
const QUERY_VALUE: &AsciiSet = &QUERY.add(b'&').add(b'=').add(b'+').add(b'?').add(b'/');

pub fn encode_path(raw: &str) -> String {
    utf8_percent_encode(raw, PATH).to_string()
}

pub fn encode_query(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY).to_string()
}

pub fn encode_query_value(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_VALUE).to_string()
}

pub(crate) fn trim_slashes(raw: &str) -> &str {
    raw.trim_matches('/')
}

/// Apply the trailing-separator rule for `PROPFIND`: depth 1 targets a
/// container and always ends with `/`, depth 0 never does.
pub fn normalize_for_depth(path: &str, depth: Depth) -> String {
    match depth {
        Depth::One => {
            if path.ends_with('/') {
                path.to_string()
            } else {
                format!("{path}/")
            }
        }
        Depth::Zero => {
            let trimmed = path.trim_end_matches('/');
            if trimmed.is_empty() {
                "/".to_string()
            } else {
                trimmed.to_string()
            }
        }
        Depth::Infinity => path.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Bytes(Bytes),
    /// Streamed from disk when sent.
    File(PathBuf),
}

impl RequestBody {
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            RequestBody::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// Fully described request, produced by the builders and consumed by the transport.
#[derive(Debug, Clone)]
pub struct DavRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: RequestBody,
    pub timeout: Option<Duration>,
}

impl DavRequest {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = RequestBody::Bytes(body.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.body = RequestBody::File(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_str(&self) -> Option<&str> {
        self.body
            .as_bytes()
            .and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Set an operation header, replacing whatever the standard set carried.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), DavError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| DavError::Encoding(format!("header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| DavError::Encoding(format!("header {name}: {e}")))?;
        self.headers.insert(header_name, value);
        Ok(())
    }
}

/// Request on `raw_path` (unencoded server path) carrying the standard headers
/// and the effective timeout.
pub fn base_request(
    ctx: &RequestContext,
    opts: &RequestOptions,
    method: Method,
    raw_path: &str,
) -> Result<DavRequest, DavError> {
    let uri = ctx.url_for_path(raw_path)?;
    let headers = standard_headers(ctx, opts)?;
    Ok(DavRequest::new(method, uri, headers).with_timeout(opts.timeout.or(ctx.request_timeout)))
}

pub fn method(name: &'static str) -> Result<Method, DavError> {
    Method::from_bytes(name.as_bytes()).map_err(|e| DavError::Encoding(e.to_string()))
}

pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Authorization, user agent and OCS marker, then context headers, then
/// per-call custom headers. Later entries win on collision.
pub fn standard_headers(
    ctx: &RequestContext,
    opts: &RequestOptions,
) -> Result<HeaderMap, DavError> {
    let mut headers = HeaderMap::new();

    let token = B64.encode(format!("{}:{}", ctx.user, ctx.password));
    headers.insert(header::AUTHORIZATION, header_value(&format!("Basic {token}"))?);

    let user_agent = opts
        .custom_user_agent
        .clone()
        .or_else(|| ctx.user_agent.clone())
        .unwrap_or_else(default_user_agent);
    headers.insert(header::USER_AGENT, header_value(&user_agent)?);
    headers.insert(
        HeaderName::from_static("ocs-apirequest"),
        HeaderValue::from_static("true"),
    );

    for (name, value) in ctx.headers.iter().chain(opts.custom_headers.iter()) {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| DavError::Encoding(format!("header name {name}: {e}")))?;
        headers.insert(name, header_value(value)?);
    }

    Ok(headers)
}

fn header_value(raw: &str) -> Result<HeaderValue, DavError> {
    HeaderValue::from_str(raw).map_err(|e| DavError::Encoding(format!("header value: {e}")))
}

/// Copy of `headers` safe to log.
pub fn redacted(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in [header::AUTHORIZATION, header::COOKIE] {
        if out.contains_key(&name) {
            out.insert(name, HeaderValue::from_static("<redacted>"));
        }
    }
    out
}

/// Case-insensitive header lookup returning the first value as text.
pub fn find_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
