use std::convert::Infallible;

use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Frame, Incoming};
use hyper::{Request, Response, header};
use tokio::time::{Duration, timeout};
use tokio_util::io::ReaderStream;
use tracing::{debug, trace};

use crate::common::compression::{
    add_accept_encoding, decompress_body, detect_encodings, normalize_decompressed_headers,
};
use crate::common::http::{HyperClient, RequestBodyStream, build_hyper_client};
use crate::error::DavError;
use crate::request::{DavRequest, RequestBody, redacted};

/// Thin adapter over the pooled hyper client.
///
/// It turns a [`DavRequest`] into a wire request, applies the timeout and
/// hands back the raw response. Status codes are not interpreted here.
///
/// Cloning `WebDavClient` is cheap and reuses the same connection pool.
#[derive(Clone)]
pub struct WebDavClient {
    client: HyperClient,
    default_timeout: Option<Duration>,
}

impl Default for WebDavClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WebDavClient {
    pub fn new() -> Self {
        Self::with_client(build_hyper_client())
    }

    pub fn with_client(client: HyperClient) -> Self {
        Self {
            client,
            default_timeout: None,
        }
    }

    /// Timeout applied when a request carries none of its own. `None` waits indefinitely.
    pub fn set_default_timeout(&mut self, timeout: Option<Duration>) {
        self.default_timeout = timeout;
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    async fn body_for(&self, body: &RequestBody) -> Result<(RequestBodyStream, Option<u64>), DavError> {
        match body {
            RequestBody::Empty => Ok((full(Bytes::new()), None)),
            RequestBody::Bytes(bytes) => Ok((full(bytes.clone()), None)),
            RequestBody::File(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| DavError::local_read(path, e))?;
                let len = file
                    .metadata()
                    .await
                    .map_err(|e| DavError::local_read(path, e))?
                    .len();
                let stream = ReaderStream::new(file).map_ok(Frame::data);
                Ok((StreamBody::new(stream).boxed(), Some(len)))
            }
        }
    }

    async fn dispatch(&self, req: DavRequest) -> Result<Response<Incoming>, DavError> {
        let mut headers = req.headers;
        add_accept_encoding(&mut headers);

        if matches!(req.body, RequestBody::Bytes(_)) && !headers.contains_key(header::CONTENT_TYPE)
        {
            headers.insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/xml; charset=utf-8"),
            );
        }

        let (body, file_len) = self.body_for(&req.body).await?;
        if let Some(len) = file_len
            && let Ok(value) = header::HeaderValue::from_str(&len.to_string())
        {
            headers.insert(header::CONTENT_LENGTH, value);
        }

        debug!(method = %req.method, uri = %req.uri, "sending request");
        trace!(
            headers = ?redacted(&headers),
            body = ?req.body.as_bytes().map(|b| String::from_utf8_lossy(b).into_owned()),
            "request details"
        );

        let mut builder = Request::builder().method(req.method.clone()).uri(req.uri.clone());
        for (k, v) in headers.iter() {
            builder = builder.header(k, v);
        }
        let wire = builder
            .body(body)
            .map_err(|e| DavError::Encoding(e.to_string()))?;

        let fut = self.client.request(wire);
        let result = match req.timeout.or(self.default_timeout) {
            Some(limit) => timeout(limit, fut)
                .await
                .map_err(|_| DavError::timed_out())?,
            None => fut.await,
        };
        let resp = result.map_err(|e| DavError::from_transport(&e))?;

        debug!(method = %req.method, uri = %req.uri, status = resp.status().as_u16(), "response received");
        trace!(headers = ?resp.headers(), "response headers");
        Ok(resp)
    }

    // ----------- Aggregated send (Bytes) with automatic decompression -----------

    /// Generic **aggregated send** with automatic decompression (br/zstd/gzip).
    ///
    /// The timeout covers the whole exchange, body included.
    pub async fn send(&self, req: DavRequest) -> Result<Response<Bytes>, DavError> {
        match req.timeout.or(self.default_timeout) {
            Some(limit) => timeout(limit, self.exchange(req))
                .await
                .map_err(|_| DavError::timed_out())?,
            None => self.exchange(req).await,
        }
    }

    async fn exchange(&self, req: DavRequest) -> Result<Response<Bytes>, DavError> {
        let resp = self.dispatch(req).await?;

        let encodings = detect_encodings(resp.headers());
        let (mut parts, body) = resp.into_parts();

        let decompressed = decompress_body(body, &encodings)
            .await
            .map_err(|e| DavError::from_body_read(&e))?;
        normalize_decompressed_headers(&mut parts.headers, &encodings, decompressed.len());
        trace!(
            body = %String::from_utf8_lossy(&decompressed),
            "response body"
        );

        Ok(Response::from_parts(parts, decompressed))
    }

    // ----------- Streaming send -----------

    /// Generic **streaming send**. Returns a `Response<Incoming>` (not aggregated).
    pub async fn send_stream(&self, req: DavRequest) -> Result<Response<Incoming>, DavError> {
        self.dispatch(req).await
    }
}

fn full(bytes: Bytes) -> RequestBodyStream {
    Full::new(bytes)
        .map_err(|never: Infallible| match never {})
        .boxed()
}
