//! Response decompression.
//!
//! Every request advertises `br, zstd, gzip`; responses are decoded according
//! to their `Content-Encoding` chain, either aggregated or as a reader for
//! streaming straight to disk.

use std::io;

use async_compression::tokio::bufread::{BrotliDecoder, GzipDecoder, ZstdDecoder};
use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::BodyStream;
use hyper::body::Incoming;
use hyper::{HeaderMap, header, http};
use tokio::io::{AsyncBufRead, AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

/// Content encodings the client can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Br,
    Gzip,
    Zstd,
}

/// Ordered `Content-Encoding` chain, outermost first. Empty means identity.
pub fn detect_encodings(headers: &HeaderMap) -> Vec<ContentEncoding> {
    let Some(val) = headers.get(header::CONTENT_ENCODING) else {
        return Vec::new();
    };

    let Ok(raw) = val.to_str() else {
        return Vec::new();
    };

    raw.split(',')
        .filter_map(|token| match token.trim().to_ascii_lowercase().as_str() {
            "br" => Some(ContentEncoding::Br),
            "gzip" | "x-gzip" => Some(ContentEncoding::Gzip),
            "zstd" | "zst" => Some(ContentEncoding::Zstd),
            _ => None,
        })
        .collect()
}

/// Insert an `Accept-Encoding` header (`br, zstd, gzip`) if not already present.
pub fn add_accept_encoding(h: &mut HeaderMap) {
    if !h.contains_key(header::ACCEPT_ENCODING) {
        h.insert(
            header::ACCEPT_ENCODING,
            http::HeaderValue::from_static("br, zstd, gzip"),
        );
    }
}

/// Wrap a response body in the decoders its encoding chain requires.
pub fn decompress_stream(
    body: Incoming,
    encodings: &[ContentEncoding],
) -> Box<dyn AsyncBufRead + Unpin + Send> {
    let stream = BodyStream::new(body)
        .map_ok(|frame| frame.into_data().unwrap_or_default())
        .map_err(io::Error::other);
    let mut current: Box<dyn AsyncBufRead + Unpin + Send> =
        Box::new(BufReader::new(StreamReader::new(stream)));

    for encoding in encodings.iter().rev() {
        current = match encoding {
            ContentEncoding::Br => Box::new(BufReader::new(BrotliDecoder::new(current))),
            ContentEncoding::Gzip => Box::new(BufReader::new(GzipDecoder::new(current))),
            ContentEncoding::Zstd => Box::new(BufReader::new(ZstdDecoder::new(current))),
        };
    }

    current
}

/// Read and decode a whole response body.
///
/// Corrupt encoded data surfaces as [`io::ErrorKind::InvalidData`]; anything
/// else is the connection failing underneath the body.
pub async fn decompress_body(body: Incoming, encodings: &[ContentEncoding]) -> io::Result<Bytes> {
    let mut decoder = decompress_stream(body, encodings);
    let mut out = Vec::with_capacity(32 * 1024);
    decoder.read_to_end(&mut out).await?;
    Ok(Bytes::from(out))
}

/// Drop the headers that no longer describe a decoded body.
pub fn normalize_decompressed_headers(
    headers: &mut HeaderMap,
    encodings: &[ContentEncoding],
    body_len: usize,
) {
    if encodings.is_empty() {
        return;
    }

    headers.remove(header::CONTENT_ENCODING);
    if let Ok(value) = header::HeaderValue::from_str(&body_len.to_string()) {
        headers.insert(header::CONTENT_LENGTH, value);
    } else {
        headers.remove(header::CONTENT_LENGTH);
    }
}
