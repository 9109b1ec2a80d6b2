use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;

/// Request body type: either buffered bytes or a file streamed from disk.
pub type RequestBodyStream = BoxBody<Bytes, std::io::Error>;

/// Type alias for the Hyper client shared by every operation.
pub type HyperClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, RequestBodyStream>;

/// Build a Hyper client configured with HTTP/2, connection pooling, and a TLS connector
/// that prefers native roots but falls back to the bundled WebPKI store.
pub fn build_hyper_client() -> HyperClient {
    let https_builder = HttpsConnectorBuilder::new()
        .with_native_roots()
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "native roots unavailable, falling back to webpki roots");
            HttpsConnectorBuilder::new().with_webpki_roots()
        });

    let https = https_builder
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();

    Client::builder(TokioExecutor::new())
        .http2_adaptive_window(true)
        .pool_max_idle_per_host(128)
        .build::<_, RequestBodyStream>(https)
}
