pub mod compression;
pub mod cookies;
pub mod http;

pub use compression::{
    ContentEncoding, add_accept_encoding, decompress_body, decompress_stream, detect_encodings,
};
pub use cookies::CookieStore;
pub use http::{HyperClient, RequestBodyStream, build_hyper_client};
