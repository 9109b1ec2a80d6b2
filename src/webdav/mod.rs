pub mod client;
pub mod streaming;
pub mod types;
pub mod xml;

pub use client::WebDavClient;
pub use streaming::{parse_multistatus_bytes, parse_multistatus_bytes_visit, status_code};
pub use types::{DavProp, DavResponse, Depth, PropMap};
pub use xml::{CLOUD_NAMESPACES, NS_DAV, NS_NEXTCLOUD, NS_OWNCLOUD, XmlBody};
