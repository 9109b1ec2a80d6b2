//! Async client for WebDAV/OCS cloud-storage servers.
//!
//! The crate talks to a Nextcloud-style server: it builds the WebDAV and OCS
//! requests, sends them over a pooled hyper + rustls client, and decodes
//! multistatus XML and OCS JSON into typed records.
//!
//! # Features
//!
//! - File listing (`PROPFIND` depth 0/1), folder creation, delete, move, copy
//! - `SEARCH` by display name or by media date window
//! - Favorites, trash bin, comment threads
//! - OCS direct editing: editors, templates, open/create documents
//! - Streaming upload from disk and download to disk
//! - Automatic response decompression (br/zstd/gzip)
//! - One error type, [`DavError`], with a flat [`NormalizedError`] view
//!
//! # Examples
//!
//! ## Listing a folder
//!
//! ```no_run
//! use cloud_dav_rs::{ClientConfig, CloudClient, Depth, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cloud_dav_rs::DavError> {
//!     let client = CloudClient::new(ClientConfig::new(
//!         "https://cloud.example.com",
//!         "alice",
//!         "app-password",
//!     ))?;
//!     let opts = RequestOptions::default();
//!
//!     let listing = client
//!         .files()
//!         .read_file_or_folder("Photos", Depth::One, false, None, &opts)
//!         .await?;
//!     for file in listing.children() {
//!         println!("{} ({} bytes, etag {})", file.file_name, file.size, file.etag);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Transfers
//!
//! ```no_run
//! use cloud_dav_rs::{ClientConfig, CloudClient, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cloud_dav_rs::DavError> {
//!     let client = CloudClient::new(ClientConfig::new(
//!         "https://cloud.example.com",
//!         "alice",
//!         "app-password",
//!     ))?;
//!     let opts = RequestOptions::default();
//!
//!     let uploaded = client
//!         .files()
//!         .upload("docs/report.pdf", "/tmp/report.pdf", None, None, &opts)
//!         .await?;
//!     println!("stored as {:?} at {}", uploaded.oc_id, uploaded.date);
//!
//!     let downloaded = client
//!         .files()
//!         .download("docs/report.pdf", "/tmp/copy/report.pdf", &opts)
//!         .await?;
//!     println!("{} bytes", downloaded.length);
//!     Ok(())
//! }
//! ```
//!
//! ## Callback style
//!
//! Every operation can also run in the background with a single completion:
//!
//! ```no_run
//! # use cloud_dav_rs::{CloudClient, RequestOptions};
//! # async fn example(client: CloudClient) {
//! let (handle, done) = client.dispatch_channel(|c| async move {
//!     c.files().list_trash(false, &RequestOptions::default()).await
//! });
//! // handle.cancel() would complete with code -999 instead.
//! if let Ok(completion) = done.await {
//!     let outcome = completion.normalized();
//!     println!("{}: code {} {}", completion.account, outcome.code, outcome.description);
//! }
//! # drop(handle);
//! # }
//! ```

pub mod client;
pub mod comments;
pub mod common;
pub mod context;
pub mod dispatch;
pub mod editing;
pub mod error;
pub mod files;
pub mod reachability;
pub mod request;
pub mod webdav;

pub use client::CloudClient;
pub use comments::{CommentEntry, CommentsClient};
pub use common::CookieStore;
pub use context::{ClientConfig, RequestContext, RequestOptions};
pub use dispatch::{Completion, RequestHandle};
pub use editing::{
    CreatorDescriptor, EditingClient, EditorDescriptor, EditorDetails, TemplateDescriptor,
};
pub use error::{DavError, ErrorKind, NormalizedError, classify_exchange, codes};
pub use files::{
    CreateFolderResult, DateProperty, DownloadResult, FileEntry, FilesClient, GeoLocation,
    ReadResult, SearchDate, TrashEntry, UploadResult,
};
pub use reachability::{ClientDelegate, ReachabilityStatus};
pub use request::{DavRequest, RequestBody};
pub use webdav::{Depth, WebDavClient};
