pub mod client;
pub mod decode;
pub mod query;
pub mod requests;
pub mod types;

pub use client::FilesClient;
pub use decode::{
    decode_files, decode_trash, href_to_path, normalize_etag, parse_http_date,
};
pub use types::{
    CreateFolderResult, DateProperty, DownloadResult, FileEntry, GeoLocation, LiteralSearch,
    MediaSearch, ReadResult, SearchDate, TrashEntry, UploadResult,
};
