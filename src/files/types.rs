use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use hyper::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::webdav::types::Depth;

/// GPS metadata attached to media files.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
}

/// One file or folder decoded from a multistatus `<response>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileEntry {
    /// Raw, percent-encoded href as sent by the server.
    pub href: String,
    /// Decoded server path, without a trailing separator.
    pub path: String,
    /// Decoded path of the parent collection, with a trailing separator.
    pub parent_path: String,
    pub file_name: String,
    /// `oc:id`, unique across the instance.
    pub oc_id: String,
    /// `oc:fileid`, numeric id used by the comments and sharing APIs.
    pub file_id: String,
    pub directory: bool,
    pub size: i64,
    pub content_type: String,
    pub creation_date: Option<DateTime<Utc>>,
    pub upload_date: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: String,
    pub favorite: bool,
    pub permissions: String,
    pub has_preview: bool,
    pub owner_id: String,
    pub owner_display_name: String,
    pub comments_unread: bool,
    pub encrypted: bool,
    pub mount_type: String,
    pub note: String,
    pub share_types: Vec<i32>,
    pub tags: Vec<String>,
    pub system_tags: Vec<String>,
    pub checksums: Vec<String>,
    pub geo: Option<GeoLocation>,
    pub quota_used_bytes: i64,
    pub quota_available_bytes: i64,
}

impl FileEntry {
    pub fn is_hidden(&self) -> bool {
        self.file_name.starts_with('.')
    }
}

/// One item of the trash bin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrashEntry {
    pub href: String,
    pub path: String,
    /// Trash-bin identifier, e.g. `report.pdf.d1700000000`.
    pub file_name: String,
    /// Name the item had before deletion.
    pub trashbin_file_name: String,
    /// Original location relative to the user's files root.
    pub trashbin_original_location: String,
    pub trashbin_deletion_time: Option<DateTime<Utc>>,
    pub file_id: String,
    pub directory: bool,
    pub size: i64,
    pub content_type: String,
    pub has_preview: bool,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Outcome of a `PROPFIND`: decoded entries plus the raw body.
#[derive(Debug, Clone, Default)]
pub struct ReadResult {
    pub files: Vec<FileEntry>,
    pub data: Bytes,
    /// Unencoded server path that was requested.
    pub request_path: String,
}

impl ReadResult {
    /// Entries other than the requested resource itself.
    pub fn children(&self) -> impl Iterator<Item = &FileEntry> {
        let target = self.request_path.trim_end_matches('/');
        self.files.iter().filter(move |f| f.path != target)
    }

    /// The entry describing the requested resource, if the server listed it.
    pub fn container(&self) -> Option<&FileEntry> {
        let target = self.request_path.trim_end_matches('/');
        self.files.iter().find(|f| f.path == target)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateFolderResult {
    pub oc_id: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UploadResult {
    pub oc_id: Option<String>,
    pub etag: Option<String>,
    pub date: DateTime<Utc>,
    pub size: u64,
    pub headers: HeaderMap,
}

#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub etag: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub length: u64,
    pub headers: HeaderMap,
}

/// Bound of a media search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDate {
    Timestamp(DateTime<Utc>),
    /// Unix seconds, sent verbatim.
    Epoch(i64),
}

impl SearchDate {
    pub fn to_literal(self) -> String {
        match self {
            SearchDate::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            SearchDate::Epoch(secs) => secs.to_string(),
        }
    }
}

impl From<DateTime<Utc>> for SearchDate {
    fn from(value: DateTime<Utc>) -> Self {
        SearchDate::Timestamp(value)
    }
}

impl From<i64> for SearchDate {
    fn from(value: i64) -> Self {
        SearchDate::Epoch(value)
    }
}

/// Date property a media search filters and orders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateProperty {
    #[default]
    LastModified,
    CreationTime,
    UploadTime,
}

impl DateProperty {
    pub fn element(self) -> &'static str {
        match self {
            DateProperty::LastModified => "d:getlastmodified",
            DateProperty::CreationTime => "nc:creation_time",
            DateProperty::UploadTime => "nc:upload_time",
        }
    }
}

/// Images and videos below `path` whose date lies strictly inside the window.
#[derive(Debug, Clone)]
pub struct MediaSearch {
    /// Folder relative to the user's files root; empty for the whole tree.
    pub path: String,
    pub less_than: SearchDate,
    pub greater_than: SearchDate,
    pub element_date: DateProperty,
    /// `0` means unlimited.
    pub limit: u32,
}

/// `displayname` substring search.
#[derive(Debug, Clone)]
pub struct LiteralSearch {
    pub literal: String,
    pub depth: Depth,
}
