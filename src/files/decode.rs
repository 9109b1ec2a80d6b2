//! Multistatus responses and response headers into typed file records.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use hyper::HeaderMap;
use percent_encoding::percent_decode_str;
use tracing::warn;

use crate::error::DavError;
use crate::files::types::{
    CreateFolderResult, DownloadResult, FileEntry, GeoLocation, TrashEntry, UploadResult,
};
use crate::request::find_header;
use crate::webdav::streaming::parse_multistatus_bytes_visit;
use crate::webdav::types::DavResponse;

/// Parse an RFC 1123 date such as `Tue, 01 Jan 2021 00:00:00 GMT`.
///
/// The weekday is ignored; numeric offsets (`+0200`) are accepted as well as
/// `GMT`/`UTC`.
pub fn parse_http_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let rest = match raw.split_once(',') {
        Some((_, rest)) => rest.trim(),
        None => raw,
    };

    let (stamp, zone) = rest.rsplit_once(' ')?;
    match zone {
        "GMT" | "UTC" | "UT" | "Z" => {
            let naive = NaiveDateTime::parse_from_str(stamp.trim(), "%d %b %Y %H:%M:%S").ok()?;
            Some(Utc.from_utc_datetime(&naive))
        }
        _ => DateTime::parse_from_str(rest, "%d %b %Y %H:%M:%S %z")
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn parse_iso_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    match raw.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => DateTime::from_timestamp(secs, 0),
        _ => None,
    }
}

/// Strip every double quote from an ETag.
pub fn normalize_etag(raw: &str) -> String {
    raw.replace('"', "")
}

/// Decoded path component of an href, absolute or server-relative.
pub fn href_to_path(href: &str) -> String {
    let path = match href.find("://") {
        Some(idx) => {
            let after = &href[idx + 3..];
            match after.find('/') {
                Some(slash) => &after[slash..],
                None => "/",
            }
        }
        None => href,
    };
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Split a decoded path into `(path without trailing slash, parent with trailing slash, leaf)`.
fn split_path(decoded: &str) -> (String, String, String) {
    let trimmed = decoded.trim_end_matches('/');
    if trimmed.is_empty() {
        return ("/".to_string(), "/".to_string(), String::new());
    }
    match trimmed.rfind('/') {
        Some(idx) => (
            trimmed.to_string(),
            trimmed[..=idx].to_string(),
            trimmed[idx + 1..].to_string(),
        ),
        None => (trimmed.to_string(), String::new(), trimmed.to_string()),
    }
}

fn is_collection(response: &DavResponse) -> bool {
    response
        .prop("resourcetype")
        .map(|p| p.has_child("collection"))
        .unwrap_or(false)
}

fn size_of(response: &DavResponse) -> i64 {
    if response.text("getcontentlength").is_empty() {
        response.int("size")
    } else {
        response.int("getcontentlength")
    }
}

fn child_values(response: &DavResponse, prop: &str, child: &str) -> Vec<String> {
    response
        .prop(prop)
        .map(|p| {
            p.child_texts(child)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn file_from_response(response: &DavResponse) -> FileEntry {
    let decoded = href_to_path(&response.href);
    let (path, parent_path, file_name) = split_path(&decoded);

    let geo = match response.text("file-metadata-gps") {
        "" => None,
        raw => serde_json::from_str::<GeoLocation>(raw).ok(),
    };

    FileEntry {
        href: response.href.clone(),
        path,
        parent_path,
        file_name,
        oc_id: response.text("id").to_string(),
        file_id: response.text("fileid").to_string(),
        directory: is_collection(response),
        size: size_of(response),
        content_type: response.text("getcontenttype").to_string(),
        creation_date: parse_epoch(response.text("creation_time"))
            .or_else(|| parse_iso_date(response.text("creationdate"))),
        upload_date: parse_epoch(response.text("upload_time")),
        last_modified: parse_http_date(response.text("getlastmodified")),
        etag: normalize_etag(response.text("getetag")),
        favorite: response.flag("favorite"),
        permissions: response.text("permissions").to_string(),
        has_preview: response.flag("has-preview"),
        owner_id: response.text("owner-id").to_string(),
        owner_display_name: response.text("owner-display-name").to_string(),
        comments_unread: response.int("comments-unread") > 0,
        encrypted: response.flag("is-encrypted"),
        mount_type: response.text("mount-type").to_string(),
        note: response.text("note").to_string(),
        share_types: child_values(response, "share-types", "share-type")
            .iter()
            .filter_map(|v| v.parse().ok())
            .collect(),
        tags: child_values(response, "tags", "tag"),
        system_tags: child_values(response, "system-tags", "system-tag"),
        checksums: child_values(response, "checksums", "checksum"),
        geo,
        quota_used_bytes: response.int("quota-used-bytes"),
        quota_available_bytes: response.int("quota-available-bytes"),
    }
}

pub fn trash_from_response(response: &DavResponse) -> TrashEntry {
    let decoded = href_to_path(&response.href);
    let (path, _, file_name) = split_path(&decoded);

    TrashEntry {
        href: response.href.clone(),
        path,
        file_name,
        trashbin_file_name: response.text("trashbin-filename").to_string(),
        trashbin_original_location: response.text("trashbin-original-location").to_string(),
        trashbin_deletion_time: parse_epoch(response.text("trashbin-deletion-time")),
        file_id: response.text("fileid").to_string(),
        directory: is_collection(response),
        size: size_of(response),
        content_type: response.text("getcontenttype").to_string(),
        has_preview: response.flag("has-preview"),
        last_modified: parse_http_date(response.text("getlastmodified")),
    }
}

/// Decode a file listing. Hidden entries are dropped unless `show_hidden`.
///
/// Never fails: an undecodable body yields an empty list.
pub fn decode_files(body: &[u8], show_hidden: bool) -> Vec<FileEntry> {
    let mut files = Vec::new();
    let parsed = parse_multistatus_bytes_visit(body, |response| {
        let entry = file_from_response(&response);
        if show_hidden || !entry.is_hidden() {
            files.push(entry);
        }
        Ok(())
    });
    if let Err(err) = parsed {
        warn!(error = %err, "discarding undecodable file listing");
        return Vec::new();
    }
    files
}

/// Decode a trash listing, skipping the trash container itself.
pub fn decode_trash(body: &[u8], show_hidden: bool) -> Vec<TrashEntry> {
    let mut items = Vec::new();
    let parsed = parse_multistatus_bytes_visit(body, |response| {
        let item = trash_from_response(&response);
        if item.path.ends_with("/trash") {
            return Ok(());
        }
        if show_hidden || !item.trashbin_file_name.starts_with('.') {
            items.push(item);
        }
        Ok(())
    });
    if let Err(err) = parsed {
        warn!(error = %err, "discarding undecodable trash listing");
        return Vec::new();
    }
    items
}

fn header_with_fallback<'a>(headers: &'a HeaderMap, primary: &str, fallback: &str) -> Option<&'a str> {
    find_header(headers, primary).or_else(|| find_header(headers, fallback))
}

fn required_date(headers: &HeaderMap) -> Result<DateTime<Utc>, DavError> {
    let Some(raw) = find_header(headers, "date") else {
        warn!("response carries no Date header");
        return Err(DavError::InvalidDate);
    };
    parse_http_date(raw).ok_or_else(|| {
        warn!(date = raw, "unparseable Date header");
        DavError::InvalidDate
    })
}

pub fn create_folder_result(headers: &HeaderMap) -> Result<CreateFolderResult, DavError> {
    Ok(CreateFolderResult {
        oc_id: find_header(headers, "oc-fileid").map(str::to_string),
        date: required_date(headers)?,
    })
}

pub fn upload_result(headers: &HeaderMap, size: u64) -> Result<UploadResult, DavError> {
    Ok(UploadResult {
        oc_id: header_with_fallback(headers, "oc-fileid", "fileid").map(str::to_string),
        etag: header_with_fallback(headers, "oc-etag", "etag").map(normalize_etag),
        date: required_date(headers)?,
        size,
        headers: headers.clone(),
    })
}

pub fn download_result(headers: &HeaderMap, written: u64) -> DownloadResult {
    let length = find_header(headers, "content-length")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(written);
    DownloadResult {
        etag: header_with_fallback(headers, "oc-etag", "etag").map(normalize_etag),
        date: find_header(headers, "date").and_then(parse_http_date),
        length,
        headers: headers.clone(),
    }
}
