//! Request bodies for the files endpoints.

use crate::error::DavError;
use crate::files::types::{LiteralSearch, MediaSearch};
use crate::webdav::xml::{CLOUD_NAMESPACES, XmlBody};

/// Properties requested for every file listing.
pub const FILE_PROPERTIES: &[&str] = &[
    "d:getlastmodified",
    "d:getetag",
    "d:getcontenttype",
    "d:resourcetype",
    "d:quota-available-bytes",
    "d:quota-used-bytes",
    "d:getcontentlength",
    "d:creationdate",
    "oc:permissions",
    "oc:id",
    "oc:fileid",
    "oc:size",
    "oc:favorite",
    "oc:share-types",
    "oc:owner-id",
    "oc:owner-display-name",
    "oc:comments-unread",
    "oc:checksums",
    "oc:tags",
    "nc:has-preview",
    "nc:mount-type",
    "nc:is-encrypted",
    "nc:note",
    "nc:creation_time",
    "nc:upload_time",
    "nc:system-tags",
    "nc:file-metadata-gps",
];

pub const TRASH_PROPERTIES: &[&str] = &[
    "d:displayname",
    "d:getcontenttype",
    "d:resourcetype",
    "d:getcontentlength",
    "d:getlastmodified",
    "oc:id",
    "oc:fileid",
    "oc:size",
    "nc:has-preview",
    "nc:trashbin-filename",
    "nc:trashbin-original-location",
    "nc:trashbin-deletion-time",
];

fn prop_list(body: &mut XmlBody, names: &[&'static str]) -> Result<(), DavError> {
    body.open("d:prop")?.empties(names)?.close()?;
    Ok(())
}

/// Default `PROPFIND` body for file listings.
pub fn propfind_files_body() -> Result<String, DavError> {
    let mut body = XmlBody::new("d:propfind", &CLOUD_NAMESPACES)?;
    prop_list(&mut body, FILE_PROPERTIES)?;
    body.finish()
}

pub fn propfind_trash_body() -> Result<String, DavError> {
    let mut body = XmlBody::new("d:propfind", &CLOUD_NAMESPACES)?;
    prop_list(&mut body, TRASH_PROPERTIES)?;
    body.finish()
}

pub fn set_favorite_body(favorite: bool) -> Result<String, DavError> {
    let mut body = XmlBody::new("d:propertyupdate", &CLOUD_NAMESPACES)?;
    body.open("d:set")?
        .open("d:prop")?
        .text_element("oc:favorite", if favorite { "1" } else { "0" })?;
    body.finish()
}

/// `REPORT` body selecting favorites.
pub fn favorites_report_body() -> Result<String, DavError> {
    let mut body = XmlBody::new("oc:filter-files", &CLOUD_NAMESPACES)?;
    prop_list(&mut body, FILE_PROPERTIES)?;
    body.open("oc:filter-rules")?
        .text_element("oc:favorite", "1")?
        .close()?;
    body.finish()
}

fn search_head(body: &mut XmlBody, href: &str, depth: &str) -> Result<(), DavError> {
    body.open("d:basicsearch")?.open("d:select")?;
    prop_list(body, FILE_PROPERTIES)?;
    body.close()?
        .open("d:from")?
        .open("d:scope")?
        .text_element("d:href", href)?
        .text_element("d:depth", depth)?
        .close()?
        .close()?;
    Ok(())
}

/// `SEARCH` body matching `%literal%` against `displayname` under `href`.
pub fn search_literal_body(href: &str, search: &LiteralSearch) -> Result<String, DavError> {
    let mut body = XmlBody::new("d:searchrequest", &CLOUD_NAMESPACES)?;
    search_head(&mut body, href, search.depth.as_str())?;
    body.open("d:where")?
        .open("d:like")?
        .open("d:prop")?
        .empty("d:displayname")?
        .close()?
        .text_element("d:literal", &format!("%{}%", search.literal))?
        .close()?
        .close()?;
    body.finish()
}

fn like_content_type(body: &mut XmlBody, pattern: &str) -> Result<(), DavError> {
    body.open("d:like")?
        .open("d:prop")?
        .empty("d:getcontenttype")?
        .close()?
        .text_element("d:literal", pattern)?
        .close()?;
    Ok(())
}

fn compare_date(
    body: &mut XmlBody,
    op: &'static str,
    element: &'static str,
    literal: &str,
) -> Result<(), DavError> {
    body.open(op)?
        .open("d:prop")?
        .empty(element)?
        .close()?
        .text_element("d:literal", literal)?
        .close()?;
    Ok(())
}

/// `SEARCH` body for images and videos inside a date window, newest first.
pub fn search_media_body(href: &str, search: &MediaSearch) -> Result<String, DavError> {
    let element = search.element_date.element();
    let mut body = XmlBody::new("d:searchrequest", &CLOUD_NAMESPACES)?;
    search_head(&mut body, href, "infinity")?;

    body.open("d:orderby")?
        .open("d:order")?
        .open("d:prop")?
        .empty(element)?
        .close()?
        .empty("d:descending")?
        .close()?
        .close()?;

    body.open("d:where")?.open("d:and")?.open("d:or")?;
    like_content_type(&mut body, "image/%")?;
    like_content_type(&mut body, "video/%")?;
    body.close()?;
    compare_date(&mut body, "d:lt", element, &search.less_than.to_literal())?;
    compare_date(&mut body, "d:gt", element, &search.greater_than.to_literal())?;
    body.close()?.close()?;

    if search.limit > 0 {
        body.open("d:limit")?
            .text_element("d:nresults", &search.limit.to_string())?
            .close()?;
    }
    body.finish()
}
