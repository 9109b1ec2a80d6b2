//! Pure builders: `(context, options, arguments) -> DavRequest`.
//!
//! Paths are relative to the user's files root and passed unencoded; the
//! builders percent-encode them.

use std::path::Path;

use chrono::{DateTime, Utc};
use hyper::{Method, header};

use crate::context::{RequestContext, RequestOptions};
use crate::error::DavError;
use crate::files::query::{
    favorites_report_body, propfind_files_body, propfind_trash_body, search_literal_body,
    search_media_body, set_favorite_body,
};
use crate::files::types::{LiteralSearch, MediaSearch};
use crate::request::{
    CONTENT_TYPE_TEXT_XML, CONTENT_TYPE_XML, DavRequest, base_request, encode_path, encode_query,
    method, normalize_for_depth,
};
use crate::webdav::types::Depth;

pub fn create_folder(
    ctx: &RequestContext,
    opts: &RequestOptions,
    path: &str,
) -> Result<DavRequest, DavError> {
    base_request(ctx, opts, method("MKCOL")?, &ctx.files_path(path))
}

pub fn delete(
    ctx: &RequestContext,
    opts: &RequestOptions,
    path: &str,
) -> Result<DavRequest, DavError> {
    base_request(ctx, opts, Method::DELETE, &ctx.files_path(path))
}

fn transfer(
    ctx: &RequestContext,
    opts: &RequestOptions,
    verb: &'static str,
    source: &str,
    destination: &str,
    overwrite: bool,
) -> Result<DavRequest, DavError> {
    let mut req = base_request(ctx, opts, method(verb)?, &ctx.files_path(source))?;
    let destination_url = format!("{}{}", ctx.base_url, ctx.files_path(destination));
    req.set_header("Destination", &encode_query(&destination_url))?;
    req.set_header("Overwrite", if overwrite { "T" } else { "F" })?;
    Ok(req)
}

pub fn move_item(
    ctx: &RequestContext,
    opts: &RequestOptions,
    source: &str,
    destination: &str,
    overwrite: bool,
) -> Result<DavRequest, DavError> {
    transfer(ctx, opts, "MOVE", source, destination, overwrite)
}

pub fn copy_item(
    ctx: &RequestContext,
    opts: &RequestOptions,
    source: &str,
    destination: &str,
    overwrite: bool,
) -> Result<DavRequest, DavError> {
    transfer(ctx, opts, "COPY", source, destination, overwrite)
}

/// `PROPFIND` on a file or folder. `body` replaces the default property request.
pub fn read_file_or_folder(
    ctx: &RequestContext,
    opts: &RequestOptions,
    path: &str,
    depth: Depth,
    body: Option<&str>,
) -> Result<DavRequest, DavError> {
    let raw_path = normalize_for_depth(&ctx.files_path(path), depth);
    let mut req = base_request(ctx, opts, method("PROPFIND")?, &raw_path)?;
    req.set_header(header::CONTENT_TYPE.as_str(), CONTENT_TYPE_XML)?;
    req.set_header("Depth", depth.as_str())?;
    let body = match body {
        Some(custom) => custom.to_string(),
        None => propfind_files_body()?,
    };
    Ok(req.with_body(body))
}

/// `SEARCH` against the DAV root with a caller-supplied body.
pub fn search_body(
    ctx: &RequestContext,
    opts: &RequestOptions,
    body: String,
) -> Result<DavRequest, DavError> {
    let mut req = base_request(ctx, opts, method("SEARCH")?, &ctx.dav_path(""))?;
    req.set_header(header::CONTENT_TYPE.as_str(), CONTENT_TYPE_TEXT_XML)?;
    Ok(req
        .with_body(body)
        .with_timeout(Some(opts.timeout.unwrap_or(ctx.search_timeout))))
}

/// Scope href of a search: `/files/<user>` plus an optional sub-folder, encoded.
pub fn search_scope(ctx: &RequestContext, path: &str) -> String {
    let rel = path.trim_matches('/');
    let raw = if rel.is_empty() {
        format!("/files/{}", ctx.user_id)
    } else {
        format!("/files/{}/{}", ctx.user_id, rel)
    };
    encode_path(&raw)
}

pub fn search_literal(
    ctx: &RequestContext,
    opts: &RequestOptions,
    search: &LiteralSearch,
) -> Result<DavRequest, DavError> {
    let body = search_literal_body(&search_scope(ctx, ""), search)?;
    search_body(ctx, opts, body)
}

pub fn search_media(
    ctx: &RequestContext,
    opts: &RequestOptions,
    search: &MediaSearch,
) -> Result<DavRequest, DavError> {
    let body = search_media_body(&search_scope(ctx, &search.path), search)?;
    search_body(ctx, opts, body)
}

pub fn set_favorite(
    ctx: &RequestContext,
    opts: &RequestOptions,
    file_name: &str,
    favorite: bool,
) -> Result<DavRequest, DavError> {
    let req = base_request(ctx, opts, method("PROPPATCH")?, &ctx.files_path(file_name))?;
    Ok(req.with_body(set_favorite_body(favorite)?))
}

pub fn list_favorites(
    ctx: &RequestContext,
    opts: &RequestOptions,
) -> Result<DavRequest, DavError> {
    let req = base_request(ctx, opts, method("REPORT")?, &ctx.files_root())?;
    Ok(req.with_body(favorites_report_body()?))
}

pub fn list_trash(ctx: &RequestContext, opts: &RequestOptions) -> Result<DavRequest, DavError> {
    let trash = ctx.dav_path(&format!("trashbin/{}/trash/", ctx.user_id));
    let mut req = base_request(ctx, opts, method("PROPFIND")?, &trash)?;
    req.set_header(header::CONTENT_TYPE.as_str(), CONTENT_TYPE_XML)?;
    req.set_header("Depth", Depth::One.as_str())?;
    Ok(req.with_body(propfind_trash_body()?))
}

pub fn download(
    ctx: &RequestContext,
    opts: &RequestOptions,
    path: &str,
) -> Result<DavRequest, DavError> {
    base_request(ctx, opts, Method::GET, &ctx.files_path(path))
}

/// `PUT` streaming `local` from disk. Dates become `X-OC-CTime`/`X-OC-MTime` in unix seconds.
pub fn upload(
    ctx: &RequestContext,
    opts: &RequestOptions,
    path: &str,
    local: &Path,
    creation_date: Option<DateTime<Utc>>,
    modification_date: Option<DateTime<Utc>>,
) -> Result<DavRequest, DavError> {
    let mut req = base_request(ctx, opts, Method::PUT, &ctx.files_path(path))?;
    if let Some(created) = creation_date {
        req.set_header("X-OC-CTime", &created.timestamp().to_string())?;
    }
    if let Some(modified) = modification_date {
        req.set_header("X-OC-MTime", &modified.timestamp().to_string())?;
    }
    Ok(req.with_file(local))
}
