//! Builders for the OCS direct-editing API.

use hyper::Method;

use crate::context::{OCS_FILES_API, RequestContext, RequestOptions};
use crate::error::DavError;
use crate::request::{DavRequest, encode_query_value, standard_headers};

pub const DEFAULT_TEMPLATE_EDITOR: &str = "text";
pub const DEFAULT_TEMPLATE_CREATOR: &str = "textdocumenttemplate";

fn ocs_request(
    ctx: &RequestContext,
    opts: &RequestOptions,
    method: Method,
    endpoint_and_query: &str,
) -> Result<DavRequest, DavError> {
    let uri = ctx.ocs_url(&format!("{OCS_FILES_API}/{endpoint_and_query}"))?;
    let headers = standard_headers(ctx, opts)?;
    Ok(DavRequest::new(method, uri, headers).with_timeout(opts.timeout.or(ctx.request_timeout)))
}

/// `path` query value: always rooted, separators kept, every segment encoded.
pub fn path_query_value(path: &str) -> String {
    let encoded: Vec<String> = path
        .trim_start_matches('/')
        .split('/')
        .map(encode_query_value)
        .collect();
    format!("/{}", encoded.join("/"))
}

pub fn editor_details(
    ctx: &RequestContext,
    opts: &RequestOptions,
) -> Result<DavRequest, DavError> {
    ocs_request(ctx, opts, Method::GET, "directEditing?format=json")
}

pub fn open_file(
    ctx: &RequestContext,
    opts: &RequestOptions,
    path: &str,
    editor_id: &str,
) -> Result<DavRequest, DavError> {
    let query = format!(
        "directEditing/open?path={}&editorId={}&format=json",
        path_query_value(path),
        encode_query_value(editor_id)
    );
    ocs_request(ctx, opts, Method::POST, &query)
}

pub fn list_templates(
    ctx: &RequestContext,
    opts: &RequestOptions,
    editor_id: &str,
    creator_id: &str,
) -> Result<DavRequest, DavError> {
    let endpoint = format!(
        "directEditing/templates/{}/{}?format=json",
        encode_query_value(editor_id),
        encode_query_value(creator_id)
    );
    ocs_request(ctx, opts, Method::GET, &endpoint)
}

pub fn create_file(
    ctx: &RequestContext,
    opts: &RequestOptions,
    path: &str,
    editor_id: &str,
    creator_id: &str,
    template_id: Option<&str>,
) -> Result<DavRequest, DavError> {
    let mut query = format!(
        "directEditing/create?path={}&editorId={}&creatorId={}",
        path_query_value(path),
        encode_query_value(editor_id),
        encode_query_value(creator_id)
    );
    if let Some(template_id) = template_id.filter(|t| !t.is_empty()) {
        query.push_str("&templateId=");
        query.push_str(&encode_query_value(template_id));
    }
    query.push_str("&format=json");
    ocs_request(ctx, opts, Method::POST, &query)
}
