//! Builders for the comments collection, `<dav>/comments/files/<fileId>`.

use hyper::{Method, header};
use serde_json::json;

use crate::context::{RequestContext, RequestOptions};
use crate::error::DavError;
use crate::request::{CONTENT_TYPE_JSON, CONTENT_TYPE_XML, DavRequest, base_request, method};
use crate::webdav::xml::{CLOUD_NAMESPACES, XmlBody};

pub const COMMENT_PROPERTIES: &[&str] = &[
    "oc:id",
    "oc:parentId",
    "oc:topmostParentId",
    "oc:childrenCount",
    "oc:verb",
    "oc:actorType",
    "oc:actorId",
    "oc:creationDateTime",
    "oc:objectType",
    "oc:objectId",
    "oc:isUnread",
    "oc:message",
    "oc:actorDisplayName",
];

fn thread_path(ctx: &RequestContext, file_id: &str, message_id: Option<&str>) -> String {
    match message_id {
        Some(message_id) => ctx.dav_path(&format!("comments/files/{file_id}/{message_id}")),
        None => ctx.dav_path(&format!("comments/files/{file_id}")),
    }
}

pub fn propfind_comments_body() -> Result<String, DavError> {
    let mut body = XmlBody::new("d:propfind", &CLOUD_NAMESPACES)?;
    body.open("d:prop")?.empties(COMMENT_PROPERTIES)?;
    body.finish()
}

pub fn update_comment_body(message: &str) -> Result<String, DavError> {
    let mut body = XmlBody::new("d:propertyupdate", &CLOUD_NAMESPACES)?;
    body.open("d:set")?
        .open("d:prop")?
        .text_element("oc:message", message)?;
    body.finish()
}

pub fn mark_as_read_body() -> Result<String, DavError> {
    let mut body = XmlBody::new("d:propertyupdate", &CLOUD_NAMESPACES)?;
    body.open("d:set")?.open("d:prop")?.empty("oc:readMarker")?;
    body.finish()
}

/// JSON document posted to create a comment. The message is escaped by the serializer.
pub fn new_comment_body(message: &str) -> String {
    json!({
        "actorType": "users",
        "verb": "comment",
        "message": message,
    })
    .to_string()
}

pub fn get_comments(
    ctx: &RequestContext,
    opts: &RequestOptions,
    file_id: &str,
) -> Result<DavRequest, DavError> {
    let mut req = base_request(ctx, opts, method("PROPFIND")?, &thread_path(ctx, file_id, None))?;
    req.set_header(header::CONTENT_TYPE.as_str(), CONTENT_TYPE_XML)?;
    Ok(req.with_body(propfind_comments_body()?))
}

pub fn put_comment(
    ctx: &RequestContext,
    opts: &RequestOptions,
    file_id: &str,
    message: &str,
) -> Result<DavRequest, DavError> {
    let mut req = base_request(ctx, opts, Method::POST, &thread_path(ctx, file_id, None))?;
    req.set_header(header::CONTENT_TYPE.as_str(), CONTENT_TYPE_JSON)?;
    Ok(req.with_body(new_comment_body(message)))
}

pub fn update_comment(
    ctx: &RequestContext,
    opts: &RequestOptions,
    file_id: &str,
    message_id: &str,
    message: &str,
) -> Result<DavRequest, DavError> {
    let path = thread_path(ctx, file_id, Some(message_id));
    let mut req = base_request(ctx, opts, method("PROPPATCH")?, &path)?;
    req.set_header(header::CONTENT_TYPE.as_str(), CONTENT_TYPE_XML)?;
    Ok(req.with_body(update_comment_body(message)?))
}

pub fn delete_comment(
    ctx: &RequestContext,
    opts: &RequestOptions,
    file_id: &str,
    message_id: &str,
) -> Result<DavRequest, DavError> {
    let path = thread_path(ctx, file_id, Some(message_id));
    base_request(ctx, opts, Method::DELETE, &path)
}

pub fn mark_as_read(
    ctx: &RequestContext,
    opts: &RequestOptions,
    file_id: &str,
) -> Result<DavRequest, DavError> {
    let mut req = base_request(ctx, opts, method("PROPPATCH")?, &thread_path(ctx, file_id, None))?;
    req.set_header(header::CONTENT_TYPE.as_str(), CONTENT_TYPE_XML)?;
    Ok(req.with_body(mark_as_read_body()?))
}
