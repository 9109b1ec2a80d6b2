use tracing::warn;

use crate::comments::types::CommentEntry;
use crate::files::decode::{href_to_path, parse_http_date};
use crate::webdav::streaming::parse_multistatus_bytes_visit;
use crate::webdav::types::DavResponse;

pub fn comment_from_response(response: &DavResponse) -> CommentEntry {
    CommentEntry {
        id: response.text("id").to_string(),
        parent_id: response.text("parentid").to_string(),
        topmost_parent_id: response.text("topmostparentid").to_string(),
        children_count: response.int("childrencount"),
        verb: response.text("verb").to_string(),
        actor_type: response.text("actortype").to_string(),
        actor_id: response.text("actorid").to_string(),
        actor_display_name: response.text("actordisplayname").to_string(),
        creation_date_time: parse_http_date(response.text("creationdatetime")),
        object_type: response.text("objecttype").to_string(),
        object_id: response.text("objectid").to_string(),
        is_unread: response.flag("isunread"),
        message: response.text("message").to_string(),
        path: href_to_path(&response.href),
    }
}

/// Decode a comment thread. The collection entry itself has no id and is skipped.
pub fn decode_comments(body: &[u8]) -> Vec<CommentEntry> {
    let mut comments = Vec::new();
    let parsed = parse_multistatus_bytes_visit(body, |response| {
        let comment = comment_from_response(&response);
        if !comment.id.is_empty() {
            comments.push(comment);
        }
        Ok(())
    });
    if let Err(err) = parsed {
        warn!(error = %err, "discarding undecodable comment thread");
        return Vec::new();
    }
    comments
}
