use chrono::{DateTime, Utc};

/// One comment of a file's thread.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentEntry {
    pub id: String,
    pub parent_id: String,
    pub topmost_parent_id: String,
    pub children_count: i64,
    /// `comment` for user messages, other verbs for system events.
    pub verb: String,
    pub actor_type: String,
    pub actor_id: String,
    pub actor_display_name: String,
    pub creation_date_time: Option<DateTime<Utc>>,
    pub object_type: String,
    /// File id the thread belongs to.
    pub object_id: String,
    pub is_unread: bool,
    pub message: String,
    pub path: String,
}
