pub mod client;
pub mod decode;
pub mod requests;
pub mod types;

pub use client::CommentsClient;
pub use decode::decode_comments;
pub use types::CommentEntry;
