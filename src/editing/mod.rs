pub mod client;
pub mod json;
pub mod requests;
pub mod types;

pub use client::EditingClient;
pub use json::{decode_editor_details, decode_templates, decode_url};
pub use types::{CreatorDescriptor, EditorDescriptor, EditorDetails, TemplateDescriptor};
