use serde::Deserialize;

use crate::editing::json::{lenient_int, lenient_string, lenient_strings};

/// An editor the server can open documents in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct EditorDescriptor {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub mimetypes: Vec<String>,
    #[serde(rename = "optionalMimetypes", deserialize_with = "lenient_strings")]
    pub optional_mimetypes: Vec<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub secure: i64,
}

/// A "new document" action offered by an editor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CreatorDescriptor {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub editor: String,
    #[serde(deserialize_with = "lenient_string")]
    pub extension: String,
    #[serde(deserialize_with = "lenient_string")]
    pub mimetype: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    /// Non-zero when the creator offers templates.
    #[serde(deserialize_with = "lenient_int")]
    pub templates: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct TemplateDescriptor {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub extension: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    /// Preview image URL.
    #[serde(deserialize_with = "lenient_string")]
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorDetails {
    pub editors: Vec<EditorDescriptor>,
    pub creators: Vec<CreatorDescriptor>,
}
