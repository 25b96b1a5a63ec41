//! Askama views for the browser surface.

use askama::Template;
use domains::Post;
use serde_json::Value;

/// A post flattened into displayable name/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PostView {
    pub id: String,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub value: String,
    /// Only string fields round-trip through a text input; the rest are shown
    /// read-only and left out of the edit form, so a save cannot retype them.
    pub editable: bool,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            fields: post
                .fields
                .iter()
                .map(|(name, value)| FieldView {
                    name: name.clone(),
                    value: display_value(value),
                    editable: value.is_string(),
                })
                .collect(),
        }
    }
}

// Strings without their JSON quotes; null as blank.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub posts: Vec<PostView>,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub post: PostView,
}
