//! # Domain Models
//!
//! A post is an opaque store-assigned identifier plus whatever fields the
//! client sent. No schema is imposed here.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;

/// Field name → value mapping supplied by the client. Insertion order is kept.
pub type PostFields = serde_json::Map<String, serde_json::Value>;

/// Length of a hex-encoded object id.
pub const POST_ID_LEN: usize = 24;

/// A 12-byte object id in its 24-character lowercase hex form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Accepts upper- or lowercase hex; anything else is `InvalidIdentifier`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if raw.len() == POST_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(AppError::InvalidIdentifier(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PostId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A stored post. Serialises flat, `_id` first: `{"_id": "...", "title": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    #[serde(flatten)]
    pub fields: PostFields,
}

impl Post {
    pub fn new(id: PostId, fields: PostFields) -> Self {
        Self { id, fields }
    }
}
