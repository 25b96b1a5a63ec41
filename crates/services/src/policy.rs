//! Write-side rules applied before anything reaches the store.

use domains::{AppError, PostFields, Result};

/// Which document an update hands back as confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateEcho {
    /// The store's document after the update, including untouched fields.
    #[default]
    Stored,
    /// `{_id, ...body}` rebuilt from the request, without a look at what was persisted.
    Merged,
}

#[derive(Debug, Clone)]
pub struct PostPolicy {
    /// A miss on update inserts `{_id, ...body}` instead of failing with NotFound.
    pub upsert_on_update: bool,
    pub update_echo: UpdateEcho,
    /// Fields every created post must carry. Empty accepts any shape.
    pub required_fields: Vec<String>,
}

impl Default for PostPolicy {
    fn default() -> Self {
        Self {
            upsert_on_update: true,
            update_echo: UpdateEcho::default(),
            required_fields: Vec::new(),
        }
    }
}

impl PostPolicy {
    /// Rules for a create body: field names plus the required set.
    pub fn check_create(&self, fields: &PostFields) -> Result<()> {
        check_field_names(fields)?;
        let missing: Vec<&str> = self
            .required_fields
            .iter()
            .filter(|name| !fields.contains_key(name.as_str()))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// Updates are partial, so only the field names are checked.
    pub fn check_update(&self, fields: &PostFields) -> Result<()> {
        check_field_names(fields)
    }
}

// Identifiers belong to the store, `$` keys would be read as operators, and
// dotted names would be read as paths into nested fields on update.
fn check_field_names(fields: &PostFields) -> Result<()> {
    for name in fields.keys() {
        if name == "_id" {
            return Err(AppError::Validation("`_id` is assigned by the store".into()));
        }
        if name.starts_with('$') {
            return Err(AppError::Validation(format!(
                "field name `{name}` must not start with `$`"
            )));
        }
        if name.contains('.') {
            return Err(AppError::Validation(format!(
                "field name `{name}` must not contain `.`"
            )));
        }
    }
    Ok(())
}
