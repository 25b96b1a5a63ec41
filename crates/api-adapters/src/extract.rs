//! Request body extraction shared by both surfaces.
//!
//! Browser forms arrive url-encoded, scripts and API clients send JSON.
//! Either becomes a flat [`PostFields`] mapping; an empty body is an empty
//! mapping. A form name given more than once becomes an array of its values.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, StatusCode};
use domains::PostFields;
use mime::Mime;
use serde_json::map::Entry;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug)]
pub struct PostBody(pub PostFields);

impl<S> FromRequest<S> for PostBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::PayloadTooLarge(rejection.body_text())
                } else {
                    ApiError::MalformedBody(rejection.body_text())
                }
            })?;

        parse_body(content_type.as_deref(), &bytes).map(PostBody)
    }
}

pub fn parse_body(content_type: Option<&str>, bytes: &[u8]) -> Result<PostFields, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(PostFields::new());
    }

    let raw = content_type.unwrap_or_default();
    let mime: Mime = raw
        .parse()
        .map_err(|_| ApiError::UnsupportedMediaType(raw.to_owned()))?;

    if is_json(&mime) {
        serde_json::from_slice::<PostFields>(bytes)
            .map_err(|e| ApiError::MalformedBody(e.to_string()))
    } else if mime.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes)
            .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        Ok(form_fields(pairs))
    } else {
        Err(ApiError::UnsupportedMediaType(raw.to_owned()))
    }
}

fn form_fields(pairs: Vec<(String, String)>) -> PostFields {
    let mut fields = PostFields::new();
    for (name, value) in pairs {
        let value = Value::String(value);
        match fields.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(values) => values.push(value),
                single => {
                    let first = single.take();
                    *single = Value::Array(vec![first, value]);
                }
            },
        }
    }
    fields
}

fn is_json(mime: &Mime) -> bool {
    mime.type_() == mime::APPLICATION
        && (mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_object_is_taken_as_is() {
        let fields = parse_body(
            Some("application/json; charset=utf-8"),
            br#"{"title":"T","tags":["a","b"],"draft":false}"#,
        )
        .unwrap();
        assert_eq!(Value::Object(fields), json!({"title": "T", "tags": ["a", "b"], "draft": false}));
    }

    #[test]
    fn form_fields_become_strings() {
        let fields = parse_body(
            Some("application/x-www-form-urlencoded"),
            b"title=Hello+there&likes=3",
        )
        .unwrap();
        assert_eq!(Value::Object(fields), json!({"title": "Hello there", "likes": "3"}));
    }

    #[test]
    fn repeated_form_names_keep_every_value() {
        let fields = parse_body(
            Some("application/x-www-form-urlencoded"),
            b"tag=a&title=T&tag=b&tag=c",
        )
        .unwrap();
        assert_eq!(Value::Object(fields), json!({"tag": ["a", "b", "c"], "title": "T"}));
    }

    #[test]
    fn empty_body_is_empty_mapping_whatever_the_type() {
        assert!(parse_body(Some("application/json"), b"").unwrap().is_empty());
        assert!(parse_body(None, b"  \n").unwrap().is_empty());
    }

    #[test]
    fn json_that_is_not_an_object_is_malformed() {
        assert!(matches!(
            parse_body(Some("application/json"), b"[1,2,3]"),
            Err(ApiError::MalformedBody(_))
        ));
        assert!(matches!(
            parse_body(Some("application/json"), b"{\"title\":"),
            Err(ApiError::MalformedBody(_))
        ));
    }

    #[test]
    fn other_content_types_are_unsupported() {
        assert!(matches!(
            parse_body(Some("text/plain"), b"title=T"),
            Err(ApiError::UnsupportedMediaType(ct)) if ct == "text/plain"
        ));
        assert!(matches!(
            parse_body(None, b"title=T"),
            Err(ApiError::UnsupportedMediaType(_))
        ));
    }
}
