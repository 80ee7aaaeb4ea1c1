//! Serde helpers for fields that are both optional and nullable.
//!
//! Such fields are modelled as `Option<Option<T>>`: `None` leaves the field out of
//! the payload, `Some(None)` sends an explicit `null`, `Some(Some(v))` sends the value.
//! Plain `Option` deserialization folds `null` into the outer `None`, so fields use
//!
//! ```ignore
//! #[serde(
//!     default,
//!     skip_serializing_if = "Option::is_none",
//!     deserialize_with = "crate::data_connect::nullable::deserialize"
//! )]
//! ```

use serde::{Deserialize, Deserializer};

#[allow(clippy::option_option)]
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Flattens a tri-state field for callers that do not care about absent vs null.
#[allow(clippy::option_option)]
pub fn flatten_ref<T>(value: &Option<Option<T>>) -> Option<&T> {
    value.as_ref().and_then(Option::as_ref)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Patch {
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "super::deserialize"
        )]
        note: Option<Option<String>>,
    }

    #[test]
    fn null_and_absent_stay_distinct() {
        let absent: Patch = serde_json::from_value(json!({})).unwrap();
        let null: Patch = serde_json::from_value(json!({ "note": null })).unwrap();
        let value: Patch = serde_json::from_value(json!({ "note": "x" })).unwrap();
        assert_eq!(absent.note, None);
        assert_eq!(null.note, Some(None));
        assert_eq!(value.note, Some(Some("x".to_string())));

        assert_eq!(serde_json::to_value(&absent).unwrap(), json!({}));
        assert_eq!(serde_json::to_value(&null).unwrap(), json!({ "note": null }));
        assert_eq!(super::flatten_ref(&value.note).map(String::as_str), Some("x"));
        assert_eq!(super::flatten_ref(&null.note), None);
    }
}
