use std::fmt;

use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Length of the hyphenated text form, e.g. `67e55044-10b1-426f-9247-bb680e5fe0c8`.
const TEXT_LEN: usize = 36;

/// Opaque record identifier shared by both collections.
///
/// Generated by the server at insert time and exposed to clients only as
/// its hyphenated text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct RecordId(Uuid);

#[derive(Debug, thiserror::Error)]
#[error("malformed record id {0:?}")]
pub struct MalformedId(pub String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Only the fixed hyphenated form is accepted, so that parsing is the
    /// exact inverse of [`fmt::Display`].
    pub fn parse(text: &str) -> Result<Self, MalformedId> {
        if text.len() != TEXT_LEN {
            return Err(MalformedId(text.to_string()));
        }
        Uuid::parse_str(text)
            .map(Self)
            .map_err(|_| MalformedId(text.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_are_inverse() {
        let id = RecordId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), TEXT_LEN);
        assert_eq!(RecordId::parse(&text).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in ["abc", "", "507f1f77bcf86cd799439011", "67e5504410b1426f9247bb680e5fe0c8"] {
            assert!(RecordId::parse(bad).is_err(), "{bad} should be rejected");
        }
        assert!(RecordId::parse("67e55044-10b1-426f-9247-bb680e5fe0cz").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordId::generate();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
