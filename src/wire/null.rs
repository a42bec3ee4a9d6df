//! Nullable wire values with defensive decoding.

use ciborium::Value;
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// A string field that may be explicitly null on the wire.
///
/// Decoding tolerates schema drift in the upstream producer: a text value
/// is taken as-is, an explicit null marks the field absent, and any other
/// wire type marks the field absent after emitting one warning diagnostic.
/// Only the last case is anomalous; none of them are errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullString(Option<String>);

impl NullString {
    /// A present value.
    pub fn some(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    /// An absent value.
    pub const fn none() -> Self {
        Self(None)
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl From<Option<String>> for NullString {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for NullString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Explicit three-arm branch: text, null, anything else. The last
        // arm must stay non-fatal.
        match Value::deserialize(deserializer)? {
            Value::Text(s) => Ok(Self(Some(s))),
            Value::Null => Ok(Self(None)),
            other => {
                warn!(value = ?other, "ignoring nullable string with unexpected wire type");
                Ok(Self(None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(value: &Value) -> NullString {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(value, &mut buf).unwrap();
        ciborium::de::from_reader(buf.as_slice()).unwrap()
    }

    #[test]
    fn test_text_decodes_present() {
        let ns = decode(&Value::from("x"));
        assert!(ns.is_present());
        assert_eq!(ns.as_str(), Some("x"));
    }

    #[test]
    fn test_null_decodes_absent() {
        let ns = decode(&Value::Null);
        assert!(!ns.is_present());
        assert_eq!(ns.as_str(), None);
    }

    #[test]
    fn test_unexpected_types_decode_absent() {
        assert_eq!(decode(&Value::from(42_i64)), NullString::none());
        assert_eq!(decode(&Value::Bool(true)), NullString::none());
        assert_eq!(decode(&Value::Array(vec![])), NullString::none());
    }

    #[test]
    fn test_into_inner() {
        assert_eq!(NullString::some("v").into_inner(), Some("v".to_string()));
        assert_eq!(NullString::none().into_inner(), None);
    }
}
