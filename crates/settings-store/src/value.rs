use serde::{Deserialize, Serialize};

/// A single persisted value.
///
/// Serialized untagged so a settings document reads as a flat JSON object of
/// numbers and strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    /// Integer slot.
    Int(i32),
    /// String slot.
    Str(String),
}

impl StoredValue {
    /// Returns the integer payload, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    /// Returns the string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            Self::Int(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_json_shape() {
        let json = serde_json::to_string(&StoredValue::Int(1)).unwrap();
        assert_eq!(json, "1");
        let json = serde_json::to_string(&StoredValue::Str("Physics".into())).unwrap();
        assert_eq!(json, "\"Physics\"");

        let parsed: StoredValue = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(parsed.as_str(), Some("42"));
        assert_eq!(parsed.as_int(), None);
    }
}
