//! JSON rendering.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any report to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_to_json_formats() {
        let value = BTreeMap::from([("title", "Test")]);

        let pretty = to_json(&value, JsonFormat::Pretty).unwrap();
        assert!(pretty.contains("\"title\""));
        assert!(pretty.contains('\n'));

        let compact = to_json(&value, JsonFormat::Compact).unwrap();
        assert_eq!(compact, r#"{"title":"Test"}"#);
    }

    #[test]
    fn test_unserializable_value() {
        // Non-string map keys cannot become JSON object keys
        let value = BTreeMap::from([(vec![1u8], 1)]);
        assert!(matches!(
            to_json(&value, JsonFormat::Compact),
            Err(Error::Render(_))
        ));
    }
}
