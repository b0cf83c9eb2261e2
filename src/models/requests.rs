//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for storing a value (`PUT /keys/*key`, `PUT /buckets/:bucket/*key`)
///
/// The bucket and key come from the path; only the value travels in the body.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The value to store, treated as an opaque string
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value, "hello");
    }

    #[test]
    fn test_set_request_empty_value() {
        let req: SetRequest = serde_json::from_str(r#"{"value": ""}"#).unwrap();
        assert!(req.value.is_empty());
    }

    #[test]
    fn test_set_request_missing_value() {
        let result = serde_json::from_str::<SetRequest>(r#"{"other": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_set_request_rejects_non_string_value() {
        let result = serde_json::from_str::<SetRequest>(r#"{"value": 42}"#);
        assert!(result.is_err());
    }
}
