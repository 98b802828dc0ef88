//! Error taxonomy for mapping operations.

use serde_json::Value;
use thiserror::Error;

/// Result type for mapping operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors surfaced while reading or writing a value.
#[derive(Debug, Error)]
pub enum MapError {
    /// Input text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value did not match the expected shape or literal form.
    #[error("expected {expected}, found {found}")]
    Mismatch { expected: String, found: String },

    /// A required property was absent from the input object.
    #[error("missing required property '{field}' for type {type_name}")]
    MissingProperty { type_name: String, field: String },

    /// A string named no known variant of the target enum.
    #[error("unknown variant '{variant}' for enum {type_name}")]
    UnknownVariant { type_name: String, variant: String },

    /// Reading or writing a value of the named type is not permitted.
    ///
    /// Never constructed by the engine itself; raised by installed
    /// codecs that stand in for denied types.
    #[error("type {type_name} is not permitted")]
    NotPermitted { type_name: String },

    /// The normalized value failed to materialize into the target type.
    #[error("cannot assemble value: {0}")]
    Assemble(serde_json::Error),
}

impl MapError {
    /// Shape mismatch against a concrete input value.
    pub fn mismatch(expected: impl Into<String>, found: &Value) -> Self {
        Self::Mismatch {
            expected: expected.into(),
            found: json_kind(found).to_string(),
        }
    }

    pub fn is_not_permitted(&self) -> bool {
        matches!(self, Self::NotPermitted { .. })
    }
}

/// Display name for the JSON kind of a value, used in mismatch reports.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
