//! Reject sentinels.
//!
//! A sentinel stands in for the codec of a denied type. It holds only
//! the denied type's rendered name, does nothing at construction, and
//! fails every invocation independently: denial is a property of the
//! type, not of prior use. It never partially consumes input or
//! produces a value.

use serde_json::Value;

use palisade_mapper::{MapError, MapResult, ReadKey, ReadValue, WriteKey, WriteValue};

/// Read codec for a denied type.
pub struct RejectReader {
    type_name: String,
}

impl RejectReader {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl ReadValue for RejectReader {
    fn read(&self, _value: &Value) -> MapResult<Value> {
        Err(MapError::NotPermitted {
            type_name: self.type_name.clone(),
        })
    }
}

/// Write codec for a denied type.
pub struct RejectWriter {
    type_name: String,
}

impl RejectWriter {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl WriteValue for RejectWriter {
    fn write(&self, _value: &Value) -> MapResult<Value> {
        Err(MapError::NotPermitted {
            type_name: self.type_name.clone(),
        })
    }
}

/// Key read codec for a denied key type.
pub struct RejectKeyReader {
    type_name: String,
}

impl RejectKeyReader {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl ReadKey for RejectKeyReader {
    fn read_key(&self, _key: &str) -> MapResult<String> {
        Err(MapError::NotPermitted {
            type_name: self.type_name.clone(),
        })
    }
}

/// Key write codec for a denied key type.
pub struct RejectKeyWriter {
    type_name: String,
}

impl RejectKeyWriter {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl WriteKey for RejectKeyWriter {
    fn write_key(&self, _key: &str) -> MapResult<String> {
        Err(MapError::NotPermitted {
            type_name: self.type_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_invocation_fails_independently() {
        let reader = RejectReader::new("i64");
        for _ in 0..3 {
            let err = reader.read(&json!(1)).unwrap_err();
            assert!(err.is_not_permitted());
            assert!(err.to_string().contains("i64"));
        }
    }

    #[test]
    fn key_sentinels_name_the_key_type() {
        let reader = RejectKeyReader::new("u32");
        let err = reader.read_key("23").unwrap_err();
        assert!(err.to_string().contains("u32"));

        let writer = RejectKeyWriter::new("u32");
        assert!(writer.write_key("23").unwrap_err().is_not_permitted());
    }
}
