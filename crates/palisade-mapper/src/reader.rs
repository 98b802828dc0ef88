//! Read codecs: validate one parsed JSON value and return its
//! normalized form (property renames applied, defaults injected, leaf
//! literal forms decoded). Materialization into the target Rust type
//! happens afterwards via serde.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{MapError, MapResult};
use crate::introspect::ResolvedProperty;
use crate::shape::ScalarKind;

/// Validates one parsed JSON value and returns its normalized form.
pub trait ReadValue: Send + Sync {
    fn read(&self, value: &Value) -> MapResult<Value>;
}

/// Reads one map key from its raw string form.
pub trait ReadKey: Send + Sync {
    fn read_key(&self, key: &str) -> MapResult<String>;
}

pub(crate) fn scalar_matches(kind: ScalarKind, value: &Value) -> bool {
    match kind {
        ScalarKind::Bool => value.is_boolean(),
        ScalarKind::I8 => in_i64_range(value, i64::from(i8::MIN), i64::from(i8::MAX)),
        ScalarKind::I16 => in_i64_range(value, i64::from(i16::MIN), i64::from(i16::MAX)),
        ScalarKind::I32 => in_i64_range(value, i64::from(i32::MIN), i64::from(i32::MAX)),
        ScalarKind::I64 => value.as_i64().is_some(),
        ScalarKind::U8 => in_u64_range(value, u64::from(u8::MAX)),
        ScalarKind::U16 => in_u64_range(value, u64::from(u16::MAX)),
        ScalarKind::U32 => in_u64_range(value, u64::from(u32::MAX)),
        ScalarKind::U64 => value.as_u64().is_some(),
        ScalarKind::F32 | ScalarKind::F64 => value.is_number(),
        ScalarKind::Str => value.is_string(),
    }
}

fn in_i64_range(value: &Value, min: i64, max: i64) -> bool {
    value.as_i64().is_some_and(|n| n >= min && n <= max)
}

fn in_u64_range(value: &Value, max: u64) -> bool {
    value.as_u64().is_some_and(|n| n <= max)
}

pub(crate) struct ScalarReader {
    pub(crate) kind: ScalarKind,
    pub(crate) name: &'static str,
}

impl ReadValue for ScalarReader {
    fn read(&self, value: &Value) -> MapResult<Value> {
        if scalar_matches(self.kind, value) {
            Ok(value.clone())
        } else {
            Err(MapError::mismatch(self.name, value))
        }
    }
}

pub(crate) struct EnumReader {
    pub(crate) name: &'static str,
    pub(crate) variants: Vec<&'static str>,
}

impl ReadValue for EnumReader {
    fn read(&self, value: &Value) -> MapResult<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| MapError::mismatch(self.name, value))?;
        if self.variants.iter().any(|v| *v == text) {
            Ok(value.clone())
        } else {
            Err(MapError::UnknownVariant {
                type_name: self.name.to_string(),
                variant: text.to_string(),
            })
        }
    }
}

/// One mapped property of a struct reader.
pub(crate) struct Property {
    pub(crate) field: &'static str,
    pub(crate) resolved: ResolvedProperty,
    pub(crate) optional: bool,
    pub(crate) reader: Arc<dyn ReadValue>,
}

pub(crate) struct StructReader {
    pub(crate) name: &'static str,
    pub(crate) properties: Vec<Property>,
}

impl ReadValue for StructReader {
    fn read(&self, value: &Value) -> MapResult<Value> {
        let input = value
            .as_object()
            .ok_or_else(|| MapError::mismatch(self.name, value))?;
        let mut out = Map::new();
        for prop in &self.properties {
            match input.get(&prop.resolved.name) {
                Some(present) => {
                    out.insert(prop.field.to_string(), prop.reader.read(present)?);
                }
                None => {
                    // Defaults run through the property's own reader so a
                    // substituted codec still governs defaulted values.
                    if let Some(default) = &prop.resolved.default {
                        out.insert(prop.field.to_string(), prop.reader.read(default)?);
                    } else if prop.resolved.required {
                        return Err(MapError::MissingProperty {
                            type_name: self.name.to_string(),
                            field: prop.resolved.name.clone(),
                        });
                    } else if prop.optional {
                        out.insert(prop.field.to_string(), Value::Null);
                    }
                }
            }
        }
        Ok(Value::Object(out))
    }
}

fn read_elements(elem: &Arc<dyn ReadValue>, value: &Value) -> MapResult<Value> {
    let items = value
        .as_array()
        .ok_or_else(|| MapError::mismatch("array", value))?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(elem.read(item)?);
    }
    Ok(Value::Array(out))
}

pub(crate) struct ListReader {
    pub(crate) elem: Arc<dyn ReadValue>,
}

impl ReadValue for ListReader {
    fn read(&self, value: &Value) -> MapResult<Value> {
        read_elements(&self.elem, value)
    }
}

pub(crate) struct SetReader {
    pub(crate) elem: Arc<dyn ReadValue>,
}

impl ReadValue for SetReader {
    fn read(&self, value: &Value) -> MapResult<Value> {
        read_elements(&self.elem, value)
    }
}

pub(crate) struct ArrayReader {
    pub(crate) elem: Arc<dyn ReadValue>,
}

impl ReadValue for ArrayReader {
    fn read(&self, value: &Value) -> MapResult<Value> {
        read_elements(&self.elem, value)
    }
}

pub(crate) struct MapReader {
    pub(crate) key: Arc<dyn ReadKey>,
    pub(crate) value: Arc<dyn ReadValue>,
}

impl ReadValue for MapReader {
    fn read(&self, value: &Value) -> MapResult<Value> {
        let entries = value
            .as_object()
            .ok_or_else(|| MapError::mismatch("object", value))?;
        let mut out = Map::new();
        for (key, entry) in entries {
            out.insert(self.key.read_key(key)?, self.value.read(entry)?);
        }
        Ok(Value::Object(out))
    }
}

pub(crate) struct OptionalReader {
    pub(crate) inner: Arc<dyn ReadValue>,
}

impl ReadValue for OptionalReader {
    fn read(&self, value: &Value) -> MapResult<Value> {
        if value.is_null() {
            Ok(Value::Null)
        } else {
            self.inner.read(value)
        }
    }
}

pub(crate) struct StringKeyReader;

impl ReadKey for StringKeyReader {
    fn read_key(&self, key: &str) -> MapResult<String> {
        Ok(key.to_string())
    }
}

pub(crate) struct IntegerKeyReader {
    pub(crate) kind: ScalarKind,
    pub(crate) name: &'static str,
}

impl ReadKey for IntegerKeyReader {
    fn read_key(&self, key: &str) -> MapResult<String> {
        let parsed = match self.kind {
            ScalarKind::U8 | ScalarKind::U16 | ScalarKind::U32 | ScalarKind::U64 => {
                key.parse::<u64>().ok().map(Value::from)
            }
            _ => key.parse::<i64>().ok().map(Value::from),
        };
        match parsed {
            Some(v) if scalar_matches(self.kind, &v) => Ok(key.to_string()),
            _ => Err(MapError::Mismatch {
                expected: format!("{} key", self.name),
                found: format!("\"{key}\""),
            }),
        }
    }
}

/// Keys must be string- or integer-shaped; anything else gets this
/// codec, which fails on first use like any other unusable mapping.
pub(crate) struct UnsupportedKeyReader {
    pub(crate) signature: String,
}

impl ReadKey for UnsupportedKeyReader {
    fn read_key(&self, key: &str) -> MapResult<String> {
        Err(MapError::Mismatch {
            expected: format!("string or integer key, not {}", self.signature),
            found: format!("\"{key}\""),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_range_checks() {
        assert!(scalar_matches(ScalarKind::I8, &json!(127)));
        assert!(!scalar_matches(ScalarKind::I8, &json!(128)));
        assert!(!scalar_matches(ScalarKind::U32, &json!(-1)));
        assert!(!scalar_matches(ScalarKind::I32, &json!(1.5)));
        assert!(scalar_matches(ScalarKind::F64, &json!(1.5)));
    }

    #[test]
    fn integer_keys_validate_range() {
        let reader = IntegerKeyReader {
            kind: ScalarKind::U8,
            name: "u8",
        };
        assert_eq!(reader.read_key("200").unwrap(), "200");
        assert!(reader.read_key("300").is_err());
        assert!(reader.read_key("x").is_err());
    }

    #[test]
    fn optional_passes_null_through() {
        let reader = OptionalReader {
            inner: Arc::new(ScalarReader {
                kind: ScalarKind::I32,
                name: "i32",
            }),
        };
        assert_eq!(reader.read(&Value::Null).unwrap(), Value::Null);
        assert_eq!(reader.read(&json!(3)).unwrap(), json!(3));
        assert!(reader.read(&json!("x")).is_err());
    }
}
