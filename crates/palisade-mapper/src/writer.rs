//! Write codecs: the outward mirror of the read side. A writer receives
//! the serde-produced value of a Rust type and returns the JSON form to
//! emit (property renames applied, leaf literal forms encoded).

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{MapError, MapResult};
use crate::introspect::ResolvedProperty;
use crate::reader::scalar_matches;
use crate::shape::ScalarKind;

/// Transforms one serde-produced value into its emitted JSON form.
pub trait WriteValue: Send + Sync {
    fn write(&self, value: &Value) -> MapResult<Value>;
}

/// Writes one map key in its raw string form.
pub trait WriteKey: Send + Sync {
    fn write_key(&self, key: &str) -> MapResult<String>;
}

pub(crate) struct ScalarWriter {
    pub(crate) kind: ScalarKind,
    pub(crate) name: &'static str,
}

impl WriteValue for ScalarWriter {
    fn write(&self, value: &Value) -> MapResult<Value> {
        if scalar_matches(self.kind, value) {
            Ok(value.clone())
        } else {
            Err(MapError::mismatch(self.name, value))
        }
    }
}

pub(crate) struct EnumWriter {
    pub(crate) name: &'static str,
    pub(crate) variants: Vec<&'static str>,
}

impl WriteValue for EnumWriter {
    fn write(&self, value: &Value) -> MapResult<Value> {
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

pub(crate) struct WriteProperty {
    pub(crate) field: &'static str,
    pub(crate) resolved: ResolvedProperty,
    pub(crate) writer: Arc<dyn WriteValue>,
}

pub(crate) struct StructWriter {
    pub(crate) name: &'static str,
    pub(crate) properties: Vec<WriteProperty>,
}

impl WriteValue for StructWriter {
    fn write(&self, value: &Value) -> MapResult<Value> {
        let input = value
            .as_object()
            .ok_or_else(|| MapError::mismatch(self.name, value))?;
        let mut out = Map::new();
        for prop in &self.properties {
            // Dropped (unresolved) fields never reach this list, so
            // nothing undeclared is ever emitted.
            if let Some(present) = input.get(prop.field) {
                out.insert(prop.resolved.name.clone(), prop.writer.write(present)?);
            }
        }
        Ok(Value::Object(out))
    }
}

fn write_elements(elem: &Arc<dyn WriteValue>, value: &Value) -> MapResult<Value> {
    let items = value
        .as_array()
        .ok_or_else(|| MapError::mismatch("array", value))?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(elem.write(item)?);
    }
    Ok(Value::Array(out))
}

pub(crate) struct ListWriter {
    pub(crate) elem: Arc<dyn WriteValue>,
}

impl WriteValue for ListWriter {
    fn write(&self, value: &Value) -> MapResult<Value> {
        write_elements(&self.elem, value)
    }
}

pub(crate) struct SetWriter {
    pub(crate) elem: Arc<dyn WriteValue>,
}

impl WriteValue for SetWriter {
    fn write(&self, value: &Value) -> MapResult<Value> {
        write_elements(&self.elem, value)
    }
}

pub(crate) struct ArrayWriter {
    pub(crate) elem: Arc<dyn WriteValue>,
}

impl WriteValue for ArrayWriter {
    fn write(&self, value: &Value) -> MapResult<Value> {
        write_elements(&self.elem, value)
    }
}

pub(crate) struct MapWriter {
    pub(crate) key: Arc<dyn WriteKey>,
    pub(crate) value: Arc<dyn WriteValue>,
}

impl WriteValue for MapWriter {
    fn write(&self, value: &Value) -> MapResult<Value> {
        let entries = value
            .as_object()
            .ok_or_else(|| MapError::mismatch("object", value))?;
        let mut out = Map::new();
        for (key, entry) in entries {
            out.insert(self.key.write_key(key)?, self.value.write(entry)?);
        }
        Ok(Value::Object(out))
    }
}

pub(crate) struct OptionalWriter {
    pub(crate) inner: Arc<dyn WriteValue>,
}

impl WriteValue for OptionalWriter {
    fn write(&self, value: &Value) -> MapResult<Value> {
        if value.is_null() {
            Ok(Value::Null)
        } else {
            self.inner.write(value)
        }
    }
}

pub(crate) struct StringKeyWriter;

impl WriteKey for StringKeyWriter {
    fn write_key(&self, key: &str) -> MapResult<String> {
        Ok(key.to_string())
    }
}

pub(crate) struct IntegerKeyWriter {
    pub(crate) kind: ScalarKind,
    pub(crate) name: &'static str,
}

impl WriteKey for IntegerKeyWriter {
    fn write_key(&self, key: &str) -> MapResult<String> {
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

pub(crate) struct UnsupportedKeyWriter {
    pub(crate) signature: String,
}

impl WriteKey for UnsupportedKeyWriter {
    fn write_key(&self, key: &str) -> MapResult<String> {
        Err(MapError::Mismatch {
            expected: format!("string or integer key, not {}", self.signature),
            found: format!("\"{key}\""),
        })
    }
}
