//! The mapper: codec construction, per-signature caching, and the
//! read/write entry points.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::error::{MapError, MapResult};
use crate::introspect::{Conventions, Introspector};
use crate::modifier::{ReaderModifier, WriterModifier};
use crate::module::{MapperModule, SetupContext};
use crate::reader::{
    ArrayReader, EnumReader, IntegerKeyReader, ListReader, MapReader, OptionalReader, Property,
    ReadKey, ReadValue, ScalarReader, SetReader, StringKeyReader, StructReader,
    UnsupportedKeyReader,
};
use crate::shape::{JsonShaped, ScalarKind, Shape, StructShape};
use crate::writer::{
    ArrayWriter, EnumWriter, IntegerKeyWriter, ListWriter, MapWriter, OptionalWriter, ScalarWriter,
    SetWriter, StringKeyWriter, StructWriter, UnsupportedKeyWriter, WriteKey, WriteProperty,
    WriteValue,
};

/// Accumulates configuration for a [`Mapper`]. Single-threaded, one-shot.
pub struct MapperBuilder {
    pub(crate) reader_modifiers: Vec<Arc<dyn ReaderModifier>>,
    pub(crate) writer_modifiers: Vec<Arc<dyn WriterModifier>>,
    pub(crate) value_readers: HashMap<TypeId, Arc<dyn ReadValue>>,
    pub(crate) value_writers: HashMap<TypeId, Arc<dyn WriteValue>>,
    pub(crate) introspector: Arc<dyn Introspector>,
}

impl Default for MapperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperBuilder {
    pub fn new() -> Self {
        Self {
            reader_modifiers: Vec::new(),
            writer_modifiers: Vec::new(),
            value_readers: HashMap::new(),
            value_writers: HashMap::new(),
            introspector: Arc::new(Conventions),
        }
    }

    /// Install a module's registrations.
    pub fn with_module(mut self, module: &dyn MapperModule) -> Self {
        trace!("installing module {}", module.module_name());
        let mut ctx = SetupContext { builder: &mut self };
        module.install(&mut ctx);
        self
    }

    pub fn with_reader_modifier(mut self, modifier: Arc<dyn ReaderModifier>) -> Self {
        self.reader_modifiers.push(modifier);
        self
    }

    pub fn with_writer_modifier(mut self, modifier: Arc<dyn WriterModifier>) -> Self {
        self.writer_modifiers.push(modifier);
        self
    }

    pub fn with_introspector(mut self, introspector: Arc<dyn Introspector>) -> Self {
        self.introspector = introspector;
        self
    }

    /// Freeze an immutable mapper.
    pub fn build(self) -> Mapper {
        Mapper {
            reader_modifiers: self.reader_modifiers,
            writer_modifiers: self.writer_modifiers,
            value_readers: self.value_readers,
            value_writers: self.value_writers,
            introspector: self.introspector,
            readers: RwLock::new(HashMap::new()),
            writers: RwLock::new(HashMap::new()),
        }
    }
}

/// Reads and writes typed values through installed codecs.
///
/// Immutable after construction apart from the internal codec caches;
/// safe to share across threads.
pub struct Mapper {
    reader_modifiers: Vec<Arc<dyn ReaderModifier>>,
    writer_modifiers: Vec<Arc<dyn WriterModifier>>,
    value_readers: HashMap<TypeId, Arc<dyn ReadValue>>,
    value_writers: HashMap<TypeId, Arc<dyn WriteValue>>,
    introspector: Arc<dyn Introspector>,
    readers: RwLock<HashMap<String, Arc<dyn ReadValue>>>,
    writers: RwLock<HashMap<String, Arc<dyn WriteValue>>>,
}

impl Mapper {
    pub fn builder() -> MapperBuilder {
        MapperBuilder::new()
    }

    /// Read a typed value from JSON text.
    pub fn read_value<T>(&self, json: &str) -> MapResult<T>
    where
        T: JsonShaped + DeserializeOwned,
    {
        let raw: Value = serde_json::from_str(json)?;
        let reader = self.reader_for(&T::shape());
        let normalized = reader.read(&raw)?;
        serde_json::from_value(normalized).map_err(MapError::Assemble)
    }

    /// Write a typed value to JSON text.
    pub fn write_value<T>(&self, value: &T) -> MapResult<String>
    where
        T: JsonShaped + Serialize,
    {
        let raw = serde_json::to_value(value).map_err(MapError::Assemble)?;
        let writer = self.writer_for(&T::shape());
        let emitted = writer.write(&raw)?;
        serde_json::to_string(&emitted).map_err(MapError::Assemble)
    }

    /// The read codec for a shape, built (and hook-modified) on first
    /// encounter and cached by canonical signature thereafter.
    pub fn reader_for(&self, shape: &Shape) -> Arc<dyn ReadValue> {
        let signature = shape.canonical();
        if let Some(found) = self.readers.read().expect("reader cache lock").get(&signature) {
            return found.clone();
        }
        trace!("building reader for {signature}");
        let built = self.build_reader(shape);
        self.readers
            .write()
            .expect("reader cache lock")
            .entry(signature)
            .or_insert(built)
            .clone()
    }

    /// The write codec for a shape; same caching discipline as readers.
    pub fn writer_for(&self, shape: &Shape) -> Arc<dyn WriteValue> {
        let signature = shape.canonical();
        if let Some(found) = self.writers.read().expect("writer cache lock").get(&signature) {
            return found.clone();
        }
        trace!("building writer for {signature}");
        let built = self.build_writer(shape);
        self.writers
            .write()
            .expect("writer cache lock")
            .entry(signature)
            .or_insert(built)
            .clone()
    }

    fn build_reader(&self, shape: &Shape) -> Arc<dyn ReadValue> {
        match shape {
            Shape::Scalar(s) => {
                let built = self
                    .value_readers
                    .get(&s.token.id())
                    .cloned()
                    .unwrap_or_else(|| {
                        Arc::new(ScalarReader {
                            kind: s.kind,
                            name: s.token.name(),
                        })
                    });
                self.reader_modifiers
                    .iter()
                    .fold(built, |r, m| m.modify_value_reader(shape, r))
            }
            Shape::Struct(st) => {
                let built = self
                    .value_readers
                    .get(&st.token.id())
                    .cloned()
                    .unwrap_or_else(|| Arc::new(self.build_struct_reader(st)));
                self.reader_modifiers
                    .iter()
                    .fold(built, |r, m| m.modify_value_reader(shape, r))
            }
            Shape::Enum(e) => {
                let built = self
                    .value_readers
                    .get(&e.token.id())
                    .cloned()
                    .unwrap_or_else(|| {
                        Arc::new(EnumReader {
                            name: e.token.name(),
                            variants: e.variants.clone(),
                        })
                    });
                self.reader_modifiers
                    .iter()
                    .fold(built, |r, m| m.modify_enum_reader(shape, r))
            }
            Shape::List(elem) => {
                let built: Arc<dyn ReadValue> = Arc::new(ListReader {
                    elem: self.reader_for(elem),
                });
                self.reader_modifiers
                    .iter()
                    .fold(built, |r, m| m.modify_list_reader(shape, r))
            }
            Shape::Set(elem) => {
                let built: Arc<dyn ReadValue> = Arc::new(SetReader {
                    elem: self.reader_for(elem),
                });
                self.reader_modifiers
                    .iter()
                    .fold(built, |r, m| m.modify_set_reader(shape, r))
            }
            Shape::Map(key, value) => {
                let built: Arc<dyn ReadValue> = Arc::new(MapReader {
                    key: self.key_reader_for(key),
                    value: self.reader_for(value),
                });
                self.reader_modifiers
                    .iter()
                    .fold(built, |r, m| m.modify_map_reader(shape, r))
            }
            Shape::Optional(inner) => {
                let built: Arc<dyn ReadValue> = Arc::new(OptionalReader {
                    inner: self.reader_for(inner),
                });
                self.reader_modifiers
                    .iter()
                    .fold(built, |r, m| m.modify_optional_reader(shape, r))
            }
            Shape::Array(a) => {
                let built: Arc<dyn ReadValue> = Arc::new(ArrayReader {
                    elem: self.reader_for(&a.elem),
                });
                self.reader_modifiers
                    .iter()
                    .fold(built, |r, m| m.modify_array_reader(shape, r))
            }
        }
    }

    fn build_struct_reader(&self, st: &StructShape) -> StructReader {
        let mut properties = Vec::new();
        for field in &st.fields {
            let Some(resolved) = self.introspector.resolve(field) else {
                continue;
            };
            properties.push(Property {
                field: field.name,
                optional: field.shape.is_optional(),
                reader: self.reader_for(&field.shape),
                resolved,
            });
        }
        StructReader {
            name: st.token.name(),
            properties,
        }
    }

    fn key_reader_for(&self, shape: &Shape) -> Arc<dyn ReadKey> {
        let built: Arc<dyn ReadKey> = match shape {
            Shape::Scalar(s) if s.kind == ScalarKind::Str => Arc::new(StringKeyReader),
            Shape::Scalar(s) if s.kind.is_integer() => Arc::new(IntegerKeyReader {
                kind: s.kind,
                name: s.token.name(),
            }),
            other => Arc::new(UnsupportedKeyReader {
                signature: other.canonical(),
            }),
        };
        match shape.token() {
            Some(token) => self
                .reader_modifiers
                .iter()
                .fold(built, |r, m| m.modify_key_reader(&token, r)),
            None => built,
        }
    }

    fn build_writer(&self, shape: &Shape) -> Arc<dyn WriteValue> {
        match shape {
            Shape::Scalar(s) => {
                let built = self
                    .value_writers
                    .get(&s.token.id())
                    .cloned()
                    .unwrap_or_else(|| {
                        Arc::new(ScalarWriter {
                            kind: s.kind,
                            name: s.token.name(),
                        })
                    });
                self.writer_modifiers
                    .iter()
                    .fold(built, |w, m| m.modify_value_writer(shape, w))
            }
            Shape::Struct(st) => {
                let built = self
                    .value_writers
                    .get(&st.token.id())
                    .cloned()
                    .unwrap_or_else(|| Arc::new(self.build_struct_writer(st)));
                self.writer_modifiers
                    .iter()
                    .fold(built, |w, m| m.modify_value_writer(shape, w))
            }
            Shape::Enum(e) => {
                let built = self
                    .value_writers
                    .get(&e.token.id())
                    .cloned()
                    .unwrap_or_else(|| {
                        Arc::new(EnumWriter {
                            name: e.token.name(),
                            variants: e.variants.clone(),
                        })
                    });
                self.writer_modifiers
                    .iter()
                    .fold(built, |w, m| m.modify_enum_writer(shape, w))
            }
            Shape::List(elem) => {
                let built: Arc<dyn WriteValue> = Arc::new(ListWriter {
                    elem: self.writer_for(elem),
                });
                self.writer_modifiers
                    .iter()
                    .fold(built, |w, m| m.modify_list_writer(shape, w))
            }
            Shape::Set(elem) => {
                let built: Arc<dyn WriteValue> = Arc::new(SetWriter {
                    elem: self.writer_for(elem),
                });
                self.writer_modifiers
                    .iter()
                    .fold(built, |w, m| m.modify_set_writer(shape, w))
            }
            Shape::Map(key, value) => {
                let built: Arc<dyn WriteValue> = Arc::new(MapWriter {
                    key: self.key_writer_for(key),
                    value: self.writer_for(value),
                });
                self.writer_modifiers
                    .iter()
                    .fold(built, |w, m| m.modify_map_writer(shape, w))
            }
            Shape::Optional(inner) => {
                let built: Arc<dyn WriteValue> = Arc::new(OptionalWriter {
                    inner: self.writer_for(inner),
                });
                self.writer_modifiers
                    .iter()
                    .fold(built, |w, m| m.modify_optional_writer(shape, w))
            }
            Shape::Array(a) => {
                let built: Arc<dyn WriteValue> = Arc::new(ArrayWriter {
                    elem: self.writer_for(&a.elem),
                });
                self.writer_modifiers
                    .iter()
                    .fold(built, |w, m| m.modify_array_writer(shape, w))
            }
        }
    }

    fn build_struct_writer(&self, st: &StructShape) -> StructWriter {
        let mut properties = Vec::new();
        for field in &st.fields {
            let Some(resolved) = self.introspector.resolve(field) else {
                continue;
            };
            properties.push(WriteProperty {
                field: field.name,
                writer: self.writer_for(&field.shape),
                resolved,
            });
        }
        StructWriter {
            name: st.token.name(),
            properties,
        }
    }

    fn key_writer_for(&self, shape: &Shape) -> Arc<dyn WriteKey> {
        let built: Arc<dyn WriteKey> = match shape {
            Shape::Scalar(s) if s.kind == ScalarKind::Str => Arc::new(StringKeyWriter),
            Shape::Scalar(s) if s.kind.is_integer() => Arc::new(IntegerKeyWriter {
                kind: s.kind,
                name: s.token.name(),
            }),
            other => Arc::new(UnsupportedKeyWriter {
                signature: other.canonical(),
            }),
        };
        match shape.token() {
            Some(token) => self
                .writer_modifiers
                .iter()
                .fold(built, |w, m| m.modify_key_writer(&token, w)),
            None => built,
        }
    }
}
