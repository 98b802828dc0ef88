//! A small JSON object-mapping engine with pluggable codec hooks.
//!
//! The engine maps between JSON text and typed Rust values through a
//! per-type codec pipeline. Every type is described by a structural
//! [`Shape`]; the first time a shape is resolved, the engine builds its
//! codec, runs every registered [`ReaderModifier`] / [`WriterModifier`]
//! hook over it, and caches the result by canonical signature. Modules
//! can also register custom leaf codecs for nominal types and replace
//! the property introspector.
//!
//! # Quick start
//!
//! ```
//! use palisade_mapper::Mapper;
//!
//! let mapper = Mapper::builder().build();
//! let numbers: Vec<i32> = mapper.read_value("[1,2,3]").unwrap();
//! assert_eq!(numbers, vec![1, 2, 3]);
//! assert_eq!(mapper.write_value(&numbers).unwrap(), "[1,2,3]");
//! ```

pub mod error;
pub mod introspect;
pub mod mapper;
pub mod modifier;
pub mod module;
pub mod reader;
pub mod shape;
pub mod writer;

pub use error::{json_kind, MapError, MapResult};
pub use introspect::{Conventions, Introspector, PropertyMeta, ResolvedProperty};
pub use mapper::{Mapper, MapperBuilder};
pub use modifier::{ReaderModifier, WriterModifier};
pub use module::{MapperModule, SetupContext};
pub use reader::{ReadKey, ReadValue};
pub use shape::{
    ArrayShape, EnumShape, Field, JsonShaped, ScalarKind, ScalarShape, Shape, StructShape,
    TypeToken,
};
pub use writer::{WriteKey, WriteValue};
