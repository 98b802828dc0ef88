//! Extension points invoked while codecs are being built.
//!
//! One method exists per category the engine resolves: bean/scalar
//! values, enums, arrays, lists, sets, maps, optionals, and map keys.
//! Every method defaults to pass-through; an implementation may return
//! the codec unchanged or substitute its own. Hooks run once per
//! distinct canonical signature, when the codec for that signature is
//! first built.

use std::sync::Arc;

use crate::reader::{ReadKey, ReadValue};
use crate::shape::{Shape, TypeToken};
use crate::writer::{WriteKey, WriteValue};

/// Hooks over framework-built read codecs.
pub trait ReaderModifier: Send + Sync {
    /// Bean and scalar values.
    fn modify_value_reader(&self, _shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        reader
    }

    fn modify_enum_reader(&self, _shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        reader
    }

    fn modify_array_reader(&self, _shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        reader
    }

    fn modify_list_reader(&self, _shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        reader
    }

    fn modify_set_reader(&self, _shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        reader
    }

    fn modify_map_reader(&self, _shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        reader
    }

    fn modify_optional_reader(
        &self,
        _shape: &Shape,
        reader: Arc<dyn ReadValue>,
    ) -> Arc<dyn ReadValue> {
        reader
    }

    fn modify_key_reader(&self, _key: &TypeToken, reader: Arc<dyn ReadKey>) -> Arc<dyn ReadKey> {
        reader
    }
}

/// Hooks over framework-built write codecs.
pub trait WriterModifier: Send + Sync {
    /// Bean and scalar values.
    fn modify_value_writer(
        &self,
        _shape: &Shape,
        writer: Arc<dyn WriteValue>,
    ) -> Arc<dyn WriteValue> {
        writer
    }

    fn modify_enum_writer(&self, _shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        writer
    }

    fn modify_array_writer(
        &self,
        _shape: &Shape,
        writer: Arc<dyn WriteValue>,
    ) -> Arc<dyn WriteValue> {
        writer
    }

    fn modify_list_writer(&self, _shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        writer
    }

    fn modify_set_writer(&self, _shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        writer
    }

    fn modify_map_writer(&self, _shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        writer
    }

    fn modify_optional_writer(
        &self,
        _shape: &Shape,
        writer: Arc<dyn WriteValue>,
    ) -> Arc<dyn WriteValue> {
        writer
    }

    fn modify_key_writer(&self, _key: &TypeToken, writer: Arc<dyn WriteKey>) -> Arc<dyn WriteKey> {
        writer
    }
}
