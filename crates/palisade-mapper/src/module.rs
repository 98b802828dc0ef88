//! Module registration against a mapper builder.

use std::sync::Arc;

use crate::introspect::Introspector;
use crate::mapper::MapperBuilder;
use crate::modifier::{ReaderModifier, WriterModifier};
use crate::reader::ReadValue;
use crate::shape::TypeToken;
use crate::writer::WriteValue;

/// A bundle of registrations installed as one unit.
pub trait MapperModule {
    fn module_name(&self) -> &'static str;

    fn install(&self, ctx: &mut SetupContext<'_>);
}

/// Registration surface handed to a module while it installs.
pub struct SetupContext<'a> {
    pub(crate) builder: &'a mut MapperBuilder,
}

impl SetupContext<'_> {
    pub fn add_reader_modifier(&mut self, modifier: Arc<dyn ReaderModifier>) {
        self.builder.reader_modifiers.push(modifier);
    }

    pub fn add_writer_modifier(&mut self, modifier: Arc<dyn WriterModifier>) {
        self.builder.writer_modifiers.push(modifier);
    }

    /// Register a custom read codec for a nominal type, replacing the
    /// framework-built one.
    pub fn add_value_reader(&mut self, token: TypeToken, reader: Arc<dyn ReadValue>) {
        self.builder.value_readers.insert(token.id(), reader);
    }

    /// Register a custom write codec for a nominal type.
    pub fn add_value_writer(&mut self, token: TypeToken, writer: Arc<dyn WriteValue>) {
        self.builder.value_writers.insert(token.id(), writer);
    }

    pub fn set_introspector(&mut self, introspector: Arc<dyn Introspector>) {
        self.builder.introspector = introspector;
    }
}
