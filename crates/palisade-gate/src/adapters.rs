//! Enforcement adapters: one hook implementation per extension point
//! the mapper exposes.
//!
//! Each hook asks the policy about the resolved shape (or key token).
//! Permitted types keep the framework-built codec untouched; denied
//! types have it discarded and replaced with a reject sentinel. Nothing
//! fails at configuration time; denial is observed when the sentinel
//! is first used.

use std::sync::Arc;

use palisade_mapper::{
    ReadKey, ReadValue, ReaderModifier, Shape, TypeToken, WriteKey, WriteValue, WriterModifier,
};

use crate::policy::RestrictionPolicy;
use crate::reject::{RejectKeyReader, RejectKeyWriter, RejectReader, RejectWriter};

/// Substitutes reject sentinels for read codecs of denied types.
pub struct RestrictedReaders<P> {
    policy: Arc<P>,
}

impl<P: RestrictionPolicy> RestrictedReaders<P> {
    pub fn new(policy: Arc<P>) -> Self {
        Self { policy }
    }

    fn gate(&self, shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        if self.policy.permits(shape) {
            reader
        } else {
            Arc::new(RejectReader::new(shape.canonical()))
        }
    }
}

impl<P: RestrictionPolicy> ReaderModifier for RestrictedReaders<P> {
    fn modify_value_reader(&self, shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        self.gate(shape, reader)
    }

    fn modify_enum_reader(&self, shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        self.gate(shape, reader)
    }

    fn modify_array_reader(&self, shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        self.gate(shape, reader)
    }

    fn modify_list_reader(&self, shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        self.gate(shape, reader)
    }

    fn modify_set_reader(&self, shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        self.gate(shape, reader)
    }

    fn modify_map_reader(&self, shape: &Shape, reader: Arc<dyn ReadValue>) -> Arc<dyn ReadValue> {
        self.gate(shape, reader)
    }

    fn modify_optional_reader(
        &self,
        shape: &Shape,
        reader: Arc<dyn ReadValue>,
    ) -> Arc<dyn ReadValue> {
        self.gate(shape, reader)
    }

    fn modify_key_reader(&self, key: &TypeToken, reader: Arc<dyn ReadKey>) -> Arc<dyn ReadKey> {
        if self.policy.permits_key(key) {
            reader
        } else {
            Arc::new(RejectKeyReader::new(key.name()))
        }
    }
}

/// Substitutes reject sentinels for write codecs of denied types.
pub struct RestrictedWriters<P> {
    policy: Arc<P>,
}

impl<P: RestrictionPolicy> RestrictedWriters<P> {
    pub fn new(policy: Arc<P>) -> Self {
        Self { policy }
    }

    fn gate(&self, shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        if self.policy.permits(shape) {
            writer
        } else {
            Arc::new(RejectWriter::new(shape.canonical()))
        }
    }
}

impl<P: RestrictionPolicy> WriterModifier for RestrictedWriters<P> {
    fn modify_value_writer(&self, shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        self.gate(shape, writer)
    }

    fn modify_enum_writer(&self, shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        self.gate(shape, writer)
    }

    fn modify_array_writer(&self, shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        self.gate(shape, writer)
    }

    fn modify_list_writer(&self, shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        self.gate(shape, writer)
    }

    fn modify_set_writer(&self, shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        self.gate(shape, writer)
    }

    fn modify_map_writer(&self, shape: &Shape, writer: Arc<dyn WriteValue>) -> Arc<dyn WriteValue> {
        self.gate(shape, writer)
    }

    fn modify_optional_writer(
        &self,
        shape: &Shape,
        writer: Arc<dyn WriteValue>,
    ) -> Arc<dyn WriteValue> {
        self.gate(shape, writer)
    }

    fn modify_key_writer(&self, key: &TypeToken, writer: Arc<dyn WriteKey>) -> Arc<dyn WriteKey> {
        if self.policy.permits_key(key) {
            writer
        } else {
            Arc::new(RejectKeyWriter::new(key.name()))
        }
    }
}
