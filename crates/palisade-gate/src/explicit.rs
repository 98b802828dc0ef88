//! Explicit-only property resolution.
//!
//! The convention introspector would map every declared field, which
//! lets a struct expose properties nobody meant to serialize. This one
//! consults a field's explicit metadata and nothing else: no metadata,
//! no mapping.

use palisade_mapper::{Field, Introspector, ResolvedProperty};

/// Resolves a field from its explicit metadata only.
#[derive(Debug, Default)]
pub struct ExplicitProperties;

impl Introspector for ExplicitProperties {
    fn resolve(&self, field: &Field) -> Option<ResolvedProperty> {
        let meta = field.meta.as_ref()?;
        let base = meta
            .name
            .clone()
            .unwrap_or_else(|| field.name.to_string());
        let name = match meta.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{ns}:{base}"),
            _ => base,
        };
        Some(ResolvedProperty {
            name,
            required: meta.required.unwrap_or(false),
            default: meta
                .default
                .as_deref()
                .and_then(|text| serde_json::from_str(text).ok()),
        })
    }
}
