//! Property metadata and its resolution.
//!
//! Struct fields are declared with an optional [`PropertyMeta`]; the
//! configured [`Introspector`] decides how (and whether) each declared
//! field maps to a JSON property.

use serde_json::Value;

use crate::shape::Field;

/// Explicit metadata declared on a struct field.
#[derive(Debug, Clone, Default)]
pub struct PropertyMeta {
    /// Mapped property name; the declared field name when absent.
    pub name: Option<String>,
    /// Optional namespace qualifier; a qualified property maps to the
    /// JSON key `ns:name`.
    pub namespace: Option<String>,
    /// Required marker.
    pub required: Option<bool>,
    /// Default value as raw JSON text, injected when the property is
    /// absent from input.
    pub default: Option<String>,
}

impl PropertyMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn default_json(mut self, json: impl Into<String>) -> Self {
        self.default = Some(json.into());
        self
    }
}

/// A field as the mapper will actually treat it.
#[derive(Debug, Clone)]
pub struct ResolvedProperty {
    pub name: String,
    pub required: bool,
    pub default: Option<Value>,
}

/// Resolves declared fields to mapped properties.
///
/// Returning `None` drops the field from mapping entirely.
pub trait Introspector: Send + Sync {
    fn resolve(&self, field: &Field) -> Option<ResolvedProperty>;
}

/// Default resolution: declared names as-is, required unless the shape
/// is optional, explicit metadata honored where present.
#[derive(Debug, Default)]
pub struct Conventions;

impl Introspector for Conventions {
    fn resolve(&self, field: &Field) -> Option<ResolvedProperty> {
        let meta = field.meta.as_ref();
        let base = meta
            .and_then(|m| m.name.clone())
            .unwrap_or_else(|| field.name.to_string());
        let name = match meta.and_then(|m| m.namespace.as_deref()) {
            Some(ns) if !ns.is_empty() => format!("{ns}:{base}"),
            _ => base,
        };
        let required = meta
            .and_then(|m| m.required)
            .unwrap_or(!field.shape.is_optional());
        let default = meta
            .and_then(|m| m.default.as_deref())
            .and_then(|text| serde_json::from_str(text).ok());
        Some(ResolvedProperty {
            name,
            required,
            default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    #[test]
    fn conventions_use_field_name() {
        let field = Field::new("wheels", Shape::of::<i32>());
        let resolved = Conventions.resolve(&field).unwrap();
        assert_eq!(resolved.name, "wheels");
        assert!(resolved.required);
        assert!(resolved.default.is_none());
    }

    #[test]
    fn conventions_honor_metadata() {
        let field = Field::new("wheels", Shape::of::<i32>()).with_meta(
            PropertyMeta::named("wheel_count")
                .namespace("veh")
                .required(false)
                .default_json("4"),
        );
        let resolved = Conventions.resolve(&field).unwrap();
        assert_eq!(resolved.name, "veh:wheel_count");
        assert!(!resolved.required);
        assert_eq!(resolved.default, Some(serde_json::json!(4)));
    }

    #[test]
    fn optional_fields_are_not_required() {
        let field = Field::new("note", Shape::of::<Option<String>>());
        let resolved = Conventions.resolve(&field).unwrap();
        assert!(!resolved.required);
    }
}
