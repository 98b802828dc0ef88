//! Color values and their JSON literal codec.
//!
//! A [`Color`] maps to and from the literal form `#rrggbb`. The codec
//! is an ordinary leaf codec: a malformed literal is an input mismatch,
//! nothing more. Whether `Color` may be mapped at all is decided by
//! whatever restriction policy the mapper carries.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use palisade_mapper::{
    Field, JsonShaped, MapError, MapResult, MapperModule, PropertyMeta, ReadValue, SetupContext,
    Shape, TypeToken, WriteValue,
};

const COLOR_PATTERN: &str = "^#([a-fA-F0-9]{2})([a-fA-F0-9]{2})([a-fA-F0-9]{2})$";

/// An RGB color with unit-interval channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

fn color_token() -> TypeToken {
    TypeToken::of::<Color>("Color")
}

impl JsonShaped for Color {
    fn shape() -> Shape {
        // Field metadata is declared so the struct stays mappable under
        // explicit-only introspection, though the installed codec
        // normally bypasses field mapping entirely.
        Shape::structure(
            color_token(),
            vec![
                Field::new("r", Shape::of::<f64>()).with_meta(PropertyMeta::named("r")),
                Field::new("g", Shape::of::<f64>()).with_meta(PropertyMeta::named("g")),
                Field::new("b", Shape::of::<f64>()).with_meta(PropertyMeta::named("b")),
            ],
        )
    }
}

/// Codec between `#rrggbb` literals and [`Color`] values.
pub struct ColorCodec {
    pattern: Regex,
}

impl ColorCodec {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(COLOR_PATTERN).expect("color pattern"),
        }
    }
}

impl Default for ColorCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadValue for ColorCodec {
    fn read(&self, value: &Value) -> MapResult<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| MapError::mismatch("Color", value))?;
        let captures = self.pattern.captures(text).ok_or_else(|| MapError::Mismatch {
            expected: format!("color matching {COLOR_PATTERN}"),
            found: format!("\"{text}\""),
        })?;
        let channel = |index: usize| -> f64 {
            // Capture groups are two hex digits by construction.
            f64::from(u32::from_str_radix(&captures[index], 16).unwrap_or(0)) / 255.0
        };
        Ok(json!({
            "r": channel(1),
            "g": channel(2),
            "b": channel(3),
        }))
    }
}

impl WriteValue for ColorCodec {
    fn write(&self, value: &Value) -> MapResult<Value> {
        let fields = value
            .as_object()
            .ok_or_else(|| MapError::mismatch("Color", value))?;
        let channel = |name: &str| -> MapResult<u32> {
            let unit = fields
                .get(name)
                .and_then(Value::as_f64)
                .ok_or_else(|| MapError::mismatch("Color channel", value))?;
            Ok((unit.clamp(0.0, 1.0) * 255.0).round() as u32)
        };
        Ok(Value::String(format!(
            "#{:02x}{:02x}{:02x}",
            channel("r")?,
            channel("g")?,
            channel("b")?
        )))
    }
}

/// Registers the color codec for the `Color` type.
pub struct ColorsModule;

impl MapperModule for ColorsModule {
    fn module_name(&self) -> &'static str {
        "palisade.colors"
    }

    fn install(&self, ctx: &mut SetupContext<'_>) {
        let codec = Arc::new(ColorCodec::new());
        ctx.add_value_reader(color_token(), codec.clone());
        ctx.add_value_writer(color_token(), codec);
    }
}
