//! Structural type descriptors and canonical signature rendering.
//!
//! A [`Shape`] describes one mappable type: what JSON form it takes and,
//! for containers, the shapes of its parameters. Shapes are the currency
//! of the whole engine: codecs are built from them, hooks receive them,
//! and the canonical rendering of a shape is the exact string a
//! signature-keyed policy matches against.

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::introspect::PropertyMeta;

/// Identity of a nominal type: its `TypeId` plus a stable display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    pub fn of<T: 'static>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The JSON form a scalar takes, with integer width for range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
}

impl ScalarKind {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScalarShape {
    pub token: TypeToken,
    pub kind: ScalarKind,
}

#[derive(Debug, Clone)]
pub struct EnumShape {
    pub token: TypeToken,
    pub variants: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct StructShape {
    pub token: TypeToken,
    pub fields: Vec<Field>,
}

/// Arrays are structural like other containers but keep their own
/// `TypeId` so identity-keyed policies can match them exactly.
#[derive(Debug, Clone)]
pub struct ArrayShape {
    pub id: TypeId,
    pub elem: Box<Shape>,
}

/// One declared struct field: Rust-side name, shape, and optional
/// explicit property metadata for the introspector.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub meta: Option<PropertyMeta>,
}

impl Field {
    pub fn new(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: PropertyMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Structural description of a mappable type.
#[derive(Debug, Clone)]
pub enum Shape {
    Scalar(ScalarShape),
    Enum(EnumShape),
    Struct(StructShape),
    List(Box<Shape>),
    Set(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Optional(Box<Shape>),
    Array(ArrayShape),
}

impl Shape {
    pub fn of<T: JsonShaped>() -> Self {
        T::shape()
    }

    pub fn structure(token: TypeToken, fields: Vec<Field>) -> Self {
        Shape::Struct(StructShape { token, fields })
    }

    pub fn enumeration(token: TypeToken, variants: &[&'static str]) -> Self {
        Shape::Enum(EnumShape {
            token,
            variants: variants.to_vec(),
        })
    }

    /// Token of the nominal type this shape names, if any. Containers
    /// are structural and have none; arrays carry a bare `TypeId`
    /// instead.
    pub fn token(&self) -> Option<TypeToken> {
        match self {
            Shape::Scalar(s) => Some(s.token),
            Shape::Enum(e) => Some(e.token),
            Shape::Struct(s) => Some(s.token),
            _ => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Shape::Optional(_))
    }

    /// The canonical signature of this shape.
    ///
    /// Containers render as `Name<Param,...>` using each parameter's own
    /// canonical form recursively; arrays as `[Elem]`. Exact string
    /// equality on this rendering is the only signature matching rule.
    pub fn canonical(&self) -> String {
        match self {
            Shape::Scalar(s) => s.token.name.to_string(),
            Shape::Enum(e) => e.token.name.to_string(),
            Shape::Struct(s) => s.token.name.to_string(),
            Shape::List(elem) => format!("List<{}>", elem.canonical()),
            Shape::Set(elem) => format!("Set<{}>", elem.canonical()),
            Shape::Map(key, value) => format!("Map<{},{}>", key.canonical(), value.canonical()),
            Shape::Optional(elem) => format!("Optional<{}>", elem.canonical()),
            Shape::Array(a) => format!("[{}]", a.elem.canonical()),
        }
    }
}

/// Types that can describe themselves to the mapper.
pub trait JsonShaped: 'static {
    fn shape() -> Shape;
}

macro_rules! scalar_shaped {
    ($($ty:ty => $kind:ident, $name:literal;)*) => {
        $(impl JsonShaped for $ty {
            fn shape() -> Shape {
                Shape::Scalar(ScalarShape {
                    token: TypeToken::of::<$ty>($name),
                    kind: ScalarKind::$kind,
                })
            }
        })*
    };
}

scalar_shaped! {
    bool => Bool, "bool";
    i8 => I8, "i8";
    i16 => I16, "i16";
    i32 => I32, "i32";
    i64 => I64, "i64";
    u8 => U8, "u8";
    u16 => U16, "u16";
    u32 => U32, "u32";
    u64 => U64, "u64";
    f32 => F32, "f32";
    f64 => F64, "f64";
    String => Str, "String";
}

impl<T: JsonShaped> JsonShaped for Vec<T> {
    fn shape() -> Shape {
        Shape::List(Box::new(T::shape()))
    }
}

impl<T: JsonShaped> JsonShaped for HashSet<T> {
    fn shape() -> Shape {
        Shape::Set(Box::new(T::shape()))
    }
}

impl<T: JsonShaped> JsonShaped for BTreeSet<T> {
    fn shape() -> Shape {
        Shape::Set(Box::new(T::shape()))
    }
}

impl<K: JsonShaped, V: JsonShaped> JsonShaped for HashMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(Box::new(K::shape()), Box::new(V::shape()))
    }
}

impl<K: JsonShaped, V: JsonShaped> JsonShaped for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(Box::new(K::shape()), Box::new(V::shape()))
    }
}

impl<T: JsonShaped> JsonShaped for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }
}

impl<T: JsonShaped> JsonShaped for Box<[T]> {
    fn shape() -> Shape {
        Shape::Array(ArrayShape {
            id: TypeId::of::<Box<[T]>>(),
            elem: Box::new(T::shape()),
        })
    }
}
