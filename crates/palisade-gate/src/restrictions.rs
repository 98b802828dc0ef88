//! Category-flag restriction policy.
//!
//! Container categories (lists, sets, maps, optionals) are gated by
//! independent booleans; scalars, structs, enums, and arrays are gated
//! by exact type identity. A category flag admits only the
//! container node itself: each element type is a distinct descriptor
//! the engine resolves separately, so `permit_lists` alone admits `[]`
//! and denies every non-empty concrete list.

use std::any::TypeId;
use std::collections::HashSet;

use tracing::trace;

use palisade_mapper::{JsonShaped, Shape, TypeToken};

use crate::policy::RestrictionPolicy;

/// Immutable flag-and-identity policy. Built once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct TypeRestrictions {
    permit_lists: bool,
    permit_sets: bool,
    permit_maps: bool,
    permit_optionals: bool,
    types: HashSet<TypeId>,
}

impl TypeRestrictions {
    pub fn builder() -> TypeRestrictionsBuilder {
        TypeRestrictionsBuilder::default()
    }

    fn check(&self, shape: &Shape) -> bool {
        match shape {
            Shape::List(_) => self.permit_lists,
            Shape::Set(_) => self.permit_sets,
            Shape::Map(_, _) => self.permit_maps,
            Shape::Optional(_) => self.permit_optionals,
            Shape::Array(a) => self.types.contains(&a.id),
            other => other
                .token()
                .is_some_and(|token| self.types.contains(&token.id())),
        }
    }
}

impl RestrictionPolicy for TypeRestrictions {
    fn permits(&self, shape: &Shape) -> bool {
        let permitted = self.check(shape);
        trace!("check: {} -> {}", shape.canonical(), permitted);
        permitted
    }

    fn permits_key(&self, key: &TypeToken) -> bool {
        let permitted = self.types.contains(&key.id());
        trace!("check key: {} -> {}", key.name(), permitted);
        permitted
    }
}

/// Accumulates permitted types and category flags. Not thread-safe;
/// consumed by `build`.
#[derive(Debug, Default)]
pub struct TypeRestrictionsBuilder {
    permit_lists: bool,
    permit_sets: bool,
    permit_maps: bool,
    permit_optionals: bool,
    types: HashSet<TypeId>,
}

impl TypeRestrictionsBuilder {
    /// Permit exactly the type `T`.
    pub fn permit<T: JsonShaped>(mut self) -> Self {
        match T::shape() {
            Shape::Array(a) => {
                self.types.insert(a.id);
            }
            shape => match shape.token() {
                Some(token) => {
                    self.types.insert(token.id());
                }
                // Container categories are permitted through their
                // flags, not through identities.
                None => trace!("no identity to permit for {}", shape.canonical()),
            },
        }
        self
    }

    pub fn permit_lists(mut self, permit: bool) -> Self {
        self.permit_lists = permit;
        self
    }

    pub fn permit_sets(mut self, permit: bool) -> Self {
        self.permit_sets = permit;
        self
    }

    pub fn permit_maps(mut self, permit: bool) -> Self {
        self.permit_maps = permit;
        self
    }

    pub fn permit_optionals(mut self, permit: bool) -> Self {
        self.permit_optionals = permit;
        self
    }

    pub fn build(self) -> TypeRestrictions {
        TypeRestrictions {
            permit_lists: self.permit_lists,
            permit_sets: self.permit_sets,
            permit_maps: self.permit_maps,
            permit_optionals: self.permit_optionals,
            types: self.types,
        }
    }
}
