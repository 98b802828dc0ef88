//! Signature-keyed restriction policy.
//!
//! Every type, container or not, is matched by its exact canonical
//! signature. There are no category flags: a raw rendering and each
//! distinct parameterization are independent allow-list entries, so
//! permitting `Set<i32>` says nothing about `List<i32>` or `Set<i64>`.

use std::collections::HashSet;
use std::mem;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::trace;

use palisade_mapper::{JsonShaped, Shape, TypeToken};

use crate::policy::RestrictionPolicy;

/// Immutable set of allowed canonical signatures.
#[derive(Debug, Clone, Default)]
pub struct TypeAllowList {
    allowed: HashSet<String>,
}

#[derive(Debug, Deserialize)]
struct AllowListFile {
    types: Vec<String>,
}

impl TypeAllowList {
    pub fn builder() -> TypeAllowListBuilder {
        TypeAllowListBuilder::default()
    }

    /// Load allowed signatures from a YAML file with a `types:` list.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read allow-list: {}", path.display()))?;
        let file: AllowListFile =
            serde_yaml::from_str(&content).context("failed to parse allow-list YAML")?;
        Ok(Self {
            allowed: file.types.into_iter().collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl RestrictionPolicy for TypeAllowList {
    fn permits(&self, shape: &Shape) -> bool {
        let signature = shape.canonical();
        let permitted = self.allowed.contains(&signature);
        trace!("check: {signature} -> {permitted}");
        permitted
    }

    fn permits_key(&self, key: &TypeToken) -> bool {
        let permitted = self.allowed.contains(key.name());
        trace!("check key: {} -> {}", key.name(), permitted);
        permitted
    }
}

/// Accumulates allowed signatures.
///
/// `build` transfers ownership of the accumulated set into the policy
/// and leaves the builder empty, so one builder produces one
/// non-trivial policy.
#[derive(Debug, Default)]
pub struct TypeAllowListBuilder {
    names: HashSet<String>,
}

impl TypeAllowListBuilder {
    /// Allow exactly the signature of `T`.
    pub fn allow<T: JsonShaped>(mut self) -> Self {
        self.names.insert(T::shape().canonical());
        self
    }

    /// Allow an exact signature by name.
    pub fn allow_name(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    /// Allow a set of exact signatures by name.
    pub fn allow_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.names.insert(name.into());
        }
        self
    }

    /// Allow lists of `T`: the element signature and the parameterized
    /// list signature, as two entries.
    pub fn allow_lists_of<T: JsonShaped>(self) -> Self {
        let elem = T::shape().canonical();
        self.allow::<T>().allow_name(format!("List<{elem}>"))
    }

    /// Allow sets of `T`: the element signature and the parameterized
    /// set signature, as two entries.
    pub fn allow_sets_of<T: JsonShaped>(self) -> Self {
        let elem = T::shape().canonical();
        self.allow::<T>().allow_name(format!("Set<{elem}>"))
    }

    /// Allow maps from `K` to `V`: both parameter signatures and the
    /// parameterized map signature, as three entries.
    pub fn allow_maps_of<K: JsonShaped, V: JsonShaped>(self) -> Self {
        let key = K::shape().canonical();
        let value = V::shape().canonical();
        self.allow::<K>()
            .allow::<V>()
            .allow_name(format!("Map<{key},{value}>"))
    }

    pub fn build(&mut self) -> TypeAllowList {
        TypeAllowList {
            allowed: mem::take(&mut self.names),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_are_independent_entries() {
        let policy = TypeAllowList::builder()
            .allow::<i32>()
            .allow_name("List<i32>")
            .build();
        assert!(policy.permits(&Shape::of::<Vec<i32>>()));
        assert!(policy.permits(&Shape::of::<i32>()));
        // Neither the set parameterization nor a different element
        // width is implied.
        assert!(!policy.permits(&Shape::of::<std::collections::BTreeSet<i32>>()));
        assert!(!policy.permits(&Shape::of::<Vec<i64>>()));
    }

    #[test]
    fn convenience_builders_register_both_entries() {
        let policy = TypeAllowList::builder().allow_sets_of::<i32>().build();
        assert!(policy.permits(&Shape::of::<std::collections::HashSet<i32>>()));
        assert!(policy.permits(&Shape::of::<i32>()));
        assert!(!policy.permits(&Shape::of::<Vec<i32>>()));

        let policy = TypeAllowList::builder().allow_maps_of::<i32, String>().build();
        assert!(policy.permits(&Shape::of::<std::collections::HashMap<i32, String>>()));
        assert!(policy.permits(&Shape::of::<i32>()));
        assert!(policy.permits(&Shape::of::<String>()));
        assert!(!policy.permits(&Shape::of::<std::collections::HashMap<String, i32>>()));
    }

    #[test]
    fn keys_match_by_name() {
        let policy = TypeAllowList::builder().allow::<i32>().build();
        let int_token = Shape::of::<i32>().token().unwrap();
        let long_token = Shape::of::<i64>().token().unwrap();
        assert!(policy.permits_key(&int_token));
        assert!(!policy.permits_key(&long_token));
    }

    #[test]
    fn build_drains_the_builder() {
        let mut builder = TypeAllowList::builder().allow::<i32>();
        let first = builder.build();
        assert!(first.permits(&Shape::of::<i32>()));

        let second = builder.build();
        assert!(second.is_empty());
        assert!(!second.permits(&Shape::of::<i32>()));
    }
}
