//! The decision seam shared by both policy variants.

use palisade_mapper::{Shape, TypeToken};

/// Decides admissibility for resolved types and map keys.
///
/// Implementations are pure functions of immutable state: the same
/// descriptor always yields the same decision, and nothing here may
/// grant access a policy does not explicitly hold. Anything unmatched
/// is denied.
pub trait RestrictionPolicy: Send + Sync {
    /// Is reading or writing a value of this shape permitted?
    fn permits(&self, shape: &Shape) -> bool;

    /// Is this type permitted as a map key? Keys are always checked by
    /// exact identity; a key can never be a container.
    fn permits_key(&self, key: &TypeToken) -> bool;
}
