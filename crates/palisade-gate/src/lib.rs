//! Allow-list enforcement for the palisade mapper.
//!
//! The gate decides, for every type the mapper resolves, whether
//! reading or writing values of that type is permitted. Denial is
//! encoded by substitution: a denied type's codec is replaced with a
//! sentinel that fails on first use, so mapper construction itself
//! never fails and everything not explicitly permitted fails closed.
//!
//! Two policy variants exist:
//!
//! - [`TypeRestrictions`] gates container categories (lists, sets,
//!   maps, optionals) with independent flags and everything else by
//!   exact type identity;
//! - [`TypeAllowList`] matches every type, container or not, by its
//!   exact canonical signature.
//!
//! # Quick start
//!
//! ```
//! use palisade_gate::{configure, TypeRestrictions};
//! use palisade_mapper::Mapper;
//!
//! let policy = TypeRestrictions::builder().permit::<i32>().build();
//! let mapper = configure(Mapper::builder(), policy).build();
//!
//! assert_eq!(mapper.read_value::<i32>("23").unwrap(), 23);
//! assert!(mapper.read_value::<i64>("23").unwrap_err().is_not_permitted());
//! ```

use std::sync::Arc;

use palisade_mapper::{MapperBuilder, MapperModule, SetupContext};

pub mod adapters;
pub mod allowlist;
pub mod explicit;
pub mod policy;
pub mod reject;
pub mod restrictions;

pub use adapters::{RestrictedReaders, RestrictedWriters};
pub use allowlist::{TypeAllowList, TypeAllowListBuilder};
pub use explicit::ExplicitProperties;
pub use policy::RestrictionPolicy;
pub use reject::{RejectKeyReader, RejectKeyWriter, RejectReader, RejectWriter};
pub use restrictions::{TypeRestrictions, TypeRestrictionsBuilder};

/// Registers the enforcement adapters for a shared policy.
pub struct RestrictionModule<P> {
    policy: Arc<P>,
}

impl<P> RestrictionModule<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl<P: RestrictionPolicy + 'static> MapperModule for RestrictionModule<P> {
    fn module_name(&self) -> &'static str {
        "palisade.restrictions"
    }

    fn install(&self, ctx: &mut SetupContext<'_>) {
        ctx.add_reader_modifier(Arc::new(RestrictedReaders::new(self.policy.clone())));
        ctx.add_writer_modifier(Arc::new(RestrictedWriters::new(self.policy.clone())));
    }
}

/// Apply the full hardened profile to a mapper builder: enforcement
/// adapters for `policy` plus explicit-only property resolution.
pub fn configure<P: RestrictionPolicy + 'static>(
    builder: MapperBuilder,
    policy: P,
) -> MapperBuilder {
    builder
        .with_introspector(Arc::new(ExplicitProperties))
        .with_module(&RestrictionModule::new(policy))
}
