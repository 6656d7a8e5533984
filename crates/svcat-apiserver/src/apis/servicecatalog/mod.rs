//!
//! # Service Catalog API group
//!
mod binding;
mod k8;

pub mod validation;

pub use self::binding::*;

use svcat_registry::scheme::Scheme;

/// register every kind of the group
pub fn add_to_scheme(scheme: &mut Scheme) {
    scheme.add_known_type::<BindingSpec>();
}
