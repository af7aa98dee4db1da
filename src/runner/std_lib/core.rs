//! Core generator registration.

use crate::runner::plugin::registry::GeneratorRegistry;

use super::hierarchy;
use super::naming;
use super::state;
use super::table;

/// Register every compiled-in generator with the registry.
pub fn register_core_generators(registry: &mut GeneratorRegistry) {
    naming::register(registry);
    state::register(registry);
    table::register(registry);
    hierarchy::register(registry);
}
