//! The generator table: generator name to function.

use std::collections::HashMap;

use thiserror::Error;

use super::types::{GeneratorBinding, GeneratorFn, GeneratorSource, NativeGenerator};
use crate::runner::std_lib::register_core_generators;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Overrides can only replace an existing binding.
    #[error("generator not found: {0}")]
    NotFound(String),
}

/// Registry of generator bindings. Built once, then frozen inside a
/// [`Presenter`](crate::runner::api::Presenter).
pub struct GeneratorRegistry {
    bindings: HashMap<String, GeneratorBinding>,

    /// Override chain (generator name -> sources that replaced it, in order).
    overrides: HashMap<String, Vec<String>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        GeneratorRegistry {
            bindings: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    /// Create a registry holding the core generator set.
    pub fn with_core() -> Self {
        let mut registry = Self::new();
        register_core_generators(&mut registry);
        registry
    }

    /// Register a binding, replacing any binding of the same name.
    pub fn register(&mut self, binding: GeneratorBinding) {
        self.bindings.insert(binding.name.clone(), binding);
    }

    pub fn register_native(&mut self, name: &str, func: NativeGenerator) {
        self.register(GeneratorBinding::native(name, func));
    }

    /// Replace an existing generator on behalf of `source`. This is the
    /// per-application hook: scripts swap in their own behaviour for a name
    /// the format tables already use.
    pub fn override_generator(
        &mut self,
        name: &str,
        source: &str,
        func: GeneratorFn,
    ) -> Result<(), RegistryError> {
        let binding = self
            .bindings
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        binding.func = func;
        binding.source = GeneratorSource::Application(source.to_string());

        self.overrides
            .entry(name.to_string())
            .or_insert_with(Vec::new)
            .push(source.to_string());

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&GeneratorBinding> {
        self.bindings.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Sources that have overridden `name`, oldest first.
    pub fn overrides_for(&self, name: &str) -> &[String] {
        self.overrides.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sorted list of registered names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_core()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::element::ElementList;

    #[test]
    fn test_core_set_is_registered() {
        let registry = GeneratorRegistry::with_core();
        for name in ["name", "checkedState", "tableCellRow", "ancestors", "nodeLevel"] {
            assert!(registry.has(name), "{}", name);
        }
        assert_eq!(registry.get("name").unwrap().source, GeneratorSource::Core);
    }

    #[test]
    fn test_override_is_tracked() {
        let mut registry = GeneratorRegistry::with_core();
        registry
            .override_generator(
                "name",
                "gedit",
                GeneratorFn::Plugin(Box::new(|_, _, _| Ok(ElementList::text("custom")))),
            )
            .unwrap();
        assert_eq!(registry.overrides_for("name"), ["gedit".to_string()]);
        assert_eq!(
            registry.get("name").unwrap().source,
            GeneratorSource::Application("gedit".to_string())
        );
        assert_eq!(
            registry.override_generator(
                "nope",
                "gedit",
                GeneratorFn::Plugin(Box::new(|_, _, _| Ok(ElementList::new())))
            ),
            Err(RegistryError::NotFound("nope".to_string()))
        );
    }
}
