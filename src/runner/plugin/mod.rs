//! The generator table and application profiles.
//!
//! Generators are plain functions registered by name. The core set is
//! installed by [`GeneratorRegistry::with_core`]; an application profile can
//! replace any of them through
//! [`GeneratorRegistry::override_generator`], which is the only hook the
//! generation core offers for per-application behaviour besides the format
//! tables themselves.
//!
//! ## Example: overriding a generator
//!
//! ```
//! use utter::runner::plugin::{GeneratorFn, GeneratorRegistry};
//! use utter::runner::ds::ElementList;
//!
//! let mut registry = GeneratorRegistry::with_core();
//! registry
//!     .override_generator(
//!         "applicationName",
//!         "mail",
//!         GeneratorFn::Plugin(Box::new(|_, _, _| Ok(ElementList::text("Mail")))),
//!     )
//!     .unwrap();
//! assert_eq!(registry.overrides_for("applicationName"), ["mail".to_string()]);
//! ```

pub mod config;
pub mod registry;
pub mod types;

pub use config::{Profile, Settings, Verbosity};
pub use registry::{GeneratorRegistry, RegistryError};
pub use types::{GeneratorBinding, GeneratorFn, GeneratorSource, NativeGenerator};
