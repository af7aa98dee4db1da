//! Generator bindings.

use std::fmt;

use crate::runner::api::Presenter;
use crate::runner::ds::accessible::AccessibleRef;
use crate::runner::ds::context::Context;
use crate::runner::ds::error::GeneratorResult;

/// Signature of a compiled-in generator.
pub type NativeGenerator = fn(
    presenter: &Presenter,
    obj: &AccessibleRef,
    ctx: &mut Context,
) -> GeneratorResult;

/// A generator function - either compiled-in or supplied by an application.
pub enum GeneratorFn {
    /// Direct function pointer for the core set.
    Native(NativeGenerator),

    /// Application-provided closure.
    Plugin(Box<dyn Fn(&Presenter, &AccessibleRef, &mut Context) -> GeneratorResult>),
}

impl GeneratorFn {
    pub fn call(
        &self,
        presenter: &Presenter,
        obj: &AccessibleRef,
        ctx: &mut Context,
    ) -> GeneratorResult {
        match self {
            GeneratorFn::Native(f) => f(presenter, obj, ctx),
            GeneratorFn::Plugin(f) => f(presenter, obj, ctx),
        }
    }
}

/// Who supplied a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorSource {
    Core,
    Application(String),
}

impl fmt::Display for GeneratorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorSource::Core => f.write_str("core"),
            GeneratorSource::Application(name) => f.write_str(name),
        }
    }
}

/// A named generator, registered once.
pub struct GeneratorBinding {
    pub name: String,
    pub func: GeneratorFn,
    pub source: GeneratorSource,
}

impl GeneratorBinding {
    pub fn native(name: &str, func: NativeGenerator) -> Self {
        GeneratorBinding {
            name: name.to_string(),
            func: GeneratorFn::Native(func),
            source: GeneratorSource::Core,
        }
    }

    pub fn plugin<F>(name: &str, application: &str, func: F) -> Self
    where
        F: Fn(&Presenter, &AccessibleRef, &mut Context) -> GeneratorResult + 'static,
    {
        GeneratorBinding {
            name: name.to_string(),
            func: GeneratorFn::Plugin(Box::new(func)),
            source: GeneratorSource::Application(application.to_string()),
        }
    }
}
