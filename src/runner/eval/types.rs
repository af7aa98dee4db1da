//! Types shared by the expression interpreter and the demand loop.

use std::collections::HashMap;

use crate::runner::ds::element::ElementList;
use crate::runner::ds::error::GeneratorResult;

/// Values bound so far in one evaluation, by generator name.
pub type Bindings = HashMap<String, ElementList>;

/// Evaluation stopped at a generator name that has no binding yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved(pub String);

/// Supplies generator results on demand.
pub trait NameResolver {
    /// Run the generator bound to `name`, or `None` if nothing is bound.
    fn resolve(&mut self, name: &str) -> Option<GeneratorResult>;
}

impl<F> NameResolver for F
where
    F: FnMut(&str) -> Option<GeneratorResult>,
{
    fn resolve(&mut self, name: &str) -> Option<GeneratorResult> {
        self(name)
    }
}

/// Result of a settled evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    pub elements: ElementList,
    /// Number of names resolved before the expression settled.
    pub steps: usize,
    /// Names with no generator, bound to empty output.
    pub unknown: Vec<String>,
    /// Names whose generator failed and contributed nothing.
    pub failed: Vec<String>,
}
