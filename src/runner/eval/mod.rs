//! Interpretation of parsed format expressions.

pub mod demand;
pub mod expression;
pub mod types;

pub use demand::DemandEvaluator;
pub use types::{Bindings, Evaluation, NameResolver, Unresolved};
