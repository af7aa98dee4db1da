//! The demand-driven evaluation loop.
//!
//! Evaluate, and whenever evaluation stops at an unresolved generator name,
//! resolve exactly that name and try again. Each retry binds one new name,
//! so an expression with `n` distinct names settles within `n` resolutions.
//! The bound is enforced explicitly: exceeding it is an
//! [`EvaluationError::ResolutionBound`], never a hang.

use tracing::{debug, trace, warn};

use crate::parser::ast::Expr;
use crate::parser::static_semantics::get_generator_names;
use crate::runner::ds::element::ElementList;
use crate::runner::ds::error::{AccessError, EvaluationError, GenerationError};

use super::expression::evaluate_expression;
use super::types::{Bindings, Evaluation, NameResolver, Unresolved};

pub struct DemandEvaluator<'e> {
    expr: &'e Expr,
    exhaustive: bool,
    bound: usize,
}

impl<'e> DemandEvaluator<'e> {
    pub fn new(expr: &'e Expr) -> Self {
        DemandEvaluator {
            expr,
            exhaustive: false,
            bound: get_generator_names(expr).len(),
        }
    }

    /// Demand every operand instead of short-circuiting.
    pub fn exhaustive(mut self, exhaustive: bool) -> Self {
        self.exhaustive = exhaustive;
        self
    }

    /// Maximum number of resolutions: the count of distinct names.
    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn run<R: NameResolver + ?Sized>(
        &self,
        resolver: &mut R,
    ) -> Result<Evaluation, EvaluationError> {
        let mut bindings = Bindings::new();
        let mut evaluation = Evaluation::default();
        loop {
            match evaluate_expression(self.expr, &bindings, self.exhaustive) {
                Ok(elements) => {
                    evaluation.elements = elements;
                    return Ok(evaluation);
                }
                Err(Unresolved(name)) => {
                    if evaluation.steps >= self.bound || bindings.contains_key(&name) {
                        return Err(EvaluationError::ResolutionBound { bound: self.bound });
                    }
                    evaluation.steps += 1;
                    let value = self.resolve_one(&name, resolver, &mut evaluation)?;
                    bindings.insert(name, value);
                }
            }
        }
    }

    fn resolve_one<R: NameResolver + ?Sized>(
        &self,
        name: &str,
        resolver: &mut R,
        evaluation: &mut Evaluation,
    ) -> Result<ElementList, EvaluationError> {
        match resolver.resolve(name) {
            Some(Ok(value)) => Ok(value),
            None => {
                warn!(generator = name, "unknown generator");
                evaluation.unknown.push(name.to_string());
                Ok(ElementList::new())
            }
            Some(Err(GenerationError::Evaluation(e))) => Err(e),
            Some(Err(e)) => {
                match &e {
                    GenerationError::Access(AccessError::CapabilityUnavailable(_)) => {
                        trace!(generator = name, error = %e, "generator contributed nothing")
                    }
                    GenerationError::UnknownGenerator(_) => {
                        warn!(generator = name, error = %e, "generator contributed nothing")
                    }
                    _ => debug!(generator = name, error = %e, "generator contributed nothing"),
                }
                evaluation.failed.push(name.to_string());
                Ok(ElementList::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_to_ast;
    use crate::runner::ds::accessible::{Capability, NativeId};
    use crate::runner::ds::error::GeneratorResult;

    fn stub(name: &str) -> Option<GeneratorResult> {
        match name {
            "name" => Some(Ok(ElementList::text("Wrap long lines"))),
            "checkedState" => Some(Ok(ElementList::text("checked"))),
            "label" => Some(Ok(ElementList::new())),
            "table" => Some(Err(AccessError::CapabilityUnavailable(Capability::Table).into())),
            "stale" => Some(Err(AccessError::StaleObject(NativeId::new("x")).into())),
            "broken" => Some(Err(EvaluationError::DepthExceeded(3).into())),
            _ => None,
        }
    }

    #[test]
    fn test_scenario_settles() {
        let expr = parse_to_ast("name + checkedState").unwrap();
        let evaluation = DemandEvaluator::new(&expr).run(&mut stub).unwrap();
        assert_eq!(evaluation.elements.texts(), vec!["Wrap long lines", "checked"]);
        assert_eq!(evaluation.steps, 2);
    }

    #[test]
    fn test_unknown_name_binds_empty_within_bound() {
        let expr = parse_to_ast("name + noSuchThing + checkedState").unwrap();
        let evaluator = DemandEvaluator::new(&expr);
        let evaluation = evaluator.run(&mut stub).unwrap();
        assert_eq!(evaluation.elements.texts(), vec!["Wrap long lines", "checked"]);
        assert_eq!(evaluation.unknown, vec!["noSuchThing".to_string()]);
        assert!(evaluation.steps <= evaluator.bound());
    }

    #[test]
    fn test_short_circuit_never_demands_unused_names() {
        let expr = parse_to_ast("name or table").unwrap();
        let mut demanded = vec![];
        let mut resolver = |n: &str| {
            demanded.push(n.to_string());
            stub(n)
        };
        DemandEvaluator::new(&expr).run(&mut resolver).unwrap();
        assert_eq!(demanded, vec!["name".to_string()]);
    }

    #[test]
    fn test_generator_failures_are_contained() {
        let expr = parse_to_ast("table + stale + name").unwrap();
        let evaluation = DemandEvaluator::new(&expr).run(&mut stub).unwrap();
        assert_eq!(evaluation.elements.texts(), vec!["Wrap long lines"]);
        assert_eq!(evaluation.failed, vec!["table".to_string(), "stale".to_string()]);
    }

    #[test]
    fn test_evaluation_error_aborts() {
        let expr = parse_to_ast("name + broken").unwrap();
        assert_eq!(
            DemandEvaluator::new(&expr).run(&mut stub),
            Err(EvaluationError::DepthExceeded(3))
        );
    }

    #[test]
    fn test_exhaustive_run_reaches_every_name() {
        let expr = parse_to_ast("label or name if checkedState else missing").unwrap();
        let mut demanded = vec![];
        let mut resolver = |n: &str| {
            demanded.push(n.to_string());
            Some(Ok(ElementList::new()))
        };
        let evaluator = DemandEvaluator::new(&expr).exhaustive(true);
        let evaluation = evaluator.run(&mut resolver).unwrap();
        assert_eq!(evaluation.steps, 4);
        demanded.sort();
        assert_eq!(demanded, vec!["checkedState", "label", "missing", "name"]);
    }
}
