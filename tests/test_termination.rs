//! Demand-driven evaluation settles for any expression over any names.

extern crate utter;

use std::collections::HashMap;

use proptest::prelude::*;

use utter::parser::static_semantics::get_generator_names;
use utter::parser::Expr;
use utter::runner::ds::{AccessError, Capability, ElementList, GeneratorResult, NativeId};
use utter::runner::eval::{DemandEvaluator, Evaluation};

/// Registered, failing and unregistered names alike.
const NAMES: &[&str] = &[
    "name",
    "label",
    "roleName",
    "checkedState",
    "imageDescription",
    "missingOne",
    "missingTwo",
];

fn generator(name: &str) -> Option<GeneratorResult> {
    match name {
        "name" => Some(Ok(ElementList::text("Apply"))),
        "label" => Some(Ok(ElementList::new())),
        "roleName" => Some(Ok(ElementList::text("push button"))),
        "checkedState" => Some(Err(AccessError::StaleObject(NativeId::new("ok")).into())),
        "imageDescription" => {
            Some(Err(AccessError::CapabilityUnavailable(Capability::Image).into()))
        }
        _ => None,
    }
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        6 => prop::sample::select(NAMES).prop_map(|name| Expr::Generator(name.to_string())),
        1 => "[a-z]{1,6}".prop_map(Expr::Literal),
        1 => Just(Expr::Empty),
    ];
    leaf.prop_recursive(5, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..5).prop_map(Expr::Concat),
            prop::collection::vec(inner.clone(), 2..5).prop_map(Expr::Or),
            prop::collection::vec(inner.clone(), 2..5).prop_map(Expr::And),
            (inner.clone(), inner.clone(), inner).prop_map(|(if_true, condition, if_false)| {
                Expr::Conditional {
                    if_true: Box::new(if_true),
                    condition: Box::new(condition),
                    if_false: Box::new(if_false),
                }
            }),
        ]
    })
}

/// Run `expr` with a resolver that counts how often each name is asked for.
fn run_counting(
    expr: &Expr,
    exhaustive: bool,
) -> (usize, Result<Evaluation, String>, HashMap<String, usize>) {
    let mut calls: HashMap<String, usize> = HashMap::new();
    let evaluator = DemandEvaluator::new(expr).exhaustive(exhaustive);
    let mut resolver = |name: &str| {
        *calls.entry(name.to_string()).or_insert(0) += 1;
        generator(name)
    };
    let result = evaluator.run(&mut resolver).map_err(|e| e.to_string());
    (evaluator.bound(), result, calls)
}

// ============================================================================
// Termination
// ============================================================================

proptest! {
    #[test]
    fn proptest_lazy_evaluation_settles_within_bound(expr in arb_expr()) {
        let (bound, result, calls) = run_counting(&expr, false);
        prop_assert!(result.is_ok(), "{} did not settle: {:?}", expr, result);
        let evaluation = result.unwrap();

        prop_assert!(evaluation.steps <= bound);
        prop_assert_eq!(evaluation.steps, calls.len());
        for (name, count) in calls.iter() {
            prop_assert_eq!(*count, 1, "{} resolved more than once", name);
        }
        for name in evaluation.unknown.iter() {
            prop_assert!(name.starts_with("missing"));
        }
    }

    #[test]
    fn proptest_exhaustive_evaluation_resolves_every_name_once(expr in arb_expr()) {
        let (bound, result, calls) = run_counting(&expr, true);
        prop_assert!(result.is_ok(), "{} did not settle: {:?}", expr, result);
        let evaluation = result.unwrap();

        prop_assert_eq!(evaluation.steps, bound);
        prop_assert_eq!(calls.len(), get_generator_names(&expr).len());
        for (name, count) in calls.iter() {
            prop_assert_eq!(*count, 1, "{} resolved more than once", name);
        }
    }

    #[test]
    fn proptest_exhaustive_and_lazy_agree(expr in arb_expr()) {
        let (_, lazy, _) = run_counting(&expr, false);
        let (_, exhaustive, _) = run_counting(&expr, true);
        prop_assert_eq!(
            lazy.map(|e| e.elements.texts()),
            exhaustive.map(|e| e.elements.texts())
        );
    }
}
