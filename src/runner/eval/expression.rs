use crate::parser::ast::Expr;
use crate::runner::ds::element::{Element, ElementList};

use super::types::{Bindings, Unresolved};

/// Evaluate `expr` against the names bound so far.
///
/// Short-circuiting operators only demand the operands they need, which
/// keeps capability queries lazy. In `exhaustive` mode every operand is
/// demanded; the load-time dry run uses this to reach every name.
pub fn evaluate_expression(
    expr: &Expr,
    bindings: &Bindings,
    exhaustive: bool,
) -> Result<ElementList, Unresolved> {
    match expr {
        Expr::Empty | Expr::Macro(_) => Ok(ElementList::new()),
        Expr::Literal(text) => Ok(ElementList::from(vec![Element::Text(text.clone())])),
        Expr::Generator(name) => bindings
            .get(name)
            .cloned()
            .ok_or_else(|| Unresolved(name.clone())),
        Expr::Concat(items) => {
            let mut out = ElementList::new();
            for item in items {
                out.extend(evaluate_expression(item, bindings, exhaustive)?);
            }
            Ok(out)
        }
        Expr::Or(items) => {
            let mut chosen: Option<ElementList> = None;
            let mut last = ElementList::new();
            for item in items {
                let value = evaluate_expression(item, bindings, exhaustive)?;
                if chosen.is_none() && !value.is_empty() {
                    if !exhaustive {
                        return Ok(value);
                    }
                    chosen = Some(value);
                } else {
                    last = value;
                }
            }
            Ok(chosen.unwrap_or(last))
        }
        Expr::And(items) => {
            let mut chosen: Option<ElementList> = None;
            let mut last = ElementList::new();
            for item in items {
                let value = evaluate_expression(item, bindings, exhaustive)?;
                if chosen.is_none() && value.is_empty() {
                    if !exhaustive {
                        return Ok(value);
                    }
                    chosen = Some(value);
                } else {
                    last = value;
                }
            }
            Ok(chosen.unwrap_or(last))
        }
        Expr::Conditional {
            if_true,
            condition,
            if_false,
        } => {
            let test = evaluate_expression(condition, bindings, exhaustive)?;
            if exhaustive {
                let truthy = evaluate_expression(if_true, bindings, exhaustive)?;
                let falsy = evaluate_expression(if_false, bindings, exhaustive)?;
                return Ok(if test.is_empty() { falsy } else { truthy });
            }
            if test.is_empty() {
                evaluate_expression(if_false, bindings, exhaustive)
            } else {
                evaluate_expression(if_true, bindings, exhaustive)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_to_ast;

    fn bind(pairs: &[(&str, &[&str])]) -> Bindings {
        pairs
            .iter()
            .map(|(name, texts)| (name.to_string(), ElementList::from_texts(texts)))
            .collect()
    }

    fn eval(source: &str, bindings: &Bindings) -> Result<Vec<String>, Unresolved> {
        let expr = parse_to_ast(source).unwrap();
        evaluate_expression(&expr, bindings, false).map(|l| l.texts())
    }

    #[test]
    fn test_or_returns_first_truthy_without_demanding_the_rest() {
        let b = bind(&[("label", &[]), ("name", &["OK"])]);
        assert_eq!(eval("label or name or roleName", &b), Ok(vec!["OK".to_string()]));
    }

    #[test]
    fn test_or_demands_names_in_order() {
        let b = bind(&[("label", &[])]);
        assert_eq!(
            eval("label or name", &b),
            Err(Unresolved("name".to_string()))
        );
    }

    #[test]
    fn test_and_stops_at_falsy() {
        let b = bind(&[("expandableState", &[])]);
        assert_eq!(eval("expandableState and nodeLevel", &b), Ok(vec![]));
        let b = bind(&[("expandableState", &["expanded"]), ("nodeLevel", &["tree level 2"])]);
        assert_eq!(
            eval("expandableState and nodeLevel", &b),
            Ok(vec!["tree level 2".to_string()])
        );
    }

    #[test]
    fn test_conditional_and_literals() {
        let b = bind(&[("label", &["Size"]), ("value", &["12"])]);
        assert_eq!(
            eval("(label + \":\" + value) if value else \"none\"", &b),
            Ok(vec!["Size".to_string(), ":".to_string(), "12".to_string()])
        );
        let b = bind(&[("value", &[])]);
        assert_eq!(
            eval("value if value else \"none\"", &b),
            Ok(vec!["none".to_string()])
        );
    }

    #[test]
    fn test_exhaustive_mode_demands_every_operand() {
        let expr = parse_to_ast("a or b").unwrap();
        let b = bind(&[("a", &["x"])]);
        assert_eq!(
            evaluate_expression(&expr, &b, true),
            Err(Unresolved("b".to_string()))
        );
        let b = bind(&[("a", &["x"]), ("b", &["y"])]);
        assert_eq!(evaluate_expression(&expr, &b, true).unwrap().texts(), vec!["x"]);
    }
}
