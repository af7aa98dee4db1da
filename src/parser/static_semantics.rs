use super::ast::Expr;

/// Distinct generator names referenced by `expr`, in first-occurrence order.
///
/// The length of this list bounds the number of resolution steps the
/// demand-driven evaluator may take for the expression.
pub fn get_generator_names(expr: &Expr) -> Vec<String> {
    let mut names = vec![];
    collect(expr, &mut names, &|e| match e {
        Expr::Generator(n) => Some(n),
        _ => None,
    });
    names
}

/// Distinct `@macro` names referenced by `expr`.
pub fn get_macro_references(expr: &Expr) -> Vec<String> {
    let mut names = vec![];
    collect(expr, &mut names, &|e| match e {
        Expr::Macro(n) => Some(n),
        _ => None,
    });
    names
}

fn collect<'a, F>(expr: &'a Expr, names: &mut Vec<String>, pick: &F)
where
    F: Fn(&'a Expr) -> Option<&'a String>,
{
    if let Some(name) = pick(expr) {
        if !names.iter().any(|n| n == name) {
            names.push(name.clone());
        }
        return;
    }
    match expr {
        Expr::Concat(items) | Expr::Or(items) | Expr::And(items) => {
            for item in items {
                collect(item, names, pick);
            }
        }
        Expr::Conditional {
            if_true,
            condition,
            if_false,
        } => {
            collect(if_true, names, pick);
            collect(condition, names, pick);
            collect(if_false, names, pick);
        }
        Expr::Empty | Expr::Generator(_) | Expr::Macro(_) | Expr::Literal(_) => {}
    }
}

/// Rebuild `expr` with every macro reference replaced by `substitute(name)`.
pub fn substitute_macros<E, F>(expr: &Expr, substitute: &mut F) -> Result<Expr, E>
where
    F: FnMut(&str) -> Result<Expr, E>,
{
    Ok(match expr {
        Expr::Macro(name) => substitute(name)?,
        Expr::Concat(items) => Expr::Concat(substitute_all(items, substitute)?),
        Expr::Or(items) => Expr::Or(substitute_all(items, substitute)?),
        Expr::And(items) => Expr::And(substitute_all(items, substitute)?),
        Expr::Conditional {
            if_true,
            condition,
            if_false,
        } => Expr::Conditional {
            if_true: Box::new(substitute_macros(if_true, substitute)?),
            condition: Box::new(substitute_macros(condition, substitute)?),
            if_false: Box::new(substitute_macros(if_false, substitute)?),
        },
        other => other.clone(),
    })
}

fn substitute_all<E, F>(items: &[Expr], substitute: &mut F) -> Result<Vec<Expr>, E>
where
    F: FnMut(&str) -> Result<Expr, E>,
{
    items
        .iter()
        .map(|item| substitute_macros(item, substitute))
        .collect()
}
