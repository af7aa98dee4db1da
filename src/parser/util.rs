use crate::parser::ast::Expr;

pub const TAB_WIDTH: usize = 2;

pub fn spaces(time: usize) -> String {
    " ".repeat(time)
}

/// Render `expr` back to format-expression source, parenthesizing only where
/// precedence requires it.
pub fn to_source(expr: &Expr) -> String {
    render(expr, 0)
}

// Binding strength, loosest first: conditional, or, and, concatenation.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Conditional { .. } => 0,
        Expr::Or(_) => 1,
        Expr::And(_) => 2,
        Expr::Concat(_) => 3,
        _ => 4,
    }
}

fn render(expr: &Expr, min: u8) -> String {
    let s = match expr {
        Expr::Empty => String::new(),
        Expr::Generator(name) => name.clone(),
        Expr::Macro(name) => format!("@{}", name),
        Expr::Literal(text) => format!("{:?}", text),
        Expr::Concat(items) => join(items, " + ", 4),
        Expr::Or(items) => join(items, " or ", 2),
        Expr::And(items) => join(items, " and ", 3),
        Expr::Conditional {
            if_true,
            condition,
            if_false,
        } => format!(
            "{} if {} else {}",
            render(if_true, 1),
            render(condition, 1),
            render(if_false, 0)
        ),
    };
    if precedence(expr) < min {
        format!("({})", s)
    } else {
        s
    }
}

fn join(items: &[Expr], sep: &str, min: u8) -> String {
    items
        .iter()
        .map(|item| render(item, min))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Indented tree dump of `expr`, one node per line.
pub fn to_tree_string(expr: &Expr) -> String {
    let mut lines = vec![];
    tree_lines(expr, 0, &mut lines);
    lines.join("\n")
}

fn tree_lines(expr: &Expr, level: usize, lines: &mut Vec<String>) {
    let pad = spaces(level * TAB_WIDTH);
    match expr {
        Expr::Empty => lines.push(format!("{}Empty", pad)),
        Expr::Generator(name) => lines.push(format!("{}Generator({})", pad, name)),
        Expr::Macro(name) => lines.push(format!("{}Macro({})", pad, name)),
        Expr::Literal(text) => lines.push(format!("{}Literal({:?})", pad, text)),
        Expr::Concat(items) | Expr::Or(items) | Expr::And(items) => {
            let label = match expr {
                Expr::Concat(_) => "Concat",
                Expr::Or(_) => "Or",
                _ => "And",
            };
            lines.push(format!("{}{}", pad, label));
            for item in items {
                tree_lines(item, level + 1, lines);
            }
        }
        Expr::Conditional {
            if_true,
            condition,
            if_false,
        } => {
            lines.push(format!("{}Conditional", pad));
            tree_lines(condition, level + 1, lines);
            tree_lines(if_true, level + 1, lines);
            tree_lines(if_false, level + 1, lines);
        }
    }
}
