use std::fmt;

use super::util::to_source;

/// A parsed format expression.
///
/// Values are element lists. A value is truthy when the list is non-empty,
/// which is what `and`, `or` and the conditional test.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The blank expression. Always evaluates to an empty list.
    Empty,
    /// Reference to a generator by name, e.g. `labelAndName`.
    Generator(String),
    /// `@name` reference to a macro in the same format table. Inlined at load.
    Macro(String),
    /// A quoted string, emitted as a single text element.
    Literal(String),
    /// `a + b + c`
    Concat(Vec<Expr>),
    /// `a or b or c`: the first truthy operand, else the last one.
    Or(Vec<Expr>),
    /// `a and b and c`: the first falsy operand, else the last one.
    And(Vec<Expr>),
    /// `if_true if condition else if_false`
    Conditional {
        if_true: Box<Expr>,
        condition: Box<Expr>,
        if_false: Box<Expr>,
    },
}

impl Expr {
    pub fn is_empty(&self) -> bool {
        matches!(self, Expr::Empty)
    }
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Empty
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_source(self))
    }
}
