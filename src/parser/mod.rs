//! Format-expression parsing.
//!
//! Format expressions are parsed once, when a format table is loaded, into
//! an [`Expr`](ast::Expr) tree that the evaluator interprets on every call.

mod api;
pub mod ast;
pub mod static_semantics;
#[allow(non_fmt_panics)]
#[cfg(test)]
mod unit_tests;
pub mod util;

pub use api::{parse_to_ast, parse_to_token_tree, FormatParser, Rule};
pub use ast::Expr;
