use std::time::Instant;

use pest::error::{Error, ErrorVariant};
use pest::iterators::{Pair, Pairs};
use pest::{Parser, Span};
use pest_derive::Parser;
use tracing::trace;

use super::ast::Expr;

#[derive(Parser)]
#[grammar = "parser/format_grammar.pest"] // relative to src
pub struct FormatParser;

const TAB_WIDTH: usize = 2;

pub fn parse_to_token_tree(source: &str) -> Result<String, String> {
    let mut tree = vec![];
    let start = Instant::now();
    let result = FormatParser::parse(Rule::expression, source);
    trace!(
        elapsed_us = start.elapsed().as_micros() as u64,
        "format expression tokenized"
    );

    match result {
        Ok(pairs) => {
            for pair in pairs {
                tree.push(pair_to_string(pair, 0).join("\n"));
            }
        }
        Err(rule) => {
            return Err(format!("Parse error due to {:?}", rule));
        }
    }
    Ok(tree.join("\n"))
}

fn pair_to_string(pair: Pair<Rule>, level: usize) -> Vec<String> {
    let mut tree = vec![];
    let span = pair.as_span();
    let rule_name = format!(
        "{:?} => ({},{}) #{:?}",
        pair.as_rule(),
        span.start(),
        span.end(),
        span.as_str()
    );
    tree.push(format!("{}{}", " ".repeat(level * TAB_WIDTH), rule_name));
    for child_pair in pair.into_inner() {
        tree.append(pair_to_string(child_pair, level + 1).as_mut());
    }
    tree
}

/// Parse a format expression into its AST. Blank input parses to [`Expr::Empty`].
pub fn parse_to_ast(source: &str) -> Result<Expr, Error<Rule>> {
    let pairs = FormatParser::parse(Rule::expression, source)?;
    build_ast_from_expression_pairs(pairs)
}

fn build_ast_from_expression_pairs(pairs: Pairs<Rule>) -> Result<Expr, Error<Rule>> {
    let mut expr = Expr::Empty;
    for pair in pairs {
        match pair.as_rule() {
            Rule::expression => {
                for inner_pair in pair.into_inner() {
                    match inner_pair.as_rule() {
                        Rule::conditional => expr = build_ast_from_conditional(inner_pair)?,
                        Rule::EOI => { /* Do nothing */ }
                        _ => return Err(get_unexpected_error(1, &inner_pair)),
                    }
                }
            }
            Rule::EOI => { /* Do nothing */ }
            _ => return Err(get_unexpected_error(2, &pair)),
        }
    }
    Ok(expr)
}

fn get_unexpected_error(id: i32, pair: &Pair<Rule>) -> Error<Rule> {
    let message = format!("Unexpected state reached [{:?}] - {}", pair.as_rule(), id);
    Error::new_from_span(ErrorVariant::CustomError { message }, pair.as_span())
}

fn get_missing_error(id: i32, span: Span) -> Error<Rule> {
    let message = format!("Expected more tokens - {}", id);
    Error::new_from_span(ErrorVariant::CustomError { message }, span)
}

fn is_keyword(rule: Rule) -> bool {
    matches!(rule, Rule::kw_if | Rule::kw_else | Rule::kw_or | Rule::kw_and)
}

/// Inner pairs of `pair` with the keyword tokens filtered out.
fn operands(pair: Pair<Rule>) -> impl Iterator<Item = Pair<Rule>> {
    pair.into_inner().filter(|p| !is_keyword(p.as_rule()))
}

fn build_ast_from_conditional(pair: Pair<Rule>) -> Result<Expr, Error<Rule>> {
    let span = pair.as_span();
    let mut pair_iter = operands(pair);
    let first = pair_iter.next().ok_or_else(|| get_missing_error(3, span))?;
    let if_true = build_ast_from_disjunction(first)?;
    if let Some(condition_pair) = pair_iter.next() {
        let condition = build_ast_from_disjunction(condition_pair)?;
        let else_pair = pair_iter.next().ok_or_else(|| get_missing_error(4, span))?;
        let if_false = build_ast_from_conditional(else_pair)?;
        Ok(Expr::Conditional {
            if_true: Box::new(if_true),
            condition: Box::new(condition),
            if_false: Box::new(if_false),
        })
    } else {
        Ok(if_true)
    }
}

fn build_ast_from_disjunction(pair: Pair<Rule>) -> Result<Expr, Error<Rule>> {
    let mut operands_list = vec![];
    for inner_pair in operands(pair) {
        operands_list.push(build_ast_from_conjunction(inner_pair)?);
    }
    Ok(collapse(operands_list, Expr::Or))
}

fn build_ast_from_conjunction(pair: Pair<Rule>) -> Result<Expr, Error<Rule>> {
    let mut operands_list = vec![];
    for inner_pair in operands(pair) {
        operands_list.push(build_ast_from_concatenation(inner_pair)?);
    }
    Ok(collapse(operands_list, Expr::And))
}

fn build_ast_from_concatenation(pair: Pair<Rule>) -> Result<Expr, Error<Rule>> {
    let mut parts = vec![];
    for inner_pair in pair.into_inner() {
        parts.push(build_ast_from_primary(inner_pair)?);
    }
    Ok(collapse(parts, Expr::Concat))
}

fn collapse(mut items: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    match items.len() {
        0 => Expr::Empty,
        1 => items.pop().unwrap_or_default(),
        _ => wrap(items),
    }
}

fn build_ast_from_primary(pair: Pair<Rule>) -> Result<Expr, Error<Rule>> {
    match pair.as_rule() {
        Rule::identifier => Ok(Expr::Generator(pair.as_str().to_string())),
        Rule::macro_ref => {
            let span = pair.as_span();
            let name = pair
                .into_inner()
                .next()
                .ok_or_else(|| get_missing_error(5, span))?;
            Ok(Expr::Macro(name.as_str().to_string()))
        }
        Rule::string_literal => {
            let span = pair.as_span();
            let body = pair
                .into_inner()
                .next()
                .ok_or_else(|| get_missing_error(6, span))?;
            Ok(Expr::Literal(unescape(body.as_str())))
        }
        Rule::conditional => build_ast_from_conditional(pair),
        _ => Err(get_unexpected_error(7, &pair)),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
