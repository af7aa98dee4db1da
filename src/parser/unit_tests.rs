use super::api::{parse_to_ast, parse_to_token_tree, FormatParser, Rule};
use super::ast::Expr;
use super::static_semantics::{get_generator_names, get_macro_references};
use super::util::{to_source, to_tree_string};

use pest::consumes_to;
use pest::parses_to;
use pest::Parser;
use pretty_assertions::assert_eq;

fn gen(name: &str) -> Expr {
    Expr::Generator(name.to_string())
}

#[test]
fn test_identifier_token() {
    parses_to! {
        parser: FormatParser,
        input: "labelAndName",
        rule: Rule::identifier,
        tokens: [
            identifier(0, 12)
        ]
    };
}

#[test]
fn test_macro_token() {
    parses_to! {
        parser: FormatParser,
        input: "@state",
        rule: Rule::macro_ref,
        tokens: [
            macro_ref(0, 6, [
                identifier(1, 6)
            ])
        ]
    };
}

#[test]
fn test_keyword_is_not_identifier() {
    for keyword in ["or", "and", "if", "else"] {
        assert!(FormatParser::parse(Rule::identifier, keyword).is_err());
    }
}

#[test]
fn test_identifier_with_keyword_prefix() {
    assert_eq!(parse_to_ast("order").unwrap(), gen("order"));
    assert_eq!(parse_to_ast("android").unwrap(), gen("android"));
}

#[test]
fn test_blank_expression_is_empty() {
    assert_eq!(parse_to_ast("").unwrap(), Expr::Empty);
    assert_eq!(parse_to_ast("   \n ").unwrap(), Expr::Empty);
}

#[test]
fn test_concatenation() {
    assert_eq!(
        parse_to_ast("name + checkedState").unwrap(),
        Expr::Concat(vec![gen("name"), gen("checkedState")])
    );
}

#[test]
fn test_concatenation_binds_tighter_than_or() {
    assert_eq!(
        parse_to_ast("label + name or roleName").unwrap(),
        Expr::Or(vec![
            Expr::Concat(vec![gen("label"), gen("name")]),
            gen("roleName"),
        ])
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        parse_to_ast("a or b and c").unwrap(),
        Expr::Or(vec![gen("a"), Expr::And(vec![gen("b"), gen("c")])])
    );
}

#[test]
fn test_conditional() {
    assert_eq!(
        parse_to_ast("name if label else roleName").unwrap(),
        Expr::Conditional {
            if_true: Box::new(gen("name")),
            condition: Box::new(gen("label")),
            if_false: Box::new(gen("roleName")),
        }
    );
}

#[test]
fn test_nested_conditional_is_right_associative() {
    let ast = parse_to_ast("a if b else c if d else e").unwrap();
    match ast {
        Expr::Conditional { if_false, .. } => {
            assert!(matches!(*if_false, Expr::Conditional { .. }))
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parentheses_and_literals() {
    assert_eq!(
        parse_to_ast("(expandableState and (expandableState + \"level\"))").unwrap(),
        Expr::And(vec![
            gen("expandableState"),
            Expr::Concat(vec![
                gen("expandableState"),
                Expr::Literal("level".to_string())
            ]),
        ])
    );
    assert_eq!(
        parse_to_ast("'it\\'s'").unwrap(),
        Expr::Literal("it's".to_string())
    );
}

#[test]
fn test_malformed_expressions_fail() {
    assert!(parse_to_ast("name +").is_err());
    assert!(parse_to_ast("name if label").is_err());
    assert!(parse_to_ast("(name").is_err());
    assert!(parse_to_ast("name name").is_err());
    assert!(parse_to_ast("\"unterminated").is_err());
}

#[test]
fn test_generator_names_are_distinct_and_ordered() {
    let ast = parse_to_ast("name + (label or name) + roleName if label else @x").unwrap();
    assert_eq!(
        get_generator_names(&ast),
        vec!["name".to_string(), "label".to_string(), "roleName".to_string()]
    );
    assert_eq!(get_macro_references(&ast), vec!["x".to_string()]);
}

#[test]
fn test_source_round_trip_keeps_structure() {
    for source in [
        "label + name or roleName",
        "(a or b) + c",
        "a if b or c else d",
        "(a if b else c) + d",
        "@state + \"done\"",
    ] {
        let ast = parse_to_ast(source).unwrap();
        let printed = to_source(&ast);
        assert_eq!(parse_to_ast(&printed).unwrap(), ast, "{}", printed);
    }
}

#[test]
fn test_token_tree_and_ast_dump() {
    let tokens = parse_to_token_tree("name + label").unwrap();
    assert!(tokens.starts_with("expression"));
    assert!(tokens.contains("identifier"));
    let tree = to_tree_string(&parse_to_ast("a or b").unwrap());
    assert_eq!(tree, "Or\n  Generator(a)\n  Generator(b)");
    assert!(parse_to_token_tree("+").is_err());
}
