use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::api::ParseOptions;
use crate::parser::{
    LexicalError, Literal, NodeKind, ParseErrorKind, SelectionMode, Span, TokenKind, parse,
    parse_with_options,
};

use super::precedence_test::sexpr;

fn shape(source: &str) -> String {
    let node = parse(source).unwrap_or_else(|e| panic!("Failed to parse '{}': {}", source, e));
    sexpr(&node)
}

fn error(source: &str) -> ParseErrorKind {
    match parse(source) {
        Ok(node) => panic!("Expected '{}' to fail, got {}", source, sexpr(&node)),
        Err(err) => err.kind,
    }
}

macro_rules! shapes {
    ( $($name:ident => [$(($source:expr, $expected:expr)),* $(,)?]),* $(,)? ) => {
        $(
            #[test]
            fn $name() {
                $(
                    assert_eq!(shape($source), $expected, "source: {}", $source);
                )*
            }
        )*
    };
}

shapes! {
    literals => [
        ("42", "42"),
        ("3.25", "3.25"),
        ("0.5", "0.5"),
        ("true", "true"),
        ("false", "false"),
        ("null", "null"),
        ("'single'", "\"single\""),
        ("\"double\"", "\"double\""),
        ("'a\\nb'", "\"a\\\\nb\""),
    ],
    variables_and_functions => [
        ("#this", "#this"),
        ("#root", "#root"),
        ("#join(names, ',')", "(#join names \",\")"),
        ("#size()", "(#size )"),
        ("#f(1, 2,)", "(#f 1 2)"),
    ],
    properties_and_methods => [
        ("name", "name"),
        ("name()", "(name )"),
        ("a.b.c", "(. a b c)"),
        ("a?.b", "(. a ?b)"),
        ("a.b(1)", "(. a (b 1))"),
        ("a?.b(1)", "(. a (?b 1))"),
    ],
    collections => [
        ("items.![#this * 2]", "(. items (![ (* #this 2)))"),
        ("items?.![x]", "(. items (?![ x))"),
        ("![x]", "(![ x)"),
        ("groups.!![members]", "(. groups (!![ members))"),
        ("items.?[#this > 2]", "(. items (?[ (> #this 2)))"),
        ("items.^[#this > 2]", "(. items (^[ (> #this 2)))"),
        ("items.$[#this > 2]", "(. items ($[ (> #this 2)))"),
        ("?[x]", "(?[ x)"),
    ],
    indexers => [
        ("names[0]", "(. names ([ 0))"),
        ("m['k'][1]", "(. m ([ \"k\") ([ 1))"),
        ("[0]", "([ 0)"),
        ("a[0].b", "(. a ([ 0) b)"),
    ],
    inline_collections => [
        ("{}", "{}"),
        ("{:}", "{}"),
        ("{1,2,3}", "{1 2 3}"),
        ("{1}", "{1}"),
        ("{'a':1,'b':2}", "{\"a\": 1, \"b\": 2}"),
        ("{1: {2}}", "{1: {2}}"),
    ],
    conditionals => [
        ("null ?: 5", "(?: null 5)"),
        ("true ? 1 : 2", "(? true 1 2)"),
        ("a = 1", "(= a 1)"),
    ],
}

#[test]
fn test_empty_list_and_map_differ() {
    assert!(matches!(parse("{}").unwrap().kind, NodeKind::InlineList(ref v) if v.is_empty()));
    assert!(matches!(parse("{:}").unwrap().kind, NodeKind::InlineMap(ref v) if v.is_empty()));
}

#[test]
fn test_integer_literals_wrap() {
    let node = parse("9223372036854775808").unwrap();
    assert_eq!(node.kind, NodeKind::Literal(Literal::Int(i64::MIN)));
}

#[test]
fn test_float_integer_part_is_kept() {
    let node = parse("12.75").unwrap();
    assert_eq!(node.kind, NodeKind::Literal(Literal::Float(12.75)));
}

#[test]
fn test_invalid_numbers() {
    assert_eq!(
        error("12ab"),
        ParseErrorKind::InvalidNumber {
            text: "12ab".to_string()
        }
    );
    assert_eq!(
        error("1.5x"),
        ParseErrorKind::InvalidNumber {
            text: "1.5x".to_string()
        }
    );
}

#[test]
fn test_spans() {
    let node = parse("a + bc").unwrap();
    assert_eq!(node.span, Span::new(0, 6));
    let node = parse("  (1)").unwrap();
    assert_eq!(node.span, Span::new(2, 5));
    let node = parse("-x").unwrap();
    assert_eq!(node.span, Span::new(0, 2));
    let node = parse("#join(a, b)").unwrap();
    assert_eq!(node.span, Span::new(0, 11));
}

#[test]
fn test_absent_left_operand_falls_back_to_null() {
    let node = parse("  ?: 5").unwrap();
    assert_eq!(node.kind, NodeKind::Literal(Literal::Null));
    assert_eq!(node.span, Span::new(1, 3));

    let node = parse("= 1").unwrap();
    assert_eq!(node.kind, NodeKind::Literal(Literal::Null));
    assert_eq!(node.span, Span::new(0, 0));

    // The operator is left unconsumed, so a strict parse rejects it.
    let strict = ParseOptions {
        require_end: true,
        ..Default::default()
    };
    let err = parse_with_options("? 1 : 2", &strict).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::TrailingInput {
            found: TokenKind::QMark
        }
    );
}

#[test]
fn test_trailing_input_is_ignored_by_default() {
    assert_eq!(shape("a b c"), "a");
    let strict = ParseOptions {
        require_end: true,
        ..Default::default()
    };
    let err = parse_with_options("a b", &strict).unwrap_err();
    assert_eq!(err.span, Span::new(2, 3));
}

#[test]
fn test_empty_source() {
    assert_eq!(error(""), ParseErrorKind::EmptySource);
    assert_eq!(error(" \t\n"), ParseErrorKind::EmptySource);
}

#[test]
fn test_no_root_node() {
    assert_eq!(
        error(")"),
        ParseErrorKind::ExpectedExpression {
            found: TokenKind::RParen
        }
    );
    assert_eq!(
        error("* 2"),
        ParseErrorKind::ExpectedExpression {
            found: TokenKind::Star
        }
    );
}

#[test]
fn test_missing_closers() {
    let err = parse("(1 + 2").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnclosedDelimiter {
            delimiter: TokenKind::RParen,
            opened: Span::new(0, 1),
        }
    );
    assert_eq!(err.span, Span::new(6, 6));

    assert!(matches!(
        error("names[0"),
        ParseErrorKind::UnclosedDelimiter {
            delimiter: TokenKind::RSquare,
            ..
        }
    ));
    assert!(matches!(
        error("{1, 2"),
        ParseErrorKind::UnclosedDelimiter {
            delimiter: TokenKind::RCurly,
            ..
        }
    ));
    assert!(matches!(
        error("#join(a, b"),
        ParseErrorKind::UnclosedDelimiter {
            delimiter: TokenKind::RParen,
            ..
        }
    ));
    assert_eq!(
        error("a ? 1 2"),
        ParseErrorKind::UnexpectedToken {
            expected: TokenKind::Colon,
            found: TokenKind::LiteralInt
        }
    );
    assert_eq!(
        error("{'a': 1, 'b' 2}"),
        ParseErrorKind::UnexpectedToken {
            expected: TokenKind::Colon,
            found: TokenKind::LiteralInt
        }
    );
}

#[test]
fn test_end_mid_construct() {
    assert_eq!(
        error("1 +"),
        ParseErrorKind::UnexpectedEnd {
            expected: "an expression"
        }
    );
    assert!(matches!(error("a."), ParseErrorKind::UnexpectedEnd { .. }));
    assert!(matches!(error("true ?"), ParseErrorKind::UnexpectedEnd { .. }));
}

#[test]
fn test_missing_operand() {
    assert_eq!(
        error("1 + )"),
        ParseErrorKind::MissingOperand {
            after: TokenKind::Plus,
            found: TokenKind::RParen
        }
    );
    assert_eq!(
        error("#f(,1)"),
        ParseErrorKind::MissingOperand {
            after: TokenKind::LParen,
            found: TokenKind::Comma
        }
    );
}

#[test]
fn test_bad_dotted_suffix() {
    assert_eq!(
        error("a.[0]"),
        ParseErrorKind::UnexpectedToken {
            expected: TokenKind::Identifier,
            found: TokenKind::LSquare
        }
    );
}

#[test]
fn test_lexical_errors_surface() {
    assert_eq!(
        error("a @ b"),
        ParseErrorKind::Lexical(LexicalError::UnexpectedChar { ch: '@', offset: 2 })
    );
    assert_eq!(
        error("'open"),
        ParseErrorKind::Lexical(LexicalError::UnterminatedString { offset: 0 })
    );
}

#[test]
fn test_nesting_limit() {
    let options = ParseOptions {
        max_depth: 8,
        ..Default::default()
    };
    assert!(parse_with_options("((((1))))", &options).is_ok());
    let deep = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    let err = parse_with_options(&deep, &options).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MaxDepthExceeded { max_depth: 8 });

    let unary = format!("{}1", "-".repeat(20));
    let err = parse_with_options(&unary, &options).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MaxDepthExceeded { max_depth: 8 });
}

#[test]
fn test_chain_links_count_toward_depth() {
    let options = ParseOptions {
        max_depth: 8,
        ..Default::default()
    };
    for op in [" + ", " - ", " || ", " && "] {
        let short = vec!["1"; 6].join(op);
        assert!(parse_with_options(&short, &options).is_ok(), "{short}");

        let long = vec!["1"; 12].join(op);
        let err = parse_with_options(&long, &options).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MaxDepthExceeded { max_depth: 8 });
    }

    // The charge is released once the chain ends.
    let sibling_chains = format!("{{{}, {}}}", vec!["1"; 6].join(" + "), vec!["1"; 6].join(" + "));
    assert!(parse_with_options(&sibling_chains, &options).is_ok());
}

#[test]
fn test_multi_line_source() {
    let source = indoc! {"
        orders
          .?[total > 100]
          .![{id, customer.name}]
    "};
    let node = parse(source).unwrap();
    let NodeKind::Compound(steps) = &node.kind else {
        panic!("expected a compound node, got {}", sexpr(&node));
    };
    assert_eq!(steps.len(), 3);
    assert!(matches!(
        steps[1].kind,
        NodeKind::Selection {
            mode: SelectionMode::All,
            null_safe: false,
            ..
        }
    ));
    assert_eq!(steps[2].span.str_of(source), "![{id, customer.name}]");
}
