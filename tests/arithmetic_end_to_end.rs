//! End-to-end pipeline tests over a small arithmetic language
//!
//! Exercises the full text → tokens → parse tree → attributed value flow
//! with one shared engine, the way a caller would actually deploy it.

use once_cell::sync::Lazy;
use parsekit::{
    AttributeGrammar, AttributedChild, Engine, EngineError, LexError, LexicalRuleset,
    ParseError, RuleDefinition, NEWLINE_CATEGORY,
};
use rstest::rstest;

/// Shared arithmetic engine: sums of non-negative integers.
///
/// The addition rule is right-recursive (`Expr -> Term plus Expr | Term`)
/// because the ordered-choice matcher does not support left recursion;
/// addition is associative, so the computed sum is unaffected.
static ENGINE: Lazy<Engine<i64>> = Lazy::new(|| {
    let ruleset = LexicalRuleset::new()
        .rule("number", r"[0-9]+")
        .unwrap()
        .rule("plus", r"\+")
        .unwrap()
        .rule("whitespace", r"[ \t]+")
        .unwrap()
        .rule(NEWLINE_CATEGORY, r"\n")
        .unwrap();

    let definition = vec![
        RuleDefinition::new("Expr")
            .production("sum", &["Term", "plus", "Expr"])
            .production("single", &["Term"]),
        RuleDefinition::new("Term").production("number", &["number"]),
    ];

    let attributes = AttributeGrammar::new()
        .action("Term", "number", |children: &[AttributedChild<i64>]| {
            children[0].token().unwrap().text.parse::<i64>().unwrap()
        })
        .action("Expr", "single", |children: &[AttributedChild<i64>]| {
            *children[0].value().unwrap()
        })
        .action("Expr", "sum", |children: &[AttributedChild<i64>]| {
            children[0].value().unwrap() + children[2].value().unwrap()
        });

    Engine::from_definition(ruleset, &definition, "Expr", attributes)
        .unwrap()
        .ignore(&["whitespace", NEWLINE_CATEGORY])
});

#[test]
fn test_lexes_expression_into_expected_categories() {
    let tokens = ENGINE.tokenize("1 + 2 + 3").unwrap();
    let significant: Vec<(&str, &str)> = tokens
        .iter()
        .filter(|t| t.category != "whitespace")
        .map(|t| (t.category.as_str(), t.text.as_str()))
        .collect();
    assert_eq!(
        significant,
        vec![
            ("number", "1"),
            ("plus", "+"),
            ("number", "2"),
            ("plus", "+"),
            ("number", "3"),
        ]
    );
}

#[test]
fn test_parses_into_nested_sum_tree() {
    let tree = ENGINE.parse("1 + 2 + 3").unwrap();
    assert_eq!(tree.rule_name(), "Expr");
    assert_eq!(tree.variant(), "sum");

    // The tail is itself a sum, nested one level deeper.
    match &tree.children[2] {
        parsekit::ParseChild::Node(tail) => {
            assert_eq!(tail.variant(), "sum");
            match &tail.children[2] {
                parsekit::ParseChild::Node(last) => assert_eq!(last.variant(), "single"),
                parsekit::ParseChild::Token(_) => panic!("sum tail must be a node"),
            }
        }
        parsekit::ParseChild::Token(_) => panic!("sum tail must be a node"),
    }
}

#[rstest]
#[case("1", 1)]
#[case("1 + 2", 3)]
#[case("1 + 2 + 3", 6)]
#[case("10+20+12", 42)]
#[case("7\n+ 8", 15)]
fn test_evaluates_sums(#[case] input: &str, #[case] expected: i64) {
    assert_eq!(ENGINE.evaluate(input).unwrap(), expected);
}

#[test]
fn test_unlexable_character_fails_at_exact_position() {
    let err = ENGINE.evaluate("1 + ? ").unwrap_err();
    assert_eq!(
        err,
        EngineError::Lex(LexError::InvalidCharacter {
            position: 4,
            line: 1,
            column: 4,
        })
    );
}

#[test]
fn test_trailing_operator_is_a_syntax_error() {
    let err = ENGINE.evaluate("1 + 2 +").unwrap_err();
    match err {
        EngineError::Parse(ParseError::Syntax { position, found }) => {
            // The furthest attempt needed a number after the last plus.
            assert_eq!(position, 4);
            assert!(found.is_none());
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_adjacent_numbers_do_not_parse() {
    let err = ENGINE.evaluate("1 2").unwrap_err();
    match err {
        EngineError::Parse(ParseError::Syntax { position, found }) => {
            assert_eq!(position, 1);
            assert_eq!(found.unwrap().category, "number");
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_incomplete_attribute_grammar_fails_on_that_pair() {
    // Same syntax, but the sum action is missing.
    let ruleset = LexicalRuleset::new()
        .rule("number", r"[0-9]+")
        .unwrap()
        .rule("plus", r"\+")
        .unwrap()
        .rule("whitespace", r"[ ]+")
        .unwrap();
    let definition = vec![
        RuleDefinition::new("Expr")
            .production("sum", &["Term", "plus", "Expr"])
            .production("single", &["Term"]),
        RuleDefinition::new("Term").production("number", &["number"]),
    ];
    let attributes = AttributeGrammar::new()
        .action("Term", "number", |children: &[AttributedChild<i64>]| {
            children[0].token().unwrap().text.parse::<i64>().unwrap()
        })
        .action("Expr", "single", |children: &[AttributedChild<i64>]| {
            *children[0].value().unwrap()
        });
    let engine = Engine::from_definition(ruleset, &definition, "Expr", attributes)
        .unwrap()
        .ignore(&["whitespace"]);

    // A plain term still evaluates; a sum hits the missing action.
    assert_eq!(engine.evaluate("5").unwrap(), 5);
    let err = engine.evaluate("1 + 2").unwrap_err();
    assert_eq!(
        err,
        EngineError::Attribute(parsekit::AttributeError::MissingSemanticRule {
            rule_name: "Expr".to_string(),
            variant: "sum".to_string(),
        })
    );
}
