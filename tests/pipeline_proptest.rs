//! Property-based tests over the whole pipeline.
//!
//! The load-bearing properties: no stage ever panics, every stage preserves
//! the input text exactly, regrouping a grouped tree is a fixed point, and
//! default-option formatting is the identity.

use proptest::prelude::*;

use sqltree::grouping::group;
use sqltree::splitter::split_stream;
use sqltree::tree::Node;
use sqltree::{format, parse, tokenize, FormatOptions, TokenList};

fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,8}").unwrap()
}

fn literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[0-9]{1,6}").unwrap(),
        prop::string::string_regex("[0-9]{1,3}\\.[0-9]{1,3}").unwrap(),
        prop::string::string_regex("'[a-z ]{0,10}'").unwrap(),
        Just("null".to_string()),
        Just("%s".to_string()),
    ]
}

fn expression_strategy() -> impl Strategy<Value = String> {
    (
        identifier_strategy(),
        prop_oneof![Just("="), Just("<"), Just(">="), Just("<>")],
        literal_strategy(),
    )
        .prop_map(|(lhs, op, rhs)| format!("{lhs} {op} {rhs}"))
}

fn statement_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(identifier_strategy(), 1..4),
        identifier_strategy(),
        prop::option::of(expression_strategy()),
    )
        .prop_map(|(cols, table, cond)| {
            let mut sql = format!("select {} from {}", cols.join(", "), table);
            if let Some(cond) = cond {
                sql.push_str(&format!(" where {cond}"));
            }
            sql
        })
}

fn script_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(statement_strategy(), 1..4).prop_map(|stmts| stmts.join("; "))
}

fn flatten_values(stmt: &TokenList) -> String {
    stmt.flatten().iter().map(|t| t.value.as_str()).collect()
}

fn reflatten(stmt: &TokenList) -> Vec<sqltree::Token> {
    stmt.flatten().into_iter().cloned().collect()
}

proptest! {
    #[test]
    fn test_tokenize_is_lossless(input in "\\PC{0,200}") {
        let joined: String = tokenize(&input).iter().map(|t| t.value.as_str()).collect();
        prop_assert_eq!(joined, input);
    }

    #[test]
    fn test_split_partitions_the_token_stream(input in "\\PC{0,200}") {
        let tokens = tokenize(&input);
        let total: usize = split_stream(tokens.clone()).iter().map(Vec::len).sum();
        prop_assert_eq!(total, tokens.len());
    }

    #[test]
    fn test_parse_never_panics_and_never_loses_text(input in "\\PC{0,200}") {
        let joined: String = parse(&input).iter().map(flatten_values).collect();
        prop_assert_eq!(joined, input);
    }

    #[test]
    fn test_regrouping_flattened_leaves_reproduces_the_tree(sql in script_strategy()) {
        for stmt in parse(&sql) {
            let regrouped = group(reflatten(&stmt));
            prop_assert_eq!(regrouped, stmt);
        }
    }

    #[test]
    fn test_grouped_tree_serializes(sql in script_strategy()) {
        for stmt in parse(&sql) {
            prop_assert!(serde_json::to_string(&stmt).is_ok());
        }
    }

    #[test]
    fn test_default_format_is_identity(sql in script_strategy()) {
        prop_assert_eq!(format(&sql, &FormatOptions::default()), sql);
    }

    #[test]
    fn test_reindent_is_fixed_point(sql in statement_strategy()) {
        let opts = FormatOptions { reindent: true, ..Default::default() };
        let once = format(&sql, &opts);
        prop_assert_eq!(format(&once, &opts), once);
    }

    #[test]
    fn test_groups_are_never_empty(sql in script_strategy()) {
        fn check(list: &TokenList) {
            assert!(!list.tokens.is_empty());
            for node in &list.tokens {
                if let Node::Group(g) = node {
                    check(g);
                }
            }
        }
        for stmt in parse(&sql) {
            check(&stmt);
        }
    }
}
