//! Integration tests for the lexer and statement splitter.
//!
//! These exercise the public `tokenize`/`split` surface end to end:
//! classification of single tokens, statement boundary rules around nested
//! blocks and quoted text, and the losslessness of the raw token stream.

use rstest::rstest;
use sqltree::splitter::split_stream;
use sqltree::{split, tokenize, TokenType};

#[rstest]
#[case("select * from foo;", 1)]
#[case("select * from foo; select * from bar;", 2)]
#[case("select * from foo where bar = 'foo; bar';", 1)]
#[case("select coalesce(a, ';') from t; select 1;", 2)]
#[case("BEGIN SELECT 1; SELECT 2; END;", 1)]
#[case("select 1; select 2; select 3", 3)]
#[case("select case when a then 1 else 2 end; select 1;", 1 + 1)]
#[case("-- comment only\n", 1)]
#[case("", 0)]
#[case("   \n", 0)]
fn test_statement_counts(#[case] sql: &str, #[case] expected: usize) {
    assert_eq!(split(sql).len(), expected, "{sql:?}");
}

#[rstest]
#[case("select", TokenType::KeywordDml)]
#[case("Insert", TokenType::KeywordDml)]
#[case("CREATE", TokenType::KeywordDdl)]
#[case("with", TokenType::KeywordCte)]
#[case("asc", TokenType::KeywordOrder)]
#[case("where", TokenType::Keyword)]
#[case("GROUP BY", TokenType::Keyword)]
#[case("left join", TokenType::Keyword)]
#[case("foo", TokenType::Name)]
#[case("#temp", TokenType::Name)]
#[case("[bracketed name]", TokenType::Name)]
#[case("'x'", TokenType::StringSingle)]
#[case("\"x\"", TokenType::StringDouble)]
#[case("`x`", TokenType::StringBacktick)]
#[case("$$body$$", TokenType::StringDollar)]
#[case("42", TokenType::NumberInteger)]
#[case("1.5e-3", TokenType::NumberFloat)]
#[case("0xFF", TokenType::NumberHex)]
#[case("%s", TokenType::Placeholder)]
#[case(":name", TokenType::Placeholder)]
#[case("*", TokenType::Wildcard)]
#[case("<=", TokenType::OperatorComparison)]
#[case("||", TokenType::OperatorConcat)]
#[case(":=", TokenType::Assignment)]
#[case("-- note", TokenType::CommentSingle)]
#[case("/* note */", TokenType::CommentMulti)]
fn test_single_token_classification(#[case] sql: &str, #[case] expected: TokenType) {
    let tokens = tokenize(sql);
    assert_eq!(tokens.len(), 1, "{sql:?} -> {tokens:?}");
    assert_eq!(tokens[0].ttype, expected, "{sql:?}");
}

#[test]
fn test_split_trims_but_keeps_semicolons() {
    let stmts = split("  select 1 ;\n  select 2 ");
    assert_eq!(stmts, vec!["select 1 ;", "select 2"]);
}

#[test]
fn test_boundary_comment_belongs_to_next_statement() {
    let stmts = split_stream(tokenize("select 1; -- first done\nselect 2;"));
    assert_eq!(stmts.len(), 2);
    let first: String = stmts[0].iter().map(|t| t.value.as_str()).collect();
    assert_eq!(first, "select 1;");
    let second: String = stmts[1].iter().map(|t| t.value.as_str()).collect();
    assert!(second.starts_with(" -- first done\n"));
}

#[test]
fn test_token_stream_is_lossless() {
    let sql = "select a /* c */, 'it''s'\nfrom [t] where x <= $1; -- done\n\u{65e5}";
    let joined: String = tokenize(sql).iter().map(|t| t.value.as_str()).collect();
    assert_eq!(joined, sql);
}

#[test]
fn test_unbalanced_block_extends_last_statement() {
    // missing END: everything after BEGIN stays one statement
    let stmts = split("select 1; BEGIN select 2; select 3;");
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[1], "BEGIN select 2; select 3;");
}

#[test]
fn test_dollar_quoted_body_keeps_semicolons() {
    let stmts = split("create function f() as $$ select 1; select 2; $$; select 3;");
    assert_eq!(stmts.len(), 2);
}

#[test]
fn test_positions_cover_the_input() {
    let sql = "select x from t";
    let tokens = tokenize(sql);
    let mut expected = 0;
    for token in &tokens {
        assert_eq!(token.pos, Some(expected));
        expected += token.value.len();
    }
    assert_eq!(expected, sql.len());
}
