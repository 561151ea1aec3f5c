//! Statement splitting.
//!
//! Works on the flat token stream, before any grouping. A semicolon terminates a
//! statement only when it sits outside every parenthesis pair and outside every
//! `BEGIN`/`CASE` ... `END` block, so procedural bodies survive as one statement.
//! Both depth counters saturate at zero: a stray closer never goes negative and
//! never swallows the statements that follow it.
//!
//! Statement boundaries are drawn *after* the terminating semicolon. Whitespace
//! and comments that follow it belong to the next statement, which keeps the
//! concatenation of all statements byte-identical to the input.

use crate::lexer::tokenize;
use crate::tree::Token;
use crate::tokens::TokenType;

/// Split a token stream into per-statement token runs.
///
/// The trailing run after the last semicolon, even if it is only whitespace or
/// comments, is returned as a final statement; nothing is dropped.
pub fn split_stream(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut statements = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut paren_depth: u32 = 0;
    let mut block_depth: u32 = 0;

    for token in tokens {
        match token.ttype {
            TokenType::Punctuation if token.value == "(" => paren_depth += 1,
            TokenType::Punctuation if token.value == ")" => {
                paren_depth = paren_depth.saturating_sub(1)
            }
            TokenType::Keyword => match token.normalized().as_str() {
                "BEGIN" | "CASE" => block_depth += 1,
                "END" => block_depth = block_depth.saturating_sub(1),
                _ => {}
            },
            _ => {}
        }
        let terminates = token.matches(TokenType::Punctuation, ";")
            && paren_depth == 0
            && block_depth == 0;
        current.push(token);
        if terminates {
            statements.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        statements.push(current);
    }
    statements
}

/// Split raw SQL text into trimmed statement strings. Empty statements are
/// dropped; the terminating semicolons are kept.
pub fn split(sql: &str) -> Vec<String> {
    split_stream(tokenize(sql))
        .into_iter()
        .map(|tokens| {
            tokens
                .iter()
                .map(|t| t.value.as_str())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_semicolon() {
        let stmts = split("select * from foo; select * from bar;");
        assert_eq!(stmts, vec!["select * from foo;", "select * from bar;"]);
    }

    #[test]
    fn test_split_no_trailing_semicolon() {
        let stmts = split("select 1; select 2");
        assert_eq!(stmts, vec!["select 1;", "select 2"]);
    }

    #[test]
    fn test_semicolon_inside_parens_does_not_split() {
        let stmts = split("select coalesce(col, ';') from t; select 2");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], "select coalesce(col, ';') from t;");
    }

    #[test]
    fn test_begin_block_is_one_statement() {
        let stmts = split("BEGIN SELECT 1; SELECT 2; END;");
        assert_eq!(stmts, vec!["BEGIN SELECT 1; SELECT 2; END;"]);
    }

    #[test]
    fn test_case_end_does_not_split() {
        let sql = "select case when x then 1 else 2 end from t; select 1";
        assert_eq!(split(sql).len(), 2);
    }

    #[test]
    fn test_stray_closer_saturates() {
        // saturated counters: neither the stray `end` nor the stray `)`
        // swallows the statements around it
        let stmts = split("end; select 1; ); select 2;");
        assert_eq!(stmts, vec!["end;", "select 1;", ");", "select 2;"]);
    }

    #[test]
    fn test_comment_after_semicolon_joins_next_statement() {
        let stmts = split_stream(tokenize("select 1; -- tail\nselect 2"));
        assert_eq!(stmts.len(), 2);
        let second: String = stmts[1].iter().map(|t| t.value.as_str()).collect();
        assert_eq!(second, " -- tail\nselect 2");
    }

    #[test]
    fn test_whitespace_only_input_is_dropped_from_text_split() {
        assert!(split("   \n ").is_empty());
        assert!(split("").is_empty());
    }

    #[test]
    fn test_lossless_partition() {
        let sql = "select 1; /* c */ select 2; -- t\n";
        let joined: String = split_stream(tokenize(sql))
            .into_iter()
            .flatten()
            .map(|t| t.value)
            .collect();
        assert_eq!(joined, sql);
    }
}
