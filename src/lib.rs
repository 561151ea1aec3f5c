//! # sqltree
//!
//! A non-validating SQL tokenizer, statement splitter, and formatter.
//!
//! The pipeline has three analytic stages and one rendering stage: the lexer
//! classifies raw text into typed tokens, the splitter partitions the token
//! stream into statements, the grouping engine folds each statement into a
//! nested tree of composite nodes, and the formatting filters rewrite that
//! tree into display text.
//!
//! Nothing here validates SQL. Every stage is total: malformed input yields
//! `Error`-tagged leaf tokens and partially grouped trees, never a panic or a
//! `Result::Err`. Concatenating the leaf text of everything returned by
//! [`parse`] or [`split`] reconstructs the input exactly.
//!
//! ## Example
//!
//! Splitting and classifying:
//!
//! ```text
//! let statements = sqltree::parse("select * from foo; select 1");
//! assert_eq!(statements.len(), 2);
//! assert_eq!(statements[0].statement_type(), StatementType::Select);
//! ```
//!
//! Formatting:
//!
//! ```text
//! let opts = FormatOptions { reindent: true, ..Default::default() };
//! assert_eq!(sqltree::format("select * from foo", &opts), "select *\nfrom foo");
//! ```

pub mod filters;
pub mod formatter;
pub mod grouping;
pub mod keywords;
pub mod lexer;
pub mod splitter;
pub mod tokens;
pub mod tree;

pub use formatter::{format, FormatOptions, TextCase};
pub use lexer::tokenize;
pub use splitter::split;
pub use tokens::TokenType;
pub use tree::{GroupKind, Node, StatementType, Token, TokenList};

/// Lex, split, and group: one grouped tree per statement. Never fails on
/// malformed SQL; inspect the tree for `Error`-tagged leaves to detect it.
pub fn parse(sql: &str) -> Vec<TokenList> {
    splitter::split_stream(lexer::tokenize(sql))
        .into_iter()
        .map(grouping::group)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_and_groups() {
        let statements = parse("select * from foo; select 1");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].statement_type(), StatementType::Select);
        assert_eq!(statements[0].kind, GroupKind::Statement);
    }

    #[test]
    fn test_parse_round_trips() {
        let sql = "select * from foo; -- done\n";
        let joined: String = parse(sql).iter().map(|s| s.value()).collect();
        assert_eq!(joined, sql);
    }
}
