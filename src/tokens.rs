//! Token type tags shared across the lexer, splitter, grouping engine, and filters.
//!
//! The taxonomy is naturally a hierarchy (strings have sub-kinds, keywords have
//! sub-kinds, and so on). Here it is flattened into one closed enumeration so that
//! grouping passes can match on tags exhaustively instead of testing dynamic types.
//! Helper predicates (`is_string`, `is_keyword`, ...) provide the "parent type"
//! queries the hierarchy would.
//!
//! A token's type tag is assigned once by the lexer and only changes through explicit
//! re-tagging by a grouping pass (a `Wildcard` folded into a multiplication becomes an
//! `Operator`); the literal text never changes outside the formatting filters.

use serde::{Deserialize, Serialize};

/// Classification of a single leaf token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    Whitespace,
    Newline,
    /// `-- ...` or `# ...` up to the end of the line.
    CommentSingle,
    /// `/* ... */`, possibly unterminated (then it runs to end of input).
    CommentMulti,
    /// Generic keyword (`FROM`, `WHERE`, `AND`, ...).
    Keyword,
    /// Data-manipulation keyword (`SELECT`, `INSERT`, ...).
    KeywordDml,
    /// Data-definition keyword (`CREATE`, `DROP`, ...).
    KeywordDdl,
    /// Common-table-expression introducer (`WITH`).
    KeywordCte,
    /// Ordering keyword (`ASC`, `DESC`).
    KeywordOrder,
    Name,
    /// `'...'` literal.
    StringSingle,
    /// `"..."` quoted identifier.
    StringDouble,
    /// `` `...` `` quoted identifier.
    StringBacktick,
    /// `$tag$...$tag$` literal.
    StringDollar,
    NumberInteger,
    NumberFloat,
    NumberHex,
    /// Arithmetic and other non-comparison operators.
    Operator,
    OperatorComparison,
    /// `||` string concatenation.
    OperatorConcat,
    /// `:=`.
    Assignment,
    /// `,`, `(`, `)`, `;`, `.`, `::`, `[`, `]`.
    Punctuation,
    /// `%s`, `:name`, `?`, `@var`, `$1`, ...
    Placeholder,
    /// `*` as emitted by the lexer; grouping decides whether it is a projection
    /// wildcard or a multiplication.
    Wildcard,
    /// Single character the lexer could not classify. Never aborts the pipeline.
    Error,
}

impl TokenType {
    /// Whitespace in the broad sense: blanks and line terminators.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenType::Whitespace | TokenType::Newline)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenType::CommentSingle | TokenType::CommentMulti)
    }

    /// Any keyword sub-kind.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenType::Keyword
                | TokenType::KeywordDml
                | TokenType::KeywordDdl
                | TokenType::KeywordCte
                | TokenType::KeywordOrder
        )
    }

    pub fn is_string(self) -> bool {
        matches!(
            self,
            TokenType::StringSingle
                | TokenType::StringDouble
                | TokenType::StringBacktick
                | TokenType::StringDollar
        )
    }

    pub fn is_number(self) -> bool {
        matches!(
            self,
            TokenType::NumberInteger | TokenType::NumberFloat | TokenType::NumberHex
        )
    }

    /// Token kinds that can stand for a value inside expressions: literals,
    /// names, and placeholders. Used by the infix grouping passes.
    pub fn is_value(self) -> bool {
        self.is_string() || self.is_number() || matches!(self, TokenType::Name | TokenType::Placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_covers_newline() {
        assert!(TokenType::Whitespace.is_whitespace());
        assert!(TokenType::Newline.is_whitespace());
        assert!(!TokenType::Name.is_whitespace());
    }

    #[test]
    fn test_keyword_subkinds() {
        for ttype in [
            TokenType::Keyword,
            TokenType::KeywordDml,
            TokenType::KeywordDdl,
            TokenType::KeywordCte,
            TokenType::KeywordOrder,
        ] {
            assert!(ttype.is_keyword());
        }
        assert!(!TokenType::Name.is_keyword());
    }

    #[test]
    fn test_value_kinds() {
        assert!(TokenType::StringSingle.is_value());
        assert!(TokenType::NumberFloat.is_value());
        assert!(TokenType::Placeholder.is_value());
        assert!(!TokenType::Punctuation.is_value());
        assert!(!TokenType::Keyword.is_value());
    }
}
