//! Keyword classification tables.
//!
//! Process-wide, immutable configuration: built lazily on first use and shared by
//! reference afterwards, which keeps concurrent tokenization safe without locking.
//! The lexer itself never matches keywords; it emits `Name` tokens and a post-pass
//! consults these tables (see `lexer::reclassify_keywords`).
//!
//! The table is intentionally a pragmatic common subset of SQL, not any dialect's
//! full reserved-word list. Extending dialect coverage means extending this table,
//! not touching the lexer rules.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::tokens::TokenType;

/// Upper-cased keyword -> classification.
pub static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    let mut map = HashMap::new();

    for kw in ["SELECT", "INSERT", "UPDATE", "DELETE", "MERGE", "REPLACE"] {
        map.insert(kw, TokenType::KeywordDml);
    }
    for kw in ["CREATE", "DROP", "ALTER", "TRUNCATE"] {
        map.insert(kw, TokenType::KeywordDdl);
    }
    map.insert("WITH", TokenType::KeywordCte);
    for kw in ["ASC", "DESC"] {
        map.insert(kw, TokenType::KeywordOrder);
    }

    for kw in GENERIC_KEYWORDS {
        map.insert(kw, TokenType::Keyword);
    }
    map
});

/// Keywords without a sub-classification of their own.
const GENERIC_KEYWORDS: &[&str] = &[
    "ALL",
    "AND",
    "ANY",
    "AS",
    "BEGIN",
    "BETWEEN",
    "BY",
    "CASCADE",
    "CASE",
    "CAST",
    "CHECK",
    "COLUMN",
    "COMMIT",
    "CONSTRAINT",
    "CROSS",
    "CURSOR",
    "DATABASE",
    "DATE",
    "DECLARE",
    "DEFAULT",
    "DISTINCT",
    "ELSE",
    "END",
    "ESCAPE",
    "EXCEPT",
    "EXISTS",
    "FETCH",
    "FOR",
    "FOREIGN",
    "FROM",
    "FULL",
    "FUNCTION",
    "GRANT",
    "GROUP",
    "HAVING",
    "IF",
    "ILIKE",
    "IN",
    "INDEX",
    "INNER",
    "INTERSECT",
    "INTERVAL",
    "INTO",
    "IS",
    "JOIN",
    "KEY",
    "LEFT",
    "LIKE",
    "LIMIT",
    "LOOP",
    "NOT",
    "NULL",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "OVER",
    "PARTITION",
    "PRIMARY",
    "PROCEDURE",
    "REFERENCES",
    "RETURN",
    "RETURNING",
    "RETURNS",
    "REVOKE",
    "RIGHT",
    "ROLLBACK",
    "ROW",
    "ROWS",
    "SCHEMA",
    "SET",
    "SOME",
    "TABLE",
    "THEN",
    "TIME",
    "TIMESTAMP",
    "TO",
    "TRIGGER",
    "UNION",
    "UNIQUE",
    "USING",
    "VALUES",
    "VIEW",
    "WHEN",
    "WHERE",
    "WHILE",
];

/// Classify an already-lexed word. Case-insensitive.
pub fn classify(word: &str) -> Option<TokenType> {
    KEYWORDS.get(word.to_uppercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_dml() {
        assert_eq!(classify("select"), Some(TokenType::KeywordDml));
        assert_eq!(classify("SELECT"), Some(TokenType::KeywordDml));
    }

    #[test]
    fn test_classify_generic_and_order() {
        assert_eq!(classify("where"), Some(TokenType::Keyword));
        assert_eq!(classify("desc"), Some(TokenType::KeywordOrder));
    }

    #[test]
    fn test_non_keyword() {
        assert_eq!(classify("foo"), None);
        assert_eq!(classify("user"), None);
    }
}
