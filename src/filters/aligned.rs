//! Keyword-aligned reindentation.
//!
//! Right-justifies each clause keyword to the width of `SELECT`, so the first
//! token after every clause keyword starts in the same column:
//!
//!     select a
//!       from foo
//!      where b = 1
//!
//! Nested subqueries shift the whole gutter right by one fixed step per
//! parenthesis level. Identifier lists are left inline; alignment formats the
//! clause skeleton, not the projection.

use crate::filters::{set_newline_before, StatementFilter};
use crate::tokens::TokenType;
use crate::tree::{GroupKind, Node, TokenList};

const MAX_PAD_COLUMNS: usize = 120;

/// Keywords aligned on their first word. WHERE is handled through its group.
const ALIGN_KEYWORDS: [&str; 14] = [
    "FROM",
    "ON",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "LIMIT",
    "UNION",
    "UNION ALL",
    "EXCEPT",
    "INTERSECT",
    "VALUES",
    "SET",
    "AND",
    "OR",
];

pub struct AlignedIndentFilter {
    indent: usize,
    max_kwd_len: usize,
}

impl AlignedIndentFilter {
    pub fn new() -> Self {
        AlignedIndentFilter {
            indent: 0,
            max_kwd_len: "select".len(),
        }
    }

    fn nl_for(&self, keyword: &str) -> String {
        let first_word_len = keyword
            .split_whitespace()
            .next()
            .map(str::len)
            .unwrap_or_default();
        let mut pad = self.max_kwd_len.saturating_sub(first_word_len)
            + self.indent * (2 + self.max_kwd_len);
        if pad > MAX_PAD_COLUMNS {
            pad = 0;
        }
        format!("\n{}", " ".repeat(pad))
    }

    fn walk(&mut self, list: &mut TokenList) {
        let mut between = false;
        let mut i = 0;
        while i < list.tokens.len() {
            match list.tokens[i].kind() {
                Some(GroupKind::Where) => {
                    i = set_newline_before(list, i, self.nl_for("WHERE"));
                    if let Node::Group(g) = &mut list.tokens[i] {
                        self.walk(g);
                    }
                }
                Some(GroupKind::Parenthesis) => {
                    let dml_at = match &list.tokens[i] {
                        Node::Group(g) => g
                            .tokens
                            .iter()
                            .position(|n| n.ttype() == Some(TokenType::KeywordDml)),
                        Node::Token(_) => None,
                    };
                    if let Node::Group(g) = &mut list.tokens[i] {
                        match dml_at {
                            Some(d) => {
                                self.indent += 1;
                                set_newline_before(g, d, self.nl_for("select"));
                                self.walk(g);
                                self.indent -= 1;
                            }
                            None => self.walk(g),
                        }
                    }
                }
                Some(GroupKind::Case) | Some(GroupKind::Begin) => {
                    if let Node::Group(g) = &mut list.tokens[i] {
                        self.split_block_arms(g);
                    }
                }
                Some(_) => {
                    if let Node::Group(g) = &mut list.tokens[i] {
                        self.walk(g);
                    }
                }
                None => {
                    if let Some(token) = list.tokens[i].as_token() {
                        if token.ttype.is_keyword() {
                            let norm = token.normalized();
                            let skip_between_and = between && norm == "AND";
                            let aligns = ALIGN_KEYWORDS.contains(&norm.as_str())
                                || norm.ends_with("JOIN");
                            if aligns && !skip_between_and {
                                i = set_newline_before(list, i, self.nl_for(&norm));
                            }
                            if norm == "BETWEEN" {
                                between = true;
                            } else if norm == "AND" {
                                between = false;
                            }
                        }
                    }
                }
            }
            i += 1;
        }
    }

    fn split_block_arms(&mut self, block: &mut TokenList) {
        let mut i = 0;
        while i < block.tokens.len() {
            if let Some(token) = block.tokens[i].as_token() {
                if token.ttype.is_keyword()
                    && matches!(token.normalized().as_str(), "WHEN" | "ELSE" | "END")
                {
                    let norm = token.normalized();
                    i = set_newline_before(block, i, self.nl_for(&norm));
                }
            } else if let Node::Group(g) = &mut block.tokens[i] {
                self.walk(g);
            }
            i += 1;
        }
    }
}

impl Default for AlignedIndentFilter {
    fn default() -> Self {
        AlignedIndentFilter::new()
    }
}

impl StatementFilter for AlignedIndentFilter {
    fn process(&mut self, stmt: &mut TokenList) {
        while stmt.tokens.first().map_or(false, |n| n.is_whitespace()) {
            stmt.tokens.remove(0);
        }
        self.indent = 0;
        self.walk(stmt);
    }
}
