//! Clause-per-line reindentation.
//!
//! Walks the grouped tree with a current indentation level. Clause keywords
//! start a new line at the current level; a `WHERE` group, a parenthesized
//! DML subquery, and `CASE` arms each indent their interior one level deeper.
//! Newlines are applied by rewriting the adjacent whitespace token (inserting
//! one only when none exists), so running the filter on its own output
//! rewrites the same tokens to the same text: the filter is a fixed point.

use crate::filters::StatementFilter;
use crate::tokens::TokenType;
use crate::tree::{GroupKind, Node, TokenList};

/// Indentation deeper than this many columns is treated as runaway state
/// (malformed input compounding the level) and resets to column zero.
const MAX_INDENT_COLUMNS: usize = 120;

// BETWEEN is deliberately absent: its range stays on one line, and the AND
// completing it is suppressed via a flag in the walk.
const SPLIT_KEYWORDS: [&str; 13] = [
    "FROM",
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

pub struct ReindentFilter {
    unit: String,
    wrap_after: usize,
    comma_first: bool,
    indent: usize,
    in_function: usize,
}

impl ReindentFilter {
    pub fn new(indent_width: usize, indent_tabs: bool, wrap_after: usize, comma_first: bool) -> Self {
        ReindentFilter {
            unit: if indent_tabs {
                "\t".to_string()
            } else {
                " ".repeat(indent_width)
            },
            wrap_after,
            comma_first,
            indent: 0,
            in_function: 0,
        }
    }

    fn nl_value(&self) -> String {
        let width = self.unit.chars().count() * self.indent;
        let level = if width > MAX_INDENT_COLUMNS { 0 } else { self.indent };
        format!("\n{}", self.unit.repeat(level))
    }

    fn newline_before(&self, list: &mut TokenList, i: usize) -> usize {
        crate::filters::set_newline_before(list, i, self.nl_value())
    }

    fn walk(&mut self, list: &mut TokenList) {
        let mut between = false;
        let mut i = 0;
        while i < list.tokens.len() {
            match list.tokens[i].kind() {
                Some(GroupKind::Where) => {
                    i = self.newline_before(list, i);
                    self.indent += 1;
                    if let Node::Group(g) = &mut list.tokens[i] {
                        self.walk(g);
                    }
                    self.indent -= 1;
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
                                self.newline_before(g, d);
                                self.walk(g);
                                self.indent -= 1;
                            }
                            None => self.walk(g),
                        }
                    }
                }
                Some(GroupKind::Case) | Some(GroupKind::Begin) => {
                    self.indent += 1;
                    if let Node::Group(g) = &mut list.tokens[i] {
                        self.split_block_arms(g);
                    }
                    self.indent -= 1;
                }
                Some(GroupKind::IdentifierList) => {
                    if let Node::Group(g) = &mut list.tokens[i] {
                        if self.in_function == 0 {
                            self.wrap_list(g);
                        } else {
                            self.walk(g);
                        }
                    }
                }
                Some(GroupKind::Function) => {
                    self.in_function += 1;
                    if let Node::Group(g) = &mut list.tokens[i] {
                        self.walk(g);
                    }
                    self.in_function -= 1;
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
                            if !skip_between_and && is_split_keyword(&norm) {
                                i = self.newline_before(list, i);
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

    /// `WHEN`/`ELSE`/`END` each start a line one level below the `CASE`.
    fn split_block_arms(&mut self, block: &mut TokenList) {
        let mut i = 0;
        while i < block.tokens.len() {
            if let Some(token) = block.tokens[i].as_token() {
                if token.ttype.is_keyword()
                    && matches!(token.normalized().as_str(), "WHEN" | "ELSE" | "END")
                {
                    i = self.newline_before(block, i);
                }
            } else if let Node::Group(g) = &mut block.tokens[i] {
                self.walk(g);
            }
            i += 1;
        }
    }

    /// Put list items on their own lines, one extra level in. `wrap_after`
    /// breaks only every N items; `comma_first` moves the break before the
    /// comma.
    fn wrap_list(&mut self, list: &mut TokenList) {
        let mut item_idx = 0;
        let mut i = 0;
        while i < list.tokens.len() {
            if list.tokens[i].is_whitespace()
                || list.tokens[i].matches(TokenType::Punctuation, ",")
            {
                i += 1;
                continue;
            }
            let wraps = item_idx > 0
                && (self.wrap_after == 0 || item_idx % self.wrap_after == 0);
            if wraps {
                self.indent += 1;
                if self.comma_first {
                    if let Some(c) = (0..i)
                        .rev()
                        .find(|&j| list.tokens[j].matches(TokenType::Punctuation, ","))
                    {
                        let moved = self.newline_before(list, c);
                        i = (i as isize + moved as isize - c as isize) as usize;
                    }
                } else {
                    i = self.newline_before(list, i);
                }
                self.indent -= 1;
            }
            if let Node::Group(g) = &mut list.tokens[i] {
                self.walk(g);
            }
            item_idx += 1;
            i += 1;
        }
    }
}

fn is_split_keyword(normalized: &str) -> bool {
    SPLIT_KEYWORDS.contains(&normalized) || normalized.ends_with("JOIN")
}

impl StatementFilter for ReindentFilter {
    fn process(&mut self, stmt: &mut TokenList) {
        while stmt.tokens.first().map_or(false, |n| n.is_whitespace()) {
            stmt.tokens.remove(0);
        }
        self.indent = 0;
        self.in_function = 0;
        self.walk(stmt);
    }
}
