//! Comment and whitespace stripping, operator spacing.

use crate::filters::StatementFilter;
use crate::tokens::TokenType;
use crate::tree::{Node, Token, TokenList};

/// Remove comments. A comment gluing two words together is replaced by a
/// single space so their text does not merge.
pub struct StripCommentsFilter;

impl StatementFilter for StripCommentsFilter {
    fn process(&mut self, stmt: &mut TokenList) {
        strip_comments(stmt);
        while stmt.tokens.last().map_or(false, |n| n.is_whitespace()) {
            stmt.tokens.pop();
        }
    }
}

fn strip_comments(list: &mut TokenList) {
    let mut i = 0;
    while i < list.tokens.len() {
        if let Node::Group(g) = &mut list.tokens[i] {
            strip_comments(g);
            // removing a group-final comment can leave a separator space at
            // the end of the group; it belongs to the enclosing level
            let mut hoisted = Vec::new();
            while g.tokens.last().map_or(false, |n| n.is_whitespace()) {
                hoisted.extend(g.tokens.pop());
            }
            if g.tokens.is_empty() {
                list.tokens.remove(i);
            } else {
                i += 1;
            }
            for node in hoisted.into_iter().rev() {
                list.tokens.insert(i, node);
                i += 1;
            }
        } else {
            i += 1;
        }
    }
    let mut i = 0;
    while i < list.tokens.len() {
        if !list.tokens[i].is_comment() {
            i += 1;
            continue;
        }
        let prev_ws = i > 0 && list.tokens[i - 1].is_whitespace();
        let next_ws = i + 1 < list.tokens.len() && list.tokens[i + 1].is_whitespace();
        let glued = i > 0 && !prev_ws && i + 1 < list.tokens.len() && !next_ws;
        if glued {
            list.tokens[i] =
                Node::Token(Token::synthetic(TokenType::Whitespace, " "));
            i += 1;
        } else {
            list.tokens.remove(i);
            if prev_ws && next_ws {
                list.tokens.remove(i);
            }
        }
    }
}

/// Collapse whitespace runs to single spaces and drop the decorative ones:
/// statement edges, after `(`, before `)`.
pub struct StripWhitespaceFilter;

impl StatementFilter for StripWhitespaceFilter {
    fn process(&mut self, stmt: &mut TokenList) {
        strip_whitespace(stmt);
        while stmt.tokens.first().map_or(false, |n| n.is_whitespace()) {
            stmt.tokens.remove(0);
        }
        while stmt.tokens.last().map_or(false, |n| n.is_whitespace()) {
            stmt.tokens.pop();
        }
    }
}

fn strip_whitespace(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            strip_whitespace(g);
        }
    }
    let mut i = 0;
    while i < list.tokens.len() {
        if !list.tokens[i].is_whitespace() {
            i += 1;
            continue;
        }
        // merge the run into one plain space
        while i + 1 < list.tokens.len() && list.tokens[i + 1].is_whitespace() {
            list.tokens.remove(i + 1);
        }
        let after_open = i > 0 && last_leaf_is(&list.tokens[i - 1], "(");
        let before_close =
            i + 1 < list.tokens.len() && first_leaf_is(&list.tokens[i + 1], ")");
        if after_open || before_close {
            list.tokens.remove(i);
        } else {
            if let Node::Token(t) = &mut list.tokens[i] {
                t.ttype = TokenType::Whitespace;
                t.value = " ".to_string();
            }
            i += 1;
        }
    }
}

fn last_leaf_is(node: &Node, value: &str) -> bool {
    node.last_token()
        .map_or(false, |t| t.ttype == TokenType::Punctuation && t.value == value)
}

fn first_leaf_is(node: &Node, value: &str) -> bool {
    node.first_token()
        .map_or(false, |t| t.ttype == TokenType::Punctuation && t.value == value)
}

/// Guarantee a single space on both sides of binary operators.
pub struct SpacesAroundOperatorsFilter;

impl StatementFilter for SpacesAroundOperatorsFilter {
    fn process(&mut self, stmt: &mut TokenList) {
        space_operators(stmt);
    }
}

fn space_operators(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            space_operators(g);
        }
    }
    let mut i = 0;
    while i < list.tokens.len() {
        let is_operator = matches!(
            list.tokens[i].ttype(),
            Some(
                TokenType::Operator
                    | TokenType::OperatorComparison
                    | TokenType::OperatorConcat
                    | TokenType::Assignment
            )
        );
        if is_operator {
            if i + 1 < list.tokens.len() && !list.tokens[i + 1].is_whitespace() {
                list.tokens.insert(
                    i + 1,
                    Node::Token(Token::synthetic(TokenType::Whitespace, " ")),
                );
            }
            if i > 0 && !list.tokens[i - 1].is_whitespace() {
                list.tokens.insert(
                    i,
                    Node::Token(Token::synthetic(TokenType::Whitespace, " ")),
                );
                i += 1;
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::StatementFilter;
    use crate::grouping::group;
    use crate::lexer::tokenize;

    fn run(filter: &mut dyn StatementFilter, sql: &str) -> String {
        let mut stmt = group(tokenize(sql));
        filter.process(&mut stmt);
        stmt.value()
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(
            run(&mut StripCommentsFilter, "select 1 -- the one"),
            "select 1"
        );
        assert_eq!(
            run(&mut StripCommentsFilter, "select /* num */ 1"),
            "select 1"
        );
        assert_eq!(run(&mut StripCommentsFilter, "select/* num */1"), "select 1");
        assert_eq!(run(&mut StripCommentsFilter, "/* all comment */"), "");
    }

    #[test]
    fn test_strip_comments_attached_inside_groups() {
        // trailing comments live inside the composite they follow; removing
        // them must not strand the separator space in there
        assert_eq!(
            run(&mut StripCommentsFilter, "select a, b -- trailing\n"),
            "select a, b"
        );
        assert_eq!(
            run(&mut StripCommentsFilter, "select a from t -- c\nwhere b = 1"),
            "select a from t where b = 1"
        );
    }

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(
            run(&mut StripWhitespaceFilter, "  select   1\nfrom  t  "),
            "select 1 from t"
        );
        assert_eq!(
            run(&mut StripWhitespaceFilter, "select ( 1 ) from t"),
            "select (1) from t"
        );
    }

    #[test]
    fn test_spaces_around_operators() {
        assert_eq!(
            run(&mut SpacesAroundOperatorsFilter, "select 1+2 where a=b"),
            "select 1 + 2 where a = b"
        );
        assert_eq!(
            run(&mut SpacesAroundOperatorsFilter, "select 1 + 2"),
            "select 1 + 2"
        );
    }
}
