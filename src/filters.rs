//! Formatting filters and the stack that runs them.
//!
//! Two filter shapes cover everything the formatter does:
//!
//!     TokenFilter:     leaf-local rewrites (case folding, string truncation).
//!                      Stateless, applied to every leaf in document order.
//!
//!     StatementFilter: structural rewrites on one grouped statement
//!                      (whitespace/comment stripping, reindentation). May
//!                      carry state across the walk of a single statement.
//!
//! `FilterStack` composes them in three stages: token-level preprocess,
//! statement-level processing, token-level postprocess. Stage order is fixed;
//! within a stage, filters run in the order they were pushed. Filters only
//! ever rewrite token text and whitespace, never the tree shape invariants
//! the grouping engine established.

pub mod aligned;
pub mod case;
pub mod reindent;
pub mod strip;
pub mod truncate;

pub use aligned::AlignedIndentFilter;
pub use case::{IdentifierCaseFilter, KeywordCaseFilter};
pub use reindent::ReindentFilter;
pub use strip::{SpacesAroundOperatorsFilter, StripCommentsFilter, StripWhitespaceFilter};
pub use truncate::TruncateStringFilter;

use crate::tokens::TokenType;
use crate::tree::{Node, Token, TokenList};

/// Start a new line before child `i`: collapse the preceding whitespace run
/// into one token carrying `nl`, or insert a new token when no whitespace
/// precedes. Returns the child's new index. Shared by the indentation
/// filters; rewriting instead of appending is what makes them fixed points
/// on their own output.
pub(crate) fn set_newline_before(list: &mut TokenList, i: usize, nl: String) -> usize {
    let mut i = i;
    while i >= 2 && list.tokens[i - 1].is_whitespace() && list.tokens[i - 2].is_whitespace() {
        list.tokens.remove(i - 1);
        i -= 1;
    }
    if i > 0 && list.tokens[i - 1].is_whitespace() {
        if let Node::Token(t) = &mut list.tokens[i - 1] {
            t.ttype = TokenType::Whitespace;
            t.value = nl;
        }
        i
    } else {
        list.tokens
            .insert(i, Node::Token(Token::synthetic(TokenType::Whitespace, nl)));
        i + 1
    }
}

/// Leaf-local rewrite.
pub trait TokenFilter {
    fn process(&self, token: &mut Token);
}

/// Whole-statement rewrite over the grouped tree.
pub trait StatementFilter {
    fn process(&mut self, stmt: &mut TokenList);
}

/// Ordered three-stage filter pipeline applied to each statement.
#[derive(Default)]
pub struct FilterStack {
    preprocess: Vec<Box<dyn TokenFilter>>,
    stmtprocess: Vec<Box<dyn StatementFilter>>,
    postprocess: Vec<Box<dyn TokenFilter>>,
}

impl FilterStack {
    pub fn new() -> Self {
        FilterStack::default()
    }

    pub fn push_preprocess(&mut self, filter: Box<dyn TokenFilter>) {
        self.preprocess.push(filter);
    }

    pub fn push_stmtprocess(&mut self, filter: Box<dyn StatementFilter>) {
        self.stmtprocess.push(filter);
    }

    pub fn push_postprocess(&mut self, filter: Box<dyn TokenFilter>) {
        self.postprocess.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.preprocess.is_empty() && self.stmtprocess.is_empty() && self.postprocess.is_empty()
    }

    /// Run all stages over one statement, in place.
    pub fn run(&mut self, stmt: &mut TokenList) {
        for filter in &self.preprocess {
            stmt.for_each_token_mut(&mut |t| filter.process(t));
        }
        for filter in &mut self.stmtprocess {
            filter.process(stmt);
        }
        for filter in &self.postprocess {
            stmt.for_each_token_mut(&mut |t| filter.process(t));
        }
    }
}
