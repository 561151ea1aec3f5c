//! Formatting options and the `format` entry point.
//!
//! Option conflicts are resolved by documented precedence, never by erroring:
//! aligned reindentation wins over plain reindentation, a zero indent width is
//! clamped to one, and either reindent mode implies whitespace stripping so
//! the output layout is owned entirely by the indentation filter.

use serde::{Deserialize, Serialize};

use crate::filters::{
    AlignedIndentFilter, FilterStack, IdentifierCaseFilter, KeywordCaseFilter, ReindentFilter,
    SpacesAroundOperatorsFilter, StripCommentsFilter, StripWhitespaceFilter, TruncateStringFilter,
};
use crate::{grouping, lexer, splitter};

/// Case folding applied by the case filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    Upper,
    Lower,
    Capitalize,
}

impl TextCase {
    pub fn apply(&self, value: &str) -> String {
        match self {
            TextCase::Upper => value.to_uppercase(),
            TextCase::Lower => value.to_lowercase(),
            TextCase::Capitalize => {
                let mut chars = value.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            }
        }
    }
}

/// Formatting profile. `Default` is the identity: formatting with default
/// options returns the input text unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub keyword_case: Option<TextCase>,
    pub identifier_case: Option<TextCase>,
    pub strip_comments: bool,
    pub strip_whitespace: bool,
    pub use_space_around_operators: bool,
    pub reindent: bool,
    /// Aligned mode; takes precedence over `reindent` when both are set.
    pub reindent_aligned: bool,
    pub indent_width: usize,
    pub indent_tabs: bool,
    /// List items per line before wrapping; 0 puts every item on its own line.
    pub wrap_after: usize,
    pub comma_first: bool,
    /// Maximum length for single-quoted literals; longer ones are cut and
    /// marked with `[...]`.
    pub truncate_strings: Option<usize>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            keyword_case: None,
            identifier_case: None,
            strip_comments: false,
            strip_whitespace: false,
            use_space_around_operators: false,
            reindent: false,
            reindent_aligned: false,
            indent_width: 2,
            indent_tabs: false,
            wrap_after: 0,
            comma_first: false,
            truncate_strings: None,
        }
    }
}

impl FormatOptions {
    fn validated(mut self) -> Self {
        if self.indent_width == 0 {
            self.indent_width = 1;
        }
        if self.reindent_aligned {
            self.reindent = false;
        }
        if self.reindent || self.reindent_aligned {
            self.strip_whitespace = true;
        }
        self
    }
}

fn build_stack(opts: &FormatOptions) -> FilterStack {
    let mut stack = FilterStack::new();
    if let Some(case) = opts.keyword_case {
        stack.push_preprocess(Box::new(KeywordCaseFilter::new(case)));
    }
    if let Some(case) = opts.identifier_case {
        stack.push_preprocess(Box::new(IdentifierCaseFilter::new(case)));
    }
    if opts.strip_comments {
        stack.push_stmtprocess(Box::new(StripCommentsFilter));
    }
    if opts.strip_whitespace {
        stack.push_stmtprocess(Box::new(StripWhitespaceFilter));
    }
    if opts.use_space_around_operators {
        stack.push_stmtprocess(Box::new(SpacesAroundOperatorsFilter));
    }
    if opts.reindent {
        stack.push_stmtprocess(Box::new(ReindentFilter::new(
            opts.indent_width,
            opts.indent_tabs,
            opts.wrap_after,
            opts.comma_first,
        )));
    }
    if opts.reindent_aligned {
        stack.push_stmtprocess(Box::new(AlignedIndentFilter::new()));
    }
    if let Some(width) = opts.truncate_strings {
        stack.push_postprocess(Box::new(TruncateStringFilter::new(width)));
    }
    stack
}

/// Format SQL text: lex, split, group, then run the configured filter stack
/// over each statement. Total; malformed SQL is formatted best-effort.
pub fn format(sql: &str, options: &FormatOptions) -> String {
    let opts = options.clone().validated();
    let mut stack = build_stack(&opts);
    let reindenting = opts.reindent || opts.reindent_aligned;
    let mut pieces = Vec::new();
    for tokens in splitter::split_stream(lexer::tokenize(sql)) {
        let mut stmt = grouping::group(tokens);
        stack.run(&mut stmt);
        let text = stmt.value();
        if reindenting && text.trim().is_empty() {
            continue;
        }
        pieces.push(text);
    }
    if reindenting {
        pieces.join("\n")
    } else {
        pieces.concat()
    }
}
