//! Long-literal truncation.

use crate::filters::TokenFilter;
use crate::tokens::TokenType;
use crate::tree::Token;

const ELLIPSIS: &str = "[...]";

/// Shorten single-quoted literals longer than `width` characters, keeping the
/// quotes and appending a fixed ellipsis marker. Other token kinds pass
/// through untouched.
pub struct TruncateStringFilter {
    width: usize,
}

impl TruncateStringFilter {
    pub fn new(width: usize) -> Self {
        TruncateStringFilter { width }
    }
}

impl TokenFilter for TruncateStringFilter {
    fn process(&self, token: &mut Token) {
        if token.ttype != TokenType::StringSingle {
            return;
        }
        let inner = token.value.trim_matches('\'');
        if inner.chars().count() <= self.width {
            return;
        }
        let kept: String = inner.chars().take(self.width).collect();
        token.value = format!("'{kept}{ELLIPSIS}'");
    }
}
