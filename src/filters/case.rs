//! Case-folding token filters.

use crate::filters::TokenFilter;
use crate::formatter::TextCase;
use crate::tokens::TokenType;
use crate::tree::Token;

/// Re-case keyword tokens (all sub-kinds, including multi-word keywords).
pub struct KeywordCaseFilter {
    case: TextCase,
}

impl KeywordCaseFilter {
    pub fn new(case: TextCase) -> Self {
        KeywordCaseFilter { case }
    }
}

impl TokenFilter for KeywordCaseFilter {
    fn process(&self, token: &mut Token) {
        if token.ttype.is_keyword() {
            token.value = self.case.apply(&token.value);
        }
    }
}

/// Re-case bare names. Quoted identifiers are never touched: quoting exists
/// to preserve case.
pub struct IdentifierCaseFilter {
    case: TextCase,
}

impl IdentifierCaseFilter {
    pub fn new(case: TextCase) -> Self {
        IdentifierCaseFilter { case }
    }
}

impl TokenFilter for IdentifierCaseFilter {
    fn process(&self, token: &mut Token) {
        if token.ttype == TokenType::Name {
            token.value = self.case.apply(&token.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(value: &str) -> Token {
        Token::new(TokenType::Keyword, value, 0)
    }

    #[test]
    fn test_keyword_upper_and_capitalize() {
        let upper = KeywordCaseFilter::new(TextCase::Upper);
        let mut t = kw("group   by");
        upper.process(&mut t);
        assert_eq!(t.value, "GROUP   BY");

        let cap = KeywordCaseFilter::new(TextCase::Capitalize);
        let mut t = kw("SELECT");
        cap.process(&mut t);
        assert_eq!(t.value, "Select");
    }

    #[test]
    fn test_identifier_filter_skips_keywords_and_quoted() {
        let lower = IdentifierCaseFilter::new(TextCase::Lower);
        let mut name = Token::new(TokenType::Name, "FooBar", 0);
        lower.process(&mut name);
        assert_eq!(name.value, "foobar");

        let mut quoted = Token::new(TokenType::StringDouble, "\"FooBar\"", 0);
        lower.process(&mut quoted);
        assert_eq!(quoted.value, "\"FooBar\"");

        let mut keyword = kw("select");
        lower.process(&mut keyword);
        assert_eq!(keyword.value, "select");
    }
}
