//! Ordered-rule lexer.
//!
//! The lexer walks a cursor over the input and, at every position, tries a fixed,
//! ordered list of recognizer rules; the first rule that matches consumes its match.
//! Rule order is a correctness contract, not a tuning knob:
//!
//!     - `#name` temp-table names are tried before `#` line comments
//!     - comment rules are tried before the `-` operator
//!     - quoted-string rules (each with its own escape style) come before names
//!     - the terminated block-comment rule comes before the unterminated one
//!     - multi-word keywords (`GROUP BY`, `LEFT OUTER JOIN`) come before names
//!     - `::` and `:=` come before `:name` placeholders
//!     - multi-character comparison operators come before single-character ones
//!
//! Two recognizers are custom functions rather than regexes: dollar-quoted strings
//! need the closing delimiter to repeat the opening tag (a backreference), and
//! numeric literals must not swallow the dot of a following dot-qualified name
//! (lookahead). Everything else is a `regex` rule compiled once into a process-wide
//! table (`once_cell`), so tokenization is lock-free and safe to run concurrently.
//!
//! The lexer is total: a character no rule recognizes becomes a single-character
//! `Error` token and scanning continues.
//!
//! Single-word keyword recognition deliberately happens *after* tokenization, as a
//! reclassification pass over `Name` tokens: a name that sits directly next to a
//! qualifying dot (`foo.select`) stays a name even when it matches the keyword
//! table.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::keywords;
use crate::tokens::TokenType;
use crate::tree::Token;

enum LexRule {
    /// Anchored regex with a fixed resulting tag.
    Re(Regex, TokenType),
    /// Custom matcher: returns consumed byte length and tag.
    Fn(fn(&str) -> Option<(usize, TokenType)>),
}

fn re(pattern: &str, ttype: TokenType) -> LexRule {
    // Patterns are written with a leading `^`; compilation only fails on a
    // programming error in the table itself.
    LexRule::Re(Regex::new(pattern).expect("invalid lexer rule"), ttype)
}

static RULES: Lazy<Vec<LexRule>> = Lazy::new(|| {
    use TokenType::*;
    vec![
        re(r"^(\r\n|\r|\n)", Newline),
        re(r"^[ \t\x0b\x0c]+", Whitespace),
        // #temp / ##global names, before the # comment rule
        re(r"^##?[\p{L}_][\p{L}\p{N}_$]*", Name),
        re(r"^(--|#)[^\r\n]*(\r\n|\r|\n)?", CommentSingle),
        re(r"^/\*(?s:.)*?\*/", CommentMulti),
        // unterminated block comment: consume to end of input
        re(r"^/\*(?s:.)*", CommentMulti),
        LexRule::Fn(match_dollar_string),
        re(r"^'(?:[^'\\]|\\(?s:.)|'')*'", StringSingle),
        re(r#"^"(?:[^"\\]|\\(?s:.)|"")*""#, StringDouble),
        re(r"^`(?:[^`]|``)*`", StringBacktick),
        re(r"^0[xX][0-9a-fA-F]+", NumberHex),
        LexRule::Fn(match_number),
        re(r"(?i)^CREATE\s+OR\s+REPLACE\b", KeywordDdl),
        re(r"(?i)^UNION\s+ALL\b", Keyword),
        re(r"(?i)^GROUP\s+BY\b", Keyword),
        re(r"(?i)^ORDER\s+BY\b", Keyword),
        re(r"(?i)^NOT\s+NULL\b", Keyword),
        re(r"(?i)^END\s+(IF|LOOP|WHILE)\b", Keyword),
        re(r"(?i)^(LEFT|RIGHT|FULL)(\s+OUTER)?\s+JOIN\b", Keyword),
        re(r"(?i)^(CROSS|INNER)\s+JOIN\b", Keyword),
        // [bracketed name] (T-SQL quoted identifier)
        re(r"^\[[^\]\[]*\]", Name),
        re(r"^[\p{L}_][\p{L}\p{N}_$]*", Name),
        re(r"^:=", Assignment),
        re(r"^::", Punctuation),
        re(r"^%\(\w+\)s", Placeholder),
        re(r"^%s", Placeholder),
        re(r"^\?", Placeholder),
        re(r"^:[\p{L}_][\p{L}\p{N}_]*", Placeholder),
        re(r"^:\d+", Placeholder),
        re(r"^@[\p{L}_][\p{L}\p{N}_]*", Placeholder),
        re(r"^\$[\p{L}_][\p{L}\p{N}_]*", Placeholder),
        re(r"^\$\d+", Placeholder),
        re(r"^(<=|>=|<>|!=|==|!~|~|<|>|=)", OperatorComparison),
        re(r"^\|\|", OperatorConcat),
        re(r"^\*", Wildcard),
        re(r"^[-+/%^&|]", Operator),
        re(r"^[(),;.\[\]]", Punctuation),
    ]
});

/// Tokenize raw SQL text into a flat, lossless token sequence.
///
/// Total: never fails. Concatenating the values of the returned tokens
/// reconstructs the input exactly.
pub fn tokenize(sql: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < sql.len() {
        let rest = &sql[pos..];
        let mut matched = None;
        for rule in RULES.iter() {
            let hit = match rule {
                LexRule::Re(regex, ttype) => regex
                    .find(rest)
                    .filter(|m| m.end() > 0)
                    .map(|m| (m.end(), *ttype)),
                LexRule::Fn(matcher) => matcher(rest).filter(|(len, _)| *len > 0),
            };
            if hit.is_some() {
                matched = hit;
                break;
            }
        }
        let (len, ttype) = matched.unwrap_or_else(|| {
            let ch_len = rest.chars().next().map(|c| c.len_utf8()).unwrap_or(1);
            (ch_len, TokenType::Error)
        });
        tokens.push(Token::new(ttype, &rest[..len], pos));
        pos += len;
    }
    reclassify_keywords(&mut tokens);
    tokens
}

/// Upgrade `Name` tokens that match the keyword table, unless a qualifying dot
/// sits directly on either side of them (a column named `select` stays a name).
fn reclassify_keywords(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i].ttype != TokenType::Name {
            continue;
        }
        let prev_dot = i > 0 && tokens[i - 1].matches(TokenType::Punctuation, ".");
        let next_dot = tokens
            .get(i + 1)
            .map_or(false, |t| t.matches(TokenType::Punctuation, "."));
        if prev_dot || next_dot {
            continue;
        }
        if let Some(ttype) = keywords::classify(&tokens[i].value) {
            tokens[i].ttype = ttype;
        }
    }
}

/// `$tag$ ... $tag$` with a possibly-empty tag. The closing delimiter must
/// repeat the opening tag; if it never does, this matcher declines and the
/// leading `$...` falls through to the placeholder rules.
fn match_dollar_string(input: &str) -> Option<(usize, TokenType)> {
    let rest = input.strip_prefix('$')?;
    let tag_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let tag = &rest[..tag_len];
    if !rest[tag_len..].starts_with('$') {
        return None;
    }
    let open_len = tag_len + 2;
    let closer = format!("${tag}$");
    let body_at = input[open_len..].find(&closer)?;
    Some((open_len + body_at + closer.len(), TokenType::StringDollar))
}

/// Integers, decimals, and scientific notation. Never consumes a dot that
/// introduces a dot-qualified name (`1.foo` lexes as integer, dot, name).
fn match_number(input: &str) -> Option<(usize, TokenType)> {
    let bytes = input.as_bytes();
    let mut end;
    let mut is_float = false;

    if bytes.first() == Some(&b'.') {
        let digits = leading_digits(&bytes[1..]);
        if digits == 0 {
            return None;
        }
        end = 1 + digits;
        is_float = true;
    } else {
        let digits = leading_digits(bytes);
        if digits == 0 {
            return None;
        }
        end = digits;
        if bytes.get(end) == Some(&b'.') {
            let starts_name = matches!(
                bytes.get(end + 1),
                Some(c) if c.is_ascii_alphabetic() || *c == b'_'
            );
            if !starts_name {
                end += 1;
                end += leading_digits(&bytes[end..]);
                is_float = true;
            }
        }
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let digits = leading_digits(&bytes[exp..]);
        if digits > 0 {
            end = exp + digits;
            is_float = true;
        }
    }

    let ttype = if is_float {
        TokenType::NumberFloat
    } else {
        TokenType::NumberInteger
    };
    Some((end, ttype))
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
