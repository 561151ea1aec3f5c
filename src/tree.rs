//! Token model: leaf tokens and composite nodes.
//!
//! Three layers build on each other:
//!
//!     Token:     the smallest classified unit of source text. Immutable triple of
//!                type tag, literal text, and byte offset. Created once by the lexer;
//!                tokens synthesized later by formatting filters carry no offset.
//!
//!     Node:      either a leaf `Token` or a composite `TokenList`. The grouping
//!                engine only ever wraps contiguous runs of nodes; it never reorders
//!                or duplicates them, so concatenating leaf text in document order
//!                always reconstructs the statement's text.
//!
//!     TokenList: an ordered sequence of children with a semantic kind
//!                (statement, parenthesis, identifier, ...). A list's value is
//!                recomputed from its children on demand, never cached.
//!
//! The introspection helpers (`real_name`, `alias`, `parameters`, ...) are
//! best-effort queries for tools that inspect trees; they return `None`/empty on
//! shapes they don't understand instead of failing.

use serde::{Deserialize, Serialize};

use crate::tokens::TokenType;

/// A single leaf token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub ttype: TokenType,
    pub value: String,
    /// Byte offset in the original input; `None` for tokens inserted by filters.
    pub pos: Option<usize>,
}

impl Token {
    pub fn new(ttype: TokenType, value: impl Into<String>, pos: usize) -> Self {
        Token {
            ttype,
            value: value.into(),
            pos: Some(pos),
        }
    }

    /// A token that did not come from source text (filter-inserted whitespace).
    pub fn synthetic(ttype: TokenType, value: impl Into<String>) -> Self {
        Token {
            ttype,
            value: value.into(),
            pos: None,
        }
    }

    /// Normalized form used for matching: keywords uppercase with inner
    /// whitespace runs collapsed (`group   by` -> `GROUP BY`), everything else
    /// the literal text.
    pub fn normalized(&self) -> String {
        if self.ttype.is_keyword() {
            self.value
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_uppercase()
        } else {
            self.value.clone()
        }
    }

    /// True when this token has the given type and its normalized text equals
    /// `value` (case-insensitively for keywords).
    pub fn matches(&self, ttype: TokenType, value: &str) -> bool {
        self.ttype == ttype && self.normalized() == value
    }

    pub fn is_whitespace(&self) -> bool {
        self.ttype.is_whitespace()
    }
}

/// Semantic kind of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Statement,
    Parenthesis,
    Identifier,
    IdentifierList,
    Function,
    Where,
    Case,
    Comparison,
    Assignment,
    Operation,
    TypedLiteral,
    Begin,
}

/// Classification of a statement, from its first meaningful keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    Unknown,
}

/// A child of a `TokenList`: leaf or nested composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Token(Token),
    Group(TokenList),
}

impl Node {
    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }

    pub fn is_whitespace(&self) -> bool {
        match self {
            Node::Token(t) => t.is_whitespace(),
            Node::Group(_) => false,
        }
    }

    pub fn is_comment(&self) -> bool {
        match self {
            Node::Token(t) => t.ttype.is_comment(),
            Node::Group(_) => false,
        }
    }

    /// Leaf type tag, `None` for composites.
    pub fn ttype(&self) -> Option<TokenType> {
        match self {
            Node::Token(t) => Some(t.ttype),
            Node::Group(_) => None,
        }
    }

    /// Composite kind, `None` for leaves.
    pub fn kind(&self) -> Option<GroupKind> {
        match self {
            Node::Token(_) => None,
            Node::Group(g) => Some(g.kind),
        }
    }

    pub fn as_group(&self) -> Option<&TokenList> {
        match self {
            Node::Token(_) => None,
            Node::Group(g) => Some(g),
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Token(t) => Some(t),
            Node::Group(_) => None,
        }
    }

    /// Literal text of this node (leaf text, or concatenated leaf text of the
    /// whole subtree).
    pub fn value(&self) -> String {
        match self {
            Node::Token(t) => t.value.clone(),
            Node::Group(g) => g.value(),
        }
    }

    /// True for a leaf with the given tag and normalized text.
    pub fn matches(&self, ttype: TokenType, value: &str) -> bool {
        match self {
            Node::Token(t) => t.matches(ttype, value),
            Node::Group(_) => false,
        }
    }

    /// First leaf token of the subtree.
    pub fn first_token(&self) -> Option<&Token> {
        match self {
            Node::Token(t) => Some(t),
            Node::Group(g) => g.tokens.iter().find_map(|n| n.first_token()),
        }
    }

    /// Last leaf token of the subtree.
    pub fn last_token(&self) -> Option<&Token> {
        match self {
            Node::Token(t) => Some(t),
            Node::Group(g) => g.tokens.iter().rev().find_map(|n| n.last_token()),
        }
    }
}

/// An ordered composite of leaves and/or other composites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenList {
    pub kind: GroupKind,
    pub tokens: Vec<Node>,
}

impl TokenList {
    pub fn new(kind: GroupKind, tokens: Vec<Node>) -> Self {
        TokenList { kind, tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Concatenated literal text of every leaf, in document order.
    pub fn value(&self) -> String {
        let mut out = String::new();
        self.write_value(&mut out);
        out
    }

    fn write_value(&self, out: &mut String) {
        for node in &self.tokens {
            match node {
                Node::Token(t) => out.push_str(&t.value),
                Node::Group(g) => g.write_value(out),
            }
        }
    }

    /// First leaf token of the subtree.
    pub fn first_token(&self) -> Option<&Token> {
        self.tokens.iter().find_map(|n| n.first_token())
    }

    /// Last leaf token of the subtree.
    pub fn last_token(&self) -> Option<&Token> {
        self.tokens.iter().rev().find_map(|n| n.last_token())
    }

    /// All leaf tokens in document order.
    pub fn flatten(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for node in &self.tokens {
            match node {
                Node::Token(t) => out.push(t),
                Node::Group(g) => g.collect_tokens(out),
            }
        }
    }

    /// Apply `f` to every leaf token, in document order.
    pub fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token)) {
        for node in &mut self.tokens {
            match node {
                Node::Token(t) => f(t),
                Node::Group(g) => g.for_each_token_mut(f),
            }
        }
    }

    /// Index of the next non-whitespace child at or after `from`.
    pub(crate) fn next_nonws(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| !self.tokens[i].is_whitespace())
    }

    /// Index of the previous non-whitespace child at or before `from`.
    pub(crate) fn prev_nonws(&self, from: usize) -> Option<usize> {
        (0..=from.min(self.tokens.len().saturating_sub(1)))
            .rev()
            .find(|&i| !self.tokens[i].is_whitespace())
    }

    /// Classify this list as a statement. Looks at the first leaf that is
    /// neither whitespace nor a comment; a CTE introducer (`WITH`) resolves to
    /// the first DML keyword that follows it.
    pub fn statement_type(&self) -> StatementType {
        let leaves = self.flatten();
        let mut iter = leaves
            .iter()
            .filter(|t| !t.is_whitespace() && !t.ttype.is_comment());
        let first = match iter.next() {
            Some(t) => t,
            None => return StatementType::Unknown,
        };
        match first.ttype {
            TokenType::KeywordDml => dml_type(&first.normalized()),
            TokenType::KeywordDdl => ddl_type(&first.normalized()),
            TokenType::KeywordCte => iter
                .find(|t| t.ttype == TokenType::KeywordDml)
                .map(|t| dml_type(&t.normalized()))
                .unwrap_or(StatementType::Unknown),
            _ => StatementType::Unknown,
        }
    }

    /// Object name of an `Identifier`: the first name-like token after the
    /// last qualifying dot (or the first name-like token at all).
    pub fn real_name(&self) -> Option<String> {
        let dot = self.last_dot_index();
        self.first_name_from(dot.map(|i| i + 1).unwrap_or(0), false)
    }

    /// Qualifier of an `Identifier` (`a` in `a.b`): the token before the first dot.
    pub fn parent_name(&self) -> Option<String> {
        let dot = self
            .tokens
            .iter()
            .position(|n| n.matches(TokenType::Punctuation, "."))?;
        let prev = self.prev_nonws(dot.checked_sub(1)?)?;
        Some(remove_quotes(&self.tokens[prev].value()))
    }

    /// Alias of an `Identifier`: the name after `AS`, or a trailing bare name.
    pub fn alias(&self) -> Option<String> {
        if let Some(as_idx) = self
            .tokens
            .iter()
            .position(|n| n.matches(TokenType::Keyword, "AS"))
        {
            return self.first_name_from(as_idx + 1, true);
        }
        // "name alias" without AS: a whitespace-separated trailing name.
        let has_ws = self.tokens.iter().any(|n| n.is_whitespace());
        if self.tokens.len() > 2 && has_ws {
            for node in self.tokens.iter().rev() {
                if let Some(name) = name_of(node, false) {
                    return Some(name);
                }
            }
        }
        None
    }

    /// Name this identifier is known by: its alias if present, else its real name.
    pub fn name(&self) -> Option<String> {
        self.alias().or_else(|| self.real_name())
    }

    /// Type name after a `::` typecast, if any.
    pub fn typecast(&self) -> Option<String> {
        let cast = self
            .tokens
            .iter()
            .position(|n| n.matches(TokenType::Punctuation, "::"))?;
        let next = self.next_nonws(cast + 1)?;
        Some(self.tokens[next].value())
    }

    /// Argument nodes of a `Function` call, commas and whitespace excluded.
    pub fn parameters(&self) -> Vec<&Node> {
        let parens = match self
            .tokens
            .iter()
            .find(|n| n.kind() == Some(GroupKind::Parenthesis))
        {
            Some(Node::Group(g)) => g,
            _ => return Vec::new(),
        };
        if let Some(Node::Group(list)) = parens
            .tokens
            .iter()
            .find(|n| n.kind() == Some(GroupKind::IdentifierList))
        {
            return list.identifiers();
        }
        parens
            .tokens
            .iter()
            .filter(|n| {
                !n.is_whitespace()
                    && !n.is_comment()
                    && n.ttype() != Some(TokenType::Punctuation)
            })
            .collect()
    }

    /// Member nodes of an `IdentifierList`, commas and whitespace excluded.
    pub fn identifiers(&self) -> Vec<&Node> {
        self.tokens
            .iter()
            .filter(|n| {
                !n.is_whitespace()
                    && !n.is_comment()
                    && !n.matches(TokenType::Punctuation, ",")
            })
            .collect()
    }

    fn last_dot_index(&self) -> Option<usize> {
        self.tokens
            .iter()
            .rposition(|n| n.matches(TokenType::Punctuation, "."))
    }

    /// First name-like child at or after `from`. With `accept_keywords`,
    /// keywords qualify too (aliases may collide with keywords).
    fn first_name_from(&self, from: usize, accept_keywords: bool) -> Option<String> {
        self.tokens[from.min(self.tokens.len())..]
            .iter()
            .find_map(|n| name_of(n, accept_keywords))
    }
}

/// Name carried by a node, if it is name-like: a name/wildcard/quoted leaf, or
/// a nested identifier or function.
fn name_of(node: &Node, accept_keywords: bool) -> Option<String> {
    match node {
        Node::Token(t) => {
            let name_like = matches!(
                t.ttype,
                TokenType::Name | TokenType::Wildcard | TokenType::StringDouble
            ) || (accept_keywords && t.ttype.is_keyword());
            name_like.then(|| remove_quotes(&t.value))
        }
        Node::Group(g) if matches!(g.kind, GroupKind::Identifier | GroupKind::Function) => g.name(),
        Node::Group(_) => None,
    }
}

fn dml_type(normalized: &str) -> StatementType {
    match normalized {
        "SELECT" => StatementType::Select,
        "INSERT" => StatementType::Insert,
        "UPDATE" => StatementType::Update,
        "DELETE" => StatementType::Delete,
        _ => StatementType::Unknown,
    }
}

fn ddl_type(normalized: &str) -> StatementType {
    if normalized.starts_with("CREATE") {
        return StatementType::Create;
    }
    match normalized {
        "DROP" => StatementType::Drop,
        "ALTER" => StatementType::Alter,
        _ => StatementType::Unknown,
    }
}

/// Strip one level of surrounding quotes (`"x"`, `'x'`, `` `x` ``).
pub(crate) fn remove_quotes(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'' | b'`') {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}
