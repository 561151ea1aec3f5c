//! Grouping engine: folds a statement's flat token run into a nested tree.
//!
//! An ordered pipeline of independent grouping passes. Each pass is a total
//! function over a flat-or-partially-grouped child sequence that folds some
//! contiguous runs into new composite nodes; later passes treat the composites
//! built by earlier ones as single units. The pass order is part of the
//! contract:
//!
//!     1. parentheses                  6. assignments, then comparisons
//!     2. function calls               7. comma-separated identifier lists
//!     3. dotted names, typecasts,     8. CASE/BEGIN blocks, then WHERE
//!        typed literals                  clauses
//!     4. arithmetic operations        9. trailing-comment attachment
//!     5. identifiers, aliases, ordering
//!
//! Every folding pass recurses into already-built composites before folding at
//! the current level, skipping composites of its own kind; the comment pass
//! runs last, over the statement's direct children only, so the composites
//! that receive a trailing comment already exist. Every pass is idempotent on
//! its own output. Regrouping the flattened leaves of a grouped
//! statement reproduces the same tree. Ungroupable remainders stay as flat
//! leaves under the statement node; nothing here can fail.

use crate::tokens::TokenType;
use crate::tree::{GroupKind, Node, Token, TokenList};

/// Build the grouped tree for one statement's token run.
pub fn group(tokens: Vec<Token>) -> TokenList {
    let mut stmt = TokenList::new(
        GroupKind::Statement,
        tokens.into_iter().map(Node::Token).collect(),
    );
    group_tree(&mut stmt);
    stmt
}

/// Run the full pass pipeline over an existing tree.
pub(crate) fn group_tree(stmt: &mut TokenList) {
    group_parenthesis(stmt);
    group_functions(stmt);
    group_period(stmt);
    group_typecasts(stmt);
    group_typed_literals(stmt);
    group_operations(stmt);
    group_identifiers(stmt);
    group_as(stmt);
    group_aliased(stmt);
    group_order(stmt);
    group_update_assignments(stmt);
    group_assignments(stmt);
    group_comparisons(stmt);
    group_identifier_lists(stmt);
    group_blocks(stmt);
    group_where(stmt);
    group_comments(stmt);
}

/// Fold `tokens[start..end]` into a new composite of `kind` at `start`.
fn group_range(list: &mut TokenList, kind: GroupKind, start: usize, end: usize) {
    let children: Vec<Node> = list.tokens.drain(start..end).collect();
    list.tokens
        .insert(start, Node::Group(TokenList::new(kind, children)));
}

/// Like `group_range`, but when the node at `start` is already a composite of
/// `kind` (and `extend` is set), absorb the following nodes into it instead of
/// nesting a second level.
fn fold_or_extend(list: &mut TokenList, kind: GroupKind, extend: bool, start: usize, end: usize) {
    if extend && list.tokens[start].kind() == Some(kind) {
        let moved: Vec<Node> = list.tokens.drain(start + 1..end).collect();
        if let Node::Group(g) = &mut list.tokens[start] {
            g.tokens.extend(moved);
        }
    } else {
        group_range(list, kind, start, end);
    }
}

/// Generic `lhs PIVOT rhs` folder shared by several passes. Scans the current
/// level, recursion is the caller's business.
fn fold_infix(
    list: &mut TokenList,
    kind: GroupKind,
    extend: bool,
    is_pivot: &dyn Fn(&Node) -> bool,
    valid_prev: &dyn Fn(&Node) -> bool,
    valid_next: &dyn Fn(&Node) -> bool,
) {
    let mut prev: Option<usize> = None;
    let mut i = 0;
    while i < list.tokens.len() {
        if list.tokens[i].is_whitespace() {
            i += 1;
            continue;
        }
        if is_pivot(&list.tokens[i]) {
            let next = list.next_nonws(i + 1);
            let prev_ok = prev.map_or(false, |p| valid_prev(&list.tokens[p]));
            let next_ok = next.map_or(false, |n| valid_next(&list.tokens[n]));
            if prev_ok && next_ok {
                let (p, n) = (prev.unwrap_or_default(), next.unwrap_or_default());
                fold_or_extend(list, kind, extend, p, n + 1);
                prev = Some(p);
                i = p + 1;
                continue;
            }
        }
        prev = Some(i);
        i += 1;
    }
}

fn keyword_leaf(node: &Node) -> bool {
    node.ttype().map_or(false, |t| t.is_keyword())
}

/// Value-bearing unit for the expression-shaped passes: literal/name/placeholder
/// leaves, or composites that stand for a value.
fn value_like(node: &Node) -> bool {
    match node {
        Node::Token(t) => t.ttype.is_value(),
        Node::Group(g) => matches!(
            g.kind,
            GroupKind::Parenthesis
                | GroupKind::Function
                | GroupKind::Identifier
                | GroupKind::Operation
                | GroupKind::TypedLiteral
        ),
    }
}

// ---- pass 1: parentheses ----------------------------------------------------

fn group_parenthesis(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            group_parenthesis(g);
        }
    }
    // When re-scanning an existing parenthesis group, its own delimiters are
    // not candidates for another fold.
    let mut start = 0;
    let mut end = list.tokens.len();
    if list.kind == GroupKind::Parenthesis {
        if list
            .tokens
            .first()
            .map_or(false, |n| n.matches(TokenType::Punctuation, "("))
        {
            start = 1;
        }
        if end > start
            && list.tokens[end - 1].matches(TokenType::Punctuation, ")")
        {
            end -= 1;
        }
    }
    let mut stack: Vec<usize> = Vec::new();
    let mut i = start;
    while i < end {
        if list.tokens[i].matches(TokenType::Punctuation, "(") {
            stack.push(i);
            i += 1;
        } else if list.tokens[i].matches(TokenType::Punctuation, ")") {
            match stack.pop() {
                Some(open) => {
                    group_range(list, GroupKind::Parenthesis, open, i + 1);
                    end -= i - open;
                    i = open + 1;
                }
                // stray closer: leave it as a leaf
                None => i += 1,
            }
        } else {
            i += 1;
        }
    }
    // unmatched opens fold everything to their right, innermost first
    while let Some(open) = stack.pop() {
        group_range(list, GroupKind::Parenthesis, open, end);
        end = open + 1;
    }
}

// ---- pass 2: function calls -------------------------------------------------

fn group_functions(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Function {
                group_functions(g);
            }
        }
    }
    let mut i = 0;
    while i < list.tokens.len() {
        if list.tokens[i].ttype() == Some(TokenType::Name) {
            if let Some(next) = list.next_nonws(i + 1) {
                if list.tokens[next].kind() == Some(GroupKind::Parenthesis) {
                    group_range(list, GroupKind::Function, i, next + 1);
                }
            }
        }
        i += 1;
    }
}

// ---- pass 3: dotted names, typecasts, typed literals ------------------------

fn valid_period_prev(node: &Node) -> bool {
    matches!(
        node.ttype(),
        Some(TokenType::Name | TokenType::StringDouble)
    ) || matches!(
        node.kind(),
        Some(GroupKind::Identifier | GroupKind::Function)
    )
}

fn valid_period_next(node: &Node) -> bool {
    matches!(
        node.ttype(),
        Some(TokenType::Name | TokenType::StringDouble | TokenType::Wildcard)
    ) || node.kind() == Some(GroupKind::Function)
}

fn group_period(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Identifier {
                group_period(g);
            }
        }
    }
    let mut prev: Option<usize> = None;
    let mut i = 0;
    while i < list.tokens.len() {
        if list.tokens[i].is_whitespace() {
            i += 1;
            continue;
        }
        if list.tokens[i].matches(TokenType::Punctuation, ".") {
            if let Some(p) = prev.filter(|&p| valid_period_prev(&list.tokens[p])) {
                // the fold stops at the dot itself when nothing name-like follows
                let end = match list.next_nonws(i + 1) {
                    Some(n) if valid_period_next(&list.tokens[n]) => n + 1,
                    _ => i + 1,
                };
                fold_or_extend(list, GroupKind::Identifier, true, p, end);
                prev = Some(p);
                i = p + 1;
                continue;
            }
        }
        prev = Some(i);
        i += 1;
    }
}

fn group_typecasts(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Identifier {
                group_typecasts(g);
            }
        }
    }
    fold_infix(
        list,
        GroupKind::Identifier,
        true,
        &|n| n.matches(TokenType::Punctuation, "::"),
        &|_| true,
        &|_| true,
    );
}

const TYPED_LITERAL_INTRODUCERS: [&str; 4] = ["DATE", "TIME", "TIMESTAMP", "INTERVAL"];

fn group_typed_literals(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::TypedLiteral {
                group_typed_literals(g);
            }
        }
    }
    let mut i = 0;
    while i < list.tokens.len() {
        let is_literal = list.tokens[i].ttype() == Some(TokenType::StringSingle);
        if is_literal {
            let intro = list.prev_nonws(i.wrapping_sub(1)).filter(|&p| {
                p < i
                    && list.tokens[p].ttype() == Some(TokenType::Keyword)
                    && TYPED_LITERAL_INTRODUCERS.contains(
                        &list.tokens[p]
                            .as_token()
                            .map(|t| t.normalized())
                            .unwrap_or_default()
                            .as_str(),
                    )
            });
            if let Some(p) = intro {
                group_range(list, GroupKind::TypedLiteral, p, i + 1);
                i = p + 1;
                continue;
            }
        }
        i += 1;
    }
}

// ---- pass 4: arithmetic operations ------------------------------------------

fn group_operations(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Operation {
                group_operations(g);
            }
        }
    }
    let mut prev: Option<usize> = None;
    let mut i = 0;
    while i < list.tokens.len() {
        if list.tokens[i].is_whitespace() {
            i += 1;
            continue;
        }
        let is_pivot = matches!(
            list.tokens[i].ttype(),
            Some(TokenType::Operator | TokenType::OperatorConcat | TokenType::Wildcard)
        );
        if is_pivot {
            let next = list.next_nonws(i + 1);
            let prev_ok = prev.map_or(false, |p| value_like(&list.tokens[p]));
            let next_ok = next.map_or(false, |n| value_like(&list.tokens[n]));
            if prev_ok && next_ok {
                let (p, n) = (prev.unwrap_or_default(), next.unwrap_or_default());
                group_range(list, GroupKind::Operation, p, n + 1);
                // a `*` folded into an operation is a multiplication
                if let Node::Group(g) = &mut list.tokens[p] {
                    for child in &mut g.tokens {
                        if let Node::Token(t) = child {
                            if t.ttype == TokenType::Wildcard {
                                t.ttype = TokenType::Operator;
                            }
                        }
                    }
                }
                prev = Some(p);
                i = p + 1;
                continue;
            }
        }
        prev = Some(i);
        i += 1;
    }
}

// ---- pass 5: identifiers, aliases, ordering ---------------------------------

/// Wrap bare name-like leaves so the alias/ordering folds below, and every
/// later pass, can treat identifiers uniformly as composites.
fn group_identifiers(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Identifier {
                group_identifiers(g);
            }
        }
    }
    for i in 0..list.tokens.len() {
        if matches!(
            list.tokens[i].ttype(),
            Some(TokenType::Name | TokenType::StringDouble)
        ) {
            group_range(list, GroupKind::Identifier, i, i + 1);
        }
    }
}

fn group_as(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Identifier {
                group_as(g);
            }
        }
    }
    fold_infix(
        list,
        GroupKind::Identifier,
        true,
        &|n| n.matches(TokenType::Keyword, "AS"),
        &|n| n.matches(TokenType::Keyword, "NULL") || !keyword_leaf(n),
        &|n| {
            !matches!(
                n.ttype(),
                Some(TokenType::KeywordDml | TokenType::KeywordDdl | TokenType::KeywordCte)
            )
        },
    );
}

fn aliasable(node: &Node) -> bool {
    node.ttype().map_or(false, |t| t.is_number())
        || matches!(
            node.kind(),
            Some(
                GroupKind::Parenthesis
                    | GroupKind::Function
                    | GroupKind::Case
                    | GroupKind::Identifier
                    | GroupKind::Operation
                    | GroupKind::Comparison
            )
        )
}

/// `expr alias` without `AS`: an aliasable unit directly followed by an
/// identifier absorbs it.
fn group_aliased(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Identifier {
                group_aliased(g);
            }
        }
    }
    let mut i = 0;
    while i < list.tokens.len() {
        if aliasable(&list.tokens[i]) {
            if let Some(next) = list.next_nonws(i + 1) {
                if list.tokens[next].kind() == Some(GroupKind::Identifier) {
                    fold_or_extend(list, GroupKind::Identifier, true, i, next + 1);
                    // re-check the merged node; a further trailing identifier
                    // keeps folding in
                    continue;
                }
            }
        }
        i += 1;
    }
}

fn group_order(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Identifier {
                group_order(g);
            }
        }
    }
    let mut i = 0;
    while i < list.tokens.len() {
        if list.tokens[i].ttype() == Some(TokenType::KeywordOrder) {
            if let Some(p) = i.checked_sub(1).and_then(|j| list.prev_nonws(j)) {
                let prev_ok = list.tokens[p].kind() == Some(GroupKind::Identifier)
                    || list.tokens[p].ttype().map_or(false, |t| t.is_number());
                if prev_ok {
                    fold_or_extend(list, GroupKind::Identifier, true, p, i + 1);
                    i = p + 1;
                    continue;
                }
            }
        }
        i += 1;
    }
}

// ---- pass 6: assignments, then comparisons ----------------------------------

/// `=` means assignment only at the top level of an UPDATE statement, between
/// its SET keyword and the WHERE clause (or end of statement).
fn group_update_assignments(stmt: &mut TokenList) {
    if stmt.kind != GroupKind::Statement {
        return;
    }
    let is_update = stmt
        .tokens
        .iter()
        .find(|n| !n.is_whitespace() && !n.is_comment())
        .map_or(false, |n| n.matches(TokenType::KeywordDml, "UPDATE"));
    if !is_update {
        return;
    }
    let set_idx = match stmt
        .tokens
        .iter()
        .position(|n| n.matches(TokenType::Keyword, "SET"))
    {
        Some(i) => i,
        None => return,
    };
    let mut end = stmt.tokens[set_idx..]
        .iter()
        .position(|n| {
            n.matches(TokenType::Keyword, "WHERE") || n.matches(TokenType::Punctuation, ";")
        })
        .map(|p| p + set_idx)
        .unwrap_or(stmt.tokens.len());

    let mut prev: Option<usize> = None;
    let mut i = set_idx + 1;
    while i < end {
        if stmt.tokens[i].is_whitespace() {
            i += 1;
            continue;
        }
        if stmt.tokens[i].matches(TokenType::OperatorComparison, "=") {
            let next = stmt.next_nonws(i + 1).filter(|&n| n < end);
            let prev_ok = prev.map_or(false, |p| value_like(&stmt.tokens[p]));
            let next_ok = next.map_or(false, |n| value_like(&stmt.tokens[n]));
            if prev_ok && next_ok {
                let (p, n) = (prev.unwrap_or_default(), next.unwrap_or_default());
                group_range(stmt, GroupKind::Assignment, p, n + 1);
                end -= n - p;
                prev = Some(p);
                i = p + 1;
                continue;
            }
        }
        prev = Some(i);
        i += 1;
    }
}

fn group_assignments(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Assignment {
                group_assignments(g);
            }
        }
    }
    let not_terminator = |n: &Node| !keyword_leaf(n) && !n.matches(TokenType::Punctuation, ";");
    fold_infix(
        list,
        GroupKind::Assignment,
        false,
        &|n| n.ttype() == Some(TokenType::Assignment),
        &not_terminator,
        &not_terminator,
    );
}

fn comparable(node: &Node) -> bool {
    value_like(node) || node.ttype() == Some(TokenType::Keyword)
}

fn group_comparisons(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            // the `=` inside an assignment is the assignment operator
            if !matches!(g.kind, GroupKind::Comparison | GroupKind::Assignment) {
                group_comparisons(g);
            }
        }
    }
    fold_infix(
        list,
        GroupKind::Comparison,
        false,
        &|n| n.ttype() == Some(TokenType::OperatorComparison),
        &comparable,
        &comparable,
    );
}

// ---- pass 7: identifier lists -----------------------------------------------

fn list_member(node: &Node) -> bool {
    match node {
        Node::Token(t) => {
            t.ttype.is_value()
                || t.ttype == TokenType::Wildcard
                // NULL is the one keyword valid inside a list; admitting
                // keywords generally would swallow the END of an enclosing
                // CASE before the block fold runs
                || t.matches(TokenType::Keyword, "NULL")
        }
        Node::Group(g) => matches!(
            g.kind,
            GroupKind::Identifier
                | GroupKind::Function
                | GroupKind::Case
                | GroupKind::Comparison
                | GroupKind::Operation
                | GroupKind::TypedLiteral
                | GroupKind::IdentifierList
        ),
    }
}

fn group_identifier_lists(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::IdentifierList {
                group_identifier_lists(g);
            }
        }
    }
    fold_infix(
        list,
        GroupKind::IdentifierList,
        true,
        &|n| n.matches(TokenType::Punctuation, ","),
        &list_member,
        &list_member,
    );
}

// ---- pass 8: blocks, then WHERE ---------------------------------------------

/// `CASE … END` and `BEGIN … END`, stack-matched so nested blocks resolve
/// innermost-first. An opener without its END stays flat.
fn group_blocks(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if !matches!(g.kind, GroupKind::Case | GroupKind::Begin) {
                group_blocks(g);
            }
        }
    }
    let mut stack: Vec<(usize, GroupKind)> = Vec::new();
    let mut i = 0;
    while i < list.tokens.len() {
        let node = &list.tokens[i];
        if node.matches(TokenType::Keyword, "CASE") {
            stack.push((i, GroupKind::Case));
            i += 1;
        } else if node.matches(TokenType::Keyword, "BEGIN") {
            stack.push((i, GroupKind::Begin));
            i += 1;
        } else if node.matches(TokenType::Keyword, "END") {
            match stack.pop() {
                Some((open, kind)) => {
                    group_range(list, kind, open, i + 1);
                    i = open + 1;
                }
                None => i += 1,
            }
        } else {
            i += 1;
        }
    }
}

const WHERE_TERMINATORS: [&str; 10] = [
    "GROUP BY",
    "ORDER BY",
    "LIMIT",
    "UNION",
    "UNION ALL",
    "EXCEPT",
    "INTERSECT",
    "HAVING",
    "RETURNING",
    "INTO",
];

fn is_where_terminator(node: &Node) -> bool {
    node.matches(TokenType::Punctuation, ";")
        || node.matches(TokenType::Punctuation, ")")
        || node
            .as_token()
            .map_or(false, |t| {
                t.ttype == TokenType::Keyword
                    && WHERE_TERMINATORS.contains(&t.normalized().as_str())
            })
}

fn group_where(list: &mut TokenList) {
    for node in &mut list.tokens {
        if let Node::Group(g) = node {
            if g.kind != GroupKind::Where {
                group_where(g);
            }
        }
    }
    let mut i = 0;
    while i < list.tokens.len() {
        if list.tokens[i].matches(TokenType::Keyword, "WHERE") {
            let mut end = (i + 1..list.tokens.len())
                .find(|&j| is_where_terminator(&list.tokens[j]))
                .unwrap_or(list.tokens.len());
            // the whitespace before the terminator belongs to the outer level
            while end > i + 1 && list.tokens[end - 1].is_whitespace() {
                end -= 1;
            }
            group_range(list, GroupKind::Where, i, end);
        }
        i += 1;
    }
}

// ---- pass 9: trailing-comment attachment ------------------------------------

/// Attach each statement-level comment run (with its non-newline leading
/// whitespace) into the composite sibling directly before it, instead of
/// leaving it floating between clauses. Runs after every folding pass so the
/// receiving composites exist. Delimiter-bounded groups keep their closing
/// token last, so they never receive one.
fn group_comments(stmt: &mut TokenList) {
    let mut i = 0;
    while i < stmt.tokens.len() {
        if !stmt.tokens[i].is_comment() {
            i += 1;
            continue;
        }
        let mut run_start = i;
        while run_start > 0
            && stmt.tokens[run_start - 1].is_whitespace()
            && !stmt.tokens[run_start - 1].value().contains('\n')
        {
            run_start -= 1;
        }
        let mut run_end = i + 1;
        while run_end < stmt.tokens.len() {
            let node = &stmt.tokens[run_end];
            let joinable = node.is_comment()
                || (node.is_whitespace() && !node.value().contains('\n'));
            if !joinable {
                break;
            }
            run_end += 1;
        }
        while run_end > i + 1 && stmt.tokens[run_end - 1].is_whitespace() {
            run_end -= 1;
        }
        // a comment gluing two tokens together stays at this level; the
        // strip-comments filter replaces it with a space between its
        // neighbors, which must be siblings for that to work
        let glued = run_start == i
            && run_end < stmt.tokens.len()
            && !stmt.tokens[run_end].is_whitespace();
        if glued {
            i = run_end;
            continue;
        }
        let target = run_start.checked_sub(1).and_then(|p| {
            stmt.tokens[p].kind().filter(|k| {
                !matches!(
                    k,
                    GroupKind::Parenthesis | GroupKind::Case | GroupKind::Begin
                )
            })
        });
        if target.is_some() {
            let moved: Vec<Node> = stmt.tokens.drain(run_start..run_end).collect();
            if let Node::Group(g) = &mut stmt.tokens[run_start - 1] {
                g.tokens.extend(moved);
            }
            i = run_start;
        } else {
            i = run_end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_one(sql: &str) -> TokenList {
        group(tokenize(sql))
    }

    fn find_kind<'a>(list: &'a TokenList, kind: GroupKind) -> Option<&'a TokenList> {
        for node in &list.tokens {
            if let Node::Group(g) = node {
                if g.kind == kind {
                    return Some(g);
                }
                if let Some(found) = find_kind(g, kind) {
                    return Some(found);
                }
            }
        }
        None
    }

    #[test]
    fn test_select_star_shape() {
        let stmt = parse_one("select * from foo");
        assert_eq!(stmt.kind, GroupKind::Statement);
        assert!(stmt
            .tokens
            .iter()
            .any(|n| n.ttype() == Some(TokenType::Wildcard)));
        assert!(stmt.tokens.iter().any(|n| n.matches(TokenType::Keyword, "FROM")));
        let ident = find_kind(&stmt, GroupKind::Identifier).unwrap();
        assert_eq!(ident.value(), "foo");
        assert_eq!(stmt.value(), "select * from foo");
    }

    #[test]
    fn test_qualified_identifier_with_cast_and_alias() {
        let stmt = parse_one("select x.y::text as z from foo");
        let ident = find_kind(&stmt, GroupKind::Identifier).unwrap();
        assert_eq!(ident.real_name().as_deref(), Some("y"));
        assert_eq!(ident.parent_name().as_deref(), Some("x"));
        assert_eq!(ident.alias().as_deref(), Some("z"));
        assert_eq!(ident.typecast().as_deref(), Some("text"));
    }

    #[test]
    fn test_operation_retags_wildcard() {
        let stmt = parse_one("select 1 * 2");
        let op = find_kind(&stmt, GroupKind::Operation).unwrap();
        assert_eq!(op.value(), "1 * 2");
        assert!(op
            .tokens
            .iter()
            .any(|n| n.matches(TokenType::Operator, "*")));
    }

    #[test]
    fn test_projection_wildcard_in_dotted_name_keeps_tag() {
        let stmt = parse_one("select a.* from t");
        let ident = find_kind(&stmt, GroupKind::Identifier).unwrap();
        assert_eq!(ident.value(), "a.*");
        assert!(ident
            .tokens
            .iter()
            .any(|n| n.ttype() == Some(TokenType::Wildcard)));
    }

    #[test]
    fn test_function_call_and_parameters() {
        let stmt = parse_one("select count(1) from t");
        let func = find_kind(&stmt, GroupKind::Function).unwrap();
        assert_eq!(func.value(), "count(1)");
        let params = func.parameters();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].value(), "1");
    }

    #[test]
    fn test_identifier_list() {
        let stmt = parse_one("select a, b, c from t");
        let list = find_kind(&stmt, GroupKind::IdentifierList).unwrap();
        assert_eq!(list.identifiers().len(), 3);
    }

    #[test]
    fn test_null_allowed_in_list() {
        let stmt = parse_one("select a, null, b from t");
        let list = find_kind(&stmt, GroupKind::IdentifierList).unwrap();
        assert_eq!(list.identifiers().len(), 3);
    }

    #[test]
    fn test_where_stops_before_order_by() {
        let stmt = parse_one("select * from foo where a = 1 order by b");
        let where_ = find_kind(&stmt, GroupKind::Where).unwrap();
        assert_eq!(where_.value(), "where a = 1");
        assert!(find_kind(where_, GroupKind::Comparison).is_some());
        assert!(stmt
            .tokens
            .iter()
            .any(|n| n.matches(TokenType::Keyword, "ORDER BY")));
    }

    #[test]
    fn test_case_block() {
        let stmt = parse_one("select case when a then 1 else 2 end from t");
        let case = find_kind(&stmt, GroupKind::Case).unwrap();
        assert_eq!(case.value(), "case when a then 1 else 2 end");
    }

    #[test]
    fn test_nested_case_blocks() {
        let stmt = parse_one("select case when a then case when b then 1 end else 2 end");
        let outer = find_kind(&stmt, GroupKind::Case).unwrap();
        assert!(find_kind(outer, GroupKind::Case).is_some());
    }

    #[test]
    fn test_begin_block() {
        let stmt = parse_one("begin select 1; select 2; end");
        let begin = find_kind(&stmt, GroupKind::Begin).unwrap();
        assert_eq!(begin.value(), "begin select 1; select 2; end");
    }

    #[test]
    fn test_update_set_assignment() {
        let stmt = parse_one("update t set a = 1 where b = 2");
        let assign = find_kind(&stmt, GroupKind::Assignment).unwrap();
        assert_eq!(assign.value(), "a = 1");
        let where_ = find_kind(&stmt, GroupKind::Where).unwrap();
        assert!(find_kind(where_, GroupKind::Comparison).is_some());
    }

    #[test]
    fn test_walrus_assignment() {
        let stmt = parse_one("foo := 1");
        let assign = find_kind(&stmt, GroupKind::Assignment).unwrap();
        assert_eq!(assign.value(), "foo := 1");
    }

    #[test]
    fn test_equals_outside_update_is_comparison() {
        let stmt = parse_one("select * from t where a = 1");
        assert!(find_kind(&stmt, GroupKind::Assignment).is_none());
        assert!(find_kind(&stmt, GroupKind::Comparison).is_some());
    }

    #[test]
    fn test_typed_literal() {
        let stmt = parse_one("select interval '2 days'");
        let lit = find_kind(&stmt, GroupKind::TypedLiteral).unwrap();
        assert_eq!(lit.value(), "interval '2 days'");
    }

    #[test]
    fn test_unmatched_open_paren_folds_to_end() {
        let stmt = parse_one("select (a from");
        let parens = find_kind(&stmt, GroupKind::Parenthesis).unwrap();
        assert_eq!(parens.value(), "(a from");
    }

    #[test]
    fn test_stray_close_paren_stays_leaf() {
        let stmt = parse_one("select a ) from t");
        assert!(find_kind(&stmt, GroupKind::Parenthesis).is_none());
        assert_eq!(stmt.value(), "select a ) from t");
    }

    #[test]
    fn test_nested_parentheses() {
        let stmt = parse_one("select (a + (b - c)) from t");
        let outer = find_kind(&stmt, GroupKind::Parenthesis).unwrap();
        assert!(find_kind(outer, GroupKind::Parenthesis).is_some());
    }

    #[test]
    fn test_grouping_is_idempotent() {
        for sql in [
            "select * from foo where a = 1 order by b",
            "select a, count(1), x.y as z from t group by a",
            "update t set a = 1, b = 2 where c = 3",
            "select case when a then 1 else 2 end from t",
            "select (a + (b - c)) * 3 from t",
            "select a, b -- trailing\n",
            "select a from t -- c\nwhere b = 1",
            "select a, b, /* comment */ c from t -- trailing",
        ] {
            let once = group(tokenize(sql));
            let mut twice = once.clone();
            group_tree(&mut twice);
            assert_eq!(once, twice, "{sql}");
        }
    }

    #[test]
    fn test_trailing_comment_attaches_to_preceding_group() {
        let stmt = parse_one("select a, b -- trailing\n");
        assert!(!stmt.tokens.iter().any(|n| n.is_comment()));
        let list = find_kind(&stmt, GroupKind::IdentifierList).unwrap();
        assert!(list.tokens.iter().any(|n| n.is_comment()));
        assert_eq!(stmt.value(), "select a, b -- trailing\n");
    }

    #[test]
    fn test_comment_between_clauses_attaches_to_table() {
        let stmt = parse_one("select a from t -- c\nwhere b = 1");
        assert!(!stmt.tokens.iter().any(|n| n.is_comment()));
        let where_ = find_kind(&stmt, GroupKind::Where).unwrap();
        assert_eq!(where_.value(), "where b = 1");
    }

    #[test]
    fn test_comment_after_leaf_stays_floating() {
        // "1" is a plain literal, not a composite; nothing to attach to
        let stmt = parse_one("select 1 -- one\n");
        assert!(stmt.tokens.iter().any(|n| n.is_comment()));
    }

    #[test]
    fn test_gluing_comment_stays_between_its_neighbors() {
        let stmt = parse_one("select a/*x*/b from t");
        assert!(stmt.tokens.iter().any(|n| n.is_comment()));
        assert_eq!(stmt.value(), "select a/*x*/b from t");
    }

    #[test]
    fn test_grouping_preserves_text() {
        for sql in [
            "select * from foo where a = 1",
            "select a, b, /* comment */ c from t -- trailing",
            "select (((",
            "insert into t (a, b) values (1, 2)",
        ] {
            assert_eq!(parse_one(sql).value(), sql, "{sql}");
        }
    }

    #[test]
    fn test_aliased_without_as() {
        let stmt = parse_one("select col1 c1 from tbl t");
        let ident = find_kind(&stmt, GroupKind::Identifier).unwrap();
        assert_eq!(ident.real_name().as_deref(), Some("col1"));
        assert_eq!(ident.alias().as_deref(), Some("c1"));
    }

    #[test]
    fn test_order_keyword_folds_into_identifier() {
        let stmt = parse_one("select * from t order by foo desc");
        let value_of = |k| find_kind(&stmt, k).map(|g: &TokenList| g.value());
        assert_eq!(value_of(GroupKind::Identifier).as_deref(), Some("t"));
        let found = {
            fn all<'a>(l: &'a TokenList, k: GroupKind, out: &mut Vec<&'a TokenList>) {
                for n in &l.tokens {
                    if let Node::Group(g) = n {
                        if g.kind == k {
                            out.push(g);
                        }
                        all(g, k, out);
                    }
                }
            }
            let mut v = Vec::new();
            all(&stmt, GroupKind::Identifier, &mut v);
            v
        };
        assert!(found.iter().any(|g| g.value() == "foo desc"));
    }
}
