// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use arbor_common::{NodeType, Position, TranscodeError};
use arbor_var::{Literal, Symbol};
use strum::{Display, EnumString};

/// Distinguished marker values the legacy encoder stores in child slots in place of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Sentinel {
    /// Anonymous splat in a destructuring target: `a, * = ...`.
    #[strum(serialize = "NODE_SPECIAL_NO_NAME_REST")]
    NoNameRest,
    /// Trailing comma in block parameters: `|a,|`.
    #[strum(serialize = "NODE_SPECIAL_EXCESSIVE_COMMA")]
    ExcessiveComma,
    /// Keyword parameter without a default: `a:`.
    #[strum(serialize = "NODE_SPECIAL_REQUIRED_KEYWORD")]
    RequiredKeyword,
    /// `**nil` in a parameter list.
    #[strum(serialize = "NODE_SPECIAL_NO_REST_KEYWORD")]
    NoRestKeyword,
}

/// One positional child of a legacy node.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Child {
    #[default]
    Nil,
    Node(Box<LegacyNode>),
    Symbol(Symbol),
    Literal(Literal),
    Sentinel(Sentinel),
    Bool(bool),
    /// A plain count, e.g. the number of required parameters in an `ARGS` descriptor.
    Count(usize),
    /// A scope's local table. `None` entries are internal, unnamed slots.
    Table(Vec<Option<Symbol>>),
}

impl Child {
    fn describe(&self) -> &'static str {
        match self {
            Child::Nil => "nil",
            Child::Node(_) => "node",
            Child::Symbol(_) => "symbol",
            Child::Literal(_) => "literal",
            Child::Sentinel(_) => "sentinel",
            Child::Bool(_) => "boolean",
            Child::Count(_) => "count",
            Child::Table(_) => "local table",
        }
    }
}

impl From<LegacyNode> for Child {
    fn from(node: LegacyNode) -> Self {
        Child::Node(Box::new(node))
    }
}

impl From<Option<LegacyNode>> for Child {
    fn from(node: Option<LegacyNode>) -> Self {
        match node {
            Some(node) => Child::Node(Box::new(node)),
            None => Child::Nil,
        }
    }
}

impl From<Symbol> for Child {
    fn from(sym: Symbol) -> Self {
        Child::Symbol(sym)
    }
}

impl From<Literal> for Child {
    fn from(lit: Literal) -> Self {
        Child::Literal(lit)
    }
}

impl From<Sentinel> for Child {
    fn from(sentinel: Sentinel) -> Self {
        Child::Sentinel(sentinel)
    }
}

impl From<bool> for Child {
    fn from(b: bool) -> Self {
        Child::Bool(b)
    }
}

static NIL: Child = Child::Nil;

/// A node of the legacy tree. Read-only once built.
#[derive(Clone, Debug, PartialEq)]
pub struct LegacyNode {
    pub kind: NodeType,
    pub children: Vec<Child>,
    pub position: Position,
}

impl LegacyNode {
    /// Build a node. The `nil` terminator the legacy encoder appends to `LIST` children is
    /// dropped here, so no consumer has to account for it.
    pub fn new(kind: NodeType, mut children: Vec<Child>, position: Position) -> Self {
        if kind == NodeType::List && matches!(children.last(), Some(Child::Nil)) {
            children.pop();
        }
        Self {
            kind,
            children,
            position,
        }
    }

    pub fn child(&self, index: usize) -> &Child {
        self.children.get(index).unwrap_or(&NIL)
    }

    pub fn unexpected(&self, expected: impl Into<String>) -> TranscodeError {
        TranscodeError::unexpected(expected, self.kind, self.position)
    }

    pub fn not_supported(&self) -> TranscodeError {
        TranscodeError::not_supported(self.kind, self.position)
    }

    fn bad_slot(&self, index: usize, wanted: &str) -> TranscodeError {
        self.unexpected(format!(
            "{wanted} in child {index} (found {})",
            self.child(index).describe()
        ))
    }

    /// Fails unless this node is one of `kinds`.
    pub fn expect_kind(&self, kinds: &[NodeType]) -> Result<&Self, TranscodeError> {
        if kinds.contains(&self.kind) {
            return Ok(self);
        }
        let names: Vec<&'static str> = kinds.iter().map(|k| k.into()).collect();
        Err(self.unexpected(names.join(" or ")))
    }

    pub fn opt_node(&self, index: usize) -> Result<Option<&LegacyNode>, TranscodeError> {
        match self.child(index) {
            Child::Nil => Ok(None),
            Child::Node(node) => Ok(Some(node)),
            _ => Err(self.bad_slot(index, "node")),
        }
    }

    pub fn node(&self, index: usize) -> Result<&LegacyNode, TranscodeError> {
        match self.child(index) {
            Child::Node(node) => Ok(node),
            _ => Err(self.bad_slot(index, "node")),
        }
    }

    pub fn symbol(&self, index: usize) -> Result<Symbol, TranscodeError> {
        match self.child(index) {
            Child::Symbol(sym) => Ok(*sym),
            _ => Err(self.bad_slot(index, "symbol")),
        }
    }

    pub fn opt_symbol(&self, index: usize) -> Result<Option<Symbol>, TranscodeError> {
        match self.child(index) {
            Child::Nil => Ok(None),
            Child::Symbol(sym) => Ok(Some(*sym)),
            _ => Err(self.bad_slot(index, "symbol")),
        }
    }

    pub fn literal(&self, index: usize) -> Result<&Literal, TranscodeError> {
        match self.child(index) {
            Child::Literal(lit) => Ok(lit),
            _ => Err(self.bad_slot(index, "literal")),
        }
    }

    pub fn sentinel(&self, index: usize) -> Option<Sentinel> {
        match self.child(index) {
            Child::Sentinel(sentinel) => Some(*sentinel),
            _ => None,
        }
    }

    pub fn flag(&self, index: usize) -> Result<bool, TranscodeError> {
        match self.child(index) {
            Child::Bool(b) => Ok(*b),
            _ => Err(self.bad_slot(index, "boolean")),
        }
    }

    /// A non-negative integer slot. Encoders differ on whether these are tagged counts or plain
    /// integer literals; both are accepted.
    pub fn count(&self, index: usize) -> Result<usize, TranscodeError> {
        match self.child(index) {
            Child::Count(n) => Ok(*n),
            Child::Literal(Literal::Int(n)) if *n >= 0 => Ok(*n as usize),
            _ => Err(self.bad_slot(index, "count")),
        }
    }

    pub fn table(&self, index: usize) -> Result<&[Option<Symbol>], TranscodeError> {
        match self.child(index) {
            Child::Table(table) => Ok(table),
            Child::Nil => Ok(&[]),
            _ => Err(self.bad_slot(index, "local table")),
        }
    }

    /// Every child from `from` onward, each required to be a node.
    pub fn nodes_from(&self, from: usize) -> Result<Vec<&LegacyNode>, TranscodeError> {
        (from..self.children.len()).map(|i| self.node(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_list_terminator_dropped() {
        let list = node(
            NodeType::List,
            vec![int(1, (1, 1, 1, 2)).into(), Child::Nil],
            (1, 0, 1, 3),
        );
        assert_eq!(list.children.len(), 1);
    }

    #[test]
    fn test_only_one_terminator_dropped() {
        // `{**h}` encodes its pairs as [nil, h, nil]; the leading nil key must survive.
        let list = node(
            NodeType::List,
            vec![Child::Nil, lvar("h", (1, 3, 1, 4)).into(), Child::Nil],
            (1, 0, 1, 5),
        );
        assert_eq!(list.children.len(), 2);
        assert_eq!(list.child(0), &Child::Nil);
    }

    #[test]
    fn test_slot_type_errors_are_unexpected_kind() {
        let call = vcall("foo", (1, 0, 1, 3));
        let err = call.node(0).unwrap_err();
        assert_eq!(err.kind(), NodeType::Vcall);
        assert!(matches!(err, TranscodeError::UnexpectedKind { .. }));
        assert!(err.to_string().contains("node in child 0 (found symbol)"));
    }

    #[test]
    fn test_out_of_range_children_read_as_nil() {
        let call = vcall("foo", (1, 0, 1, 3));
        assert_eq!(call.opt_node(5), Ok(None));
    }

    #[test]
    fn test_expect_kind_lists_alternatives() {
        let call = vcall("foo", (1, 0, 1, 3));
        let err = call
            .expect_kind(&[NodeType::Lasgn, NodeType::Dasgn])
            .unwrap_err();
        assert!(err.to_string().starts_with("LASGN or DASGN expected"));
    }

    #[test]
    fn test_sentinel_names() {
        assert_eq!(
            Sentinel::from_str("NODE_SPECIAL_NO_NAME_REST"),
            Ok(Sentinel::NoNameRest)
        );
        assert_eq!(
            Sentinel::RequiredKeyword.to_string(),
            "NODE_SPECIAL_REQUIRED_KEYWORD"
        );
    }
}
