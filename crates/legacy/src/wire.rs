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

//! JSON wire form of the legacy tree, as dumped by the external legacy parser.
//!
//! ```json
//! {"type": "FCALL", "children": [{"sym": "puts"}, {"type": "LIST", ...}],
//!  "first_lineno": 1, "first_column": 0, "last_lineno": 1, "last_column": 6}
//! ```

use crate::{Child, LegacyNode, Sentinel};
use arbor_common::{NodeType, Position};
use arbor_var::{Literal, Symbol};
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed legacy tree: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown special value {0}")]
    UnknownSentinel(String),
}

#[derive(Deserialize)]
struct WireNode {
    #[serde(rename = "type")]
    kind: NodeType,
    #[serde(default)]
    children: Vec<Option<WireChild>>,
    first_lineno: usize,
    first_column: usize,
    last_lineno: usize,
    last_column: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireChild {
    Bool(bool),
    Node(Box<WireNode>),
    Atom(WireAtom),
    Literal(Literal),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum WireAtom {
    Sym(Symbol),
    Special(String),
    Table(Vec<Option<Symbol>>),
    Count(usize),
}

impl TryFrom<WireNode> for LegacyNode {
    type Error = DecodeError;

    fn try_from(wire: WireNode) -> Result<Self, Self::Error> {
        let children = wire
            .children
            .into_iter()
            .map(|child| match child {
                None => Ok(Child::Nil),
                Some(child) => child.try_into(),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LegacyNode::new(
            wire.kind,
            children,
            Position::new(
                wire.first_lineno,
                wire.first_column,
                wire.last_lineno,
                wire.last_column,
            ),
        ))
    }
}

impl TryFrom<WireChild> for Child {
    type Error = DecodeError;

    fn try_from(wire: WireChild) -> Result<Self, Self::Error> {
        Ok(match wire {
            WireChild::Bool(b) => Child::Bool(b),
            WireChild::Node(node) => Child::Node(Box::new((*node).try_into()?)),
            WireChild::Literal(lit) => Child::Literal(lit),
            WireChild::Atom(WireAtom::Sym(sym)) => Child::Symbol(sym),
            WireChild::Atom(WireAtom::Table(table)) => Child::Table(table),
            WireChild::Atom(WireAtom::Count(n)) => Child::Count(n),
            WireChild::Atom(WireAtom::Special(name)) => Child::Sentinel(
                Sentinel::from_str(&name).map_err(|_| DecodeError::UnknownSentinel(name))?,
            ),
        })
    }
}

/// Decode a legacy tree from its JSON wire form.
pub fn from_json(text: &str) -> Result<LegacyNode, DecodeError> {
    let wire: WireNode = serde_json::from_str(text)?;
    wire.try_into()
}

pub fn from_slice(bytes: &[u8]) -> Result<LegacyNode, DecodeError> {
    let wire: WireNode = serde_json::from_slice(bytes)?;
    wire.try_into()
}
