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

//! Flattening of the legacy argument-list encodings.
//!
//! A call's arguments arrive as a flat `LIST`, or as a nest of `ARGSCAT` (prefix plus splat),
//! `ARGSPUSH` (splat-bearing prefix plus one positional), bare `SPLAT`, and `BLOCK_PASS`
//! (prefix plus `&blk`). They are unwrapped here, outermost last, into one ordered sequence.

use arbor_common::{NodeType, TranscodeError};
use arbor_legacy::{LegacyNode, Shape};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ArgumentEntry<'a> {
    Positional(&'a LegacyNode),
    /// `value` is the splatted expression. `splat` is the `SPLAT` node that wrapped it, when
    /// there was one; the tail of an `ARGSCAT` is splatted without a node of its own.
    Splat {
        value: &'a LegacyNode,
        splat: Option<&'a LegacyNode>,
    },
    /// `&blk`; `value` is absent for an anonymous block forward (`f(&)`).
    BlockArgument {
        value: Option<&'a LegacyNode>,
        pass: &'a LegacyNode,
    },
}

impl ArgumentEntry<'_> {
    pub fn is_splat(&self) -> bool {
        matches!(self, ArgumentEntry::Splat { .. })
    }
}

/// The normalized argument list. A block argument, if any, is always the last entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArgumentList<'a> {
    pub entries: Vec<ArgumentEntry<'a>>,
}

impl<'a> ArgumentList<'a> {
    pub fn normalize(args: &'a LegacyNode) -> Result<Self, TranscodeError> {
        let mut entries = vec![];
        push_entries(args, &mut entries, true)?;
        Ok(Self { entries })
    }

    /// Split off the block argument, which travels in the call's `block` field rather than
    /// among its arguments.
    pub fn split_block(mut self) -> (Vec<ArgumentEntry<'a>>, Option<ArgumentEntry<'a>>) {
        let block = match self.entries.last() {
            Some(ArgumentEntry::BlockArgument { .. }) => self.entries.pop(),
            _ => None,
        };
        (self.entries, block)
    }

    pub fn splat_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_splat()).count()
    }
}

fn push_entries<'a>(
    node: &'a LegacyNode,
    entries: &mut Vec<ArgumentEntry<'a>>,
    outermost: bool,
) -> Result<(), TranscodeError> {
    match (node.kind, node.shape()?) {
        (NodeType::List | NodeType::Zlist, Shape::List { elements }) => {
            for element in elements {
                match (element.kind, element.shape()?) {
                    (NodeType::Splat, Shape::Wrapper { body: Some(value) }) => {
                        entries.push(ArgumentEntry::Splat {
                            value,
                            splat: Some(element),
                        })
                    }
                    _ => entries.push(ArgumentEntry::Positional(element)),
                }
            }
        }
        (NodeType::Splat, Shape::Wrapper { body }) => {
            let value = body.ok_or_else(|| node.unexpected("a splatted expression"))?;
            entries.push(ArgumentEntry::Splat {
                value,
                splat: Some(node),
            });
        }
        (NodeType::Argscat, Shape::Pair { left, right }) => {
            if let Some(left) = left {
                push_entries(left, entries, false)?;
            }
            let right = right.ok_or_else(|| node.unexpected("a splat tail"))?;
            match right.kind {
                // `f(*a, b, c)`: the tail is a plain list following the splat.
                NodeType::List => push_entries(right, entries, false)?,
                _ => entries.push(ArgumentEntry::Splat {
                    value: right,
                    splat: None,
                }),
            }
        }
        (NodeType::Argspush, Shape::Pair { left, right }) => {
            if let Some(left) = left {
                push_entries(left, entries, false)?;
            }
            let right = right.ok_or_else(|| node.unexpected("a pushed argument"))?;
            entries.push(ArgumentEntry::Positional(right));
        }
        (NodeType::BlockPass, Shape::Pair { left, right }) if outermost => {
            if let Some(left) = left {
                push_entries(left, entries, false)?;
            }
            entries.push(ArgumentEntry::BlockArgument {
                value: right,
                pass: node,
            });
        }
        _ => return Err(node.unexpected("argument list")),
    }
    Ok(())
}
