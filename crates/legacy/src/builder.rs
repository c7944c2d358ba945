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

//! Terse constructors for legacy trees, for tests and for callers assembling trees by hand.
//!
//! Locations are `(first_line, first_column, last_line, last_column)` tuples.

use crate::{Child, LegacyNode, Sentinel};
use arbor_common::{NodeType, Position};
use arbor_var::{Literal, Symbol};

pub type Loc = (usize, usize, usize, usize);

pub fn pos(loc: Loc) -> Position {
    Position::new(loc.0, loc.1, loc.2, loc.3)
}

pub fn node(kind: NodeType, children: Vec<Child>, loc: Loc) -> LegacyNode {
    LegacyNode::new(kind, children, pos(loc))
}

pub fn sym(name: &str) -> Child {
    Child::Symbol(Symbol::mk(name))
}

pub fn special(sentinel: Sentinel) -> Child {
    Child::Sentinel(sentinel)
}

/// A local table. `None` entries are internal, unnamed slots.
pub fn table(names: &[Option<&str>]) -> Child {
    Child::Table(names.iter().map(|n| n.map(Symbol::mk)).collect())
}

/// A local table with no internal slots.
pub fn names(names: &[&str]) -> Child {
    Child::Table(names.iter().map(|n| Some(Symbol::mk(n))).collect())
}

pub fn scope(
    tbl: Child,
    args: Option<LegacyNode>,
    body: Option<LegacyNode>,
    loc: Loc,
) -> LegacyNode {
    node(NodeType::Scope, vec![tbl, args.into(), body.into()], loc)
}

pub fn block(statements: Vec<LegacyNode>, loc: Loc) -> LegacyNode {
    node(
        NodeType::Block,
        statements.into_iter().map(Child::from).collect(),
        loc,
    )
}

/// A `LIST`, with the trailing `nil` the encoder emits.
pub fn list(elements: Vec<LegacyNode>, loc: Loc) -> LegacyNode {
    let mut children: Vec<Child> = elements.into_iter().map(Child::from).collect();
    children.push(Child::Nil);
    node(NodeType::List, children, loc)
}

pub fn leaf(kind: NodeType, loc: Loc) -> LegacyNode {
    node(kind, vec![], loc)
}

pub fn int(value: i64, loc: Loc) -> LegacyNode {
    node(NodeType::Integer, vec![Literal::Int(value).into()], loc)
}

pub fn float(value: f64, loc: Loc) -> LegacyNode {
    node(NodeType::Float, vec![Literal::Float(value).into()], loc)
}

pub fn string(value: &str, loc: Loc) -> LegacyNode {
    node(NodeType::Str, vec![Literal::Str(value.into()).into()], loc)
}

pub fn symbol(name: &str, loc: Loc) -> LegacyNode {
    node(NodeType::Sym, vec![sym(name)], loc)
}

pub fn regexp(source: &str, options: u32, loc: Loc) -> LegacyNode {
    node(
        NodeType::Regx,
        vec![
            Literal::Regexp {
                source: source.into(),
                options,
            }
            .into(),
        ],
        loc,
    )
}

fn var(kind: NodeType, name: &str, loc: Loc) -> LegacyNode {
    node(kind, vec![sym(name)], loc)
}

pub fn lvar(name: &str, loc: Loc) -> LegacyNode {
    var(NodeType::Lvar, name, loc)
}

pub fn dvar(name: &str, loc: Loc) -> LegacyNode {
    var(NodeType::Dvar, name, loc)
}

pub fn ivar(name: &str, loc: Loc) -> LegacyNode {
    var(NodeType::Ivar, name, loc)
}

pub fn gvar(name: &str, loc: Loc) -> LegacyNode {
    var(NodeType::Gvar, name, loc)
}

pub fn cvar(name: &str, loc: Loc) -> LegacyNode {
    var(NodeType::Cvar, name, loc)
}

pub fn constant(name: &str, loc: Loc) -> LegacyNode {
    var(NodeType::Const, name, loc)
}

pub fn vcall(name: &str, loc: Loc) -> LegacyNode {
    var(NodeType::Vcall, name, loc)
}

/// Any `[vid, value]` assignment: `LASGN`, `DASGN`, `IASGN`, `CVASGN`, `GASGN`, `CDECL`.
pub fn assign(kind: NodeType, name: &str, value: Option<LegacyNode>, loc: Loc) -> LegacyNode {
    node(kind, vec![sym(name), value.into()], loc)
}

pub fn lasgn(name: &str, value: Option<LegacyNode>, loc: Loc) -> LegacyNode {
    assign(NodeType::Lasgn, name, value, loc)
}

pub fn dasgn(name: &str, value: Option<LegacyNode>, loc: Loc) -> LegacyNode {
    assign(NodeType::Dasgn, name, value, loc)
}

pub fn call(receiver: LegacyNode, name: &str, args: Option<LegacyNode>, loc: Loc) -> LegacyNode {
    node(NodeType::Call, vec![receiver.into(), sym(name), args.into()], loc)
}

pub fn opcall(receiver: LegacyNode, name: &str, args: Option<LegacyNode>, loc: Loc) -> LegacyNode {
    node(
        NodeType::Opcall,
        vec![receiver.into(), sym(name), args.into()],
        loc,
    )
}

pub fn fcall(name: &str, args: Option<LegacyNode>, loc: Loc) -> LegacyNode {
    node(NodeType::Fcall, vec![sym(name), args.into()], loc)
}

/// The ten slots of an `ARGS` descriptor.
#[derive(Clone, Debug, Default)]
pub struct ArgsSlots {
    pub pre_num: usize,
    pub pre_init: Option<LegacyNode>,
    pub opt: Option<LegacyNode>,
    pub first_post: Option<&'static str>,
    pub post_num: usize,
    pub post_init: Option<LegacyNode>,
    pub rest: Child,
    pub kw: Option<LegacyNode>,
    pub kwrest: Child,
    pub block: Option<&'static str>,
}

impl ArgsSlots {
    pub fn build(self, loc: Loc) -> LegacyNode {
        node(
            NodeType::Args,
            vec![
                Child::Count(self.pre_num),
                self.pre_init.into(),
                self.opt.into(),
                self.first_post.map(sym).unwrap_or_default(),
                Child::Count(self.post_num),
                self.post_init.into(),
                self.rest,
                self.kw.into(),
                self.kwrest,
                self.block.map(sym).unwrap_or_default(),
            ],
            loc,
        )
    }
}

/// `MASGN [value, head, rest]`.
pub fn masgn(
    value: Option<LegacyNode>,
    head: Option<LegacyNode>,
    rest: Child,
    loc: Loc,
) -> LegacyNode {
    node(NodeType::Masgn, vec![value.into(), head.into(), rest], loc)
}

/// `POSTARG [rest, posts]`.
pub fn postarg(rest: Child, posts: LegacyNode, loc: Loc) -> LegacyNode {
    node(NodeType::Postarg, vec![rest, posts.into()], loc)
}

/// One link of an `OPT_ARG` or `KW_ARG` chain.
pub fn param_link(
    kind: NodeType,
    body: LegacyNode,
    next: Option<LegacyNode>,
    loc: Loc,
) -> LegacyNode {
    node(kind, vec![body.into(), next.into()], loc)
}
