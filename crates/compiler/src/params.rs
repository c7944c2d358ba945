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

//! Decoding of the ten-slot `ARGS` descriptor against its scope's local table.
//!
//! The local table lays out one slot per parameter, in descriptor order, followed by the
//! names bound inside destructured parameters, followed by everything else the scope
//! declares. Parameter slots are consumed with a cursor; nested destructuring names are then
//! skipped by count, and what remains is reported as block-local declarations.

use crate::targets::{TargetGroup, TargetStyle};
use arbor_common::{NodeType, TranscodeError};
use arbor_legacy::{KeywordRest, LegacyNode, ParamRest, Params, Shape};
use arbor_var::Symbol;
use tracing::trace;

#[derive(Clone, Debug, PartialEq)]
pub enum RequiredParam<'a> {
    Name(Symbol),
    Group(TargetGroup<'a>),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RestParam {
    /// `None` for an anonymous rest (`*`).
    Splat(Option<Symbol>),
    /// `|a,|`
    ImplicitComma,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OptionalParam<'a> {
    pub name: Symbol,
    pub value: &'a LegacyNode,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeywordParam<'a> {
    pub name: Symbol,
    /// Absent for a required keyword (`a:`).
    pub value: Option<&'a LegacyNode>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KeywordRestParam {
    /// `None` for an anonymous or elided keyword rest.
    Named(Option<Symbol>),
    /// `**nil`
    NoKeywords,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterList<'a> {
    pub requireds: Vec<RequiredParam<'a>>,
    pub optionals: Vec<OptionalParam<'a>>,
    pub rest: Option<RestParam>,
    pub posts: Vec<RequiredParam<'a>>,
    pub keywords: Vec<KeywordParam<'a>>,
    pub keyword_rest: Option<KeywordRestParam>,
    /// `Some(None)` for an anonymous block parameter (`&`).
    pub block: Option<Option<Symbol>>,
    /// Table names left over once every parameter has been accounted for.
    pub block_locals: Vec<Symbol>,
}

impl<'a> ParameterList<'a> {
    /// Decode `args` (an `ARGS` node) against the scope's local `table`. A descriptor with
    /// every slot empty yields `None`: the scope takes no parameters at all.
    pub fn decode(
        table: &[Option<Symbol>],
        args: &'a LegacyNode,
    ) -> Result<Option<Self>, TranscodeError> {
        let Shape::Params(params) = args.expect_kind(&[NodeType::Args])?.shape()? else {
            return Err(args.unexpected("ARGS"));
        };
        if params.is_empty() {
            return Ok(None);
        }
        Decoder {
            table,
            args,
            cursor: 0,
        }
        .decode(&params)
        .map(Some)
    }
}

struct Decoder<'t, 'a> {
    table: &'t [Option<Symbol>],
    args: &'a LegacyNode,
    cursor: usize,
}

impl<'a> Decoder<'_, 'a> {
    fn decode(mut self, params: &Params<'a>) -> Result<ParameterList<'a>, TranscodeError> {
        let mut list = ParameterList::default();

        let pre_slots = self.take(params.pre_num)?;
        let pre_groups = groups(params.pre_init)?;

        for link in chain(params.optionals, NodeType::OptArg)? {
            let Shape::Assign {
                name,
                value: Some(value),
                ..
            } = link.expect_kind(&[NodeType::Dasgn, NodeType::Lasgn])?.shape()?
            else {
                return Err(link.unexpected("optional parameter with a default"));
            };
            self.skip(1)?;
            list.optionals.push(OptionalParam { name, value });
        }

        list.rest = match params.rest {
            ParamRest::Absent => None,
            ParamRest::Named(name) => {
                self.skip(1)?;
                Some(RestParam::Splat(named(name)))
            }
            ParamRest::Anonymous => Some(RestParam::Splat(None)),
            ParamRest::ExcessiveComma => Some(RestParam::ImplicitComma),
        };

        let post_slots = self.take(params.post_num)?;
        let post_groups = groups(params.post_init)?;

        for link in chain(params.keywords, NodeType::KwArg)? {
            let Shape::Assign {
                name,
                value,
                required_keyword,
            } = link.expect_kind(&[NodeType::Dasgn, NodeType::Lasgn])?.shape()?
            else {
                return Err(link.unexpected("keyword parameter"));
            };
            if !required_keyword && value.is_none() {
                return Err(link.unexpected("keyword parameter default"));
            }
            self.skip(1)?;
            list.keywords.push(KeywordParam { name, value });
        }
        self.cursor =
            skip_internal_keyword_slot(self.table, self.cursor, !list.keywords.is_empty());

        list.keyword_rest = match params.keyword_rest {
            KeywordRest::Absent => None,
            KeywordRest::NoKeywords => Some(KeywordRestParam::NoKeywords),
            KeywordRest::Variable(var) => match var.opt_symbol(0)? {
                Some(name) => {
                    self.skip(1)?;
                    Some(KeywordRestParam::Named(named(name)))
                }
                // Elided (`**` forwarded without a name): no slot of its own.
                None => Some(KeywordRestParam::Named(None)),
            },
        };

        if let Some(name) = params.block {
            self.skip(1)?;
            list.block = Some(named(name));
        }

        // The names bound inside destructured parameters follow the parameter slots.
        let destructured: usize = pre_groups
            .iter()
            .chain(post_groups.iter())
            .map(TargetGroup::binding_count)
            .sum();
        self.cursor = (self.cursor + destructured).min(self.table.len());
        list.block_locals = self.table[self.cursor..].iter().flatten().copied().collect();

        list.requireds = fill_slots(pre_slots, pre_groups);
        list.posts = fill_slots(post_slots, post_groups);

        trace!(
            requireds = list.requireds.len(),
            posts = list.posts.len(),
            block_locals = list.block_locals.len(),
            "decoded parameters"
        );
        Ok(list)
    }

    fn take(&mut self, count: usize) -> Result<Vec<Option<Symbol>>, TranscodeError> {
        let end = self.cursor + count;
        let slots = self
            .table
            .get(self.cursor..end)
            .ok_or_else(|| self.args.unexpected("a local table entry for every parameter"))?
            .to_vec();
        self.cursor = end;
        Ok(slots)
    }

    fn skip(&mut self, count: usize) -> Result<(), TranscodeError> {
        self.take(count).map(|_| ())
    }
}

/// Step past the hidden slot the legacy encoder reserves after the keyword parameters. The
/// slot exists only when there are keyword parameters, and is always unnamed; a named entry
/// at the cursor belongs to whatever comes next.
pub fn skip_internal_keyword_slot(
    table: &[Option<Symbol>],
    cursor: usize,
    has_keywords: bool,
) -> usize {
    match table.get(cursor) {
        Some(None) if has_keywords => cursor + 1,
        _ => cursor,
    }
}

/// `*`, `**` and `&` stand for anonymous parameters. They occupy a slot but carry no name.
fn named(name: Symbol) -> Option<Symbol> {
    match name.as_str() {
        "*" | "**" | "&" => None,
        _ => Some(name),
    }
}

/// The bodies of an `OPT_ARG` or `KW_ARG` linked chain, in order.
fn chain(head: Option<&LegacyNode>, kind: NodeType) -> Result<Vec<&LegacyNode>, TranscodeError> {
    let mut bodies = vec![];
    let mut link = head;
    while let Some(node) = link {
        let Shape::ParamLink { body, next } = node.expect_kind(&[kind])?.shape()? else {
            return Err(node.unexpected(kind.to_string()));
        };
        bodies.push(body);
        link = next;
    }
    Ok(bodies)
}

/// A `pre_init`/`post_init` slot: one destructuring, or a `BLOCK` of several.
fn groups(init: Option<&LegacyNode>) -> Result<Vec<TargetGroup<'_>>, TranscodeError> {
    let Some(init) = init else {
        return Ok(vec![]);
    };
    match init.shape()? {
        Shape::Block { statements } => statements
            .into_iter()
            .map(|s| TargetGroup::decompose(s, TargetStyle::Parameter))
            .collect(),
        _ => Ok(vec![TargetGroup::decompose(init, TargetStyle::Parameter)?]),
    }
}

/// Unnamed slots are placeholders for destructured parameters, filled in order. Groups
/// without a placeholder are appended; placeholders without a group are dropped.
fn fill_slots<'a>(
    slots: Vec<Option<Symbol>>,
    groups: Vec<TargetGroup<'a>>,
) -> Vec<RequiredParam<'a>> {
    let mut groups = groups.into_iter();
    let mut params: Vec<_> = slots
        .into_iter()
        .filter_map(|slot| match slot {
            Some(name) => Some(RequiredParam::Name(name)),
            None => groups.next().map(RequiredParam::Group),
        })
        .collect();
    params.extend(groups.map(RequiredParam::Group));
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::{GroupRest, Target};
    use arbor_legacy::builder::*;
    use arbor_legacy::{Child, Sentinel};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn tbl(names: &[Option<&str>]) -> Vec<Option<Symbol>> {
        names.iter().map(|n| n.map(Symbol::mk)).collect()
    }

    fn syms(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|n| Symbol::mk(n)).collect()
    }

    const LOC: Loc = (1, 0, 1, 20);

    #[test_case(&[Some("a"), None, Some("k")], 1, true, 2; "keywords then hidden slot")]
    #[test_case(&[Some("a"), Some("k")], 1, true, 1; "keywords then named slot")]
    #[test_case(&[Some("a"), None], 1, false, 1; "no keywords")]
    #[test_case(&[Some("a")], 1, true, 1; "cursor at end")]
    fn test_skip_internal_keyword_slot(
        names: &[Option<&str>],
        cursor: usize,
        has_keywords: bool,
        expected: usize,
    ) {
        assert_eq!(skip_internal_keyword_slot(&tbl(names), cursor, has_keywords), expected);
    }

    #[test]
    fn test_empty_descriptor() {
        let args = ArgsSlots::default().build(LOC);
        assert_eq!(ParameterList::decode(&[], &args).unwrap(), None);
    }

    /// `def f(a, b = 1, *c, d, e:, f: 2, **g, &h)`
    #[test]
    fn test_every_slot() {
        let table = tbl(&[
            Some("a"),
            Some("b"),
            Some("c"),
            Some("d"),
            Some("e"),
            Some("f"),
            None,
            Some("g"),
            Some("h"),
        ]);
        let opt = param_link(
            NodeType::OptArg,
            lasgn("b", Some(int(1, (1, 13, 1, 14))), (1, 9, 1, 14)),
            None,
            (1, 9, 1, 14),
        );
        let kw = param_link(
            NodeType::KwArg,
            node(
                NodeType::Lasgn,
                vec![sym("e"), special(Sentinel::RequiredKeyword)],
                (1, 23, 1, 25),
            ),
            Some(param_link(
                NodeType::KwArg,
                lasgn("f", Some(int(2, (1, 30, 1, 31))), (1, 27, 1, 31)),
                None,
                (1, 27, 1, 31),
            )),
            (1, 23, 1, 31),
        );
        let args = ArgsSlots {
            pre_num: 1,
            opt: Some(opt),
            first_post: Some("d"),
            post_num: 1,
            rest: sym("c"),
            kw: Some(kw),
            kwrest: node(NodeType::Dvar, vec![sym("g")], (1, 33, 1, 36)).into(),
            block: Some("h"),
            ..Default::default()
        }
        .build(LOC);
        let list = ParameterList::decode(&table, &args).unwrap().unwrap();

        assert_eq!(list.requireds, vec![RequiredParam::Name(Symbol::mk("a"))]);
        assert_eq!(list.optionals.iter().map(|o| o.name).collect::<Vec<_>>(), syms(&["b"]));
        assert_eq!(list.rest, Some(RestParam::Splat(Some(Symbol::mk("c")))));
        assert_eq!(list.posts, vec![RequiredParam::Name(Symbol::mk("d"))]);
        assert_eq!(list.keywords.len(), 2);
        assert!(list.keywords[0].value.is_none());
        assert!(list.keywords[1].value.is_some());
        assert_eq!(list.keyword_rest, Some(KeywordRestParam::Named(Some(Symbol::mk("g")))));
        assert_eq!(list.block, Some(Some(Symbol::mk("h"))));
        assert!(list.block_locals.is_empty());
    }

    /// `|(i, *j, k), l|`
    #[test]
    fn test_destructured_then_plain() {
        let table = tbl(&[None, Some("l"), Some("i"), Some("j"), Some("k")]);
        let group = masgn(
            None,
            Some(list(vec![dasgn("i", None, (1, 5, 1, 6))], (1, 5, 1, 6))),
            postarg(
                dasgn("j", None, (1, 9, 1, 10)).into(),
                list(vec![dasgn("k", None, (1, 12, 1, 13))], (1, 12, 1, 13)),
                (1, 8, 1, 13),
            )
            .into(),
            (1, 4, 1, 14),
        );
        let args = ArgsSlots {
            pre_num: 2,
            pre_init: Some(group),
            ..Default::default()
        }
        .build(LOC);
        let list = ParameterList::decode(&table, &args).unwrap().unwrap();

        assert_eq!(list.requireds.len(), 2);
        let RequiredParam::Group(group) = &list.requireds[0] else {
            panic!("expected a destructured parameter first");
        };
        assert_eq!(group.lefts.len(), 1);
        assert!(matches!(group.lefts[0], Target::Simple(_)));
        assert!(matches!(group.rest, Some(GroupRest::Named(_))));
        assert_eq!(group.rights.len(), 1);
        assert_eq!(list.requireds[1], RequiredParam::Name(Symbol::mk("l")));
        assert!(list.block_locals.is_empty());
    }

    /// `|a; x, y|`
    #[test]
    fn test_block_locals() {
        let table = tbl(&[Some("a"), Some("x"), Some("y")]);
        let args = ArgsSlots {
            pre_num: 1,
            ..Default::default()
        }
        .build(LOC);
        let list = ParameterList::decode(&table, &args).unwrap().unwrap();
        assert_eq!(list.block_locals, syms(&["x", "y"]));
    }

    /// `|a,|`
    #[test]
    fn test_excessive_comma() {
        let table = tbl(&[Some("a")]);
        let args = ArgsSlots {
            pre_num: 1,
            rest: special(Sentinel::ExcessiveComma),
            ..Default::default()
        }
        .build(LOC);
        let list = ParameterList::decode(&table, &args).unwrap().unwrap();
        assert_eq!(list.rest, Some(RestParam::ImplicitComma));
        assert!(list.block_locals.is_empty());
    }

    /// `def f(*, **, &)`
    #[test]
    fn test_anonymous_forms() {
        let table = tbl(&[Some("*"), Some("**"), Some("&")]);
        let args = ArgsSlots {
            rest: sym("*"),
            kwrest: node(NodeType::Dvar, vec![sym("**")], (1, 9, 1, 11)).into(),
            block: Some("&"),
            ..Default::default()
        }
        .build(LOC);
        let list = ParameterList::decode(&table, &args).unwrap().unwrap();
        assert_eq!(list.rest, Some(RestParam::Splat(None)));
        assert_eq!(list.keyword_rest, Some(KeywordRestParam::Named(None)));
        assert_eq!(list.block, Some(None));
        assert!(list.block_locals.is_empty());
    }

    /// `def f(a:, **nil)` and an elided keyword rest, which takes no slot.
    #[test_case(special(Sentinel::NoRestKeyword), KeywordRestParam::NoKeywords; "no keywords")]
    #[test_case(
        node(NodeType::Dvar, vec![Child::Nil], (1, 10, 1, 12)).into(),
        KeywordRestParam::Named(None);
        "elided"
    )]
    fn test_keyword_rest_without_slot(kwrest: Child, expected: KeywordRestParam) {
        let table = tbl(&[Some("a"), None, Some("x")]);
        let kw = param_link(
            NodeType::KwArg,
            node(NodeType::Lasgn, vec![sym("a"), special(Sentinel::RequiredKeyword)], (1, 6, 1, 8)),
            None,
            (1, 6, 1, 8),
        );
        let args = ArgsSlots {
            kw: Some(kw),
            kwrest,
            ..Default::default()
        }
        .build(LOC);
        let list = ParameterList::decode(&table, &args).unwrap().unwrap();
        assert_eq!(list.keyword_rest, Some(expected));
        assert_eq!(list.block_locals, syms(&["x"]));
    }

    #[test]
    fn test_table_too_short() {
        let args = ArgsSlots {
            pre_num: 2,
            ..Default::default()
        }
        .build(LOC);
        let err = ParameterList::decode(&tbl(&[Some("a")]), &args).unwrap_err();
        assert!(matches!(err, TranscodeError::UnexpectedKind { found: NodeType::Args, .. }));
    }

    #[test]
    fn test_optional_without_default() {
        let table = tbl(&[Some("b")]);
        let opt = param_link(NodeType::OptArg, lasgn("b", None, (1, 6, 1, 7)), None, (1, 6, 1, 7));
        let args = ArgsSlots {
            opt: Some(opt),
            ..Default::default()
        }
        .build(LOC);
        assert!(ParameterList::decode(&table, &args).is_err());
    }
}
