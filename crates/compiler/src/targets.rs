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

//! Decomposition of nested destructuring (`MASGN`) into lefts, rest and rights.

use arbor_common::{NodeType, TranscodeError};
use arbor_legacy::{LegacyNode, RestSlot, Shape};

/// What the decomposed targets will become: parameters (`|(a, b)|`, `def f((a, b))`) bind
/// only plain locals, while assignments (`a, @b = ...`, `for a, b in ...`) accept any simple
/// variable target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetStyle {
    Parameter,
    Assignment,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Target<'a> {
    /// A simple-assignment-shaped node with its value slot empty.
    Simple(&'a LegacyNode),
    Group(TargetGroup<'a>),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GroupRest<'a> {
    Named(&'a LegacyNode),
    Anonymous,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TargetGroup<'a> {
    pub node: &'a LegacyNode,
    pub lefts: Vec<Target<'a>>,
    pub rest: Option<GroupRest<'a>>,
    pub rights: Vec<Target<'a>>,
}

impl<'a> TargetGroup<'a> {
    pub fn decompose(node: &'a LegacyNode, style: TargetStyle) -> Result<Self, TranscodeError> {
        let Shape::MultiAssign {
            head, rest, posts, ..
        } = node.expect_kind(&[NodeType::Masgn])?.shape()?
        else {
            return Err(node.unexpected("MASGN"));
        };

        let lefts = match head {
            Some(head) => targets(head, style)?,
            None => vec![],
        };
        let rest = match rest {
            RestSlot::Absent => None,
            RestSlot::Anonymous => Some(GroupRest::Anonymous),
            RestSlot::Target(target) => Some(GroupRest::Named(simple(target, style)?)),
        };
        let rights = match posts {
            Some(posts) => targets(posts, style)?,
            None => vec![],
        };
        Ok(Self {
            node,
            lefts,
            rest,
            rights,
        })
    }

    /// Number of names this group binds, nested groups included. An anonymous rest binds
    /// nothing.
    pub fn binding_count(&self) -> usize {
        let count = |targets: &[Target<'_>]| -> usize {
            targets
                .iter()
                .map(|t| match t {
                    Target::Simple(_) => 1,
                    Target::Group(group) => group.binding_count(),
                })
                .sum()
        };
        let rest = match self.rest {
            Some(GroupRest::Named(_)) => 1,
            _ => 0,
        };
        count(&self.lefts) + rest + count(&self.rights)
    }
}

fn targets<'a>(
    list: &'a LegacyNode,
    style: TargetStyle,
) -> Result<Vec<Target<'a>>, TranscodeError> {
    let Shape::List { elements } = list.expect_kind(&[NodeType::List])?.shape()? else {
        return Err(list.unexpected("LIST"));
    };
    elements
        .into_iter()
        .map(|element| match element.kind {
            NodeType::Masgn => TargetGroup::decompose(element, style).map(Target::Group),
            _ => simple(element, style).map(Target::Simple),
        })
        .collect()
}

fn simple(node: &LegacyNode, style: TargetStyle) -> Result<&LegacyNode, TranscodeError> {
    match style {
        TargetStyle::Parameter => node.expect_kind(&[NodeType::Dasgn, NodeType::Lasgn]),
        TargetStyle::Assignment if node.kind.is_simple_assignment() => Ok(node),
        TargetStyle::Assignment if node.kind == NodeType::Attrasgn => Err(node.not_supported()),
        TargetStyle::Assignment => Err(node.unexpected("assignment target")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_legacy::builder::*;
    use arbor_legacy::{Child, Sentinel};
    use pretty_assertions::assert_eq;

    fn names(targets: &[Target<'_>]) -> Vec<String> {
        targets
            .iter()
            .map(|t| match t {
                Target::Simple(n) => n.symbol(0).map(|s| s.as_string()).unwrap_or_default(),
                Target::Group(g) => format!("({})", names(&g.lefts).join(", ")),
            })
            .collect()
    }

    /// `(i, *j, k)` as a block parameter.
    #[test]
    fn test_rest_and_rights() {
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
        let decomposed = TargetGroup::decompose(&group, TargetStyle::Parameter).unwrap();
        assert_eq!(names(&decomposed.lefts), vec!["i"]);
        assert!(matches!(
            decomposed.rest,
            Some(GroupRest::Named(n)) if n.symbol(0).unwrap().as_str() == "j"
        ));
        assert_eq!(names(&decomposed.rights), vec!["k"]);
        assert_eq!(decomposed.binding_count(), 3);
    }

    /// `((a, b), *)`
    #[test]
    fn test_nested_group_and_anonymous_rest() {
        let inner = masgn(
            None,
            Some(list(
                vec![dasgn("a", None, (1, 6, 1, 7)), dasgn("b", None, (1, 9, 1, 10))],
                (1, 6, 1, 10),
            )),
            Child::Nil,
            (1, 5, 1, 11),
        );
        let outer = masgn(
            None,
            Some(list(vec![inner], (1, 5, 1, 11))),
            Child::Sentinel(Sentinel::NoNameRest),
            (1, 4, 1, 15),
        );
        let decomposed = TargetGroup::decompose(&outer, TargetStyle::Parameter).unwrap();
        assert_eq!(names(&decomposed.lefts), vec!["(a, b)"]);
        assert_eq!(decomposed.rest, Some(GroupRest::Anonymous));
        assert!(decomposed.rights.is_empty());
        assert_eq!(decomposed.binding_count(), 2);
    }

    #[test]
    fn test_assignment_style_accepts_any_variable() {
        let group = masgn(
            None,
            Some(list(
                vec![
                    assign(NodeType::Iasgn, "@a", None, (1, 0, 1, 2)),
                    assign(NodeType::Gasgn, "$b", None, (1, 4, 1, 6)),
                ],
                (1, 0, 1, 6),
            )),
            Child::Nil,
            (1, 0, 1, 6),
        );
        assert!(TargetGroup::decompose(&group, TargetStyle::Assignment).is_ok());
        assert!(matches!(
            TargetGroup::decompose(&group, TargetStyle::Parameter),
            Err(TranscodeError::UnexpectedKind {
                found: NodeType::Iasgn,
                ..
            })
        ));
    }

    #[test]
    fn test_attribute_target_not_supported() {
        let attr = node(
            NodeType::Attrasgn,
            vec![vcall("a", (1, 0, 1, 1)).into(), sym("b="), Child::Nil],
            (1, 0, 1, 3),
        );
        let group = masgn(None, Some(list(vec![attr], (1, 0, 1, 3))), Child::Nil, (1, 0, 1, 3));
        assert!(matches!(
            TargetGroup::decompose(&group, TargetStyle::Assignment),
            Err(TranscodeError::NotSupportedKind {
                kind: NodeType::Attrasgn,
                ..
            })
        ));
    }

    #[test]
    fn test_requires_masgn() {
        let err =
            TargetGroup::decompose(&vcall("a", (1, 0, 1, 1)), TargetStyle::Parameter).unwrap_err();
        assert!(matches!(err, TranscodeError::UnexpectedKind { found: NodeType::Vcall, .. }));
    }
}
