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

//! Typed views over legacy nodes.
//!
//! Legacy children are untyped positional tuples. `LegacyNode::shape` decodes them once into a
//! named-field variant, so consumers pattern-match on meaning instead of indexing slots. Slot
//! type errors surface here as `UnexpectedKind`.

use crate::{Child, LegacyNode, Sentinel};
use arbor_common::{NodeType, TranscodeError};
use arbor_var::{Literal, Symbol};

/// The splat slot of a destructuring target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RestSlot<'a> {
    Absent,
    /// `a, * = ...`
    Anonymous,
    /// `a, *b = ...`; the node is the assignment-shaped target for `b`.
    Target(&'a LegacyNode),
}

/// The rest slot of a parameter descriptor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParamRest {
    Absent,
    Named(Symbol),
    Anonymous,
    /// `|a,|`: a trailing comma, not a real rest parameter.
    ExcessiveComma,
}

/// The keyword-rest slot of a parameter descriptor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KeywordRest<'a> {
    Absent,
    /// A `DVAR` whose name is absent when the keyword rest is elided.
    Variable(&'a LegacyNode),
    /// `**nil`
    NoKeywords,
}

/// The decoded `ARGS` descriptor. `first_post` is carried for completeness; the post count is
/// what drives decoding.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Params<'a> {
    pub pre_num: usize,
    pub pre_init: Option<&'a LegacyNode>,
    pub optionals: Option<&'a LegacyNode>,
    pub first_post: Option<Symbol>,
    pub post_num: usize,
    pub post_init: Option<&'a LegacyNode>,
    pub rest: ParamRest,
    pub keywords: Option<&'a LegacyNode>,
    pub keyword_rest: KeywordRest<'a>,
    pub block: Option<Symbol>,
}

impl Params<'_> {
    /// `(0, nil, nil, nil, 0, nil, nil, nil, nil, nil)`: the scope takes no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.pre_num == 0
            && self.pre_init.is_none()
            && self.optionals.is_none()
            && self.first_post.is_none()
            && self.post_num == 0
            && self.post_init.is_none()
            && self.rest == ParamRest::Absent
            && self.keywords.is_none()
            && self.keyword_rest == KeywordRest::Absent
            && self.block.is_none()
    }
}

/// A name operand that is either a node (`SYM`, `DSYM`) or a bare symbol.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NameRef<'a> {
    Node(&'a LegacyNode),
    Symbol(Symbol),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape<'a> {
    /// `SCOPE`
    Scope {
        table: &'a [Option<Symbol>],
        args: Option<&'a LegacyNode>,
        body: Option<&'a LegacyNode>,
    },
    /// `BLOCK`
    Block { statements: Vec<&'a LegacyNode> },
    /// `IF`, `UNLESS`
    Conditional {
        condition: &'a LegacyNode,
        body: Option<&'a LegacyNode>,
        otherwise: Option<&'a LegacyNode>,
    },
    /// `CASE`, `CASE2`
    Case {
        subject: Option<&'a LegacyNode>,
        clauses: Option<&'a LegacyNode>,
    },
    /// `WHEN`; `next` is the following `WHEN`, or the else body.
    When {
        conditions: Option<&'a LegacyNode>,
        body: Option<&'a LegacyNode>,
        next: Option<&'a LegacyNode>,
    },
    /// `WHILE`, `UNTIL`
    Loop {
        condition: &'a LegacyNode,
        body: Option<&'a LegacyNode>,
        /// `begin ... end while cond`: the body runs once before the first test.
        post_condition: bool,
    },
    /// `ITER`
    Iter {
        call: &'a LegacyNode,
        scope: &'a LegacyNode,
    },
    /// `FOR`
    For {
        collection: &'a LegacyNode,
        scope: &'a LegacyNode,
    },
    /// `BREAK`, `NEXT`, `RETURN`
    Jump { value: Option<&'a LegacyNode> },
    /// `BEGIN`
    Begin { body: Option<&'a LegacyNode> },
    /// `RESCUE`
    Rescue {
        body: Option<&'a LegacyNode>,
        clause: Option<&'a LegacyNode>,
        otherwise: Option<&'a LegacyNode>,
    },
    /// `RESBODY`
    RescueClause {
        exceptions: Option<&'a LegacyNode>,
        body: Option<&'a LegacyNode>,
        next: Option<&'a LegacyNode>,
    },
    /// `ENSURE`
    Ensure {
        body: Option<&'a LegacyNode>,
        ensure: Option<&'a LegacyNode>,
    },
    /// `AND`, `OR`, `DOT2`, `DOT3`, `FLIP2`, `FLIP3`, `ARGSCAT`, `ARGSPUSH`, `BLOCK_PASS`
    Pair {
        left: Option<&'a LegacyNode>,
        right: Option<&'a LegacyNode>,
    },
    /// `MASGN`. A `POSTARG` in the rest slot is resolved into `rest` and `posts` here.
    MultiAssign {
        value: Option<&'a LegacyNode>,
        head: Option<&'a LegacyNode>,
        rest: RestSlot<'a>,
        posts: Option<&'a LegacyNode>,
    },
    /// `LASGN`, `DASGN`, `IASGN`, `CVASGN`, `GASGN`, and `CDECL` with a bare name.
    Assign {
        name: Symbol,
        value: Option<&'a LegacyNode>,
        /// The value slot holds the required-keyword marker (keyword parameters only).
        required_keyword: bool,
    },
    /// `CDECL` on a scoped path: `A::B = 1`.
    ConstPathAssign {
        path: &'a LegacyNode,
        name: Symbol,
        value: Option<&'a LegacyNode>,
    },
    /// `OP_ASGN1`: `recv[index] op= value`
    IndexOpAssign {
        receiver: &'a LegacyNode,
        operator: Symbol,
        index: Option<&'a LegacyNode>,
        value: &'a LegacyNode,
    },
    /// `OP_ASGN2`: `recv.name op= value`
    AttrOpAssign {
        receiver: &'a LegacyNode,
        safe_navigation: bool,
        name: Symbol,
        operator: Symbol,
        value: &'a LegacyNode,
    },
    /// `OP_ASGN_AND`, `OP_ASGN_OR`: `read` is the current value, `assignment` the write.
    ConditionalAssign {
        read: &'a LegacyNode,
        assignment: &'a LegacyNode,
    },
    /// `OP_CDECL`: `A::B op= value`
    ConstOpAssign {
        path: &'a LegacyNode,
        operator: Symbol,
        value: &'a LegacyNode,
    },
    /// `CALL`, `OPCALL`, `QCALL`, `FCALL`, `VCALL`, `ATTRASGN`
    Call {
        receiver: Option<&'a LegacyNode>,
        name: Symbol,
        args: Option<&'a LegacyNode>,
    },
    /// `SUPER`, `YIELD`
    Invoke { args: Option<&'a LegacyNode> },
    /// `LIST`, `ZLIST`
    List { elements: Vec<&'a LegacyNode> },
    /// `HASH`; `pairs` is a `LIST` of alternating keys and values.
    Hash { pairs: Option<&'a LegacyNode> },
    /// `LVAR`, `DVAR`, `IVAR`, `GVAR`, `CVAR`, `CONST`, `NTH_REF`, `BACK_REF`
    Variable { name: Symbol },
    /// `INTEGER`, `FLOAT`, `RATIONAL`, `IMAGINARY`, `STR`, `XSTR`, `REGX`, `MATCH`, `FILE`
    Literal { value: &'a Literal },
    /// `SYM`
    Symbol { name: Symbol },
    /// `DSTR`, `DXSTR`, `DSYM`, `DREGX`
    Interpolation {
        leading: Option<&'a str>,
        head: Option<&'a LegacyNode>,
        tail: Option<&'a LegacyNode>,
        options: u32,
    },
    /// `EVSTR`, `ONCE`, `DEFINED`, `SPLAT`, `POSTEXE`, `LAMBDA`
    Wrapper { body: Option<&'a LegacyNode> },
    /// `MATCH2` (`/re/ =~ value`), `MATCH3` (`value =~ /re/`)
    Match {
        regexp: &'a LegacyNode,
        value: &'a LegacyNode,
        captures: Option<&'a LegacyNode>,
    },
    /// `DEFN`, `DEFS`
    Def {
        receiver: Option<&'a LegacyNode>,
        name: Symbol,
        scope: &'a LegacyNode,
    },
    /// `ALIAS`
    Alias {
        new_name: &'a LegacyNode,
        old_name: &'a LegacyNode,
    },
    /// `VALIAS`
    GlobalAlias { new_name: Symbol, old_name: Symbol },
    /// `UNDEF`
    Undef { names: Vec<NameRef<'a>> },
    /// `CLASS`
    Class {
        path: &'a LegacyNode,
        superclass: Option<&'a LegacyNode>,
        scope: &'a LegacyNode,
    },
    /// `MODULE`
    Module {
        path: &'a LegacyNode,
        scope: &'a LegacyNode,
    },
    /// `SCLASS`
    SingletonClass {
        receiver: &'a LegacyNode,
        scope: &'a LegacyNode,
    },
    /// `COLON2`, `COLON3` (the latter never has a parent).
    Colon {
        parent: Option<&'a LegacyNode>,
        name: Symbol,
    },
    /// `ARGS`
    Params(Params<'a>),
    /// `OPT_ARG`, `KW_ARG`: one link of a parameter chain.
    ParamLink {
        body: &'a LegacyNode,
        next: Option<&'a LegacyNode>,
    },
    /// `POSTARG`, when found outside a `MASGN`.
    PostArg {
        rest: RestSlot<'a>,
        posts: &'a LegacyNode,
    },
    /// `SELF`, `NIL`, `TRUE`, `FALSE`, `REDO`, `RETRY`, `ZSUPER`, `ERRINFO`, `LINE`, `ENCODING`
    Leaf,
    /// Kinds with no canonical mapping: pattern matching, `FOR_MASGN`, `ERROR`, `ARGS_AUX`.
    Unsupported,
}

impl LegacyNode {
    pub fn shape(&self) -> Result<Shape<'_>, TranscodeError> {
        use NodeType::*;

        let shape = match self.kind {
            Scope => Shape::Scope {
                table: self.table(0)?,
                args: self.opt_node(1)?,
                body: self.opt_node(2)?,
            },
            Block => Shape::Block {
                statements: self.nodes_from(0)?,
            },
            If | Unless => Shape::Conditional {
                condition: self.node(0)?,
                body: self.opt_node(1)?,
                otherwise: self.opt_node(2)?,
            },
            Case | Case2 => Shape::Case {
                subject: self.opt_node(0)?,
                clauses: self.opt_node(1)?,
            },
            When => Shape::When {
                conditions: self.opt_node(0)?,
                body: self.opt_node(1)?,
                next: self.opt_node(2)?,
            },
            While | Until => Shape::Loop {
                condition: self.node(0)?,
                body: self.opt_node(1)?,
                post_condition: !self.flag(2)?,
            },
            Iter => Shape::Iter {
                call: self.node(0)?,
                scope: self.node(1)?,
            },
            For => Shape::For {
                collection: self.node(0)?,
                scope: self.node(1)?,
            },
            Break | Next | Return => Shape::Jump {
                value: self.opt_node(0)?,
            },
            Begin => Shape::Begin {
                body: self.opt_node(0)?,
            },
            Rescue => Shape::Rescue {
                body: self.opt_node(0)?,
                clause: self.opt_node(1)?,
                otherwise: self.opt_node(2)?,
            },
            Resbody => Shape::RescueClause {
                exceptions: self.opt_node(0)?,
                body: self.opt_node(1)?,
                next: self.opt_node(2)?,
            },
            Ensure => Shape::Ensure {
                body: self.opt_node(0)?,
                ensure: self.opt_node(1)?,
            },
            And | Or | Dot2 | Dot3 | Flip2 | Flip3 | Argscat | Argspush | BlockPass => Shape::Pair {
                left: self.opt_node(0)?,
                right: self.opt_node(1)?,
            },
            Masgn => self.multi_assign()?,
            Lasgn | Dasgn | Iasgn | Cvasgn | Gasgn => self.assign()?,
            Cdecl => match self.child(0) {
                Child::Node(path) => Shape::ConstPathAssign {
                    path,
                    name: self.symbol(1)?,
                    value: self.opt_node(2)?,
                },
                _ => self.assign()?,
            },
            OpAsgn1 => Shape::IndexOpAssign {
                receiver: self.node(0)?,
                operator: self.symbol(1)?,
                index: self.opt_node(2)?,
                value: self.node(3)?,
            },
            OpAsgn2 => Shape::AttrOpAssign {
                receiver: self.node(0)?,
                safe_navigation: self.flag(1)?,
                name: self.symbol(2)?,
                operator: self.symbol(3)?,
                value: self.node(4)?,
            },
            OpAsgnAnd | OpAsgnOr => Shape::ConditionalAssign {
                read: self.node(0)?,
                assignment: self.node(2)?,
            },
            OpCdecl => Shape::ConstOpAssign {
                path: self.node(0)?,
                operator: self.symbol(1)?,
                value: self.node(2)?,
            },
            Call | Opcall | Qcall | Attrasgn => Shape::Call {
                receiver: Some(self.node(0)?),
                name: self.symbol(1)?,
                args: self.opt_node(2)?,
            },
            Fcall => Shape::Call {
                receiver: None,
                name: self.symbol(0)?,
                args: self.opt_node(1)?,
            },
            Vcall => Shape::Call {
                receiver: None,
                name: self.symbol(0)?,
                args: None,
            },
            Super | Yield => Shape::Invoke {
                args: self.opt_node(0)?,
            },
            List => Shape::List {
                elements: self.nodes_from(0)?,
            },
            Zlist => Shape::List { elements: vec![] },
            Hash => Shape::Hash {
                pairs: self.opt_node(0)?,
            },
            Lvar | Dvar | Ivar | Gvar | Cvar | Const | NthRef | BackRef => Shape::Variable {
                name: self.symbol(0)?,
            },
            Integer | Float | Rational | Imaginary | Str | Xstr | Regx | Match | File => {
                Shape::Literal {
                    value: self.literal(0)?,
                }
            }
            Sym => Shape::Symbol {
                name: match self.child(0) {
                    Child::Literal(Literal::Str(s)) => Symbol::mk(s),
                    _ => self.symbol(0)?,
                },
            },
            Dstr | Dxstr | Dsym | Dregx => Shape::Interpolation {
                leading: match self.child(0) {
                    Child::Nil => None,
                    Child::Literal(Literal::Str(s)) => Some(s.as_str()),
                    _ => return Err(self.unexpected("string or nil in child 0")),
                },
                head: self.opt_node(1)?,
                tail: self.opt_node(2)?,
                options: match self.child(3) {
                    Child::Nil => 0,
                    _ => self.count(3)? as u32,
                },
            },
            Evstr | Once | Defined | Splat | Postexe | Lambda => Shape::Wrapper {
                body: self.opt_node(0)?,
            },
            Match2 | Match3 => Shape::Match {
                regexp: self.node(0)?,
                value: self.node(1)?,
                captures: self.opt_node(2)?,
            },
            Defn => Shape::Def {
                receiver: None,
                name: self.symbol(0)?,
                scope: self.node(1)?,
            },
            Defs => Shape::Def {
                receiver: Some(self.node(0)?),
                name: self.symbol(1)?,
                scope: self.node(2)?,
            },
            Alias => Shape::Alias {
                new_name: self.node(0)?,
                old_name: self.node(1)?,
            },
            Valias => Shape::GlobalAlias {
                new_name: self.symbol(0)?,
                old_name: self.symbol(1)?,
            },
            Undef => Shape::Undef {
                names: (0..self.children.len())
                    .map(|i| match self.child(i) {
                        Child::Symbol(sym) => Ok(NameRef::Symbol(*sym)),
                        _ => self.node(i).map(NameRef::Node),
                    })
                    .collect::<Result<_, _>>()?,
            },
            Class => Shape::Class {
                path: self.node(0)?,
                superclass: self.opt_node(1)?,
                scope: self.node(2)?,
            },
            Module => Shape::Module {
                path: self.node(0)?,
                scope: self.node(1)?,
            },
            Sclass => Shape::SingletonClass {
                receiver: self.node(0)?,
                scope: self.node(1)?,
            },
            Colon2 => Shape::Colon {
                parent: self.opt_node(0)?,
                name: self.symbol(1)?,
            },
            Colon3 => Shape::Colon {
                parent: None,
                name: self.symbol(0)?,
            },
            Args => Shape::Params(self.params()?),
            OptArg | KwArg => Shape::ParamLink {
                body: self.node(0)?,
                next: self.opt_node(1)?,
            },
            Postarg => Shape::PostArg {
                rest: self.rest_slot(0)?,
                posts: self.node(1)?,
            },
            SelfRef | Nil | True | False | Redo | Retry | Zsuper | Errinfo | Line | Encoding => {
                Shape::Leaf
            }
            Case3 | In | ForMasgn | Aryptn | Fndptn | Hshptn | Error | ArgsAux => {
                Shape::Unsupported
            }
        };
        Ok(shape)
    }

    fn assign(&self) -> Result<Shape<'_>, TranscodeError> {
        let required_keyword = self.sentinel(1) == Some(Sentinel::RequiredKeyword);
        Ok(Shape::Assign {
            name: self.symbol(0)?,
            value: if required_keyword {
                None
            } else {
                self.opt_node(1)?
            },
            required_keyword,
        })
    }

    fn rest_slot(&self, index: usize) -> Result<RestSlot<'_>, TranscodeError> {
        match self.child(index) {
            Child::Nil => Ok(RestSlot::Absent),
            Child::Sentinel(Sentinel::NoNameRest) => Ok(RestSlot::Anonymous),
            _ => self.node(index).map(RestSlot::Target),
        }
    }

    fn multi_assign(&self) -> Result<Shape<'_>, TranscodeError> {
        let value = self.opt_node(0)?;
        let head = self.opt_node(1)?;
        let (rest, posts) = match self.child(2) {
            Child::Node(args) if args.kind == NodeType::Postarg => {
                (args.rest_slot(0)?, Some(args.node(1)?))
            }
            _ => (self.rest_slot(2)?, None),
        };
        Ok(Shape::MultiAssign {
            value,
            head,
            rest,
            posts,
        })
    }

    fn params(&self) -> Result<Params<'_>, TranscodeError> {
        let rest = match self.child(6) {
            Child::Nil => ParamRest::Absent,
            Child::Sentinel(Sentinel::ExcessiveComma) => ParamRest::ExcessiveComma,
            Child::Sentinel(Sentinel::NoNameRest) => ParamRest::Anonymous,
            _ => ParamRest::Named(self.symbol(6)?),
        };
        let keyword_rest = match self.child(8) {
            Child::Nil => KeywordRest::Absent,
            Child::Sentinel(Sentinel::NoRestKeyword) => KeywordRest::NoKeywords,
            _ => KeywordRest::Variable(
                self.node(8)?
                    .expect_kind(&[NodeType::Dvar, NodeType::Lvar])?,
            ),
        };
        Ok(Params {
            pre_num: self.count(0)?,
            pre_init: self.opt_node(1)?,
            optionals: self.opt_node(2)?,
            first_post: self.opt_symbol(3)?,
            post_num: self.count(4)?,
            post_init: self.opt_node(5)?,
            rest,
            keywords: self.opt_node(7)?,
            keyword_rest,
            block: self.opt_symbol(9)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_loop_state_maps_to_post_condition() {
        let cond = leaf(NodeType::True, (1, 6, 1, 10));
        let pre = node(
            NodeType::While,
            vec![cond.clone().into(), Child::Nil, true.into()],
            (1, 0, 1, 14),
        );
        let post = node(
            NodeType::While,
            vec![cond.into(), Child::Nil, false.into()],
            (1, 0, 1, 14),
        );
        assert!(matches!(
            pre.shape(),
            Ok(Shape::Loop {
                post_condition: false,
                ..
            })
        ));
        assert!(matches!(
            post.shape(),
            Ok(Shape::Loop {
                post_condition: true,
                ..
            })
        ));
    }

    #[test]
    fn test_masgn_postarg_resolved() {
        // a, *b, c = v
        let posts = list(vec![lasgn("c", None, (1, 7, 1, 8))], (1, 7, 1, 8));
        let rest = lasgn("b", None, (1, 4, 1, 5));
        let post = postarg(rest.clone().into(), posts.clone(), (1, 3, 1, 8));
        let m = masgn(
            Some(vcall("v", (1, 11, 1, 12))),
            Some(list(vec![lasgn("a", None, (1, 0, 1, 1))], (1, 0, 1, 1))),
            post.into(),
            (1, 0, 1, 12),
        );
        let Shape::MultiAssign { rest: got_rest, posts: got_posts, .. } = m.shape().unwrap() else {
            panic!("expected a multiple assignment");
        };
        assert_eq!(got_rest, RestSlot::Target(&rest));
        assert_eq!(got_posts, Some(&posts));
    }

    #[test]
    fn test_masgn_anonymous_rest() {
        let m = masgn(
            None,
            Some(list(vec![dasgn("a", None, (1, 1, 1, 2))], (1, 1, 1, 2))),
            special(Sentinel::NoNameRest),
            (1, 0, 1, 5),
        );
        assert!(matches!(
            m.shape(),
            Ok(Shape::MultiAssign {
                rest: RestSlot::Anonymous,
                posts: None,
                ..
            })
        ));
    }

    #[test]
    fn test_required_keyword_value() {
        let kw = node(
            NodeType::Dasgn,
            vec![sym("a"), special(Sentinel::RequiredKeyword)],
            (1, 3, 1, 5),
        );
        assert_eq!(
            kw.shape().unwrap(),
            Shape::Assign {
                name: Symbol::mk("a"),
                value: None,
                required_keyword: true
            }
        );
    }

    #[test]
    fn test_cdecl_forms() {
        let bare = assign(NodeType::Cdecl, "A", Some(int(1, (1, 4, 1, 5))), (1, 0, 1, 5));
        assert!(matches!(bare.shape(), Ok(Shape::Assign { .. })));

        let path = node(
            NodeType::Colon2,
            vec![constant("A", (1, 0, 1, 1)).into(), sym("B")],
            (1, 0, 1, 4),
        );
        let scoped = node(
            NodeType::Cdecl,
            vec![path.into(), sym("B"), int(1, (1, 7, 1, 8)).into()],
            (1, 0, 1, 8),
        );
        assert!(matches!(scoped.shape(), Ok(Shape::ConstPathAssign { .. })));
    }

    #[test]
    fn test_empty_params() {
        let args = ArgsSlots::default().build((1, 0, 1, 0));
        let Shape::Params(params) = args.shape().unwrap() else {
            panic!("expected params");
        };
        assert!(params.is_empty());
    }

    #[test_case(special(Sentinel::ExcessiveComma), ParamRest::ExcessiveComma; "excessive comma")]
    #[test_case(special(Sentinel::NoNameRest), ParamRest::Anonymous; "anonymous")]
    #[test_case(sym("r"), ParamRest::Named(Symbol::mk("r")); "named")]
    #[test_case(Child::Nil, ParamRest::Absent; "absent")]
    fn test_param_rest(slot: Child, expected: ParamRest) {
        let args = ArgsSlots {
            pre_num: 1,
            rest: slot,
            ..Default::default()
        }
        .build((1, 3, 1, 8));
        let Shape::Params(params) = args.shape().unwrap() else {
            panic!("expected params");
        };
        assert_eq!(params.rest, expected);
    }

    #[test]
    fn test_kwrest_must_be_a_variable() {
        let args = ArgsSlots {
            kwrest: int(1, (1, 0, 1, 1)).into(),
            ..Default::default()
        }
        .build((1, 0, 1, 5));
        let err = args.shape().unwrap_err();
        assert!(matches!(err, TranscodeError::UnexpectedKind { found: NodeType::Integer, .. }));
    }

    #[test_case(NodeType::Case3; "case in")]
    #[test_case(NodeType::Hshptn; "hash pattern")]
    #[test_case(NodeType::ForMasgn; "for masgn")]
    fn test_unsupported(kind: NodeType) {
        assert_eq!(leaf(kind, (1, 0, 1, 1)).shape(), Ok(Shape::Unsupported));
    }
}
