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

//! The recursive legacy-to-canonical dispatch.
//!
//! One arm per legacy kind, each producing exactly one canonical node. Children are converted
//! before their parents. A block literal attached to a call travels down as an explicit
//! `pending` argument rather than as transcoder state.

use crate::args::{ArgumentEntry, ArgumentList};
use crate::ast::{
    ArgumentsFlags, ArrayFlags, CallFlags, IntegerBaseFlags, LoopFlags, Node, NodeKind,
    RangeFlags, RegexpFlags, StringFlags,
};
use crate::location::SpanResolver;
use crate::params::{KeywordRestParam, ParameterList, RequiredParam, RestParam};
use crate::targets::{GroupRest, Target, TargetGroup, TargetStyle};
use arbor_common::{NodeType, SourceIndex, Span, TranscodeError, TranscodeOptions};
use arbor_legacy::{Child, LegacyNode, NameRef, Shape};
use arbor_var::{
    Literal, REGEXP_EXTENDED, REGEXP_IGNORECASE, REGEXP_MULTILINE, Symbol,
};
use tracing::{trace, warn};

/// One link in the chain of local tables visible from a node. Blocks and lambdas add a link;
/// method, class and module bodies start a new chain.
#[derive(Copy, Clone, Debug)]
pub struct LocalScope<'s> {
    names: &'s [Option<Symbol>],
    parent: Option<&'s LocalScope<'s>>,
}

impl<'s> LocalScope<'s> {
    pub fn new(names: &'s [Option<Symbol>], parent: Option<&'s LocalScope<'s>>) -> Self {
        Self { names, parent }
    }

    /// How many block scopes separate a reference from the scope declaring `name`. A name
    /// no link declares resolves to 0.
    pub fn depth(&self, name: Symbol) -> u32 {
        let mut depth = 0;
        let mut scope = Some(self);
        while let Some(link) = scope {
            if link.names.contains(&Some(name)) {
                return depth;
            }
            depth += 1;
            scope = link.parent;
        }
        0
    }
}

/// The pieces of a flattened `begin`/`rescue`/`else`/`ensure`.
#[derive(Default)]
struct BeginParts {
    statements: Option<Box<Node>>,
    rescue_clause: Option<Box<Node>>,
    else_clause: Option<Box<Node>>,
    ensure_clause: Option<Box<Node>>,
}

#[derive(Copy, Clone)]
pub struct Transcoder<'a, 's> {
    spans: SpanResolver<'a>,
    options: &'a TranscodeOptions,
    scope: Option<&'s LocalScope<'s>>,
}

fn boxed(node: Node) -> Box<Node> {
    Box::new(node)
}

impl<'a> Transcoder<'a, '_> {
    pub fn new(index: &'a SourceIndex, options: &'a TranscodeOptions) -> Self {
        Self {
            spans: SpanResolver::new(index),
            options,
            scope: None,
        }
    }

    /// Convert a program root, which must be a `SCOPE`.
    pub fn program(&self, root: &LegacyNode) -> Result<Node, TranscodeError> {
        let Shape::Scope { table, body, .. } = root.expect_kind(&[NodeType::Scope])?.shape()? else {
            return Err(root.unexpected("SCOPE"));
        };
        let location = self.spans.span(root)?;
        self.in_scope(table, true, |t| {
            let statements = match t.statements(body)? {
                Some(statements) => statements,
                None => Node::boxed(NodeKind::Statements { body: vec![] }, Span::null()),
            };
            Ok(Node::new(
                NodeKind::Program {
                    locals: locals(table),
                    statements,
                },
                location,
            ))
        })
    }

    fn in_scope<R>(
        &self,
        table: &[Option<Symbol>],
        fresh: bool,
        f: impl FnOnce(&Transcoder<'a, '_>) -> R,
    ) -> R {
        let scope = LocalScope::new(table, if fresh { None } else { self.scope });
        f(&Transcoder {
            spans: self.spans,
            options: self.options,
            scope: Some(&scope),
        })
    }

    fn depth(&self, name: Symbol) -> u32 {
        self.scope.map(|s| s.depth(name)).unwrap_or(0)
    }

    pub fn node(&self, node: &LegacyNode) -> Result<Node, TranscodeError> {
        self.transcode(node, None)
    }

    fn opt(&self, node: Option<&LegacyNode>) -> Result<Option<Box<Node>>, TranscodeError> {
        node.map(|n| self.node(n).map(boxed)).transpose()
    }

    fn required(
        &self,
        node: Option<&LegacyNode>,
        parent: &LegacyNode,
        what: &str,
    ) -> Result<Box<Node>, TranscodeError> {
        let node = node.ok_or_else(|| parent.unexpected(what))?;
        self.node(node).map(boxed)
    }

    /// Convert one node. `pending` is a block literal to attach; only call-like kinds accept
    /// one.
    pub fn transcode(
        &self,
        node: &LegacyNode,
        pending: Option<Node>,
    ) -> Result<Node, TranscodeError> {
        use NodeType::*;

        trace!(kind = %node.kind, position = %node.position, "transcode");
        if pending.is_some()
            && !matches!(node.kind, Call | Opcall | Qcall | Fcall | Vcall | Super | Zsuper)
        {
            return Err(node.unexpected("call accepting a block"));
        }

        let location = self.spans.span(node)?;
        let null = Span::null();
        let kind = match (node.kind, node.shape()?) {
            (Block, Shape::Block { statements }) => NodeKind::Statements {
                body: statements
                    .into_iter()
                    .map(|s| self.node(s))
                    .collect::<Result<_, _>>()?,
            },

            (If, Shape::Conditional {
                condition,
                body,
                otherwise,
            }) => NodeKind::If {
                if_keyword_loc: null,
                predicate: boxed(self.node(condition)?),
                then_keyword_loc: null,
                statements: self.statements(body)?,
                consequent: match otherwise {
                    Some(elsif) if elsif.kind == If => Some(boxed(self.node(elsif)?)),
                    Some(other) => Some(boxed(self.else_clause(other)?)),
                    None => None,
                },
                end_keyword_loc: null,
            },
            (Unless, Shape::Conditional {
                condition,
                body,
                otherwise,
            }) => NodeKind::Unless {
                keyword_loc: null,
                predicate: boxed(self.node(condition)?),
                then_keyword_loc: null,
                statements: self.statements(body)?,
                consequent: otherwise
                    .map(|other| self.else_clause(other).map(boxed))
                    .transpose()?,
                end_keyword_loc: null,
            },
            (_, Shape::Case { subject, clauses }) => {
                let (conditions, consequent) = self.case_clauses(clauses)?;
                NodeKind::Case {
                    predicate: self.opt(subject)?,
                    conditions,
                    consequent,
                    case_keyword_loc: null,
                    end_keyword_loc: null,
                }
            }
            (While | Until, Shape::Loop {
                condition,
                body,
                post_condition,
            }) => {
                let flags = if post_condition {
                    LoopFlags::BEGIN_MODIFIER
                } else {
                    LoopFlags::empty()
                };
                let predicate = boxed(self.node(condition)?);
                let statements = self.statements(body)?;
                if node.kind == While {
                    NodeKind::While {
                        flags,
                        keyword_loc: null,
                        closing_loc: null,
                        predicate,
                        statements,
                    }
                } else {
                    NodeKind::Until {
                        flags,
                        keyword_loc: null,
                        closing_loc: null,
                        predicate,
                        statements,
                    }
                }
            }
            (Iter, Shape::Iter { call, scope }) => {
                let block = self.block(scope)?;
                let mut call = self.transcode(call, Some(block))?;
                call.location = location;
                return Ok(call);
            }
            (For, Shape::For { collection, scope }) => self.for_loop(collection, scope)?,
            (Break | Next | Return, Shape::Jump { value }) => {
                let arguments = value.map(|v| self.jump_arguments(v)).transpose()?;
                let keyword_loc = if arguments.is_none() { location } else { null };
                match node.kind {
                    Break => NodeKind::Break {
                        arguments,
                        keyword_loc,
                    },
                    Next => NodeKind::Next {
                        arguments,
                        keyword_loc,
                    },
                    _ => NodeKind::Return {
                        keyword_loc,
                        arguments,
                    },
                }
            }
            (Redo, _) => NodeKind::Redo,
            (Retry, _) => NodeKind::Retry,

            (Begin, Shape::Begin { body }) => match body {
                Some(inner) if matches!(inner.kind, Rescue | Ensure) => {
                    self.begin_node(self.begin_parts(inner)?)
                }
                _ => self.begin_node(BeginParts {
                    statements: self.statements(body)?,
                    ..Default::default()
                }),
            },
            (Rescue | Ensure, _) => self.begin_node(self.begin_parts(node)?),

            (And | Or, Shape::Pair { left, right }) => {
                let left = self.required(left, node, "left operand")?;
                let right = self.required(right, node, "right operand")?;
                if node.kind == And {
                    NodeKind::And {
                        left,
                        right,
                        operator_loc: null,
                    }
                } else {
                    NodeKind::Or {
                        left,
                        right,
                        operator_loc: null,
                    }
                }
            }

            (Masgn, Shape::MultiAssign { value, .. }) => {
                let value = self.required(value, node, "multiple assignment value")?;
                let group = TargetGroup::decompose(node, TargetStyle::Assignment)?;
                let (lefts, rest, rights) = self.target_parts(&group, TargetStyle::Assignment)?;
                NodeKind::MultiWrite {
                    lefts,
                    rest,
                    rights,
                    lparen_loc: null,
                    rparen_loc: null,
                    operator_loc: null,
                    value,
                }
            }
            (_, Shape::Assign {
                name,
                value,
                required_keyword,
            }) => {
                if required_keyword {
                    return Err(node.unexpected("assignment outside a parameter list"));
                }
                let value = self.required(value, node, "assigned value")?;
                self.write(node, name, value)?
            }
            (_, Shape::ConstPathAssign { path, value, .. }) => NodeKind::ConstantPathWrite {
                target: boxed(self.node(path)?),
                operator_loc: null,
                value: self.required(value, node, "assigned value")?,
            },
            (_, Shape::IndexOpAssign {
                receiver,
                operator,
                index,
                value,
            }) => self.index_op_assign(receiver, operator, index, value)?,
            (_, Shape::AttrOpAssign {
                receiver,
                safe_navigation,
                name,
                operator,
                value,
            }) => {
                let flags = if safe_navigation {
                    CallFlags::SAFE_NAVIGATION
                } else {
                    CallFlags::empty()
                };
                let receiver = Some(boxed(self.node(receiver)?));
                let value = boxed(self.node(value)?);
                let write_name = name.with_suffix("=");
                match operator.as_str() {
                    "||" => NodeKind::CallOrWrite {
                        flags,
                        receiver,
                        call_operator_loc: null,
                        message_loc: null,
                        read_name: name,
                        write_name,
                        operator_loc: null,
                        value,
                    },
                    "&&" => NodeKind::CallAndWrite {
                        flags,
                        receiver,
                        call_operator_loc: null,
                        message_loc: null,
                        read_name: name,
                        write_name,
                        operator_loc: null,
                        value,
                    },
                    _ => NodeKind::CallOperatorWrite {
                        flags,
                        receiver,
                        call_operator_loc: null,
                        message_loc: null,
                        read_name: name,
                        write_name,
                        binary_operator: operator,
                        binary_operator_loc: null,
                        value,
                    },
                }
            }
            (OpAsgnAnd | OpAsgnOr, Shape::ConditionalAssign { assignment, .. }) => {
                self.conditional_write(node.kind == OpAsgnAnd, assignment)?
            }
            (_, Shape::ConstOpAssign {
                path,
                operator,
                value,
            }) => {
                let target = boxed(self.node(path)?);
                let value = boxed(self.node(value)?);
                match operator.as_str() {
                    "||" => NodeKind::ConstantPathOrWrite {
                        target,
                        operator_loc: null,
                        value,
                    },
                    "&&" => NodeKind::ConstantPathAndWrite {
                        target,
                        operator_loc: null,
                        value,
                    },
                    _ => NodeKind::ConstantPathOperatorWrite {
                        target,
                        binary_operator_loc: null,
                        value,
                        binary_operator: operator,
                    },
                }
            }

            (_, Shape::Call {
                receiver,
                name,
                args,
            }) => {
                let flags = match node.kind {
                    Qcall => CallFlags::SAFE_NAVIGATION,
                    Fcall => CallFlags::IGNORE_VISIBILITY,
                    Vcall => CallFlags::VARIABLE_CALL | CallFlags::IGNORE_VISIBILITY,
                    Attrasgn => CallFlags::ATTRIBUTE_WRITE,
                    _ => CallFlags::empty(),
                };
                let (arguments, block_argument) = self.call_arguments(args)?;
                NodeKind::Call {
                    flags,
                    receiver: self.opt(receiver)?,
                    call_operator_loc: null,
                    name,
                    message_loc: if node.kind == Vcall { location } else { null },
                    opening_loc: null,
                    arguments,
                    closing_loc: null,
                    block: attach_block(node, pending, block_argument),
                }
            }
            (Super, Shape::Invoke { args }) => {
                let (arguments, block_argument) = self.call_arguments(args)?;
                NodeKind::Super {
                    keyword_loc: null,
                    lparen_loc: null,
                    arguments,
                    rparen_loc: null,
                    block: attach_block(node, pending, block_argument),
                }
            }
            (Zsuper, _) => NodeKind::ForwardingSuper {
                block: pending.map(boxed),
            },
            (Yield, Shape::Invoke { args }) => {
                let (arguments, block_argument) = self.call_arguments(args)?;
                if block_argument.is_some() {
                    return Err(node.unexpected("yield arguments without a block argument"));
                }
                NodeKind::Yield {
                    keyword_loc: null,
                    lparen_loc: null,
                    arguments,
                    rparen_loc: null,
                }
            }

            (List | Zlist | Splat | Argscat | Argspush, _) => self.array(node)?,
            (Hash, Shape::Hash { pairs }) => NodeKind::Hash {
                opening_loc: null,
                elements: self.hash_elements(pairs)?,
                closing_loc: null,
            },

            (_, Shape::Variable { name }) => self.read(node, name)?,
            (_, Shape::Literal { value }) => self.literal(node, value, location)?,
            (Sym, Shape::Symbol { name }) => symbol_kind(name),
            (_, Shape::Interpolation {
                leading,
                head,
                tail,
                options,
            }) => {
                let parts = self.interpolation_parts(leading, head, tail)?;
                match node.kind {
                    Dstr => NodeKind::InterpolatedString {
                        flags: StringFlags::empty(),
                        opening_loc: null,
                        parts,
                        closing_loc: null,
                    },
                    Dxstr => NodeKind::InterpolatedXString {
                        opening_loc: null,
                        parts,
                        closing_loc: null,
                    },
                    Dsym => NodeKind::InterpolatedSymbol {
                        opening_loc: null,
                        parts,
                        closing_loc: null,
                    },
                    _ => NodeKind::InterpolatedRegularExpression {
                        flags: regexp_flags(options),
                        opening_loc: null,
                        parts,
                        closing_loc: null,
                    },
                }
            }
            (Once, Shape::Wrapper { body }) => {
                let inner = self.required(body, node, "DREGX")?;
                match inner.kind {
                    NodeKind::InterpolatedRegularExpression {
                        flags,
                        opening_loc,
                        parts,
                        closing_loc,
                    } => NodeKind::InterpolatedRegularExpression {
                        flags: flags | RegexpFlags::ONCE,
                        opening_loc,
                        parts,
                        closing_loc,
                    },
                    _ => return Err(node.unexpected("DREGX inside ONCE")),
                }
            }
            (Defined, Shape::Wrapper { body }) => NodeKind::Defined {
                lparen_loc: null,
                value: self.required(body, node, "defined? operand")?,
                rparen_loc: null,
                keyword_loc: null,
            },
            (Postexe, Shape::Wrapper { body }) => {
                let scope = body.ok_or_else(|| node.unexpected("SCOPE"))?;
                let Shape::Scope { table, body, .. } = scope.expect_kind(&[Scope])?.shape()? else {
                    return Err(scope.unexpected("SCOPE"));
                };
                NodeKind::PostExecution {
                    statements: self.in_scope(table, false, |t| t.statements(body))?,
                    keyword_loc: null,
                    opening_loc: null,
                    closing_loc: null,
                }
            }
            (Lambda, Shape::Wrapper { body }) => {
                let scope = body.ok_or_else(|| node.unexpected("SCOPE"))?;
                let (locals, parameters, body) = self.block_parts(scope)?;
                NodeKind::Lambda {
                    locals,
                    operator_loc: null,
                    opening_loc: null,
                    closing_loc: null,
                    parameters,
                    body,
                }
            }
            (_, Shape::Match {
                regexp,
                value,
                captures,
            }) => return self.match_operator(node, regexp, value, captures, location),

            (_, Shape::Def {
                receiver,
                name,
                scope,
            }) => {
                let receiver = self.opt(receiver)?;
                let Shape::Scope { table, args, body } = scope.expect_kind(&[Scope])?.shape()?
                else {
                    return Err(scope.unexpected("SCOPE"));
                };
                let (parameters, body) = self.in_scope(table, true, |t| {
                    let parameters = match args {
                        Some(args) => ParameterList::decode(table, args)?
                            .map(|list| t.parameters(&list, args).map(boxed))
                            .transpose()?,
                        None => None,
                    };
                    Ok::<_, TranscodeError>((parameters, t.scope_body(body)?))
                })?;
                NodeKind::Def {
                    name,
                    name_loc: null,
                    receiver,
                    parameters,
                    body,
                    locals: locals(table),
                    def_keyword_loc: null,
                    operator_loc: null,
                    lparen_loc: null,
                    rparen_loc: null,
                    equal_loc: null,
                    end_keyword_loc: null,
                }
            }
            (_, Shape::Alias { new_name, old_name }) => NodeKind::AliasMethod {
                new_name: boxed(self.node(new_name)?),
                old_name: boxed(self.node(old_name)?),
                keyword_loc: null,
            },
            (_, Shape::GlobalAlias { new_name, old_name }) => NodeKind::AliasGlobalVariable {
                new_name: Node::boxed(NodeKind::GlobalVariableRead { name: new_name }, null),
                old_name: Node::boxed(NodeKind::GlobalVariableRead { name: old_name }, null),
                keyword_loc: null,
            },
            (_, Shape::Undef { names }) => NodeKind::Undef {
                names: names
                    .into_iter()
                    .map(|name| match name {
                        NameRef::Node(n) => self.node(n),
                        NameRef::Symbol(s) => Ok(Node::new(symbol_kind(s), null)),
                    })
                    .collect::<Result<_, _>>()?,
                keyword_loc: null,
            },
            (_, Shape::Class {
                path,
                superclass,
                scope,
            }) => {
                let (constant_path, name) = self.class_path(path)?;
                let superclass = self.opt(superclass)?;
                let (locals, body) = self.definition_body(scope)?;
                NodeKind::Class {
                    locals,
                    class_keyword_loc: null,
                    constant_path,
                    inheritance_operator_loc: null,
                    superclass,
                    body,
                    end_keyword_loc: null,
                    name,
                }
            }
            (_, Shape::Module { path, scope }) => {
                let (constant_path, name) = self.class_path(path)?;
                let (locals, body) = self.definition_body(scope)?;
                NodeKind::Module {
                    locals,
                    module_keyword_loc: null,
                    constant_path,
                    body,
                    end_keyword_loc: null,
                    name,
                }
            }
            (_, Shape::SingletonClass { receiver, scope }) => {
                let expression = boxed(self.node(receiver)?);
                let (locals, body) = self.definition_body(scope)?;
                NodeKind::SingletonClass {
                    locals,
                    class_keyword_loc: null,
                    operator_loc: null,
                    expression,
                    body,
                    end_keyword_loc: null,
                }
            }
            (_, Shape::Colon { parent, name }) => NodeKind::ConstantPath {
                parent: self.opt(parent)?,
                name,
                delimiter_loc: null,
                name_loc: null,
            },

            (Dot2 | Dot3, Shape::Pair { left, right }) => NodeKind::Range {
                flags: range_flags(node.kind == Dot3),
                left: self.opt(left)?,
                right: self.opt(right)?,
                operator_loc: null,
            },
            (Flip2 | Flip3, Shape::Pair { left, right }) => NodeKind::FlipFlop {
                flags: range_flags(node.kind == Flip3),
                left: left.map(|l| self.flip_flop_operand(l).map(boxed)).transpose()?,
                right: right.map(|r| self.flip_flop_operand(r).map(boxed)).transpose()?,
                operator_loc: null,
            },

            (SelfRef, _) => NodeKind::SelfRef,
            (Nil, _) => NodeKind::Nil,
            (True, _) => NodeKind::True,
            (False, _) => NodeKind::False,
            (Line, _) => NodeKind::SourceLine,
            (Encoding, _) => NodeKind::SourceEncoding,

            (_, Shape::Unsupported) => return Err(node.not_supported()),
            // Reached when `rescue => target` binds into something other than a plain
            // variable, e.g. an attribute or index (`rescue => a.b`).
            (Errinfo, _) => return Err(node.not_supported()),
            // Everything else only appears inside a parent that consumes it directly: scopes,
            // parameter descriptors, when/rescue clauses, interpolation fragments and block
            // passes.
            _ => return Err(node.unexpected("expression")),
        };
        Ok(Node::new(kind, location))
    }

    /// A body position: absent, `BEGIN [nil]`, one statement, or a `BLOCK` of them.
    fn statements(&self, body: Option<&LegacyNode>) -> Result<Option<Box<Node>>, TranscodeError> {
        let Some(body) = body else {
            return Ok(None);
        };
        match body.shape()? {
            Shape::Begin { body: None } if body.kind == NodeType::Begin => Ok(None),
            Shape::Block { .. } => Ok(Some(boxed(self.node(body)?))),
            _ => Ok(Some(Node::boxed(
                NodeKind::Statements {
                    body: vec![self.node(body)?],
                },
                self.spans.span(body)?,
            ))),
        }
    }

    /// The body of a scope. A body wrapped in `rescue`/`ensure` becomes a `Begin` directly.
    fn scope_body(&self, body: Option<&LegacyNode>) -> Result<Option<Box<Node>>, TranscodeError> {
        match body {
            Some(body) if matches!(body.kind, NodeType::Rescue | NodeType::Ensure) => Ok(Some(
                Node::boxed(self.begin_node(self.begin_parts(body)?), self.spans.span(body)?),
            )),
            _ => self.statements(body),
        }
    }

    fn else_clause(&self, body: &LegacyNode) -> Result<Node, TranscodeError> {
        Ok(Node::new(
            NodeKind::Else {
                else_keyword_loc: Span::null(),
                statements: self.statements(Some(body))?,
                end_keyword_loc: Span::null(),
            },
            self.spans.span(body)?,
        ))
    }

    fn case_clauses(
        &self,
        clauses: Option<&LegacyNode>,
    ) -> Result<(Vec<Node>, Option<Box<Node>>), TranscodeError> {
        let mut conditions = vec![];
        let mut link = clauses;
        while let Some(clause) = link {
            if clause.kind != NodeType::When {
                let otherwise = Node::new(
                    NodeKind::Else {
                        else_keyword_loc: Span::null(),
                        statements: self.statements(Some(clause))?,
                        end_keyword_loc: Span::null(),
                    },
                    Span::null(),
                );
                return Ok((conditions, Some(boxed(otherwise))));
            }
            let Shape::When {
                conditions: values,
                body,
                next,
            } = clause.shape()?
            else {
                return Err(clause.unexpected("WHEN"));
            };
            let values = match values {
                Some(values) => {
                    self.argument_nodes(ArgumentList::normalize(values)?.entries, values)?
                }
                None => vec![],
            };
            conditions.push(Node::new(
                NodeKind::When {
                    keyword_loc: Span::null(),
                    conditions: values,
                    then_keyword_loc: Span::null(),
                    statements: self.statements(body)?,
                },
                self.spans.span(clause)?,
            ));
            link = next;
        }
        Ok((conditions, None))
    }

    fn for_loop(
        &self,
        collection: &LegacyNode,
        scope: &LegacyNode,
    ) -> Result<NodeKind, TranscodeError> {
        let Shape::Scope { args, body, .. } = scope.expect_kind(&[NodeType::Scope])?.shape()? else {
            return Err(scope.unexpected("SCOPE"));
        };
        let args = args.ok_or_else(|| scope.unexpected("for-loop index"))?;
        let Shape::Params(params) = args.expect_kind(&[NodeType::Args])?.shape()? else {
            return Err(args.unexpected("ARGS"));
        };
        // The loop variables live in the enclosing scope; `for` opens no scope of its own.
        let index = match params.pre_init {
            Some(group) if group.kind == NodeType::Masgn => {
                let group = TargetGroup::decompose(group, TargetStyle::Assignment)?;
                self.target_group(&group, TargetStyle::Assignment)?
            }
            Some(single) if params.pre_num == 1 => self.assignment_target(single)?,
            _ => return Err(args.unexpected("for-loop index")),
        };
        Ok(NodeKind::For {
            index: boxed(index),
            collection: boxed(self.node(collection)?),
            statements: self.statements(body)?,
            for_keyword_loc: Span::null(),
            in_keyword_loc: Span::null(),
            do_keyword_loc: Span::null(),
            end_keyword_loc: Span::null(),
        })
    }

    /// The value of `break`/`next`/`return`: a bare expression, or an argument list when
    /// several values (or a splat) are given.
    fn jump_arguments(&self, value: &LegacyNode) -> Result<Box<Node>, TranscodeError> {
        let arguments = match value.kind {
            NodeType::List
            | NodeType::Zlist
            | NodeType::Splat
            | NodeType::Argscat
            | NodeType::Argspush => {
                let list = ArgumentList::normalize(value)?;
                self.arguments_node(list.entries, value)?
            }
            _ => Node::new(
                NodeKind::Arguments {
                    flags: ArgumentsFlags::empty(),
                    arguments: vec![self.node(value)?],
                },
                self.spans.span(value)?,
            ),
        };
        Ok(boxed(arguments))
    }

    // Exception handling. The legacy tree nests `ENSURE` around `RESCUE` around the protected
    // body; these fold that nesting back into one `Begin`.

    fn begin_node(&self, parts: BeginParts) -> NodeKind {
        NodeKind::Begin {
            begin_keyword_loc: Span::null(),
            statements: parts.statements,
            rescue_clause: parts.rescue_clause,
            else_clause: parts.else_clause,
            ensure_clause: parts.ensure_clause,
            end_keyword_loc: Span::null(),
        }
    }

    fn begin_parts(&self, node: &LegacyNode) -> Result<BeginParts, TranscodeError> {
        match node.shape()? {
            Shape::Ensure { body, ensure } => {
                let mut parts = match body {
                    Some(rescue) if rescue.kind == NodeType::Rescue => self.rescue_parts(rescue)?,
                    _ => BeginParts {
                        statements: self.statements(body)?,
                        ..Default::default()
                    },
                };
                let location = self.spans.opt_span(ensure)?.unwrap_or_default();
                parts.ensure_clause = Some(Node::boxed(
                    NodeKind::Ensure {
                        ensure_keyword_loc: Span::null(),
                        statements: self.statements(ensure)?,
                        end_keyword_loc: Span::null(),
                    },
                    location,
                ));
                Ok(parts)
            }
            Shape::Rescue { .. } => self.rescue_parts(node),
            _ => Err(node.unexpected("RESCUE or ENSURE")),
        }
    }

    fn rescue_parts(&self, node: &LegacyNode) -> Result<BeginParts, TranscodeError> {
        let Shape::Rescue {
            body,
            clause,
            otherwise,
        } = node.shape()?
        else {
            return Err(node.unexpected("RESCUE"));
        };
        Ok(BeginParts {
            statements: self.statements(body)?,
            rescue_clause: clause.map(|c| self.rescue_clause(c).map(boxed)).transpose()?,
            else_clause: otherwise.map(|o| self.else_clause(o).map(boxed)).transpose()?,
            ensure_clause: None,
        })
    }

    fn rescue_clause(&self, node: &LegacyNode) -> Result<Node, TranscodeError> {
        let Shape::RescueClause {
            exceptions,
            body,
            next,
        } = node.expect_kind(&[NodeType::Resbody])?.shape()?
        else {
            return Err(node.unexpected("RESBODY"));
        };
        let exceptions = match exceptions {
            Some(list) => self.argument_nodes(ArgumentList::normalize(list)?.entries, list)?,
            None => vec![],
        };
        let (reference, statements) = self.rescue_body(body)?;
        Ok(Node::new(
            NodeKind::Rescue {
                keyword_loc: Span::null(),
                exceptions,
                operator_loc: Span::null(),
                reference,
                statements,
                consequent: next.map(|n| self.rescue_clause(n).map(boxed)).transpose()?,
            },
            self.spans.span(node)?,
        ))
    }

    /// `rescue E => e` stores the exception into `e` with a synthesized first statement. That
    /// statement becomes the clause's reference and is dropped from its body.
    fn rescue_body(
        &self,
        body: Option<&LegacyNode>,
    ) -> Result<(Option<Box<Node>>, Option<Box<Node>>), TranscodeError> {
        let Some(body) = body else {
            return Ok((None, None));
        };
        let statements = match body.shape()? {
            Shape::Block { statements } => statements,
            _ => vec![body],
        };
        let binding = statements.first().filter(|first| {
            first.kind.is_simple_assignment()
                && matches!(first.child(1), Child::Node(value) if value.kind == NodeType::Errinfo)
        });
        let Some(binding) = binding else {
            return Ok((None, self.statements(Some(body))?));
        };
        let reference = boxed(self.assignment_target(binding)?);
        let rest = &statements[1..];
        if rest.is_empty() {
            return Ok((Some(reference), None));
        }
        let retained = rest.iter().map(|s| self.node(s)).collect::<Result<_, _>>()?;
        Ok((
            Some(reference),
            Some(Node::boxed(
                NodeKind::Statements { body: retained },
                self.spans.span(body)?,
            )),
        ))
    }

    // Variables

    fn read(&self, node: &LegacyNode, name: Symbol) -> Result<NodeKind, TranscodeError> {
        Ok(match node.kind {
            NodeType::Lvar | NodeType::Dvar => NodeKind::LocalVariableRead {
                name,
                depth: self.depth(name),
            },
            NodeType::Ivar => NodeKind::InstanceVariableRead { name },
            NodeType::Gvar => NodeKind::GlobalVariableRead { name },
            NodeType::Cvar => NodeKind::ClassVariableRead { name },
            NodeType::Const => NodeKind::ConstantRead { name },
            NodeType::NthRef => NodeKind::NumberedReference {
                number: name
                    .as_str()
                    .trim_start_matches('$')
                    .parse()
                    .map_err(|_| node.unexpected("numbered reference"))?,
            },
            NodeType::BackRef => NodeKind::BackReference { name },
            _ => return Err(node.unexpected("variable")),
        })
    }

    fn write(
        &self,
        node: &LegacyNode,
        name: Symbol,
        value: Box<Node>,
    ) -> Result<NodeKind, TranscodeError> {
        let name_loc = Span::null();
        let operator_loc = Span::null();
        Ok(match node.kind {
            NodeType::Lasgn | NodeType::Dasgn => NodeKind::LocalVariableWrite {
                name,
                depth: self.depth(name),
                name_loc,
                value,
                operator_loc,
            },
            NodeType::Iasgn => NodeKind::InstanceVariableWrite {
                name,
                name_loc,
                value,
                operator_loc,
            },
            NodeType::Cvasgn => NodeKind::ClassVariableWrite {
                name,
                name_loc,
                value,
                operator_loc,
            },
            NodeType::Gasgn => NodeKind::GlobalVariableWrite {
                name,
                name_loc,
                value,
                operator_loc,
            },
            NodeType::Cdecl => NodeKind::ConstantWrite {
                name,
                name_loc,
                value,
                operator_loc,
            },
            _ => return Err(node.unexpected("variable assignment")),
        })
    }

    /// `x &&= v` / `x ||= v`: the embedded assignment's kind picks the variable family.
    fn conditional_write(
        &self,
        and: bool,
        assignment: &LegacyNode,
    ) -> Result<NodeKind, TranscodeError> {
        let Shape::Assign {
            name,
            value: Some(value),
            ..
        } = assignment.shape()?
        else {
            return Err(assignment.unexpected("variable assignment"));
        };
        let value = boxed(self.node(value)?);
        let name_loc = Span::null();
        let operator_loc = Span::null();
        macro_rules! pick {
            ($and:ident, $or:ident { $($extra:ident: $val:expr),* }) => {
                if and {
                    NodeKind::$and { name, name_loc, operator_loc, value $(, $extra: $val)* }
                } else {
                    NodeKind::$or { name, name_loc, operator_loc, value $(, $extra: $val)* }
                }
            };
        }
        Ok(match assignment.kind {
            NodeType::Lasgn | NodeType::Dasgn => {
                pick!(LocalVariableAndWrite, LocalVariableOrWrite { depth: self.depth(name) })
            }
            NodeType::Iasgn => pick!(InstanceVariableAndWrite, InstanceVariableOrWrite {}),
            NodeType::Cvasgn => pick!(ClassVariableAndWrite, ClassVariableOrWrite {}),
            NodeType::Gasgn => pick!(GlobalVariableAndWrite, GlobalVariableOrWrite {}),
            NodeType::Cdecl => pick!(ConstantAndWrite, ConstantOrWrite {}),
            _ => return Err(assignment.unexpected("variable assignment")),
        })
    }

    fn index_op_assign(
        &self,
        receiver: &LegacyNode,
        operator: Symbol,
        index: Option<&LegacyNode>,
        value: &LegacyNode,
    ) -> Result<NodeKind, TranscodeError> {
        let receiver = Some(boxed(self.node(receiver)?));
        let (arguments, block) = self.call_arguments(index)?;
        let block = block.map(boxed);
        let value = boxed(self.node(value)?);
        let flags = CallFlags::empty();
        let null = Span::null();
        Ok(match operator.as_str() {
            "||" => NodeKind::IndexOrWrite {
                flags,
                receiver,
                call_operator_loc: null,
                opening_loc: null,
                arguments,
                closing_loc: null,
                block,
                operator_loc: null,
                value,
            },
            "&&" => NodeKind::IndexAndWrite {
                flags,
                receiver,
                call_operator_loc: null,
                opening_loc: null,
                arguments,
                closing_loc: null,
                block,
                operator_loc: null,
                value,
            },
            _ => NodeKind::IndexOperatorWrite {
                flags,
                receiver,
                call_operator_loc: null,
                opening_loc: null,
                arguments,
                closing_loc: null,
                block,
                binary_operator: operator,
                binary_operator_loc: null,
                value,
            },
        })
    }

    // Targets

    fn assignment_target(&self, node: &LegacyNode) -> Result<Node, TranscodeError> {
        let location = self.spans.span(node)?;
        let kind = match node.shape()? {
            Shape::Assign { name, .. } => match node.kind {
                NodeType::Lasgn | NodeType::Dasgn => NodeKind::LocalVariableTarget {
                    name,
                    depth: self.depth(name),
                },
                NodeType::Iasgn => NodeKind::InstanceVariableTarget { name },
                NodeType::Cvasgn => NodeKind::ClassVariableTarget { name },
                NodeType::Gasgn => NodeKind::GlobalVariableTarget { name },
                NodeType::Cdecl => NodeKind::ConstantTarget { name },
                _ => return Err(node.unexpected("assignment target")),
            },
            Shape::ConstPathAssign { path, name, .. } => NodeKind::ConstantPathTarget {
                parent: match path.shape()? {
                    Shape::Colon { parent, .. } => self.opt(parent)?,
                    _ => return Err(path.unexpected("COLON2 or COLON3")),
                },
                name,
                delimiter_loc: Span::null(),
                name_loc: Span::null(),
            },
            _ if node.kind == NodeType::Attrasgn => return Err(node.not_supported()),
            _ => return Err(node.unexpected("assignment target")),
        };
        Ok(Node::new(kind, location))
    }

    fn target(&self, target: &Target<'_>, style: TargetStyle) -> Result<Node, TranscodeError> {
        match (target, style) {
            (Target::Group(group), _) => self.target_group(group, style),
            (Target::Simple(node), TargetStyle::Assignment) => self.assignment_target(node),
            (Target::Simple(node), TargetStyle::Parameter) => Ok(Node::new(
                NodeKind::RequiredParameter { name: node.symbol(0)? },
                Span::null(),
            )),
        }
    }

    fn target_parts(
        &self,
        group: &TargetGroup<'_>,
        style: TargetStyle,
    ) -> Result<(Vec<Node>, Option<Box<Node>>, Vec<Node>), TranscodeError> {
        let lefts = group
            .lefts
            .iter()
            .map(|t| self.target(t, style))
            .collect::<Result<_, _>>()?;
        let rest = match group.rest {
            None => None,
            Some(GroupRest::Anonymous) => Some(Node::boxed(
                NodeKind::Splat {
                    operator_loc: Span::null(),
                    expression: None,
                },
                Span::null(),
            )),
            Some(GroupRest::Named(node)) => Some(Node::boxed(
                NodeKind::Splat {
                    operator_loc: Span::null(),
                    expression: Some(boxed(self.target(&Target::Simple(node), style)?)),
                },
                Span::null(),
            )),
        };
        let rights = group
            .rights
            .iter()
            .map(|t| self.target(t, style))
            .collect::<Result<_, _>>()?;
        Ok((lefts, rest, rights))
    }

    fn target_group(
        &self,
        group: &TargetGroup<'_>,
        style: TargetStyle,
    ) -> Result<Node, TranscodeError> {
        let (lefts, rest, rights) = self.target_parts(group, style)?;
        Ok(Node::new(
            NodeKind::MultiTarget {
                lefts,
                rest,
                rights,
                lparen_loc: Span::null(),
                rparen_loc: Span::null(),
            },
            self.spans.span(group.node)?,
        ))
    }

    // Calls and arguments

    /// The `arguments` and block-argument parts of a call's argument slot.
    fn call_arguments(
        &self,
        args: Option<&LegacyNode>,
    ) -> Result<(Option<Box<Node>>, Option<Node>), TranscodeError> {
        let Some(args) = args else {
            return Ok((None, None));
        };
        let (entries, block) = ArgumentList::normalize(args)?.split_block();
        let block = match block {
            Some(ArgumentEntry::BlockArgument { value, pass }) => Some(Node::new(
                NodeKind::BlockArgument {
                    expression: self.opt(value)?,
                    operator_loc: Span::null(),
                },
                self.spans.span(pass)?,
            )),
            _ => None,
        };
        let arguments = if entries.is_empty() {
            None
        } else {
            Some(boxed(self.arguments_node(entries, args)?))
        };
        Ok((arguments, block))
    }

    fn arguments_node(
        &self,
        entries: Vec<ArgumentEntry<'_>>,
        args: &LegacyNode,
    ) -> Result<Node, TranscodeError> {
        let mut flags = ArgumentsFlags::empty();
        match entries.iter().filter(|e| e.is_splat()).count() {
            0 => {}
            1 => flags |= ArgumentsFlags::CONTAINS_SPLAT,
            _ => flags |= ArgumentsFlags::CONTAINS_SPLAT | ArgumentsFlags::CONTAINS_MULTIPLE_SPLATS,
        }
        Ok(Node::new(
            NodeKind::Arguments {
                flags,
                arguments: self.argument_nodes(entries, args)?,
            },
            self.spans.span(args)?,
        ))
    }

    fn argument_nodes(
        &self,
        entries: Vec<ArgumentEntry<'_>>,
        args: &LegacyNode,
    ) -> Result<Vec<Node>, TranscodeError> {
        entries
            .into_iter()
            .map(|entry| match entry {
                ArgumentEntry::Positional(node) => self.node(node),
                ArgumentEntry::Splat { value, splat } => Ok(Node::new(
                    NodeKind::Splat {
                        operator_loc: Span::null(),
                        expression: Some(boxed(self.node(value)?)),
                    },
                    self.spans.opt_span(splat)?.unwrap_or_default(),
                )),
                ArgumentEntry::BlockArgument { .. } => {
                    Err(args.unexpected("argument list without a block argument"))
                }
            })
            .collect()
    }

    fn array(&self, node: &LegacyNode) -> Result<NodeKind, TranscodeError> {
        let list = ArgumentList::normalize(node)?;
        let flags = if list.splat_count() > 0 {
            ArrayFlags::CONTAINS_SPLAT
        } else {
            ArrayFlags::empty()
        };
        Ok(NodeKind::Array {
            flags,
            elements: self.argument_nodes(list.entries, node)?,
            opening_loc: Span::null(),
            closing_loc: Span::null(),
        })
    }

    /// `HASH` pairs alternate key and value; an absent key marks a `**splat`.
    fn hash_elements(&self, pairs: Option<&LegacyNode>) -> Result<Vec<Node>, TranscodeError> {
        let Some(pairs) = pairs else {
            return Ok(vec![]);
        };
        pairs.expect_kind(&[NodeType::List])?;
        if pairs.children.len() % 2 != 0 {
            return Err(pairs.unexpected("key/value pairs"));
        }
        (0..pairs.children.len())
            .step_by(2)
            .map(|i| {
                let value = pairs.node(i + 1)?;
                match pairs.opt_node(i)? {
                    Some(key) => {
                        let location = self.spans.span(key)?.cover(&self.spans.span(value)?);
                        Ok(Node::new(
                            NodeKind::Assoc {
                                key: boxed(self.node(key)?),
                                value: boxed(self.node(value)?),
                                operator_loc: Span::null(),
                            },
                            location,
                        ))
                    }
                    None => Ok(Node::new(
                        NodeKind::AssocSplat {
                            value: Some(boxed(self.node(value)?)),
                            operator_loc: Span::null(),
                        },
                        Span::null(),
                    )),
                }
            })
            .collect()
    }

    fn match_operator(
        &self,
        node: &LegacyNode,
        regexp: &LegacyNode,
        value: &LegacyNode,
        captures: Option<&LegacyNode>,
        location: Span,
    ) -> Result<Node, TranscodeError> {
        // MATCH2 has the regexp literal on the left; MATCH3 on the right.
        let (receiver, argument) = match node.kind {
            NodeType::Match2 => (regexp, value),
            _ => (value, regexp),
        };
        let call = Node::new(
            NodeKind::Call {
                flags: CallFlags::empty(),
                receiver: Some(boxed(self.node(receiver)?)),
                call_operator_loc: Span::null(),
                name: Symbol::mk("=~"),
                message_loc: Span::null(),
                opening_loc: Span::null(),
                arguments: Some(Node::boxed(
                    NodeKind::Arguments {
                        flags: ArgumentsFlags::empty(),
                        arguments: vec![self.node(argument)?],
                    },
                    self.spans.span(argument)?,
                )),
                closing_loc: Span::null(),
                block: None,
            },
            location,
        );
        let Some(captures) = captures else {
            return Ok(call);
        };
        let assignments = match captures.shape()? {
            Shape::Block { statements } => statements,
            _ => vec![captures],
        };
        let targets = assignments
            .into_iter()
            .map(|assignment| {
                let name = assignment.expect_kind(&[NodeType::Lasgn, NodeType::Dasgn])?.symbol(0)?;
                Ok(Node::new(
                    NodeKind::LocalVariableTarget {
                        name,
                        depth: self.depth(name),
                    },
                    Span::null(),
                ))
            })
            .collect::<Result<_, TranscodeError>>()?;
        Ok(Node::new(
            NodeKind::MatchWrite {
                call: boxed(call),
                targets,
            },
            location,
        ))
    }

    // Literals

    fn literal(
        &self,
        node: &LegacyNode,
        value: &Literal,
        location: Span,
    ) -> Result<NodeKind, TranscodeError> {
        let null = Span::null();
        Ok(match (node.kind, value) {
            (NodeType::Integer | NodeType::Float | NodeType::Rational, _) => numeric(value)
                .ok_or_else(|| {
                    node.unexpected(format!("numeric literal, not {}", value.type_name()))
                })?,
            (NodeType::Imaginary, Literal::Imaginary(inner)) => NodeKind::Imaginary {
                numeric: Node::boxed(
                    numeric(inner).ok_or_else(|| node.unexpected("numeric imaginary part"))?,
                    location,
                ),
            },
            (NodeType::Str, Literal::Str(s)) => NodeKind::String {
                flags: if self.options.frozen_string_literal {
                    StringFlags::FROZEN
                } else {
                    StringFlags::empty()
                },
                opening_loc: null,
                content_loc: null,
                closing_loc: null,
                unescaped: s.clone(),
            },
            (NodeType::Xstr, Literal::Str(s)) => NodeKind::XString {
                flags: StringFlags::empty(),
                opening_loc: null,
                content_loc: null,
                closing_loc: null,
                unescaped: s.clone(),
            },
            (NodeType::Regx, Literal::Regexp { source, options }) => NodeKind::RegularExpression {
                flags: regexp_flags(*options),
                opening_loc: null,
                content_loc: null,
                closing_loc: null,
                unescaped: source.clone(),
            },
            (NodeType::Match, Literal::Regexp { source, options }) => NodeKind::MatchLastLine {
                flags: regexp_flags(*options),
                opening_loc: null,
                content_loc: null,
                closing_loc: null,
                unescaped: source.clone(),
            },
            (NodeType::File, Literal::Str(path)) => NodeKind::SourceFile {
                flags: StringFlags::empty(),
                filepath: path.clone(),
            },
            _ => {
                return Err(node.unexpected(format!(
                    "literal matching {}, not {}",
                    node.kind,
                    value.type_name()
                )));
            }
        })
    }

    fn interpolation_parts(
        &self,
        leading: Option<&str>,
        head: Option<&LegacyNode>,
        tail: Option<&LegacyNode>,
    ) -> Result<Vec<Node>, TranscodeError> {
        let mut parts = vec![];
        if let Some(text) = leading.filter(|t| !t.is_empty()) {
            parts.push(Node::new(string_kind(text), Span::null()));
        }
        if let Some(head) = head {
            parts.push(self.interpolation_part(head)?);
        }
        if let Some(tail) = tail {
            let Shape::List { elements } = tail.expect_kind(&[NodeType::List])?.shape()? else {
                return Err(tail.unexpected("LIST"));
            };
            for fragment in elements {
                parts.push(self.interpolation_part(fragment)?);
            }
        }
        Ok(parts)
    }

    fn interpolation_part(&self, fragment: &LegacyNode) -> Result<Node, TranscodeError> {
        match (fragment.kind, fragment.shape()?) {
            (NodeType::Evstr, Shape::Wrapper { body }) => Ok(Node::new(
                NodeKind::EmbeddedStatements {
                    opening_loc: Span::null(),
                    statements: self.statements(body)?,
                    closing_loc: Span::null(),
                },
                self.spans.span(fragment)?,
            )),
            _ => self.node(fragment),
        }
    }

    /// A bare integer flip-flop bound is compared against `$.` by the legacy parser; undo that.
    fn flip_flop_operand(&self, operand: &LegacyNode) -> Result<Node, TranscodeError> {
        if self.options.unwrap_integer_flip_flop
            && let Some(integer) = line_number_comparison(operand)?
        {
            return self.node(integer);
        }
        self.node(operand)
    }

    // Scopes

    /// A block literal attached by `ITER`.
    fn block(&self, scope: &LegacyNode) -> Result<Node, TranscodeError> {
        let (locals, parameters, body) = self.block_parts(scope)?;
        Ok(Node::new(
            NodeKind::Block {
                locals,
                parameters,
                body,
                opening_loc: Span::null(),
                closing_loc: Span::null(),
            },
            self.spans.span(scope)?,
        ))
    }

    /// Locals, block parameters and body of a block or lambda `SCOPE`, which extends the
    /// current scope chain.
    #[allow(clippy::type_complexity)]
    fn block_parts(
        &self,
        scope: &LegacyNode,
    ) -> Result<(Vec<Symbol>, Option<Box<Node>>, Option<Box<Node>>), TranscodeError> {
        let Shape::Scope { table, args, body } = scope.expect_kind(&[NodeType::Scope])?.shape()?
        else {
            return Err(scope.unexpected("SCOPE"));
        };
        self.in_scope(table, false, |t| {
            let parameters = match args {
                Some(args) => match ParameterList::decode(table, args)? {
                    Some(list) => Some(boxed(t.block_parameters(&list, args)?)),
                    None => None,
                },
                None => None,
            };
            Ok((locals(table), parameters, t.scope_body(body)?))
        })
    }

    fn block_parameters(
        &self,
        list: &ParameterList<'_>,
        args: &LegacyNode,
    ) -> Result<Node, TranscodeError> {
        Ok(Node::new(
            NodeKind::BlockParameters {
                parameters: Some(boxed(self.parameters(list, args)?)),
                locals: list
                    .block_locals
                    .iter()
                    .map(|name| {
                        Node::new(NodeKind::BlockLocalVariable { name: *name }, Span::null())
                    })
                    .collect(),
                opening_loc: Span::null(),
                closing_loc: Span::null(),
            },
            self.spans.span(args)?,
        ))
    }

    fn parameters(
        &self,
        list: &ParameterList<'_>,
        args: &LegacyNode,
    ) -> Result<Node, TranscodeError> {
        let null = Span::null();
        let required = |param: &RequiredParam<'_>| match param {
            RequiredParam::Name(name) => {
                Ok(Node::new(NodeKind::RequiredParameter { name: *name }, null))
            }
            RequiredParam::Group(group) => self.target_group(group, TargetStyle::Parameter),
        };
        let requireds = list.requireds.iter().map(required).collect::<Result<_, _>>()?;
        let posts = list.posts.iter().map(required).collect::<Result<_, _>>()?;
        let optionals = list
            .optionals
            .iter()
            .map(|opt| {
                Ok(Node::new(
                    NodeKind::OptionalParameter {
                        name: opt.name,
                        name_loc: null,
                        operator_loc: null,
                        value: boxed(self.node(opt.value)?),
                    },
                    null,
                ))
            })
            .collect::<Result<_, TranscodeError>>()?;
        let rest = list.rest.map(|rest| {
            let kind = match rest {
                RestParam::Splat(name) => NodeKind::RestParameter {
                    name,
                    name_loc: null,
                    operator_loc: null,
                },
                RestParam::ImplicitComma => NodeKind::ImplicitRest,
            };
            Node::boxed(kind, null)
        });
        let keywords = list
            .keywords
            .iter()
            .map(|kw| {
                let kind = match kw.value {
                    None => NodeKind::RequiredKeywordParameter {
                        name: kw.name,
                        name_loc: null,
                    },
                    Some(value) => NodeKind::OptionalKeywordParameter {
                        name: kw.name,
                        name_loc: null,
                        value: boxed(self.node(value)?),
                    },
                };
                Ok(Node::new(kind, null))
            })
            .collect::<Result<_, TranscodeError>>()?;
        let keyword_rest = list.keyword_rest.map(|kwrest| {
            let kind = match kwrest {
                KeywordRestParam::Named(name) => NodeKind::KeywordRestParameter {
                    name,
                    name_loc: null,
                    operator_loc: null,
                },
                KeywordRestParam::NoKeywords => NodeKind::NoKeywordsParameter {
                    operator_loc: null,
                    keyword_loc: null,
                },
            };
            Node::boxed(kind, null)
        });
        let block = list.block.map(|name| {
            Node::boxed(
                NodeKind::BlockParameter {
                    name,
                    name_loc: null,
                    operator_loc: null,
                },
                null,
            )
        });
        Ok(Node::new(
            NodeKind::Parameters {
                requireds,
                optionals,
                rest,
                posts,
                keywords,
                keyword_rest,
                block,
            },
            self.spans.span(args)?,
        ))
    }

    /// Locals and body of a class, module or singleton-class `SCOPE`, which starts a new
    /// scope chain.
    fn definition_body(
        &self,
        scope: &LegacyNode,
    ) -> Result<(Vec<Symbol>, Option<Box<Node>>), TranscodeError> {
        let Shape::Scope { table, body, .. } = scope.expect_kind(&[NodeType::Scope])?.shape()?
        else {
            return Err(scope.unexpected("SCOPE"));
        };
        let body = self.in_scope(table, true, |t| t.scope_body(body))?;
        Ok((locals(table), body))
    }

    /// A class or module path, plus the name it declares. A path with no explicit parent
    /// (`class Foo`) is a plain constant read.
    fn class_path(&self, path: &LegacyNode) -> Result<(Box<Node>, Symbol), TranscodeError> {
        match (path.kind, path.shape()?) {
            (NodeType::Colon2, Shape::Colon { parent: None, name }) => Ok((
                Node::boxed(NodeKind::ConstantRead { name }, self.spans.span(path)?),
                name,
            )),
            (_, Shape::Colon { name, .. }) => Ok((boxed(self.node(path)?), name)),
            _ => Err(path.unexpected("COLON2 or COLON3")),
        }
    }
}

/// Scope locals as declared. Internal unnamed slots are dropped.
fn locals(table: &[Option<Symbol>]) -> Vec<Symbol> {
    table.iter().flatten().copied().collect()
}

/// A block literal wins over a `&blk` argument; a well-formed tree never carries both.
fn attach_block(
    node: &LegacyNode,
    pending: Option<Node>,
    block_argument: Option<Node>,
) -> Option<Box<Node>> {
    match (pending, block_argument) {
        (Some(block), Some(_)) => {
            warn!(
                position = %node.position,
                "call has both a block literal and a block argument; keeping the literal"
            );
            Some(boxed(block))
        }
        (Some(block), None) | (None, Some(block)) => Some(boxed(block)),
        (None, None) => None,
    }
}

/// `INTEGER == $.` (in either call form), as synthesized for `if 1..2`. Returns the integer.
fn line_number_comparison(operand: &LegacyNode) -> Result<Option<&LegacyNode>, TranscodeError> {
    if !matches!(operand.kind, NodeType::Call | NodeType::Opcall) {
        return Ok(None);
    }
    let Shape::Call {
        receiver: Some(receiver),
        name,
        args: Some(args),
    } = operand.shape()?
    else {
        return Ok(None);
    };
    if receiver.kind != NodeType::Integer || name.as_str() != "==" || args.kind != NodeType::List {
        return Ok(None);
    }
    let is_line_number = match args.children.as_slice() {
        [Child::Node(arg)] => arg.kind == NodeType::Gvar && arg.symbol(0)?.as_str() == "$.",
        _ => false,
    };
    Ok(is_line_number.then_some(receiver))
}

fn numeric(value: &Literal) -> Option<NodeKind> {
    match value {
        Literal::Int(value) => Some(NodeKind::Integer {
            flags: IntegerBaseFlags::DECIMAL,
            value: *value,
        }),
        Literal::Float(value) => Some(NodeKind::Float { value: *value }),
        Literal::Rational(numerator, denominator) => Some(NodeKind::Rational {
            flags: IntegerBaseFlags::DECIMAL,
            numerator: *numerator,
            denominator: *denominator,
        }),
        _ => None,
    }
}

fn string_kind(text: &str) -> NodeKind {
    NodeKind::String {
        flags: StringFlags::empty(),
        opening_loc: Span::null(),
        content_loc: Span::null(),
        closing_loc: Span::null(),
        unescaped: text.to_string(),
    }
}

fn symbol_kind(name: Symbol) -> NodeKind {
    NodeKind::Symbol {
        opening_loc: Span::null(),
        value_loc: Span::null(),
        closing_loc: Span::null(),
        unescaped: name.as_string(),
    }
}

fn range_flags(exclude_end: bool) -> RangeFlags {
    if exclude_end {
        RangeFlags::EXCLUDE_END
    } else {
        RangeFlags::empty()
    }
}

fn regexp_flags(options: u32) -> RegexpFlags {
    let mut flags = RegexpFlags::empty();
    if options & REGEXP_IGNORECASE != 0 {
        flags |= RegexpFlags::IGNORE_CASE;
    }
    if options & REGEXP_EXTENDED != 0 {
        flags |= RegexpFlags::EXTENDED;
    }
    if options & REGEXP_MULTILINE != 0 {
        flags |= RegexpFlags::MULTI_LINE;
    }
    flags
}
