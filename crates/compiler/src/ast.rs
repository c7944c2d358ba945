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

//! The canonical tree: explicitly-kinded nodes carrying byte spans.
//!
//! Variant and field names follow Prism. Sub-spans (keyword, operator and delimiter locations)
//! that the legacy tree carries no information for are `Span::null()`.

use arbor_common::Span;
use arbor_var::Symbol;
use serde::Serialize;
use strum::IntoStaticStr;

macro_rules! node_flags {
    ($(#[$meta:meta])* $name:ident { $($flag:ident = $bit:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            $(pub const $flag: $name = $name($bit);)*

            pub const fn empty() -> Self {
                $name(0)
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub fn names(self) -> Vec<&'static str> {
                let mut names = vec![];
                $(if self.0 & $bit != 0 {
                    names.push(stringify!($flag));
                })*
                names
            }
        }

        impl std::ops::BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: Self) -> Self {
                $name(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

node_flags!(CallFlags {
    SAFE_NAVIGATION = 1,
    VARIABLE_CALL = 2,
    ATTRIBUTE_WRITE = 4,
    IGNORE_VISIBILITY = 8,
});

node_flags!(LoopFlags { BEGIN_MODIFIER = 1 });

node_flags!(RangeFlags { EXCLUDE_END = 1 });

node_flags!(IntegerBaseFlags {
    BINARY = 1,
    DECIMAL = 2,
    OCTAL = 4,
    HEXADECIMAL = 8,
});

node_flags!(StringFlags {
    FORCED_UTF8_ENCODING = 1,
    FORCED_BINARY_ENCODING = 2,
    FROZEN = 4,
    MUTABLE = 8,
});

node_flags!(RegexpFlags {
    IGNORE_CASE = 1,
    EXTENDED = 2,
    MULTI_LINE = 4,
    ONCE = 8,
});

node_flags!(ArgumentsFlags {
    CONTAINS_KEYWORDS = 1,
    CONTAINS_KEYWORD_SPLAT = 2,
    CONTAINS_SPLAT = 4,
    CONTAINS_MULTIPLE_SPLATS = 8,
});

node_flags!(ArrayFlags { CONTAINS_SPLAT = 1 });

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub location: Span,
}

impl Node {
    pub fn new(kind: NodeKind, location: Span) -> Self {
        Self { kind, location }
    }

    pub fn boxed(kind: NodeKind, location: Span) -> Box<Self> {
        Box::new(Self::new(kind, location))
    }

    /// The Prism-style type name, e.g. `CallNode`.
    pub fn type_name(&self) -> String {
        let variant: &'static str = (&self.kind).into();
        format!("{variant}Node")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, IntoStaticStr)]
pub enum NodeKind {
    Program {
        locals: Vec<Symbol>,
        statements: Box<Node>,
    },
    Statements {
        body: Vec<Node>,
    },

    // Conditionals and loops
    If {
        if_keyword_loc: Span,
        predicate: Box<Node>,
        then_keyword_loc: Span,
        statements: Option<Box<Node>>,
        /// A nested `If` for `elsif`, or an `Else`.
        consequent: Option<Box<Node>>,
        end_keyword_loc: Span,
    },
    Unless {
        keyword_loc: Span,
        predicate: Box<Node>,
        then_keyword_loc: Span,
        statements: Option<Box<Node>>,
        consequent: Option<Box<Node>>,
        end_keyword_loc: Span,
    },
    Else {
        else_keyword_loc: Span,
        statements: Option<Box<Node>>,
        end_keyword_loc: Span,
    },
    Case {
        predicate: Option<Box<Node>>,
        conditions: Vec<Node>,
        consequent: Option<Box<Node>>,
        case_keyword_loc: Span,
        end_keyword_loc: Span,
    },
    When {
        keyword_loc: Span,
        conditions: Vec<Node>,
        then_keyword_loc: Span,
        statements: Option<Box<Node>>,
    },
    While {
        flags: LoopFlags,
        keyword_loc: Span,
        closing_loc: Span,
        predicate: Box<Node>,
        statements: Option<Box<Node>>,
    },
    Until {
        flags: LoopFlags,
        keyword_loc: Span,
        closing_loc: Span,
        predicate: Box<Node>,
        statements: Option<Box<Node>>,
    },
    For {
        index: Box<Node>,
        collection: Box<Node>,
        statements: Option<Box<Node>>,
        for_keyword_loc: Span,
        in_keyword_loc: Span,
        do_keyword_loc: Span,
        end_keyword_loc: Span,
    },
    Break {
        arguments: Option<Box<Node>>,
        keyword_loc: Span,
    },
    Next {
        arguments: Option<Box<Node>>,
        keyword_loc: Span,
    },
    Return {
        keyword_loc: Span,
        arguments: Option<Box<Node>>,
    },
    Redo,
    Retry,

    // Exceptions
    Begin {
        begin_keyword_loc: Span,
        statements: Option<Box<Node>>,
        rescue_clause: Option<Box<Node>>,
        else_clause: Option<Box<Node>>,
        ensure_clause: Option<Box<Node>>,
        end_keyword_loc: Span,
    },
    Rescue {
        keyword_loc: Span,
        exceptions: Vec<Node>,
        operator_loc: Span,
        reference: Option<Box<Node>>,
        statements: Option<Box<Node>>,
        consequent: Option<Box<Node>>,
    },
    Ensure {
        ensure_keyword_loc: Span,
        statements: Option<Box<Node>>,
        end_keyword_loc: Span,
    },

    And {
        left: Box<Node>,
        right: Box<Node>,
        operator_loc: Span,
    },
    Or {
        left: Box<Node>,
        right: Box<Node>,
        operator_loc: Span,
    },

    // Destructuring
    MultiWrite {
        lefts: Vec<Node>,
        rest: Option<Box<Node>>,
        rights: Vec<Node>,
        lparen_loc: Span,
        rparen_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    MultiTarget {
        lefts: Vec<Node>,
        rest: Option<Box<Node>>,
        rights: Vec<Node>,
        lparen_loc: Span,
        rparen_loc: Span,
    },
    Splat {
        operator_loc: Span,
        expression: Option<Box<Node>>,
    },
    ImplicitRest,

    // Variables
    LocalVariableRead {
        name: Symbol,
        depth: u32,
    },
    LocalVariableWrite {
        name: Symbol,
        depth: u32,
        name_loc: Span,
        value: Box<Node>,
        operator_loc: Span,
    },
    LocalVariableTarget {
        name: Symbol,
        depth: u32,
    },
    LocalVariableAndWrite {
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
        name: Symbol,
        depth: u32,
    },
    LocalVariableOrWrite {
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
        name: Symbol,
        depth: u32,
    },
    LocalVariableOperatorWrite {
        name_loc: Span,
        binary_operator_loc: Span,
        value: Box<Node>,
        name: Symbol,
        binary_operator: Symbol,
        depth: u32,
    },
    InstanceVariableRead {
        name: Symbol,
    },
    InstanceVariableWrite {
        name: Symbol,
        name_loc: Span,
        value: Box<Node>,
        operator_loc: Span,
    },
    InstanceVariableTarget {
        name: Symbol,
    },
    InstanceVariableAndWrite {
        name: Symbol,
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    InstanceVariableOrWrite {
        name: Symbol,
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    InstanceVariableOperatorWrite {
        name: Symbol,
        name_loc: Span,
        binary_operator_loc: Span,
        value: Box<Node>,
        binary_operator: Symbol,
    },
    ClassVariableRead {
        name: Symbol,
    },
    ClassVariableWrite {
        name: Symbol,
        name_loc: Span,
        value: Box<Node>,
        operator_loc: Span,
    },
    ClassVariableTarget {
        name: Symbol,
    },
    ClassVariableAndWrite {
        name: Symbol,
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    ClassVariableOrWrite {
        name: Symbol,
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    ClassVariableOperatorWrite {
        name: Symbol,
        name_loc: Span,
        binary_operator_loc: Span,
        value: Box<Node>,
        binary_operator: Symbol,
    },
    GlobalVariableRead {
        name: Symbol,
    },
    GlobalVariableWrite {
        name: Symbol,
        name_loc: Span,
        value: Box<Node>,
        operator_loc: Span,
    },
    GlobalVariableTarget {
        name: Symbol,
    },
    GlobalVariableAndWrite {
        name: Symbol,
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    GlobalVariableOrWrite {
        name: Symbol,
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    GlobalVariableOperatorWrite {
        name: Symbol,
        name_loc: Span,
        binary_operator_loc: Span,
        value: Box<Node>,
        binary_operator: Symbol,
    },
    ConstantRead {
        name: Symbol,
    },
    ConstantWrite {
        name: Symbol,
        name_loc: Span,
        value: Box<Node>,
        operator_loc: Span,
    },
    ConstantTarget {
        name: Symbol,
    },
    ConstantAndWrite {
        name: Symbol,
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    ConstantOrWrite {
        name: Symbol,
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    ConstantOperatorWrite {
        name: Symbol,
        name_loc: Span,
        binary_operator_loc: Span,
        value: Box<Node>,
        binary_operator: Symbol,
    },
    ConstantPath {
        parent: Option<Box<Node>>,
        name: Symbol,
        delimiter_loc: Span,
        name_loc: Span,
    },
    ConstantPathTarget {
        parent: Option<Box<Node>>,
        name: Symbol,
        delimiter_loc: Span,
        name_loc: Span,
    },
    ConstantPathWrite {
        target: Box<Node>,
        operator_loc: Span,
        value: Box<Node>,
    },
    ConstantPathAndWrite {
        target: Box<Node>,
        operator_loc: Span,
        value: Box<Node>,
    },
    ConstantPathOrWrite {
        target: Box<Node>,
        operator_loc: Span,
        value: Box<Node>,
    },
    ConstantPathOperatorWrite {
        target: Box<Node>,
        binary_operator_loc: Span,
        value: Box<Node>,
        binary_operator: Symbol,
    },

    // Calls
    Call {
        flags: CallFlags,
        receiver: Option<Box<Node>>,
        call_operator_loc: Span,
        name: Symbol,
        message_loc: Span,
        opening_loc: Span,
        arguments: Option<Box<Node>>,
        closing_loc: Span,
        block: Option<Box<Node>>,
    },
    CallAndWrite {
        flags: CallFlags,
        receiver: Option<Box<Node>>,
        call_operator_loc: Span,
        message_loc: Span,
        read_name: Symbol,
        write_name: Symbol,
        operator_loc: Span,
        value: Box<Node>,
    },
    CallOrWrite {
        flags: CallFlags,
        receiver: Option<Box<Node>>,
        call_operator_loc: Span,
        message_loc: Span,
        read_name: Symbol,
        write_name: Symbol,
        operator_loc: Span,
        value: Box<Node>,
    },
    CallOperatorWrite {
        flags: CallFlags,
        receiver: Option<Box<Node>>,
        call_operator_loc: Span,
        message_loc: Span,
        read_name: Symbol,
        write_name: Symbol,
        binary_operator: Symbol,
        binary_operator_loc: Span,
        value: Box<Node>,
    },
    IndexAndWrite {
        flags: CallFlags,
        receiver: Option<Box<Node>>,
        call_operator_loc: Span,
        opening_loc: Span,
        arguments: Option<Box<Node>>,
        closing_loc: Span,
        block: Option<Box<Node>>,
        operator_loc: Span,
        value: Box<Node>,
    },
    IndexOrWrite {
        flags: CallFlags,
        receiver: Option<Box<Node>>,
        call_operator_loc: Span,
        opening_loc: Span,
        arguments: Option<Box<Node>>,
        closing_loc: Span,
        block: Option<Box<Node>>,
        operator_loc: Span,
        value: Box<Node>,
    },
    IndexOperatorWrite {
        flags: CallFlags,
        receiver: Option<Box<Node>>,
        call_operator_loc: Span,
        opening_loc: Span,
        arguments: Option<Box<Node>>,
        closing_loc: Span,
        block: Option<Box<Node>>,
        binary_operator: Symbol,
        binary_operator_loc: Span,
        value: Box<Node>,
    },
    /// `/(?<year>\d+)/ =~ s`: the match call plus the locals the named captures bind.
    MatchWrite {
        call: Box<Node>,
        targets: Vec<Node>,
    },
    Arguments {
        flags: ArgumentsFlags,
        arguments: Vec<Node>,
    },
    BlockArgument {
        expression: Option<Box<Node>>,
        operator_loc: Span,
    },
    Super {
        keyword_loc: Span,
        lparen_loc: Span,
        arguments: Option<Box<Node>>,
        rparen_loc: Span,
        block: Option<Box<Node>>,
    },
    ForwardingSuper {
        block: Option<Box<Node>>,
    },
    Yield {
        keyword_loc: Span,
        lparen_loc: Span,
        arguments: Option<Box<Node>>,
        rparen_loc: Span,
    },

    // Blocks and parameters
    Block {
        locals: Vec<Symbol>,
        parameters: Option<Box<Node>>,
        body: Option<Box<Node>>,
        opening_loc: Span,
        closing_loc: Span,
    },
    Lambda {
        locals: Vec<Symbol>,
        operator_loc: Span,
        opening_loc: Span,
        closing_loc: Span,
        parameters: Option<Box<Node>>,
        body: Option<Box<Node>>,
    },
    BlockParameters {
        parameters: Option<Box<Node>>,
        locals: Vec<Node>,
        opening_loc: Span,
        closing_loc: Span,
    },
    BlockLocalVariable {
        name: Symbol,
    },
    Parameters {
        requireds: Vec<Node>,
        optionals: Vec<Node>,
        rest: Option<Box<Node>>,
        posts: Vec<Node>,
        keywords: Vec<Node>,
        keyword_rest: Option<Box<Node>>,
        block: Option<Box<Node>>,
    },
    RequiredParameter {
        name: Symbol,
    },
    OptionalParameter {
        name: Symbol,
        name_loc: Span,
        operator_loc: Span,
        value: Box<Node>,
    },
    RestParameter {
        name: Option<Symbol>,
        name_loc: Span,
        operator_loc: Span,
    },
    RequiredKeywordParameter {
        name: Symbol,
        name_loc: Span,
    },
    OptionalKeywordParameter {
        name: Symbol,
        name_loc: Span,
        value: Box<Node>,
    },
    KeywordRestParameter {
        name: Option<Symbol>,
        name_loc: Span,
        operator_loc: Span,
    },
    NoKeywordsParameter {
        operator_loc: Span,
        keyword_loc: Span,
    },
    BlockParameter {
        name: Option<Symbol>,
        name_loc: Span,
        operator_loc: Span,
    },

    // Collections
    Array {
        flags: ArrayFlags,
        elements: Vec<Node>,
        opening_loc: Span,
        closing_loc: Span,
    },
    Hash {
        opening_loc: Span,
        elements: Vec<Node>,
        closing_loc: Span,
    },
    Assoc {
        key: Box<Node>,
        value: Box<Node>,
        operator_loc: Span,
    },
    AssocSplat {
        value: Option<Box<Node>>,
        operator_loc: Span,
    },
    Range {
        flags: RangeFlags,
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
        operator_loc: Span,
    },
    FlipFlop {
        flags: RangeFlags,
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
        operator_loc: Span,
    },

    // Strings, symbols and regular expressions
    String {
        flags: StringFlags,
        opening_loc: Span,
        content_loc: Span,
        closing_loc: Span,
        unescaped: String,
    },
    XString {
        flags: StringFlags,
        opening_loc: Span,
        content_loc: Span,
        closing_loc: Span,
        unescaped: String,
    },
    InterpolatedString {
        flags: StringFlags,
        opening_loc: Span,
        parts: Vec<Node>,
        closing_loc: Span,
    },
    InterpolatedXString {
        opening_loc: Span,
        parts: Vec<Node>,
        closing_loc: Span,
    },
    InterpolatedSymbol {
        opening_loc: Span,
        parts: Vec<Node>,
        closing_loc: Span,
    },
    InterpolatedRegularExpression {
        flags: RegexpFlags,
        opening_loc: Span,
        parts: Vec<Node>,
        closing_loc: Span,
    },
    EmbeddedStatements {
        opening_loc: Span,
        statements: Option<Box<Node>>,
        closing_loc: Span,
    },
    RegularExpression {
        flags: RegexpFlags,
        opening_loc: Span,
        content_loc: Span,
        closing_loc: Span,
        unescaped: String,
    },
    /// A bare regexp literal as a condition, matched against `$_`.
    MatchLastLine {
        flags: RegexpFlags,
        opening_loc: Span,
        content_loc: Span,
        closing_loc: Span,
        unescaped: String,
    },
    Symbol {
        opening_loc: Span,
        value_loc: Span,
        closing_loc: Span,
        unescaped: String,
    },
    NumberedReference {
        number: u32,
    },
    BackReference {
        name: Symbol,
    },

    // Numbers
    Integer {
        flags: IntegerBaseFlags,
        value: i64,
    },
    Float {
        value: f64,
    },
    Rational {
        flags: IntegerBaseFlags,
        numerator: i64,
        denominator: i64,
    },
    Imaginary {
        numeric: Box<Node>,
    },

    // Definitions
    Def {
        name: Symbol,
        name_loc: Span,
        receiver: Option<Box<Node>>,
        parameters: Option<Box<Node>>,
        body: Option<Box<Node>>,
        locals: Vec<Symbol>,
        def_keyword_loc: Span,
        operator_loc: Span,
        lparen_loc: Span,
        rparen_loc: Span,
        equal_loc: Span,
        end_keyword_loc: Span,
    },
    Class {
        locals: Vec<Symbol>,
        class_keyword_loc: Span,
        constant_path: Box<Node>,
        inheritance_operator_loc: Span,
        superclass: Option<Box<Node>>,
        body: Option<Box<Node>>,
        end_keyword_loc: Span,
        name: Symbol,
    },
    Module {
        locals: Vec<Symbol>,
        module_keyword_loc: Span,
        constant_path: Box<Node>,
        body: Option<Box<Node>>,
        end_keyword_loc: Span,
        name: Symbol,
    },
    SingletonClass {
        locals: Vec<Symbol>,
        class_keyword_loc: Span,
        operator_loc: Span,
        expression: Box<Node>,
        body: Option<Box<Node>>,
        end_keyword_loc: Span,
    },
    AliasMethod {
        new_name: Box<Node>,
        old_name: Box<Node>,
        keyword_loc: Span,
    },
    AliasGlobalVariable {
        new_name: Box<Node>,
        old_name: Box<Node>,
        keyword_loc: Span,
    },
    Undef {
        names: Vec<Node>,
        keyword_loc: Span,
    },

    // Keywords and pseudo-variables
    #[strum(serialize = "Self")]
    #[serde(rename = "Self")]
    SelfRef,
    Nil,
    True,
    False,
    SourceFile {
        flags: StringFlags,
        filepath: String,
    },
    SourceLine,
    SourceEncoding,
    Defined {
        lparen_loc: Span,
        value: Box<Node>,
        rparen_loc: Span,
        keyword_loc: Span,
    },
    PostExecution {
        statements: Option<Box<Node>>,
        keyword_loc: Span,
        opening_loc: Span,
        closing_loc: Span,
    },
}
