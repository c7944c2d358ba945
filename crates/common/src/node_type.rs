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

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The kind tag of a legacy node, as reported by `RubyVM::AbstractSyntaxTree::Node#type`.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Scope,
    Block,
    If,
    Unless,
    Case,
    #[strum(serialize = "CASE2")]
    Case2,
    #[strum(serialize = "CASE3")]
    Case3,
    When,
    In,
    While,
    Until,
    Iter,
    For,
    ForMasgn,
    Break,
    Next,
    Redo,
    Retry,
    Begin,
    Rescue,
    Resbody,
    Ensure,
    And,
    Or,
    Masgn,
    Lasgn,
    Dasgn,
    Gasgn,
    Iasgn,
    Cdecl,
    Cvasgn,
    #[strum(serialize = "OP_ASGN1")]
    OpAsgn1,
    #[strum(serialize = "OP_ASGN2")]
    OpAsgn2,
    OpAsgnAnd,
    OpAsgnOr,
    OpCdecl,
    Call,
    Opcall,
    Fcall,
    Vcall,
    Qcall,
    Super,
    Zsuper,
    List,
    Zlist,
    Hash,
    Return,
    Yield,
    Lvar,
    Dvar,
    Gvar,
    Ivar,
    Const,
    Cvar,
    NthRef,
    BackRef,
    Match,
    #[strum(serialize = "MATCH2")]
    Match2,
    #[strum(serialize = "MATCH3")]
    Match3,
    Integer,
    Float,
    Rational,
    Imaginary,
    Str,
    Dstr,
    Xstr,
    Dxstr,
    Evstr,
    Regx,
    Dregx,
    Once,
    Args,
    ArgsAux,
    OptArg,
    KwArg,
    Postarg,
    Argscat,
    Argspush,
    Splat,
    BlockPass,
    Defn,
    Defs,
    Alias,
    Valias,
    Undef,
    Class,
    Module,
    Sclass,
    #[strum(serialize = "COLON2")]
    Colon2,
    #[strum(serialize = "COLON3")]
    Colon3,
    #[strum(serialize = "DOT2")]
    Dot2,
    #[strum(serialize = "DOT3")]
    Dot3,
    #[strum(serialize = "FLIP2")]
    Flip2,
    #[strum(serialize = "FLIP3")]
    Flip3,
    #[strum(serialize = "SELF")]
    SelfRef,
    Nil,
    True,
    False,
    Errinfo,
    Defined,
    Postexe,
    Sym,
    Dsym,
    Attrasgn,
    Lambda,
    Aryptn,
    Hshptn,
    Fndptn,
    Error,
    Line,
    File,
    Encoding,
}

impl NodeType {
    /// Kinds that assign a single variable or constant and carry `[vid, value]`.
    pub fn is_simple_assignment(&self) -> bool {
        matches!(
            self,
            NodeType::Lasgn
                | NodeType::Dasgn
                | NodeType::Iasgn
                | NodeType::Cvasgn
                | NodeType::Gasgn
                | NodeType::Cdecl
        )
    }

    pub fn is_call(&self) -> bool {
        matches!(
            self,
            NodeType::Call
                | NodeType::Opcall
                | NodeType::Qcall
                | NodeType::Fcall
                | NodeType::Vcall
                | NodeType::Super
                | NodeType::Zsuper
                | NodeType::Lambda
        )
    }
}

impl Serialize for NodeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.into())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(deserializer)?;
        NodeType::from_str(&s)
            .map_err(|_| serde::de::Error::custom(format!("unknown node type {s}")))
    }
}
