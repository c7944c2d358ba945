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

//! Transcoding of legacy syntax trees into the canonical tree.

mod args;
mod ast;
mod compare;
mod location;
mod params;
mod targets;
mod transcode;

pub use crate::args::{ArgumentEntry, ArgumentList};
pub use crate::ast::{
    ArgumentsFlags, ArrayFlags, CallFlags, IntegerBaseFlags, LoopFlags, Node, NodeKind,
    RangeFlags, RegexpFlags, StringFlags,
};
pub use crate::compare::{Mismatch, compare, compare_json, structurally_eq, to_tree_string};
pub use crate::location::SpanResolver;
pub use crate::params::{
    KeywordParam, KeywordRestParam, OptionalParam, ParameterList, RequiredParam, RestParam,
    skip_internal_keyword_slot,
};
pub use crate::targets::{GroupRest, Target, TargetGroup, TargetStyle};
pub use crate::transcode::{LocalScope, Transcoder};
pub use arbor_common::{SourceIndex, Span, TranscodeError, TranscodeOptions};

use arbor_legacy::LegacyNode;
use tracing::debug;

/// Transcode a program root (a `SCOPE`) against an index of the source it was parsed from.
pub fn transcode(
    root: &LegacyNode,
    index: &SourceIndex,
    options: &TranscodeOptions,
) -> Result<Node, TranscodeError> {
    debug!(kind = %root.kind, lines = index.line_count(), "transcoding program");
    Transcoder::new(index, options).program(root)
}

/// As [`transcode`], building the source index from `source` first.
pub fn transcode_source(
    root: &LegacyNode,
    source: &str,
    options: &TranscodeOptions,
) -> Result<Node, TranscodeError> {
    transcode(root, &SourceIndex::from_source(source), options)
}
