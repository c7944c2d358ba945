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

//! Line/column bounds to byte spans.

use arbor_common::{SourceIndex, Span, TranscodeError};
use arbor_legacy::LegacyNode;

#[derive(Copy, Clone, Debug)]
pub struct SpanResolver<'a> {
    index: &'a SourceIndex,
}

impl<'a> SpanResolver<'a> {
    pub fn new(index: &'a SourceIndex) -> Self {
        Self { index }
    }

    /// The byte span a node covers. Degenerate bounds (start point equal to end point) carry
    /// no information and resolve to the null span rather than to an empty range.
    pub fn span(&self, node: &LegacyNode) -> Result<Span, TranscodeError> {
        let pos = node.position;
        if pos.is_degenerate() {
            return Ok(Span::null());
        }
        let out_of_source = || node.unexpected("a position within the source");
        let start = self
            .index
            .resolve(pos.first_line, pos.first_column)
            .ok_or_else(out_of_source)?;
        let end = self
            .index
            .resolve(pos.last_line, pos.last_column)
            .ok_or_else(out_of_source)?;
        if end < start || end > self.index.source_len() {
            return Err(out_of_source());
        }
        Ok(Span::from_bounds(start, end))
    }

    pub fn opt_span(&self, node: Option<&LegacyNode>) -> Result<Option<Span>, TranscodeError> {
        node.map(|n| self.span(n)).transpose()
    }
}
