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

/// Maps 1-based line numbers to the byte offset at which each physical line starts.
///
/// Built once per source text and never mutated afterward, so one index can be shared by any
/// number of concurrent transcodings of the same source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceIndex {
    /// `table[i]` is the byte offset of the first byte of line `i + 1`.
    table: Vec<usize>,
    source_len: usize,
}

impl SourceIndex {
    /// Build from the physical lines of a source, each including its line terminator.
    pub fn build<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut offset = 0;
        let mut table = vec![];
        for line in lines {
            table.push(offset);
            offset += line.as_ref().len();
        }
        Self {
            table,
            source_len: offset,
        }
    }

    pub fn from_source(source: &str) -> Self {
        Self::build(source.split_inclusive('\n'))
    }

    /// Byte offset of `column` on the 1-based `line`, or `None` when the line is outside the
    /// table.
    pub fn resolve(&self, line: usize, column: usize) -> Option<usize> {
        let start = self.table.get(line.checked_sub(1)?)?;
        Some(start + column)
    }

    pub fn line_count(&self) -> usize {
        self.table.len()
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn line_starts(&self) -> &[usize] {
        &self.table
    }
}
