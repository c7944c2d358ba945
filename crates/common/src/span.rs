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

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A byte range in the source text.
///
/// `Span::null()` (offset 0, length 0) means "position unknown". It is used for sub-parts the
/// legacy tree carries no location for, and compares equal to any span under structural
/// comparison.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub length: usize,
}

impl Span {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self {
            start,
            length: end.saturating_sub(start),
        }
    }

    pub const fn null() -> Self {
        Self {
            start: 0,
            length: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.start == 0 && self.length == 0
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// The smallest span containing both. A null side contributes nothing.
    pub fn cover(&self, other: &Span) -> Span {
        match (self.is_null(), other.is_null()) {
            (true, _) => *other,
            (_, true) => *self,
            _ => Span::from_bounds(self.start.min(other.start), self.end().max(other.end())),
        }
    }

    /// Whether this span may stand in for `other` when comparing trees.
    pub fn matches(&self, other: &Span) -> bool {
        self.is_null() || other.is_null() || self == other
    }

    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end())
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return f.write_str("(null)");
        }
        write!(f, "({}...{})", self.start, self.end())
    }
}

/// The line/column bounds a legacy node was reported at. Lines are 1-based, columns are
/// 0-based byte offsets within the line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub first_line: usize,
    pub first_column: usize,
    pub last_line: usize,
    pub last_column: usize,
}

impl Position {
    pub fn new(
        first_line: usize,
        first_column: usize,
        last_line: usize,
        last_column: usize,
    ) -> Self {
        Self {
            first_line,
            first_column,
            last_line,
            last_column,
        }
    }

    /// Same start and end point: the legacy encoder had nothing to report.
    pub fn is_degenerate(&self) -> bool {
        self.first_line == self.last_line && self.first_column == self.last_column
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.first_line, self.first_column, self.last_line, self.last_column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(Span::new(2, 3), Span::new(10, 1), Span::new(2, 9); "disjoint")]
    #[test_case(Span::new(4, 10), Span::new(6, 2), Span::new(4, 10); "nested")]
    #[test_case(Span::null(), Span::new(6, 2), Span::new(6, 2); "null left")]
    #[test_case(Span::new(6, 2), Span::null(), Span::new(6, 2); "null right")]
    fn test_cover(a: Span, b: Span, expected: Span) {
        assert_eq!(a.cover(&b), expected);
    }

    #[test]
    fn test_null_matches_anything() {
        assert!(Span::null().matches(&Span::new(5, 5)));
        assert!(Span::new(5, 5).matches(&Span::null()));
        assert!(!Span::new(5, 5).matches(&Span::new(5, 4)));
    }

    #[test]
    fn test_slice() {
        let src = "foo(bar)";
        assert_eq!(Span::new(4, 3).slice(src), Some("bar"));
        assert_eq!(Span::new(7, 5).slice(src), None);
    }

    #[test]
    fn test_degenerate_position() {
        assert!(Position::new(3, 4, 3, 4).is_degenerate());
        assert!(!Position::new(3, 4, 4, 4).is_degenerate());
        assert!(!Position::new(3, 4, 3, 5).is_degenerate());
    }
}
