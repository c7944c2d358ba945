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

use crate::{NodeType, Position};
use thiserror::Error;

/// Why a transcoding was abandoned. There is no partial output: either error aborts the whole
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// The kind is recognized but has no canonical mapping yet.
    #[error("Node {kind} is not supported (at {position})")]
    NotSupportedKind { kind: NodeType, position: Position },
    /// The kind (or the atom in one of its slots) cannot appear at this position in a
    /// well-formed legacy tree.
    #[error("{expected} expected, found {found} (at {position})")]
    UnexpectedKind {
        expected: String,
        found: NodeType,
        position: Position,
    },
}

impl TranscodeError {
    pub fn not_supported(kind: NodeType, position: Position) -> Self {
        TranscodeError::NotSupportedKind { kind, position }
    }

    pub fn unexpected(expected: impl Into<String>, found: NodeType, position: Position) -> Self {
        TranscodeError::UnexpectedKind {
            expected: expected.into(),
            found,
            position,
        }
    }

    pub fn kind(&self) -> NodeType {
        match self {
            TranscodeError::NotSupportedKind { kind, .. } => *kind,
            TranscodeError::UnexpectedKind { found, .. } => *found,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            TranscodeError::NotSupportedKind { position, .. }
            | TranscodeError::UnexpectedKind { position, .. } => *position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages() {
        let pos = Position::new(1, 0, 1, 5);
        assert_eq!(
            TranscodeError::not_supported(NodeType::Case3, pos).to_string(),
            "Node CASE3 is not supported (at 1:0-1:5)"
        );
        assert_eq!(
            TranscodeError::unexpected("SCOPE", NodeType::Block, pos).to_string(),
            "SCOPE expected, found BLOCK (at 1:0-1:5)"
        );
    }
}
