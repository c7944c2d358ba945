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

/// Knobs that change the shape of the produced tree without changing its meaning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeOptions {
    /// The source carries `# frozen_string_literal: true`; plain string literals get the
    /// `FROZEN` flag.
    pub frozen_string_literal: bool,
    /// The legacy parser rewrites an integer flip-flop operand `n` into `$. == n`. When set,
    /// that comparison is folded back into the integer literal the source actually contains.
    pub unwrap_integer_flip_flop: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            frozen_string_literal: false,
            unwrap_integer_flip_flop: true,
        }
    }
}
