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

/// Ruby's `Regexp::IGNORECASE`.
pub const REGEXP_IGNORECASE: u32 = 1;
/// Ruby's `Regexp::EXTENDED`.
pub const REGEXP_EXTENDED: u32 = 2;
/// Ruby's `Regexp::MULTILINE`.
pub const REGEXP_MULTILINE: u32 = 4;

/// A literal value carried as a leaf child of a legacy node (`INTEGER`, `STR`, `REGX`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Float(f64),
    /// numerator, denominator
    Rational(i64, i64),
    Imaginary(Box<Literal>),
    Str(String),
    Regexp { source: String, options: u32 },
}

impl Literal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "Integer",
            Literal::Float(_) => "Float",
            Literal::Rational(..) => "Rational",
            Literal::Imaginary(_) => "Complex",
            Literal::Str(_) => "String",
            Literal::Regexp { .. } => "Regexp",
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::Rational(n, d) => write!(f, "({n}/{d})"),
            Literal::Imaginary(inner) => write!(f, "({inner}i)"),
            Literal::Str(s) => write!(f, "{s:?}"),
            Literal::Regexp { source, options } => {
                write!(f, "/{source}/")?;
                if options & REGEXP_IGNORECASE != 0 {
                    f.write_str("i")?;
                }
                if options & REGEXP_EXTENDED != 0 {
                    f.write_str("x")?;
                }
                if options & REGEXP_MULTILINE != 0 {
                    f.write_str("m")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wire_form_is_externally_tagged() {
        let lit: Literal = serde_json::from_str(r#"{"rational": [3, 2]}"#).unwrap();
        assert_eq!(lit, Literal::Rational(3, 2));

        let lit: Literal = serde_json::from_str(r#"{"imaginary": {"float": 1.5}}"#).unwrap();
        assert_eq!(lit, Literal::Imaginary(Box::new(Literal::Float(1.5))));

        let lit: Literal =
            serde_json::from_str(r#"{"regexp": {"source": "a+", "options": 5}}"#).unwrap();
        assert_eq!(
            lit,
            Literal::Regexp {
                source: "a+".into(),
                options: REGEXP_IGNORECASE | REGEXP_MULTILINE
            }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Literal::Int(42).to_string(), "42");
        assert_eq!(Literal::Float(2.0).to_string(), "2.0");
        assert_eq!(
            Literal::Imaginary(Box::new(Literal::Rational(1, 3))).to_string(),
            "((1/3)i)"
        );
        assert_eq!(
            Literal::Regexp {
                source: "x".into(),
                options: REGEXP_EXTENDED
            }
            .to_string(),
            "/x/x"
        );
    }
}
