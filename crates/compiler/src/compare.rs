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

//! Structural comparison of canonical trees.
//!
//! Trees are compared through their serialized form, so a tree produced by another parser and
//! handed over as JSON compares the same way as one built in-process. A null span on either
//! side matches any span.

use crate::ast::Node;
use arbor_common::Span;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Write;
use thiserror::Error;

/// The first difference found between two trees. `path` names the field, e.g.
/// `statements.body[0].predicate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {detail}")]
pub struct Mismatch {
    pub path: String,
    pub detail: String,
}

impl Mismatch {
    fn at(path: &str, detail: impl Into<String>) -> Self {
        Self {
            path: if path.is_empty() {
                "(root)".to_string()
            } else {
                path.to_string()
            },
            detail: detail.into(),
        }
    }
}

pub fn compare(expected: &Node, actual: &Node) -> Result<(), Mismatch> {
    let expected = serialize(expected)?;
    let actual = serialize(actual)?;
    compare_json(&expected, &actual)
}

pub fn structurally_eq(expected: &Node, actual: &Node) -> bool {
    compare(expected, actual).is_ok()
}

/// Compare two serialized trees. Either may come from outside this crate.
pub fn compare_json(expected: &Value, actual: &Value) -> Result<(), Mismatch> {
    compare_values("", expected, actual)
}

fn serialize(node: &Node) -> Result<Value, Mismatch> {
    serde_json::to_value(node)
        .map_err(|e| Mismatch::at("", format!("tree is not serializable: {e}")))
}

fn field_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn as_span(value: &Value) -> Option<Span> {
    match value {
        Value::Object(map)
            if map.len() == 2 && map.contains_key("start") && map.contains_key("length") =>
        {
            Span::deserialize(value).ok()
        }
        _ => None,
    }
}

fn as_node(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map)
            if map.len() == 2 && map.contains_key("kind") && map.contains_key("location") =>
        {
            Some(map)
        }
        _ => None,
    }
}

/// The variant name of a serialized node kind, and its fields when it has any.
fn kind_parts(kind: &Value) -> (&str, Option<&Value>) {
    match kind {
        Value::String(name) => (name, None),
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some((name, fields)) => (name, Some(fields)),
            None => ("?", None),
        },
        _ => ("?", None),
    }
}

fn describe(value: &Value) -> String {
    match as_node(value) {
        Some(node) => format!("{}Node", kind_parts(&node["kind"]).0),
        None => value.to_string(),
    }
}

fn compare_values(path: &str, expected: &Value, actual: &Value) -> Result<(), Mismatch> {
    if let (Some(expected), Some(actual)) = (as_span(expected), as_span(actual)) {
        if expected.matches(&actual) {
            return Ok(());
        }
        return Err(Mismatch::at(path, format!("expected span {expected}, found {actual}")));
    }
    if let (Some(expected), Some(actual)) = (as_node(expected), as_node(actual)) {
        return compare_nodes(path, expected, actual);
    }
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            for (name, value) in expected {
                let child = field_path(path, name);
                let other = actual.get(name).ok_or_else(|| Mismatch::at(&child, "missing field"))?;
                compare_values(&child, value, other)?;
            }
            match actual.keys().find(|name| !expected.contains_key(*name)) {
                Some(extra) => Err(Mismatch::at(&field_path(path, extra), "unexpected field")),
                None => Ok(()),
            }
        }
        (Value::Array(expected), Value::Array(actual)) => {
            if expected.len() != actual.len() {
                return Err(Mismatch::at(
                    path,
                    format!("expected {} elements, found {}", expected.len(), actual.len()),
                ));
            }
            for (i, (e, a)) in expected.iter().zip(actual).enumerate() {
                compare_values(&format!("{path}[{i}]"), e, a)?;
            }
            Ok(())
        }
        _ if expected == actual => Ok(()),
        _ => Err(Mismatch::at(
            path,
            format!("expected {}, found {}", describe(expected), describe(actual)),
        )),
    }
}

fn compare_nodes(
    path: &str,
    expected: &Map<String, Value>,
    actual: &Map<String, Value>,
) -> Result<(), Mismatch> {
    let (expected_kind, expected_fields) = kind_parts(&expected["kind"]);
    let (actual_kind, actual_fields) = kind_parts(&actual["kind"]);
    if expected_kind != actual_kind {
        return Err(Mismatch::at(
            path,
            format!("expected {expected_kind}Node, found {actual_kind}Node"),
        ));
    }
    compare_values(&field_path(path, "location"), &expected["location"], &actual["location"])?;
    match (expected_fields, actual_fields) {
        (Some(expected), Some(actual)) => compare_values(path, expected, actual),
        _ => Ok(()),
    }
}

/// An indented rendering of a tree, one field per line, for diagnostics and test output.
pub fn to_tree_string(node: &Node) -> String {
    let mut out = String::new();
    match serialize(node) {
        Ok(value) => match as_node(&value) {
            Some(root) => write_node(&mut out, 0, root),
            None => out.push_str(&value.to_string()),
        },
        Err(e) => out.push_str(&e.to_string()),
    }
    out
}

fn pad(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Writes the node's header at the current position and its fields below it.
fn write_node(out: &mut String, depth: usize, node: &Map<String, Value>) {
    let (kind, fields) = kind_parts(&node["kind"]);
    let location = as_span(&node["location"]).unwrap_or_default();
    let _ = writeln!(out, "{kind}Node {location}");
    if let Some(Value::Object(fields)) = fields {
        for (name, value) in fields {
            write_field(out, depth + 1, name, value);
        }
    }
}

fn write_field(out: &mut String, depth: usize, name: &str, value: &Value) {
    pad(out, depth);
    if let Some(span) = as_span(value) {
        let _ = writeln!(out, "{name}: {span}");
        return;
    }
    if let Some(node) = as_node(value) {
        let _ = write!(out, "{name}: ");
        write_node(out, depth, node);
        return;
    }
    match value {
        Value::Null => {
            let _ = writeln!(out, "{name}: (none)");
        }
        Value::Array(items) if items.iter().any(|i| as_node(i).is_some()) => {
            let _ = writeln!(out, "{name}:");
            for item in items {
                pad(out, depth + 1);
                out.push_str("- ");
                match as_node(item) {
                    Some(node) => write_node(out, depth + 1, node),
                    None => {
                        let _ = writeln!(out, "{item}");
                    }
                }
            }
        }
        Value::Array(items) => {
            let _ = writeln!(out, "{name}: [{}]", items.iter().join(", "));
        }
        _ => {
            let _ = writeln!(out, "{name}: {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IntegerBaseFlags, NodeKind};
    use arbor_var::Symbol;
    use pretty_assertions::assert_eq;
    use unindent::unindent;

    fn program(body: Vec<Node>, location: Span) -> Node {
        Node::new(
            NodeKind::Program {
                locals: vec![Symbol::mk("x")],
                statements: Node::boxed(NodeKind::Statements { body }, location),
            },
            location,
        )
    }

    fn write(name: &str, value: i64, location: Span) -> Node {
        Node::new(
            NodeKind::LocalVariableWrite {
                name: Symbol::mk(name),
                depth: 0,
                name_loc: Span::null(),
                value: Node::boxed(
                    NodeKind::Integer {
                        flags: IntegerBaseFlags::DECIMAL,
                        value,
                    },
                    Span::new(location.start + 4, 1),
                ),
                operator_loc: Span::null(),
            },
            location,
        )
    }

    fn read(name: &str, location: Span) -> Node {
        Node::new(
            NodeKind::LocalVariableRead {
                name: Symbol::mk(name),
                depth: 0,
            },
            location,
        )
    }

    #[test]
    fn test_identical_trees() {
        let tree = program(vec![write("x", 1, Span::new(0, 5))], Span::new(0, 5));
        assert_eq!(compare(&tree, &tree.clone()), Ok(()));
        assert!(structurally_eq(&tree, &tree));
    }

    #[test]
    fn test_null_span_matches_any() {
        let expected = program(vec![write("x", 1, Span::new(0, 5))], Span::new(0, 5));
        let actual = program(vec![write("x", 1, Span::new(0, 5))], Span::null());
        assert_eq!(compare(&expected, &actual), Ok(()));
        assert_eq!(compare(&actual, &expected), Ok(()));
    }

    #[test]
    fn test_span_mismatch() {
        let expected = program(vec![read("x", Span::new(6, 1))], Span::new(0, 7));
        let actual = program(vec![read("x", Span::new(5, 1))], Span::new(0, 7));
        let mismatch = compare(&expected, &actual).unwrap_err();
        assert_eq!(mismatch.path, "statements.body[0].location");
        assert_eq!(mismatch.detail, "expected span (6...7), found (5...6)");
    }

    #[test]
    fn test_kind_mismatch() {
        let expected = program(vec![read("x", Span::new(0, 1))], Span::new(0, 1));
        let actual = program(vec![Node::new(NodeKind::Nil, Span::new(0, 1))], Span::new(0, 1));
        assert_eq!(
            compare(&expected, &actual).unwrap_err().to_string(),
            "statements.body[0]: expected LocalVariableReadNode, found NilNode"
        );
    }

    #[test]
    fn test_field_mismatch() {
        let expected = program(vec![write("x", 1, Span::new(0, 5))], Span::new(0, 5));
        let actual = program(vec![write("x", 2, Span::new(0, 5))], Span::new(0, 5));
        assert_eq!(
            compare(&expected, &actual).unwrap_err(),
            Mismatch {
                path: "statements.body[0].value.value".to_string(),
                detail: "expected 1, found 2".to_string(),
            }
        );
    }

    #[test]
    fn test_element_count_mismatch() {
        let expected = program(vec![read("x", Span::new(0, 1))], Span::new(0, 1));
        let actual = program(vec![], Span::new(0, 1));
        let mismatch = compare(&expected, &actual).unwrap_err();
        assert_eq!(mismatch.path, "statements.body");
        assert_eq!(mismatch.detail, "expected 1 elements, found 0");
    }

    #[test]
    fn test_root_mismatch() {
        let mismatch = compare(
            &Node::new(NodeKind::True, Span::null()),
            &Node::new(NodeKind::False, Span::null()),
        )
        .unwrap_err();
        assert_eq!(mismatch.path, "(root)");
    }

    #[test]
    fn test_compare_external_json() {
        let ours = serde_json::to_value(read("x", Span::new(0, 1))).unwrap();
        let theirs = serde_json::json!({
            "kind": {"LocalVariableRead": {"name": "x", "depth": 0}},
            "location": {"start": 0, "length": 0},
        });
        assert_eq!(compare_json(&theirs, &ours), Ok(()));
    }

    #[test]
    fn test_tree_string() {
        let tree = program(vec![write("x", 1, Span::new(0, 5))], Span::new(0, 5));
        let expected = unindent(
            r#"
            ProgramNode (0...5)
              locals: ["x"]
              statements: StatementsNode (0...5)
                body:
                  - LocalVariableWriteNode (0...5)
                    name: "x"
                    depth: 0
                    name_loc: (null)
                    value: IntegerNode (4...5)
                      flags: 2
                      value: 1
                    operator_loc: (null)
            "#,
        );
        assert_eq!(to_tree_string(&tree), expected);
    }
}
