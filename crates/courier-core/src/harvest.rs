//! Compile-time constant harvesting.
//!
//! Values of `static final` fields are rendered one per line and appended to
//! the uploaded source behind [`CONSTANTS_SENTINEL`], so the server can tell
//! user source from harvested metadata.
//!
//! Line format: `//<field>\t<value>\t<owner>` where strings are quoted,
//! `null` is literal, scalars use their plain text form and one-dimensional
//! arrays become `{a, b, c}`.

use crate::{FieldDecl, TypeDecl, ValueType};
use serde_json::Value;

/// Marker line separating user source from harvested constants
pub const CONSTANTS_SENTINEL: &str = "//@#$%^&*";

/// Collects constant lines in field-declaration order
#[derive(Debug, Default, Clone)]
pub struct ConstantHarvester {
    lines: Vec<String>,
}

impl ConstantHarvester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `static final` field of `owner`.
    ///
    /// Returns `false` when the value type is out of scope (multi-dimensional
    /// arrays, member types, other references); nothing is recorded then.
    pub fn record(&mut self, owner: &TypeDecl, field: &FieldDecl) -> bool {
        if field.member_type {
            return false;
        }

        match Self::render_line(
            &field.name,
            &field.value_type(),
            field.value.as_ref(),
            &owner.qualified_name(),
        ) {
            Some(line) => {
                self.lines.push(line);
                true
            }
            None => false,
        }
    }

    /// Render one constant line, or `None` when the type is not harvested.
    pub fn render_line(
        field_name: &str,
        value_type: &ValueType,
        value: Option<&Value>,
        owner: &str,
    ) -> Option<String> {
        let rendered = render_value(value_type, value)?;
        Some(format!("//{field_name}\t{rendered}\t{owner}"))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Harvested lines without the sentinel
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Sentinel line followed by every harvested line; empty when nothing was harvested.
    pub fn block(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }

        let mut block = String::with_capacity(
            CONSTANTS_SENTINEL.len() + 1 + self.lines.iter().map(|l| l.len() + 1).sum::<usize>(),
        );
        block.push_str(CONSTANTS_SENTINEL);
        block.push('\n');
        for line in &self.lines {
            block.push_str(line);
            block.push('\n');
        }
        block
    }
}

fn render_value(value_type: &ValueType, value: Option<&Value>) -> Option<String> {
    match value_type {
        ValueType::Str => Some(render_string(value)),
        ValueType::Primitive(_) => render_scalar(value?),
        ValueType::Array {
            element,
            dimensions: 1,
        } => match (element.as_ref(), value) {
            (_, None | Some(Value::Null)) => Some("null".to_string()),
            (ValueType::Str, Some(Value::Array(items))) => {
                render_list(items.iter().map(|item| Some(render_string(Some(item)))))
            }
            (ValueType::Primitive(_), Some(Value::Array(items))) => {
                render_list(items.iter().map(render_scalar))
            }
            _ => None,
        },
        ValueType::Array { .. } | ValueType::Reference(_) => None,
    }
}

fn render_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => format!("\"{s}\""),
        Some(other) => format!("\"{other}\""),
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn render_list(items: impl Iterator<Item = Option<String>>) -> Option<String> {
    let rendered = items.collect::<Option<Vec<String>>>()?;
    Some(format!("{{{}}}", rendered.join(", ")))
}

#[cfg(test)]
#[path = "harvest/harvest_tests.rs"]
mod harvest_tests;
