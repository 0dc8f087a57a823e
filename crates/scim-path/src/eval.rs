//! Filter evaluator.

use std::cmp::Ordering;

use serde_json::Value;

use crate::compare::compare_to;
use crate::error::{Error, Result};
use crate::gather::GatheringVisitor;
use crate::traverse::traverse;
use crate::types::*;

/// Filter evaluator.
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Whether `node` satisfies `filter`.
    ///
    /// Attribute paths inside the filter resolve relative to `node`. A scalar
    /// node only answers to the attribute `value`, so `emails[value ew
    /// ".org"]` works on arrays of plain strings too.
    pub fn evaluate(filter: &Filter, node: &Value) -> Result<bool> {
        match filter {
            Filter::And(left, right) => {
                Ok(Self::evaluate(left, node)? && Self::evaluate(right, node)?)
            }
            Filter::Or(left, right) => {
                Ok(Self::evaluate(left, node)? || Self::evaluate(right, node)?)
            }
            Filter::Not(inner) => Ok(!Self::evaluate(inner, node)?),
            Filter::Present(path) => {
                Ok(Self::candidates(path, node)?.iter().any(is_assigned))
            }
            Filter::Compare { op, path, value } => {
                let candidates = Self::candidates(path, node)?;
                Self::compare(*op, &candidates, value)
            }
            Filter::Complex { path, filter } => {
                for candidate in Self::candidates(path, node)? {
                    if Self::evaluate(filter, &candidate)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// The values `path` resolves to within `node`, multi-valued attributes
    /// flattened into their elements.
    fn candidates(path: &Path, node: &Value) -> Result<Vec<Value>> {
        match node {
            Value::Object(fields) => {
                let mut visitor = GatheringVisitor::new();
                traverse(&mut visitor, fields, path)?;
                let mut values = Vec::new();
                for value in visitor.into_values() {
                    match value {
                        Value::Array(items) => values.extend(items),
                        other => values.push(other),
                    }
                }
                Ok(values)
            }
            Value::Array(_) => Ok(Vec::new()),
            scalar if is_value_path(path) => Ok(vec![scalar.clone()]),
            _ => Ok(Vec::new()),
        }
    }

    fn compare(op: CompareOp, candidates: &[Value], literal: &Value) -> Result<bool> {
        match op {
            CompareOp::Eq => {
                if literal.is_null() {
                    return Ok(candidates.iter().all(Value::is_null));
                }
                for candidate in candidates {
                    if Self::equals(candidate, literal)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            CompareOp::Ne => Ok(!Self::compare(CompareOp::Eq, candidates, literal)?),
            CompareOp::Co | CompareOp::Sw | CompareOp::Ew => {
                let Value::String(needle) = literal else {
                    return Err(Error::InvalidFilter(format!(
                        "operator {} requires a string value, got {literal}",
                        op.as_str()
                    )));
                };
                let needle = needle.to_lowercase();
                Ok(candidates.iter().any(|candidate| match candidate {
                    Value::String(text) => {
                        let text = text.to_lowercase();
                        match op {
                            CompareOp::Co => text.contains(&needle),
                            CompareOp::Sw => text.starts_with(&needle),
                            _ => text.ends_with(&needle),
                        }
                    }
                    _ => false,
                }))
            }
            CompareOp::Gt | CompareOp::Ge | CompareOp::Lt | CompareOp::Le => {
                if matches!(literal, Value::Bool(_) | Value::Null) {
                    return Err(Error::InvalidFilter(format!(
                        "operator {} cannot order by {literal}",
                        op.as_str()
                    )));
                }
                for candidate in candidates {
                    match candidate {
                        Value::Null => continue,
                        Value::Bool(_) | Value::Object(_) | Value::Array(_) => {
                            return Err(Error::InvalidFilter(format!(
                                "operator {} cannot order {candidate}",
                                op.as_str()
                            )));
                        }
                        _ => {}
                    }
                    let ordering = compare_to(candidate, literal, None);
                    let hit = match op {
                        CompareOp::Gt => ordering == Ordering::Greater,
                        CompareOp::Ge => ordering != Ordering::Less,
                        CompareOp::Lt => ordering == Ordering::Less,
                        _ => ordering != Ordering::Greater,
                    };
                    if hit {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn equals(candidate: &Value, literal: &Value) -> Result<bool> {
        match candidate {
            Value::Object(_) | Value::Array(_) => Err(Error::InvalidFilter(format!(
                "complex value {candidate} cannot be compared to {literal}"
            ))),
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(literal.as_bool() == Some(*b)),
            _ if literal.is_boolean() => Ok(false),
            _ => Ok(compare_to(candidate, literal, None) == Ordering::Equal),
        }
    }
}

fn is_value_path(path: &Path) -> bool {
    path.namespace().is_none()
        && path.len() == 1
        && path
            .element(0)
            .is_some_and(|e| e.filter.is_none() && e.attribute.eq_ignore_ascii_case("value"))
}

fn is_assigned(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        _ => true,
    }
}
