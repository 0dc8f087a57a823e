//! Adds or replaces the value a path addresses.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::eval::FilterEvaluator;
use crate::types::Filter;
use crate::visitor::{matching_flags, select_elements_mut, NodeVisitorMut, Reached};

/// Writes a value at the addressed location.
///
/// In append mode arrays are extended with the elements they do not hold
/// yet; in replace mode the addressed value is overwritten. Objects are
/// merged attribute by attribute in both modes. Missing intermediate objects
/// are created on the way down unless the value is null or an empty array,
/// which write nothing.
#[derive(Debug, Clone)]
pub struct UpdatingVisitor {
    value: Value,
    append: bool,
}

impl UpdatingVisitor {
    pub fn new(value: Value, append: bool) -> Self {
        Self { value, append }
    }

    pub fn appending(value: Value) -> Self {
        Self::new(value, true)
    }

    pub fn replacing(value: Value) -> Self {
        Self::new(value, false)
    }

    /// Overwrite or merge every element of `field` matching `filter`. A
    /// singular target is tested against the filter itself.
    fn replace_matching(
        &self,
        parent: &mut Map<String, Value>,
        field: &str,
        filter: &Filter,
    ) -> Result<()> {
        let hit = match parent.get_mut(field) {
            Some(Value::Array(items)) => {
                let flags = matching_flags(items, filter)?;
                if !flags.contains(&true) {
                    return Err(no_match(field, filter));
                }
                if is_noop(&self.value) {
                    return Ok(());
                }
                for (item, matched) in items.iter_mut().zip(flags) {
                    if !matched {
                        continue;
                    }
                    match (item, &self.value) {
                        (Value::Object(existing), Value::Object(_)) => {
                            update_node(existing, None, &self.value, false)?;
                        }
                        (slot, _) => *slot = self.value.clone(),
                    }
                }
                return Ok(());
            }
            Some(node) => FilterEvaluator::evaluate(filter, node)?,
            None => false,
        };

        if !hit {
            return Err(no_match(field, filter));
        }
        update_node(parent, Some(field), &self.value, false)
    }
}

impl NodeVisitorMut for UpdatingVisitor {
    fn visit_inner_node<'a>(
        &mut self,
        parent: &'a mut Map<String, Value>,
        field: &str,
        filter: Option<&Filter>,
    ) -> Result<Reached<&'a mut Value>> {
        if matches!(parent.get(field), None | Some(Value::Null)) {
            if let Some(filter) = filter {
                return Err(no_match(field, filter));
            }
            if is_noop(&self.value) {
                return Ok(Reached::Missing);
            }
            parent.insert(field.to_string(), Value::Object(Map::new()));
        }

        match (parent.get_mut(field), filter) {
            (Some(Value::Array(items)), Some(filter)) => {
                let selected = select_elements_mut(items, filter)?;
                if selected.is_empty() {
                    return Err(no_match(field, filter));
                }
                Ok(Reached::Elements(selected))
            }
            (Some(node), _) if node.is_object() || node.is_array() => Ok(Reached::Node(node)),
            (Some(_), _) => Err(not_complex(field)),
            (None, _) => Ok(Reached::Missing),
        }
    }

    fn visit_leaf_node(
        &mut self,
        parent: &mut Map<String, Value>,
        field: Option<&str>,
        filter: Option<&Filter>,
    ) -> Result<()> {
        match (field, filter) {
            (Some(field), Some(filter)) if !self.append => self.replace_matching(parent, field, filter),
            _ => update_node(parent, field, &self.value, self.append),
        }
    }
}

/// Null and empty arrays write nothing.
fn is_noop(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Write `value` at `parent[key]`, or merge it into `parent` itself when
/// `key` is absent.
pub(crate) fn update_node(
    parent: &mut Map<String, Value>,
    key: Option<&str>,
    value: &Value,
    append: bool,
) -> Result<()> {
    if is_noop(value) {
        return Ok(());
    }

    let Some(key) = key else {
        return match value {
            Value::Object(fields) => merge(parent, fields, append),
            _ => Err(Error::InvalidValue(format!(
                "a resource can only be updated with an object, got {value}"
            ))),
        };
    };

    match (parent.get_mut(key), value) {
        (Some(Value::Object(existing)), Value::Object(fields)) => merge(existing, fields, append),
        (Some(Value::Array(existing)), Value::Array(items)) if append => {
            for item in items {
                if !existing.contains(item) {
                    existing.push(item.clone());
                }
            }
            Ok(())
        }
        _ => {
            parent.insert(key.to_string(), value.clone());
            Ok(())
        }
    }
}

fn merge(target: &mut Map<String, Value>, fields: &Map<String, Value>, append: bool) -> Result<()> {
    for (key, child) in fields {
        update_node(target, Some(key), child, append)?;
    }
    Ok(())
}

fn not_complex(field: &str) -> Error {
    debug!(field, "no target: not multi-valued or complex");
    Error::NoTarget(format!(
        "attribute {field} does not have a multi-valued or complex value"
    ))
}

fn no_match(field: &str, filter: &Filter) -> Error {
    debug!(field, %filter, "no target: nothing matches the filter");
    Error::NoTarget(format!(
        "attribute {field} does not have a value matching the filter {filter}"
    ))
}
