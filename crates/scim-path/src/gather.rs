//! Collects the values a path addresses, optionally removing them.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::Filter;
use crate::visitor::{filter_array, filter_array_mut, narrow, narrow_mut, NodeVisitor, NodeVisitorMut, Reached};

/// Gathers addressed values.
///
/// A multi-valued leaf is gathered as one array holding the matched
/// elements. With `remove` set, a mutable traversal also takes the gathered
/// values out of the resource.
#[derive(Debug, Default)]
pub struct GatheringVisitor {
    values: Vec<Value>,
    remove: bool,
}

impl GatheringVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A visitor that removes what it gathers.
    pub fn removing() -> Self {
        Self { values: Vec::new(), remove: true }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl NodeVisitor for GatheringVisitor {
    fn visit_inner_node<'a>(
        &mut self,
        parent: &'a Map<String, Value>,
        field: &str,
        filter: Option<&Filter>,
    ) -> Result<Reached<&'a Value>> {
        narrow(parent, field, filter)
    }

    fn visit_leaf_node(
        &mut self,
        parent: &Map<String, Value>,
        field: Option<&str>,
        filter: Option<&Filter>,
    ) -> Result<()> {
        let Some(field) = field else {
            self.values.push(Value::Object(parent.clone()));
            return Ok(());
        };

        match parent.get(field) {
            None => {}
            Some(Value::Array(items)) => {
                let matched = match filter {
                    Some(filter) => filter_array(items, filter)?,
                    None => items.clone(),
                };
                if !matched.is_empty() {
                    self.values.push(Value::Array(matched));
                }
            }
            Some(node) => self.values.push(node.clone()),
        }
        Ok(())
    }
}

impl NodeVisitorMut for GatheringVisitor {
    fn visit_inner_node<'a>(
        &mut self,
        parent: &'a mut Map<String, Value>,
        field: &str,
        filter: Option<&Filter>,
    ) -> Result<Reached<&'a mut Value>> {
        narrow_mut(parent, field, filter)
    }

    fn visit_leaf_node(
        &mut self,
        parent: &mut Map<String, Value>,
        field: Option<&str>,
        filter: Option<&Filter>,
    ) -> Result<()> {
        let Some(field) = field else {
            // The resource itself is never removed.
            if !self.remove {
                self.values.push(Value::Object(parent.clone()));
            }
            return Ok(());
        };

        let remove_field = match parent.get_mut(field) {
            None => false,
            Some(Value::Array(items)) => {
                let matched = match filter {
                    Some(filter) => filter_array_mut(items, filter, self.remove)?,
                    None => items.clone(),
                };
                if !matched.is_empty() {
                    self.values.push(Value::Array(matched));
                }
                self.remove && (filter.is_none() || items.is_empty())
            }
            Some(node) => {
                self.values.push(node.clone());
                self.remove
            }
        };

        if remove_field {
            parent.shift_remove(field);
        }
        Ok(())
    }
}
