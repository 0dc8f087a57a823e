//! Tests whether a path addresses an assigned value.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::Filter;
use crate::visitor::{matching_flags, narrow, NodeVisitor, Reached};

/// Records whether any addressed value is assigned. Empty arrays and empty
/// objects count as unassigned; an explicit null is present.
#[derive(Debug, Default)]
pub struct ExistenceVisitor {
    present: bool,
}

impl ExistenceVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present(&self) -> bool {
        self.present
    }
}

impl NodeVisitor for ExistenceVisitor {
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
        let node = match field {
            Some(field) => parent.get(field),
            None => {
                self.present |= !parent.is_empty();
                return Ok(());
            }
        };

        let assigned = match node {
            None => false,
            Some(Value::Array(items)) => match filter {
                Some(filter) => matching_flags(items, filter)?.contains(&true),
                None => !items.is_empty(),
            },
            Some(Value::Object(fields)) => !fields.is_empty(),
            Some(_) => true,
        };
        self.present |= assigned;
        Ok(())
    }
}
