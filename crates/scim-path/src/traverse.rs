//! Traversal driver.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::Result;
use crate::types::{Filter, Path};
use crate::visitor::{NodeVisitor, NodeVisitorMut, Reached};

/// Walk `path` through `resource`, handing each step to `visitor`.
///
/// Inner steps that reach an array continue in every object element, in
/// document order. The first error ends the walk.
pub fn traverse<V>(visitor: &mut V, resource: &Map<String, Value>, path: &Path) -> Result<()>
where
    V: NodeVisitor + ?Sized,
{
    step(visitor, resource, 0, path)
}

/// Mutable counterpart of [`traverse`].
pub fn traverse_mut<V>(visitor: &mut V, resource: &mut Map<String, Value>, path: &Path) -> Result<()>
where
    V: NodeVisitorMut + ?Sized,
{
    step_mut(visitor, resource, 0, path)
}

/// Field and filter of step `index`. The namespace, when present, is step 0.
fn resolve(path: &Path, index: usize) -> (Option<&str>, Option<&Filter>) {
    let element = match path.namespace() {
        Some(namespace) if index == 0 => return (Some(namespace), None),
        Some(_) => path.element(index - 1),
        None => path.element(index),
    };
    match element {
        Some(element) => (Some(element.attribute.as_str()), element.filter.as_ref()),
        None => (None, None),
    }
}

fn step<V>(visitor: &mut V, node: &Map<String, Value>, index: usize, path: &Path) -> Result<()>
where
    V: NodeVisitor + ?Sized,
{
    let (field, filter) = resolve(path, index);
    match field {
        Some(field) if index + 1 < path.depth() => {
            trace!(field, index, "inner step");
            match visitor.visit_inner_node(node, field, filter)? {
                Reached::Missing => Ok(()),
                Reached::Node(child) => descend(visitor, child, index + 1, path),
                Reached::Elements(children) => {
                    for child in children {
                        if let Value::Object(map) = child {
                            step(visitor, map, index + 1, path)?;
                        }
                    }
                    Ok(())
                }
            }
        }
        _ => {
            trace!(?field, index, "leaf step");
            visitor.visit_leaf_node(node, field, filter)
        }
    }
}

fn descend<V>(visitor: &mut V, child: &Value, index: usize, path: &Path) -> Result<()>
where
    V: NodeVisitor + ?Sized,
{
    match child {
        Value::Object(map) => step(visitor, map, index, path),
        Value::Array(items) => {
            for item in items {
                if let Value::Object(map) = item {
                    step(visitor, map, index, path)?;
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn step_mut<V>(visitor: &mut V, node: &mut Map<String, Value>, index: usize, path: &Path) -> Result<()>
where
    V: NodeVisitorMut + ?Sized,
{
    let (field, filter) = resolve(path, index);
    match field {
        Some(field) if index + 1 < path.depth() => {
            trace!(field, index, "inner step");
            match visitor.visit_inner_node(node, field, filter)? {
                Reached::Missing => Ok(()),
                Reached::Node(child) => descend_mut(visitor, child, index + 1, path),
                Reached::Elements(children) => {
                    for child in children {
                        if let Value::Object(map) = child {
                            step_mut(visitor, map, index + 1, path)?;
                        }
                    }
                    Ok(())
                }
            }
        }
        _ => {
            trace!(?field, index, "leaf step");
            visitor.visit_leaf_node(node, field, filter)
        }
    }
}

fn descend_mut<V>(visitor: &mut V, child: &mut Value, index: usize, path: &Path) -> Result<()>
where
    V: NodeVisitorMut + ?Sized,
{
    match child {
        Value::Object(map) => step_mut(visitor, map, index, path),
        Value::Array(items) => {
            for item in items {
                if let Value::Object(map) = item {
                    step_mut(visitor, map, index, path)?;
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
