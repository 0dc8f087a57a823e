//! Path-addressed operations on a resource.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::exists::ExistenceVisitor;
use crate::gather::GatheringVisitor;
use crate::traverse::{traverse, traverse_mut};
use crate::types::Path;
use crate::update::UpdatingVisitor;

/// All values `path` addresses in `resource`, in document order.
///
/// A multi-valued attribute yields one array holding its (filtered)
/// elements. Nothing addressed is not an error.
pub fn match_path(path: &Path, resource: &Map<String, Value>) -> Result<Vec<Value>> {
    debug!(%path, "match");
    let mut visitor = GatheringVisitor::new();
    traverse(&mut visitor, resource, path)?;
    Ok(visitor.into_values())
}

/// The first value `path` addresses, or `Value::Null`.
pub fn value(path: &Path, resource: &Map<String, Value>) -> Result<Value> {
    Ok(match_path(path, resource)?.into_iter().next().unwrap_or(Value::Null))
}

/// Whether `path` addresses an assigned value.
pub fn exists_path(path: &Path, resource: &Map<String, Value>) -> Result<bool> {
    debug!(%path, "exists");
    let mut visitor = ExistenceVisitor::new();
    traverse(&mut visitor, resource, path)?;
    Ok(visitor.present())
}

/// Add `value` at `path`: arrays gain the elements they lack, objects are
/// merged, anything else is set.
pub fn add_value(path: &Path, resource: &mut Map<String, Value>, value: Value) -> Result<()> {
    debug!(%path, "add");
    traverse_mut(&mut UpdatingVisitor::appending(value), resource, path)
}

/// Remove what `path` addresses and return it the way [`match_path`] would.
pub fn remove_value(path: &Path, resource: &mut Map<String, Value>) -> Result<Vec<Value>> {
    debug!(%path, "remove");
    let mut visitor = GatheringVisitor::removing();
    traverse_mut(&mut visitor, resource, path)?;
    Ok(visitor.into_values())
}

/// Replace what `path` addresses with `value`. Objects are merged into
/// existing objects; with a value filter on the last element only the
/// matching elements are replaced.
pub fn replace_value(path: &Path, resource: &mut Map<String, Value>, value: Value) -> Result<()> {
    debug!(%path, "replace");
    traverse_mut(&mut UpdatingVisitor::replacing(value), resource, path)
}
