//! PATCH apply logic.

use scim_path::{add_value, is_namespace, remove_value, replace_value, Path};
use serde_json::{Map, Value};
use tracing::debug;

use super::types::{PatchError, PatchOperation, PatchRequest};

const SCHEMAS: &str = "schemas";

impl PatchOperation {
    /// Apply this operation to `resource`.
    ///
    /// Extension attributes written by `add` and `replace` get their schema
    /// URN listed in the resource's `schemas` array, when it has one.
    pub fn apply(&self, resource: &mut Map<String, Value>) -> Result<(), PatchError> {
        let root = Path::root();
        let path = self.path().unwrap_or(&root);
        debug!(op = %self.kind(), %path, "apply patch operation");

        match self {
            PatchOperation::Add { value, .. } => {
                add_value(path, resource, value.clone())?;
                self.enforce_namespace(resource);
            }
            PatchOperation::Replace { value, .. } => {
                replace_value(path, resource, value.clone())?;
                self.enforce_namespace(resource);
            }
            PatchOperation::Remove { .. } => {
                remove_value(path, resource)?;
            }
        }
        Ok(())
    }

    fn enforce_namespace(&self, resource: &mut Map<String, Value>) {
        let Some(Value::Array(schemas)) = resource.get_mut(SCHEMAS) else {
            return;
        };
        match (self.path(), self.value()) {
            (None, Some(Value::Object(fields))) => {
                for field in fields.keys().filter(|field| is_namespace(field)) {
                    add_schema(schemas, field);
                }
            }
            (Some(path), _) => {
                if let Some(namespace) = path.namespace() {
                    add_schema(schemas, namespace);
                }
            }
            _ => {}
        }
    }
}

fn add_schema(schemas: &mut Vec<Value>, urn: &str) {
    let listed = schemas
        .iter()
        .any(|schema| schema.as_str().is_some_and(|s| s.eq_ignore_ascii_case(urn)));
    if !listed {
        debug!(urn, "listing extension schema");
        schemas.push(Value::String(urn.to_string()));
    }
}

impl PatchRequest {
    /// Apply every operation in order.
    ///
    /// The first failing operation stops the request and leaves `resource`
    /// as it was before the request.
    pub fn apply(&self, resource: &mut Map<String, Value>) -> Result<(), PatchError> {
        let mut working = resource.clone();
        for (index, op) in self.operations.iter().enumerate() {
            if let Err(e) = op.apply(&mut working) {
                debug!(index, error = %e, "patch operation failed");
                return Err(e);
            }
        }
        *resource = working;
        Ok(())
    }
}
