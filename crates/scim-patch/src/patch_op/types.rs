//! Core types for SCIM PATCH.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use scim_path::Path;

/// Schema URN of the PatchOp request message.
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PatchError {
    #[error(transparent)]
    Path(#[from] scim_path::Error),
    #[error("invalid syntax: {0}")]
    InvalidSyntax(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ── Operation type ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchType {
    Add,
    Remove,
    Replace,
}

impl PatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchType::Add => "add",
            PatchType::Remove => "remove",
            PatchType::Replace => "replace",
        }
    }
}

/// Operation names are matched ignoring case.
impl FromStr for PatchType {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [PatchType::Add, PatchType::Remove, PatchType::Replace]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PatchError::InvalidSyntax(format!("unknown operation type: {s}")))
    }
}

impl fmt::Display for PatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PatchType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse::<PatchType>().map_err(serde::de::Error::custom)
    }
}

// ── Operation ─────────────────────────────────────────────────────────────

/// One validated PATCH operation.
///
/// Construct through [`PatchOperation::add`], [`PatchOperation::remove`],
/// [`PatchOperation::replace`], [`PatchOperation::build`], or by
/// deserializing `{"op": ..., "path": ..., "value": ...}`; each path checks
/// the same rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase", try_from = "RawOperation")]
pub enum PatchOperation {
    Add {
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<Path>,
        value: Value,
    },
    Remove {
        path: Path,
    },
    Replace {
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<Path>,
        value: Value,
    },
}

#[derive(Deserialize)]
struct RawOperation {
    op: PatchType,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    value: Option<Value>,
}

impl TryFrom<RawOperation> for PatchOperation {
    type Error = PatchError;

    fn try_from(raw: RawOperation) -> Result<Self, Self::Error> {
        PatchOperation::build(raw.op, raw.path.as_deref(), raw.value.unwrap_or(Value::Null))
    }
}

impl PatchOperation {
    /// Add `value` at `path`, or merge an object of attributes into the
    /// resource when `path` is absent. Add paths carry no value filters.
    pub fn add(path: Option<Path>, value: Value) -> Result<Self, PatchError> {
        check_path(path.as_ref())?;
        check_value(path.as_ref(), &value, "add")?;
        if let Some(path) = &path {
            if path.iter().any(|element| element.filter.is_some()) {
                return Err(PatchError::InvalidPath(
                    "path field for add operations must not include any value selection filters"
                        .to_string(),
                ));
            }
        }
        Ok(PatchOperation::Add { path, value })
    }

    pub fn remove(path: Path) -> Result<Self, PatchError> {
        check_path(Some(&path))?;
        Ok(PatchOperation::Remove { path })
    }

    /// Replace what `path` addresses, or merge an object of attributes into
    /// the resource when `path` is absent.
    pub fn replace(path: Option<Path>, value: Value) -> Result<Self, PatchError> {
        check_path(path.as_ref())?;
        check_value(path.as_ref(), &value, "replace")?;
        Ok(PatchOperation::Replace { path, value })
    }

    /// Build an operation from its wire parts. A blank path counts as absent.
    pub fn build(kind: PatchType, path: Option<&str>, value: Value) -> Result<Self, PatchError> {
        let path = match path.map(str::trim) {
            Some(text) if !text.is_empty() => Some(Path::parse(text)?),
            _ => None,
        };
        match kind {
            PatchType::Add => Self::add(path, value),
            PatchType::Replace => Self::replace(path, value),
            PatchType::Remove => match path {
                Some(path) => Self::remove(path),
                None => Err(PatchError::InvalidPath(
                    "path field must not be null for remove operations".to_string(),
                )),
            },
        }
    }

    pub fn kind(&self) -> PatchType {
        match self {
            PatchOperation::Add { .. } => PatchType::Add,
            PatchOperation::Remove { .. } => PatchType::Remove,
            PatchOperation::Replace { .. } => PatchType::Replace,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            PatchOperation::Add { path, .. } | PatchOperation::Replace { path, .. } => path.as_ref(),
            PatchOperation::Remove { path } => Some(path),
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            PatchOperation::Add { value, .. } | PatchOperation::Replace { value, .. } => Some(value),
            PatchOperation::Remove { .. } => None,
        }
    }

    /// The single value of this operation as `T`.
    pub fn value_as<T: DeserializeOwned>(&self) -> Result<Option<T>, PatchError> {
        match self.value() {
            None => Ok(None),
            Some(Value::Array(_)) => Err(PatchError::InvalidValue(
                "the operation carries multiple values".to_string(),
            )),
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        }
    }

    /// Every value of this operation as `T`; a single value yields one item.
    pub fn values_as<T: DeserializeOwned>(&self) -> Result<Vec<T>, PatchError> {
        match self.value() {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| serde_json::from_value(item.clone()).map_err(PatchError::from))
                .collect(),
            Some(value) => Ok(vec![serde_json::from_value(value.clone())?]),
        }
    }
}

fn check_path(path: Option<&Path>) -> Result<(), PatchError> {
    let Some(path) = path else {
        return Ok(());
    };
    if path.len() > 2 {
        return Err(PatchError::InvalidPath(format!(
            "path {path} must not address more than two levels of attributes"
        )));
    }
    if let Some(filter) = path.element(1).and_then(|element| element.filter.as_ref()) {
        let on_value = filter
            .attribute_path()
            .and_then(|filtered| filtered.element(0))
            .is_some_and(|element| element.attribute.eq_ignore_ascii_case("value"));
        if !on_value {
            return Err(PatchError::InvalidPath(format!(
                "a value filter on a sub-attribute of {path} may only test \"value\""
            )));
        }
    }
    Ok(())
}

fn check_value(path: Option<&Path>, value: &Value, op: &str) -> Result<(), PatchError> {
    let empty = match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    };
    if empty {
        return Err(PatchError::InvalidSyntax(
            "value field must not be null or an empty container".to_string(),
        ));
    }
    if path.is_none() && !value.is_object() {
        return Err(PatchError::InvalidSyntax(format!(
            "value field must be a JSON object containing the attributes to {op}"
        )));
    }
    Ok(())
}

// ── Request message ───────────────────────────────────────────────────────

/// The PatchOp request message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    #[serde(default = "default_schemas")]
    pub schemas: Vec<String>,
    #[serde(rename = "Operations", alias = "operations")]
    pub operations: Vec<PatchOperation>,
}

fn default_schemas() -> Vec<String> {
    vec![PATCH_OP_SCHEMA.to_string()]
}

impl PatchRequest {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self { schemas: default_schemas(), operations }
    }
}
