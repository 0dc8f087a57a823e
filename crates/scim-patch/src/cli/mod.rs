//! Command-line tools for SCIM resources.
//!
//! Provides the core logic used by the binary entry points:
//! - `scim-patch` - apply a PatchOp request to a resource
//! - `scim-path`  - print the values an attribute path addresses

use std::io::{self, Read, Write};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::patch_op::{PatchError, PatchOperation, PatchRequest};

/// Environment variable holding the log filter of the binaries.
pub const LOG_ENV: &str = "SCIM_LOG";

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Path(#[from] scim_path::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("resource must be a JSON object")]
    NotAnObject,
    #[error("{0}")]
    Usage(&'static str),
}

/// A binary's work: resource text and first argument in, output text out.
pub type Command = fn(&str, &str) -> Result<String, CliError>;

// ── Logging ───────────────────────────────────────────────────────────────

/// Send log events to stderr, filtered by `SCIM_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_resource(resource_json: &str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str::<Value>(resource_json)? {
        Value::Object(resource) => Ok(resource),
        _ => Err(CliError::NotAnObject),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────

/// Run `command` on the resource read from `input` and the first argument.
/// `usage` is reported when the argument is missing.
pub fn run_with<R: Read>(
    command: Command,
    usage: &'static str,
    argument: Option<&str>,
    mut input: R,
) -> Result<String, CliError> {
    let argument = argument.ok_or(CliError::Usage(usage))?;
    let mut buf = String::new();
    input.read_to_string(&mut buf)?;
    command(buf.trim(), argument)
}

/// Binary entry point: resource on stdin, argument in argv, result on
/// stdout. Errors go to stderr with exit status 1.
pub fn run(command: Command, usage: &'static str) {
    init_logging();

    let argument = std::env::args().nth(1);
    let result = run_with(command, usage, argument.as_deref(), io::stdin().lock()).and_then(|out| {
        writeln!(io::stdout(), "{out}")?;
        Ok(())
    });
    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

// ── scim-patch ────────────────────────────────────────────────────────────

/// Apply a patch to a resource.
///
/// `patch_json` is either a PatchOp message or a bare array of operations.
/// Returns the patched resource as pretty-printed JSON.
pub fn apply_patch_request(resource_json: &str, patch_json: &str) -> Result<String, CliError> {
    let mut resource = parse_resource(resource_json)?;
    let request = match serde_json::from_str::<Value>(patch_json)? {
        operations @ Value::Array(_) => {
            PatchRequest::new(serde_json::from_value::<Vec<PatchOperation>>(operations)?)
        }
        message => serde_json::from_value::<PatchRequest>(message)?,
    };
    request.apply(&mut resource)?;
    Ok(serde_json::to_string_pretty(&resource)?)
}

// ── scim-path ─────────────────────────────────────────────────────────────

/// Look up an attribute path in a resource.
///
/// Returns the addressed values as a pretty-printed JSON array.
pub fn match_resource(resource_json: &str, path: &str) -> Result<String, CliError> {
    let resource = parse_resource(resource_json)?;
    let path: scim_path::Path = path.parse()?;
    let values = scim_path::match_path(&path, &resource)?;
    Ok(serde_json::to_string_pretty(&Value::Array(values))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_patch_request_message() {
        let resource = r#"{"userName": "bjensen"}"#;
        let patch = r#"{
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
            "Operations": [{"op": "add", "path": "nickName", "value": "Babs"}]
        }"#;
        let out: Value = serde_json::from_str(&apply_patch_request(resource, patch).unwrap()).unwrap();
        assert_eq!(out, json!({"userName": "bjensen", "nickName": "Babs"}));
    }

    #[test]
    fn test_apply_patch_request_bare_array() {
        let resource = r#"{"userName": "bjensen", "title": "Tour Guide"}"#;
        let patch = r#"[{"op": "remove", "path": "title"}]"#;
        let out: Value = serde_json::from_str(&apply_patch_request(resource, patch).unwrap()).unwrap();
        assert_eq!(out, json!({"userName": "bjensen"}));
    }

    #[test]
    fn test_resource_must_be_object() {
        assert!(matches!(apply_patch_request("[]", "[]"), Err(CliError::NotAnObject)));
    }

    #[test]
    fn test_match_resource() {
        let resource = r#"{"emails": [{"type": "work", "value": "a@example.com"}]}"#;
        let out: Value =
            serde_json::from_str(&match_resource(resource, r#"emails[type eq "work"].value"#).unwrap())
                .unwrap();
        assert_eq!(out, json!(["a@example.com"]));
        assert!(matches!(match_resource(resource, "emails."), Err(CliError::Path(_))));
    }

    #[test]
    fn test_run_with() {
        let input = &b" {\"userName\": \"bjensen\"}\n"[..];
        let out = run_with(match_resource, "path required", Some("userName"), input).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), json!(["bjensen"]));

        let err = run_with(match_resource, "path required", None, &b"{}"[..]).unwrap_err();
        assert!(matches!(err, CliError::Usage("path required")));
        assert_eq!(err.to_string(), "path required");
    }
}
