//! scim-patch - SCIM PATCH operations over JSON resources.
//!
//! Builds on `scim-path` for addressing and provides the PatchOp message
//! types plus the logic behind the command-line tools.

pub mod patch_op;
pub mod cli;

pub use patch_op::{PatchError, PatchOperation, PatchRequest, PatchType, PATCH_OP_SCHEMA};
