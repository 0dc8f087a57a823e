//! SCIM PATCH (RFC 7644 §3.5.2).
//!
//! # Operations
//!
//! `add`, `remove`, and `replace`, each addressed by an attribute path and
//! validated on construction. A [`PatchRequest`] carries an ordered list of
//! them in the PatchOp message format.

pub mod types;
pub mod apply;

pub use types::{PatchError, PatchOperation, PatchRequest, PatchType, PATCH_OP_SCHEMA};
