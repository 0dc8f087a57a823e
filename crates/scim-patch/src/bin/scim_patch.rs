//! `scim-patch` - apply a SCIM PATCH request to a resource.
//!
//! Usage:
//!   scim-patch '<patch-json>'
//!
//! The resource is read from stdin. The patch (a PatchOp message or an array
//! of operations) is the first argument. Set `SCIM_LOG=debug` to trace.

use scim_patch::cli::{apply_patch_request, run};

fn main() {
    run(apply_patch_request, "First argument must be a SCIM PATCH request.");
}
