//! `scim-path` - print the values an attribute path addresses in a resource.
//!
//! Usage:
//!   scim-path '<path>'
//!
//! The resource is read from stdin. The path is the first argument, e.g.
//! `emails[type eq "work"].value`.

use scim_patch::cli::{match_resource, run};

fn main() {
    run(match_resource, "First argument must be a SCIM attribute path.");
}
