//! SCIM attribute paths (RFC 7644 §3.10) over JSON resources.
//!
//! This crate parses attribute paths such as `emails[type eq "work"].value`
//! and walks them through a resource held as a `serde_json` object to read,
//! test, add, remove, or replace the addressed values. Extension attributes
//! are addressed through their schema URN, e.g.
//! `urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:manager.value`.
//!
//! # Example
//!
//! ```
//! use scim_path::{add_value, match_path, replace_value, Path};
//! use serde_json::json;
//!
//! let mut user = json!({
//!     "userName": "bjensen",
//!     "emails": [
//!         {"type": "work", "value": "bjensen@example.com"},
//!         {"type": "home", "value": "babs@jensen.org"}
//!     ]
//! });
//! let user = user.as_object_mut().unwrap();
//!
//! let path: Path = r#"emails[type eq "work"].value"#.parse().unwrap();
//! assert_eq!(match_path(&path, user).unwrap(), vec![json!("bjensen@example.com")]);
//!
//! replace_value(&path, user, json!("barbara@example.com")).unwrap();
//! add_value(&"nickName".parse().unwrap(), user, json!("Babs")).unwrap();
//!
//! assert_eq!(user["emails"][0]["value"], "barbara@example.com");
//! assert_eq!(user["nickName"], "Babs");
//! ```

mod types;
pub use types::*;

mod error;
pub use error::{Error, Result};

mod ast;
pub use ast::Ast;

mod parser;
pub use parser::{ParseError, PathParser};

mod util;
pub use util::get_referenced_attributes;

mod namespace;
pub use namespace::{enforce_urn, is_namespace, namespace_of, Extension};

mod compare;
pub use compare::{compare_to, parse_date, AttributeType, Definition};

mod eval;
pub use eval::FilterEvaluator;

mod visitor;
pub use visitor::{filter_array, filter_array_mut, NodeVisitor, NodeVisitorMut, Reached};

mod traverse;
pub use traverse::{traverse, traverse_mut};

mod gather;
pub use gather::GatheringVisitor;

mod update;
pub use update::UpdatingVisitor;

mod exists;
pub use exists::ExistenceVisitor;

mod support;
pub use support::{add_value, exists_path, match_path, remove_value, replace_value, value};
