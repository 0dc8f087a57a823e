//! Filter construction helpers.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::parser::PathParser;
use crate::types::*;

/// Helper functions for constructing filters without parsing text.
pub struct Ast;

impl Ast {
    /// A single-attribute path.
    pub fn attribute(name: impl Into<String>) -> Path {
        Path::root().attribute(name)
    }

    /// Create a comparison filter.
    pub fn compare(op: CompareOp, path: Path, value: impl Into<Value>) -> Filter {
        Filter::Compare { op, path, value: value.into() }
    }

    pub fn eq(path: Path, value: impl Into<Value>) -> Filter {
        Self::compare(CompareOp::Eq, path, value)
    }

    pub fn ne(path: Path, value: impl Into<Value>) -> Filter {
        Self::compare(CompareOp::Ne, path, value)
    }

    pub fn co(path: Path, value: impl Into<Value>) -> Filter {
        Self::compare(CompareOp::Co, path, value)
    }

    pub fn sw(path: Path, value: impl Into<Value>) -> Filter {
        Self::compare(CompareOp::Sw, path, value)
    }

    pub fn ew(path: Path, value: impl Into<Value>) -> Filter {
        Self::compare(CompareOp::Ew, path, value)
    }

    pub fn gt(path: Path, value: impl Into<Value>) -> Filter {
        Self::compare(CompareOp::Gt, path, value)
    }

    pub fn ge(path: Path, value: impl Into<Value>) -> Filter {
        Self::compare(CompareOp::Ge, path, value)
    }

    pub fn lt(path: Path, value: impl Into<Value>) -> Filter {
        Self::compare(CompareOp::Lt, path, value)
    }

    pub fn le(path: Path, value: impl Into<Value>) -> Filter {
        Self::compare(CompareOp::Le, path, value)
    }

    /// Create a presence filter.
    pub fn pr(path: Path) -> Filter {
        Filter::Present(path)
    }

    pub fn and(left: Filter, right: Filter) -> Filter {
        Filter::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Filter, right: Filter) -> Filter {
        Filter::Or(Box::new(left), Box::new(right))
    }

    pub fn not(inner: Filter) -> Filter {
        Filter::Not(Box::new(inner))
    }

    /// Create a value filter on a multi-valued attribute.
    pub fn complex(path: Path, filter: Filter) -> Filter {
        Filter::Complex { path, filter: Box::new(filter) }
    }
}

impl Filter {
    /// Parse a textual filter such as `type eq "work" and primary eq true`.
    pub fn parse(text: &str) -> Result<Self> {
        PathParser::parse_filter(text)
    }

    /// The attribute path tested by a leaf filter.
    pub fn attribute_path(&self) -> Option<&Path> {
        match self {
            Filter::Present(path) | Filter::Compare { path, .. } | Filter::Complex { path, .. } => {
                Some(path)
            }
            Filter::And(_, _) | Filter::Or(_, _) | Filter::Not(_) => None,
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
