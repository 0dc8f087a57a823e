//! SCIM attribute path and filter types (RFC 7644 §3.10 and §3.4.2.2).

use std::hash::{Hash, Hasher};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::namespace::{is_namespace, namespace_of, Extension};
use crate::parser::PathParser;

/// Comparison operators of the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq, // equal
    Ne, // not equal
    Co, // contains
    Sw, // starts with
    Ew, // ends with
    Gt, // greater than
    Ge, // greater than or equal
    Lt, // less than
    Le, // less than or equal
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Co => "co",
            CompareOp::Sw => "sw",
            CompareOp::Ew => "ew",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
        }
    }

    /// Resolve an operator keyword, ignoring case.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        const ALL: [CompareOp; 9] = [
            CompareOp::Eq,
            CompareOp::Ne,
            CompareOp::Co,
            CompareOp::Sw,
            CompareOp::Ew,
            CompareOp::Gt,
            CompareOp::Ge,
            CompareOp::Lt,
            CompareOp::Le,
        ];
        ALL.into_iter().find(|op| op.as_str().eq_ignore_ascii_case(keyword))
    }
}

/// Filter expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Both operands must match: `a and b`
    And(Box<Filter>, Box<Filter>),
    /// Either operand must match: `a or b`
    Or(Box<Filter>, Box<Filter>),
    /// Negation: `not (a)`
    Not(Box<Filter>),
    /// Presence test: `title pr`
    Present(Path),
    /// Attribute comparison: `userName eq "bjensen"`
    Compare { op: CompareOp, path: Path, value: Value },
    /// Value filter on a multi-valued attribute: `emails[type eq "work"]`
    Complex { path: Path, filter: Box<Filter> },
}

/// One segment of an attribute path: an attribute name and an optional
/// value filter.
#[derive(Debug, Clone)]
pub struct PathElement {
    pub attribute: String,
    pub filter: Option<Filter>,
}

impl PathElement {
    pub fn new(attribute: impl Into<String>, filter: Option<Filter>) -> Self {
        Self { attribute: attribute.into(), filter }
    }
}

impl PartialEq for PathElement {
    fn eq(&self, other: &Self) -> bool {
        self.attribute.eq_ignore_ascii_case(&other.attribute) && self.filter == other.filter
    }
}

impl Eq for PathElement {}

/// Attribute path, optionally rooted in an extension namespace.
///
/// Attribute names and the namespace compare case-insensitively; filters
/// compare structurally.
#[derive(Debug, Clone, Default)]
pub struct Path {
    namespace: Option<String>,
    elements: Vec<PathElement>,
}

impl Path {
    /// The path addressing the resource itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// A path addressing the extension object stored under `namespace`.
    ///
    /// Fails with [`Error::InvalidValue`] when `namespace` is not a URN.
    pub fn with_namespace(namespace: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        if !is_namespace(&namespace) {
            return Err(Error::InvalidValue(format!(
                "invalid extension schema URN: {namespace}"
            )));
        }
        Ok(Self { namespace: Some(namespace), elements: Vec::new() })
    }

    /// A path addressing the extension object of `T`.
    pub fn extension<T: Extension>() -> Self {
        Self { namespace: Some(namespace_of::<T>()), elements: Vec::new() }
    }

    /// Parse a textual attribute path such as `emails[type eq "work"].value`.
    pub fn parse(text: &str) -> Result<Self> {
        PathParser::parse(text)
    }

    pub(crate) fn namespaced(namespace: &str) -> Self {
        Self { namespace: Some(namespace.to_string()), elements: Vec::new() }
    }

    pub(crate) fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// Whether this path addresses the resource itself.
    pub fn is_root(&self) -> bool {
        self.namespace.is_none() && self.elements.is_empty()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Number of attribute elements (the namespace is not counted).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of traversal steps: every element, plus one for the namespace.
    pub fn depth(&self) -> usize {
        self.elements.len() + usize::from(self.namespace.is_some())
    }

    pub fn element(&self, index: usize) -> Option<&PathElement> {
        self.elements.get(index)
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    /// A copy of this path extended by `attribute`.
    pub fn attribute(&self, attribute: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push(PathElement::new(attribute, None));
        path
    }

    /// A copy of this path extended by `attribute[filter]`.
    pub fn attribute_with_filter(&self, attribute: impl Into<String>, filter: Filter) -> Self {
        let mut path = self.clone();
        path.push(PathElement::new(attribute, Some(filter)));
        path
    }

    /// A copy of this path extended by every element of `other`.
    pub fn append(&self, other: &Path) -> Self {
        let mut path = self.clone();
        path.elements.extend(other.elements.iter().cloned());
        path
    }

    /// The prefix holding the first `len` elements.
    pub fn sub(&self, len: usize) -> Self {
        Self {
            namespace: self.namespace.clone(),
            elements: self.elements.iter().take(len).cloned().collect(),
        }
    }

    /// A copy of this path with every value filter dropped.
    pub fn without_filters(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            elements: self
                .elements
                .iter()
                .map(|element| PathElement::new(element.attribute.clone(), None))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        let namespace = match (&self.namespace, &other.namespace) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };
        namespace && self.elements == other.elements
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.as_ref().map(|ns| ns.to_ascii_lowercase()).hash(state);
        for element in &self.elements {
            element.attribute.to_ascii_lowercase().hash(state);
        }
    }
}

impl std::str::FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Path::parse(&text).map_err(de::Error::custom)
    }
}
