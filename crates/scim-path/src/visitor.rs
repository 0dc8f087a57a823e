//! Node visitor protocol.
//!
//! A traversal walks a [`Path`](crate::Path) through a resource and hands
//! every step to a visitor: inner steps decide where to descend, the leaf
//! step does the work (gather, update, or test).

use serde_json::{Map, Value};

use crate::error::Result;
use crate::eval::FilterEvaluator;
use crate::types::Filter;

/// What an inner step reached.
#[derive(Debug)]
pub enum Reached<N> {
    /// Nothing to descend into; the branch ends quietly.
    Missing,
    /// A single node. An array node fans out over its object elements.
    Node(N),
    /// The elements of a multi-valued attribute selected by a value filter.
    Elements(Vec<N>),
}

/// Read-only visitor.
pub trait NodeVisitor {
    /// Resolve `field` of `parent`, narrowed by `filter`, for the next step.
    fn visit_inner_node<'a>(
        &mut self,
        parent: &'a Map<String, Value>,
        field: &str,
        filter: Option<&Filter>,
    ) -> Result<Reached<&'a Value>>;

    /// Act on `field` of `parent`, or on `parent` itself when `field` is absent.
    fn visit_leaf_node(
        &mut self,
        parent: &Map<String, Value>,
        field: Option<&str>,
        filter: Option<&Filter>,
    ) -> Result<()>;
}

/// Visitor that may modify the resource.
pub trait NodeVisitorMut {
    fn visit_inner_node<'a>(
        &mut self,
        parent: &'a mut Map<String, Value>,
        field: &str,
        filter: Option<&Filter>,
    ) -> Result<Reached<&'a mut Value>>;

    fn visit_leaf_node(
        &mut self,
        parent: &mut Map<String, Value>,
        field: Option<&str>,
        filter: Option<&Filter>,
    ) -> Result<()>;
}

/// Evaluate `filter` against every element before anything is touched.
pub(crate) fn matching_flags(items: &[Value], filter: &Filter) -> Result<Vec<bool>> {
    items
        .iter()
        .map(|item| FilterEvaluator::evaluate(filter, item))
        .collect()
}

/// The elements of `items` matching `filter`.
pub fn filter_array(items: &[Value], filter: &Filter) -> Result<Vec<Value>> {
    Ok(select_elements(items, filter)?.into_iter().cloned().collect())
}

/// The elements of `items` matching `filter`, taken out of `items` when
/// `remove` is set.
pub fn filter_array_mut(items: &mut Vec<Value>, filter: &Filter, remove: bool) -> Result<Vec<Value>> {
    let flags = matching_flags(items, filter)?;
    if !remove {
        return Ok(items
            .iter()
            .zip(flags)
            .filter_map(|(item, hit)| hit.then(|| item.clone()))
            .collect());
    }

    let mut matched = Vec::new();
    let mut kept = Vec::with_capacity(items.len());
    for (item, hit) in std::mem::take(items).into_iter().zip(flags) {
        if hit {
            matched.push(item);
        } else {
            kept.push(item);
        }
    }
    *items = kept;
    Ok(matched)
}

pub(crate) fn select_elements<'a>(items: &'a [Value], filter: &Filter) -> Result<Vec<&'a Value>> {
    let flags = matching_flags(items, filter)?;
    Ok(items
        .iter()
        .zip(flags)
        .filter_map(|(item, hit)| hit.then_some(item))
        .collect())
}

pub(crate) fn select_elements_mut<'a>(
    items: &'a mut [Value],
    filter: &Filter,
) -> Result<Vec<&'a mut Value>> {
    let flags = matching_flags(items, filter)?;
    Ok(items
        .iter_mut()
        .zip(flags)
        .filter_map(|(item, hit)| hit.then_some(item))
        .collect())
}

/// Read-only inner step: the child, narrowed to the matching elements when it
/// is an array and a filter is given.
pub(crate) fn narrow<'a>(
    parent: &'a Map<String, Value>,
    field: &str,
    filter: Option<&Filter>,
) -> Result<Reached<&'a Value>> {
    match (parent.get(field), filter) {
        (None, _) => Ok(Reached::Missing),
        (Some(Value::Array(items)), Some(filter)) => {
            Ok(Reached::Elements(select_elements(items, filter)?))
        }
        (Some(node), _) => Ok(Reached::Node(node)),
    }
}

pub(crate) fn narrow_mut<'a>(
    parent: &'a mut Map<String, Value>,
    field: &str,
    filter: Option<&Filter>,
) -> Result<Reached<&'a mut Value>> {
    match (parent.get_mut(field), filter) {
        (None, _) => Ok(Reached::Missing),
        (Some(Value::Array(items)), Some(filter)) => {
            Ok(Reached::Elements(select_elements_mut(items, filter)?))
        }
        (Some(node), _) => Ok(Reached::Node(node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn emails() -> Vec<Value> {
        vec![
            json!({"type": "work", "value": "a@example.com"}),
            json!({"type": "home", "value": "b@example.com"}),
            json!({"type": "work", "value": "c@example.com"}),
        ]
    }

    #[test]
    fn test_filter_array_returns_matches_in_order() {
        let filter = Filter::parse(r#"type eq "work""#).unwrap();
        let matched = filter_array(&emails(), &filter).unwrap();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0]["value"], "a@example.com");
        assert_eq!(matched[1]["value"], "c@example.com");
    }

    #[test]
    fn test_filter_array_mut_removes_matches() {
        let filter = Filter::parse(r#"type eq "work""#).unwrap();
        let mut items = emails();
        let matched = filter_array_mut(&mut items, &filter, true).unwrap();
        assert_eq!(matched.len(), 2);
        assert_eq!(items, vec![json!({"type": "home", "value": "b@example.com"})]);
    }

    #[test]
    fn test_filter_array_mut_keeps_source_without_remove() {
        let filter = Filter::parse(r#"type eq "home""#).unwrap();
        let mut items = emails();
        let matched = filter_array_mut(&mut items, &filter, false).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(items, emails());
    }

    #[test]
    fn test_filter_error_leaves_source_untouched() {
        let filter = Filter::parse(r#"value gt true"#).unwrap();
        let mut items = emails();
        assert!(filter_array_mut(&mut items, &filter, true).is_err());
        assert_eq!(items, emails());
    }

    #[test]
    fn test_narrow() {
        let parent = json!({"emails": emails(), "name": {"givenName": "Barbara"}});
        let parent = parent.as_object().unwrap();
        let filter = Filter::parse(r#"type eq "home""#).unwrap();

        match narrow(parent, "emails", Some(&filter)).unwrap() {
            Reached::Elements(found) => assert_eq!(found.len(), 1),
            other => panic!("expected elements, got {other:?}"),
        }
        assert!(matches!(narrow(parent, "name", None).unwrap(), Reached::Node(_)));
        assert!(matches!(narrow(parent, "title", None).unwrap(), Reached::Missing));
    }
}
