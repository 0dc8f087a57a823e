//! Rendering of paths and filters back to their textual form.

use std::fmt;

use crate::types::{Filter, Path, PathElement};

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = self.namespace() {
            write!(f, "{namespace}:")?;
        }
        for (i, element) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.attribute)?;
        if let Some(filter) = &self.filter {
            write!(f, "[{filter}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::And(left, right) => {
                write_operand(f, left)?;
                f.write_str(" and ")?;
                write_operand(f, right)
            }
            Filter::Or(left, right) => write!(f, "{left} or {right}"),
            Filter::Not(inner) => write!(f, "not ({inner})"),
            Filter::Present(path) => write!(f, "{path} pr"),
            Filter::Compare { op, path, value } => write!(f, "{path} {} {value}", op.as_str()),
            Filter::Complex { path, filter } => write!(f, "{path}[{filter}]"),
        }
    }
}

// `or` binds looser than `and`, so it needs parentheses under it.
fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Filter) -> fmt::Result {
    match operand {
        Filter::Or(_, _) => write!(f, "({operand})"),
        _ => write!(f, "{operand}"),
    }
}

/// Attribute names referenced by `path`, including those inside its filters.
pub fn get_referenced_attributes(path: &Path) -> Vec<String> {
    let mut attributes = Vec::new();
    for element in path {
        attributes.push(element.attribute.clone());
        if let Some(filter) = &element.filter {
            collect_filter_attributes(filter, &mut attributes);
        }
    }
    attributes
}

fn collect_filter_attributes(filter: &Filter, out: &mut Vec<String>) {
    match filter {
        Filter::And(left, right) | Filter::Or(left, right) => {
            collect_filter_attributes(left, out);
            collect_filter_attributes(right, out);
        }
        Filter::Not(inner) => collect_filter_attributes(inner, out),
        Filter::Present(path) | Filter::Compare { path, .. } => {
            out.extend(get_referenced_attributes(path));
        }
        Filter::Complex { path, filter } => {
            out.extend(get_referenced_attributes(path));
            collect_filter_attributes(filter, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathParser;

    fn round_trip(text: &str) -> String {
        PathParser::parse(text).unwrap().to_string()
    }

    #[test]
    fn test_render_simple_paths() {
        assert_eq!(round_trip("userName"), "userName");
        assert_eq!(round_trip("name.givenName"), "name.givenName");
        assert_eq!(round_trip(""), "");
    }

    #[test]
    fn test_render_namespace() {
        assert_eq!(round_trip("urn:acme:ext:1.0:badge"), "urn:acme:ext:1.0:badge");
        assert_eq!(round_trip("urn:acme:ext:1.0:"), "urn:acme:ext:1.0:");
    }

    #[test]
    fn test_render_filters() {
        assert_eq!(
            round_trip(r#"emails[type eq "work" and primary eq true].value"#),
            r#"emails[type eq "work" and primary eq true].value"#
        );
        assert_eq!(
            round_trip(r#"emails[(type eq "work" or type eq "home") and value pr]"#),
            r#"emails[(type eq "work" or type eq "home") and value pr]"#
        );
        assert_eq!(round_trip("x[NOT(a Gt 2)]"), "x[not (a gt 2)]");
        assert_eq!(round_trip("x[a[b eq null]]"), "x[a[b eq null]]");
    }

    #[test]
    fn test_render_is_reparseable() {
        let text = r#"addresses[type eq "work" or not (primary eq false)].streetAddress"#;
        let path = PathParser::parse(text).unwrap();
        assert_eq!(PathParser::parse(&path.to_string()).unwrap(), path);
    }

    #[test]
    fn test_get_referenced_attributes() {
        let path = PathParser::parse(r#"emails[type eq "work" and not (display pr)].value"#).unwrap();
        assert_eq!(
            get_referenced_attributes(&path),
            vec!["emails", "type", "display", "value"]
        );
    }
}
