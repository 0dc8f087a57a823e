//! Extension schema namespaces.

const URN_PREFIX: &str = "urn:";

/// Whether `text` starts with a URN prefix (any case) followed by something.
pub fn is_namespace(text: &str) -> bool {
    text.len() > URN_PREFIX.len()
        && text
            .get(..URN_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(URN_PREFIX))
}

/// Prefix `name` with `urn:` unless it already is a URN.
pub fn enforce_urn(name: &str) -> String {
    if is_namespace(name) {
        name.to_string()
    } else {
        format!("{URN_PREFIX}{name}")
    }
}

/// A type whose attributes live in an extension schema.
///
/// ```
/// use scim_path::{namespace_of, Extension};
///
/// struct Enterprise;
/// impl Extension for Enterprise {
///     const SCHEMA: Option<&'static str> =
///         Some("urn:ietf:params:scim:schemas:extension:enterprise:2.0:User");
/// }
///
/// assert_eq!(
///     namespace_of::<Enterprise>(),
///     "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User"
/// );
/// ```
pub trait Extension {
    /// Declared schema identifier.
    const SCHEMA: Option<&'static str> = None;
}

/// The namespace URN of `T`: its declared schema, or else its fully
/// qualified type name, prefixed with `urn:` when needed.
pub fn namespace_of<T: Extension + ?Sized>() -> String {
    enforce_urn(T::SCHEMA.unwrap_or_else(std::any::type_name::<T>))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Undeclared;
    impl Extension for Undeclared {}

    #[test]
    fn test_is_namespace() {
        assert!(is_namespace("urn:x"));
        assert!(is_namespace("URN:ietf:params"));
        assert!(!is_namespace("urn:"));
        assert!(!is_namespace("userName"));
        assert!(!is_namespace("ur"));
        assert!(!is_namespace("ün:x"));
    }

    #[test]
    fn test_enforce_urn() {
        assert_eq!(enforce_urn("urn:acme:ext"), "urn:acme:ext");
        assert_eq!(enforce_urn("acme:ext"), "urn:acme:ext");
    }

    #[test]
    fn test_namespace_of_falls_back_to_type_name() {
        let namespace = namespace_of::<Undeclared>();
        assert!(namespace.starts_with("urn:"));
        assert!(namespace.ends_with("Undeclared"));
    }
}
