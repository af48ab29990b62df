//! Mapped-property expressions
//!
//! Replacement templates inherit values from the subject tree through
//! string expressions of the form `${./some/prop}`. The whole value must
//! be an expression for it to be mapped; anything else passes through as
//! a literal.
//!
//! - `${./prop}` copies the referenced subject property, native type and
//!   multiplicity preserved
//! - `!${./prop}` negates a boolean (or a `"true"`/`"false"` string)
//! - `${./prop:fallback}` supplies a literal default when the reference
//!   is missing
//! - `${'./prop:with:colons'}` quotes a path containing `:`
//!
//! Multi-valued template properties are candidate lists: the first
//! candidate that resolves (or defaults) wins and the property becomes
//! its result. If at least one candidate is an expression and none
//! resolves, the property is deleted rather than emitting a broken
//! reference.

use regraft_core::{NodeId, Property, TreeStore, Value, ValueKind};

/// A parsed mapped-property expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Dot-relative property path into the subject tree.
    pub path: String,
    /// Negate the resolved value (`!` prefix).
    pub negate: bool,
    /// Literal fallback when the path does not resolve.
    pub default: Option<String>,
}

/// Parse a scalar string as a mapped-property expression. Returns `None`
/// when the value is not an expression.
pub fn parse_reference(raw: &str) -> Option<Reference> {
    let (negate, rest) = match raw.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let inner = rest.strip_prefix("${")?.strip_suffix('}')?;

    let (path, default) = match quoted(inner) {
        Some(parts) => parts,
        None => bare(inner),
    };

    Some(Reference {
        path: path.to_string(),
        negate,
        default: default.map(str::to_string),
    })
}

/// `'path':default` form: the path runs to the first closing quote and may
/// contain colons; the tail must be empty or a non-empty default.
fn quoted(inner: &str) -> Option<(&str, Option<&str>)> {
    let body = inner.strip_prefix('\'')?;
    let end = body.find('\'')?;
    let path = &body[..end];
    match &body[end + 1..] {
        "" => Some((path, None)),
        tail => {
            let default = tail.strip_prefix(':')?;
            if default.is_empty() {
                None
            } else {
                Some((path, Some(default)))
            }
        }
    }
}

/// Unquoted reference: the path ends at the first colon with a non-empty
/// remainder; a trailing colon stays part of the path. A stray leading or
/// trailing quote is stripped.
fn bare(inner: &str) -> (&str, Option<&str>) {
    let (path, default) = match inner.split_once(':') {
        Some((path, default)) if !default.is_empty() => (path, Some(default)),
        _ => (inner, None),
    };
    let path = path.strip_prefix('\'').unwrap_or(path);
    let path = path.strip_suffix('\'').unwrap_or(path);
    (path, default)
}

/// Resolve the property `name` on `node` as a (potentially) mapped
/// property against the subject tree, per the candidate semantics above.
///
/// Returns the surviving destination property (resolved, defaulted, or an
/// untouched literal) for chaining into string-rewrite directives, or
/// `None` when the property was deleted or is not string-typed.
pub fn map_property<S: TreeStore>(
    store: &mut S,
    subject: NodeId,
    node: NodeId,
    name: &str,
) -> Option<Property> {
    let property = store.property(node, name)?.clone();
    if property.kind() != ValueKind::String {
        // only string-typed properties can hold expressions
        return None;
    }

    let mut delete = false;
    for value in property.values() {
        let Some(raw) = value.as_str() else { continue };
        let Some(reference) = parse_reference(raw) else {
            continue;
        };
        // an expression that stays unresolved deletes the property
        delete = true;

        let source = store
            .resolve_property(subject, &reference.path)
            .and_then(|(src_node, src_name)| store.property(src_node, &src_name))
            .filter(|p| !p.is_protected())
            .cloned();

        if let Some(source) = source {
            let mapped = if reference.negate { negated(source) } else { source };
            store.remove_property(node, name);
            store.set_property(node, name, mapped);
            delete = false;
            break;
        }
        if let Some(default) = reference.default {
            // a multi-valued destination is redeclared as a single string
            store.set_property(node, name, Property::string(default));
            delete = false;
            break;
        }
    }

    if delete {
        store.remove_property(node, name);
        return None;
    }
    store.property(node, name).cloned()
}

/// Negation applies to scalar booleans and to the exact strings
/// `"true"`/`"false"`; anything else is copied unchanged.
fn negated(property: Property) -> Property {
    match property.as_single() {
        Some(Value::Bool(b)) => return Property::bool(!b),
        Some(Value::String(s)) if s == "true" => return Property::string("false"),
        Some(Value::String(s)) if s == "false" => return Property::string("true"),
        _ => {}
    }
    property
}
