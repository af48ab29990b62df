//! Typed property values

use serde::{Deserialize, Serialize};

/// A single scalar value stored in a tree property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
}

impl Value {
    /// The kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Long(_) => ValueKind::Long,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

/// The declared element kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Long,
    Double,
    String,
}

/// A typed node property: a scalar, or an ordered sequence of scalars of one
/// declared kind. Multi-valued properties keep their kind even when empty.
///
/// Protected properties are system-managed and are skipped by all matching
/// and rewriting logic.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    value: PropertyValue,
    protected: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum PropertyValue {
    Single(Value),
    Multi(ValueKind, Vec<Value>),
}

impl Property {
    pub fn single(value: impl Into<Value>) -> Self {
        Self {
            value: PropertyValue::Single(value.into()),
            protected: false,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::single(Value::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Self::single(Value::Bool(value))
    }

    pub fn long(value: i64) -> Self {
        Self::single(Value::Long(value))
    }

    pub fn multi(kind: ValueKind, values: Vec<Value>) -> Self {
        Self {
            value: PropertyValue::Multi(kind, values),
            protected: false,
        }
    }

    /// Multi-valued string property from anything stringy.
    pub fn strings<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::multi(
            ValueKind::String,
            values
                .into_iter()
                .map(|s| Value::String(s.into()))
                .collect(),
        )
    }

    /// Mark this property as protected (system-managed).
    pub fn protect(mut self) -> Self {
        self.protected = true;
        self
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self.value, PropertyValue::Multi(..))
    }

    /// The declared element kind; for scalars, the kind of the value itself.
    pub fn kind(&self) -> ValueKind {
        match &self.value {
            PropertyValue::Single(value) => value.kind(),
            PropertyValue::Multi(kind, _) => *kind,
        }
    }

    /// All values in order. A scalar yields a one-element slice.
    pub fn values(&self) -> &[Value] {
        match &self.value {
            PropertyValue::Single(value) => std::slice::from_ref(value),
            PropertyValue::Multi(_, values) => values,
        }
    }

    /// The value of a scalar property; `None` when multi-valued.
    pub fn as_single(&self) -> Option<&Value> {
        match &self.value {
            PropertyValue::Single(value) => Some(value),
            PropertyValue::Multi(..) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_single().and_then(Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_single().and_then(Value::as_bool)
    }

    pub fn as_long(&self) -> Option<i64> {
        self.as_single().and_then(Value::as_long)
    }

    /// Value equality, ignoring the protected flag: same multiplicity, same
    /// kinds, same values in the same order.
    pub fn value_eq(&self, other: &Property) -> bool {
        self.value == other.value
    }
}
