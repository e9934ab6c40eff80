//! Resolved compile-time values.

use std::fmt;

/// A fully resolved, feature-independent constant.
///
/// Arrays are immutable once built; reduction always produces a new one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i64),
    Array(Vec<Value>),
}

impl Value {
    /// Build an integer array from plain numbers.
    pub fn int_array(values: impl IntoIterator<Item = i64>) -> Self {
        Value::Array(values.into_iter().map(Value::Int).collect())
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Array(_) => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            Value::Int(_) => None,
        }
    }

    /// Name of the value's kind, used in type-mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Array(_) => "array",
        }
    }

    /// Every integer in this value, nested arrays flattened depth-first.
    pub fn flatten_ints(&self) -> Vec<i64> {
        fn walk(value: &Value, out: &mut Vec<i64>) {
            match value {
                Value::Int(n) => out.push(*n),
                Value::Array(values) => {
                    for v in values {
                        walk(v, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Array(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_walks_nested_arrays_in_order() {
        let value = Value::Array(vec![
            Value::Int(1),
            Value::int_array([2, 3]),
            Value::Array(vec![Value::int_array([4])]),
        ]);
        assert_eq!(value.flatten_ints(), vec![1, 2, 3, 4]);
        assert_eq!(value.to_string(), "[1, [2, 3], [[4]]]");
    }

    #[test]
    fn accessors_match_kind() {
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert!(Value::Int(7).as_array().is_none());
        assert_eq!(Value::int_array([1]).type_name(), "array");
    }
}
