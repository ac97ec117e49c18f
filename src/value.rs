// vim: tw=80
//! The dynamic value model used by the interception layer.
//!
//! Mocked methods exchange [`Value`]s rather than statically typed
//! arguments; [`ValueType`] is the companion kind descriptor consulted by
//! the type guard and the argument matchers.

use std::fmt;

/// A dynamically typed argument or return value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Convenience constructor for string values.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// The kind of this value, or `None` for `Null`.
    pub fn kind(&self) -> Option<ValueType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ValueType::Bool),
            Value::Byte(_) => Some(ValueType::Byte),
            Value::Short(_) => Some(ValueType::Short),
            Value::Int(_) => Some(ValueType::Int),
            Value::Long(_) => Some(ValueType::Long),
            Value::Float(_) => Some(ValueType::Float),
            Value::Double(_) => Some(ValueType::Double),
            Value::Str(_) => Some(ValueType::Str),
            Value::List(_) => Some(ValueType::List),
            Value::Set(_) => Some(ValueType::Set),
            Value::Map(_) => Some(ValueType::Map),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Human-readable argument rendering: strings quoted, sequences
    /// bracketed, sets braced, mappings parenthesized as `(k:v, ...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Byte(n) => write!(f, "{n}"),
            Value::Short(n) => write!(f, "{n}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Double(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::List(items) => {
                write!(f, "[{}]", join(items))
            }
            Value::Set(items) => {
                write!(f, "{{{}}}", join(items))
            }
            Value::Map(entries) => {
                let body = entries
                    .iter()
                    .map(|(k, v)| format!("{k}:{v}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({body})")
            }
        }
    }
}

fn join(items: &[Value]) -> String {
    items
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The declared kind of a method parameter or return value.
///
/// `Void` only appears as a return kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Void,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Str,
    List,
    Set,
    Map,
}

impl ValueType {
    /// Primitive kinds must never be stubbed with null and compare
    /// exactly against a stubbed value's kind.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            ValueType::Bool
                | ValueType::Byte
                | ValueType::Short
                | ValueType::Int
                | ValueType::Long
                | ValueType::Float
                | ValueType::Double
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Void => "Void",
            ValueType::Bool => "Bool",
            ValueType::Byte => "Byte",
            ValueType::Short => "Short",
            ValueType::Int => "Int",
            ValueType::Long => "Long",
            ValueType::Float => "Float",
            ValueType::Double => "Double",
            ValueType::Str => "Str",
            ValueType::List => "List",
            ValueType::Set => "Set",
            ValueType::Map => "Map",
        }
    }

    /// The answer synthesized when no stub matches a call: zero/false for
    /// primitives, null for everything else.
    pub fn default_value(self) -> Value {
        match self {
            ValueType::Void => Value::Null,
            ValueType::Bool => Value::Bool(false),
            ValueType::Byte => Value::Byte(0),
            ValueType::Short => Value::Short(0),
            ValueType::Int => Value::Int(0),
            ValueType::Long => Value::Long(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Double => Value::Double(0.0),
            ValueType::Str | ValueType::List | ValueType::Set
                | ValueType::Map => Value::Null,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pluralize a call count for error messages.
pub(crate) fn calls(num: usize) -> String {
    match num {
        0 => "no calls".to_owned(),
        1 => "1 call".to_owned(),
        n => format!("{n} calls"),
    }
}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn argument_rendering() {
        assert_eq!("null", Value::Null.to_string());
        assert_eq!("\"abc\"", Value::str("abc").to_string());
        assert_eq!(
            "[1, 2]",
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_string()
        );
        assert_eq!(
            "{\"a\"}",
            Value::Set(vec![Value::str("a")]).to_string()
        );
        assert_eq!(
            "(\"k\":1)",
            Value::Map(vec![(Value::str("k"), Value::Int(1))]).to_string()
        );
    }

    #[test]
    fn call_pluralization() {
        assert_eq!("no calls", calls(0));
        assert_eq!("1 call", calls(1));
        assert_eq!("3 calls", calls(3));
    }

    #[test]
    fn default_values() {
        assert_eq!(Value::Int(0), ValueType::Int.default_value());
        assert_eq!(Value::Bool(false), ValueType::Bool.default_value());
        assert_eq!(Value::Null, ValueType::Str.default_value());
        assert_eq!(Value::Null, ValueType::Void.default_value());
    }
}
