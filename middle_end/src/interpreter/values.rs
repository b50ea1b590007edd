//! Value representation and operations for the interpreter

use std::fmt;

/// Values that can be manipulated by the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value
    Int(i64),

    /// String value
    Str(String),

    /// Unit/void value
    Unit,
}

impl Value {
    /// Try to convert to integer
    pub fn as_int(&self) -> Result<i64, String> {
        match self {
            Value::Int(i) => Ok(*i),
            _ => Err("Expected integer value".into()),
        }
    }

    /// Try to view as a string slice
    pub fn as_str(&self) -> Result<&str, String> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err("Expected string value".into()),
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "{}", s),
            Value::Unit => write!(f, "()"),
        }
    }
}
