//! Values stored against a key: owned text or a signed integer.

use core::fmt;

/// A stored value. The variant is the tag, so tag and payload cannot disagree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    Number(i64),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Text(_) => None,
            Value::Number(n) => Some(*n),
        }
    }

    /// Heap bytes owned by this value.
    pub(crate) fn heap_len(&self) -> usize {
        match self {
            Value::Text(s) => s.len(),
            Value::Number(_) => 0,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn accessors_follow_the_variant() {
        let t = Value::from("/a/file.txt");
        assert_eq!(t.as_text(), Some("/a/file.txt"));
        assert_eq!(t.as_number(), None);

        let n = Value::from(-7);
        assert_eq!(n.as_number(), Some(-7));
        assert_eq!(n.as_text(), None);
    }

    #[test]
    fn display_renders_raw_text_and_signed_numbers() {
        assert_eq!(Value::from("x\ty").to_string(), "x\ty");
        assert_eq!(Value::Number(-42).to_string(), "-42");
        assert_eq!(Value::Number(i64::MAX).to_string(), "9223372036854775807");
    }
}
