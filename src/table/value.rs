use serde::Serialize;
use std::fmt::Display;

/// A single cell value after it has been read out of a worksheet.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl Value {
    /// Null and empty text both count as blank. Whitespace-only text does not.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Interprets the value as a number; text is parsed after trimming.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            Value::Text(text) => text.trim().parse::<f64>().ok().filter(|number| number.is_finite()),
            _ => None,
        }
    }

    /// Renders the value the way it should appear in text output.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Returns `fallback` in place of a null value.
    pub fn or(self, fallback: Value) -> Value {
        if self.is_null() {
            fallback
        } else {
            self
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(text) => write!(f, "{}", text),
            Value::Number(number) => write!(f, "{}", format_number(*number)),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

/// Integral numbers print without a fractional part so that identifiers
/// stored as numbers ("1001") keep their textual form.
fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        format!("{}", number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(!Value::from(" ").is_blank());
        assert!(!Value::Number(0.0).is_blank());
    }

    #[test]
    fn renders_numbers() {
        assert_eq!(Value::Number(1001.0).to_text(), "1001");
        assert_eq!(Value::Number(-3.0).to_text(), "-3");
        assert_eq!(Value::Number(12.5).to_text(), "12.5");
        assert_eq!(Value::Number(0.1 + 0.2).to_text(), "0.30000000000000004");
    }

    #[test]
    fn renders_other_values() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Boolean(true).to_text(), "TRUE");
        assert_eq!(Value::from("Apple").to_text(), "Apple");
    }

    #[test]
    fn parses_numbers_from_text() {
        assert_eq!(Value::from(" 2 ").as_number(), Some(2.0));
        assert_eq!(Value::from("x").as_number(), None);
        assert_eq!(Value::from("NaN").as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }
}
