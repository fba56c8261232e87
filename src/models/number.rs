use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A count column as the sheet returns it: sometimes a JSON number,
/// sometimes a string, sometimes empty. Always non-negative once parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlexNumber(pub u64);

impl FlexNumber {
    pub fn value(self) -> u64 {
        self.0
    }

    /// Parse what a user typed into a count field. Arabic-Indic digits are
    /// accepted, anything that is not a digit is dropped.
    pub fn parse_lossy(s: &str) -> Self {
        let digits = clean_digits(s);
        // Overflowing input saturates rather than resetting to zero
        let value = if digits.is_empty() {
            0
        } else {
            digits.parse::<u64>().unwrap_or(u64::MAX)
        };
        FlexNumber(value)
    }

    /// Parse a string cell from the sheet. The whole cell must be a number
    /// ("12", "12.0", "1e3", Arabic digits); anything else reads as 0.
    fn parse_cell(s: &str) -> Self {
        let normalized = normalize_digits(s.trim());
        if normalized.is_empty() {
            return FlexNumber(0);
        }
        if let Ok(v) = normalized.parse::<u64>() {
            return FlexNumber(v);
        }
        match normalized.parse::<f64>() {
            Ok(v) => from_float(v),
            Err(_) => FlexNumber(0),
        }
    }
}

/// Negative, NaN and infinite values read as 0; huge values saturate.
fn from_float(v: f64) -> FlexNumber {
    if v.is_finite() && v > 0.0 {
        FlexNumber(v.trunc() as u64)
    } else {
        FlexNumber(0)
    }
}

impl fmt::Display for FlexNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FlexNumber {
    fn from(v: u64) -> Self {
        FlexNumber(v)
    }
}

/// Convert Arabic-Indic (٠-٩) and Extended Arabic-Indic (۰-۹) digits to ASCII.
pub fn normalize_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            _ => c,
        })
        .collect()
}

/// Normalize digits and strip everything else, as numeric inputs do.
pub fn clean_digits(s: &str) -> String {
    normalize_digits(s)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect()
}

impl Serialize for FlexNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

struct FlexVisitor;

impl<'de> Visitor<'de> for FlexVisitor {
    type Value = FlexNumber;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string, an empty string or null")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FlexNumber, E> {
        Ok(FlexNumber(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FlexNumber, E> {
        Ok(FlexNumber(v.max(0) as u64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FlexNumber, E> {
        Ok(from_float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FlexNumber, E> {
        Ok(FlexNumber::parse_cell(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<FlexNumber, E> {
        Ok(FlexNumber(v as u64))
    }

    fn visit_unit<E: de::Error>(self) -> Result<FlexNumber, E> {
        Ok(FlexNumber(0))
    }

    fn visit_none<E: de::Error>(self) -> Result<FlexNumber, E> {
        Ok(FlexNumber(0))
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<FlexNumber, D::Error> {
        d.deserialize_any(FlexVisitor)
    }
}

impl<'de> Deserialize<'de> for FlexNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FlexVisitor)
    }
}

/// Sheet text columns sometimes come back as numbers (a password of `1234`,
/// a code of `7`). Accept either and keep the text.
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}
