use serde::{Deserialize, Serialize};

/// A single field value, as held by a record or returned by the store.
///
/// The serde representation is untagged and therefore lossy: a `Json`
/// scalar reads back as `Int`, `Float`, `Bool` or `Str`, and a `Json`
/// array reads back as `List`. Coerce through [`FieldType::coerce`] after
/// deserializing to restore the declared shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A list of candidate values (`IN` constraints) or an array field.
    List(Vec<Value>),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value is a number or a string that parses as one.
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(f) => f.is_finite(),
            Value::Str(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            _ => false,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text form used for SQL literals and result-set keys.
    ///
    /// Returns `None` for `Null`. Booleans render as `1`/`0`, lists and
    /// JSON documents as their JSON encoding (a bare JSON string renders
    /// without quotes).
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Str(s) => Some(s.clone()),
            Value::List(_) => Some(self.to_json().to_string()),
            Value::Json(serde_json::Value::String(s)) => Some(s.clone()),
            Value::Json(json) => Some(json.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Json(json) => json.clone(),
        }
    }

    fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            other => Value::Json(other.clone()),
        }
    }
}

/// Semantic type tag of a record field.
///
/// Drives value coercion on assignment, SQL literal rendering and whether
/// a list of candidates expands into an `IN (...)` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Float,
    Boolean,
    String,
    DateTime,
    Enum,
    Blob,
    Array,
    Json,
    Object,
}

impl FieldType {
    /// Opaque types compare a list of values as one value instead of
    /// expanding it into `IN (...)`.
    pub fn is_opaque(self) -> bool {
        matches!(
            self,
            FieldType::Array | FieldType::Json | FieldType::Object | FieldType::Boolean
        )
    }

    /// Coerce `value` to this type. Values that cannot represent the type
    /// become `Null`.
    pub fn coerce(self, value: Value) -> Value {
        if value.is_null() {
            return Value::Null;
        }
        match self {
            FieldType::Integer => coerce_integer(value),
            FieldType::Float => coerce_float(value),
            FieldType::Boolean => Value::Bool(truthy(&value)),
            FieldType::Array | FieldType::Json | FieldType::Object => coerce_json(value),
            FieldType::String | FieldType::DateTime | FieldType::Enum | FieldType::Blob => {
                value.to_text().map(Value::Str).unwrap_or(Value::Null)
            }
        }
    }
}

fn coerce_integer(value: Value) -> Value {
    match value {
        Value::Int(i) => Value::Int(i),
        Value::Float(f) => truncate_to_i64(f),
        Value::Bool(b) => Value::Int(i64::from(b)),
        Value::Str(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => Value::Int(i),
                Err(_) => s.parse::<f64>().map(truncate_to_i64).unwrap_or(Value::Null),
            }
        }
        Value::Json(json) => match Value::from_json(&json) {
            Value::Json(_) => Value::Null,
            scalar => coerce_integer(scalar),
        },
        _ => Value::Null,
    }
}

fn coerce_float(value: Value) -> Value {
    match value {
        Value::Float(f) => finite_float(f),
        Value::Int(i) => Value::Float(i as f64),
        Value::Bool(b) => Value::Float(if b { 1.0 } else { 0.0 }),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(finite_float)
            .unwrap_or(Value::Null),
        Value::Json(json) => match Value::from_json(&json) {
            Value::Json(_) => Value::Null,
            scalar => coerce_float(scalar),
        },
        _ => Value::Null,
    }
}

/// NaN and the infinities never compare equal to a stored value, so they
/// are treated as unparseable.
fn finite_float(f: f64) -> Value {
    if f.is_finite() {
        Value::Float(f)
    } else {
        Value::Null
    }
}

/// `i64::MAX as f64` rounds up to 2^63, hence the exclusive upper bound.
fn truncate_to_i64(f: f64) -> Value {
    let t = f.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Value::Int(t as i64)
    } else {
        Value::Null
    }
}

fn coerce_json(value: Value) -> Value {
    match value {
        Value::Str(s) => match serde_json::from_str::<serde_json::Value>(&s) {
            Ok(json) => Value::Json(json),
            Err(_) => Value::Json(serde_json::Value::String(s)),
        },
        Value::Json(json) => Value::Json(json),
        other => Value::Json(other.to_json()),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Str(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off"
        ),
        Value::List(items) => !items.is_empty(),
        Value::Json(json) => match json {
            serde_json::Value::Array(items) => !items.is_empty(),
            serde_json::Value::Object(map) => !map.is_empty(),
            scalar => truthy(&Value::from_json(scalar)),
        },
    }
}

// ── Conversions ─────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(i: $ty) -> Self {
                    Value::Int(i64::from(i))
                }
            }
        )+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        match i64::try_from(i) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Str(i.to_string()),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::Json(json)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion() {
        assert_eq!(FieldType::Integer.coerce("42".into()), Value::Int(42));
        assert_eq!(FieldType::Integer.coerce(" 7 ".into()), Value::Int(7));
        assert_eq!(FieldType::Integer.coerce(3.9.into()), Value::Int(3));
        assert_eq!(FieldType::Integer.coerce(true.into()), Value::Int(1));
        assert_eq!(FieldType::Integer.coerce("abc".into()), Value::Null);
    }

    #[test]
    fn test_integer_out_of_range_is_null() {
        assert_eq!(FieldType::Integer.coerce("99999999999999999999".into()), Value::Null);
        assert_eq!(FieldType::Integer.coerce("-1e19".into()), Value::Null);
        assert_eq!(FieldType::Integer.coerce(1e300.into()), Value::Null);
        assert_eq!(FieldType::Integer.coerce("1e18".into()), Value::Int(1_000_000_000_000_000_000));
        assert_eq!(
            FieldType::Integer.coerce(i64::MIN.to_string().into()),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(FieldType::Float.coerce("NaN".into()), Value::Null);
        assert_eq!(FieldType::Float.coerce("inf".into()), Value::Null);
        assert_eq!(FieldType::Float.coerce("-infinity".into()), Value::Null);
        assert_eq!(FieldType::Float.coerce(f64::NAN.into()), Value::Null);
        assert_eq!(FieldType::Float.coerce(" 2.5 ".into()), Value::Float(2.5));
    }

    #[test]
    fn test_serde_is_untagged() {
        let json = serde_json::to_string(&Value::Json(serde_json::json!(5))).unwrap();
        assert_eq!(json, "5");
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Int(5));
        assert_eq!(FieldType::Json.coerce(back), Value::Json(serde_json::json!(5)));

        let back: Value = serde_json::from_str(r#"["a",1]"#).unwrap();
        assert_eq!(back, Value::List(vec![Value::Str("a".into()), Value::Int(1)]));
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(FieldType::Boolean.coerce("0".into()), Value::Bool(false));
        assert_eq!(FieldType::Boolean.coerce("FALSE".into()), Value::Bool(false));
        assert_eq!(FieldType::Boolean.coerce("yes".into()), Value::Bool(true));
        assert_eq!(FieldType::Boolean.coerce(2.into()), Value::Bool(true));
        assert_eq!(FieldType::Boolean.coerce(Value::Null), Value::Null);
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(FieldType::String.coerce(5.into()), Value::Str("5".into()));
        assert_eq!(FieldType::String.coerce(false.into()), Value::Str("0".into()));
    }

    #[test]
    fn test_json_coercion() {
        let coerced = FieldType::Array.coerce(vec![1, 2].into());
        assert_eq!(coerced, Value::Json(serde_json::json!([1, 2])));
        assert_eq!(coerced.to_text().unwrap(), "[1,2]");

        let parsed = FieldType::Object.coerce(r#"{"a":1}"#.into());
        assert_eq!(parsed, Value::Json(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_numeric_detection() {
        assert!(Value::Int(4).is_numeric());
        assert!(Value::from("4.5").is_numeric());
        assert!(!Value::from("four").is_numeric());
        assert!(!Value::Null.is_numeric());
    }

    #[test]
    fn test_opaque_types() {
        assert!(FieldType::Boolean.is_opaque());
        assert!(FieldType::Json.is_opaque());
        assert!(!FieldType::Integer.is_opaque());
        assert!(!FieldType::String.is_opaque());
    }
}
