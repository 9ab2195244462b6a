use std::fmt;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::domain::geometry::{self, Geometry};
use crate::domain::response::Value;
use crate::domain::timestamp;
use crate::domain::ScalarError;

/// Read-only view over at most one typed scalar.
///
/// The `to_*` accessors never fail: an absent value, a value of another
/// variant, or an undecodable encoding all yield the result type's default.
/// Callers that need to tell those cases apart use [`ScalarView::is_absent`]
/// or the checked `as_*` accessors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScalarView<'a> {
    value: Option<&'a Value>,
}

impl<'a> ScalarView<'a> {
    pub fn new(value: Option<&'a Value>) -> Self {
        Self { value }
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// String value, falling back to an untyped default value.
    pub fn to_string_value(&self) -> String {
        match self.value {
            Some(Value::Str(s)) if !s.is_empty() => s.clone(),
            Some(Value::Default(s)) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self.value {
            Some(Value::Bytes(b)) => b.clone(),
            _ => Vec::new(),
        }
    }

    pub fn to_int(&self) -> i64 {
        match self.value {
            Some(Value::Int(i)) => *i,
            _ => 0,
        }
    }

    pub fn to_bool(&self) -> bool {
        matches!(self.value, Some(Value::Bool(true)))
    }

    pub fn to_float(&self) -> f64 {
        match self.value {
            Some(Value::Double(d)) => *d,
            _ => 0.0,
        }
    }

    /// Decoded geometry; `None` when absent, mismatched or malformed.
    pub fn to_geometry(&self) -> Option<Geometry> {
        self.as_geometry().ok()
    }

    pub fn to_date(&self) -> DateTime<FixedOffset> {
        self.as_date().unwrap_or_else(|_| timestamp::zero())
    }

    pub fn to_datetime(&self) -> DateTime<FixedOffset> {
        self.as_datetime().unwrap_or_else(|_| timestamp::zero())
    }

    pub fn to_password(&self) -> String {
        match self.value {
            Some(Value::Password(p)) => p.clone(),
            _ => String::new(),
        }
    }

    pub fn to_uid(&self) -> u64 {
        match self.value {
            Some(Value::Uid(u)) => *u,
            _ => 0,
        }
    }

    // Checked accessors

    pub fn as_str(&self) -> Result<&'a str, ScalarError> {
        match self.present()? {
            Value::Str(s) | Value::Default(s) => Ok(s.as_str()),
            other => Err(mismatch("str_val", other)),
        }
    }

    pub fn as_bytes(&self) -> Result<&'a [u8], ScalarError> {
        match self.present()? {
            Value::Bytes(b) => Ok(b.as_slice()),
            other => Err(mismatch("bytes_val", other)),
        }
    }

    pub fn as_int(&self) -> Result<i64, ScalarError> {
        match self.present()? {
            Value::Int(i) => Ok(*i),
            other => Err(mismatch("int_val", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ScalarError> {
        match self.present()? {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch("bool_val", other)),
        }
    }

    pub fn as_float(&self) -> Result<f64, ScalarError> {
        match self.present()? {
            Value::Double(d) => Ok(*d),
            other => Err(mismatch("double_val", other)),
        }
    }

    pub fn as_geometry(&self) -> Result<Geometry, ScalarError> {
        match self.present()? {
            Value::Geo(raw) => geometry::decode(raw).map_err(|source| {
                debug!("geo_val decode failed: {source}");
                ScalarError::Decode {
                    kind: "geo_val",
                    source,
                }
            }),
            other => Err(mismatch("geo_val", other)),
        }
    }

    pub fn as_date(&self) -> Result<DateTime<FixedOffset>, ScalarError> {
        match self.present()? {
            Value::Date(raw) => decode_timestamp("date_val", raw),
            other => Err(mismatch("date_val", other)),
        }
    }

    pub fn as_datetime(&self) -> Result<DateTime<FixedOffset>, ScalarError> {
        match self.present()? {
            Value::DateTime(raw) => decode_timestamp("datetime_val", raw),
            other => Err(mismatch("datetime_val", other)),
        }
    }

    pub fn as_password(&self) -> Result<&'a str, ScalarError> {
        match self.present()? {
            Value::Password(p) => Ok(p.as_str()),
            other => Err(mismatch("password_val", other)),
        }
    }

    pub fn as_uid(&self) -> Result<u64, ScalarError> {
        match self.present()? {
            Value::Uid(u) => Ok(*u),
            other => Err(mismatch("uid_val", other)),
        }
    }

    fn present(&self) -> Result<&'a Value, ScalarError> {
        self.value.ok_or(ScalarError::Absent)
    }
}

fn mismatch(expected: &'static str, found: &Value) -> ScalarError {
    ScalarError::Mismatch {
        expected,
        found: found.kind(),
    }
}

fn decode_timestamp(kind: &'static str, raw: &[u8]) -> Result<DateTime<FixedOffset>, ScalarError> {
    timestamp::decode(raw).map_err(|source| {
        debug!("{kind} decode failed: {source}");
        ScalarError::Decode { kind, source }
    })
}

/// Raw rendering of the wrapped value, for debugging.
impl fmt::Display for ScalarView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(v) = self.value else {
            return write!(f, "<absent>");
        };
        match v {
            Value::Str(s) | Value::Default(s) | Value::Password(s) => {
                write!(f, "{}: {:?}", v.kind(), s)
            }
            Value::Bytes(b) | Value::Geo(b) | Value::Date(b) | Value::DateTime(b) => {
                write!(f, "{}: {:?}", v.kind(), b)
            }
            Value::Int(i) => write!(f, "int_val: {i}"),
            Value::Bool(b) => write!(f, "bool_val: {b}"),
            Value::Double(d) => write!(f, "double_val: {d}"),
            Value::Uid(u) => write!(f, "uid_val: {u:#x}"),
        }
    }
}
