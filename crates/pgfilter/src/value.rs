//! Loosely-typed scalar values bound as query parameters.
//!
//! Filter criteria and update payloads arrive from JSON bodies and query
//! strings, so their values are not known statically. [`Value`] carries one
//! scalar and coerces it to whatever column type Postgres reports for the
//! placeholder it is bound to.

use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

use crate::error::{DbError, DbResult};

type BoxError = Box<dyn Error + Sync + Send>;

/// A single scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value, used for range checks.
    ///
    /// Text counts as numeric when it parses as a number, because query-string
    /// criteria always arrive as text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Null | Value::Bool(_) => None,
        }
    }

    /// Exact numeric view of the value, used for range checks.
    ///
    /// Integers convert losslessly; text is parsed in plain or scientific
    /// notation. `None` for values outside the decimal range.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(n) => Some(Decimal::from(*n)),
            Value::Float(f) => Decimal::try_from(*f).ok(),
            Value::Text(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            Value::Null | Value::Bool(_) => None,
        }
    }

    /// Boolean view of the value; accepts `true`/`false` text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Text(s) => s.trim().parse::<bool>().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = DbError;

    fn try_from(v: serde_json::Value) -> DbResult<Self> {
        match v {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Int(i)),
                None => n
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| DbError::validation(format!("Unsupported number: {n}"))),
            },
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            other => Err(DbError::validation(format!(
                "Expected a scalar value, got {other}"
            ))),
        }
    }
}

fn is_text_like(ty: &Type) -> bool {
    <&str as ToSql>::accepts(ty)
}

fn bool_to_sql(b: bool, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::BOOL => b.to_sql(ty, out),
        _ if is_text_like(ty) => b.to_string().as_str().to_sql(ty, out),
        _ => Err(format!("cannot bind boolean to column of type {ty}").into()),
    }
}

fn int_to_sql(n: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(n)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(n)?.to_sql(ty, out),
        Type::INT8 => n.to_sql(ty, out),
        Type::FLOAT4 => (n as f32).to_sql(ty, out),
        Type::FLOAT8 => (n as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(n).to_sql(ty, out),
        _ if is_text_like(ty) => n.to_string().as_str().to_sql(ty, out),
        _ => Err(format!("cannot bind integer to column of type {ty}").into()),
    }
}

fn float_to_sql(x: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => (x as f32).to_sql(ty, out),
        Type::FLOAT8 => x.to_sql(ty, out),
        Type::NUMERIC => Decimal::try_from(x)?.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 if x.fract() == 0.0 => int_to_sql(x as i64, ty, out),
        _ if is_text_like(ty) => x.to_string().as_str().to_sql(ty, out),
        _ => Err(format!("cannot bind float {x} to column of type {ty}").into()),
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if is_text_like(ty) {
        return s.to_sql(ty, out);
    }
    let trimmed = s.trim();
    match *ty {
        Type::BOOL => trimmed.parse::<bool>()?.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => int_to_sql(trimmed.parse::<i64>()?, ty, out),
        Type::FLOAT4 | Type::FLOAT8 => float_to_sql(trimmed.parse::<f64>()?, ty, out),
        Type::NUMERIC => Decimal::from_str(trimmed)?.to_sql(ty, out),
        _ => Err(format!("cannot bind text to column of type {ty}").into()),
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => bool_to_sql(*b, ty, out),
            Value::Int(n) => int_to_sql(*n, ty, out),
            Value::Float(x) => float_to_sql(*x, ty, out),
            Value::Text(s) => text_to_sql(s, ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::BOOL
                | Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::NUMERIC
        ) || is_text_like(ty)
    }

    to_sql_checked!();
}
