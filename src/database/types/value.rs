//! SQL value type shared by predicates, bind parameters and literal rendering

use crate::models::query_builder::dialects::SqlDialect;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

const CURRENT_TIMESTAMP: &str = "CURRENT_TIMESTAMP";

/// Generic SQL value used both as a bind parameter and as an inlined literal
///
/// Literal rendering is dialect-aware: booleans, dates and text escaping all
/// go through the active [`SqlDialect`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,

    Bool(bool),

    // Integer variants
    SmallInt(i16),
    Int(i32),
    BigInt(i64),

    // Floating point
    Float(f32),
    Double(f64),
    #[cfg(feature = "decimal")]
    Decimal(rust_decimal::Decimal),
    #[cfg(not(feature = "decimal"))]
    Decimal(String),

    String(String),

    Bytes(Vec<u8>),

    // Temporal types
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),

    Uuid(String),
    Json(JsonValue),

    /// List of values, only valid as the right side of IN / NOT IN
    Array(Vec<SqlValue>),

    /// SQL text emitted as-is (e.g. `CURRENT_DATE`), never quoted or bound
    Verbatim(String),
}

impl SqlValue {
    /// `CURRENT_DATE` marker
    pub fn current_date() -> Self {
        SqlValue::Verbatim("CURRENT_DATE".to_string())
    }

    /// `CURRENT_TIME` marker
    pub fn current_time() -> Self {
        SqlValue::Verbatim("CURRENT_TIME".to_string())
    }

    /// Current timestamp marker, written with the dialect's function
    pub fn current_timestamp() -> Self {
        SqlValue::Verbatim(CURRENT_TIMESTAMP.to_string())
    }

    /// Raw SQL marker
    pub fn verbatim(sql: impl Into<String>) -> Self {
        SqlValue::Verbatim(sql.into())
    }

    /// Build an IN list from any collection of convertible values
    ///
    /// ```
    /// use querycraft::SqlValue;
    ///
    /// let list = SqlValue::list(vec![1, 2, 3]);
    /// assert!(list.is_array());
    /// ```
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        SqlValue::Array(values.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// NaN and the infinities, which have no SQL literal
    pub fn is_non_finite(&self) -> bool {
        match self {
            SqlValue::Float(f) => !f.is_finite(),
            SqlValue::Double(f) => !f.is_finite(),
            _ => false,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SqlValue::Array(_))
    }

    pub fn is_verbatim(&self) -> bool {
        matches!(self, SqlValue::Verbatim(_))
    }

    /// Whether the value is character data, which case-insensitive
    /// comparisons and LIKE patterns apply to
    pub fn is_text(&self) -> bool {
        matches!(self, SqlValue::String(_))
    }

    /// Borrow the text of a `String` or `Verbatim` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::String(s) | SqlValue::Verbatim(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to an i64 if possible
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::SmallInt(i) => Some(*i as i64),
            SqlValue::Int(i) => Some(*i as i64),
            SqlValue::BigInt(i) => Some(*i),
            SqlValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Whether the value is bound as a parameter in parameterized rendering
    pub fn is_bindable(&self) -> bool {
        !matches!(
            self,
            SqlValue::Null | SqlValue::Verbatim(_) | SqlValue::Array(_)
        )
    }

    /// Render the value as an SQL literal for the given dialect
    pub fn to_sql_literal(&self, dialect: &dyn SqlDialect) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(b) => dialect.boolean_literal(*b).to_string(),

            SqlValue::SmallInt(i) => i.to_string(),
            SqlValue::Int(i) => i.to_string(),
            SqlValue::BigInt(i) => i.to_string(),
            SqlValue::Float(f) if !f.is_finite() => "NULL".to_string(),
            SqlValue::Double(f) if !f.is_finite() => "NULL".to_string(),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Double(f) => f.to_string(),
            SqlValue::Decimal(d) => d.to_string(),

            SqlValue::String(s) => format!("'{}'", dialect.escape_text(s)),
            SqlValue::Uuid(uuid) => format!("'{}'", uuid),
            SqlValue::Json(json) => format!("'{}'", dialect.escape_text(&json.to_string())),
            SqlValue::Bytes(bytes) => format!("X'{}'", hex_encode(bytes)),

            SqlValue::Date(date) => dialect.date_literal(date),
            SqlValue::Time(time) => dialect.time_literal(time),
            SqlValue::DateTime(dt) => dialect.datetime_literal(dt),

            SqlValue::Array(values) => values
                .iter()
                .map(|v| v.to_sql_literal(dialect))
                .collect::<Vec<_>>()
                .join(","),

            SqlValue::Verbatim(sql) if sql == CURRENT_TIMESTAMP => {
                dialect.current_timestamp().to_string()
            }
            SqlValue::Verbatim(sql) => sql.clone(),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::SmallInt(i) => write!(f, "{}", i),
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::BigInt(i) => write!(f, "{}", i),
            SqlValue::Float(fl) => write!(f, "{}", fl),
            SqlValue::Double(d) => write!(f, "{}", d),
            SqlValue::Decimal(d) => write!(f, "{}", d),
            SqlValue::String(s) | SqlValue::Uuid(s) | SqlValue::Verbatim(s) => write!(f, "{}", s),
            SqlValue::Bytes(b) => write!(f, "<binary:{} bytes>", b.len()),
            SqlValue::Date(d) => write!(f, "{}", d),
            SqlValue::Time(t) => write!(f, "{}", t),
            SqlValue::DateTime(dt) => write!(f, "{}", dt),
            SqlValue::Json(j) => write!(f, "{}", j),
            SqlValue::Array(values) => {
                write!(f, "[")?;
                for (i, val) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
        }
    }
}

fn hex_encode(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}

// From trait implementations for common types
impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::SmallInt(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        SqlValue::BigInt(v as i64)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Double(v)
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::String(s)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::String(s.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(s: &String) -> Self {
        SqlValue::String(s.clone())
    }
}

impl From<&i32> for SqlValue {
    fn from(i: &i32) -> Self {
        SqlValue::Int(*i)
    }
}

impl From<&i64> for SqlValue {
    fn from(i: &i64) -> Self {
        SqlValue::BigInt(*i)
    }
}

impl From<&bool> for SqlValue {
    fn from(b: &bool) -> Self {
        SqlValue::Bool(*b)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<JsonValue> for SqlValue {
    fn from(v: JsonValue) -> Self {
        SqlValue::Json(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => SqlValue::Null,
        }
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(date: NaiveDate) -> Self {
        SqlValue::Date(date)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(time: NaiveTime) -> Self {
        SqlValue::Time(time)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(dt: NaiveDateTime) -> Self {
        SqlValue::DateTime(dt)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for SqlValue {
    fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
        SqlValue::DateTime(dt.naive_utc())
    }
}

#[cfg(feature = "uuid")]
impl From<uuid::Uuid> for SqlValue {
    fn from(uuid: uuid::Uuid) -> Self {
        SqlValue::Uuid(uuid.to_string())
    }
}

#[cfg(feature = "decimal")]
impl From<rust_decimal::Decimal> for SqlValue {
    fn from(d: rust_decimal::Decimal) -> Self {
        SqlValue::Decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::query_builder::dialects::{MySQLDialect, OracleDialect, PostgresDialect};

    #[test]
    fn test_from_string_ref() {
        let s = String::from("test");
        let value: SqlValue = (&s).into();
        assert_eq!(value, SqlValue::String("test".to_string()));
    }

    #[test]
    fn test_from_option() {
        let none: Option<i32> = None;
        assert!(SqlValue::from(none).is_null());
        assert_eq!(SqlValue::from(Some(5)), SqlValue::Int(5));
    }

    #[test]
    fn test_string_literal_escaping() {
        let value = SqlValue::from("O'Brien");
        assert_eq!(value.to_sql_literal(&PostgresDialect::new()), "'O''Brien'");
    }

    #[test]
    fn test_mysql_escapes_backslashes() {
        let value = SqlValue::from(r"C:\temp");
        assert_eq!(value.to_sql_literal(&MySQLDialect::new()), r"'C:\\temp'");
    }

    #[test]
    fn test_boolean_literal_follows_dialect() {
        assert_eq!(
            SqlValue::Bool(true).to_sql_literal(&PostgresDialect::new()),
            "TRUE"
        );
        assert_eq!(SqlValue::Bool(false).to_sql_literal(&OracleDialect::new()), "0");
    }

    #[test]
    fn test_verbatim_is_not_quoted() {
        let value = SqlValue::current_date();
        assert_eq!(value.to_sql_literal(&PostgresDialect::new()), "CURRENT_DATE");
        assert!(!value.is_bindable());
    }

    #[test]
    fn test_current_timestamp_follows_dialect() {
        let now = SqlValue::current_timestamp();
        assert_eq!(now.to_sql_literal(&OracleDialect::new()), "SYSTIMESTAMP");
        assert_eq!(now.to_sql_literal(&MySQLDialect::new()), "CURRENT_TIMESTAMP()");
        assert_eq!(now.to_sql_literal(&PostgresDialect::new()), "CURRENT_TIMESTAMP");
    }

    #[test]
    fn test_non_finite_floats_render_null() {
        let dialect = PostgresDialect::new();
        assert_eq!(SqlValue::Double(f64::NAN).to_sql_literal(&dialect), "NULL");
        assert_eq!(SqlValue::Float(f32::INFINITY).to_sql_literal(&dialect), "NULL");
        assert_eq!(SqlValue::Double(1.5).to_sql_literal(&dialect), "1.5");
        assert!(SqlValue::Double(f64::NEG_INFINITY).is_non_finite());
        assert!(!SqlValue::Int(1).is_non_finite());
    }

    #[test]
    fn test_list() {
        let list = SqlValue::list(vec!["a", "b"]);
        assert_eq!(list.to_sql_literal(&PostgresDialect::new()), "'a','b'");
    }
}
