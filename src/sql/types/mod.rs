use std::{cmp::Ordering, fmt::Display, sync::OnceLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::error::{Error, Result};

/// Supported column base types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    BigInt,
    Decimal,
    Float,
    Numeric,
    Varchar,
    Char,
    Text,
    NVarchar,
    Date,
    DateTime,
    Timestamp,
    Bit,
    Blob,
    VarBinary,
    Json,
    Xml,
    Geometry,
}

impl DataType {
    /// Parses a base type name (case-insensitive)
    pub fn from_str(name: &str) -> Option<DataType> {
        Some(match name.to_uppercase().as_ref() {
            "INT" => DataType::Int,
            "BIGINT" => DataType::BigInt,
            "DECIMAL" => DataType::Decimal,
            "FLOAT" => DataType::Float,
            "NUMERIC" => DataType::Numeric,
            "VARCHAR" => DataType::Varchar,
            "CHAR" => DataType::Char,
            "TEXT" => DataType::Text,
            "NVARCHAR" => DataType::NVarchar,
            "DATE" => DataType::Date,
            "DATETIME" => DataType::DateTime,
            "TIMESTAMP" => DataType::Timestamp,
            "BIT" => DataType::Bit,
            "BLOB" => DataType::Blob,
            "VARBINARY" => DataType::VarBinary,
            "JSON" => DataType::Json,
            "XML" => DataType::Xml,
            "GEOMETRY" => DataType::Geometry,
            _ => return None,
        })
    }

    pub fn to_str(&self) -> &str {
        match self {
            DataType::Int => "INT",
            DataType::BigInt => "BIGINT",
            DataType::Decimal => "DECIMAL",
            DataType::Float => "FLOAT",
            DataType::Numeric => "NUMERIC",
            DataType::Varchar => "VARCHAR",
            DataType::Char => "CHAR",
            DataType::Text => "TEXT",
            DataType::NVarchar => "NVARCHAR",
            DataType::Date => "DATE",
            DataType::DateTime => "DATETIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Bit => "BIT",
            DataType::Blob => "BLOB",
            DataType::VarBinary => "VARBINARY",
            DataType::Json => "JSON",
            DataType::Xml => "XML",
            DataType::Geometry => "GEOMETRY",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A declared column type: base type plus optional numeric parameters,
/// e.g. `VARCHAR(50)` or `DECIMAL(10,2)`.
///
/// Persisted as its textual form so table files stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnType {
    pub datatype: DataType,
    pub params: Vec<u32>,
    /// Trailing text such as `NOT NULL` or `PRIMARY KEY`, kept as written
    pub modifiers: Option<String>,
}

fn type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)^\s*([A-Za-z]+)(?:\s*\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\))?(?:\s+(.*?))?\s*$",
        )
        .expect("valid column type regex")
    })
}

impl ColumnType {
    pub fn new(datatype: DataType) -> Self {
        Self {
            datatype,
            params: Vec::new(),
            modifiers: None,
        }
    }

    pub fn with_params(datatype: DataType, params: Vec<u32>) -> Self {
        Self {
            datatype,
            params,
            modifiers: None,
        }
    }

    /// Parses a type definition such as `varchar(20)` or `INT NOT NULL`
    ///
    /// Only the base type and its parameters are interpreted.
    pub fn parse(text: &str) -> Result<Self> {
        let caps = type_regex()
            .captures(text)
            .ok_or_else(|| Error::Validation(format!("unsupported column type: {}", text.trim())))?;
        let datatype = DataType::from_str(&caps[1])
            .ok_or_else(|| Error::Validation(format!("unsupported column type: {}", text.trim())))?;

        let mut params = Vec::new();
        for i in 2..=3 {
            if let Some(m) = caps.get(i) {
                params.push(m.as_str().parse().map_err(|_| {
                    Error::Validation(format!("invalid type parameter in {}", text.trim()))
                })?);
            }
        }
        let modifiers = caps
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .filter(|m| !m.is_empty());
        Ok(Self {
            datatype,
            params,
            modifiers,
        })
    }

    /// Declared character bound for VARCHAR/CHAR/NVARCHAR
    pub fn max_length(&self) -> Option<usize> {
        match self.datatype {
            DataType::Varchar | DataType::Char | DataType::NVarchar => {
                self.params.first().map(|n| *n as usize)
            }
            _ => None,
        }
    }

    /// Checks a textual value against this type
    pub fn check(&self, column: &str, value: &str) -> Result<()> {
        match self.datatype {
            DataType::Int | DataType::BigInt => {
                if !is_integer(value) {
                    return Err(Error::Validation(format!(
                        "value for {} must be an integer, got '{}'",
                        column, value
                    )));
                }
            }
            DataType::Decimal | DataType::Float | DataType::Numeric => {
                if !is_decimal(value) {
                    return Err(Error::Validation(format!(
                        "value for {} must be numeric, got '{}'",
                        column, value
                    )));
                }
            }
            DataType::Bit => {
                if !matches!(value, "0" | "1" | "True" | "False" | "true" | "false") {
                    return Err(Error::Validation(format!(
                        "value for {} must be boolean (0/1 or True/False), got '{}'",
                        column, value
                    )));
                }
            }
            DataType::Date | DataType::DateTime | DataType::Timestamp => {
                if parse_datetime(value).is_none() {
                    return Err(Error::Validation(format!(
                        "value for {} must be a valid date (YYYY-MM-DD or similar), got '{}'",
                        column, value
                    )));
                }
            }
            DataType::Varchar | DataType::Char | DataType::NVarchar => {
                if let Some(max) = self.max_length() {
                    let len = value.chars().count();
                    if len > max {
                        return Err(Error::Validation(format!(
                            "value for {} exceeds the maximum length of {} characters",
                            column, max
                        )));
                    }
                    if self.datatype == DataType::Char && len != max {
                        return Err(Error::Validation(format!(
                            "value for {} must be exactly {} characters",
                            column, max
                        )));
                    }
                }
            }
            DataType::Text
            | DataType::Blob
            | DataType::VarBinary
            | DataType::Json
            | DataType::Xml
            | DataType::Geometry => {}
        }
        Ok(())
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.datatype)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
            write!(f, "({})", params.join(","))?;
        }
        if let Some(modifiers) = &self.modifiers {
            write!(f, " {}", modifiers)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for ColumnType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ColumnType::parse(&value)
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.to_string()
    }
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal(value: &str) -> bool {
    match value.split_once('.') {
        Some((int, frac)) => {
            is_integer(int) && !frac.is_empty() && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => is_integer(value),
    }
}

/// Parses ISO-8601-like dates and date-times
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD[T ]HH:MM[:SS[.f]]` and RFC 3339 values
/// carrying an offset.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Runtime value stored in a row
///
/// Rows are written by INSERT/UPDATE as text; numeric values only appear
/// as aggregate output. Numeric and date semantics are coercions applied
/// where an operation needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value, text is parsed after trimming
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Null | Value::Boolean(_) => None,
        }
    }

    /// Join-key form: trimmed, lowercased, combining marks removed
    pub fn normalized(&self) -> String {
        match self {
            Value::Null => String::new(),
            v => normalize(&v.to_string()),
        }
    }

    /// Compares numerically when both sides are numeric, otherwise as text
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => Some(self.to_string().cmp(&other.to_string())),
        }
    }
}

/// Case- and diacritic-insensitive form of a string
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) if *b => write!(f, "True"),
            Value::Boolean(_) => write!(f, "False"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// A row maps column names to values, keys keep their insertion order
pub type Row = IndexMap<String, Value>;
