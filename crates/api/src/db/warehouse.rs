use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde_json::{Map, Number, Value};
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow},
    Column, Row, TypeInfo, ValueRef,
};
use std::{sync::LazyLock, time::Duration};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};
use weather_api_core::DatabaseSettings;

/// One result row, keyed by column name in select order.
pub type Record = Map<String, Value>;

static NUMBERED_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+").expect("placeholder pattern is valid"));

/// A statement with numbered placeholders and the values bound to them, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl SqlQuery {
    pub fn new(statement: impl ToString, params: Vec<String>) -> Self {
        Self {
            sql: statement.to_string(),
            params,
        }
    }

    /// The statement as MySQL expects it: `$1`, `$2`, ... become `?`.
    ///
    /// Placeholders are numbered in the order their values were pushed, so
    /// positional binding keeps the same order.
    pub fn positional_sql(&self) -> String {
        NUMBERED_PLACEHOLDER.replace_all(&self.sql, "?").into_owned()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query warehouse: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to format time value: {0}")]
    TimeFormat(#[from] time::error::Format),
    #[error("Unsupported type {type_name} in column {column}")]
    UnsupportedColumn { column: String, type_name: String },
    #[error("Failed to decode row: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Runs a parameterized statement against the warehouse and hands back its rows.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, query: &SqlQuery) -> Result<Vec<Record>, Error>;
}

pub struct MySqlWarehouse {
    pool: MySqlPool,
}

impl MySqlWarehouse {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Builds the pool without opening a connection; the first query connects.
    /// Demo endpoints keep working when the warehouse is unreachable.
    pub fn connect_lazy(settings: &DatabaseSettings) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.name)
            .charset("utf8mb4");

        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .connect_lazy_with(options);

        Self::new(pool)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Executor for MySqlWarehouse {
    async fn execute(&self, query: &SqlQuery) -> Result<Vec<Record>, Error> {
        let sql = query.positional_sql();
        debug!(
            "running warehouse query with {} bound value(s): {}",
            query.params.len(),
            sql
        );

        let mut statement = sqlx::query(&sql);
        for param in &query.params {
            statement = statement.bind(param.as_str());
        }
        let rows = statement.fetch_all(&self.pool).await?;

        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &MySqlRow) -> Result<Record, Error> {
    let mut record = Record::new();
    for column in row.columns() {
        let index = column.ordinal();
        let value = if row.try_get_raw(index)?.is_null() {
            ColumnValue::Null
        } else {
            let kind = column_kind(column.name(), column.type_info().name())?;
            read_column(row, index, kind)?
        };
        record.insert(column.name().to_owned(), value.into_json()?);
    }
    Ok(record)
}

/// How a MySQL column is read off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Signed,
    Unsigned,
    Year,
    Float,
    Double,
    Decimal,
    Date,
    DateTime,
    Timestamp,
    Text,
}

fn column_kind(column: &str, type_name: &str) -> Result<ColumnKind, Error> {
    let kind = match type_name {
        "BOOLEAN" => ColumnKind::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => ColumnKind::Signed,
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => ColumnKind::Unsigned,
        // binary protocol sends YEAR as a two byte integer
        "YEAR" => ColumnKind::Year,
        "FLOAT" => ColumnKind::Float,
        "DOUBLE" => ColumnKind::Double,
        "DECIMAL" => ColumnKind::Decimal,
        "DATE" => ColumnKind::Date,
        "DATETIME" => ColumnKind::DateTime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET"
        | "JSON" => ColumnKind::Text,
        _ => {
            return Err(Error::UnsupportedColumn {
                column: column.to_owned(),
                type_name: type_name.to_owned(),
            })
        }
    };
    Ok(kind)
}

/// A column value after decoding, before it becomes JSON.
#[derive(Debug, Clone, PartialEq)]
enum ColumnValue {
    Null,
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(f32),
    Double(f64),
    Decimal(String),
    Date(Date),
    DateTime(PrimitiveDateTime),
    Timestamp(OffsetDateTime),
    Text(String),
}

fn read_column(row: &MySqlRow, index: usize, kind: ColumnKind) -> Result<ColumnValue, Error> {
    let value = match kind {
        ColumnKind::Bool => ColumnValue::Bool(row.try_get(index)?),
        ColumnKind::Signed => ColumnValue::Signed(row.try_get(index)?),
        ColumnKind::Unsigned => ColumnValue::Unsigned(row.try_get(index)?),
        ColumnKind::Year => {
            ColumnValue::Unsigned(u64::from(row.try_get_unchecked::<u16, _>(index)?))
        }
        ColumnKind::Float => ColumnValue::Float(row.try_get(index)?),
        ColumnKind::Double => ColumnValue::Double(row.try_get(index)?),
        // AVG over DECIMAL columns comes back as DECIMAL text
        ColumnKind::Decimal => ColumnValue::Decimal(row.try_get_unchecked(index)?),
        ColumnKind::Date => ColumnValue::Date(row.try_get(index)?),
        ColumnKind::DateTime => ColumnValue::DateTime(row.try_get(index)?),
        ColumnKind::Timestamp => ColumnValue::Timestamp(row.try_get(index)?),
        ColumnKind::Text => ColumnValue::Text(row.try_get_unchecked(index)?),
    };
    Ok(value)
}

impl ColumnValue {
    fn into_json(self) -> Result<Value, Error> {
        let value = match self {
            ColumnValue::Null => Value::Null,
            ColumnValue::Bool(value) => Value::Bool(value),
            ColumnValue::Signed(value) => Value::from(value),
            ColumnValue::Unsigned(value) => Value::from(value),
            // f32 -> f64 widening turns 70.2 into 70.19999694824219, go through the
            // shortest decimal form instead
            ColumnValue::Float(value) => float_value(value.to_string().parse().ok()),
            ColumnValue::Double(value) => float_value(Some(value)),
            ColumnValue::Decimal(text) => float_value(text.parse().ok()),
            ColumnValue::Date(date) => {
                Value::String(date.format(format_description!("[year]-[month]-[day]"))?)
            }
            ColumnValue::DateTime(at) => Value::String(at.format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second]"
            ))?),
            ColumnValue::Timestamp(at) => Value::String(at.format(&Rfc3339)?),
            ColumnValue::Text(text) => Value::String(text),
        };
        Ok(value)
    }
}

fn float_value(value: Option<f64>) -> Value {
    value
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
