//! sqlx-backed connectors.
//!
//! Statements run inside a transaction that is always rolled back, so an
//! ad hoc query never commits side effects. Column values are converted
//! to JSON by their reported type name.

use async_trait::async_trait;
use base64::Engine;
use serde_json::{Value, json};
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::postgres::types::{Oid, PgInterval, PgMoney};
use sqlx::postgres::{
    PgArguments, PgConnectOptions, PgConnection, PgRow, PgTypeInfo, PgTypeKind, Postgres,
};
use sqlx::query::Query;
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::{Decimal, JsonValue, Uuid};
use sqlx::{Column, Connection, Row as _, TypeInfo, ValueRef};

use super::adapter::{Row, SqlConnector, SqlSession};
use crate::core::config::DatabaseConfig;
use crate::domains::tools::ToolResult;

pub struct MySqlConnector;

#[async_trait]
impl SqlConnector for MySqlConnector {
    async fn connect(&self, config: &DatabaseConfig) -> ToolResult<Box<dyn SqlSession>> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);
        let conn = MySqlConnection::connect_with(&options).await?;
        Ok(Box::new(MySqlSession { conn }))
    }
}

struct MySqlSession {
    conn: MySqlConnection,
}

#[async_trait]
impl SqlSession for MySqlSession {
    async fn fetch_all(&mut self, query: &str, params: &[Value]) -> ToolResult<Vec<Row>> {
        let mut tx = self.conn.begin().await?;
        let statement = params.iter().fold(sqlx::query(query), bind_mysql);
        let rows = statement.fetch_all(&mut *tx).await?;
        tx.rollback().await?;
        rows.iter().map(mysql_row).collect()
    }

    async fn close(self: Box<Self>) -> ToolResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}

pub struct PostgresConnector;

#[async_trait]
impl SqlConnector for PostgresConnector {
    async fn connect(&self, config: &DatabaseConfig) -> ToolResult<Box<dyn SqlSession>> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);
        let conn = PgConnection::connect_with(&options).await?;
        Ok(Box::new(PostgresSession { conn }))
    }
}

struct PostgresSession {
    conn: PgConnection,
}

#[async_trait]
impl SqlSession for PostgresSession {
    async fn fetch_all(&mut self, query: &str, params: &[Value]) -> ToolResult<Vec<Row>> {
        let mut tx = self.conn.begin().await?;
        let statement = params.iter().fold(sqlx::query(query), bind_postgres);
        let rows = statement.fetch_all(&mut *tx).await?;
        tx.rollback().await?;
        rows.iter().map(postgres_row).collect()
    }

    async fn close(self: Box<Self>) -> ToolResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}

fn bind_mysql<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => query.bind(i),
            (None, Some(u)) => query.bind(u),
            _ => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(sqlx::types::Json(other.clone())),
    }
}

fn bind_postgres<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(sqlx::types::Json(other.clone())),
    }
}

fn mysql_row(row: &MySqlRow) -> ToolResult<Row> {
    let mut out = Row::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let value = if row.try_get_raw(idx)?.is_null() {
            Value::Null
        } else {
            mysql_value(row, idx, column.type_info().name())?
        };
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn mysql_value(row: &MySqlRow, idx: usize, type_name: &str) -> ToolResult<Value> {
    let value = match type_name {
        "BOOLEAN" => json!(row.try_get::<bool, _>(idx)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            json!(row.try_get::<i64, _>(idx)?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => json!(row.try_get::<u64, _>(idx)?),
        "YEAR" => json!(row.try_get_unchecked::<u16, _>(idx)?),
        "FLOAT" => json!(row.try_get::<f32, _>(idx)?),
        "DOUBLE" => json!(row.try_get::<f64, _>(idx)?),
        "DECIMAL" => json!(row.try_get::<Decimal, _>(idx)?.to_string()),
        "DATE" => json!(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        "TIME" => json!(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        "DATETIME" => json!(format_naive(row.try_get::<NaiveDateTime, _>(idx)?)),
        "TIMESTAMP" => json!(row.try_get::<DateTime<Utc>, _>(idx)?.to_rfc3339()),
        "JSON" => row.try_get::<JsonValue, _>(idx)?,
        name if mysql_is_text(name) => json!(row.try_get_unchecked::<String, _>(idx)?),
        // BLOBs, BIT, GEOMETRY and anything unlisted are raw bytes.
        other => match row.try_get_unchecked::<Vec<u8>, _>(idx) {
            Ok(bytes) => encode_bytes(&bytes),
            Err(_) => unsupported(other),
        },
    };
    Ok(value)
}

fn mysql_is_text(type_name: &str) -> bool {
    matches!(
        type_name,
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET"
    )
}

fn postgres_row(row: &PgRow) -> ToolResult<Row> {
    let mut out = Row::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let value = if row.try_get_raw(idx)?.is_null() {
            Value::Null
        } else {
            postgres_value(row, idx, column.type_info())?
        };
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn postgres_value(row: &PgRow, idx: usize, info: &PgTypeInfo) -> ToolResult<Value> {
    let value = match info.name() {
        "BOOL" => json!(row.try_get::<bool, _>(idx)?),
        "INT2" => json!(row.try_get::<i16, _>(idx)?),
        "INT4" => json!(row.try_get::<i32, _>(idx)?),
        "INT8" => json!(row.try_get::<i64, _>(idx)?),
        "FLOAT4" => json!(row.try_get::<f32, _>(idx)?),
        "FLOAT8" => json!(row.try_get::<f64, _>(idx)?),
        "NUMERIC" => json!(row.try_get::<Decimal, _>(idx)?.to_string()),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => json!(row.try_get::<String, _>(idx)?),
        "UUID" => json!(row.try_get::<Uuid, _>(idx)?.to_string()),
        "DATE" => json!(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        "TIME" => json!(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        "TIMESTAMP" => json!(format_naive(row.try_get::<NaiveDateTime, _>(idx)?)),
        "TIMESTAMPTZ" => json!(row.try_get::<DateTime<Utc>, _>(idx)?.to_rfc3339()),
        "JSON" | "JSONB" => row.try_get::<JsonValue, _>(idx)?,
        "BYTEA" => encode_bytes(&row.try_get::<Vec<u8>, _>(idx)?),
        "OID" => json!(row.try_get::<Oid, _>(idx)?.0),
        "INTERVAL" => interval_json(&row.try_get::<PgInterval, _>(idx)?),
        "MONEY" => money_json(row.try_get::<PgMoney, _>(idx)?),
        "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => {
            json!(row.try_get_unchecked::<Vec<String>, _>(idx)?)
        }
        "BOOL[]" => json!(row.try_get::<Vec<bool>, _>(idx)?),
        "INT2[]" => json!(row.try_get::<Vec<i16>, _>(idx)?),
        "INT4[]" => json!(row.try_get::<Vec<i32>, _>(idx)?),
        "INT8[]" => json!(row.try_get::<Vec<i64>, _>(idx)?),
        "FLOAT4[]" => json!(row.try_get::<Vec<f32>, _>(idx)?),
        "FLOAT8[]" => json!(row.try_get::<Vec<f64>, _>(idx)?),
        "NUMERIC[]" => json!(
            row.try_get::<Vec<Decimal>, _>(idx)?
                .iter()
                .map(Decimal::to_string)
                .collect::<Vec<_>>()
        ),
        "UUID[]" => json!(
            row.try_get::<Vec<Uuid>, _>(idx)?
                .iter()
                .map(Uuid::to_string)
                .collect::<Vec<_>>()
        ),
        _ if postgres_is_text(info) => json!(row.try_get_unchecked::<String, _>(idx)?),
        // Binary wire formats we do not decode (INET, ranges, geometry, ...).
        other => unsupported(other),
    };
    Ok(value)
}

/// Types whose binary wire form is their UTF-8 text.
fn postgres_is_text(info: &PgTypeInfo) -> bool {
    matches!(info.kind(), PgTypeKind::Enum(_)) || matches!(info.name(), "XML" | "CITEXT")
}

fn interval_json(interval: &PgInterval) -> Value {
    json!({
        "months": interval.months,
        "days": interval.days,
        "microseconds": interval.microseconds,
    })
}

/// Money is stored in cents; the common two-digit locale is assumed.
fn money_json(money: PgMoney) -> Value {
    json!(money.to_decimal(2).to_string())
}

fn unsupported(type_name: &str) -> Value {
    json!(format!("<unsupported type {}>", type_name))
}

fn format_naive(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn encode_bytes(bytes: &[u8]) -> Value {
    json!(base64::engine::general_purpose::STANDARD.encode(bytes))
}
