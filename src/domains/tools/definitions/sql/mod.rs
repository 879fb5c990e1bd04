//! Relational database tools (MySQL and PostgreSQL).

mod adapter;
mod drivers;
mod mysql;
mod postgres;

pub use adapter::{RelationalAdapter, Row, SqlConnector, SqlEngine, SqlSession};
pub use drivers::{MySqlConnector, PostgresConnector};
pub use mysql::{MysqlDescribeTableTool, MysqlExecuteQueryTool, MysqlListTablesTool};
pub use postgres::{PostgresDescribeTableTool, PostgresExecuteQueryTool, PostgresListTablesTool};

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

/// Parameters shared by the `*_execute_query` tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteQueryParams {
    /// SQL statement to run. Placeholders follow the engine: `?` for MySQL,
    /// `$1`, `$2`, ... for PostgreSQL.
    pub query: String,

    /// Values bound to the placeholders, in order.
    #[serde(default)]
    pub params: Option<Vec<Value>>,
}

/// Parameters shared by the `*_describe_table` tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableParams {
    /// Name of the table to describe.
    pub table_name: String,
}
