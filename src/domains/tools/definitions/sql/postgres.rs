//! PostgreSQL tool definitions.

use serde_json::Value;
use tracing::{info, instrument};

use super::{DescribeTableParams, ExecuteQueryParams};
use crate::domains::tools::definitions::{NoParams, ToolDefinition};
use crate::domains::tools::{ToolContext, ToolResult};

/// Run an ad hoc statement against PostgreSQL.
pub struct PostgresExecuteQueryTool;

impl ToolDefinition for PostgresExecuteQueryTool {
    const NAME: &'static str = "postgresql_execute_query";
    const DESCRIPTION: &'static str = "Execute a SQL query against the configured PostgreSQL database. Use `$1`, `$2`, ... placeholders and pass values in `params`. Returns the result rows and their count.";
    type Params = ExecuteQueryParams;

    #[instrument(skip_all)]
    async fn execute(params: ExecuteQueryParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("PostgreSQL query tool called");
        let bound = params.params.unwrap_or_default();
        ctx.postgres.execute_query(&params.query, &bound).await
    }
}

/// List tables in the `public` schema.
pub struct PostgresListTablesTool;

impl ToolDefinition for PostgresListTablesTool {
    const NAME: &'static str = "postgresql_list_tables";
    const DESCRIPTION: &'static str = "List all tables in the public schema of the configured PostgreSQL database.";
    type Params = NoParams;

    async fn execute(_params: NoParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.postgres.list_tables().await
    }
}

pub struct PostgresDescribeTableTool;

impl ToolDefinition for PostgresDescribeTableTool {
    const NAME: &'static str = "postgresql_describe_table";
    const DESCRIPTION: &'static str = "Describe the columns of a PostgreSQL table: name, data type, nullability and default.";
    type Params = DescribeTableParams;

    #[instrument(skip_all, fields(table = %params.table_name))]
    async fn execute(params: DescribeTableParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.postgres.describe_table(&params.table_name).await
    }
}
