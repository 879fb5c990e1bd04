//! MySQL tool definitions.

use serde_json::Value;
use tracing::{info, instrument};

use super::{DescribeTableParams, ExecuteQueryParams};
use crate::domains::tools::definitions::{NoParams, ToolDefinition};
use crate::domains::tools::{ToolContext, ToolResult};

// ============================================================================
// Tool Definitions
// ============================================================================

/// Run an ad hoc statement against MySQL.
pub struct MysqlExecuteQueryTool;

impl ToolDefinition for MysqlExecuteQueryTool {
    const NAME: &'static str = "mysql_execute_query";
    const DESCRIPTION: &'static str = "Execute a SQL query against the configured MySQL database. Use `?` placeholders and pass values in `params`. Returns the result rows and their count.";
    type Params = ExecuteQueryParams;

    #[instrument(skip_all)]
    async fn execute(params: ExecuteQueryParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("MySQL query tool called");
        let bound = params.params.unwrap_or_default();
        ctx.mysql.execute_query(&params.query, &bound).await
    }
}

/// List tables in the configured MySQL database.
pub struct MysqlListTablesTool;

impl ToolDefinition for MysqlListTablesTool {
    const NAME: &'static str = "mysql_list_tables";
    const DESCRIPTION: &'static str = "List all tables in the configured MySQL database.";
    type Params = NoParams;

    async fn execute(_params: NoParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.mysql.list_tables().await
    }
}

/// Describe the columns of one MySQL table.
pub struct MysqlDescribeTableTool;

impl ToolDefinition for MysqlDescribeTableTool {
    const NAME: &'static str = "mysql_describe_table";
    const DESCRIPTION: &'static str = "Describe the columns of a MySQL table: name, type, nullability, key, default and extra attributes.";
    type Params = DescribeTableParams;

    #[instrument(skip_all, fields(table = %params.table_name))]
    async fn execute(params: DescribeTableParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.mysql.describe_table(&params.table_name).await
    }
}
