//! MongoDB tool definitions.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::tools::definitions::{NoParams, ToolDefinition};
use crate::domains::tools::{ToolContext, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

fn default_filter() -> String {
    "{}".to_string()
}

fn default_limit() -> i64 {
    10
}

fn default_sort_order() -> i32 {
    -1
}

/// Parameters for the find tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MongoFindParams {
    /// Name of the collection.
    pub collection: String,

    /// JSON filter query (default: `{}`, all documents).
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Maximum number of documents to return (default 10).
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Field to sort by.
    #[serde(default)]
    pub sort_field: Option<String>,

    /// Sort order: 1 for ascending, -1 for descending (default).
    #[serde(default = "default_sort_order")]
    pub sort_order: i32,
}

/// Parameters for the aggregate tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MongoAggregateParams {
    /// Name of the collection.
    pub collection: String,

    /// JSON array of aggregation stages.
    pub pipeline: String,
}

/// Parameters for the count tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MongoCountParams {
    /// Name of the collection.
    pub collection: String,

    /// JSON filter query (default: `{}`).
    #[serde(default = "default_filter")]
    pub filter: String,
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct MongoListCollectionsTool;

impl ToolDefinition for MongoListCollectionsTool {
    const NAME: &'static str = "mongodb_list_collections";
    const DESCRIPTION: &'static str = "List all collections in the configured MongoDB database.";
    type Params = NoParams;

    async fn execute(_params: NoParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.mongo.list_collections().await
    }
}

/// Find documents in a collection.
pub struct MongoFindTool;

impl ToolDefinition for MongoFindTool {
    const NAME: &'static str = "mongodb_find";
    const DESCRIPTION: &'static str = "Find documents in a MongoDB collection. The filter is JSON text (extended JSON such as {\"$oid\": ...} is accepted). Document ids are returned as strings.";
    type Params = MongoFindParams;

    #[instrument(skip_all, fields(collection = %params.collection))]
    async fn execute(params: MongoFindParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("MongoDB find tool called");
        ctx.mongo
            .find(
                &params.collection,
                &params.filter,
                params.limit,
                params.sort_field.as_deref(),
                params.sort_order,
            )
            .await
    }
}

pub struct MongoAggregateTool;

impl ToolDefinition for MongoAggregateTool {
    const NAME: &'static str = "mongodb_aggregate";
    const DESCRIPTION: &'static str = "Run an aggregation pipeline (a JSON array of stages) on a MongoDB collection.";
    type Params = MongoAggregateParams;

    #[instrument(skip_all, fields(collection = %params.collection))]
    async fn execute(params: MongoAggregateParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.mongo
            .aggregate(&params.collection, &params.pipeline)
            .await
    }
}

pub struct MongoCountTool;

impl ToolDefinition for MongoCountTool {
    const NAME: &'static str = "mongodb_count";
    const DESCRIPTION: &'static str = "Count documents in a MongoDB collection matching an optional JSON filter.";
    type Params = MongoCountParams;

    #[instrument(skip_all, fields(collection = %params.collection))]
    async fn execute(params: MongoCountParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.mongo.count(&params.collection, &params.filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::adapter::tests::MockDocumentConnector;
    use super::*;
    use crate::core::config::Config;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_find_params_defaults() {
        let params: MongoFindParams = serde_json::from_value(json!({"collection": "users"})).unwrap();
        assert_eq!(params.filter, "{}");
        assert_eq!(params.limit, 10);
        assert_eq!(params.sort_order, -1);
        assert!(params.sort_field.is_none());
    }

    #[tokio::test]
    async fn test_list_collections_through_context() {
        let mut config = Config::default();
        config.mongo.database = "shop".to_string();
        let mock = Arc::new(MockDocumentConnector::default());
        let ctx = ToolContext::new(Arc::new(config)).with_mongo_connector(Arc::new(mock.clone()));

        let result = MongoListCollectionsTool::execute(NoParams {}, &ctx)
            .await
            .unwrap();
        assert_eq!(result, json!({"collections": ["orders", "users"]}));
    }
}
