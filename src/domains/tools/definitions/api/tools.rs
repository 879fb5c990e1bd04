//! HTTP API tool definitions.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

fn empty_object() -> String {
    "{}".to_string()
}

/// Parameters for GET requests.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ApiGetParams {
    /// API endpoint path, e.g. `/users`.
    pub endpoint: String,

    /// JSON object of query parameters.
    #[serde(default = "empty_object")]
    pub params: String,
}

/// Parameters for POST and PUT requests.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ApiBodyParams {
    /// API endpoint path, e.g. `/users/1`.
    pub endpoint: String,

    /// JSON request body.
    #[serde(default = "empty_object")]
    pub body: String,
}

/// Parameters for DELETE requests.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ApiDeleteParams {
    /// API endpoint path, e.g. `/users/1`.
    pub endpoint: String,
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct ApiGetTool;

impl ToolDefinition for ApiGetTool {
    const NAME: &'static str = "custom_api_get";
    const DESCRIPTION: &'static str = "Make a GET request to the configured custom API. Query parameters are given as a JSON object.";
    type Params = ApiGetParams;

    #[instrument(skip_all, fields(endpoint = %params.endpoint))]
    async fn execute(params: ApiGetParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("Custom API GET tool called");
        ctx.api.get(&params.endpoint, &params.params).await
    }
}

pub struct ApiPostTool;

impl ToolDefinition for ApiPostTool {
    const NAME: &'static str = "custom_api_post";
    const DESCRIPTION: &'static str = "Make a POST request with a JSON body to the configured custom API.";
    type Params = ApiBodyParams;

    #[instrument(skip_all, fields(endpoint = %params.endpoint))]
    async fn execute(params: ApiBodyParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("Custom API POST tool called");
        ctx.api.post(&params.endpoint, &params.body).await
    }
}

pub struct ApiPutTool;

impl ToolDefinition for ApiPutTool {
    const NAME: &'static str = "custom_api_put";
    const DESCRIPTION: &'static str = "Make a PUT request with a JSON body to the configured custom API.";
    type Params = ApiBodyParams;

    #[instrument(skip_all, fields(endpoint = %params.endpoint))]
    async fn execute(params: ApiBodyParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("Custom API PUT tool called");
        ctx.api.put(&params.endpoint, &params.body).await
    }
}

pub struct ApiDeleteTool;

impl ToolDefinition for ApiDeleteTool {
    const NAME: &'static str = "custom_api_delete";
    const DESCRIPTION: &'static str = "Make a DELETE request to the configured custom API.";
    type Params = ApiDeleteParams;

    #[instrument(skip_all, fields(endpoint = %params.endpoint))]
    async fn execute(params: ApiDeleteParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("Custom API DELETE tool called");
        ctx.api.delete(&params.endpoint).await
    }
}
