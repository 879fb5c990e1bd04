//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/`, grouped per backend.
//! The [`ToolRegistry`] owns the catalog; the rmcp `ToolRouter` (stdio)
//! and the HTTP transport both dispatch through it.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::{
    prompts::PromptService,
    resources::ResourceService,
    tools::{ToolContext, ToolRegistry, build_tool_router},
};

const INSTRUCTIONS: &str = "Universal MCP server. Tools cover MySQL and PostgreSQL \
(mysql_*, postgresql_*), MongoDB (mongodb_*), the local filesystem (filesystem_*), \
a configured HTTP API (custom_api_*), one GitHub repository (github_*) and git \
repositories beneath a base directory (git_*). Every tool returns JSON text; \
failures are {\"error\": message, \"kind\": kind}. The config:// resources report \
which backends are configured.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and coordinates
/// between different domain services to handle MCP protocol messages.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool catalog shared by every transport.
    registry: Arc<ToolRegistry>,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Service for handling prompt-related requests.
    prompt_service: Arc<PromptService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let context = Arc::new(ToolContext::new(config.clone()));
        Self::with_context(context)
    }

    /// Create a server whose tools run against `context`.
    pub fn with_context(context: Arc<ToolContext>) -> Self {
        let config = context.config.clone();
        let registry = Arc::new(ToolRegistry::new(context));

        Self {
            tool_router: build_tool_router::<Self>(&registry),
            resource_service: Arc::new(ResourceService::new(config.clone())),
            prompt_service: Arc::new(PromptService::new()),
            registry,
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.get_all_tools()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Failures come back inside the result envelope, never as `Err`.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        self.registry.call_tool(name, arguments).await
    }

    /// List all available resources (for HTTP transport).
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resource_service.list_resources().await
    }

    /// Read a resource by URI (for HTTP transport).
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, String> {
        self.resource_service
            .read_resource(uri)
            .await
            .map_err(|e| e.to_string())
    }

    /// List all available prompts (for HTTP transport).
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompt_service.list_prompts().await
    }

    /// Get a prompt by name (for HTTP transport).
    pub async fn get_prompt(&self, name: &str) -> Result<GetPromptResult, String> {
        self.prompt_service
            .get_prompt(name)
            .await
            .map_err(|e| e.to_string())
    }

    /// Server identity reported by `initialize`.
    pub fn server_info_json(&self) -> Value {
        json!({
            "name": self.name(),
            "version": self.version(),
        })
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self.prompt_service.list_prompts().await;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        self.prompt_service
            .get_prompt(&request.name)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_exposes_full_catalog() {
        let server = McpServer::new(Config::default());
        assert_eq!(server.list_tools().len(), 40);
        assert_eq!(server.tool_router.list_all().len(), 40);
        assert_eq!(server.name(), "universal-mcp-server");
    }

    #[test]
    fn test_info_advertises_capabilities() {
        let info = McpServer::new(Config::default()).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.instructions.unwrap().contains("git_*"));
    }

    #[tokio::test]
    async fn test_call_tool_returns_envelope() {
        let server = McpServer::new(Config::default());
        let result = server.call_tool("github_list_issues", json!({})).await;
        assert!(result.is_error.unwrap_or(false));
    }
}
