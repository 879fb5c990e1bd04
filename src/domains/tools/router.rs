//! Tool Router - builds the rmcp ToolRouter from the registry.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::CallToolResult,
};

use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .entries()
        .iter()
        .fold(ToolRouter::new(), |router, entry| {
            let handler = entry.handler.clone();
            router.with_route(ToolRoute::new_dyn(
                entry.tool.clone(),
                move |ctx: ToolCallContext<'_, S>| {
                    let arguments = ctx.arguments.clone().unwrap_or_default();
                    let handler = handler.clone();
                    async move { Ok::<CallToolResult, McpError>(handler(arguments).await) }.boxed()
                },
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::tools::ToolContext;
    use std::sync::Arc;

    struct TestServer {}

    #[test]
    fn test_registry_matches_router() {
        let config = Arc::new(Config::default());
        let registry = ToolRegistry::new(Arc::new(ToolContext::new(config)));
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(&registry);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
