//! Resource service implementation.
//!
//! Resources are defined in `definitions/` and registered via `registry.rs`.
//! Adding a new resource does NOT require modifying this file.

use std::sync::Arc;

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use serde_json::Value;
use tracing::{debug, info};

use super::error::ResourceError;
use super::registry::get_all_resources;
use crate::core::config::Config;

/// Renders a resource from the configuration.
pub type ResourceRenderer = fn(&Config) -> Value;

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// Produces the content on each read.
    pub render: ResourceRenderer,
}

/// Service for listing and reading the status resources.
pub struct ResourceService {
    config: Arc<Config>,

    /// Registered resources, in listing order.
    resources: Vec<ResourceEntry>,
}

impl ResourceService {
    /// Create a new ResourceService over the given configuration.
    pub fn new(config: Arc<Config>) -> Self {
        info!("Initializing ResourceService");

        let resources = get_all_resources();
        for entry in &resources {
            debug!("Registering resource: {}", entry.resource.raw.uri);
        }

        Self { config, resources }
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .iter()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .iter()
            .find(|entry| entry.resource.raw.uri == uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        let snapshot = (entry.render)(&self.config);
        let text = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| ResourceError::internal(e.to_string()))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: entry.resource.raw.mime_type.clone(),
                text,
                meta: None,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ResourceService {
        let mut config = Config::default();
        config.mysql.database = "shop".to_string();
        ResourceService::new(Arc::new(config))
    }

    #[tokio::test]
    async fn test_lists_four_status_resources() {
        let resources = service().list_resources().await;
        assert_eq!(resources.len(), 4);
        assert_eq!(resources[0].raw.uri, "config://database-status");
    }

    #[tokio::test]
    async fn test_read_renders_json() {
        let result = service()
            .read_resource("config://database-status")
            .await
            .unwrap();

        let ResourceContents::TextResourceContents {
            text, mime_type, ..
        } = &result.contents[0]
        else {
            panic!("expected text contents");
        };
        assert_eq!(mime_type.as_deref(), Some("application/json"));
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(value["mysql"], "configured");
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let err = service()
            .read_resource("config://nope")
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(_)));
    }
}
