//! Custom HTTP API status resource definition.

use serde_json::{Value, json};

use super::{ResourceDefinition, or_not_set};
use crate::core::config::Config;

pub struct CustomApiStatusResource;

impl ResourceDefinition for CustomApiStatusResource {
    const URI: &'static str = "config://custom-api-status";
    const NAME: &'static str = "Custom API Status";
    const DESCRIPTION: &'static str = "Custom HTTP API integration status";

    fn snapshot(config: &Config) -> Value {
        json!({
            "configured": config.custom_api.is_configured(),
            "base_url": or_not_set(&config.custom_api.base_url),
        })
    }
}
