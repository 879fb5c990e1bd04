//! Database status resource definition.

use serde_json::{Value, json};

use super::ResourceDefinition;
use crate::core::config::Config;

pub struct DatabaseStatusResource;

fn label(configured: bool) -> &'static str {
    if configured { "configured" } else { "not configured" }
}

impl ResourceDefinition for DatabaseStatusResource {
    const URI: &'static str = "config://database-status";
    const NAME: &'static str = "Database Status";
    const DESCRIPTION: &'static str = "Whether MySQL, PostgreSQL and MongoDB have a database configured";

    fn snapshot(config: &Config) -> Value {
        json!({
            "mysql": label(config.mysql.is_configured()),
            "postgresql": label(config.postgres.is_configured()),
            "mongodb": label(config.mongo.is_configured()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_status() {
        let mut config = Config::default();
        config.postgres.database = "analytics".to_string();

        assert_eq!(
            DatabaseStatusResource::snapshot(&config),
            json!({
                "mysql": "not configured",
                "postgresql": "configured",
                "mongodb": "not configured",
            })
        );
    }
}
