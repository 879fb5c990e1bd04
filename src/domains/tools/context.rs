//! The adapters a tool call runs against.
//!
//! Built once from the immutable configuration. Driver seams (relational
//! and document connectors) can be swapped for test doubles without
//! touching the environment.

use std::sync::Arc;

use crate::core::config::Config;

use super::definitions::api::ApiAdapter;
use super::definitions::git::LocalGitAdapter;
use super::definitions::github::GithubAdapter;
use super::definitions::mongo::{DocumentAdapter, DocumentConnector, MongoConnector};
use super::definitions::sql::{
    MySqlConnector, PostgresConnector, RelationalAdapter, SqlConnector, SqlEngine,
};

pub struct ToolContext {
    pub config: Arc<Config>,
    pub mysql: RelationalAdapter,
    pub postgres: RelationalAdapter,
    pub mongo: DocumentAdapter,
    pub api: ApiAdapter,
    pub github: GithubAdapter,
    pub git: LocalGitAdapter,
}

impl ToolContext {
    /// Build a context backed by the real drivers.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            mysql: RelationalAdapter::new(
                SqlEngine::MySql,
                config.mysql.clone(),
                Arc::new(MySqlConnector),
            ),
            postgres: RelationalAdapter::new(
                SqlEngine::Postgres,
                config.postgres.clone(),
                Arc::new(PostgresConnector),
            ),
            mongo: DocumentAdapter::new(config.mongo.clone(), Arc::new(MongoConnector)),
            api: ApiAdapter::new(config.custom_api.clone()),
            github: GithubAdapter::new(config.github.clone()),
            git: LocalGitAdapter::new(config.local_git.clone()),
            config,
        }
    }

    pub fn with_mysql_connector(mut self, connector: Arc<dyn SqlConnector>) -> Self {
        self.mysql = RelationalAdapter::new(SqlEngine::MySql, self.config.mysql.clone(), connector);
        self
    }

    pub fn with_postgres_connector(mut self, connector: Arc<dyn SqlConnector>) -> Self {
        self.postgres =
            RelationalAdapter::new(SqlEngine::Postgres, self.config.postgres.clone(), connector);
        self
    }

    pub fn with_mongo_connector(mut self, connector: Arc<dyn DocumentConnector>) -> Self {
        self.mongo = DocumentAdapter::new(self.config.mongo.clone(), connector);
        self
    }
}
