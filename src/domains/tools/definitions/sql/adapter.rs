//! Relational adapter shared by the MySQL and PostgreSQL tools.
//!
//! Every operation opens one connection, runs exactly one statement and
//! closes the connection again, on success and on failure alike. The
//! driver sits behind [`SqlConnector`] / [`SqlSession`] so tests can count
//! connects and closes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{info, instrument, warn};

use crate::core::config::DatabaseConfig;
use crate::domains::tools::{ToolError, ToolResult};

/// One result row: column name to JSON value.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlEngine {
    MySql,
    Postgres,
}

impl SqlEngine {
    pub fn label(self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::Postgres => "PostgreSQL",
        }
    }

    fn list_tables_sql(self) -> &'static str {
        match self {
            Self::MySql => {
                "SELECT table_name AS table_name FROM information_schema.tables \
                 WHERE table_schema = DATABASE() ORDER BY table_name"
            }
            Self::Postgres => {
                "SELECT table_name::text AS table_name FROM information_schema.tables \
                 WHERE table_schema = 'public' ORDER BY table_name"
            }
        }
    }

    /// Column listing in the engine's customary shape; the table name is
    /// always passed as a bind parameter.
    fn describe_table_sql(self) -> &'static str {
        match self {
            Self::MySql => {
                "SELECT column_name AS `Field`, column_type AS `Type`, \
                 is_nullable AS `Null`, column_key AS `Key`, \
                 column_default AS `Default`, extra AS `Extra` \
                 FROM information_schema.columns \
                 WHERE table_schema = DATABASE() AND table_name = ? \
                 ORDER BY ordinal_position"
            }
            Self::Postgres => {
                "SELECT column_name::text AS column_name, data_type::text AS data_type, \
                 is_nullable::text AS is_nullable, column_default::text AS column_default \
                 FROM information_schema.columns \
                 WHERE table_name = $1 \
                 ORDER BY ordinal_position"
            }
        }
    }
}

/// Opens driver sessions.
#[async_trait]
pub trait SqlConnector: Send + Sync {
    async fn connect(&self, config: &DatabaseConfig) -> ToolResult<Box<dyn SqlSession>>;
}

/// A single open connection.
#[async_trait]
pub trait SqlSession: Send {
    /// Run one statement and fetch every row.
    async fn fetch_all(&mut self, query: &str, params: &[Value]) -> ToolResult<Vec<Row>>;

    /// Close the connection.
    async fn close(self: Box<Self>) -> ToolResult<()>;
}

/// Façade over one relational backend.
#[derive(Clone)]
pub struct RelationalAdapter {
    engine: SqlEngine,
    config: DatabaseConfig,
    connector: Arc<dyn SqlConnector>,
}

impl RelationalAdapter {
    pub fn new(engine: SqlEngine, config: DatabaseConfig, connector: Arc<dyn SqlConnector>) -> Self {
        Self {
            engine,
            config,
            connector,
        }
    }

    pub fn engine(&self) -> SqlEngine {
        self.engine
    }

    fn ensure_configured(&self) -> ToolResult<()> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(ToolError::configuration_missing(format!(
                "{} not configured",
                self.engine.label()
            )))
        }
    }

    /// Connect, run one statement, and always close.
    async fn fetch(&self, query: &str, params: &[Value]) -> ToolResult<Vec<Row>> {
        self.ensure_configured()?;

        let mut session = self.connector.connect(&self.config).await?;
        let result = session.fetch_all(query, params).await;
        if let Err(e) = session.close().await {
            warn!("Failed to close {} connection: {}", self.engine.label(), e);
        }
        result
    }

    #[instrument(skip_all, fields(engine = self.engine.label()))]
    pub async fn execute_query(&self, query: &str, params: &[Value]) -> ToolResult<Value> {
        self.ensure_configured()?;
        if query.trim().is_empty() {
            return Err(ToolError::invalid_input("query must not be empty"));
        }

        info!("Executing query with {} bound parameter(s)", params.len());
        let rows = self.fetch(query, params).await?;

        if rows.is_empty() {
            return Ok(json!({"message": "No results found", "rows": []}));
        }
        Ok(json!({
            "rows": rows,
            "count": rows.len(),
        }))
    }

    #[instrument(skip_all, fields(engine = self.engine.label()))]
    pub async fn list_tables(&self) -> ToolResult<Value> {
        let rows = self.fetch(self.engine.list_tables_sql(), &[]).await?;
        let tables: Vec<Value> = rows
            .into_iter()
            .filter_map(|row| row.into_iter().next().map(|(_, name)| name))
            .collect();
        Ok(json!({"tables": tables}))
    }

    #[instrument(skip_all, fields(engine = self.engine.label(), table = %table))]
    pub async fn describe_table(&self, table: &str) -> ToolResult<Value> {
        self.ensure_configured()?;
        if table.trim().is_empty() {
            return Err(ToolError::invalid_input("table_name must not be empty"));
        }

        let columns = self
            .fetch(
                self.engine.describe_table_sql(),
                &[Value::String(table.to_string())],
            )
            .await?;
        if columns.is_empty() {
            return Err(ToolError::not_found(format!("Table not found: {}", table)));
        }
        Ok(json!({
            "table": table,
            "columns": columns,
        }))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domains::tools::ErrorKind;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records every statement and counts connection lifecycle calls.
    #[derive(Default)]
    pub(crate) struct MockConnector {
        pub connects: AtomicUsize,
        pub closes: AtomicUsize,
        pub statements: Mutex<Vec<(String, Vec<Value>)>>,
        pub rows: Vec<Row>,
        pub fail_with: Option<String>,
    }

    impl MockConnector {
        pub(crate) fn returning(rows: Vec<Value>) -> Self {
            Self {
                rows: rows
                    .into_iter()
                    .filter_map(|v| v.as_object().cloned())
                    .collect(),
                ..Default::default()
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Default::default()
            }
        }
    }

    struct MockSession {
        owner: Arc<MockConnector>,
    }

    #[async_trait]
    impl SqlConnector for Arc<MockConnector> {
        async fn connect(&self, _config: &DatabaseConfig) -> ToolResult<Box<dyn SqlSession>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockSession {
                owner: self.clone(),
            }))
        }
    }

    #[async_trait]
    impl SqlSession for MockSession {
        async fn fetch_all(&mut self, query: &str, params: &[Value]) -> ToolResult<Vec<Row>> {
            self.owner
                .statements
                .lock()
                .unwrap()
                .push((query.to_string(), params.to_vec()));
            match &self.owner.fail_with {
                Some(message) => Err(ToolError::remote(message.clone())),
                None => Ok(self.owner.rows.clone()),
            }
        }

        async fn close(self: Box<Self>) -> ToolResult<()> {
            self.owner.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn configured() -> DatabaseConfig {
        DatabaseConfig {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "shop".to_string(),
        }
    }

    fn adapter(engine: SqlEngine, config: DatabaseConfig, mock: &Arc<MockConnector>) -> RelationalAdapter {
        RelationalAdapter::new(engine, config, Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_not_configured_never_connects() {
        let mock = Arc::new(MockConnector::default());
        let mut config = configured();
        config.database.clear();
        let adapter = adapter(SqlEngine::MySql, config, &mock);

        let err = adapter.execute_query("SELECT 1", &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
        assert_eq!(err.to_string(), "MySQL not configured");
        let err = adapter.list_tables().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
        let err = adapter.describe_table("users").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);

        assert_eq!(mock.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connection_closed_after_every_call() {
        let ok = Arc::new(MockConnector::returning(vec![json!({"id": 1})]));
        let ok_adapter = adapter(SqlEngine::Postgres, configured(), &ok);
        let failing = Arc::new(MockConnector::failing("syntax error at or near \"SELEC\""));
        let failing_adapter = adapter(SqlEngine::Postgres, configured(), &failing);

        for _ in 0..3 {
            ok_adapter.execute_query("SELECT 1", &[]).await.unwrap();
            let err = failing_adapter.execute_query("SELEC 1", &[]).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RemoteFailure);
        }

        assert_eq!(ok.connects.load(Ordering::SeqCst), 3);
        assert_eq!(ok.closes.load(Ordering::SeqCst), 3);
        assert_eq!(failing.connects.load(Ordering::SeqCst), 3);
        assert_eq!(failing.closes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_query_shapes() {
        let empty = Arc::new(MockConnector::default());
        let result = adapter(SqlEngine::MySql, configured(), &empty)
            .execute_query("SELECT * FROM users WHERE id = ?", &[json!(42)])
            .await
            .unwrap();
        assert_eq!(result, json!({"message": "No results found", "rows": []}));
        assert_eq!(empty.statements.lock().unwrap()[0].1, vec![json!(42)]);

        let rows = Arc::new(MockConnector::returning(vec![
            json!({"id": 1, "name": "ada"}),
            json!({"id": 2, "name": "grace"}),
        ]));
        let result = adapter(SqlEngine::MySql, configured(), &rows)
            .execute_query("SELECT id, name FROM users", &[])
            .await
            .unwrap();
        assert_eq!(result["count"], 2);
        assert_eq!(result["rows"][1]["name"], "grace");
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_connecting() {
        let mock = Arc::new(MockConnector::default());
        let err = adapter(SqlEngine::MySql, configured(), &mock)
            .execute_query("   ", &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(mock.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_tables_takes_first_column() {
        let mock = Arc::new(MockConnector::returning(vec![
            json!({"table_name": "orders"}),
            json!({"table_name": "users"}),
        ]));
        let result = adapter(SqlEngine::Postgres, configured(), &mock)
            .list_tables()
            .await
            .unwrap();
        assert_eq!(result, json!({"tables": ["orders", "users"]}));
        assert!(mock.statements.lock().unwrap()[0].0.contains("'public'"));
    }

    #[tokio::test]
    async fn test_describe_table_binds_name() {
        let mock = Arc::new(MockConnector::returning(vec![json!({
            "column_name": "id",
            "data_type": "integer",
            "is_nullable": "NO",
            "column_default": null,
        })]));
        let result = adapter(SqlEngine::Postgres, configured(), &mock)
            .describe_table("users; DROP TABLE users")
            .await
            .unwrap();
        assert_eq!(result["table"], "users; DROP TABLE users");
        assert_eq!(result["columns"][0]["data_type"], "integer");

        let statements = mock.statements.lock().unwrap();
        assert!(!statements[0].0.contains("DROP"));
        assert_eq!(statements[0].1, vec![json!("users; DROP TABLE users")]);
    }

    #[tokio::test]
    async fn test_describe_missing_table_is_not_found() {
        let mock = Arc::new(MockConnector::default());
        let err = adapter(SqlEngine::MySql, configured(), &mock)
            .describe_table("ghost")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(mock.closes.load(Ordering::SeqCst), 1);
    }
}
