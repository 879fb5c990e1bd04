//! Document-store adapter.
//!
//! Filter and pipeline arguments arrive as JSON text (MongoDB extended JSON
//! is accepted) and are parsed before any connection is opened. Every call
//! opens one client and shuts it down again, whatever the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::core::config::MongoConfig;
use crate::domains::tools::{ToolError, ToolResult};

/// Limit and ordering for a `find` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindSpec {
    pub limit: i64,
    /// Field name and direction (`1` or `-1`).
    pub sort: Option<(String, i32)>,
}

#[async_trait]
pub trait DocumentConnector: Send + Sync {
    async fn connect(&self, config: &MongoConfig) -> ToolResult<Box<dyn DocumentSession>>;
}

/// An open client bound to the configured database.
#[async_trait]
pub trait DocumentSession: Send {
    async fn list_collections(&mut self) -> ToolResult<Vec<String>>;

    async fn find(
        &mut self,
        collection: &str,
        filter: Document,
        spec: &FindSpec,
    ) -> ToolResult<Vec<Document>>;

    async fn aggregate(
        &mut self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> ToolResult<Vec<Document>>;

    async fn count(&mut self, collection: &str, filter: Document) -> ToolResult<u64>;

    async fn close(self: Box<Self>) -> ToolResult<()>;
}

#[derive(Clone)]
pub struct DocumentAdapter {
    config: MongoConfig,
    connector: Arc<dyn DocumentConnector>,
}

impl DocumentAdapter {
    pub fn new(config: MongoConfig, connector: Arc<dyn DocumentConnector>) -> Self {
        Self { config, connector }
    }

    fn ensure_configured(&self) -> ToolResult<()> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(ToolError::configuration_missing("MongoDB not configured"))
        }
    }

    async fn open(&self) -> ToolResult<Box<dyn DocumentSession>> {
        self.connector.connect(&self.config).await
    }

    async fn release(session: Box<dyn DocumentSession>) {
        if let Err(e) = session.close().await {
            warn!("Failed to close MongoDB client: {}", e);
        }
    }

    #[instrument(skip_all)]
    pub async fn list_collections(&self) -> ToolResult<Value> {
        self.ensure_configured()?;

        let mut session = self.open().await?;
        let result = session.list_collections().await;
        Self::release(session).await;

        Ok(json!({"collections": result?}))
    }

    #[instrument(skip_all, fields(collection = %collection, limit = limit))]
    pub async fn find(
        &self,
        collection: &str,
        filter: &str,
        limit: i64,
        sort_field: Option<&str>,
        sort_order: i32,
    ) -> ToolResult<Value> {
        self.ensure_configured()?;
        check_collection(collection)?;
        if limit < 0 {
            return Err(ToolError::invalid_input("limit must not be negative"));
        }
        if sort_order != 1 && sort_order != -1 {
            return Err(ToolError::invalid_input("sort_order must be 1 or -1"));
        }
        let filter = parse_document(filter, "filter")?;
        let spec = FindSpec {
            limit,
            sort: sort_field
                .filter(|f| !f.is_empty())
                .map(|f| (f.to_string(), sort_order)),
        };

        info!("Finding documents");
        let mut session = self.open().await?;
        let result = session.find(collection, filter, &spec).await;
        Self::release(session).await;

        let documents: Vec<Value> = result?.into_iter().map(document_to_json).collect();
        Ok(json!({
            "count": documents.len(),
            "documents": documents,
        }))
    }

    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn aggregate(&self, collection: &str, pipeline: &str) -> ToolResult<Value> {
        self.ensure_configured()?;
        check_collection(collection)?;
        let pipeline = parse_pipeline(pipeline)?;

        info!("Running aggregation with {} stage(s)", pipeline.len());
        let mut session = self.open().await?;
        let result = session.aggregate(collection, pipeline).await;
        Self::release(session).await;

        let results: Vec<Value> = result?.into_iter().map(document_to_json).collect();
        Ok(json!({
            "count": results.len(),
            "results": results,
        }))
    }

    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn count(&self, collection: &str, filter: &str) -> ToolResult<Value> {
        self.ensure_configured()?;
        check_collection(collection)?;
        let filter = parse_document(filter, "filter")?;

        let mut session = self.open().await?;
        let result = session.count(collection, filter).await;
        Self::release(session).await;

        Ok(json!({
            "collection": collection,
            "count": result?,
        }))
    }
}

fn check_collection(collection: &str) -> ToolResult<()> {
    if collection.trim().is_empty() {
        return Err(ToolError::invalid_input("collection must not be empty"));
    }
    Ok(())
}

fn parse_bson(text: &str, what: &str) -> ToolResult<Bson> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ToolError::invalid_input(format!("Invalid JSON in {}: {}", what, e)))?;
    Bson::try_from(value)
        .map_err(|e| ToolError::invalid_input(format!("Invalid extended JSON in {}: {}", what, e)))
}

/// Parse a filter. Blank text means "match everything".
fn parse_document(text: &str, what: &str) -> ToolResult<Document> {
    if text.trim().is_empty() {
        return Ok(Document::new());
    }
    match parse_bson(text, what)? {
        Bson::Document(doc) => Ok(doc),
        _ => Err(ToolError::invalid_input(format!("{} must be a JSON object", what))),
    }
}

fn parse_pipeline(text: &str) -> ToolResult<Vec<Document>> {
    let Bson::Array(stages) = parse_bson(text, "pipeline")? else {
        return Err(ToolError::invalid_input("pipeline must be a JSON array"));
    };
    stages
        .into_iter()
        .map(|stage| match stage {
            Bson::Document(doc) => Ok(doc),
            _ => Err(ToolError::invalid_input(
                "every pipeline stage must be a JSON object",
            )),
        })
        .collect()
}

/// Render a document as relaxed extended JSON with `_id` flattened to a string.
fn document_to_json(mut doc: Document) -> Value {
    if let Some(id) = doc.get("_id") {
        let flat = match id {
            Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
            Bson::String(_) | Bson::Null => id.clone(),
            other => Bson::String(match other.clone().into_relaxed_extjson() {
                Value::String(s) => s,
                v => v.to_string(),
            }),
        };
        doc.insert("_id", flat);
    }
    Bson::Document(doc).into_relaxed_extjson()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domains::tools::ErrorKind;
    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory stand-in for a MongoDB deployment.
    #[derive(Default)]
    pub(crate) struct MockDocumentConnector {
        pub connects: AtomicUsize,
        pub closes: AtomicUsize,
        pub documents: Vec<Document>,
        pub last_find: Mutex<Option<(Document, FindSpec)>>,
        pub last_pipeline: Mutex<Option<Vec<Document>>>,
    }

    impl MockDocumentConnector {
        pub(crate) fn with_documents(documents: Vec<Document>) -> Self {
            Self {
                documents,
                ..Default::default()
            }
        }
    }

    struct MockDocumentSession {
        owner: Arc<MockDocumentConnector>,
    }

    #[async_trait]
    impl DocumentConnector for Arc<MockDocumentConnector> {
        async fn connect(&self, _config: &MongoConfig) -> ToolResult<Box<dyn DocumentSession>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockDocumentSession {
                owner: self.clone(),
            }))
        }
    }

    #[async_trait]
    impl DocumentSession for MockDocumentSession {
        async fn list_collections(&mut self) -> ToolResult<Vec<String>> {
            Ok(vec!["orders".to_string(), "users".to_string()])
        }

        async fn find(
            &mut self,
            _collection: &str,
            filter: Document,
            spec: &FindSpec,
        ) -> ToolResult<Vec<Document>> {
            *self.owner.last_find.lock().unwrap() = Some((filter, spec.clone()));
            let take = if spec.limit == 0 {
                usize::MAX
            } else {
                spec.limit as usize
            };
            Ok(self.owner.documents.iter().take(take).cloned().collect())
        }

        async fn aggregate(
            &mut self,
            _collection: &str,
            pipeline: Vec<Document>,
        ) -> ToolResult<Vec<Document>> {
            *self.owner.last_pipeline.lock().unwrap() = Some(pipeline);
            Ok(vec![doc! {"_id": "books", "total": 3}])
        }

        async fn count(&mut self, _collection: &str, _filter: Document) -> ToolResult<u64> {
            Ok(self.owner.documents.len() as u64)
        }

        async fn close(self: Box<Self>) -> ToolResult<()> {
            self.owner.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn configured() -> MongoConfig {
        MongoConfig {
            database: "shop".to_string(),
            ..MongoConfig::default()
        }
    }

    fn ten_documents() -> Vec<Document> {
        (0..10)
            .map(|i| doc! {"_id": ObjectId::new(), "n": i})
            .collect()
    }

    #[tokio::test]
    async fn test_find_applies_limit_and_stringifies_ids() {
        let mock = Arc::new(MockDocumentConnector::with_documents(ten_documents()));
        let adapter = DocumentAdapter::new(configured(), Arc::new(mock.clone()));

        let result = adapter.find("users", "{}", 5, None, -1).await.unwrap();

        assert_eq!(result["count"], 5);
        let documents = result["documents"].as_array().unwrap();
        assert_eq!(documents.len(), 5);
        for document in documents {
            let id = document["_id"].as_str().unwrap();
            assert_eq!(id.len(), 24);
        }
        assert_eq!(mock.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_find_sort_and_extended_json_filter() {
        let mock = Arc::new(MockDocumentConnector::default());
        let adapter = DocumentAdapter::new(configured(), Arc::new(mock.clone()));

        adapter
            .find(
                "users",
                r#"{"_id": {"$oid": "507f1f77bcf86cd799439011"}}"#,
                10,
                Some("created_at"),
                -1,
            )
            .await
            .unwrap();

        let (filter, spec) = mock.last_find.lock().unwrap().clone().unwrap();
        assert!(matches!(filter.get("_id"), Some(Bson::ObjectId(_))));
        assert_eq!(spec.sort, Some(("created_at".to_string(), -1)));
        assert_eq!(spec.limit, 10);
    }

    #[tokio::test]
    async fn test_not_configured_never_connects() {
        let mock = Arc::new(MockDocumentConnector::default());
        let adapter = DocumentAdapter::new(MongoConfig::default(), Arc::new(mock.clone()));

        let err = adapter.count("users", "{}").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
        assert_eq!(err.to_string(), "MongoDB not configured");
        let err = adapter.list_collections().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
        assert_eq!(mock.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_input() {
        let mock = Arc::new(MockDocumentConnector::default());
        let adapter = DocumentAdapter::new(configured(), Arc::new(mock.clone()));

        let err = adapter.find("users", "{not json", 10, None, -1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = adapter.aggregate("users", r#"{"$match": {}}"#).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = adapter.find("users", "{}", 10, Some("n"), 2).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(mock.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_aggregate_and_count_shapes() {
        let mock = Arc::new(MockDocumentConnector::with_documents(ten_documents()));
        let adapter = DocumentAdapter::new(configured(), Arc::new(mock.clone()));

        let result = adapter
            .aggregate(
                "orders",
                r#"[{"$group": {"_id": "$category", "total": {"$sum": 1}}}]"#,
            )
            .await
            .unwrap();
        assert_eq!(result, json!({"count": 1, "results": [{"_id": "books", "total": 3}]}));
        assert_eq!(mock.last_pipeline.lock().unwrap().as_ref().unwrap().len(), 1);

        let result = adapter.count("orders", "").await.unwrap();
        assert_eq!(result, json!({"collection": "orders", "count": 10}));
        assert_eq!(mock.closes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_non_object_ids_are_stringified() {
        let value = document_to_json(doc! {"_id": 42_i32, "name": "x"});
        assert_eq!(value, json!({"_id": "42", "name": "x"}));

        let value = document_to_json(doc! {"_id": Bson::Null});
        assert_eq!(value, json!({"_id": null}));
    }
}
