//! MongoDB driver connector.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::{Client, Collection, Database};

use super::adapter::{DocumentConnector, DocumentSession, FindSpec};
use crate::core::config::MongoConfig;
use crate::domains::tools::ToolResult;

pub struct MongoConnector;

#[async_trait]
impl DocumentConnector for MongoConnector {
    async fn connect(&self, config: &MongoConfig) -> ToolResult<Box<dyn DocumentSession>> {
        let client = Client::with_uri_str(config.connection_uri()).await?;
        let database = client.database(&config.database);
        Ok(Box::new(MongoSession { client, database }))
    }
}

struct MongoSession {
    client: Client,
    database: Database,
}

impl MongoSession {
    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentSession for MongoSession {
    async fn list_collections(&mut self) -> ToolResult<Vec<String>> {
        Ok(self.database.list_collection_names().await?)
    }

    async fn find(
        &mut self,
        collection: &str,
        filter: Document,
        spec: &FindSpec,
    ) -> ToolResult<Vec<Document>> {
        let coll = self.collection(collection);
        let mut action = coll.find(filter).limit(spec.limit);
        if let Some((field, order)) = &spec.sort {
            let mut sort = Document::new();
            sort.insert(field.clone(), *order);
            action = action.sort(sort);
        }
        let cursor = action.await?;
        Ok(cursor.try_collect().await?)
    }

    async fn aggregate(
        &mut self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> ToolResult<Vec<Document>> {
        let cursor = self.collection(collection).aggregate(pipeline).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&mut self, collection: &str, filter: Document) -> ToolResult<u64> {
        Ok(self.collection(collection).count_documents(filter).await?)
    }

    async fn close(self: Box<Self>) -> ToolResult<()> {
        self.client.shutdown().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ErrorKind;

    #[tokio::test]
    async fn test_find_against_unreachable_server_is_remote_failure() {
        let client =
            Client::with_uri_str("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200")
                .await
                .unwrap();
        let database = client.database("app");
        let mut session = MongoSession { client, database };

        let spec = FindSpec {
            limit: 5,
            sort: Some(("name".to_string(), 1)),
        };
        let err = session
            .find("users", Document::new(), &spec)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
    }
}
