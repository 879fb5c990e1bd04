//! MongoDB tools.

mod adapter;
mod driver;
mod tools;

pub use adapter::{DocumentAdapter, DocumentConnector, DocumentSession, FindSpec};
pub use driver::MongoConnector;
pub use tools::{MongoAggregateTool, MongoCountTool, MongoFindTool, MongoListCollectionsTool};
