//! Generic HTTP API tools.

mod adapter;
mod tools;

pub use adapter::{ApiAdapter, join_url};
pub use tools::{ApiDeleteTool, ApiGetTool, ApiPostTool, ApiPutTool};

#[cfg(test)]
pub(crate) use adapter::tests::{serve_once, serve_sequence};
