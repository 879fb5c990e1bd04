//! GitHub tools, scoped to the configured `owner/repo`.

mod adapter;
mod tools;

pub use adapter::GithubAdapter;
pub use tools::{
    GithubCreateIssueTool, GithubGetFileContentTool, GithubGetIssueTool, GithubListIssuesTool,
    GithubListPullsTool,
};
