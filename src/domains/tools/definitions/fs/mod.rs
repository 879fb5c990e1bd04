//! Filesystem tools.
//!
//! Paths are made absolute before use and are not confined to any root.

mod common;
pub mod create_dir;
pub mod delete;
pub mod list_dir;
pub mod read;
pub mod search;
pub mod write;

pub use create_dir::FsCreateDirTool;
pub use delete::FsDeleteTool;
pub use list_dir::FsListDirTool;
pub use read::FsReadFileTool;
pub use search::FsSearchTool;
pub use write::FsWriteFileTool;
