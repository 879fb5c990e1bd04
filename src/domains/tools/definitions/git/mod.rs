//! Local git tools.
//!
//! Every repository path is resolved beneath `LOCAL_GIT_BASE_PATH` and
//! rejected if it escapes it. Object and ref work goes through libgit2;
//! porcelain status, diffs and network operations shell out to `git` so
//! the user's credentials, hooks and config apply.

mod branches;
mod changes;
mod history;
mod remote;
mod repo;
mod status;
mod tools;

pub use repo::LocalGitAdapter;
pub use status::{StatusBuckets, parse_porcelain};
pub use tools::{
    GitCheckoutTool, GitCloneTool, GitCommitTool, GitCurrentBranchTool, GitFileDiffTool,
    GitListBranchesTool, GitListReposTool, GitListTagsTool, GitLogTool, GitPullTool, GitPushTool,
    GitRemoteTool, GitShowCommitTool, GitStageTool, GitStatusTool,
};
