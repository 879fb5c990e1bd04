//! Filesystem guidance.

use super::PromptDefinition;

pub struct FileSystemHelperPrompt;

impl PromptDefinition for FileSystemHelperPrompt {
    const NAME: &'static str = "file_system_helper";
    const DESCRIPTION: &'static str = "Guidelines for reading, writing and searching files";

    fn text() -> &'static str {
        r#"You are helping the user with file system operations. Follow these guidelines:

1. Reading (filesystem_read_file, filesystem_list_directory):
   - Only UTF-8 text files can be read
   - Report the size and modification time along with the content

2. Writing (filesystem_write_file, filesystem_create_directory):
   - Confirm before overwriting an existing file
   - Parent directories are created automatically

3. Searching (filesystem_search):
   - Patterns are globs relative to the directory, e.g. `**/*.rs`
   - Keep `max_results` small

4. Safety:
   - Never delete a file without confirmation; directories cannot be deleted
   - Warn before reading very large files

When the user asks to work with files:
1. Understand the goal
2. Pick the operation
3. Run it and report the result
"#
    }
}
