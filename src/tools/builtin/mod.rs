//! Built-in tools exposed to the coder's reasoning call

mod current_directory;
mod list_files;
mod read_file;
mod write_file;

pub use current_directory::CurrentDirectoryTool;
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;
pub use write_file::WriteFileTool;
