pub mod config;
pub mod error;
pub mod git;
pub mod render;
pub mod segments;
pub mod status;

// Re-export commonly used types for convenience
pub use error::{AppError, AppResult, GitError, GitResult};
pub use git::{CommandOutput, CommandPrefix, CommandRunner, GitExecutor, TagPolicy};
pub use segments::{Category, Formats, Segment, StyleClass};
pub use status::{DetachedHeadStyle, Options, StatusRecord, gitstatus};
