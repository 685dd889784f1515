pub mod executor;
pub mod locator;
pub mod parser;
pub mod tag;

// Re-export commonly used types
pub use executor::{CommandOutput, CommandPrefix, CommandRunner, GitExecutor};
pub use locator::{find_work_tree, locate_repository};
pub use parser::{
    BranchInfo, ChangeCounters, parse_branch_line, parse_status_counters, reports_describe_failure,
    reports_failure,
};
pub use tag::{TagPolicy, resolve_tag};
