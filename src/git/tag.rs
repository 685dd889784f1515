use crate::error::{GitError, GitResult};
use crate::git::executor::{CommandOutput, CommandPrefix, CommandRunner};
use crate::git::parser::reports_describe_failure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which tag, if any, the prompt should show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagPolicy {
    /// Never show a tag (saves a git call)
    #[default]
    None,
    /// First tag that contains HEAD (`describe --contains`)
    Contains,
    /// Most recent tag anywhere in history, described by name
    Last,
    /// Nearest annotated tag reachable from HEAD (`describe`)
    Annotated,
    /// Only a tag pointing exactly at HEAD
    Exact,
}

impl TagPolicy {
    fn as_str(&self) -> &'static str {
        match self {
            TagPolicy::None => "none",
            TagPolicy::Contains => "contains",
            TagPolicy::Last => "last",
            TagPolicy::Annotated => "annotated",
            TagPolicy::Exact => "exact",
        }
    }
}

impl fmt::Display for TagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagPolicy {
    type Err = GitError;

    fn from_str(s: &str) -> GitResult<Self> {
        match s {
            "none" => Ok(TagPolicy::None),
            "contains" => Ok(TagPolicy::Contains),
            "last" => Ok(TagPolicy::Last),
            "annotated" => Ok(TagPolicy::Annotated),
            "exact" => Ok(TagPolicy::Exact),
            other => Err(GitError::ParseError(format!(
                "unknown tag policy '{}' (expected none, contains, last, annotated or exact)",
                other
            ))),
        }
    }
}

/// Look up the tag to display under `policy`
///
/// Returns an empty string when there is no matching tag or git refused to
/// describe HEAD. Only a failure to launch git is an error.
pub fn resolve_tag<R: CommandRunner + ?Sized>(
    policy: TagPolicy,
    prefix: &CommandPrefix,
    runner: &R,
) -> GitResult<String> {
    let output = match policy {
        TagPolicy::None => return Ok(String::new()),
        TagPolicy::Contains => runner.run(prefix, &["describe", "--contains"])?,
        TagPolicy::Annotated => runner.run(prefix, &["describe"])?,
        TagPolicy::Exact => runner.run(
            prefix,
            &["describe", "--tags", "--exact-match", "--abbrev=0"],
        )?,
        TagPolicy::Last => {
            let latest = runner.run(prefix, &["rev-list", "--tags", "--max-count=1"])?;
            let Some(sha) = latest.first_line().filter(|_| latest.stderr.is_empty()) else {
                return Ok(String::new());
            };
            runner.run(prefix, &["describe", "--tags", sha])?
        }
    };

    Ok(first_tag_line(&output))
}

fn first_tag_line(output: &CommandOutput) -> String {
    if reports_describe_failure(&output.stderr) {
        return String::new();
    }
    output.first_line().unwrap_or_default().to_string()
}
