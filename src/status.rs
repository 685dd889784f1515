//! The prompt pipeline: find the repository, ask git about it, build segments.
//!
//! Every call is independent. Nothing is cached between renders, and git is
//! invoked strictly one command at a time because later calls depend on the
//! answers of earlier ones.

use crate::error::{GitError, GitResult};
use crate::git::{
    BranchInfo, ChangeCounters, CommandPrefix, CommandRunner, TagPolicy, locate_repository,
    parse_branch_line, parse_status_counters, reports_failure, resolve_tag,
};
use crate::segments::{Formats, Segment, build_segments};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Branch name git reports when HEAD is not on a branch
const DETACHED_HEAD: &str = "HEAD";

/// What to show in place of the branch name when HEAD is detached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetachedHeadStyle {
    /// Abbreviated commit id (`rev-parse --short HEAD`)
    #[default]
    Revision,
    /// Closest reachable ref (`describe --contains --all`)
    Ref,
}

impl fmt::Display for DetachedHeadStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetachedHeadStyle::Revision => f.write_str("revision"),
            DetachedHeadStyle::Ref => f.write_str("ref"),
        }
    }
}

impl FromStr for DetachedHeadStyle {
    type Err = GitError;

    fn from_str(s: &str) -> GitResult<Self> {
        match s {
            "revision" => Ok(DetachedHeadStyle::Revision),
            "ref" => Ok(DetachedHeadStyle::Ref),
            other => Err(GitError::ParseError(format!(
                "unknown detached head style '{}' (expected revision or ref)",
                other
            ))),
        }
    }
}

/// Knobs for one prompt render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Address the repository with `-C` instead of searching for `.git`
    pub fast_mode: bool,
    pub tag_policy: TagPolicy,
    pub formats: Formats,
    pub detached_head_style: DetachedHeadStyle,
    pub untracked_counts_as_dirty: bool,
    /// When non-empty, only directories at or below one of these are inspected
    pub trusted_paths: Vec<PathBuf>,
    /// Skip `git status` entirely; only branch, stash and tag are reported
    pub skip_status: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fast_mode: true,
            tag_policy: TagPolicy::None,
            formats: Formats::default(),
            detached_head_style: DetachedHeadStyle::Revision,
            untracked_counts_as_dirty: true,
            trusted_paths: Vec::new(),
            skip_status: false,
        }
    }
}

/// Everything the segment builder needs to know about a working copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRecord {
    pub branch: BranchInfo,
    pub counters: ChangeCounters,
    pub stashed: u32,
    /// Empty when no tag should be shown
    pub tag: String,
}

/// Whether `cwd` may be inspected under the given allowlist
///
/// An empty allowlist trusts everything. Matching is by whole path components,
/// so `/work` trusts `/work/proj` but not `/workspace`.
pub fn is_trusted(cwd: &Path, trusted_paths: &[PathBuf]) -> bool {
    trusted_paths.is_empty() || trusted_paths.iter().any(|trusted| cwd.starts_with(trusted))
}

/// Render the git status of `cwd` as prompt segments
///
/// `Ok(None)` means "show nothing": no directory, an untrusted directory, no
/// repository, or git refused to report status. `Err` is reserved for git not
/// being runnable at all.
pub fn gitstatus<R: CommandRunner + ?Sized>(
    cwd: &Path,
    options: &Options,
    runner: &R,
) -> GitResult<Option<Vec<Segment>>> {
    if cwd.as_os_str().is_empty() {
        return Ok(None);
    }

    if !is_trusted(cwd, &options.trusted_paths) {
        log::debug!("{} is not in trusted paths", cwd.display());
        return Ok(None);
    }

    let Some(prefix) = locate_repository(cwd, options.fast_mode) else {
        log::debug!("No repository found above {}", cwd.display());
        return Ok(None);
    };

    log::debug!(
        "Running gitstatus {} -C",
        if options.fast_mode { "with" } else { "without" }
    );

    let record = collect_status(&prefix, options, runner)?;

    Ok(record.map(|record| {
        build_segments(&record, &options.formats, options.untracked_counts_as_dirty)
    }))
}

/// Query git for everything shown in the prompt
pub fn collect_status<R: CommandRunner + ?Sized>(
    prefix: &CommandPrefix,
    options: &Options,
    runner: &R,
) -> GitResult<Option<StatusRecord>> {
    let status = if options.skip_status {
        head_branch(prefix, runner)?
    } else {
        porcelain_status(prefix, options.detached_head_style, runner)?
    };

    let Some((branch, counters)) = status else {
        return Ok(None);
    };

    let stashes = runner.run(prefix, &["stash", "list", "--no-decorate"])?;
    let stashed = u32::try_from(stashes.stdout.len()).unwrap_or(u32::MAX);

    let tag = resolve_tag(options.tag_policy, prefix, runner)?;

    Ok(Some(StatusRecord {
        branch,
        counters,
        stashed,
        tag,
    }))
}

fn porcelain_status<R: CommandRunner + ?Sized>(
    prefix: &CommandPrefix,
    detached_head_style: DetachedHeadStyle,
    runner: &R,
) -> GitResult<Option<(BranchInfo, ChangeCounters)>> {
    let status = runner.run(prefix, &["status", "--branch", "--porcelain"])?;
    if reports_failure(&status.stderr) {
        return Ok(None);
    }

    let Some((branch_line, entries)) = status.stdout.split_first() else {
        return Ok(None);
    };

    let mut branch = parse_branch_line(branch_line);
    if branch.name.is_empty() {
        return Ok(None);
    }

    if branch.name == DETACHED_HEAD {
        branch.name = detached_head_name(prefix, detached_head_style, runner)?;
    }

    Ok(Some((branch, parse_status_counters(entries))))
}

/// Branch name without running `git status`, for very large repositories
fn head_branch<R: CommandRunner + ?Sized>(
    prefix: &CommandPrefix,
    runner: &R,
) -> GitResult<Option<(BranchInfo, ChangeCounters)>> {
    let head = runner.run(prefix, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    if reports_failure(&head.stderr) {
        return Ok(None);
    }

    Ok(head.first_line().filter(|name| !name.is_empty()).map(|name| {
        let branch = BranchInfo {
            name: name.to_string(),
            ..BranchInfo::default()
        };
        (branch, ChangeCounters::default())
    }))
}

fn detached_head_name<R: CommandRunner + ?Sized>(
    prefix: &CommandPrefix,
    style: DetachedHeadStyle,
    runner: &R,
) -> GitResult<String> {
    let args: &[&str] = match style {
        DetachedHeadStyle::Revision => &["rev-parse", "--short", "HEAD"],
        DetachedHeadStyle::Ref => &["describe", "--contains", "--all"],
    };

    let output = runner.run(prefix, args)?;
    Ok(output.first_line().unwrap_or(DETACHED_HEAD).to_string())
}
