use crate::git::executor::CommandPrefix;
use std::path::{Path, PathBuf};

/// Name of git's metadata directory inside a work tree
const GIT_DIR_NAME: &str = ".git";

/// Disables any configured fsmonitor hook so every render sees the same state
const NO_FSMONITOR: [&str; 2] = ["-c", "core.fsmonitor="];

/// Build the command prefix that addresses the repository containing `start_dir`
///
/// In fast mode git is pointed straight at `start_dir` with `-C` and does its own
/// discovery. Otherwise the directory tree is walked upwards looking for a `.git`
/// directory, and git is given explicit `--git-dir`/`--work-tree` arguments.
///
/// Returns `None` when the walk finds no repository.
pub fn locate_repository(start_dir: &Path, fast_mode: bool) -> Option<CommandPrefix> {
    let mut args: Vec<String> = NO_FSMONITOR.iter().map(|s| s.to_string()).collect();

    if fast_mode {
        args.push("-C".to_string());
        args.push(start_dir.display().to_string());
        return Some(CommandPrefix::new(args));
    }

    let work_tree = find_work_tree(start_dir)?;
    let git_dir = work_tree.join(GIT_DIR_NAME);
    args.push(format!("--git-dir={}", git_dir.display()));
    args.push(format!("--work-tree={}", work_tree.display()));

    Some(CommandPrefix::new(args))
}

/// Walk from `start_dir` towards the filesystem root and return the first
/// directory that holds a `.git` directory
///
/// The root itself is never treated as a work tree.
pub fn find_work_tree(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .take_while(|dir| dir.parent().is_some())
        .find(|dir| dir.join(GIT_DIR_NAME).is_dir())
        .map(Path::to_path_buf)
}
