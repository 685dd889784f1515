use crate::error::{GitError, GitResult};
use std::ffi::OsString;
use std::process::{Command, Output};

/// Locale forced on every git invocation so status markers stay in English
const FORCED_LOCALE: &str = "C";

/// Leading arguments that address one repository, e.g. `-C /path/to/repo`
///
/// Built once per prompt render by the locator and reused for every git call
/// of that render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPrefix {
    args: Vec<String>,
}

impl CommandPrefix {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Captured output of one git command, split into lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CommandOutput {
    /// Build an output from raw text, splitting and right-trimming each line
    pub fn from_text(stdout: &str, stderr: &str) -> Self {
        Self {
            stdout: split_lines(stdout),
            stderr: split_lines(stderr),
        }
    }

    /// First stdout line, if git printed anything
    pub fn first_line(&self) -> Option<&str> {
        self.stdout.first().map(String::as_str)
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim_end().to_string()).collect()
}

/// Something that can run a git subcommand against a repository
///
/// The pipeline only ever talks to git through this trait, so tests can swap in
/// scripted output.
pub trait CommandRunner {
    /// Run `git <prefix> <args>` and capture both streams in full
    ///
    /// A non-zero exit status is not an error here; callers inspect stderr.
    /// Only failing to start the process is reported as `Err`.
    fn run(&self, prefix: &CommandPrefix, args: &[&str]) -> GitResult<CommandOutput>;
}

/// Runs the real git binary
#[derive(Debug, Clone)]
pub struct GitExecutor {
    program: OsString,
}

impl GitExecutor {
    /// Create an executor that runs `git` from `PATH`
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Create an executor for a specific git binary
    pub fn with_program<S: Into<OsString>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Get the program this executor launches
    pub fn program(&self) -> &OsString {
        &self.program
    }

    /// Full argv as a single space-separated string, for logging
    fn command_line(&self, prefix: &CommandPrefix, args: &[&str]) -> String {
        let program = self.program.to_string_lossy();
        std::iter::once(&*program)
            .chain(prefix.args().iter().map(String::as_str))
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Process command output into CommandOutput struct
    fn process_output(&self, output: Output) -> CommandOutput {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let trimmed_out = stdout.trim();
        if !trimmed_out.is_empty() {
            log::debug!("Command output: {}", trimmed_out);
        }
        let trimmed_err = stderr.trim();
        if !trimmed_err.is_empty() {
            log::debug!("Command errors: {}", trimmed_err);
        }

        CommandOutput::from_text(&stdout, &stderr)
    }
}

impl Default for GitExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for GitExecutor {
    fn run(&self, prefix: &CommandPrefix, args: &[&str]) -> GitResult<CommandOutput> {
        log::debug!("Executing command: {}", self.command_line(prefix, args));

        let output = Command::new(&self.program)
            .args(prefix.args())
            .args(args)
            .env("LC_ALL", FORCED_LOCALE)
            .output()
            .map_err(|source| GitError::SpawnFailed {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;

        Ok(self.process_output(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().to_path_buf();

        Command::new("git")
            .args(["init"])
            .current_dir(&repo_path)
            .output()
            .unwrap();

        (temp_dir, repo_path)
    }

    fn dash_c(path: &PathBuf) -> CommandPrefix {
        CommandPrefix::new(vec!["-C".to_string(), path.display().to_string()])
    }

    #[test]
    fn test_split_lines_trims_trailing_whitespace() {
        let output = CommandOutput::from_text("## main  \n M a.txt\t\n", "");
        assert_eq!(output.stdout, vec!["## main", " M a.txt"]);
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_first_line() {
        let output = CommandOutput::from_text("abc1234\n", "");
        assert_eq!(output.first_line(), Some("abc1234"));
        assert_eq!(CommandOutput::default().first_line(), None);
    }

    #[test]
    fn test_run_status() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new();

        let output = executor
            .run(&dash_c(&repo_path), &["status", "--branch", "--porcelain"])
            .unwrap();

        assert!(output.stdout[0].starts_with("## "));
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_failed_command_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let executor = GitExecutor::new();
        let prefix = CommandPrefix::new(vec![
            "-C".to_string(),
            temp_dir.path().display().to_string(),
        ]);

        let output = executor.run(&prefix, &["status", "--porcelain"]).unwrap();
        assert!(output.stderr[0].contains("fatal"));
    }

    #[test]
    fn test_missing_binary_is_fatal() {
        let executor = GitExecutor::with_program("definitely-not-a-git-binary");
        let result = executor.run(&CommandPrefix::new(Vec::new()), &["status"]);

        assert!(matches!(result, Err(GitError::SpawnFailed { .. })));
    }

    #[test]
    fn test_command_line_with_empty_prefix() {
        let executor = GitExecutor::new();
        assert_eq!(
            executor.command_line(&CommandPrefix::new(Vec::new()), &["stash", "list"]),
            "git stash list"
        );
        assert_eq!(
            executor.command_line(&dash_c(&PathBuf::from("/repo")), &["status"]),
            "git -C /repo status"
        );
    }

    #[test]
    fn test_default_program() {
        assert_eq!(GitExecutor::default().program(), "git");
    }
}
