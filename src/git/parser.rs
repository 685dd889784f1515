/// Marker git puts in front of the branch line of `status --branch --porcelain`
const BRANCH_HEADER: &str = "## ";

const INITIAL_COMMIT: &str = "Initial commit on ";
/// Wording git 2.15+ uses for the same unborn-branch state
const NO_COMMITS_YET: &str = "No commits yet on ";
const NO_BRANCH: &str = " (no branch)";
const TRACKING_SEPARATOR: &str = "...";

/// Phrase git prints when describing an unborn HEAD
const NO_HEAD_SHA: &str = "Could not get sha1 for HEAD";

/// Branch information from the first line of porcelain status output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: String,
    pub detached: bool,
    pub behind: u32,
    pub ahead: u32,
}

impl BranchInfo {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// File counts derived from porcelain status entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounters {
    pub staged: u32,
    pub unmerged: u32,
    pub changed: u32,
    pub untracked: u32,
}

impl ChangeCounters {
    /// Whether tracked content differs from HEAD or the index
    pub fn has_tracked_changes(&self) -> bool {
        self.staged > 0 || self.unmerged > 0 || self.changed > 0
    }
}

/// Parse the `## ...` line of `git status --branch --porcelain`
///
/// An empty line yields an empty branch name, which callers treat as
/// "nothing to show".
pub fn parse_branch_line(line: &str) -> BranchInfo {
    if line.is_empty() {
        return BranchInfo::default();
    }

    let line = line.strip_prefix(BRANCH_HEADER).unwrap_or(line);

    if let Some(name) = line
        .strip_prefix(INITIAL_COMMIT)
        .or_else(|| line.strip_prefix(NO_COMMITS_YET))
        .filter(|n| !n.is_empty())
    {
        return BranchInfo::named(name);
    }

    if let Some(name) = line.strip_suffix(NO_BRANCH).filter(|n| !n.is_empty()) {
        return BranchInfo {
            detached: true,
            ..BranchInfo::named(name)
        };
    }

    // "main...origin/main [ahead 1, behind 2]"; the branch needs at least one char
    let first_len = line.chars().next().map_or(0, char::len_utf8);
    if let Some(idx) = line[first_len..].find(TRACKING_SEPARATOR) {
        let (ahead, behind) = parse_divergence(line);
        return BranchInfo {
            ahead,
            behind,
            ..BranchInfo::named(&line[..first_len + idx])
        };
    }

    BranchInfo::named(line)
}

/// Read the trailing `[ahead A, behind B]` bracket of a tracking branch line
///
/// Returns `(ahead, behind)`; anything that is not one of the three bracket
/// shapes git emits counts as zero divergence.
fn parse_divergence(line: &str) -> (u32, u32) {
    let Some(inner) = line
        .strip_suffix(']')
        .and_then(|rest| rest.rfind('[').map(|open| &rest[open + 1..]))
    else {
        return (0, 0);
    };

    if let Some((ahead, behind)) = inner.split_once(", ") {
        return match (
            parse_count(ahead, "ahead "),
            parse_count(behind, "behind "),
        ) {
            (Some(ahead), Some(behind)) => (ahead, behind),
            _ => (0, 0),
        };
    }

    if let Some(ahead) = parse_count(inner, "ahead ") {
        return (ahead, 0);
    }
    if let Some(behind) = parse_count(inner, "behind ") {
        return (0, behind);
    }

    (0, 0)
}

fn parse_count(text: &str, label: &str) -> Option<u32> {
    let digits = text.strip_prefix(label)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Count porcelain status entries by their two-character `XY` code
///
/// The four counters are independent: one entry may bump more than one of them
/// (`MM` is both staged and changed).
pub fn parse_status_counters<S: AsRef<str>>(lines: &[S]) -> ChangeCounters {
    let mut counters = ChangeCounters::default();

    for line in lines {
        let (x, y) = status_code(line.as_ref());

        if is_staged(x, y) {
            counters.staged += 1;
        }
        if is_unmerged(x, y) {
            counters.unmerged += 1;
        }
        if is_changed(x, y) {
            counters.changed += 1;
        }
        if x == b'?' {
            counters.untracked += 1;
        }
    }

    counters
}

fn status_code(line: &str) -> (u8, u8) {
    let bytes = line.as_bytes();
    let x = bytes.first().copied().unwrap_or(b' ');
    let y = bytes.get(1).copied().unwrap_or(b' ');
    (x, y)
}

fn is_staged(x: u8, y: u8) -> bool {
    matches!(x, b'M' | b'R' | b'C') || (x == b'D' && y != b'D') || (x == b'A' && y != b'A')
}

fn is_unmerged(x: u8, y: u8) -> bool {
    x == b'U' || y == b'U' || (x == b'A' && y == b'A') || (x == b'D' && y == b'D')
}

fn is_changed(x: u8, y: u8) -> bool {
    y == b'M' || (y == b'D' && x != b'D')
}

/// Whether git's stderr signals that the command did not produce usable output
pub fn reports_failure<S: AsRef<str>>(stderr: &[S]) -> bool {
    stderr.first().is_some_and(|line| {
        let line = line.as_ref();
        line.contains("error") || line.contains("fatal")
    })
}

/// Like [`reports_failure`], but also recognises `describe` on an unborn HEAD
pub fn reports_describe_failure<S: AsRef<str>>(stderr: &[S]) -> bool {
    reports_failure(stderr)
        || stderr
            .first()
            .is_some_and(|line| line.as_ref().contains(NO_HEAD_SHA))
}
