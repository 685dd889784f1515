//! Output formats for the command-line binary.

use crate::error::GitError;
use crate::segments::{Segment, StyleClass};
use crossterm::style::{Color, Stylize};
use std::fmt;
use std::str::FromStr;

/// How segments are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Segment texts concatenated, no colour
    #[default]
    Plain,
    /// Segment texts coloured by style class with ANSI escapes
    Ansi,
    /// JSON array of segments for a host prompt framework
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => f.write_str("plain"),
            OutputFormat::Ansi => f.write_str("ansi"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = GitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(OutputFormat::Plain),
            "ansi" => Ok(OutputFormat::Ansi),
            "json" => Ok(OutputFormat::Json),
            other => Err(GitError::ParseError(format!(
                "unknown output format '{}' (expected plain, ansi or json)",
                other
            ))),
        }
    }
}

fn color(style: StyleClass) -> Color {
    match style {
        StyleClass::BranchDetached => Color::Red,
        StyleClass::BranchDirty => Color::Yellow,
        StyleClass::BranchClean => Color::Green,
        StyleClass::Tag => Color::Cyan,
        StyleClass::Behind | StyleClass::Ahead => Color::Blue,
        StyleClass::Staged => Color::DarkGreen,
        StyleClass::Unmerged => Color::DarkRed,
        StyleClass::Changed => Color::DarkYellow,
        StyleClass::Untracked => Color::Magenta,
        StyleClass::Stashed => Color::DarkGrey,
    }
}

/// Render segments in the requested format
pub fn render(segments: &[Segment], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Plain => Ok(segments.iter().map(|s| s.contents.as_str()).collect()),
        OutputFormat::Ansi => Ok(segments
            .iter()
            .map(|s| s.contents.as_str().with(color(s.style)).to_string())
            .collect()),
        OutputFormat::Json => serde_json::to_string(segments),
    }
}
