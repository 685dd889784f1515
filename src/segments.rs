use crate::status::StatusRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;

/// Highlight group every gitstatus segment falls back to
pub const BASE_HIGHLIGHT_GROUP: &str = "gitstatus";

/// Highlight group the host uses for dividers between gitstatus segments
pub const DIVIDER_HIGHLIGHT_GROUP: &str = "gitstatus:divider";

/// Kinds of information a segment can show, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Branch,
    Tag,
    Behind,
    Ahead,
    Staged,
    Unmerged,
    Changed,
    Untracked,
    Stashed,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Branch,
        Category::Tag,
        Category::Behind,
        Category::Ahead,
        Category::Staged,
        Category::Unmerged,
        Category::Changed,
        Category::Untracked,
        Category::Stashed,
    ];

    /// Key used for this category in configuration files
    pub fn key(&self) -> &'static str {
        match self {
            Category::Branch => "branch",
            Category::Tag => "tag",
            Category::Behind => "behind",
            Category::Ahead => "ahead",
            Category::Staged => "staged",
            Category::Unmerged => "unmerged",
            Category::Changed => "changed",
            Category::Untracked => "untracked",
            Category::Stashed => "stashed",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }

    /// Built-in template used when the configuration has none
    pub fn default_template(&self) -> &'static str {
        match self {
            Category::Branch => "\u{e0a0} {}",
            Category::Tag => " \u{2605} {}",
            Category::Behind => " ↓ {}",
            Category::Ahead => " ↑ {}",
            Category::Staged => " ● {}",
            Category::Unmerged => " ✖ {}",
            Category::Changed => " ✚ {}",
            Category::Untracked => " … {}",
            Category::Stashed => " ⚑ {}",
        }
    }
}

/// How the host should colour a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleClass {
    BranchDetached,
    BranchDirty,
    BranchClean,
    Tag,
    Behind,
    Ahead,
    Staged,
    Unmerged,
    Changed,
    Untracked,
    Stashed,
}

impl StyleClass {
    /// Most specific highlight group for this class
    pub fn highlight_group(&self) -> &'static str {
        match self {
            StyleClass::BranchDetached => "gitstatus_branch_detached",
            StyleClass::BranchDirty => "gitstatus_branch_dirty",
            StyleClass::BranchClean => "gitstatus_branch_clean",
            StyleClass::Tag => "gitstatus_tag",
            StyleClass::Behind => "gitstatus_behind",
            StyleClass::Ahead => "gitstatus_ahead",
            StyleClass::Staged => "gitstatus_staged",
            StyleClass::Unmerged => "gitstatus_unmerged",
            StyleClass::Changed => "gitstatus_changed",
            StyleClass::Untracked => "gitstatus_untracked",
            StyleClass::Stashed => "gitstatus_stashed",
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            StyleClass::BranchDetached | StyleClass::BranchDirty | StyleClass::BranchClean
        )
    }

    /// Highlight groups from most to least specific
    pub fn highlight_groups(&self) -> Vec<&'static str> {
        let mut groups = vec![self.highlight_group()];
        if self.is_branch() {
            groups.push("gitstatus_branch");
        }
        groups.push(BASE_HIGHLIGHT_GROUP);
        groups
    }
}

/// One piece of prompt output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub contents: String,
    pub style: StyleClass,
    pub highlight_groups: Vec<&'static str>,
    pub divider_highlight_group: &'static str,
}

impl Segment {
    pub fn new(contents: String, style: StyleClass) -> Self {
        Self {
            contents,
            highlight_groups: style.highlight_groups(),
            style,
            divider_highlight_group: DIVIDER_HIGHLIGHT_GROUP,
        }
    }
}

/// User-supplied display templates, keyed by category
///
/// The first `{}` in a template is replaced by the value; `{{` and `}}` stand
/// for literal braces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formats {
    templates: HashMap<Category, String>,
}

impl Formats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: Category, template: impl Into<String>) {
        self.templates.insert(category, template.into());
    }

    pub fn template(&self, category: Category) -> &str {
        self.templates
            .get(&category)
            .map(String::as_str)
            .unwrap_or_else(|| category.default_template())
    }

    /// Substitute `value` into the template for `category`
    pub fn render(&self, category: Category, value: impl Display) -> String {
        substitute(self.template(category), &value.to_string())
    }
}

fn substitute(template: &str, value: &str) -> String {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut chars = template.chars().peekable();
    let mut substituted = false;

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('{', Some('{')) | ('}', Some('}')) => {
                chars.next();
                out.push(c);
            }
            ('{', Some('}')) if !substituted => {
                chars.next();
                out.push_str(value);
                substituted = true;
            }
            _ => out.push(c),
        }
    }

    out
}

/// Turn a status record into prompt segments
///
/// The branch segment always comes first. The remaining categories follow in
/// [`Category::ALL`] order and are left out entirely when zero or empty.
pub fn build_segments(
    record: &StatusRecord,
    formats: &Formats,
    untracked_counts_as_dirty: bool,
) -> Vec<Segment> {
    let counters = &record.counters;
    let branch_style = if record.branch.detached {
        StyleClass::BranchDetached
    } else if counters.has_tracked_changes()
        || (counters.untracked > 0 && untracked_counts_as_dirty)
    {
        StyleClass::BranchDirty
    } else {
        StyleClass::BranchClean
    };

    let mut segments = vec![Segment::new(
        formats.render(Category::Branch, &record.branch.name),
        branch_style,
    )];

    if !record.tag.is_empty() {
        segments.push(Segment::new(
            formats.render(Category::Tag, &record.tag),
            StyleClass::Tag,
        ));
    }

    let counts = [
        (Category::Behind, StyleClass::Behind, record.branch.behind),
        (Category::Ahead, StyleClass::Ahead, record.branch.ahead),
        (Category::Staged, StyleClass::Staged, counters.staged),
        (Category::Unmerged, StyleClass::Unmerged, counters.unmerged),
        (Category::Changed, StyleClass::Changed, counters.changed),
        (Category::Untracked, StyleClass::Untracked, counters.untracked),
        (Category::Stashed, StyleClass::Stashed, record.stashed),
    ];

    segments.extend(
        counts
            .into_iter()
            .filter(|(_, _, count)| *count > 0)
            .map(|(category, style, count)| Segment::new(formats.render(category, count), style)),
    );

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{BranchInfo, ChangeCounters};

    fn record(branch: &str) -> StatusRecord {
        StatusRecord {
            branch: BranchInfo {
                name: branch.to_string(),
                ..BranchInfo::default()
            },
            ..StatusRecord::default()
        }
    }

    fn styles(segments: &[Segment]) -> Vec<StyleClass> {
        segments.iter().map(|s| s.style).collect()
    }

    #[test]
    fn test_clean_branch_only() {
        let segments = build_segments(&record("main"), &Formats::new(), true);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].contents, "\u{e0a0} main");
        assert_eq!(segments[0].style, StyleClass::BranchClean);
        assert_eq!(
            segments[0].highlight_groups,
            ["gitstatus_branch_clean", "gitstatus_branch", "gitstatus"]
        );
        assert_eq!(segments[0].divider_highlight_group, "gitstatus:divider");
    }

    #[test]
    fn test_full_order() {
        let mut rec = record("main");
        rec.tag = "v1.0".to_string();
        rec.branch.behind = 1;
        rec.branch.ahead = 2;
        rec.counters = ChangeCounters {
            staged: 3,
            unmerged: 4,
            changed: 5,
            untracked: 6,
        };
        rec.stashed = 7;

        let segments = build_segments(&rec, &Formats::new(), true);
        assert_eq!(
            styles(&segments),
            [
                StyleClass::BranchDirty,
                StyleClass::Tag,
                StyleClass::Behind,
                StyleClass::Ahead,
                StyleClass::Staged,
                StyleClass::Unmerged,
                StyleClass::Changed,
                StyleClass::Untracked,
                StyleClass::Stashed,
            ]
        );
        let texts: Vec<&str> = segments.iter().map(|s| s.contents.as_str()).collect();
        assert_eq!(
            texts,
            [
                "\u{e0a0} main",
                " \u{2605} v1.0",
                " ↓ 1",
                " ↑ 2",
                " ● 3",
                " ✖ 4",
                " ✚ 5",
                " … 6",
                " ⚑ 7",
            ]
        );
    }

    #[test]
    fn test_zero_counts_are_skipped() {
        let mut rec = record("main");
        rec.branch.ahead = 1;
        rec.counters.changed = 2;
        rec.stashed = 1;

        let segments = build_segments(&rec, &Formats::new(), true);
        assert_eq!(
            styles(&segments),
            [
                StyleClass::BranchDirty,
                StyleClass::Ahead,
                StyleClass::Changed,
                StyleClass::Stashed,
            ]
        );
    }

    #[test]
    fn test_detached_wins_over_dirty() {
        let mut rec = record("abc1234");
        rec.branch.detached = true;
        rec.counters.staged = 1;

        let segments = build_segments(&rec, &Formats::new(), true);
        assert_eq!(segments[0].style, StyleClass::BranchDetached);
    }

    #[test]
    fn test_untracked_dirty_option() {
        let mut rec = record("main");
        rec.counters.untracked = 2;

        let dirty = build_segments(&rec, &Formats::new(), true);
        assert_eq!(dirty[0].style, StyleClass::BranchDirty);

        let clean = build_segments(&rec, &Formats::new(), false);
        assert_eq!(clean[0].style, StyleClass::BranchClean);
        // The untracked count itself is still shown
        assert_eq!(clean[1].style, StyleClass::Untracked);
    }

    #[test]
    fn test_custom_templates() {
        let mut formats = Formats::new();
        formats.set(Category::Branch, "[{}]");
        formats.set(Category::Staged, "+{}");

        let mut rec = record("dev");
        rec.counters.staged = 4;
        rec.counters.changed = 1;

        let segments = build_segments(&rec, &formats, true);
        assert_eq!(segments[0].contents, "[dev]");
        assert_eq!(segments[1].contents, "+4");
        assert_eq!(segments[2].contents, " ✚ 1");
    }

    #[test]
    fn test_template_without_placeholder() {
        let mut formats = Formats::new();
        formats.set(Category::Stashed, " stash");
        assert_eq!(formats.render(Category::Stashed, 3), " stash");
    }

    #[test]
    fn test_template_brace_escapes() {
        let mut formats = Formats::new();
        formats.set(Category::Branch, "{{git}} {}");
        assert_eq!(formats.render(Category::Branch, "main"), "{git} main");

        formats.set(Category::Tag, "{{}}{}");
        assert_eq!(formats.render(Category::Tag, "v1"), "{}v1");
    }

    #[test]
    fn test_template_second_placeholder_is_literal() {
        let mut formats = Formats::new();
        formats.set(Category::Ahead, "{}/{}");
        assert_eq!(formats.render(Category::Ahead, 2), "2/{}");
    }

    #[test]
    fn test_category_keys() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
        }
        assert_eq!(Category::from_key("changes"), None);
    }

    #[test]
    fn test_non_branch_groups() {
        assert_eq!(
            StyleClass::Stashed.highlight_groups(),
            ["gitstatus_stashed", "gitstatus"]
        );
    }
}
