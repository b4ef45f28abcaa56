use super::quote::{take_quoted, unquote};
use super::runner::{CommandResult, Runner};
use anyhow::Result;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileCategory {
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    Untracked,
    Unmerged,
}

impl FileCategory {
    /// Map a single status letter to a category. `T` (type change) counts as modified.
    fn from_code(c: char) -> Option<Self> {
        match c {
            'M' | 'T' => Some(FileCategory::Modified),
            'A' => Some(FileCategory::Added),
            'D' => Some(FileCategory::Deleted),
            'R' => Some(FileCategory::Renamed),
            'C' => Some(FileCategory::Copied),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileCategory::Modified => "modified",
            FileCategory::Added => "added",
            FileCategory::Deleted => "deleted",
            FileCategory::Renamed => "renamed",
            FileCategory::Copied => "copied",
            FileCategory::Untracked => "untracked",
            FileCategory::Unmerged => "unmerged",
        }
    }

    /// Modified, added, deleted, renamed or copied.
    pub fn is_modified_family(self) -> bool {
        !matches!(self, FileCategory::Untracked | FileCategory::Unmerged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatusEntry {
    pub path: String,
    pub category: FileCategory,
    /// Source path of a rename or copy.
    #[allow(dead_code)]
    pub original_path: Option<String>,
}

impl FileStatusEntry {
    fn new(category: FileCategory, path: String) -> Self {
        Self {
            path,
            category,
            original_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A `#`/`##` header we don't use.
    Header,
    /// A file git itself reports as ignored (`!!` / `!`).
    IgnoredFile,
    /// Known line kind, but fields are missing or invalid.
    Malformed,
    /// Not part of the porcelain grammar.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredLine {
    pub line: String,
    pub reason: IgnoreReason,
}

/// Branch-tracking headers from `git status --porcelain=v2 --branch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchInfo {
    pub head: Option<String>,
    pub upstream: Option<String>,
    pub ahead_behind: Option<(u32, u32)>,
}

impl BranchInfo {
    /// True unless the counters are exactly `+0 -0`. A branch without
    /// tracking information is not considered diverged.
    pub fn diverged(&self) -> bool {
        matches!(self.ahead_behind, Some((ahead, behind)) if ahead != 0 || behind != 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub branch: BranchInfo,
    /// Modified-family entries.
    pub changed: Vec<FileStatusEntry>,
    pub untracked: Vec<FileStatusEntry>,
    pub unmerged: Vec<FileStatusEntry>,
    pub ignored: Vec<IgnoredLine>,
}

impl StatusReport {
    pub fn modified_family(&self) -> Vec<&str> {
        self.changed.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn untracked_paths(&self) -> Vec<&str> {
        self.untracked.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn unmerged_paths(&self) -> Vec<&str> {
        self.unmerged.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.untracked.is_empty() && self.unmerged.is_empty()
    }

    /// Paths grouped by category, in category order.
    pub fn by_category(&self) -> BTreeMap<FileCategory, Vec<&str>> {
        let mut map: BTreeMap<FileCategory, Vec<&str>> = BTreeMap::new();
        for entry in self.changed.iter().chain(&self.untracked).chain(&self.unmerged) {
            map.entry(entry.category).or_default().push(entry.path.as_str());
        }
        map
    }

    fn push(&mut self, entry: FileStatusEntry) {
        if entry.category.is_modified_family() {
            self.changed.push(entry);
        } else if entry.category == FileCategory::Untracked {
            self.untracked.push(entry);
        } else {
            self.unmerged.push(entry);
        }
    }

    fn ignore(&mut self, line: &str, reason: IgnoreReason) {
        log::debug!("status: ignoring {:?} line: {}", reason, line);
        self.ignored.push(IgnoredLine {
            line: line.to_string(),
            reason,
        });
    }
}

/// Run `git status --porcelain` (v1, no branch header).
pub fn query_v1(runner: &dyn Runner) -> Result<CommandResult> {
    runner.git(&["status", "--porcelain"])
}

/// Run `git status --porcelain=v2 --branch`.
pub fn query_v2(runner: &dyn Runner) -> Result<CommandResult> {
    runner.git(&["status", "--porcelain=v2", "--branch"])
}

/// Iterate non-empty lines, tolerating CRLF output.
fn status_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
}

fn is_unmerged(x: char, y: char) -> bool {
    matches!(
        (x, y),
        ('D', 'D') | ('A', 'U') | ('U', 'D') | ('U', 'A') | ('D', 'U') | ('A', 'A') | ('U', 'U')
    )
}

/// Category from an `XY` pair: the index column wins, the worktree column
/// is used when the index column is unchanged.
fn category_from_xy(x: char, y: char) -> Option<FileCategory> {
    if is_unmerged(x, y) {
        return Some(FileCategory::Unmerged);
    }
    FileCategory::from_code(x).or_else(|| FileCategory::from_code(y))
}

fn split_xy(xy: &str) -> Option<(char, char)> {
    let mut chars = xy.chars();
    let x = chars.next()?;
    let y = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some((x, y))
}

// ── porcelain v1 ──────────────────────────────────────────────────────

/// Classify `git status --porcelain` output.
///
/// Each entry is `XY PATH`: a two-character code, one space, then the path
/// (`ORIG -> PATH` for renames and copies). Extra padding after the
/// delimiter is skipped.
pub fn classify_porcelain_v1(text: &str) -> StatusReport {
    let mut report = StatusReport::default();
    for line in status_lines(text) {
        match parse_v1_line(line) {
            Ok(entry) => report.push(entry),
            Err(reason) => report.ignore(line, reason),
        }
    }
    report
}

fn parse_v1_line(line: &str) -> Result<FileStatusEntry, IgnoreReason> {
    if line.starts_with("##") {
        return Err(IgnoreReason::Header);
    }
    let xy = line.get(..2).ok_or(IgnoreReason::Malformed)?;
    let (x, y) = split_xy(xy).ok_or(IgnoreReason::Malformed)?;
    let path = line
        .get(2..)
        .and_then(|rest| rest.strip_prefix(' '))
        .map(|rest| rest.trim_start_matches(' '))
        .filter(|path| !path.is_empty())
        .ok_or(IgnoreReason::Malformed)?;

    match (x, y) {
        ('?', '?') => Ok(FileStatusEntry::new(FileCategory::Untracked, path_field(path)?)),
        ('!', '!') => Err(IgnoreReason::IgnoredFile),
        _ => {
            let category = category_from_xy(x, y).ok_or(IgnoreReason::Unrecognized)?;
            if matches!(category, FileCategory::Renamed | FileCategory::Copied) {
                if let Some((orig, new)) = split_rename(path)? {
                    let mut entry = FileStatusEntry::new(category, new);
                    entry.original_path = Some(orig);
                    return Ok(entry);
                }
            }
            Ok(FileStatusEntry::new(category, path_field(path)?))
        }
    }
}

fn path_field(field: &str) -> Result<String, IgnoreReason> {
    unquote(field).ok_or(IgnoreReason::Malformed)
}

/// Split `ORIG -> PATH`, where either side may be quoted.
fn split_rename(field: &str) -> Result<Option<(String, String)>, IgnoreReason> {
    let (orig, rest) = if field.starts_with('"') {
        let (orig, rest) = take_quoted(field).ok_or(IgnoreReason::Malformed)?;
        match rest.strip_prefix(" -> ") {
            Some(rest) => (orig, rest),
            None => return Ok(None),
        }
    } else {
        match field.split_once(" -> ") {
            Some((orig, rest)) => (orig.to_string(), rest),
            None => return Ok(None),
        }
    };
    Ok(Some((orig, path_field(rest)?)))
}

// ── porcelain v2 ──────────────────────────────────────────────────────

/// Classify `git status --porcelain=v2 --branch` output.
pub fn classify_porcelain_v2(text: &str) -> StatusReport {
    let mut report = StatusReport::default();
    for line in status_lines(text) {
        match parse_v2_line(line, &mut report.branch) {
            Ok(Some(entry)) => report.push(entry),
            Ok(None) => {}
            Err(reason) => report.ignore(line, reason),
        }
    }
    report
}

/// `Ok(None)` means a branch header was consumed into `branch`.
fn parse_v2_line(line: &str, branch: &mut BranchInfo) -> Result<Option<FileStatusEntry>, IgnoreReason> {
    if let Some(header) = line.strip_prefix("# ") {
        return parse_v2_header(header, branch).map(|()| None);
    }
    if let Some(path) = line.strip_prefix("? ") {
        return Ok(Some(FileStatusEntry::new(FileCategory::Untracked, path_field(path)?)));
    }
    if line.starts_with("! ") {
        return Err(IgnoreReason::IgnoredFile);
    }

    match line.split_once(' ').map(|(kind, _)| kind) {
        // 1 XY sub mH mI mW hH hI path
        Some("1") => {
            let fields: Vec<&str> = line.splitn(9, ' ').collect();
            if fields.len() < 9 || fields[8].is_empty() {
                return Err(IgnoreReason::Malformed);
            }
            let (x, y) = split_xy(fields[1]).ok_or(IgnoreReason::Malformed)?;
            let category = category_from_xy(x, y).ok_or(IgnoreReason::Malformed)?;
            Ok(Some(FileStatusEntry::new(category, path_field(fields[8])?)))
        }
        // 2 XY sub mH mI mW hH hI Xscore path<TAB>origPath
        Some("2") => {
            let fields: Vec<&str> = line.splitn(10, ' ').collect();
            if fields.len() < 10 {
                return Err(IgnoreReason::Malformed);
            }
            let (x, y) = split_xy(fields[1]).ok_or(IgnoreReason::Malformed)?;
            let category = category_from_xy(x, y).ok_or(IgnoreReason::Malformed)?;
            let (path, orig) = fields[9].split_once('\t').ok_or(IgnoreReason::Malformed)?;
            let mut entry = FileStatusEntry::new(category, path_field(path)?);
            entry.original_path = Some(path_field(orig)?);
            Ok(Some(entry))
        }
        // u XY sub m1 m2 m3 mW h1 h2 h3 path
        Some("u") => {
            let fields: Vec<&str> = line.splitn(11, ' ').collect();
            if fields.len() < 11 || fields[10].is_empty() {
                return Err(IgnoreReason::Malformed);
            }
            Ok(Some(FileStatusEntry::new(FileCategory::Unmerged, path_field(fields[10])?)))
        }
        _ => Err(IgnoreReason::Unrecognized),
    }
}

fn parse_v2_header(header: &str, branch: &mut BranchInfo) -> Result<(), IgnoreReason> {
    let (key, value) = header.split_once(' ').unwrap_or((header, ""));
    match key {
        "branch.oid" => Ok(()),
        "branch.head" => {
            branch.head = (value != "(detached)" && !value.is_empty()).then(|| value.to_string());
            Ok(())
        }
        "branch.upstream" => {
            branch.upstream = Some(value.to_string());
            Ok(())
        }
        "branch.ab" => {
            branch.ahead_behind = Some(parse_ahead_behind(value).ok_or(IgnoreReason::Malformed)?);
            Ok(())
        }
        _ => Err(IgnoreReason::Header),
    }
}

/// Parse `+A -B`.
fn parse_ahead_behind(value: &str) -> Option<(u32, u32)> {
    let (ahead, behind) = value.split_once(' ')?;
    let ahead = ahead.strip_prefix('+')?.parse().ok()?;
    let behind = behind.strip_prefix('-')?.parse().ok()?;
    Some((ahead, behind))
}
