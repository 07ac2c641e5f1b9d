//! Invocation argument parsing.
//!
//! IDEs launch external editors with a flat argument vector mixing position
//! flags, startup tokens meant for other editors, solution files, and the
//! files to open. [`TargetParser`] scans it left to right and turns it into
//! an ordered list of [`FileTarget`]s.

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use std::fmt;

/// A file to open, optionally with a cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    filename: String,
    line: Option<u32>,
    column: Option<u32>,
}

impl FileTarget {
    /// Create a target. A column without a line is dropped.
    ///
    /// `filename` is not checked here; [`TargetParser`] never produces an
    /// empty one.
    pub fn new(filename: impl Into<String>, line: Option<u32>, column: Option<u32>) -> Self {
        let column = line.and(column);
        Self {
            filename: filename.into(),
            line,
            column,
        }
    }

    /// Create a target with no cursor position.
    pub fn plain(filename: impl Into<String>) -> Self {
        Self::new(filename, None, None)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }

    /// Cursor position to jump to after opening, if any.
    ///
    /// A target with only a line lands on column 1.
    pub fn position(&self) -> Option<CursorPosition> {
        self.line.map(|line| CursorPosition {
            line,
            column: self.column.unwrap_or(1),
        })
    }
}

impl fmt::Display for FileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{}:{}:{}", self.filename, line, column),
            (Some(line), None) => write!(f, "{}:{}", self.filename, line),
            _ => write!(f, "{}", self.filename),
        }
    }
}

/// One-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: u32,
    pub column: u32,
}

/// Line/column flags seen since the last target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingPosition {
    line: Option<u32>,
    column: Option<u32>,
}

impl PendingPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a line. Values outside `1..=u32::MAX` leave the line unset.
    pub fn set_line(&mut self, value: i64) {
        self.line = positive(value);
    }

    /// Record a column. Values outside `1..=u32::MAX` leave the column unset.
    pub fn set_column(&mut self, value: i64) {
        self.column = positive(value);
    }

    /// Build a target for `filename` from the pending state and reset it.
    pub fn take(&mut self, filename: impl Into<String>) -> FileTarget {
        let pending = std::mem::take(self);
        FileTarget::new(filename, pending.line, pending.column)
    }

    /// Drop any pending position.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.column.is_none()
    }
}

fn positive(value: i64) -> Option<u32> {
    if value > 0 {
        u32::try_from(value).ok()
    } else {
        None
    }
}

/// Which position flag an option sets.
#[derive(Debug, Clone, Copy)]
enum PositionFlag {
    Line,
    Column,
}

impl PositionFlag {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "--line" | "-l" => Some(PositionFlag::Line),
            "--column" | "-c" => Some(PositionFlag::Column),
            _ => None,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            PositionFlag::Line => "line",
            PositionFlag::Column => "column",
        }
    }
}

/// Parses IDE invocation arguments into file targets.
pub struct TargetParser;

impl TargetParser {
    /// Parse the arguments following the program name.
    pub fn parse<I, S>(args: I) -> Result<Vec<FileTarget>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut targets = Vec::new();
        let mut pending = PendingPosition::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let arg = arg.as_ref();

            if let Some(flag) = PositionFlag::from_arg(arg) {
                let value = args.next().ok_or_else(|| {
                    RelayError::argument(arg, format!("no integer argument passed to {}", arg))
                })?;
                let value = value.as_ref();
                let invalid = || {
                    RelayError::argument(
                        arg,
                        format!("invalid {} number for {}: {}", flag.noun(), arg, value),
                    )
                };
                let n: i64 = value.trim().parse().map_err(|_| invalid())?;
                if n > i64::from(u32::MAX) {
                    return Err(invalid());
                }
                match flag {
                    PositionFlag::Line => pending.set_line(n),
                    PositionFlag::Column => pending.set_column(n),
                }
                continue;
            }

            if RelayConfig::INERT_TOKENS.contains(&arg) {
                continue;
            }

            if is_solution_file(arg) {
                pending.reset();
                continue;
            }

            if arg.is_empty() {
                continue;
            }

            targets.push(pending.take(arg));
        }

        Ok(targets)
    }
}

fn is_solution_file(arg: &str) -> bool {
    arg.to_lowercase().ends_with(RelayConfig::SOLUTION_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Vec<FileTarget>> {
        TargetParser::parse(args.iter().copied())
    }

    #[test]
    fn test_line_and_column_apply_to_next_file() {
        let targets = parse(&["--line", "5", "--column", "3", "foo.txt"]).unwrap();
        assert_eq!(targets, vec![FileTarget::new("foo.txt", Some(5), Some(3))]);
    }

    #[test]
    fn test_short_flags() {
        let targets = parse(&["a.txt", "-l", "2", "-c", "4", "b.txt"]).unwrap();
        assert_eq!(
            targets,
            vec![
                FileTarget::plain("a.txt"),
                FileTarget::new("b.txt", Some(2), Some(4)),
            ]
        );
    }

    #[test]
    fn test_pending_position_is_consumed_once() {
        let targets = parse(&["--line", "7", "one.rs", "two.rs"]).unwrap();
        assert_eq!(targets[0].line(), Some(7));
        assert_eq!(targets[1].line(), None);
    }

    #[test]
    fn test_solution_file_clears_pending_position() {
        let targets = parse(&["--line", "9", "--column", "2", "Game.SLN", "Player.cs"]).unwrap();
        assert_eq!(targets, vec![FileTarget::plain("Player.cs")]);
    }

    #[test]
    fn test_solution_file_is_not_a_target() {
        let targets = parse(&["Project.sln"]).unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_column_without_line_is_dropped() {
        let targets = parse(&["--column", "12", "main.c"]).unwrap();
        assert_eq!(targets[0].line(), None);
        assert_eq!(targets[0].column(), None);
        assert_eq!(targets[0].position(), None);
    }

    #[test]
    fn test_non_positive_values_are_unset() {
        let targets = parse(&["--line", "0", "--column", "-3", "x.txt"]).unwrap();
        assert_eq!(targets, vec![FileTarget::plain("x.txt")]);

        let targets = parse(&["--line", "4", "--column", "0", "y.txt"]).unwrap();
        assert_eq!(targets, vec![FileTarget::new("y.txt", Some(4), None)]);
    }

    #[test]
    fn test_inert_tokens_are_skipped() {
        let targets = parse(&[
            "nosplash",
            "dontReopenProjects",
            "disableNonBundledPlugins",
            "--wait",
            "Assets/Scripts/Enemy.cs",
        ])
        .unwrap();
        assert_eq!(targets, vec![FileTarget::plain("Assets/Scripts/Enemy.cs")]);
    }

    #[test]
    fn test_inert_token_keeps_pending_position() {
        let targets = parse(&["--line", "3", "--wait", "file.txt"]).unwrap();
        assert_eq!(targets[0].line(), Some(3));
    }

    #[test]
    fn test_missing_value_names_flag() {
        let err = parse(&["file.txt", "--line"]).unwrap_err();
        match err {
            RelayError::Argument { flag, message } => {
                assert_eq!(flag, "--line");
                assert!(message.contains("--line"));
            }
            other => panic!("Expected Argument error, got: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_value_names_flag() {
        let err = parse(&["-c", "abc", "file.txt"]).unwrap_err();
        match err {
            RelayError::Argument { flag, message } => {
                assert_eq!(flag, "-c");
                assert!(message.contains("abc"));
            }
            other => panic!("Expected Argument error, got: {:?}", other),
        }
    }

    #[test]
    fn test_line_beyond_u32_is_rejected() {
        let err = parse(&["--line", "5000000000", "file.txt"]).unwrap_err();
        match err {
            RelayError::Argument { flag, message } => {
                assert_eq!(flag, "--line");
                assert_eq!(message, "invalid line number for --line: 5000000000");
            }
            other => panic!("Expected Argument error, got: {:?}", other),
        }

        let targets = parse(&["-l", "4294967295", "file.txt"]).unwrap();
        assert_eq!(targets[0].line(), Some(u32::MAX));
    }

    #[test]
    fn test_empty_string_is_never_a_target() {
        let targets = parse(&["", "-l", "2", "", "a.txt"]).unwrap();
        assert_eq!(targets, vec![FileTarget::new("a.txt", Some(2), None)]);
        assert!(targets.iter().all(|t| !t.filename().is_empty()));
    }

    #[test]
    fn test_empty_arguments_yield_no_targets() {
        assert!(parse(&[]).unwrap().is_empty());
        assert!(parse(&["nosplash", "--line", "3"]).unwrap().is_empty());
    }

    #[test]
    fn test_pending_position_accumulator() {
        let mut pending = PendingPosition::new();
        assert!(pending.is_empty());

        pending.set_line(10);
        pending.set_column(2);
        let target = pending.take("a");
        assert_eq!(target.position(), Some(CursorPosition { line: 10, column: 2 }));
        assert!(pending.is_empty());

        pending.set_line(5);
        pending.reset();
        assert!(pending.is_empty());
        assert_eq!(pending.take("b"), FileTarget::plain("b"));
    }

    #[test]
    fn test_line_only_position_defaults_to_first_column() {
        let target = FileTarget::new("main.go", Some(10), None);
        assert_eq!(target.position(), Some(CursorPosition { line: 10, column: 1 }));
    }

    #[test]
    fn test_target_display() {
        assert_eq!(FileTarget::new("a.rs", Some(1), Some(2)).to_string(), "a.rs:1:2");
        assert_eq!(FileTarget::new("a.rs", Some(1), None).to_string(), "a.rs:1");
        assert_eq!(FileTarget::plain("a.rs").to_string(), "a.rs");
    }
}
