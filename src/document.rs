use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::PathBuf;

use crate::models::{Pos, SelectionRect, SelectionSnapshot};

// Runs of blank lines are folded when handing the full page text to the model.
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

pub struct Document {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl Document {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path).to_string();
        let path = PathBuf::from(expanded);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let lines = content.lines().map(|s| s.to_string()).collect();
        Ok(Self { path, lines })
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Full rendered text of the document, the way the whole-page summary
    /// sees it: lines joined, runs of blank lines collapsed to one.
    pub fn visible_text(&self) -> String {
        let joined = self.lines.join("\n");
        BLANK_RUNS.replace_all(&joined, "\n\n").into_owned()
    }

    /// Builds a selection snapshot between two document positions, in either
    /// order. The end column is exclusive. Returns `None` for an empty range.
    pub fn snapshot(&self, anchor: Pos, head: Pos) -> Option<SelectionSnapshot> {
        if self.lines.is_empty() {
            return None;
        }
        let (start, end) = if (anchor.row, anchor.col) <= (head.row, head.col) {
            (anchor, head)
        } else {
            (head, anchor)
        };
        let start = self.clamp(start);
        let end = self.clamp(end);
        if start == end {
            return None;
        }

        let text = if start.row == end.row {
            slice_chars(&self.lines[start.row], start.col, end.col)
        } else {
            let mut parts = Vec::with_capacity(end.row - start.row + 1);
            let first = &self.lines[start.row];
            parts.push(slice_chars(first, start.col, first.chars().count()));
            for row in start.row + 1..end.row {
                parts.push(self.lines[row].clone());
            }
            parts.push(slice_chars(&self.lines[end.row], 0, end.col));
            parts.join("\n")
        };
        if text.is_empty() {
            return None;
        }

        let rect = if start.row == end.row {
            SelectionRect {
                top: start.row as i32,
                left: start.col as i32,
                width: (end.col - start.col) as u16,
                height: 1,
            }
        } else {
            let width = (start.row..=end.row)
                .map(|row| self.lines[row].chars().count())
                .max()
                .unwrap_or(0);
            SelectionRect {
                top: start.row as i32,
                left: 0,
                width: width as u16,
                height: (end.row - start.row + 1) as u16,
            }
        };

        Some(SelectionSnapshot { text, rect })
    }

    fn clamp(&self, pos: Pos) -> Pos {
        let row = pos.row.min(self.lines.len().saturating_sub(1));
        let col = pos.col.min(self.lines[row].chars().count());
        Pos { row, col }
    }
}

fn slice_chars(line: &str, start: usize, end: usize) -> String {
    line.chars().skip(start).take(end.saturating_sub(start)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn doc(lines: &[&str]) -> Document {
        Document {
            path: PathBuf::from("test.txt"),
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first line").unwrap();
        writeln!(file, "second line").unwrap();
        let document = Document::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(document.lines, vec!["first line", "second line"]);
    }

    #[test]
    fn visible_text_collapses_blank_runs() {
        let document = doc(&["a", "", "", "", "b"]);
        assert_eq!(document.visible_text(), "a\n\nb");
    }

    #[test]
    fn snapshot_single_line() {
        let document = doc(&["hello world"]);
        let snap = document
            .snapshot(Pos { row: 0, col: 6 }, Pos { row: 0, col: 11 })
            .unwrap();
        assert_eq!(snap.text, "world");
        assert_eq!(snap.rect.top, 0);
        assert_eq!(snap.rect.left, 6);
        assert_eq!(snap.rect.width, 5);
        assert_eq!(snap.rect.height, 1);
    }

    #[test]
    fn snapshot_reversed_positions() {
        let document = doc(&["hello world"]);
        let snap = document
            .snapshot(Pos { row: 0, col: 5 }, Pos { row: 0, col: 0 })
            .unwrap();
        assert_eq!(snap.text, "hello");
    }

    #[test]
    fn snapshot_across_lines() {
        let document = doc(&["one two", "three", "four five"]);
        let snap = document
            .snapshot(Pos { row: 0, col: 4 }, Pos { row: 2, col: 4 })
            .unwrap();
        assert_eq!(snap.text, "two\nthree\nfour");
        assert_eq!(snap.rect.top, 0);
        assert_eq!(snap.rect.left, 0);
        assert_eq!(snap.rect.height, 3);
        assert_eq!(snap.rect.width, 9);
    }

    #[test]
    fn snapshot_empty_range_is_none() {
        let document = doc(&["hello"]);
        assert!(document
            .snapshot(Pos { row: 0, col: 2 }, Pos { row: 0, col: 2 })
            .is_none());
    }

    #[test]
    fn snapshot_clamps_out_of_range() {
        let document = doc(&["short"]);
        let snap = document
            .snapshot(Pos { row: 0, col: 0 }, Pos { row: 9, col: 99 })
            .unwrap();
        assert_eq!(snap.text, "short");
    }
}
