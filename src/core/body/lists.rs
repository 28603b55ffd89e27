//! Bullet and numbered lists
//!
//! A run of item lines (plus indented lines under them) becomes one
//! `itemize` / `enumerate` tree. Every non-empty line of the run is an item.
//! Nesting depth is the leading width of a line divided by the tab width,
//! with a tab counting as a full tab width. An indented item carrying the
//! other kind's marker opens a nested list of that kind.

use std::borrow::Cow;

use regex::Regex;

use super::regions::RegionIndex;
use crate::core::patterns::{
    bullet_list_pattern, numbered_list_pattern, BULLET_LIST_RE, DEFAULT_TAB_WIDTH,
    NUMBERED_LIST_RE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    fn environment(self) -> &'static str {
        match self {
            ListKind::Bullet => "itemize",
            ListKind::Numbered => "enumerate",
        }
    }

    fn other(self) -> Self {
        match self {
            ListKind::Bullet => ListKind::Numbered,
            ListKind::Numbered => ListKind::Bullet,
        }
    }

    /// Run pattern whose continuation lines are indented by `tab_width`
    fn pattern(self, tab_width: usize) -> Result<Cow<'static, Regex>, regex::Error> {
        if tab_width == DEFAULT_TAB_WIDTH {
            return Ok(Cow::Borrowed(match self {
                ListKind::Bullet => &*BULLET_LIST_RE,
                ListKind::Numbered => &*NUMBERED_LIST_RE,
            }));
        }
        let pattern = match self {
            ListKind::Bullet => bullet_list_pattern(tab_width),
            ListKind::Numbered => numbered_list_pattern(tab_width),
        };
        Regex::new(&pattern).map(Cow::Owned)
    }

    /// Split a trimmed line into its item text if it starts with this kind's
    /// marker. `loose` accepts a numbered marker without a following space,
    /// as the top-level pattern does.
    fn item_text(self, line: &str, loose: bool) -> Option<&str> {
        match self {
            ListKind::Bullet => {
                let mut chars = line.chars();
                let marker = chars.next()?;
                let rest = chars.as_str();
                let spaced = rest.starts_with([' ', '\t']);
                if matches!(marker, '*' | '-' | '+' | '.') && spaced {
                    Some(rest.trim_start())
                } else {
                    None
                }
            }
            ListKind::Numbered => {
                let digits = line.bytes().take_while(u8::is_ascii_digit).count();
                let rest = line[digits..].strip_prefix('.')?;
                if digits == 0 || !(loose || rest.starts_with([' ', '\t'])) {
                    return None;
                }
                Some(rest.trim_start())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub depth: usize,
    pub kind: ListKind,
    pub text: String,
}

/// Bullet runs first, then numbered runs
pub fn lists(text: &str, tab_width: usize) -> String {
    let tab_width = tab_width.max(1);
    let text = convert_runs(text, ListKind::Bullet, tab_width);
    convert_runs(&text, ListKind::Numbered, tab_width)
}

fn convert_runs(text: &str, kind: ListKind, tab_width: usize) -> String {
    let pattern = match kind.pattern(tab_width) {
        Ok(pattern) => pattern,
        Err(err) => {
            log::error!("{} pattern for tab width {}: {}", kind.environment(), tab_width, err);
            return text.to_string();
        }
    };
    let regions = RegionIndex::new(text);
    pattern
        .replace_all(text, |caps: &regex::Captures| {
            let run = caps.get(0).map_or("", |m| m.as_str());
            let end = caps.get(0).map_or(0, |m| m.end());
            if regions.in_code(end) || regions.in_math(end) {
                return run.to_string();
            }
            let items = parse_items(run, kind, tab_width);
            log::trace!("{}: {} items", kind.environment(), items.len());
            render_list(&items)
        })
        .into_owned()
}

/// Leading width in columns, a tab counting `tab_width` columns
fn indent_width(line: &str, tab_width: usize) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum()
}

/// One item per non-empty line of a `kind` run
pub fn parse_items(run: &str, kind: ListKind, tab_width: usize) -> Vec<ListItem> {
    let tab_width = tab_width.max(1);
    run.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let width = indent_width(line, tab_width);
            let trimmed = line.trim_start();
            let nested = kind.other();
            let (kind, text) = match kind.item_text(trimmed, width == 0) {
                Some(text) => (kind, text),
                None => match nested.item_text(trimmed, false).filter(|_| width > 0) {
                    Some(text) => (nested, text),
                    None => (kind, trimmed),
                },
            };
            ListItem {
                depth: width / tab_width,
                kind,
                text: text.to_string(),
            }
        })
        .collect()
}

/// One `\begin`/`\end` per depth step, so every opened level is closed. A
/// change of kind at the same depth closes the old list and opens the new one.
pub fn render_list(items: &[ListItem]) -> String {
    let mut out = String::new();
    let mut open: Vec<ListKind> = Vec::new();
    for item in items {
        let target = item.depth + 1;
        while open.len() > target {
            close(&mut out, &mut open);
        }
        if open.len() == target && open.last() != Some(&item.kind) {
            close(&mut out, &mut open);
        }
        while open.len() < target {
            out.push_str(&format!("\\begin{{{}}}\n", item.kind.environment()));
            open.push(item.kind);
        }
        out.push_str(&format!("\\item {}\n", item.text));
    }
    while !open.is_empty() {
        close(&mut out, &mut open);
    }
    out
}

fn close(out: &mut String, open: &mut Vec<ListKind>) {
    if let Some(kind) = open.pop() {
        out.push_str(&format!("\\end{{{}}}\n", kind.environment()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flat_bullets() {
        assert_eq!(
            lists("- one\n+ two\n* three\n", 4),
            "\\begin{itemize}\n\\item one\n\\item two\n\\item three\n\\end{itemize}\n"
        );
    }

    #[test]
    fn test_nested_depth_transitions() {
        let out = lists("* top\n    * child\n* back\n", 4);
        assert_eq!(
            out,
            "\\begin{itemize}\n\\item top\n\\begin{itemize}\n\\item child\n\\end{itemize}\n\\item back\n\\end{itemize}\n"
        );
        assert_eq!(out.matches("\\begin{itemize}").count(), 2);
        assert_eq!(out.matches("\\end{itemize}").count(), 2);
    }

    #[test]
    fn test_tab_counts_as_one_level() {
        let items = parse_items("1. a\n\t2. b\n", ListKind::Numbered, 4);
        assert_eq!(items[1].depth, 1);
        assert_eq!(items[1].text, "b");
    }

    #[test]
    fn test_deep_jump_stays_balanced() {
        let items = vec![
            ListItem { depth: 0, kind: ListKind::Bullet, text: "a".into() },
            ListItem { depth: 2, kind: ListKind::Bullet, text: "b".into() },
        ];
        let out = render_list(&items);
        assert_eq!(out.matches("\\begin{itemize}").count(), 3);
        assert_eq!(out.matches("\\end{itemize}").count(), 3);
    }

    #[test]
    fn test_unmarked_line_is_its_own_item() {
        let items = parse_items("* first\n    plain\n* second\n", ListKind::Bullet, 4);
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].depth, 1);
        assert_eq!(items[1].kind, ListKind::Bullet);
        assert_eq!(items[1].text, "plain");
    }

    #[test]
    fn test_mixed_kind_nesting() {
        assert_eq!(
            lists("1. one\n    * nested bullet\n2. two", 4),
            "\\begin{enumerate}\n\\item one\n\\begin{itemize}\n\\item nested bullet\n\\end{itemize}\n\\item two\n\\end{enumerate}\n"
        );
        assert_eq!(
            lists("* a\n    1. sub\n    2. sub\n* b\n", 4),
            "\\begin{itemize}\n\\item a\n\\begin{enumerate}\n\\item sub\n\\item sub\n\\end{enumerate}\n\\item b\n\\end{itemize}\n"
        );
    }

    #[test]
    fn test_kind_change_at_same_depth() {
        let out = lists("1. a\n    * b\n    2. c\n", 4);
        assert_eq!(
            out,
            "\\begin{enumerate}\n\\item a\n\\begin{itemize}\n\\item b\n\\end{itemize}\n\\begin{enumerate}\n\\item c\n\\end{enumerate}\n\\end{enumerate}\n"
        );
    }

    #[test]
    fn test_narrow_tab_width() {
        assert_eq!(
            lists("* top\n  * child\n* back\n", 2),
            "\\begin{itemize}\n\\item top\n\\begin{itemize}\n\\item child\n\\end{itemize}\n\\item back\n\\end{itemize}\n"
        );
        let items = parse_items("1. a\n\t2. b\n", ListKind::Numbered, 2);
        assert_eq!(items[1].depth, 1);
    }

    #[test]
    fn test_numbered_list() {
        assert_eq!(
            lists("1. alpha\n2. beta\n\nafter", 4),
            "\\begin{enumerate}\n\\item alpha\n\\item beta\n\\end{enumerate}\n\nafter"
        );
    }

    #[test]
    fn test_list_inside_listing_untouched() {
        let text = "\\begin{lstlisting}\n- not a list\n\\end{lstlisting}";
        assert_eq!(lists(text, 4), text);
    }
}
