//! Pattern library for TexDown constructs
//!
//! Line-oriented constructs are plain `regex` patterns compiled once.
//! Constructs whose closing delimiter must repeat the opening one (code
//! fences, emphasis spans, strikeout runs) or which depend on the characters
//! around a delimiter (inline code, escaped markers) cannot be expressed
//! without back-references or look-around, so they get small scanners here
//! instead.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ---------------------------------------------------------------------
    // Directives
    // ---------------------------------------------------------------------

    /// `[header]` followed by indented preamble lines
    pub static ref HEADER_BLOCK_RE: Regex =
        Regex::new(r"(?im)\[header\]\n((?:(?:\t| {4}).*(?:\n|$))+)").unwrap();

    /// `[title: ..]`, `[author: ..]`, `[date: ..]`
    pub static ref METADATA_RE: Regex =
        Regex::new(r"(?im)^\[(author|date|title): *(.+?)\](?:\n|$)").unwrap();

    /// `[macro: name, body]` / `[define: name, body]`
    pub static ref MACRO_RE: Regex =
        Regex::new(r"(?im)^\[(?:macro|define): *\\?(\w+?), *(.+?)\](?:\n|$)").unwrap();

    /// `[include: pkg, opt, opt]`
    pub static ref INCLUDE_RE: Regex =
        Regex::new(r"(?im)^\[include: *(\w+)((?:, *[\w=.\-]+)*?)\](?:\n|$)").unwrap();

    /// `[uninclude: pkg]` / `[remove: pkg]`
    pub static ref UNINCLUDE_RE: Regex =
        Regex::new(r"(?im)^\[(?:remove|uninclude): *(\w+)\](?:\n|$)").unwrap();

    /// `[figpath: dir/]`
    pub static ref FIGPATH_RE: Regex =
        Regex::new(r"(?im)^\[figpath: *([\w/.]+)\](?:\n|$)").unwrap();

    /// `[braces]` followed by indented equations
    pub static ref BRACES_RE: Regex =
        Regex::new(r"(?im)\[braces\]\n((?:(?:\t| {4}).*(?:\n|$))+)").unwrap();

    // ---------------------------------------------------------------------
    // Blocks
    // ---------------------------------------------------------------------

    /// `[theorem]`, `[lemma: Name]`, ... followed by an indented body
    pub static ref THEOREM_RE: Regex = Regex::new(
        r"(?i)\[(theorem|corollary|lemma|definition)(?::(.+?))?\]\n((?:\n*(?:\t| {4,}).+)+)"
    )
    .unwrap();

    /// `$$$ .. $$$` and the unnumbered `$$$* .. $$$`
    pub static ref MATH_BLOCK_RE: Regex =
        Regex::new(r"(?s)\$\$\$(\*)?(.*?)\$\$\$\*?\n?").unwrap();

    pub static ref SECTION_RE: Regex = Regex::new(r"(?m)^(#+)(\*)? *(.+)").unwrap();

    pub static ref BULLET_LIST_RE: Regex =
        Regex::new(&bullet_list_pattern(DEFAULT_TAB_WIDTH)).unwrap();

    pub static ref NUMBERED_LIST_RE: Regex =
        Regex::new(&numbered_list_pattern(DEFAULT_TAB_WIDTH)).unwrap();

    pub static ref HRULE_RE: Regex =
        Regex::new(r"(?m)^(?:-{3,}|\+{3,}|\*{3,})[ \t]*$").unwrap();

    /// Optional indented label, piped header, alignment row, piped rows,
    /// optional indented caption
    pub static ref PRETTY_TABLE_RE: Regex = Regex::new(
        r"(?m)^(?:(?:\t| {4,})+([a-zA-Z0-9_\-:]+)\n)?\|\s*(.+)\n\s*\|(\s*[-:]+[-|\s:]*)\n((?:\s*\|.*(?:\n|$|\|))*)((?:(?:\t| {4}).+(?:\n|$))+)?"
    )
    .unwrap();

    /// Header, alignment row and rows without the leading pipes
    pub static ref UGLY_TABLE_RE: Regex = Regex::new(
        r"(?m)^ *(\S.*\|.*)\n *([-:]+ *\|[-| :]*)\n((?:.*\|.*(?:\n|$))*)"
    )
    .unwrap();

    pub static ref BLOCKQUOTE_RE: Regex =
        Regex::new(r"(?m)(?:^ *> *[^\n]+(?:\n|$))+").unwrap();

    pub static ref BLOCKQUOTE_LINE_RE: Regex = Regex::new(r"(?m)^ *> *(.+)").unwrap();

    /// `![caption](path)`; the caption may continue on indented lines
    pub static ref IMAGE_RE: Regex = Regex::new(
        r"(?m)^[ \t]*!\[((?:.|\n(?:\t| {4,}))+)?\]\((.+)\)[ \t]*\n?$"
    )
    .unwrap();

    pub static ref CENTER_EQ_RE: Regex = Regex::new(r"(?m)^(?:\t| {4,})+(\$.+\$)$").unwrap();

    pub static ref DOUBLE_BLANK_RE: Regex = Regex::new(r"(?m)^\n\n").unwrap();

    pub static ref INLINE_LISTING_RE: Regex =
        Regex::new(r"\\lstinline\[columns=fixed\]\$[^$\n]*\$").unwrap();
}

pub const MINIPAGE_BEGIN: &str = "\\begin{minipage}";

/// Indentation unit the precompiled list patterns are built for
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// A run of bullet items; lines indented by a tab or `tab_width` spaces
/// belong to the run
pub fn bullet_list_pattern(tab_width: usize) -> String {
    format!(
        r"(?m)^(?:[*\-+.] +.+(?:\n|$)(?:(?:\t| {{{}}}).+\n*)*)+",
        tab_width
    )
}

/// Same as [`bullet_list_pattern`] for `N.` items
pub fn numbered_list_pattern(tab_width: usize) -> String {
    format!(
        r"(?m)^(?:\d+\. *.+(?:\n|$)(?:(?:\t| {{{}}}).+\n*)*)+",
        tab_width
    )
}

// =============================================================================
// Code fences
// =============================================================================

/// A fenced code block: ```` ```lang ```` / `~~~lang`, closed by the same
/// delimiter, with an optional caption trailing the closing fence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFence<'a> {
    pub range: Range<usize>,
    pub language: Option<&'a str>,
    pub code: &'a str,
    pub caption: Option<&'a str>,
}

const FENCES: [&str; 2] = ["```", "~~~"];

pub fn find_code_fences(text: &str) -> Vec<CodeFence<'_>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let Some(fence) = FENCES.iter().find(|f| text[pos..].starts_with(**f)) else {
            pos += char_len_at(text, pos);
            continue;
        };
        match code_fence_at(text, pos, fence) {
            Some(block) => {
                pos = block.range.end.max(pos + 1);
                out.push(block);
            }
            None => pos += 1,
        }
    }
    out
}

fn code_fence_at<'a>(text: &'a str, start: usize, fence: &str) -> Option<CodeFence<'a>> {
    let after_open = start + fence.len();
    let lang_len = text[after_open..]
        .find(|c: char| !is_word_char(c))
        .unwrap_or(text.len() - after_open);
    let lang_end = after_open + lang_len;
    if !text[lang_end..].starts_with('\n') {
        return None;
    }
    let code_start = lang_end + 1;
    let closing = format!("\n{}", fence);
    let close_at = code_start + text[code_start..].find(&closing)?;
    let after_close = close_at + closing.len();
    let line_end = text[after_close..]
        .find('\n')
        .map_or(text.len(), |i| after_close + i);

    Some(CodeFence {
        range: start..line_end,
        language: non_empty(&text[after_open..lang_end]),
        code: &text[code_start..close_at],
        caption: non_empty(&text[after_close..line_end]),
    })
}

// =============================================================================
// Inline code
// =============================================================================

/// Single-backtick spans on one line. Runs of two or more backticks neither
/// open nor close a span.
pub fn find_inline_code(text: &str) -> Vec<Span<'_>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += char_len_at(text, i);
            continue;
        }
        let run = run_len(bytes, i, b'`');
        if run != 1 {
            i += run;
            continue;
        }
        let mut j = i + 1;
        let mut found = None;
        while j < bytes.len() && bytes[j] != b'\n' {
            if bytes[j] == b'`' {
                let closing = run_len(bytes, j, b'`');
                if closing == 1 {
                    found = Some(j);
                    break;
                }
                j += closing;
            } else {
                j += char_len_at(text, j);
            }
        }
        match found {
            Some(close) => {
                out.push(Span {
                    range: i..close + 1,
                    content: &text[i + 1..close],
                });
                i = close + 1;
            }
            None => i += 1,
        }
    }
    out
}

// =============================================================================
// Delimited emphasis spans
// =============================================================================

/// A matched inline span and the text between its delimiters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    pub range: Range<usize>,
    pub content: &'a str,
}

/// Find spans opened by any of `delimiters` and closed by the same one.
///
/// Neither delimiter may be escaped with a backslash. Content is at least one
/// character, stays on one line unless the line break is escaped (`\` at the
/// end of the line), never contains the delimiter, and has surrounding spaces
/// trimmed. With `exclusive_close`, a closing delimiter immediately followed
/// by another copy of itself does not close the span.
pub fn find_delimited<'a>(text: &'a str, delimiters: &[&str], exclusive_close: bool) -> Vec<Span<'a>> {
    let mut out = Vec::new();
    let mut i = 0;
    'scan: while i < text.len() {
        if !is_escaped(text, i) {
            for delim in delimiters {
                if !text[i..].starts_with(delim) {
                    continue;
                }
                if let Some(span) = delimited_at(text, i, delim, exclusive_close) {
                    i = span.range.end;
                    out.push(span);
                    continue 'scan;
                }
            }
        }
        i += char_len_at(text, i);
    }
    out
}

fn delimited_at<'a>(text: &'a str, start: usize, delim: &str, exclusive_close: bool) -> Option<Span<'a>> {
    let content_start = skip_spaces(text, start + delim.len());
    let mut pos = content_start;
    loop {
        let rest = &text[pos..];
        if rest.starts_with(delim) {
            return None;
        }
        if rest.starts_with("\\\n") {
            pos += 2;
        } else {
            match rest.chars().next() {
                None | Some('\n') => return None,
                Some(c) => pos += c.len_utf8(),
            }
        }

        let close = skip_spaces(text, pos);
        if text[close..].starts_with(delim)
            && !is_escaped(text, close)
            && !(exclusive_close && text[close + delim.len()..].starts_with(delim))
        {
            return Some(Span {
                range: start..close + delim.len(),
                content: &text[content_start..pos],
            });
        }
    }
}

// =============================================================================
// Strikeout runs
// =============================================================================

/// `~~text~~`: a run of two or more tildes, closed on the same line by a run
/// of exactly the same length.
pub fn find_strikeouts(text: &str) -> Vec<Span<'_>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'~' {
            i += char_len_at(text, i);
            continue;
        }
        let run = run_len(bytes, i, b'~');
        if run < 2 {
            i += run;
            continue;
        }
        let content_start = i + run;
        let mut j = content_start;
        let mut found = None;
        while j < bytes.len() && bytes[j] != b'\n' {
            if bytes[j] == b'~' {
                let closing = run_len(bytes, j, b'~');
                if closing == run && j > content_start {
                    found = Some(j);
                    break;
                }
                j += closing;
            } else {
                j += char_len_at(text, j);
            }
        }
        match found {
            Some(close) => {
                out.push(Span {
                    range: i..close + run,
                    content: &text[content_start..close],
                });
                i = close + run;
            }
            None => i += run,
        }
    }
    out
}

fn run_len(bytes: &[u8], start: usize, byte: u8) -> usize {
    bytes[start..].iter().take_while(|b| **b == byte).count()
}

// =============================================================================
// Helpers
// =============================================================================

/// Replace each range with its rendered text. Ranges must be sorted and
/// non-overlapping.
pub fn splice(text: &str, replacements: Vec<(Range<usize>, String)>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (range, replacement) in replacements {
        out.push_str(&text[last..range.start]);
        out.push_str(&replacement);
        last = range.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Highest `#N` placeholder not escaped by a backslash, 0 when none is used
pub fn highest_placeholder(body: &str) -> u32 {
    let bytes = body.as_bytes();
    (0..bytes.len())
        .filter(|&i| bytes[i] == b'#' && !is_escaped(body, i))
        .filter_map(|i| body[i + 1..].chars().next().and_then(|c| c.to_digit(10)))
        .max()
        .unwrap_or(0)
}

/// Strip one level of indentation (a tab or up to four spaces)
pub fn dedent_line(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix('\t') {
        return rest;
    }
    let spaces = line.bytes().take(4).take_while(|b| *b == b' ').count();
    &line[spaces..]
}

fn is_escaped(text: &str, pos: usize) -> bool {
    pos > 0 && text.as_bytes()[pos - 1] == b'\\'
}

fn skip_spaces(text: &str, mut pos: usize) -> usize {
    while text[pos..].starts_with(' ') {
        pos += 1;
    }
    pos
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn char_len_at(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(1, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_fence_with_language_and_caption() {
        let text = "before\n```rust\nfn main() {}\n```Entry point\nafter";
        let fences = find_code_fences(text);
        assert_eq!(fences.len(), 1);
        let fence = &fences[0];
        assert_eq!(fence.language, Some("rust"));
        assert_eq!(fence.code, "fn main() {}");
        assert_eq!(fence.caption, Some("Entry point"));
        assert_eq!(&text[fence.range.clone()], "```rust\nfn main() {}\n```Entry point");
    }

    #[test]
    fn test_code_fence_needs_matching_delimiter() {
        assert!(find_code_fences("```\ncode\n~~~\n").is_empty());
        let fences = find_code_fences("~~~\na\n\nb\n~~~");
        assert_eq!(fences.len(), 1);
        assert_eq!(fences[0].code, "a\n\nb");
        assert_eq!(fences[0].language, None);
    }

    #[test]
    fn test_inline_code_skips_double_backticks() {
        let spans = find_inline_code("use `x` here, not ``y``");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "x");
        assert!(find_inline_code("`open\nclosed`").is_empty());
    }

    #[test]
    fn test_bold_span() {
        let spans = find_delimited("a **b c** d", &["**"], false);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "b c");
        assert_eq!(spans[0].range, 2..9);
    }

    #[test]
    fn test_emphasis_trims_inner_spaces() {
        let spans = find_delimited("* spaced *", &["*", "//"], true);
        assert_eq!(spans[0].content, "spaced");
        let spans = find_delimited("//slanted//", &["*", "//"], true);
        assert_eq!(spans[0].content, "slanted");
    }

    #[test]
    fn test_escaped_delimiters_do_not_match() {
        assert!(find_delimited(r"\*not*", &["*"], true).is_empty());
        assert!(find_delimited(r"*not\*", &["*"], true).is_empty());
    }

    #[test]
    fn test_span_crosses_escaped_line_break_only() {
        let spans = find_delimited("__a\\\nb__", &["__"], false);
        assert_eq!(spans[0].content, "a\\\nb");
        assert!(find_delimited("__a\nb__", &["__"], false).is_empty());
    }

    #[test]
    fn test_list_marker_is_not_emphasis() {
        assert!(find_delimited("* item one\n* item two", &["*", "//"], true).is_empty());
    }

    #[test]
    fn test_strikeout_runs_must_match_length() {
        let spans = find_strikeouts("~~a~~ and ~~~b~~~");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "a");
        assert_eq!(spans[1].content, "b");
        assert!(find_strikeouts("~~a~~~").is_empty());
        assert!(find_strikeouts("~single~").is_empty());
    }

    #[test]
    fn test_highest_placeholder() {
        assert_eq!(highest_placeholder(r"\frac{#1}{#2}"), 2);
        assert_eq!(highest_placeholder(r"\mathbb{R}"), 0);
        assert_eq!(highest_placeholder(r"\#3 and #1"), 1);
    }

    #[test]
    fn test_dedent_line() {
        assert_eq!(dedent_line("\t\\usepackage{x}"), "\\usepackage{x}");
        assert_eq!(dedent_line("      deep"), "  deep");
        assert_eq!(dedent_line("  shallow"), "shallow");
    }

    #[test]
    fn test_list_patterns_follow_tab_width() {
        assert_eq!(bullet_list_pattern(4), BULLET_LIST_RE.as_str());
        let narrow = Regex::new(&bullet_list_pattern(2)).unwrap();
        let run = narrow.find("* a\n  * b\n* c\n").unwrap();
        assert_eq!(run.as_str(), "* a\n  * b\n* c\n");
        assert_eq!(
            Regex::new(&numbered_list_pattern(2)).unwrap().find("1. a\n  2. b\n").unwrap().as_str(),
            "1. a\n  2. b\n"
        );
    }

    #[test]
    fn test_splice() {
        let out = splice("abcdef", vec![(1..2, "B".into()), (4..6, "EF!".into())]);
        assert_eq!(out, "aBcdEF!");
    }
}
