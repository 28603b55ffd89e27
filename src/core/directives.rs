//! Header-only directives
//!
//! Directives are bracketed tags on their own line (`[title: ..]`,
//! `[include: ..]`, `[header]` blocks, ...). The header synthesizer reads
//! them; the body transpiler deletes them.

use crate::core::patterns::{
    dedent_line, highest_placeholder, FIGPATH_RE, HEADER_BLOCK_RE, INCLUDE_RE, MACRO_RE,
    METADATA_RE, UNINCLUDE_RE,
};
use crate::utils::PackageSpec;

/// Title page metadata; keys never given stay empty
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub date: String,
}

/// `[macro: name, body]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDef {
    pub name: String,
    pub body: String,
}

impl MacroDef {
    /// Number of arguments: the highest `#N` used in the body
    pub fn arity(&self) -> u32 {
        highest_placeholder(&self.body)
    }

    pub fn to_latex(&self) -> String {
        format!("\\newcommand{{\\{}}}[{}]{{{}}}", self.name, self.arity(), self.body)
    }
}

/// Everything the header needs from the directives of one source
#[derive(Debug, Default, Clone)]
pub struct Directives {
    /// `None` when no metadata directive appears at all
    pub metadata: Option<Metadata>,
    pub macros: Vec<MacroDef>,
    pub includes: Vec<PackageSpec>,
    pub removals: Vec<String>,
    /// First `[figpath: ..]`
    pub figure_path: Option<String>,
    /// Dedented contents of each `[header]` block
    pub header_blocks: Vec<String>,
}

impl Directives {
    pub fn scan(source: &str) -> Self {
        Directives {
            metadata: scan_metadata(source),
            macros: MACRO_RE
                .captures_iter(source)
                .map(|caps| MacroDef {
                    name: caps[1].to_string(),
                    body: caps[2].to_string(),
                })
                .collect(),
            includes: INCLUDE_RE
                .captures_iter(source)
                .map(|caps| PackageSpec {
                    name: caps[1].to_string(),
                    options: caps[2]
                        .split(',')
                        .map(str::trim)
                        .filter(|opt| !opt.is_empty())
                        .map(str::to_string)
                        .collect(),
                })
                .collect(),
            removals: UNINCLUDE_RE
                .captures_iter(source)
                .map(|caps| caps[1].to_string())
                .collect(),
            figure_path: FIGPATH_RE
                .captures(source)
                .map(|caps| caps[1].to_string()),
            header_blocks: HEADER_BLOCK_RE
                .captures_iter(source)
                .map(|caps| dedent_block(&caps[1]))
                .collect(),
        }
    }
}

/// Whether the source carries any `[title|author|date: ..]` directive
pub fn has_metadata(source: &str) -> bool {
    METADATA_RE.is_match(source)
}

fn scan_metadata(source: &str) -> Option<Metadata> {
    let mut found = None;
    for caps in METADATA_RE.captures_iter(source) {
        let meta = found.get_or_insert_with(Metadata::default);
        let value = caps[2].to_string();
        match caps[1].to_ascii_lowercase().as_str() {
            "title" => meta.title = value,
            "author" => meta.author = value,
            "date" => meta.date = value,
            _ => {}
        }
    }
    found
}

fn dedent_block(block: &str) -> String {
    block
        .lines()
        .map(|line| dedent_line(line).trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Remove every directive the header consumes. `[braces]` blocks stay: they
/// carry body content.
pub fn strip_directives(source: &str) -> String {
    let mut text = METADATA_RE.replace_all(source, "").into_owned();
    for re in [&*MACRO_RE, &*UNINCLUDE_RE, &*INCLUDE_RE, &*HEADER_BLOCK_RE, &*FIGPATH_RE] {
        text = re.replace_all(&text, "").into_owned();
    }
    text
}
