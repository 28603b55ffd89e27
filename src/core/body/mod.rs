//! Body transpiler
//!
//! The working copy of the source (comments relocated, header directives
//! removed) runs through an ordered list of rewrite rules. Order matters:
//! code is turned into listings first so every later rule can recognise and
//! skip it, and math groups exist before inline formatting runs.

pub mod blocks;
pub mod inline;
pub mod lists;
pub mod regions;
pub mod tables;

use crate::core::comments::strip_comments;
use crate::core::directives::{has_metadata, strip_directives};
use crate::core::theorems::TheoremTable;
use crate::utils::TexDownOptions;

/// Counters for one body conversion
#[derive(Debug)]
pub struct BodyState<'a> {
    pub theorems: &'a TheoremTable,
    pub options: &'a TexDownOptions,
    theorems_seen: usize,
    table_number: usize,
}

impl<'a> BodyState<'a> {
    pub fn new(theorems: &'a TheoremTable, options: &'a TexDownOptions) -> Self {
        BodyState {
            theorems,
            options,
            theorems_seen: 0,
            table_number: options.first_table_number,
        }
    }

    /// Ordinal declared for the theorem tag starting at `offset`
    pub fn theorem_at(&mut self, offset: usize) -> Option<usize> {
        let n = self.theorems.ordinal_at(offset);
        match n {
            Some(_) => self.theorems_seen += 1,
            None => log::warn!("theorem block at byte {} has no header declaration", offset),
        }
        n
    }

    pub fn next_table_number(&mut self) -> usize {
        let n = self.table_number;
        self.table_number += 1;
        n
    }

    /// Theorem blocks converted so far
    pub fn theorems_seen(&self) -> usize {
        self.theorems_seen
    }
}

/// Run one named stage and log its effect
fn stage<F>(name: &str, text: String, rule: F) -> String
where
    F: FnOnce(&str) -> String,
{
    let out = rule(&text);
    if out != text {
        log::debug!("body stage {}: {} -> {} bytes", name, text.len(), out.len());
    }
    out
}

/// The working text as the theorem rule receives it: directives removed,
/// code and math already emitted. `TheoremTable::scan` reads the same text.
pub fn theorem_stage_text(source: &str) -> String {
    let text = strip_directives(&strip_comments(source)).trim().to_string();
    let text = stage("code", text, blocks::code_fences);
    let text = stage("inline code", text, inline::inline_code);
    stage("math", text, blocks::math_blocks)
}

/// Render the document body for `source` against a shared theorem table.
pub fn render_body(source: &str, theorems: &TheoremTable, options: &TexDownOptions) -> String {
    let mut state = BodyState::new(theorems, options);

    let text = theorem_stage_text(source);
    let text = stage("theorems", text, |t| blocks::theorems(t, &mut state));
    let text = stage("formatting", text, inline::formatting);
    let text = stage("braces", text, blocks::braces);
    let text = stage("headings", text, blocks::headings);
    let text = stage("lists", text, |t| lists::lists(t, options.tab_width));
    let text = stage("rules", text, blocks::horizontal_rules);
    let text = stage("tables", text, |t| tables::tables(t, &mut state));
    let text = stage("quotes", text, blocks::blockquotes);
    let text = stage("images", text, blocks::images);
    let text = stage("centered", text, blocks::centered_equations);
    let text = stage("blank lines", text, |t| {
        blocks::blank_lines(t, &options.blank_line_space)
    });

    if state.theorems_seen() != theorems.len() {
        log::warn!(
            "body converted {} theorem blocks, header declared {}",
            state.theorems_seen(),
            theorems.len()
        );
    }

    let mut out = String::from("% Start of body.\n\n\\begin{document}\n\n");
    if has_metadata(&strip_comments(source)) {
        out.push_str("\\maketitle\n");
    }
    out.push_str(&text);
    out.push_str("\n\\end{document}\n% End of body.");
    out.trim().to_string()
}
