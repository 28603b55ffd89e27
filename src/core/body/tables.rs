//! Pipe tables → `tabulary`

use regex::Captures;

use super::blocks::replace_unprotected;
use super::BodyState;
use crate::core::patterns::{PRETTY_TABLE_RE, UGLY_TABLE_RE};

/// Column alignment letter understood by `tabulary`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAlign {
    Left,
    Center,
    Right,
}

impl ColumnAlign {
    /// Decide from one alignment cell such as `:---`, `:---:` or `---:`
    pub fn from_cell(cell: &str) -> Self {
        let cell = cell.trim();
        let colons: Vec<usize> = cell.match_indices(':').map(|(i, _)| i).collect();
        match colons.as_slice() {
            [at] if 2 * at > cell.len() => ColumnAlign::Right,
            [_, _] => ColumnAlign::Center,
            _ => ColumnAlign::Left,
        }
    }

    fn letter(self) -> char {
        match self {
            ColumnAlign::Left => 'L',
            ColumnAlign::Center => 'C',
            ColumnAlign::Right => 'R',
        }
    }
}

/// The parts shared by both table syntaxes
#[derive(Debug, Clone, Default)]
struct TableMatch<'t> {
    label: Option<&'t str>,
    header: &'t str,
    alignment: &'t str,
    rows: &'t str,
    caption: Option<&'t str>,
}

impl<'t> TableMatch<'t> {
    fn pretty(caps: &Captures<'t>) -> Self {
        TableMatch {
            label: caps.get(1).map(|m| m.as_str()),
            header: caps.get(2).map_or("", |m| m.as_str()),
            alignment: caps.get(3).map_or("", |m| m.as_str()),
            rows: caps.get(4).map_or("", |m| m.as_str()),
            caption: caps
                .get(5)
                .map(|m| m.as_str())
                .filter(|c| !c.trim().is_empty()),
        }
    }

    fn ugly(caps: &Captures<'t>) -> Self {
        TableMatch {
            header: caps.get(1).map_or("", |m| m.as_str()),
            alignment: caps.get(2).map_or("", |m| m.as_str()),
            rows: caps.get(3).map_or("", |m| m.as_str()),
            ..TableMatch::default()
        }
    }
}

/// Split a table line on `|`, ignoring an outer pipe at either end
fn cells(line: &str) -> Vec<&str> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(str::trim).collect()
}

pub fn alignments(row: &str) -> Vec<ColumnAlign> {
    cells(row).into_iter().map(ColumnAlign::from_cell).collect()
}

fn render_table(table: &TableMatch<'_>, number: usize, in_minipage: bool) -> String {
    let spec: Vec<String> = alignments(table.alignment)
        .into_iter()
        .map(|a| a.letter().to_string())
        .collect();
    let label = match table.label {
        Some(label) => label.to_string(),
        None => format!("table{}", number),
    };
    let caption = table.caption.map(|c| {
        c.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    });

    let mut out = String::new();
    if !in_minipage {
        out.push_str("\\begin{table}[hbpt]\n\\noindent\\makebox[\\textwidth]{\n");
    }
    out.push_str("\\centering\n\\setlength{\\tabcolsep}{10pt}\n\\renewcommand{\\arraystretch}{1.5}\n");
    let width = if in_minipage { "\\textwidth" } else { "\\paperwidth" };
    out.push_str(&format!(
        "\\begin{{tabulary}}{{{}}}{{ |{}| }}\n\\hline\n",
        width,
        spec.join("|")
    ));

    out.push_str(&cells(table.header).join(" & "));
    out.push_str(" \\\\ \\hline \\hline\n");
    for row in table.rows.lines().filter(|l| !l.trim().is_empty()) {
        out.push_str(&cells(row).join(" & "));
        out.push_str(" \\\\ \\hline\n");
    }
    out.push_str("\\end{tabulary}");

    if in_minipage {
        if let Some(caption) = caption {
            out.push_str(&format!("\n\\captionof{{table}}{{{}}}", caption));
            out.push_str(&format!("\n\\label{{{}}}", label));
        }
        out.push('\n');
    } else {
        out.push_str("\n}");
        if let Some(caption) = caption {
            out.push_str(&format!("\n\\caption{{{}}}", caption));
        }
        out.push_str(&format!("\n\\label{{{}}}\n\\end{{table}}\n", label));
    }
    out
}

/// Pretty tables first, then the bare-pipe form; both share the counter
pub fn tables(text: &str, state: &mut BodyState<'_>) -> String {
    let text = convert(text, state, true);
    convert(&text, state, false)
}

fn convert(text: &str, state: &mut BodyState<'_>, pretty: bool) -> String {
    let re = if pretty { &*PRETTY_TABLE_RE } else { &*UGLY_TABLE_RE };
    replace_unprotected(
        text,
        re,
        |r, at| r.in_listing(at),
        |caps, regions| {
            let end = caps.get(0).map_or(0, |m| m.end());
            let number = state.next_table_number();
            log::trace!("table {} ({})", number, if pretty { "pretty" } else { "bare" });
            let table = if pretty {
                TableMatch::pretty(caps)
            } else {
                TableMatch::ugly(caps)
            };
            render_table(&table, number, regions.in_minipage(end))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theorems::TheoremTable;
    use crate::utils::TexDownOptions;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> String {
        let table = TheoremTable::default();
        let options = TexDownOptions::default();
        let mut state = BodyState::new(&table, &options);
        tables(text, &mut state)
    }

    #[test]
    fn test_alignment_rule() {
        assert_eq!(
            alignments("|:---|:---:|---:|"),
            vec![ColumnAlign::Left, ColumnAlign::Center, ColumnAlign::Right]
        );
        assert_eq!(alignments("--- | ---"), vec![ColumnAlign::Left; 2]);
        // exactly half way is not past half
        assert_eq!(ColumnAlign::from_cell("--:-"), ColumnAlign::Left);
    }

    #[test]
    fn test_pretty_table() {
        let out = run("| A | B | C |\n|:---|:---:|---:|\n| 1 | 2 | 3 |\n");
        assert_eq!(
            out,
            "\\begin{table}[hbpt]\n\\noindent\\makebox[\\textwidth]{\n\\centering\n\\setlength{\\tabcolsep}{10pt}\n\\renewcommand{\\arraystretch}{1.5}\n\\begin{tabulary}{\\paperwidth}{ |L|C|R| }\n\\hline\nA & B & C \\\\ \\hline \\hline\n1 & 2 & 3 \\\\ \\hline\n\\end{tabulary}\n}\n\\label{table1}\n\\end{table}\n"
        );
    }

    #[test]
    fn test_label_and_caption() {
        let out = run("    tbl:results\n| A | B |\n|---|---|\n| 1 | 2 |\n    Results here\n");
        assert!(out.contains("\n}\n\\caption{Results here}\n\\label{tbl:results}\n\\end{table}\n"));
    }

    #[test]
    fn test_ugly_table_and_counter() {
        let out = run("| A |\n|---|\n| 1 |\n\ntext\n\nX | Y\n--- | ---\n1 | 2\n");
        assert!(out.contains("\\label{table1}"));
        assert!(out.contains("\\label{table2}"));
        assert!(out.contains("X & Y \\\\ \\hline \\hline\n1 & 2 \\\\ \\hline\n"));
    }

    #[test]
    fn test_table_in_minipage() {
        let text = "\\begin{minipage}{0.5\\textwidth}\n| A |\n|---|\n| 1 |\n    Caption\n\\end{minipage}";
        let out = run(text);
        assert!(out.contains("\\begin{tabulary}{\\textwidth}"));
        assert!(out.contains("\\captionof{table}{Caption}"));
        assert!(!out.contains("\\begin{table}"));
    }

    #[test]
    fn test_table_inside_listing_untouched() {
        let text = "\\begin{lstlisting}\n| A |\n|---|\n| 1 |\n\\end{lstlisting}";
        assert_eq!(run(text), text);
    }
}
