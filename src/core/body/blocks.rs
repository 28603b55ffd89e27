//! Block-level rules
//!
//! Every rule except `code_fences` builds a `RegionIndex` over its input and
//! hands a match back untouched when it ends inside a region the rule must
//! not enter.

use regex::{Captures, Regex};

use super::regions::RegionIndex;
use super::BodyState;
use crate::core::patterns::{
    find_code_fences, splice, BLOCKQUOTE_LINE_RE, BLOCKQUOTE_RE, BRACES_RE, CENTER_EQ_RE,
    DOUBLE_BLANK_RE, HRULE_RE, IMAGE_RE, MATH_BLOCK_RE, SECTION_RE, THEOREM_RE,
};

/// Replace matches of `re` outside `protected` regions with `render(caps)`.
pub(super) fn replace_unprotected<P, R>(text: &str, re: &Regex, protected: P, mut render: R) -> String
where
    P: Fn(&RegionIndex, usize) -> bool,
    R: FnMut(&Captures, &RegionIndex) -> String,
{
    let regions = RegionIndex::new(text);
    re.replace_all(text, |caps: &Captures| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let end = caps.get(0).map_or(0, |m| m.end());
        if protected(&regions, end) {
            whole.to_string()
        } else {
            render(caps, &regions)
        }
    })
    .into_owned()
}

// =============================================================================
// Code and math
// =============================================================================

/// Fenced code → `lstlisting`
pub fn code_fences(text: &str) -> String {
    let replacements = find_code_fences(text)
        .into_iter()
        .map(|fence| {
            let options: Vec<String> = [
                fence.language.map(|l| format!("language={}", l)),
                fence.caption.map(|c| format!("caption={}", c)),
            ]
            .into_iter()
            .flatten()
            .collect();
            let options = if options.is_empty() {
                String::new()
            } else {
                format!("[{}]", options.join(","))
            };
            let latex = format!(
                "\\begin{{lstlisting}}{}\n{}\n\\end{{lstlisting}}",
                options, fence.code
            );
            (fence.range, latex)
        })
        .collect();
    splice(text, replacements)
}

/// `$$$ .. $$$` → `gather`, `$$$* .. $$$` → `gather*`
pub fn math_blocks(text: &str) -> String {
    replace_unprotected(
        text,
        &MATH_BLOCK_RE,
        |r, at| r.in_code(at),
        |caps, _| {
            let star = if caps.get(1).is_some() { "*" } else { "" };
            let rows: Vec<String> = caps[2]
                .split("\n\n")
                .map(|paragraph| paragraph.split('\n').collect::<Vec<_>>().join(" "))
                .collect();
            format!(
                "\\begin{{gather{star}}}\n{}\n\\end{{gather{star}}}\n",
                rows.join("\\\\\n").trim(),
                star = star
            )
        },
    )
}

/// Theorem tags inside listings or math groups are not blocks
pub fn theorem_protected(regions: &RegionIndex, at: usize) -> bool {
    regions.in_listing(at) || regions.in_math(at)
}

/// `[theorem]` blocks → `\begin{theoremN} .. \end{theoremN}`
pub fn theorems(text: &str, state: &mut BodyState<'_>) -> String {
    replace_unprotected(text, &THEOREM_RE, theorem_protected, |caps, _| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let start = caps.get(0).map_or(0, |m| m.start());
        match state.theorem_at(start) {
            Some(n) => format!("\\begin{{theorem{n}}}\n{}\n\\end{{theorem{n}}}", &caps[3], n = n),
            None => whole.to_string(),
        }
    })
}

/// `[braces]` blocks → left-brace `empheq` alignment
pub fn braces(text: &str) -> String {
    replace_unprotected(
        text,
        &BRACES_RE,
        |r, at| r.in_listing(at),
        |caps, _| {
            let rows: Vec<String> = caps[1]
                .lines()
                .map(str::trim)
                .filter(|row| !row.is_empty())
                .map(|row| format!("& {}", row))
                .collect();
            if rows.is_empty() {
                return String::new();
            }
            format!(
                "\\begin{{empheq}}[left=\\empheqlbrace\\,]{{align}}\n{}\n\\end{{empheq}}\n",
                rows.join("\\\\\n")
            )
        },
    )
}

// =============================================================================
// Structure
// =============================================================================

const SECTION_LEVELS: [&str; 5] = [
    "section",
    "subsection",
    "subsubsection",
    "paragraph",
    "subparagraph",
];

/// `#`.. headings → sectioning commands; deeper than five collapses to the last
pub fn headings(text: &str) -> String {
    replace_unprotected(
        text,
        &SECTION_RE,
        |r, at| r.in_listing(at),
        |caps, _| {
            let depth = caps[1].len().min(SECTION_LEVELS.len());
            let star = if caps.get(2).is_some() { "*" } else { "" };
            format!("\\{}{}{{{}}}", SECTION_LEVELS[depth - 1], star, &caps[3])
        },
    )
}

pub fn horizontal_rules(text: &str) -> String {
    replace_unprotected(
        text,
        &HRULE_RE,
        |r, at| r.in_code(at) || r.in_math(at),
        |_, _| "\\vspace{0.2mm}\\rule{\\textwidth}{0.4pt}\n\\vspace{0.2mm}".to_string(),
    )
}

/// `> ` lines → `displayquote`, one paragraph per line
pub fn blockquotes(text: &str) -> String {
    replace_unprotected(
        text,
        &BLOCKQUOTE_RE,
        |r, at| r.in_listing(at),
        |caps, _| {
            let paragraphs: Vec<&str> = BLOCKQUOTE_LINE_RE
                .captures_iter(&caps[0])
                .filter_map(|line| line.get(1).map(|m| m.as_str()))
                .collect();
            format!(
                "\\begin{{displayquote}}\n{}\n\\end{{displayquote}}\n",
                paragraphs.join("\n\n")
            )
        },
    )
}

/// `![caption](path)` → figure float, or an inline graphic inside a minipage
pub fn images(text: &str) -> String {
    replace_unprotected(
        text,
        &IMAGE_RE,
        |r, at| r.in_listing(at),
        |caps, regions| {
            let end = caps.get(0).map_or(0, |m| m.end());
            let in_minipage = regions.in_minipage(end);
            let path = &caps[2];
            let caption = caps.get(1).map(|m| {
                m.as_str()
                    .split('\n')
                    .map(str::trim)
                    .collect::<Vec<_>>()
                    .join("\n\t\t")
            });

            let mut out = String::new();
            if in_minipage {
                out.push_str("\t\\centering\n\t");
            } else {
                out.push_str("\\begin{figure}[hbtp]\n");
            }
            out.push_str(&format!(
                "\\includegraphics[width=\\textwidth,keepaspectratio]{{{}}}\n",
                path
            ));
            if let Some(caption) = caption {
                let command = if in_minipage { "captionof{figure}" } else { "caption" };
                out.push_str(&format!("\t\\{}{{{}}}\n", command, caption));
            }
            out.push_str(&format!("\t\\label{{{}}}\n", path));
            if !in_minipage {
                out.push_str("\\end{figure}\n");
            }
            out
        },
    )
}

/// Indented `$..$` line → `center`
pub fn centered_equations(text: &str) -> String {
    replace_unprotected(
        text,
        &CENTER_EQ_RE,
        |r, at| r.in_listing(at),
        |caps, _| format!("\\begin{{center}}\n{}\n\\end{{center}}", &caps[1]),
    )
}

/// Two blank lines in a row → explicit vertical space
pub fn blank_lines(text: &str, space: &str) -> String {
    replace_unprotected(
        text,
        &DOUBLE_BLANK_RE,
        |r, at| r.in_listing(at),
        |_, _| format!("\n\\vspace{{{}}}\n\n", space),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theorems::TheoremTable;
    use crate::utils::TexDownOptions;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_code_fence_options() {
        assert_eq!(
            code_fences("```python\nprint(1)\n```Hello"),
            "\\begin{lstlisting}[language=python,caption=Hello]\nprint(1)\n\\end{lstlisting}"
        );
        assert_eq!(
            code_fences("~~~\nraw\n~~~"),
            "\\begin{lstlisting}\nraw\n\\end{lstlisting}"
        );
    }

    #[test]
    fn test_math_block_rows() {
        assert_eq!(
            math_blocks("$$$\na = b\n+ c\n\nd = e\n$$$\nafter"),
            "\\begin{gather}\na = b + c\\\\\nd = e\n\\end{gather}\nafter"
        );
        assert_eq!(
            math_blocks("$$$*\nx\n$$$"),
            "\\begin{gather*}\nx\n\\end{gather*}\n"
        );
    }

    #[test]
    fn test_math_inside_listing_untouched() {
        let text = "\\begin{lstlisting}[]\n$$$\nx\n$$$\n\\end{lstlisting}";
        assert_eq!(math_blocks(text), text);
    }

    #[test]
    fn test_theorems_use_table_ordinals() {
        let src = "[theorem]\n    One.\n\n[lemma]\n    Two.";
        let table = TheoremTable::scan(src);
        let options = TexDownOptions::default();
        let mut state = BodyState::new(&table, &options);
        assert_eq!(
            theorems(src, &mut state),
            "\\begin{theorem0}\n    One.\n\\end{theorem0}\n\n\\begin{theorem1}\n    Two.\n\\end{theorem1}"
        );
    }

    #[test]
    fn test_braces() {
        assert_eq!(
            braces("[braces]\n    x + y = 1\n    x - y = 0\n"),
            "\\begin{empheq}[left=\\empheqlbrace\\,]{align}\n& x + y = 1\\\\\n& x - y = 0\n\\end{empheq}\n"
        );
        assert_eq!(braces("[braces]\n    \n"), "");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(headings("# Intro"), "\\section{Intro}");
        assert_eq!(headings("##* Aside"), "\\subsection*{Aside}");
        assert_eq!(headings("#### Deep"), "\\paragraph{Deep}");
        assert_eq!(headings("####### Deeper"), "\\subparagraph{Deeper}");
    }

    #[test]
    fn test_heading_inside_listing_untouched() {
        let text = "\\begin{lstlisting}[]\n# comment\n\\end{lstlisting}";
        assert_eq!(headings(text), text);
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(
            horizontal_rules("a\n---\nb"),
            "a\n\\vspace{0.2mm}\\rule{\\textwidth}{0.4pt}\n\\vspace{0.2mm}\nb"
        );
        assert_eq!(horizontal_rules("a --- b"), "a --- b");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            blockquotes("> first\n> second\nafter"),
            "\\begin{displayquote}\nfirst\n\nsecond\n\\end{displayquote}\nafter"
        );
    }

    #[test]
    fn test_image_float() {
        assert_eq!(
            images("![A plot\n    over time](plot.png)"),
            "\\begin{figure}[hbtp]\n\\includegraphics[width=\\textwidth,keepaspectratio]{plot.png}\n\t\\caption{A plot\n\t\tover time}\n\t\\label{plot.png}\n\\end{figure}\n"
        );
    }

    #[test]
    fn test_image_in_minipage() {
        let text = "\\begin{minipage}{0.4\\textwidth}\n![Cat](cat.jpg)\n\\end{minipage}";
        let out = images(text);
        assert!(out.contains("\t\\centering\n\t\\includegraphics"));
        assert!(out.contains("\t\\captionof{figure}{Cat}\n"));
        assert!(!out.contains("\\begin{figure}"));
    }

    #[test]
    fn test_centered_equation() {
        assert_eq!(
            centered_equations("    $e = mc^2$"),
            "\\begin{center}\n$e = mc^2$\n\\end{center}"
        );
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(blank_lines("a\n\nb", "5mm"), "a\n\nb");
        assert_eq!(blank_lines("a\n\n\nb", "5mm"), "a\n\n\\vspace{5mm}\n\nb");
    }
}
