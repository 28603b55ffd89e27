//! Inline rules: code spans and the four emphasis styles

use super::regions::RegionIndex;
use crate::core::patterns::{find_delimited, find_inline_code, find_strikeouts, splice, Span};

/// `` `x` `` → `\lstinline[columns=fixed]$x$`
pub fn inline_code(text: &str) -> String {
    let regions = RegionIndex::new(text);
    let replacements = find_inline_code(text)
        .into_iter()
        .filter(|span| !regions.in_listing(span.range.end))
        .map(|span| {
            let latex = format!("\\lstinline[columns=fixed]${}$", span.content);
            (span.range, latex)
        })
        .collect();
    splice(text, replacements)
}

/// Bold, then emphasis, then underline, then strikeout. Each style is its own
/// pass so that a later style sees the commands emitted by an earlier one.
pub fn formatting(text: &str) -> String {
    let text = format_spans(text, "textbf", |t| find_delimited(t, &["**"], false));
    let text = format_spans(&text, "emph", |t| find_delimited(t, &["*", "//"], true));
    let text = format_spans(&text, "underline", |t| find_delimited(t, &["__"], false));
    format_spans(&text, "sout", find_strikeouts)
}

fn format_spans<F>(text: &str, command: &str, find: F) -> String
where
    F: for<'a> Fn(&'a str) -> Vec<Span<'a>>,
{
    let regions = RegionIndex::new(text);
    let replacements = find(text)
        .into_iter()
        .filter(|span| {
            let end = span.range.end;
            let protected = regions.in_code(end) || regions.in_math(end);
            if protected {
                log::trace!("\\{}: protected span at {:?} left as is", command, span.range);
            }
            !protected
        })
        .map(|span| {
            let latex = format!("\\{}{{{}}}", command, span.content.replace("\\\n", "\n"));
            (span.range, latex)
        })
        .collect();
    splice(text, replacements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_code() {
        assert_eq!(
            inline_code("call `f(x)` now"),
            "call \\lstinline[columns=fixed]$f(x)$ now"
        );
    }

    #[test]
    fn test_inline_code_inside_listing_untouched() {
        let text = "\\begin{lstlisting}[]\nlet s = `raw`;\n\\end{lstlisting}";
        assert_eq!(inline_code(text), text);
    }

    #[test]
    fn test_all_styles() {
        assert_eq!(
            formatting("**bold** and //slanted// and __under__ and ~~gone~~"),
            "\\textbf{bold} and \\emph{slanted} and \\underline{under} and \\sout{gone}"
        );
    }

    #[test]
    fn test_single_star_emphasis() {
        assert_eq!(formatting("an *important* word"), "an \\emph{important} word");
    }

    #[test]
    fn test_escaped_line_break_is_unescaped() {
        assert_eq!(formatting("**two\\\nlines**"), "\\textbf{two\nlines}");
    }

    #[test]
    fn test_math_and_code_are_protected() {
        let text = "\\begin{gather}\na**b**c\n\\end{gather}\n\\lstinline[columns=fixed]$*p*$";
        assert_eq!(formatting(text), text);
    }

    #[test]
    fn test_nested_bold_emphasis() {
        assert_eq!(formatting("**a *b* c**"), "\\textbf{a \\emph{b} c}");
    }
}
