//! Protected regions of partially transformed body text
//!
//! Once code, math and minipages have been emitted as LaTeX, later rules must
//! leave their contents alone. A `RegionIndex` is built once per rule pass
//! from the current text; it records where each region marker ends and
//! answers "is this offset inside" by comparing how many opening and closing
//! markers end at or before it.

use std::ops::Range;

use crate::core::patterns::INLINE_LISTING_RE;

#[derive(Debug, Default, Clone)]
struct MarkerBalance {
    opens: Vec<usize>,
    closes: Vec<usize>,
}

impl MarkerBalance {
    fn scan(text: &str, opens: &[&str], closes: &[&str]) -> Self {
        MarkerBalance {
            opens: marker_ends(text, opens),
            closes: marker_ends(text, closes),
        }
    }

    fn contains(&self, pos: usize) -> bool {
        let opened = self.opens.partition_point(|&end| end <= pos);
        let closed = self.closes.partition_point(|&end| end <= pos);
        opened > closed
    }
}

fn marker_ends(text: &str, markers: &[&str]) -> Vec<usize> {
    let mut ends: Vec<usize> = markers
        .iter()
        .flat_map(|marker| text.match_indices(marker).map(|(at, m)| at + m.len()))
        .collect();
    ends.sort_unstable();
    ends
}

#[derive(Debug, Default, Clone)]
pub struct RegionIndex {
    listing: MarkerBalance,
    minipage: MarkerBalance,
    gather: MarkerBalance,
    inline_code: Vec<Range<usize>>,
}

impl RegionIndex {
    pub fn new(text: &str) -> Self {
        RegionIndex {
            listing: MarkerBalance::scan(text, &["\\begin{lstlisting}"], &["\\end{lstlisting}"]),
            minipage: MarkerBalance::scan(text, &["\\begin{minipage}"], &["\\end{minipage}"]),
            gather: MarkerBalance::scan(
                text,
                &["\\begin{gather}", "\\begin{gather*}"],
                &["\\end{gather}", "\\end{gather*}"],
            ),
            inline_code: INLINE_LISTING_RE
                .find_iter(text)
                .map(|m| m.range())
                .collect(),
        }
    }

    /// Inside a `lstlisting` block
    pub fn in_listing(&self, pos: usize) -> bool {
        self.listing.contains(pos)
    }

    pub fn in_minipage(&self, pos: usize) -> bool {
        self.minipage.contains(pos)
    }

    /// Inside a `gather` / `gather*` group
    pub fn in_math(&self, pos: usize) -> bool {
        self.gather.contains(pos)
    }

    /// Inside an `\lstinline` span
    pub fn in_inline_code(&self, pos: usize) -> bool {
        let i = self.inline_code.partition_point(|r| r.end < pos);
        self.inline_code
            .get(i)
            .is_some_and(|r| r.start < pos && pos <= r.end)
    }

    /// Verbatim of either kind
    pub fn in_code(&self, pos: usize) -> bool {
        self.in_listing(pos) || self.in_inline_code(pos)
    }
}
