//! Theorem-like blocks
//!
//! The header declares one environment per block (`theorem0`, `theorem1`,
//! ...) and the body wraps each block in the environment with the same
//! ordinal. Both sides read the ordinals from one `TheoremTable`, which is
//! scanned over the same text the body's theorem rule sees.

use std::fmt;

use crate::core::body::blocks::theorem_protected;
use crate::core::body::regions::RegionIndex;
use crate::core::body::theorem_stage_text;
use crate::core::patterns::THEOREM_RE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TheoremKind {
    Theorem,
    Corollary,
    Lemma,
    Definition,
}

impl TheoremKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "theorem" => Some(TheoremKind::Theorem),
            "corollary" => Some(TheoremKind::Corollary),
            "lemma" => Some(TheoremKind::Lemma),
            "definition" => Some(TheoremKind::Definition),
            _ => None,
        }
    }
}

impl fmt::Display for TheoremKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TheoremKind::Theorem => write!(f, "Theorem"),
            TheoremKind::Corollary => write!(f, "Corollary"),
            TheoremKind::Lemma => write!(f, "Lemma"),
            TheoremKind::Definition => write!(f, "Definition"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheoremBlock {
    pub kind: TheoremKind,
    /// `[lemma: Zorn]` gives an unnumbered environment titled "Zorn"
    pub name: Option<String>,
    pub body: String,
    /// Byte offset of the tag in the text the theorem rule runs on
    pub offset: usize,
}

impl TheoremBlock {
    /// `\newtheorem` declaration for the block with ordinal `index`
    pub fn declaration(&self, index: usize) -> String {
        match &self.name {
            Some(name) => format!("\\newtheorem*{{theorem{}}}{{{}}}", index, name),
            None => format!("\\newtheorem{{theorem{}}}{{{}}}", index, self.kind),
        }
    }
}

/// Theorem-like blocks in encounter order; the index is the ordinal
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TheoremTable {
    blocks: Vec<TheoremBlock>,
}

impl TheoremTable {
    /// Collect the blocks of `source` that the body transpiler will wrap.
    /// Tags swallowed by a listing or a math group are left out.
    pub fn scan(source: &str) -> Self {
        let working = theorem_stage_text(source);
        let regions = RegionIndex::new(&working);

        let blocks = THEOREM_RE
            .captures_iter(&working)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if theorem_protected(&regions, whole.end()) {
                    return None;
                }
                let kind = TheoremKind::parse(&caps[1])?;
                Some(TheoremBlock {
                    kind,
                    name: caps
                        .get(2)
                        .map(|m| m.as_str().trim().to_string())
                        .filter(|name| !name.is_empty()),
                    body: caps[3].to_string(),
                    offset: whole.start(),
                })
            })
            .collect();

        TheoremTable { blocks }
    }

    /// Ordinal of the block whose tag starts at `offset`
    pub fn ordinal_at(&self, offset: usize) -> Option<usize> {
        self.blocks
            .binary_search_by_key(&offset, |block| block.offset)
            .ok()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TheoremBlock> {
        self.blocks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TheoremBlock> {
        self.blocks.iter()
    }

    /// One declaration per block, numbered from 0
    pub fn declarations(&self) -> Vec<String> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| block.declaration(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_order_and_names() {
        let src = "[theorem]\n    A.\n\n[Lemma: Zorn]\n    B.\n\n[definition]\n\tC.\n";
        let table = TheoremTable::scan(src);
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.declarations(),
            vec![
                "\\newtheorem{theorem0}{Theorem}",
                "\\newtheorem*{theorem1}{Zorn}",
                "\\newtheorem{theorem2}{Definition}",
            ]
        );
        assert_eq!(table.get(0).unwrap().body, "    A.");
    }

    #[test]
    fn test_body_spans_blank_lines() {
        let table = TheoremTable::scan("[corollary]\n    first\n\n    second\nafter\n");
        assert_eq!(table.get(0).unwrap().body, "    first\n\n    second");
        assert_eq!(table.get(0).unwrap().kind, TheoremKind::Corollary);
    }

    #[test]
    fn test_blocks_inside_code_fences_are_skipped() {
        let src = "```\n[theorem]\n    hidden\n```\n[theorem]\n    shown\n";
        let table = TheoremTable::scan(src);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().body, "    shown");
    }

    #[test]
    fn test_blocks_inside_math_are_skipped() {
        let src = "$$$\n[theorem]\n    x\n$$$\n\n[lemma]\n    y\n";
        let table = TheoremTable::scan(src);
        assert_eq!(table.len(), 1);
        assert_eq!(table.declarations(), vec!["\\newtheorem{theorem0}{Lemma}"]);
    }

    #[test]
    fn test_blocks_inside_raw_listings_are_skipped() {
        let src = "\\begin{lstlisting}\n[theorem]\n    raw\n\\end{lstlisting}\n";
        assert!(TheoremTable::scan(src).is_empty());
    }

    #[test]
    fn test_ordinal_at() {
        let table = TheoremTable::scan("[theorem]\n    A.\n\n[lemma]\n    B.\n");
        let second = table.get(1).unwrap().offset;
        assert_eq!(table.ordinal_at(0), Some(0));
        assert_eq!(table.ordinal_at(second), Some(1));
        assert_eq!(table.ordinal_at(second + 1), None);
    }

    #[test]
    fn test_unindented_body_is_not_a_block() {
        assert!(TheoremTable::scan("[theorem]\nnot indented\n").is_empty());
    }
}
