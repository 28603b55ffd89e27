//! Preamble synthesis
//!
//! Builds everything before `\begin{document}`: document class, packages,
//! macros, theorem declarations, title metadata, graphics path and the
//! user's own `[header]` blocks.

use crate::core::comments::strip_comments;
use crate::core::directives::Directives;
use crate::core::packages::PackageSet;
use crate::core::patterns::{
    find_code_fences, find_inline_code, find_strikeouts, BLOCKQUOTE_RE, BRACES_RE, IMAGE_RE,
    MINIPAGE_BEGIN, PRETTY_TABLE_RE, UGLY_TABLE_RE,
};
use crate::core::theorems::TheoremTable;
use crate::utils::{ConversionResult, TexDownOptions};

/// Content constructs that need a supporting package
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ContentFeatures {
    pub code: bool,
    pub strikeout: bool,
    pub blockquote: bool,
    pub table: bool,
    pub image: bool,
    pub braces: bool,
    pub minipage: bool,
}

impl ContentFeatures {
    pub fn detect(source: &str) -> Self {
        ContentFeatures {
            code: !find_code_fences(source).is_empty() || !find_inline_code(source).is_empty(),
            strikeout: !find_strikeouts(source).is_empty(),
            blockquote: BLOCKQUOTE_RE.is_match(source),
            table: PRETTY_TABLE_RE.is_match(source) || UGLY_TABLE_RE.is_match(source),
            image: IMAGE_RE.is_match(source),
            braces: BRACES_RE.is_match(source),
            minipage: source.contains(MINIPAGE_BEGIN),
        }
    }

    /// Packages implied by the detected constructs, with their options
    fn packages(&self) -> Vec<(&'static str, &'static [&'static str])> {
        let mut out: Vec<(&'static str, &'static [&'static str])> = Vec::new();
        if self.code {
            out.push(("listings", &[]));
        }
        if self.strikeout {
            out.push(("ulem", &["normalem"]));
        }
        if self.blockquote {
            out.push(("csquotes", &[]));
        }
        if self.table {
            out.push(("tabulary", &[]));
        }
        if self.image {
            out.push(("graphicx", &[]));
        }
        if self.braces {
            out.push(("empheq", &[]));
        }
        if self.minipage {
            out.push(("caption", &[]));
        }
        out
    }
}

/// Resolve the final package set: defaults, removals, includes, then the
/// packages content constructs call for.
pub fn resolve_packages(
    directives: &Directives,
    features: &ContentFeatures,
    options: &TexDownOptions,
) -> ConversionResult<PackageSet> {
    let mut packages = PackageSet::from_specs(&options.default_packages);

    for name in &directives.removals {
        packages.remove(name)?;
    }
    for spec in &directives.includes {
        packages.include(&spec.name, spec.options.clone());
    }
    for (name, opts) in features.packages() {
        packages.include_if_absent(name, opts);
    }

    Ok(packages)
}

/// Render the preamble for `source` against an already computed theorem table.
pub fn render_header(
    source: &str,
    theorems: &TheoremTable,
    options: &TexDownOptions,
) -> ConversionResult<String> {
    let source = strip_comments(source);
    let directives = Directives::scan(&source);
    let features = ContentFeatures::detect(&source);
    let packages = resolve_packages(&directives, &features, options)?;
    log::debug!(
        "header: {} packages, {} macros, {} theorems",
        packages.len(),
        directives.macros.len(),
        theorems.len()
    );

    let mut out = String::new();
    out.push_str("% Start of header.\n");
    out.push_str("\\documentclass{article}\n");

    for line in packages.usepackage_lines() {
        out.push_str(&line);
        out.push('\n');
    }

    if !directives.macros.is_empty() {
        out.push('\n');
        for def in &directives.macros {
            out.push_str(&def.to_latex());
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&format!("\\setlength{{\\jot}}{{{}}}\n", options.jot));

    if !theorems.is_empty() {
        out.push('\n');
        for declaration in theorems.declarations() {
            out.push_str(&declaration);
            out.push('\n');
        }
    }

    if let Some(meta) = &directives.metadata {
        out.push('\n');
        out.push_str(&format!("\\title{{{}}}\n", meta.title));
        out.push_str(&format!("\\author{{{}}}\n", meta.author));
        out.push_str(&format!("\\date{{{}}}\n", meta.date));
    }

    if features.image {
        if let Some(path) = &directives.figure_path {
            out.push_str(&format!("\\graphicspath{{{{{}}}}}\n", path));
        }
    }

    if !directives.header_blocks.is_empty() {
        out.push('\n');
        out.push_str("% Start of custom header contents\n");
        for block in &directives.header_blocks {
            out.push_str(block);
            out.push('\n');
        }
        out.push_str("% End of custom header contents\n");
        out.push('\n');
    }

    out.push_str("% End of header\n");
    Ok(out.trim().to_string())
}
