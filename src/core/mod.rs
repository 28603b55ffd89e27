//! Core conversion engine
//!
//! - `header`: preamble synthesis (packages, macros, theorem declarations,
//!   metadata)
//! - `body`: the rewrite pipeline from TexDown markup to LaTeX
//!
//! Both halves are pure functions of the source text. The only thing they
//! share is the theorem table, which `convert` computes once.

pub mod body;
pub mod comments;
pub mod directives;
pub mod header;
pub mod packages;
pub mod patterns;
pub mod theorems;

use serde::{Deserialize, Serialize};

use crate::core::theorems::TheoremTable;
use crate::utils::{ConversionResult, TexDownOptions};

/// A converted document: preamble and body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TexDocument {
    pub header: String,
    pub body: String,
}

impl TexDocument {
    /// The full `.tex` file contents
    pub fn to_latex(&self) -> String {
        format!("{}\n\n{}\n", self.header, self.body)
    }
}

/// Build the preamble with default options.
///
/// # Errors
/// `PackageNotIncluded` when an `[uninclude]` names a package that is not
/// among the defaults.
pub fn make_header(source: &str) -> ConversionResult<String> {
    make_header_with_options(source, &TexDownOptions::default())
}

pub fn make_header_with_options(source: &str, options: &TexDownOptions) -> ConversionResult<String> {
    options.validate()?;
    header::render_header(source, &TheoremTable::scan(source), options)
}

/// Build the document body with default options.
pub fn make_body(source: &str) -> String {
    body::render_body(source, &TheoremTable::scan(source), &TexDownOptions::default())
}

/// # Errors
/// `InvalidOptions` when `options` fail validation.
pub fn make_body_with_options(source: &str, options: &TexDownOptions) -> ConversionResult<String> {
    options.validate()?;
    Ok(body::render_body(source, &TheoremTable::scan(source), options))
}

/// Convert a whole document with default options.
pub fn convert(source: &str) -> ConversionResult<TexDocument> {
    convert_with_options(source, &TexDownOptions::default())
}

/// Convert a whole document. The theorem table is scanned once and shared
/// by the header and the body so declarations and environments agree.
pub fn convert_with_options(source: &str, options: &TexDownOptions) -> ConversionResult<TexDocument> {
    options.validate()?;
    let theorems = TheoremTable::scan(source);
    log::info!("converting {} bytes, {} theorem blocks", source.len(), theorems.len());
    let header = header::render_header(source, &theorems, options)?;
    let body = body::render_body(source, &theorems, options);
    Ok(TexDocument { header, body })
}
