//! # TexDown
//!
//! A transpiler from TexDown, a Markdown-flavoured shorthand for technical
//! writing, to compilable LaTeX.
//!
//! A source file yields two independent outputs:
//!
//! - the **header**: `\documentclass`, the packages the document needs,
//!   custom macros, theorem declarations and title metadata
//! - the **body**: `\begin{document}` … `\end{document}` with every TexDown
//!   construct rewritten to LaTeX
//!
//! ## Quick Start
//!
//! ```rust
//! use texdown::{convert, make_body};
//!
//! let source = "[title: Notes]\n\n# Intro\n\nSome **bold** text.\n";
//!
//! let doc = convert(source).unwrap();
//! assert!(doc.header.contains("\\title{Notes}"));
//! assert!(doc.body.contains("\\section{Intro}"));
//!
//! let body = make_body("* one\n* two\n");
//! assert!(body.contains("\\begin{itemize}"));
//! ```
//!
//! ## Options
//!
//! ```rust
//! use texdown::{convert_with_options, TexDownOptions};
//!
//! let options = TexDownOptions::from_json(r#"{ "blank_line_space": "1em" }"#).unwrap();
//! let doc = convert_with_options("a\n\n\nb", &options).unwrap();
//! assert!(doc.body.contains("\\vspace{1em}"));
//! ```

pub mod core;
pub mod utils;
pub mod wasm;

pub use crate::core::comments::strip_comments;
pub use crate::core::theorems::{TheoremBlock, TheoremKind, TheoremTable};
pub use crate::core::{
    convert, convert_with_options, make_body, make_body_with_options, make_header,
    make_header_with_options, TexDocument,
};
pub use crate::utils::{ConversionError, ConversionResult, PackageSpec, TexDownOptions};

/// Crate version, as reported by the CLI and the WASM bindings
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
