//! Conversion options
//!
//! Every knob has a default matching the stock TexDown output, so
//! `TexDownOptions::default()` reproduces the plain `make_header`/`make_body`
//! behaviour. Options deserialize from JSON with missing fields defaulted.

use serde::{Deserialize, Serialize};

use super::error::{ConversionError, ConversionResult};

// =============================================================================
// Package specification
// =============================================================================

/// A package name plus its option list, as it appears in `\usepackage[..]{..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }
}

// =============================================================================
// TexDown → LaTeX Conversion Options
// =============================================================================

/// Options for TexDown to LaTeX conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexDownOptions {
    /// Columns per list nesting level; a tab counts as this many columns
    /// Default: 4
    pub tab_width: usize,

    /// Row spacing for `gather` groups (`\setlength{\jot}{..}`)
    /// Default: "8pt"
    pub jot: String,

    /// Vertical space emitted for two consecutive blank lines
    /// Default: "5mm"
    pub blank_line_space: String,

    /// Number used for the first auto-labelled table (`table1`, `table2`, ...)
    /// Default: 1
    pub first_table_number: usize,

    /// Packages every document starts with, in emission order
    pub default_packages: Vec<PackageSpec>,
}

impl Default for TexDownOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            jot: "8pt".to_string(),
            blank_line_space: "5mm".to_string(),
            first_table_number: 1,
            default_packages: default_packages(),
        }
    }
}

impl TexDownOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> ConversionResult<Self> {
        let options: TexDownOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject values the transpiler cannot work with.
    pub fn validate(&self) -> ConversionResult<()> {
        if self.tab_width == 0 {
            return Err(ConversionError::invalid_options(
                "tab_width must be at least 1",
            ));
        }
        if let Some(pkg) = self.default_packages.iter().find(|p| p.name.trim().is_empty()) {
            return Err(ConversionError::invalid_options(format!(
                "default package with empty name (options: {:?})",
                pkg.options
            )));
        }
        Ok(())
    }
}

fn default_packages() -> Vec<PackageSpec> {
    vec![
        PackageSpec::new("fontenc").with_option("T1"),
        PackageSpec::new("inputenc").with_option("utf8"),
        PackageSpec::new("amsmath"),
        PackageSpec::new("amsthm"),
        PackageSpec::new("amssymb"),
        PackageSpec::new("lmodern"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = TexDownOptions::default();
        assert_eq!(opts.tab_width, 4);
        assert_eq!(opts.jot, "8pt");
        assert_eq!(opts.first_table_number, 1);
        let names: Vec<&str> = opts.default_packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["fontenc", "inputenc", "amsmath", "amsthm", "amssymb", "lmodern"]
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let opts = TexDownOptions::from_json(r#"{"jot": "4pt"}"#).unwrap();
        assert_eq!(opts.jot, "4pt");
        assert_eq!(opts.tab_width, 4);
        assert_eq!(opts.default_packages.len(), 6);
    }

    #[test]
    fn test_zero_tab_width_rejected() {
        let err = TexDownOptions::from_json(r#"{"tab_width": 0}"#).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidOptions { .. }));
    }

    #[test]
    fn test_custom_packages_from_json() {
        let opts = TexDownOptions::from_json(
            r#"{"default_packages": [{"name": "geometry", "options": ["a4paper"]}]}"#,
        )
        .unwrap();
        assert_eq!(
            opts.default_packages,
            vec![PackageSpec::new("geometry").with_option("a4paper")]
        );
    }
}
