//! Package set for the preamble
//!
//! Keyed by package name, insertion-ordered. Including a package that is
//! already present replaces its options in place; content-triggered packages
//! only go in when the name is free, so user-chosen options survive.

use indexmap::IndexMap;

use crate::utils::{ConversionError, ConversionResult, PackageSpec};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackageSet {
    packages: IndexMap<String, Vec<String>>,
}

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: &[PackageSpec]) -> Self {
        let mut set = Self::new();
        for spec in specs {
            set.include(&spec.name, spec.options.clone());
        }
        set
    }

    /// Add `name`, or replace the options of an existing entry.
    pub fn include(&mut self, name: &str, options: Vec<String>) {
        if let Some(existing) = self.packages.get(name) {
            if *existing != options {
                log::debug!(
                    "package '{}' re-included, options {:?} -> {:?}",
                    name,
                    existing,
                    options
                );
            }
        }
        self.packages.insert(name.to_string(), options);
    }

    /// Add `name` unless a package of that name is already present.
    pub fn include_if_absent(&mut self, name: &str, options: &[&str]) {
        if !self.packages.contains_key(name) {
            self.packages.insert(
                name.to_string(),
                options.iter().map(|o| o.to_string()).collect(),
            );
        }
    }

    pub fn remove(&mut self, name: &str) -> ConversionResult<()> {
        match self.packages.shift_remove(name) {
            Some(_) => Ok(()),
            None => Err(ConversionError::package_not_included(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn options(&self, name: &str) -> Option<&[String]> {
        self.packages.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.packages
            .iter()
            .map(|(name, options)| (name.as_str(), options.as_slice()))
    }

    /// One `\usepackage` line per entry
    pub fn usepackage_lines(&self) -> Vec<String> {
        self.iter()
            .map(|(name, options)| {
                if options.is_empty() {
                    format!("\\usepackage{{{}}}", name)
                } else {
                    format!("\\usepackage[{}]{{{}}}", options.join(","), name)
                }
            })
            .collect()
    }
}
