//! Ignore-rule filtering for collection walks and extra-file injection
//!
//! Rules are literal entry names read from a `.gitignore`-style file. Pattern
//! syntax is deliberately not interpreted: a rule containing a wildcard makes
//! every filter call fail, so a pattern can never be mistaken for a literal.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Virtual environment directory names that are always excluded.
pub const VIRTUALENV_NAMES: &[&str] = &["venv", "env", "virtual-env", "virtualenv"];

const WILDCARD_CHARS: &[char] = &['*', '?', '['];

/// Literal exclusion rules plus the implicit virtual environment names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRuleSet {
    rules: Vec<String>,
    source: PathBuf,
}

impl IgnoreRuleSet {
    /// Rule set with only the implicit virtual environment names.
    pub fn empty() -> Self {
        Self::from_lines("", PathBuf::new())
    }

    /// Build a rule set from ignore-file text.
    ///
    /// Blank lines and `#` comments are dropped, and a trailing `/` is
    /// stripped so `build/` and `build` name the same entry.
    pub fn from_lines(content: &str, source: impl Into<PathBuf>) -> Self {
        let mut rules: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.trim_end_matches('/').to_string())
            .filter(|line| !line.is_empty())
            .collect();
        rules.extend(VIRTUALENV_NAMES.iter().map(|name| name.to_string()));

        Self {
            rules,
            source: source.into(),
        }
    }

    /// Load rules from an ignore file. A missing file yields [`Self::empty`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::from_lines("", path));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&content, path))
    }

    /// The effective rules, implicit names included.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Decide whether the entry `name`, located at `path`, is excluded.
    ///
    /// An entry is excluded only when a rule names it exactly and the entry
    /// still exists on disk. Stale rules never exclude anything.
    pub fn is_excluded(&self, name: &str, path: &Path) -> Result<bool> {
        for rule in &self.rules {
            if rule.contains(WILDCARD_CHARS) {
                return Err(Error::UnsupportedIgnoreRule {
                    rule: rule.clone(),
                    path: self.source.clone(),
                });
            }
        }

        let named = self.rules.iter().any(|rule| rule == name);
        Ok(named && (path.is_file() || path.is_dir()))
    }
}

/// Free-function form of [`IgnoreRuleSet::is_excluded`].
pub fn filter_gitignore_entry(name: &str, rules: &IgnoreRuleSet, path: &Path) -> Result<bool> {
    rules.is_excluded(name, path)
}
