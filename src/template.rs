//! Index page templating
//!
//! A deliberately small template language for the site index:
//!
//! - `{{ page_count }}` expands to the number of pages.
//! - `{% for page in pages %} ... {% endfor %}` repeats its body once per
//!   page, in which `{{ page.output_path }}`, `{{ page.name }}` and
//!   `{{ page.title }}` are available.
//!
//! Every substituted value is HTML-escaped. Referencing any other variable is
//! an error rather than an empty string.

use std::path::Path;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::{Error, Result};

/// Template used when no custom index template is configured.
pub const DEFAULT_INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

const LOOP_PATTERN: &str = r"(?s)\{%\s*for\s+page\s+in\s+pages\s*%\}(.*?)\{%\s*endfor\s*%\}";
const VARIABLE_PATTERN: &str = r"\{\{\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}";

/// One link on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    /// Path of the page relative to the site root.
    pub output_path: String,
    pub name: String,
    pub title: String,
}

/// Load a template file, or the built-in template when `path` is `None`.
pub fn load_template(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| Error::Template {
            message: format!("Failed to read template '{}': {}", path.display(), e),
            variable: None,
        }),
        None => Ok(DEFAULT_INDEX_TEMPLATE.to_string()),
    }
}

/// Render the index page for `pages`.
pub fn render_index(template: &str, pages: &[IndexEntry]) -> Result<String> {
    let loop_re = Regex::new(LOOP_PATTERN)?;
    let var_re = Regex::new(VARIABLE_PATTERN)?;

    let mut failure = None;
    let expanded = loop_re.replace_all(template, |caps: &Captures| {
        let body = &caps[1];
        let mut out = String::new();
        for page in pages {
            match substitute(&var_re, body, |name| page_value(page, name)) {
                Ok(rendered) => out.push_str(&rendered),
                Err(e) => {
                    failure.get_or_insert(e);
                    break;
                }
            }
        }
        out
    });
    if let Some(e) = failure {
        return Err(e);
    }

    let count = pages.len().to_string();
    substitute(&var_re, &expanded, |name| match name {
        "page_count" => Some(count.clone()),
        _ => None,
    })
}

fn page_value(page: &IndexEntry, name: &str) -> Option<String> {
    match name {
        "page.output_path" => Some(page.output_path.clone()),
        "page.name" => Some(page.name.clone()),
        "page.title" => Some(page.title.clone()),
        _ => None,
    }
}

fn substitute<F>(var_re: &Regex, text: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut unknown = None;
    let rendered = var_re.replace_all(text, |caps: &Captures| match lookup(&caps[1]) {
        Some(value) => escape_html(&value),
        None => {
            unknown.get_or_insert_with(|| caps[1].to_string());
            String::new()
        }
    });

    match unknown {
        Some(variable) => Err(Error::Template {
            message: "Undefined variable".to_string(),
            variable: Some(variable),
        }),
        None => Ok(rendered.into_owned()),
    }
}

/// Escape the characters that are significant in HTML text and attributes.
///
/// Braces are escaped too, so a substituted value can never be read as a
/// placeholder by a later pass.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}
