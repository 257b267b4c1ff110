//! Quoting values for generated bash scripts and CI commands

use std::borrow::Cow;
use std::path::Path;

fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ',' | ':' | '+' | '=' | '@')
}

/// Quote `value` as a single shell word.
///
/// Values made only of characters the shell treats literally are returned
/// as is. Anything else is wrapped in single quotes, with embedded single
/// quotes written as `'\''`.
pub fn quote(value: &str) -> Cow<'_, str> {
    if !value.is_empty() && value.chars().all(is_plain) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(format!("'{}'", value.replace('\'', r"'\''")))
}

/// [`quote`] for a path.
pub fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_plain_values_are_unchanged() {
        assert_eq!(quote("python3"), "python3");
        assert_eq!(quote("/tmp/build/demo"), "/tmp/build/demo");
        assert_eq!(quote("a.ipynb"), "a.ipynb");
    }

    #[test]
    fn test_special_characters_are_single_quoted() {
        assert_eq!(quote("my nbs"), "'my nbs'");
        assert_eq!(quote("a$b.ipynb"), "'a$b.ipynb'");
        assert_eq!(quote("`x`"), "'`x`'");
        assert_eq!(quote("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote("it's"), r"'it'\''s'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_quote_path() {
        assert_eq!(quote_path(Path::new("/tmp/my nbs")), "'/tmp/my nbs'");
    }

    #[cfg(unix)]
    #[test]
    fn test_bash_reads_quoted_values_back_verbatim() {
        for value in ["my nbs", "a$b.ipynb", "`whoami`", "it's \"here\"", "$(echo x)"] {
            let output = Command::new("bash")
                .arg("-c")
                .arg(format!("printf %s {}", quote(value)))
                .output()
                .unwrap();
            assert_eq!(String::from_utf8_lossy(&output.stdout), value);
        }
    }
}
