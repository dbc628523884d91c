//! Config file diagnostics with source spans

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Config YAML error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("invalid config file: {message}")]
#[diagnostic(code(swx::config::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying parser message
    message: String,
}

impl YamlSyntaxError {
    /// Create a diagnostic from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors loading a config file
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a 1-based line/column to a byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (idx, text) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == line {
            let col_offset = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            return line_start + col_offset;
        }
        line_start += text.len();
    }
    source.len().saturating_sub(1)
}

/// Suggest a fix for common config mistakes
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("unknown field") {
        return Some(
            "Valid keys: base_url, people_path, max_pages, timeout_secs, max_concurrent_fetches, cache_path"
                .to_string(),
        );
    }

    if msg_lower.contains("invalid type") {
        return Some("max_pages, timeout_secs and max_concurrent_fetches take plain integers".to_string());
    }

    if msg_lower.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") || msg_lower.contains("unexpected ':'") {
        return Some("URLs containing ':' must be quoted: base_url: \"http://host/api\"".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
        assert_eq!(line_col_to_offset(source, 9, 1), 16);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("unknown field `max_page`").is_some());
        assert!(generate_help("invalid type: string \"ten\", expected usize").is_some());
        assert!(generate_help("found tab character").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_from_serde_error_keeps_message() {
        let source = "max_pages: ten\n";
        let err = serde_yml::from_str::<std::collections::BTreeMap<String, u32>>(source)
            .unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "config.yaml");
        assert!(!diag.message().is_empty());
        assert!(diag.to_string().starts_with("invalid config file"));
    }
}
