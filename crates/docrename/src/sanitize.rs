//! Helpers for sanitizing data before it enters tracing span attributes
//! or a file name.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields — reveals the file name without exposing the full path.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Cleans a model-supplied metadata field for use inside a file name.
///
/// The model's output is derived from untrusted document content, so path
/// separators and control characters must never reach the filesystem. Spaces
/// and ordinary punctuation are kept — the target name format depends on them.
pub fn clean_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c == '\0' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_path_returns_filename() {
        assert_eq!(
            redact_path(Path::new("/home/user/Documents/invoice.pdf")),
            "invoice.pdf"
        );
    }

    #[test]
    fn test_redact_path_no_filename() {
        assert_eq!(redact_path(Path::new("/")), "<unknown>");
    }

    #[test]
    fn test_clean_component_keeps_ordinary_text() {
        assert_eq!(clean_component("Quarterly Report 2024"), "Quarterly Report 2024");
    }

    #[test]
    fn test_clean_component_replaces_separators() {
        assert_eq!(clean_component("../etc/passwd"), ".._etc_passwd");
        assert_eq!(clean_component("a\\b"), "a_b");
    }

    #[test]
    fn test_clean_component_replaces_control_chars() {
        assert_eq!(clean_component("line\nbreak\there"), "line_break_here");
    }

    #[test]
    fn test_clean_component_trims() {
        assert_eq!(clean_component("  padded  "), "padded");
    }
}
