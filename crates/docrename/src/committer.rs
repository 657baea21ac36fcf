//! Final stage: computes the target name from resolved metadata and renames
//! the source file in place.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CommitError;
use crate::resolver::DocMetadata;
use crate::sanitize;

/// Builds the target file name: `"{date} {title} [{addressee}].pdf"`.
///
/// Fields are cleaned for filesystem safety first — they come from a model
/// response derived from untrusted document content.
pub fn file_name(metadata: &DocMetadata) -> String {
    format!(
        "{} {} [{}].pdf",
        sanitize::clean_component(&metadata.date),
        sanitize::clean_component(&metadata.title),
        sanitize::clean_component(&metadata.addressee),
    )
}

/// Renames the document to its metadata-derived name, keeping the directory.
///
/// An existing file at the target path fails the commit; the source is left
/// untouched on every error path. The move happens within one volume and
/// never copies bytes.
pub fn commit(document_path: &Path, metadata: &DocMetadata) -> Result<PathBuf, CommitError> {
    let new_path = document_path.with_file_name(file_name(metadata));

    // Re-processing an already renamed file resolves to its own name.
    if new_path == document_path {
        return Ok(new_path);
    }

    // `rename` silently replaces an existing target on Linux, so the new name
    // is claimed with `hard_link`, which fails if it exists — even if the
    // target appeared after the name was computed. The old name is unlinked
    // only once the new one is in place.
    match std::fs::hard_link(document_path, &new_path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(CommitError::Collision(new_path));
        }
        Err(e) if e.kind() == std::io::ErrorKind::Unsupported => {
            // Filesystem without hard links; best-effort check-then-rename.
            if new_path.exists() {
                return Err(CommitError::Collision(new_path));
            }
            std::fs::rename(document_path, &new_path).map_err(|e| CommitError::Rename {
                from: document_path.to_path_buf(),
                to: new_path.clone(),
                source: e,
            })?;
            return Ok(new_path);
        }
        Err(e) => {
            return Err(CommitError::Rename {
                from: document_path.to_path_buf(),
                to: new_path.clone(),
                source: e,
            });
        }
    }

    if let Err(e) = std::fs::remove_file(document_path) {
        // Keep a single name for the document.
        let _ = std::fs::remove_file(&new_path);
        return Err(CommitError::Rename {
            from: document_path.to_path_buf(),
            to: new_path,
            source: e,
        });
    }

    debug!(
        from = %sanitize::redact_path(document_path),
        to = %sanitize::redact_path(&new_path),
        "Committed rename"
    );

    Ok(new_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn meta(date: &str, title: &str, addressee: &str) -> DocMetadata {
        DocMetadata {
            date: date.to_string(),
            title: title.to_string(),
            addressee: addressee.to_string(),
        }
    }

    #[test]
    fn test_file_name_format() {
        let m = meta("2024-03-01", "Invoice", "Maria");
        assert_eq!(file_name(&m), "2024-03-01 Invoice [Maria].pdf");
    }

    #[test]
    fn test_file_name_from_defaults() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let m = meta("", "", "").normalized(today);
        assert_eq!(file_name(&m), "2024-05-10 Untitled [Unknown].pdf");
    }

    #[test]
    fn test_file_name_sanitizes_separators() {
        let m = meta("2024-03-01", "../../etc/passwd", "Maria");
        let name = file_name(&m);
        assert!(!name.contains('/'));
        assert_eq!(name, "2024-03-01 .._.._etc_passwd [Maria].pdf");
    }

    #[test]
    fn test_commit_renames_in_same_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("scan_001.pdf");
        std::fs::write(&source, b"%PDF-1.5 content").unwrap();

        let new_path = commit(&source, &meta("2024-03-01", "Invoice", "Maria")).unwrap();

        assert_eq!(new_path, tmp.path().join("2024-03-01 Invoice [Maria].pdf"));
        assert!(!source.exists());
        assert!(new_path.exists());
    }

    #[test]
    fn test_commit_preserves_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("scan.pdf");
        let content = b"%PDF-1.5 some exact bytes".to_vec();
        std::fs::write(&source, &content).unwrap();

        let new_path = commit(&source, &meta("2024-03-01", "Invoice", "Maria")).unwrap();

        assert_eq!(std::fs::read(new_path).unwrap(), content);
    }

    #[test]
    fn test_commit_collision_leaves_source_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("scan.pdf");
        std::fs::write(&source, b"source").unwrap();

        let target = tmp.path().join("2024-03-01 Invoice [Maria].pdf");
        std::fs::write(&target, b"already here").unwrap();

        let result = commit(&source, &meta("2024-03-01", "Invoice", "Maria"));

        assert!(matches!(result, Err(CommitError::Collision(_))));
        assert!(source.exists());
        assert_eq!(std::fs::read(&source).unwrap(), b"source");
        assert_eq!(std::fs::read(&target).unwrap(), b"already here");
    }

    #[test]
    fn test_commit_leaves_single_directory_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("scan.pdf");
        std::fs::write(&source, b"content").unwrap();

        commit(&source, &meta("2024-03-01", "Invoice", "Maria")).unwrap();

        // The old name must be gone, not linger as a second link.
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_commit_collision_with_identical_bytes_still_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("scan.pdf");
        std::fs::write(&source, b"same bytes").unwrap();

        // A concurrent writer dropped a file under the computed name.
        let target = tmp.path().join("2024-03-01 Invoice [Maria].pdf");
        std::fs::write(&target, b"same bytes").unwrap();

        let result = commit(&source, &meta("2024-03-01", "Invoice", "Maria"));

        assert!(matches!(result, Err(CommitError::Collision(_))));
        assert!(source.exists());
        assert!(target.exists());
    }

    #[test]
    fn test_commit_onto_own_name_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("2024-03-01 Invoice [Maria].pdf");
        std::fs::write(&source, b"content").unwrap();

        let new_path = commit(&source, &meta("2024-03-01", "Invoice", "Maria")).unwrap();
        assert_eq!(new_path, source);
        assert!(source.exists());
    }

    #[test]
    fn test_commit_missing_source_is_rename_error() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("gone.pdf");

        let result = commit(&source, &meta("2024-03-01", "Invoice", "Maria"));
        assert!(matches!(result, Err(CommitError::Rename { .. })));
    }
}
