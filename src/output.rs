//! Atomic output writing

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

/// Errors writing the finished document
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Write `contents` to `path` through a temporary file in the same directory
///
/// The temporary file is renamed over `path` only once everything has been
/// written, so a failed run never leaves a truncated or partial file behind.
/// A replaced file keeps its permissions; a new file gets the usual
/// `0666` less the umask rather than the private mode of a temporary file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), OutputError> {
    let wrap = |source: io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());
    let mut file = create_temp(dir, existing.is_none()).map_err(wrap)?;
    if let Some(permissions) = existing {
        file.as_file().set_permissions(permissions).map_err(wrap)?;
    }
    debug!("writing output through {}", file.path().display());
    file.write_all(contents.as_bytes()).map_err(wrap)?;
    file.as_file().sync_all().map_err(wrap)?;
    file.persist(path).map_err(|e| wrap(e.error))?;
    Ok(())
}

/// Temporary file beside the target; `fresh` means no file is being replaced
fn create_temp(dir: &Path, fresh: bool) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".svg-tiler");
    if fresh {
        set_default_mode(&mut builder);
    }
    builder.tempfile_in(dir)
}

#[cfg(unix)]
fn set_default_mode(builder: &mut Builder) {
    use std::os::unix::fs::PermissionsExt;
    // Creation applies the umask to this mode
    builder.permissions(fs::Permissions::from_mode(0o666));
}

#[cfg(not(unix))]
fn set_default_mode(_builder: &mut Builder) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.svg");

        write_atomic(&path, "<svg/>").expect("Should write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "<svg/>");
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.svg");
        fs::write(&path, "old contents that are longer").expect("write");

        write_atomic(&path, "new").expect("Should write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "new");
    }

    #[test]
    fn test_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("out.svg");

        let err = write_atomic(&path, "<svg/>").unwrap_err();
        assert!(err.to_string().contains("out.svg"));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_replacing_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.svg");
        fs::write(&path, "old").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");

        write_atomic(&path, "new").expect("Should write");
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).expect("chmod");
        write_atomic(&path, "newer").expect("Should write");
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_not_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.svg");
        let reference = dir.path().join("plain.svg");
        fs::write(&reference, "plain").expect("write");

        write_atomic(&path, "<svg/>").expect("Should write");
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        let plain = fs::metadata(&reference).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, plain & 0o777);
    }

    #[test]
    fn test_no_stray_temp_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.svg");

        write_atomic(&path, "<svg/>").expect("Should write");
        let entries = fs::read_dir(dir.path()).expect("read_dir").count();
        assert_eq!(entries, 1);
    }
}
