//! # Platform-specific utilities
//!
//! Questo modulo centralizza la gestione dei permessi del filesystem, l'unica
//! parte del programma che differisce tra Unix e le altre piattaforme.
//! Su piattaforme non Unix i permessi restano quelli di default.

use std::fs;
use std::io;
use std::path::Path;

/// Owner/group rwx, no world access
pub const PRIVATE_DIR_MODE: u32 = 0o770;
/// Owner/group rw, no world access
pub const PRIVATE_FILE_MODE: u32 = 0o660;

/// Filesystem permission helpers
pub struct Permissions;

impl Permissions {
    /// Create `dir` (and missing parents) and restrict it to owner/group.
    ///
    /// An existing directory is accepted as is.
    pub fn create_private_dir(dir: &Path) -> io::Result<()> {
        if dir.is_dir() {
            return Ok(());
        }

        Self::create_dir(dir)?;
        // the process umask may have masked group bits
        Self::set_mode(dir, PRIVATE_DIR_MODE)
    }

    /// Restrict a file to owner/group read-write.
    pub fn restrict_file(path: &Path) -> io::Result<()> {
        Self::set_mode(path, PRIVATE_FILE_MODE)
    }

    #[cfg(unix)]
    fn create_dir(dir: &Path) -> io::Result<()> {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new()
            .recursive(true)
            .mode(PRIVATE_DIR_MODE)
            .create(dir)
    }

    #[cfg(not(unix))]
    fn create_dir(dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    #[cfg(unix)]
    fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    fn set_mode(path: &Path, _mode: u32) -> io::Result<()> {
        fs::metadata(path).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_private_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a/.exif");

        Permissions::create_private_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // second call is a no-op
        Permissions::create_private_dir(&dir).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, PRIVATE_DIR_MODE);
        }
    }

    #[test]
    fn test_create_private_dir_blocked_by_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join(".exif");
        fs::write(&blocker, b"in the way").unwrap();

        assert!(Permissions::create_private_dir(&blocker).is_err());
    }

    #[test]
    fn test_restrict_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("meta.json");
        fs::write(&file, b"{}").unwrap();

        Permissions::restrict_file(&file).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, PRIVATE_FILE_MODE);
        }

        assert!(Permissions::restrict_file(&temp_dir.path().join("missing")).is_err());
    }
}
