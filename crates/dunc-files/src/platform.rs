//! Platform differences for installation
//!
//! Symlinked installs are only used on Unix. Windows needs elevated rights or
//! developer mode to create file symlinks, so installs there always copy.

use std::io;
use std::path::Path;

#[cfg(unix)]
pub const SYMLINKS_SUPPORTED: bool = true;
#[cfg(not(unix))]
pub const SYMLINKS_SUPPORTED: bool = false;

/// Execute bits for owner, group and other
pub const EXECUTE_BITS: u32 = 0o111;

pub fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }
    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_file(target, link)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = (target, link);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinks are not supported on this platform",
        ))
    }
}

/// Add execute permission for everyone, keeping every existing bit
pub fn add_execute_bits(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(perms.mode() | EXECUTE_BITS);
        std::fs::set_permissions(path, perms)
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}

/// Whether two paths name the same file on disk, hard links included
pub fn same_file(a: &Path, b: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        match (std::fs::metadata(a), std::fs::metadata(b)) {
            (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
            _ => false,
        }
    }
    #[cfg(not(unix))]
    {
        match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}
