//! Capability-based filesystem helpers.

use std::io;
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path using ambient authority.
///
/// # Errors
/// Returns the I/O error raised while opening `path`.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create the parent directory of `path` if it is missing.
pub(crate) fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_root(parent)?;
    if relative.as_os_str().is_empty() {
        return Ok(());
    }
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    dir.create_dir_all(&relative)
}

/// Split `parent` into an ambient base directory and the path below it.
fn split_root(parent: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let mut components = parent.as_std_path().components();
    match components.next() {
        Some(Component::RootDir) => {
            let relative = Utf8PathBuf::from_path_buf(components.as_path().to_path_buf())
                .map_err(|_| io::Error::other("non-UTF-8 database path"))?;
            Ok((Utf8PathBuf::from("/"), relative))
        }
        Some(Component::Prefix(_)) => Err(io::Error::other(
            "prefixed database paths are not supported; use a relative path",
        )),
        _ => Ok((Utf8PathBuf::from("."), parent.to_path_buf())),
    }
}
