//! Lookup of commands and libraries by name
//!
//! Lets `finfo python3` inspect the binary a shell would run, and
//! `finfo --lib ssl` list the matching library files.

use std::env;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use tracing::debug;

use crate::error::{FinfoError, Result};

/// Directories searched for libraries before the loader environment variables.
const LIBRARY_DIRS: &[&str] = &[
    "/usr/lib",
    "/usr/local/lib",
    "/opt/homebrew/lib",
    "/lib",
    "/usr/lib64",
    "/usr/local/lib64",
];

const LIBRARY_EXTENSIONS: &[&str] = &[".dylib", ".so", ".a"];

/// True if `input` is a bare name rather than a path.
pub fn is_bare_name(input: &Path) -> bool {
    let mut components = input.components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}

/// Make `path` absolute and drop `.` and `..` components lexically.
///
/// Symlinks are left in place, so a link given on the command line is
/// still inspected as the link itself.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| FinfoError::from_io(path, e))?;
    Ok(clean_path(&absolute))
}

/// Lexically normalize a path. `..` at the root stays at the root.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Find `name` in the directories listed in `PATH`.
pub fn resolve_command(name: &str) -> Result<PathBuf> {
    let path_var = env::var_os("PATH").unwrap_or_default();
    resolve_command_in(name, &path_var)
}

/// Find `name` in the directories of a `PATH`-style list.
pub fn resolve_command_in(name: &str, path_var: &OsStr) -> Result<PathBuf> {
    env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| FinfoError::NotFound(PathBuf::from(name)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Library search path: the standard directories plus the loader variables.
pub fn library_search_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = LIBRARY_DIRS.iter().map(PathBuf::from).collect();
    for var in ["LD_LIBRARY_PATH", "DYLD_LIBRARY_PATH"] {
        if let Some(value) = env::var_os(var) {
            dirs.extend(env::split_paths(&value).filter(|d| !d.as_os_str().is_empty()));
        }
    }
    dirs
}

/// Find library files for `name` (`ssl`, `libssl`, `libssl.so` all work).
pub fn find_library(name: &str) -> Result<Vec<PathBuf>> {
    find_library_in(name, &library_search_dirs())
}

/// Find library files for `name` in the given directories.
///
/// Results are sorted and deduplicated.
pub fn find_library_in(name: &str, dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let base = library_base_name(name);
    if base.is_empty() {
        return Err(FinfoError::InvalidArgument(format!(
            "'{}' is not a library name",
            name
        )));
    }

    let escaped = Pattern::escape(base);
    let patterns = [
        format!("lib{}.dylib", escaped),
        format!("lib{}.so", escaped),
        format!("lib{}.so.*", escaped),
        format!("lib{}.a", escaped),
        format!("{}.dylib", escaped),
        format!("{}.so", escaped),
        format!("{}.a", escaped),
    ];

    let mut found = Vec::new();
    for dir in dirs.iter().filter(|d| d.is_dir()) {
        let escaped_dir = Pattern::escape(&dir.to_string_lossy());
        for pattern in &patterns {
            let full = format!("{}/{}", escaped_dir, pattern);
            match glob::glob(&full) {
                Ok(paths) => found.extend(paths.filter_map(|p| p.ok())),
                Err(err) => debug!(pattern = %full, error = %err, "bad library pattern"),
            }
        }
    }

    found.sort();
    found.dedup();

    if found.is_empty() {
        return Err(FinfoError::NotFound(PathBuf::from(name)));
    }
    Ok(found)
}

/// Strip a `lib` prefix and a library extension from a name.
fn library_base_name(name: &str) -> &str {
    let mut base = name.strip_prefix("lib").unwrap_or(name);
    for ext in LIBRARY_EXTENSIONS {
        if let Some(stripped) = base.strip_suffix(ext) {
            base = stripped;
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/tmp/b/../a/f.txt")), PathBuf::from("/tmp/a/f.txt"));
        assert_eq!(clean_path(Path::new("/tmp/./a//f")), PathBuf::from("/tmp/a/f"));
        assert_eq!(clean_path(Path::new("/../etc")), PathBuf::from("/etc"));
        assert_eq!(clean_path(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_absolute_path_has_no_dot_segments() {
        let resolved = absolute_path(Path::new("../x/./y")).unwrap();
        assert!(resolved.is_absolute());
        assert!(
            !resolved
                .components()
                .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
        );
        assert!(resolved.ends_with("x/y"));
    }

    #[test]
    fn test_is_bare_name() {
        assert!(is_bare_name(Path::new("python3")));
        assert!(!is_bare_name(Path::new("./python3")));
        assert!(!is_bare_name(Path::new("bin/python3")));
        assert!(!is_bare_name(Path::new("/usr/bin/python3")));
    }

    #[test]
    fn test_library_base_name() {
        assert_eq!(library_base_name("ssl"), "ssl");
        assert_eq!(library_base_name("libssl"), "ssl");
        assert_eq!(library_base_name("libssl.so"), "ssl");
        assert_eq!(library_base_name("libz.dylib"), "z");
        assert_eq!(library_base_name("lib"), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_command_in_path_list() {
        use std::os::unix::fs::PermissionsExt;

        let empty = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        let tool = bin.path().join("mytool");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let path_var = env::join_paths([empty.path(), bin.path()]).unwrap();
        assert_eq!(resolve_command_in("mytool", &path_var).unwrap(), tool);

        let err = resolve_command_in("not-a-real-tool", &path_var).unwrap_err();
        assert!(matches!(err, FinfoError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_skips_non_executable() {
        let bin = TempDir::new().unwrap();
        fs::write(bin.path().join("data"), "x").unwrap();
        let path_var = OsString::from(bin.path().as_os_str());
        assert!(resolve_command_in("data", &path_var).is_err());
    }

    #[test]
    fn test_find_library_in_dirs() {
        let libs = TempDir::new().unwrap();
        for name in ["libfoo.so", "libfoo.so.1.2", "libfoo.a", "libbar.so", "foo.txt"] {
            fs::write(libs.path().join(name), "").unwrap();
        }

        let found = find_library_in("foo", &[libs.path().to_path_buf()]).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["libfoo.a", "libfoo.so", "libfoo.so.1.2"]);

        let missing = find_library_in("nothing", &[libs.path().to_path_buf()]);
        assert!(matches!(missing, Err(FinfoError::NotFound(_))));
    }
}
