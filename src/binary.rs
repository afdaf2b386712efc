//! Executable image analysis
//!
//! Parses ELF and Mach-O images for the libraries they link against and
//! whether their symbol table has been stripped.

use std::fs;
use std::io;
use std::path::Path;

use goblin::Object;
use goblin::mach::Mach;
use serde::Serialize;
use tracing::debug;

use crate::filetype::FileTypeInfo;

/// Linked libraries listed in the detail view before truncating.
pub const LINKED_LIBS_PREVIEW: usize = 10;

/// What an executable image declares about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct BinaryInfo {
    pub is_executable: bool,
    pub is_stripped: bool,
    /// `DT_NEEDED` entries for ELF, load commands for Mach-O
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_libraries: Vec<String>,
    /// First signing authority reported by `codesign` (macOS only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl BinaryInfo {
    pub fn is_empty(&self) -> bool {
        !self.is_executable && self.linked_libraries.is_empty()
    }
}

/// Analyze `path` if its content was classified as binary.
///
/// Returns `Ok(None)` for non-binary content and for images goblin cannot
/// parse. Only read errors are reported.
pub fn analyze_binary(path: &Path, file_type: &FileTypeInfo) -> io::Result<Option<BinaryInfo>> {
    if !file_type.is_binary {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    Ok(analyze_bytes(&bytes, file_type).map(|mut info| {
        info.signature = code_signature(path);
        info
    }))
}

#[cfg(target_os = "macos")]
fn code_signature(path: &Path) -> Option<String> {
    let output = std::process::Command::new("codesign")
        .arg("-dv")
        .arg(path)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    // codesign writes its report to stderr
    signing_authority(&String::from_utf8_lossy(&output.stderr))
}

#[cfg(not(target_os = "macos"))]
fn code_signature(_path: &Path) -> Option<String> {
    None
}

/// The first `Authority=` value of a `codesign -dv` report.
pub fn signing_authority(report: &str) -> Option<String> {
    report
        .lines()
        .find_map(|line| line.trim().strip_prefix("Authority="))
        .map(|authority| authority.trim().to_string())
        .filter(|authority| !authority.is_empty())
}

/// Analyze an in-memory image.
pub fn analyze_bytes(bytes: &[u8], file_type: &FileTypeInfo) -> Option<BinaryInfo> {
    let labeled_executable = file_type.format.contains("executable");

    match Object::parse(bytes) {
        Ok(Object::Elf(elf)) => Some(BinaryInfo {
            // Position-independent executables are ET_DYN with an interpreter
            is_executable: labeled_executable || elf.interpreter.is_some(),
            is_stripped: elf.syms.is_empty(),
            linked_libraries: elf.libraries.iter().map(|lib| lib.to_string()).collect(),
            signature: None,
        }),
        Ok(Object::Mach(Mach::Binary(macho))) => Some(BinaryInfo {
            is_executable: labeled_executable
                || macho.header.filetype == goblin::mach::header::MH_EXECUTE,
            is_stripped: macho.symbols().next().is_none(),
            // goblin lists the image itself first as "self"
            linked_libraries: macho
                .libs
                .iter()
                .filter(|lib| **lib != "self")
                .map(|lib| lib.to_string())
                .collect(),
            signature: None,
        }),
        Ok(_) => None,
        Err(err) => {
            debug!(error = %err, "not a parseable executable image");
            None
        }
    }
}

/// Libraries to show, and how many were left out.
pub fn linked_libraries_preview(info: &BinaryInfo, full: bool) -> (&[String], usize) {
    let libs = info.linked_libraries.as_slice();
    if full || libs.len() <= LINKED_LIBS_PREVIEW {
        (libs, 0)
    } else {
        (&libs[..LINKED_LIBS_PREVIEW], libs.len() - LINKED_LIBS_PREVIEW)
    }
}

#[cfg(test)]
mod tests {
    use crate::filetype::detect_file_type;

    use super::*;

    fn libs(n: usize) -> BinaryInfo {
        BinaryInfo {
            is_executable: true,
            is_stripped: false,
            linked_libraries: (0..n).map(|i| format!("lib{}.so", i)).collect(),
            signature: None,
        }
    }

    #[test]
    fn test_signing_authority() {
        let report = "Executable=/usr/bin/tool\n\
                      Identifier=com.example.tool\n\
                      Authority=Developer ID Application: Example (ABCD1234)\n\
                      Authority=Developer ID Certification Authority\n";
        assert_eq!(
            signing_authority(report).as_deref(),
            Some("Developer ID Application: Example (ABCD1234)")
        );
        assert_eq!(signing_authority("Signature=adhoc\n"), None);
    }

    #[test]
    fn test_text_content_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "just words\n").unwrap();

        let info = detect_file_type(&path).unwrap();
        assert_eq!(analyze_binary(&path, &info).unwrap(), None);
    }

    #[test]
    fn test_truncated_elf_is_not_an_error() {
        let mut bytes = b"\x7fELF\x02\x01\x01".to_vec();
        bytes.resize(32, 0);
        let info = FileTypeInfo {
            format: "ELF executable".to_string(),
            is_binary: true,
            ..Default::default()
        };
        assert_eq!(analyze_bytes(&bytes, &info), None);
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn test_own_test_binary() {
        let exe = std::env::current_exe().unwrap();
        let file_type = detect_file_type(&exe).unwrap();
        assert!(file_type.is_binary);

        let info = analyze_binary(&exe, &file_type).unwrap().unwrap();
        assert!(info.is_executable);
        assert!(
            info.linked_libraries.iter().any(|lib| lib.starts_with("libc.so")),
            "{:?}",
            info.linked_libraries
        );
    }

    #[test]
    fn test_preview_truncates_after_ten() {
        let info = libs(13);
        let (shown, hidden) = linked_libraries_preview(&info, false);
        assert_eq!(shown.len(), 10);
        assert_eq!(hidden, 3);

        let (shown, hidden) = linked_libraries_preview(&info, true);
        assert_eq!(shown.len(), 13);
        assert_eq!(hidden, 0);
    }

    #[test]
    fn test_preview_keeps_short_lists() {
        let info = libs(10);
        assert_eq!(linked_libraries_preview(&info, false), (&info.linked_libraries[..], 0));
    }
}
