//! Content-based file type detection
//!
//! Looks at the first bytes of a file: executable magic numbers (ELF,
//! Mach-O), shebang lines, then a text/binary heuristic refined by the
//! file extension.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Serialize;

/// How many leading bytes are inspected.
const HEADER_LEN: u64 = 512;

/// Share of printable bytes above which content counts as text.
const TEXT_THRESHOLD: f64 = 0.95;

/// What the content of a file looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct FileTypeInfo {
    pub format: String,
    pub mime_type: String,
    pub is_text: bool,
    pub is_binary: bool,
    pub is_script: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Target architecture of an executable image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

impl FileTypeInfo {
    fn binary(format: &str, mime_type: &str) -> Self {
        Self {
            format: format.to_string(),
            mime_type: mime_type.to_string(),
            is_binary: true,
            ..Default::default()
        }
    }
}

/// Read the head of `path` and classify it.
pub fn detect_file_type(path: &Path) -> io::Result<FileTypeInfo> {
    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    File::open(path)?.take(HEADER_LEN).read_to_end(&mut header)?;
    Ok(classify(&header, path))
}

/// Classify file content from its leading bytes and name.
pub fn classify(header: &[u8], path: &Path) -> FileTypeInfo {
    if header.is_empty() {
        return FileTypeInfo {
            format: "Empty file".to_string(),
            mime_type: "inode/x-empty".to_string(),
            is_text: true,
            ..Default::default()
        };
    }

    if let Some(info) = detect_elf(header) {
        return info;
    }
    if let Some(info) = detect_macho(header) {
        return info;
    }
    if let Some(info) = detect_script(header) {
        return info;
    }

    let mut info = if is_text(header) {
        FileTypeInfo {
            format: "Text file".to_string(),
            mime_type: "text/plain".to_string(),
            is_text: true,
            encoding: Some("UTF-8".to_string()),
            ..Default::default()
        }
    } else {
        FileTypeInfo::binary("Binary file", "application/octet-stream")
    };

    if let Some((format, mime)) = extension_hint(path) {
        info.format = format.to_string();
        info.mime_type = mime.to_string();
    }
    info
}

fn detect_elf(header: &[u8]) -> Option<FileTypeInfo> {
    if header.len() < 20 || &header[..4] != b"\x7fELF" {
        return None;
    }

    let little_endian = header[5] != 2;
    let read_u16 = |offset: usize| {
        let bytes = [header[offset], header[offset + 1]];
        if little_endian {
            u16::from_le_bytes(bytes)
        } else {
            u16::from_be_bytes(bytes)
        }
    };

    let format = match read_u16(16) {
        1 => "ELF relocatable",
        3 => "ELF shared object",
        4 => "ELF core dump",
        _ => "ELF executable",
    };
    let arch = match read_u16(18) {
        0x03 => "x86",
        0x08 => "mips",
        0x14 => "powerpc",
        0x15 => "powerpc64",
        0x28 => "arm",
        0x3E => "x86_64",
        0xB7 => "aarch64",
        0xF3 => "riscv",
        _ => "unknown",
    };
    let bits = if header[4] == 2 { "64-bit" } else { "32-bit" };

    let mut info = FileTypeInfo::binary(format, "application/x-executable");
    info.arch = Some(format!("{} ({})", arch, bits));
    Some(info)
}

fn detect_macho(header: &[u8]) -> Option<FileTypeInfo> {
    if header.len() < 16 {
        return None;
    }

    let magic = [header[0], header[1], header[2], header[3]];
    let little_endian = match magic {
        [0xCE, 0xFA, 0xED, 0xFE] | [0xCF, 0xFA, 0xED, 0xFE] => true,
        [0xFE, 0xED, 0xFA, 0xCE] | [0xFE, 0xED, 0xFA, 0xCF] => false,
        _ => return None,
    };
    let read_u32 = |offset: usize| {
        let bytes = [
            header[offset],
            header[offset + 1],
            header[offset + 2],
            header[offset + 3],
        ];
        if little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        }
    };

    let format = match read_u32(12) {
        1 => "Mach-O object file",
        6 => "Mach-O dynamic library",
        8 => "Mach-O bundle",
        _ => "Mach-O executable",
    };
    let arch = match read_u32(4) {
        0x0000_0007 => "x86",
        0x0100_0007 => "x86_64",
        0x0000_000C => "arm",
        0x0100_000C => "arm64",
        _ => "unknown",
    };

    let mut info = FileTypeInfo::binary(format, "application/x-mach-binary");
    info.arch = Some(arch.to_string());
    Some(info)
}

fn detect_script(header: &[u8]) -> Option<FileTypeInfo> {
    let rest = header.strip_prefix(b"#!")?;
    let line_end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
    let interpreter = String::from_utf8_lossy(&rest[..line_end]).trim().to_string();

    let (format, mime) = if interpreter.contains("bash") {
        ("Bash script", "text/x-shellscript")
    } else if interpreter.contains("sh") {
        ("Shell script", "text/x-shellscript")
    } else if interpreter.contains("python") {
        ("Python script", "text/x-python")
    } else if interpreter.contains("perl") {
        ("Perl script", "text/x-perl")
    } else if interpreter.contains("ruby") {
        ("Ruby script", "text/x-ruby")
    } else if interpreter.contains("node") {
        ("Node.js script", "text/javascript")
    } else {
        ("Script", "text/plain")
    };

    Some(FileTypeInfo {
        format: format.to_string(),
        mime_type: mime.to_string(),
        is_text: true,
        is_script: true,
        interpreter: (!interpreter.is_empty()).then_some(interpreter),
        encoding: std::str::from_utf8(header)
            .is_ok()
            .then(|| "UTF-8".to_string()),
        ..Default::default()
    })
}

/// No NUL bytes, valid UTF-8, and mostly printable.
///
/// A multi-byte character cut off at the end of the header is tolerated.
pub fn is_text(data: &[u8]) -> bool {
    if data.is_empty() {
        return true;
    }
    if data.contains(&0) {
        return false;
    }
    match std::str::from_utf8(data) {
        Ok(_) => {}
        Err(e) if e.error_len().is_none() => {}
        Err(_) => return false,
    }

    let printable = data
        .iter()
        .filter(|&&b| (32..127).contains(&b) || b >= 0x80 || matches!(b, b'\n' | b'\r' | b'\t'))
        .count();
    printable as f64 / data.len() as f64 > TEXT_THRESHOLD
}

/// Format and MIME type implied by a well-known extension.
fn extension_hint(path: &Path) -> Option<(&'static str, &'static str)> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let hint = match ext.as_str() {
        "rs" => ("Rust source code", "text/x-rust"),
        "go" => ("Go source code", "text/x-go"),
        "c" => ("C source code", "text/x-c"),
        "cpp" | "cc" | "cxx" => ("C++ source code", "text/x-c++"),
        "h" | "hpp" => ("C/C++ header", "text/x-c"),
        "py" => ("Python source code", "text/x-python"),
        "js" => ("JavaScript", "text/javascript"),
        "json" => ("JSON", "application/json"),
        "xml" => ("XML", "application/xml"),
        "html" | "htm" => ("HTML", "text/html"),
        "css" => ("CSS", "text/css"),
        "md" | "markdown" => ("Markdown", "text/markdown"),
        "yaml" | "yml" => ("YAML", "text/yaml"),
        "toml" => ("TOML", "text/toml"),
        "zip" => ("ZIP archive", "application/zip"),
        "tar" => ("TAR archive", "application/x-tar"),
        "gz" => ("GZIP compressed", "application/gzip"),
        "pdf" => ("PDF document", "application/pdf"),
        "jpg" | "jpeg" => ("JPEG image", "image/jpeg"),
        "png" => ("PNG image", "image/png"),
        "gif" => ("GIF image", "image/gif"),
        _ => return None,
    };
    Some(hint)
}
