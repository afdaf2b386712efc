//! File checksums
//!
//! All digests are computed in a single read of the file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use md5::Md5;
use serde::Serialize;
use sha2::{Digest, Sha256, Sha512};

/// Lowercase hex digests of one file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checksums {
    pub md5: String,
    pub sha256: String,
    pub sha512: String,
    pub blake3: String,
}

impl Checksums {
    /// `(label, digest)` pairs in display order.
    pub fn labeled(&self) -> [(&'static str, &str); 4] {
        [
            ("MD5", &self.md5),
            ("SHA256", &self.sha256),
            ("SHA512", &self.sha512),
            ("BLAKE3", &self.blake3),
        ]
    }
}

/// Feeds every write into all hashers at once.
struct MultiHasher {
    md5: Md5,
    sha256: Sha256,
    sha512: Sha512,
    blake3: blake3::Hasher,
}

impl MultiHasher {
    fn new() -> Self {
        Self {
            md5: Md5::new(),
            sha256: Sha256::new(),
            sha512: Sha512::new(),
            blake3: blake3::Hasher::new(),
        }
    }

    fn finish(self) -> Checksums {
        Checksums {
            md5: format!("{:x}", self.md5.finalize()),
            sha256: format!("{:x}", self.sha256.finalize()),
            sha512: format!("{:x}", self.sha512.finalize()),
            blake3: self.blake3.finalize().to_hex().to_string(),
        }
    }
}

impl Write for MultiHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.md5.update(buf);
        self.sha256.update(buf);
        self.sha512.update(buf);
        self.blake3.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hash a file's contents with every supported algorithm.
pub fn hash_file(path: &Path) -> io::Result<Checksums> {
    let mut file = File::open(path)?;
    let mut hasher = MultiHasher::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finish())
}
