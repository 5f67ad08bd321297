use camino::Utf8Path;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io;

/// Hex-encoded content digest of an output file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    #[cfg(test)]
    pub(crate) fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the content digest of a file.
pub trait Digester {
    fn digest(&self, path: &Utf8Path) -> io::Result<ContentDigest>;
}

impl<D: Digester + ?Sized> Digester for &D {
    fn digest(&self, path: &Utf8Path) -> io::Result<ContentDigest> {
        (**self).digest(path)
    }
}

/// SHA-256 over the file contents, streamed through the hasher.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Digester;

impl Digester for Sha256Digester {
    fn digest(&self, path: &Utf8Path) -> io::Result<ContentDigest> {
        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(ContentDigest(format!("{:x}", hasher.finalize())))
    }
}
