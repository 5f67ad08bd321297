//! Scratch workspace for end-to-end harness tests
//!
//! Lays out corpus, reference and candidate directories in a temp dir and
//! writes a fake decoder script that copies its input to its output. Per
//! sample behavior is controlled with sidecar files next to the corpus input:
//! - `<input>.exit` holds the exit code to return instead of decoding
//! - `<input>.nowrite` makes the decoder exit 0 without writing output
//!
//! Every invocation appends the input path to a log so tests can tell which
//! cases were actually started.
#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use oggcmp_core::config::Config;
use oggcmp_core::test_utils::config_in;
use oggcmp_runner::{ContentDigest, Digester, Sha256Digester};
use std::cell::Cell;
use std::io;
use tempfile::TempDir;

pub struct Workspace {
    _temp: TempDir,
    pub root: Utf8PathBuf,
    log: Utf8PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .expect("temp dir must be UTF-8");
        for dir in ["corpus", "reference", "bin"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        let log = root.join("invocations.log");

        Self {
            _temp: temp,
            root,
            log,
        }
    }

    pub fn corpus_path(&self, sample: &str) -> Utf8PathBuf {
        self.root.join("corpus").join(format!("{sample}.ogg"))
    }

    /// Add a corpus input; the fake decoder's output is these same bytes.
    pub fn add_sample(&self, sample: &str, content: &[u8]) {
        std::fs::write(self.corpus_path(sample), content).unwrap();
    }

    pub fn set_reference(&self, variant: &str, sample: &str, content: &[u8]) {
        let path = self
            .root
            .join("reference")
            .join(format!("[{variant}]_{sample}.out"));
        std::fs::write(path, content).unwrap();
    }

    pub fn candidate_path(&self, variant: &str, sample: &str) -> Utf8PathBuf {
        self.root
            .join("candidate")
            .join(format!("[{variant}]_{sample}.out"))
    }

    /// Make the decoder fail with `code` for `sample`.
    pub fn set_exit(&self, sample: &str, code: i32) {
        std::fs::write(format!("{}.exit", self.corpus_path(sample)), code.to_string()).unwrap();
    }

    pub fn set_no_write(&self, sample: &str) {
        std::fs::write(format!("{}.nowrite", self.corpus_path(sample)), b"").unwrap();
    }

    /// Write an executable fake decoder named `name`.
    #[cfg(unix)]
    pub fn decoder(&self, name: &str) -> Utf8PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.join("bin").join(name);
        let script = format!(
            r#"#!/bin/sh
echo "{name} $1" >> '{log}'
if [ -f "$1.exit" ]; then
    exit "$(cat "$1.exit")"
fi
if [ -f "$1.nowrite" ]; then
    exit 0
fi
cp "$1" "$2"
"#,
            log = self.log
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// `(decoder, sample)` pairs in invocation order.
    pub fn invocations(&self) -> Vec<(String, String)> {
        let Ok(log) = std::fs::read_to_string(&self.log) else {
            return Vec::new();
        };

        log.lines()
            .filter_map(|line| {
                let (decoder, input) = line.split_once(' ')?;
                let sample = Utf8Path::new(input).file_stem()?.to_owned();
                Some((decoder.to_owned(), sample))
            })
            .collect()
    }

    pub fn config(
        &self,
        variants: &[(&str, &Utf8Path)],
        samples: &[(&str, Option<i32>)],
    ) -> Config {
        config_in(&self.root, variants, samples)
    }
}

/// SHA-256 digester that counts how often it runs.
#[derive(Default)]
pub struct CountingDigester {
    pub calls: Cell<usize>,
}

impl Digester for CountingDigester {
    fn digest(&self, path: &Utf8Path) -> io::Result<ContentDigest> {
        self.calls.set(self.calls.get() + 1);
        Sha256Digester.digest(path)
    }
}

/// Transcript lines with the per-case timing stripped.
pub fn untimed_lines(transcript: &str) -> Vec<String> {
    transcript
        .lines()
        .map(|line| match line.find(" in ") {
            Some(pos) if line.ends_with("seconds") || line.ends_with("seconds total") => {
                line[..pos].to_owned()
            }
            _ => line.to_owned(),
        })
        .collect()
}
