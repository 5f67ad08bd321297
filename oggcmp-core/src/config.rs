use crate::corpus::{CorpusRegistry, SampleCase, default_samples};
use crate::error::{HarnessError, Result};
use crate::variant::BinaryVariant;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "OGGCMP_CONFIG";

const CONFIG_FILE_NAME: &str = "oggcmp.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default = "default_variants", rename = "variant")]
    pub variants: Vec<BinaryVariant>,
    #[serde(default = "default_samples", rename = "sample")]
    pub samples: Vec<SampleCase>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: Utf8PathBuf,
    #[serde(default = "default_corpus_extension")]
    pub corpus_extension: String,
    #[serde(default = "default_reference_dir")]
    pub reference_dir: Utf8PathBuf,
    #[serde(default = "default_candidate_dir")]
    pub candidate_dir: Utf8PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    #[serde(default = "default_build_program")]
    pub program: String,
    #[serde(default = "default_build_args")]
    pub args: Vec<String>,
    #[serde(default = "default_release_args")]
    pub release_args: Vec<String>,
    /// Directory the build runs in and executable templates resolve against.
    #[serde(default = "default_working_dir")]
    pub working_dir: Utf8PathBuf,
    #[serde(default = "default_executable")]
    pub executable: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            corpus_dir: default_corpus_dir(),
            corpus_extension: default_corpus_extension(),
            reference_dir: default_reference_dir(),
            candidate_dir: default_candidate_dir(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_build_program(),
            args: default_build_args(),
            release_args: default_release_args(),
            working_dir: default_working_dir(),
            executable: default_executable(),
        }
    }
}

// Default value functions
fn default_corpus_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("ogg")
}

fn default_corpus_extension() -> String {
    "ogg".to_owned()
}

fn default_reference_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("c_output")
}

fn default_candidate_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("rust_output")
}

fn default_build_program() -> String {
    "cargo".to_owned()
}

fn default_build_args() -> Vec<String> {
    vec![
        "build".to_owned(),
        "--example".to_owned(),
        "{variant}".to_owned(),
    ]
}

fn default_release_args() -> Vec<String> {
    vec!["--release".to_owned()]
}

fn default_working_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("..")
}

fn default_executable() -> String {
    "target/{profile}/examples/{variant}".to_owned()
}

fn default_variants() -> Vec<BinaryVariant> {
    vec![
        BinaryVariant::new("decode_filename"),
        BinaryVariant::new("decode_frame_pushdata"),
    ]
}

impl Config {
    /// Locate and load the configuration, or fall back to the built-in one.
    ///
    /// `$OGGCMP_CONFIG` wins when set; a file it names must load.
    pub fn discover() -> Result<Self> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from_path(PathBuf::from(explicit));
        }

        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => {
                tracing::info!("No {} found, using built-in corpus", CONFIG_FILE_NAME);
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config = Self::parse(&content)?;

        if let Some(parent) = path.parent().and_then(|p| Utf8Path::from_path(p)) {
            config.resolve_relative_to(parent);
        }

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document without touching the filesystem.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| HarnessError::Config(format!("Failed to parse config: {}", e)))?;
        config.expand_paths();
        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            Some(PathBuf::from(CONFIG_FILE_NAME)),
            dirs::config_dir().map(|p| p.join("oggcmp").join(CONFIG_FILE_NAME)),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|candidate| candidate.exists())
    }

    fn expand_paths(&mut self) {
        fn expand_tilde(path: &Utf8PathBuf) -> Utf8PathBuf {
            let path_str = path.as_str();
            if path_str.starts_with("~/") {
                if let Some(home) = dirs::home_dir() {
                    if let Some(home_str) = home.to_str() {
                        return Utf8PathBuf::from(path_str.replacen('~', home_str, 1));
                    }
                }
            }
            path.clone()
        }

        self.paths.corpus_dir = expand_tilde(&self.paths.corpus_dir);
        self.paths.reference_dir = expand_tilde(&self.paths.reference_dir);
        self.paths.candidate_dir = expand_tilde(&self.paths.candidate_dir);
        self.build.working_dir = expand_tilde(&self.build.working_dir);
    }

    /// Anchor relative directories at the directory holding the config file.
    fn resolve_relative_to(&mut self, base: &Utf8Path) {
        if base.as_str().is_empty() {
            return;
        }

        for dir in [
            &mut self.paths.corpus_dir,
            &mut self.paths.reference_dir,
            &mut self.paths.candidate_dir,
            &mut self.build.working_dir,
        ] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(HarnessError::Config("No variants configured".to_owned()));
        }

        let mut seen = HashSet::new();
        for variant in &self.variants {
            if variant.id.trim().is_empty() {
                return Err(HarnessError::Config("Variant with empty id".to_owned()));
            }
            if !seen.insert(variant.id.as_str()) {
                return Err(HarnessError::DuplicateVariant(variant.id.clone()));
            }
        }

        // Surfaces duplicate sample ids before anything is built
        self.registry()?;

        if !self.paths.corpus_dir.is_dir() {
            return Err(HarnessError::Config(format!(
                "Corpus directory not found: {}",
                self.paths.corpus_dir
            )));
        }
        Ok(())
    }

    pub fn registry(&self) -> Result<CorpusRegistry> {
        CorpusRegistry::new(self.samples.clone())
    }

    /// Corpus input for `sample_id`: `<corpus-dir>/<sample-id>.<ext>`.
    pub fn input_path(&self, sample_id: &str) -> Utf8PathBuf {
        self.paths
            .corpus_dir
            .join(format!("{}.{}", sample_id, self.paths.corpus_extension))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            build: BuildConfig::default(),
            variants: default_variants(),
            samples: default_samples(),
        }
    }
}
