use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cargo profile the decoder binaries are built with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildProfile {
    #[default]
    Debug,
    Release,
}

impl BuildProfile {
    /// Name of the profile's directory under `target/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildProfile::Debug => "debug",
            BuildProfile::Release => "release",
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One build/invocation mode of the decoder under test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BinaryVariant {
    pub id: String,
    /// Executable path template; falls back to the build section's template.
    #[serde(default)]
    pub executable: Option<String>,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Whether the build step runs for this variant.
    #[serde(default = "default_true")]
    pub build: bool,
}

fn default_args() -> Vec<String> {
    vec!["{input}".to_owned(), "{output}".to_owned()]
}

fn default_true() -> bool {
    true
}

impl BinaryVariant {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            executable: None,
            args: default_args(),
            build: true,
        }
    }

    /// A variant whose executable already exists and is never built.
    pub fn prebuilt(id: impl Into<String>, executable: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            executable: Some(executable.into()),
            args: default_args(),
            build: false,
        }
    }

    /// Resolve the executable for `profile`, relative paths against `base`.
    pub fn executable_path(
        &self,
        base: &Utf8Path,
        profile: BuildProfile,
        default_template: &str,
    ) -> Utf8PathBuf {
        let template = self.executable.as_deref().unwrap_or(default_template);
        let mut rendered = expand(template, &self.vars(profile));
        if self.executable.is_none() && !rendered.ends_with(std::env::consts::EXE_SUFFIX) {
            rendered.push_str(std::env::consts::EXE_SUFFIX);
        }

        let path = Utf8PathBuf::from(rendered);
        if path.is_absolute() {
            path
        } else {
            base.join(path)
        }
    }

    /// Arguments for one decode of `input` into `output`.
    pub fn invocation_args(&self, input: &Utf8Path, output: &Utf8Path) -> Vec<String> {
        let vars = [
            ("input", input.as_str()),
            ("output", output.as_str()),
            ("variant", self.id.as_str()),
        ];
        self.args.iter().map(|arg| expand(arg, &vars)).collect()
    }

    /// File name shared by reference and candidate outputs: `[variant]_sample.out`.
    pub fn output_file_name(&self, sample_id: &str) -> String {
        format!("[{}]_{}.out", self.id, sample_id)
    }

    pub fn vars(&self, profile: BuildProfile) -> [(&str, &str); 2] {
        [("variant", self.id.as_str()), ("profile", profile.as_str())]
    }
}

/// Replace every `{name}` in `template` with its value from `vars`.
///
/// Unknown placeholders are left untouched.
pub fn expand(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_owned();
    for (name, value) in vars {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
