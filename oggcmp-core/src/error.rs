use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Duplicate sample id: {0}")]
    DuplicateSample(String),

    #[error("Duplicate variant id: {0}")]
    DuplicateVariant(String),

    #[error("Build failed for variant {variant}: {reason}")]
    Build { variant: String, reason: String },

    #[error("Failed to launch {executable} for sample {sample}")]
    Launch {
        executable: String,
        sample: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Reference output unavailable: {path}")]
    Reference {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_reference_error_leaves_cause_to_source_chain() {
        let err = HarnessError::Reference {
            path: "c_output/[decode_filename]_mono.out".to_owned(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };

        assert_eq!(
            err.to_string(),
            "Reference output unavailable: c_output/[decode_filename]_mono.out"
        );
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("gone"));
    }

    #[test]
    fn test_launch_error_leaves_cause_to_source_chain() {
        let err = HarnessError::Launch {
            executable: "bin/decode_filename".to_owned(),
            sample: "mono".to_owned(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(
            err.to_string(),
            "Failed to launch bin/decode_filename for sample mono"
        );
        assert!(!err.to_string().contains("denied"));
        assert!(err.source().is_some());
    }
}
