use oggcmp_core::config::BuildConfig;
use oggcmp_core::error::{HarnessError, Result};
use oggcmp_core::variant::{BinaryVariant, BuildProfile, expand};
use std::process::Command;

/// Runs the external build step for each decoder variant.
///
/// Build output goes straight to the terminal; only the exit status matters.
pub struct BuildOrchestrator<'a> {
    config: &'a BuildConfig,
    profile: BuildProfile,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(config: &'a BuildConfig, profile: BuildProfile) -> Self {
        Self { config, profile }
    }

    /// Build every variant in order, stopping at the first failure.
    pub fn build_all(&self, variants: &[BinaryVariant]) -> Result<()> {
        for variant in variants {
            self.build(variant)?;
        }
        Ok(())
    }

    pub fn build(&self, variant: &BinaryVariant) -> Result<()> {
        if !variant.build {
            tracing::debug!("Variant {} is prebuilt, skipping build", variant.id);
            return Ok(());
        }

        let args = self.build_args(variant);
        tracing::info!(
            "Building {} ({}): {} {}",
            variant.id,
            self.profile,
            self.config.program,
            args.join(" ")
        );

        let status = Command::new(&self.config.program)
            .args(&args)
            .current_dir(self.config.working_dir.as_std_path())
            .status()
            .map_err(|e| HarnessError::Build {
                variant: variant.id.clone(),
                reason: format!("failed to run {}: {}", self.config.program, e),
            })?;

        if !status.success() {
            tracing::error!("Build of {} failed with {}", variant.id, status);
            return Err(HarnessError::Build {
                variant: variant.id.clone(),
                reason: format!("{} exited with {}", self.config.program, status),
            });
        }

        Ok(())
    }

    /// Rendered build arguments for `variant` under the current profile.
    pub fn build_args(&self, variant: &BinaryVariant) -> Vec<String> {
        let vars = variant.vars(self.profile);
        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| expand(arg, &vars))
            .collect();

        if self.profile == BuildProfile::Release {
            args.extend(self.config.release_args.iter().map(|arg| expand(arg, &vars)));
        }
        args
    }
}
