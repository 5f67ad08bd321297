use anyhow::Result;
use clap::{Parser, ValueEnum};
use oggcmp_core::variant::BuildProfile;
use std::process::ExitCode;
use tracing::{error, info};

mod app;

/// Exit status for configuration and harness I/O errors.
const EXIT_HARNESS_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "oggcmp - compare decoder output against reference output",
    long_about = None
)]
struct Args {
    /// Build profile for the decoder variants
    #[arg(value_enum, default_value_t = Profile::Debug)]
    profile: Profile,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Profile {
    Debug,
    Release,
}

impl From<Profile> for BuildProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Debug => BuildProfile::Debug,
            Profile::Release => BuildProfile::Release,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr, the case transcript owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting oggcmp v{}", env!("CARGO_PKG_VERSION"));

    match run(args.profile.into()) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_HARNESS_ERROR)
        }
    }
}

fn run(profile: BuildProfile) -> Result<ExitCode> {
    let config = oggcmp_core::config::Config::discover()?;

    info!("Configuration loaded");
    info!("Corpus directory: {}", config.paths.corpus_dir);
    info!("Reference directory: {}", config.paths.reference_dir);
    info!("Candidate directory: {}", config.paths.candidate_dir);

    let summary = app::run(&config, profile)?;
    Ok(ExitCode::from(summary.exit_code()))
}
