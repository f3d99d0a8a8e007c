use std::process::ExitCode;

use clap::Parser;
use photon_forge::{utils::api, utils::diagnostics::DIAGNOSTICS, Integrator};
use tracing_subscriber::EnvFilter;

/// Renders a scene described by a TOML scene file.
#[derive(Parser, Debug)]
#[command(name = "photon-forge", version, about)]
struct Args {
    /// Path to the TOML scene description.
    #[arg(long)]
    input: String,

    /// Worker threads to use for rendering. 0 selects the number of
    /// logical cores automatically.
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Overrides the scene's film.filename.
    #[arg(long)]
    output: Option<String>,

    /// Overrides the scene's sampler.pixelSamples.
    #[arg(long)]
    spp: Option<usize>,

    /// Overrides the scene's RNG seed (currently informational; each tile
    /// still derives its own seed from its tile index).
    #[arg(long)]
    seed: Option<u64>,

    /// Raises the log level from info to debug.
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if args.threads > 0 {
        if let Err(err) = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
        {
            tracing::warn!(%err, "failed to configure thread pool, using rayon's default");
        }
    }

    let job = match api::load_scene(&args.input, args.spp) {
        Ok(job) => job,
        Err(err) => {
            tracing::error!(error = %err, "failed to load scene");
            return ExitCode::from(err.exit_code() as u8);
        }
    };

    if let Some(output) = &args.output {
        tracing::info!(output, "overriding film output path");
    }
    if let Some(seed) = args.seed {
        tracing::info!(seed, "overriding base RNG seed");
    }

    tracing::info!(input = %args.input, "starting render");
    job.integrator.render(&job.scene);

    tracing::info!(
        degenerate_geometry = DIAGNOSTICS.degenerate_geometry_count(),
        numeric_anomalies = DIAGNOSTICS.numeric_anomaly_count(),
        "render complete"
    );

    ExitCode::SUCCESS
}
