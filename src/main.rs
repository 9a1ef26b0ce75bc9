//! # Hospital-route CLI
//!
//! Command-line interface for the hospital-route library.
//! Looks up the driving route between two hospitals and prints distance and
//! travel time, with optional spreadsheet export and map output.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use hospital_route::{
    Endpoint, OverwriteBehavior, Outcome, RouteClient, RouteConfig, Session, DEFAULT_BASE_URL,
    DEFAULT_DATASET_PATH, DEFAULT_EXPORT_FILENAME, DEFAULT_PROFILE, DEFAULT_SPEED_KMH,
    MAX_SPEED_KMH, MIN_SPEED_KMH,
};
use log::{debug, error};

mod cli;

/// Command-line interface for hospital-route
#[derive(Parser, Debug)]
#[command(name = "hospital-route")]
#[command(about = "Driving distance and travel time between two hospitals")]
#[command(long_about = "Looks up driving routes between hospitals using OpenRouteService:
  hospital-route states                                  # List states in the dataset
  hospital-route hospitals Selangor                      # List hospitals in a state
  hospital-route route --from \"Hospital Ampang\" \\
                       --to \"Hospital Melaka\" --export   # Route and save hospital_route.xlsx
  hospital-route interactive                             # Choose hospitals step by step

The API key is read from --api-key or the ORS_API_KEY environment variable.

File Overwrite Behavior:
  By default, you'll be prompted if the export file exists
  --force                          # Overwrite without asking
  --no-clobber                     # Never overwrite, fail if file exists")]
#[command(version = env!("HOSPITAL_ROUTE_VERSION"))]
struct Cli {
    /// Hospital dataset (.xlsx, .xls, .ods or .csv)
    #[arg(long, global = true, default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// OpenRouteService base URL
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Routing profile
    #[arg(long, global = true, default_value = DEFAULT_PROFILE)]
    profile: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the states in the dataset
    States,
    /// List the hospitals in a state
    Hospitals {
        /// State name
        state: String,
    },
    /// Look up the route between two hospitals
    Route(RouteArgs),
    /// Choose hospitals and settings at a prompt
    Interactive(CredentialArgs),
}

#[derive(Args, Debug)]
struct CredentialArgs {
    /// OpenRouteService API key
    #[arg(long, env = "ORS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Average driving speed in km/h
    #[arg(
        long,
        default_value_t = DEFAULT_SPEED_KMH,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_SPEED_KMH)..=i64::from(MAX_SPEED_KMH))
    )]
    speed: u32,
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Hospital A
    #[arg(long)]
    from: String,

    /// Hospital B
    #[arg(long)]
    to: String,

    #[command(flatten)]
    credentials: CredentialArgs,

    /// Export the summary (.xlsx, or .csv by extension)
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILENAME)]
    export: Option<PathBuf>,

    /// Write the map (.html for a Leaflet page, otherwise GeoJSON)
    #[arg(long)]
    map: Option<PathBuf>,

    /// Show the request that would be made without sending it
    #[arg(long)]
    dry_run: bool,

    /// Force overwrite existing files without prompting
    #[arg(short, long)]
    force: bool,

    /// Never overwrite existing files (fail if destination exists)
    #[arg(long)]
    no_clobber: bool,
}

impl RouteArgs {
    fn overwrite_behavior(&self) -> anyhow::Result<OverwriteBehavior> {
        match (self.force, self.no_clobber) {
            (true, true) => bail!("--force and --no-clobber cannot be used together"),
            (true, false) => Ok(OverwriteBehavior::Force),
            (false, true) => Ok(OverwriteBehavior::NeverOverwrite),
            (false, false) => Ok(OverwriteBehavior::Prompt),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let mut logger = env_logger::Builder::from_default_env();
    logger.target(env_logger::Target::Stderr);
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if cli.verbose {
        eprintln!("🏥 Hospital-route v{} starting...", env!("HOSPITAL_ROUTE_VERSION"));
    }

    let dataset = hospital_route::load_dataset(&cli.dataset)
        .with_context(|| format!("Failed to load dataset {}", cli.dataset.display()))?;

    let client = RouteClient::with_config(RouteConfig {
        base_url: cli.base_url.clone(),
        profile: cli.profile.clone(),
        ..Default::default()
    });
    debug!("Directions endpoint: {}", client.config().directions_url());

    match cli.command {
        Command::States => {
            for state in dataset.states() {
                println!("{state}");
            }
        }
        Command::Hospitals { state } => {
            let state = dataset.resolve_state(&state)?;
            for hospital in dataset.hospitals_in(state) {
                println!("{hospital}");
            }
        }
        Command::Route(args) => route(Session::new(dataset), &client, args).await?,
        Command::Interactive(args) => {
            let mut session = Session::new(dataset);
            if let Some(key) = args.api_key {
                session.set_api_key(key);
            }
            session.set_speed_kmh(args.speed)?;

            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            cli::prompt::run_prompt(&mut session, &client, input, &mut stdout).await?;
        }
    }

    Ok(())
}

/// One-shot lookup between two named hospitals
async fn route(mut session: Session, client: &RouteClient, args: RouteArgs) -> anyhow::Result<()> {
    let overwrite = args.overwrite_behavior()?;

    if let Some(key) = &args.credentials.api_key {
        session.set_api_key(key.as_str());
    }
    session.set_speed_kmh(args.credentials.speed)?;
    session.select_hospital(Endpoint::A, &args.from)?;
    session.select_hospital(Endpoint::B, &args.to)?;

    if args.dry_run {
        let url = client.config().directions_url();
        eprintln!("🔍 [DRY RUN] Would request: {} → {} via {url}", args.from, args.to);
        return Ok(());
    }

    let spinner = session
        .selection()
        .api_key()
        .map(|_| cli::ProgressManager::new(&format!("🌐 Routing {} → {}", args.from, args.to)));
    session.evaluate(client).await;
    if let Some(spinner) = spinner {
        spinner.finish();
    }

    if let Some(path) = &args.map {
        cli::write_map(&session.view().map, path)
            .with_context(|| format!("Failed to write map {}", path.display()))?;
        eprintln!("🗺️  Map written to {}", path.display());
    }

    match session.outcome() {
        Outcome::Routed { summary, .. } => {
            cli::print_summary(&mut std::io::stdout(), summary)?;
            if let Some(path) = &args.export {
                hospital_route::export_to_file(summary, path, overwrite)?;
                eprintln!("📤 Exported route info to {}", path.display());
            }
        }
        Outcome::Failed(err) => {
            return Err(anyhow::Error::new(err.clone()).context("Error calculating route"));
        }
        outcome => cli::print_outcome(&mut std::io::stdout(), outcome)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_args_defaults() {
        let cli = Cli::try_parse_from([
            "hospital-route",
            "route",
            "--from",
            "Hospital Ampang",
            "--to",
            "Hospital Melaka",
        ])
        .unwrap();

        assert_eq!(cli.dataset, PathBuf::from("Malaysia Hospital.xlsx"));
        assert_eq!(cli.profile, "driving-car");
        match cli.command {
            Command::Route(args) => {
                assert_eq!(args.credentials.speed, 80);
                assert_eq!(args.export, None);
                assert_eq!(args.overwrite_behavior().unwrap(), OverwriteBehavior::Prompt);
            }
            other => panic!("Expected route command, got {other:?}"),
        }
    }

    #[test]
    fn test_export_flag_without_value_uses_default_name() {
        let cli = Cli::try_parse_from([
            "hospital-route",
            "route",
            "--from",
            "A",
            "--to",
            "B",
            "--export",
            "--dataset",
            "hospitals.csv",
        ])
        .unwrap();

        assert_eq!(cli.dataset, PathBuf::from("hospitals.csv"));
        match cli.command {
            Command::Route(args) => {
                assert_eq!(args.export, Some(PathBuf::from("hospital_route.xlsx")));
            }
            other => panic!("Expected route command, got {other:?}"),
        }
    }

    #[test]
    fn test_speed_outside_bounds_is_rejected() {
        for speed in ["9", "201"] {
            let result = Cli::try_parse_from([
                "hospital-route",
                "interactive",
                "--speed",
                speed,
            ]);
            assert!(result.is_err(), "speed {speed} should be rejected");
        }

        assert!(Cli::try_parse_from(["hospital-route", "interactive", "--speed", "200"]).is_ok());
    }

    #[test]
    fn test_conflicting_overwrite_flags() {
        let cli = Cli::try_parse_from([
            "hospital-route",
            "route",
            "--from",
            "A",
            "--to",
            "B",
            "--force",
            "--no-clobber",
        ])
        .unwrap();

        match cli.command {
            Command::Route(args) => assert!(args.overwrite_behavior().is_err()),
            other => panic!("Expected route command, got {other:?}"),
        }
    }
}
