use anyhow::{bail, Context, Result};
use clap::Parser;
use sar_cli::{init_tracing, AreaFile, MissionReport};
use sar_core::{GeoPoint, MissionBuilder, PlannerConfig, StrategyKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan a coverage mission over a search area", long_about = None)]
struct Args {
    /// Area file: {"shape": "quadrilateral|circle|polygon", "vertices": [{"lat", "lon"}, ...]}
    #[arg(long)]
    area: PathBuf,

    /// Drone latitude (degrees)
    #[arg(long, allow_hyphen_values = true)]
    drone_lat: f64,

    /// Drone longitude (degrees)
    #[arg(long, allow_hyphen_values = true)]
    drone_lon: f64,

    /// zigzag or spiral; defaults to the one matching the area shape
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// JSON planner config; its fields override the SAR_* environment settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mission altitude in meters
    #[arg(long)]
    altitude: Option<f32>,

    /// Speed in m/s
    #[arg(long)]
    speed: Option<f32>,

    /// Maximum distance between passes in meters
    #[arg(long)]
    spacing: Option<f64>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn load_config(args: &Args) -> Result<PlannerConfig> {
    let mut config = PlannerConfig::from_env();
    if let Some(path) = &args.config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        config = config.with_json_overrides(&raw)?;
    }
    if let Some(altitude) = args.altitude {
        config.altitude_m = altitude;
    }
    if let Some(speed) = args.speed {
        config.speed_mps = speed;
    }
    if let Some(spacing) = args.spacing {
        config.ground_sensor_scope_m = spacing;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    init_tracing("plan_mission")?;
    let args = Args::parse();

    let config = load_config(&args)?;
    let area_file = AreaFile::load(&args.area)?;
    let area = area_file.to_search_area()?;
    let drone = GeoPoint::new(args.drone_lat, args.drone_lon)?;

    let kind = args.strategy.unwrap_or_else(|| area_file.default_strategy());
    let strategy = kind.instantiate(config.ground_sensor_scope_m)?;
    if !strategy.accepts_area(&area) {
        bail!("{} strategy cannot fly a {} area", kind, area.shape());
    }

    tracing::info!(
        "Planning {} mission over {} ({} vertices), spacing {} m",
        kind,
        area.shape(),
        area_file.vertices.len(),
        config.ground_sensor_scope_m
    );

    let mut builder = MissionBuilder::new(config.mission_params());
    builder
        .with_strategy(strategy)
        .with_search_area(Some(area))
        .with_starting_location(drone);
    let items = builder.build()?;

    let report = MissionReport::new(kind, items);
    tracing::info!(
        "{} waypoints, {:.0} m total",
        report.summary.waypoints,
        report.summary.total_distance_m
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
