use anyhow::Result;
use clap::Parser;
use sar_cli::init_tracing;
use sar_core::{
    offset, GeoPoint, QuadrilateralArea, SearchArea, SimpleQuadStrategy, GROUND_SENSOR_SCOPE_M,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print the sweep over a rectangle as CSV", long_about = None)]
struct Args {
    /// Rectangle center latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Rectangle center longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Width across the heading, meters
    #[arg(long, default_value_t = 200.0)]
    width: f64,

    /// Length along the heading, meters
    #[arg(long, default_value_t = 400.0)]
    length: f64,

    /// Heading of the long side, degrees from north
    #[arg(long, default_value_t = 0.0)]
    heading: f64,

    /// Maximum distance between passes in meters
    #[arg(long, default_value_t = GROUND_SENSOR_SCOPE_M)]
    spacing: f64,

    /// Drone latitude; defaults to the first corner
    #[arg(long, allow_hyphen_values = true, requires = "drone_lon")]
    drone_lat: Option<f64>,

    /// Drone longitude; defaults to the first corner
    #[arg(long, allow_hyphen_values = true, requires = "drone_lat")]
    drone_lon: Option<f64>,
}

/// Corners of a rectangle in drawing order.
fn rectangle(center: &GeoPoint, width: f64, length: f64, heading: f64) -> Vec<GeoPoint> {
    let back = offset(center, length / 2.0, heading + 180.0);
    let front = offset(center, length / 2.0, heading);
    vec![
        offset(&back, width / 2.0, heading - 90.0),
        offset(&back, width / 2.0, heading + 90.0),
        offset(&front, width / 2.0, heading + 90.0),
        offset(&front, width / 2.0, heading - 90.0),
    ]
}

fn main() -> Result<()> {
    init_tracing("sweep_preview")?;
    let args = Args::parse();

    let center = GeoPoint::new(args.lat, args.lon)?;
    let corners = rectangle(&center, args.width, args.length, args.heading);
    let drone = match (args.drone_lat, args.drone_lon) {
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon)?,
        _ => corners[0],
    };

    let strategy = SimpleQuadStrategy::new(args.spacing)?;
    let area = SearchArea::Quadrilateral(QuadrilateralArea::new(corners));
    let path = strategy.create_flight_path(drone, &area)?;
    tracing::info!("{} waypoints at {} m spacing", path.len(), args.spacing);

    println!("index,lat,lon");
    for (index, point) in path.iter().enumerate() {
        println!("{},{:.7},{:.7}", index, point.lat, point.lon);
    }

    Ok(())
}
