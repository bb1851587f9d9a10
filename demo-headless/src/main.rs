use anyhow::{bail, Context, Result};
use clap::Parser;
use fire_predict_core::{
    AnalysisRequest, DisasterType, Location, PredictionConfig, PredictionCoordinator,
    WeatherObservation,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Fire-spread prediction from the command line
///
/// Either pass a full JSON request (or an array of requests) with `--request`, or build
/// one from the individual flags. The result is written to stdout as JSON; logs go to
/// stderr (tune with `RUST_LOG`).
#[derive(Parser, Debug)]
#[command(name = "fire-predict")]
#[command(about = "Wildfire spread, perimeter and arrival-time prediction", long_about = None)]
struct Args {
    /// JSON request file; an array of requests is analysed as a batch
    #[arg(short, long, conflicts_with_all = ["disaster_type", "perimeter"])]
    request: Option<PathBuf>,

    /// JSON prediction config file (missing sections keep their defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Disaster type (only "wildfire" is modeled)
    #[arg(short = 't', long, default_value = "wildfire")]
    disaster_type: String,

    /// Wind speed in m/s
    #[arg(short, long)]
    wind_speed: Option<f64>,

    /// Wind direction in degrees, the direction the wind blows from
    #[arg(long)]
    wind_direction: Option<f64>,

    /// Temperature in °C
    #[arg(long)]
    temperature: Option<f64>,

    /// Relative humidity in %
    #[arg(long)]
    humidity: Option<f64>,

    /// GeoJSON file with the current fire perimeter
    #[arg(short, long)]
    perimeter: Option<PathBuf>,

    /// Event latitude
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Event longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn request_from_flags(args: &Args) -> Result<AnalysisRequest> {
    let fire_perimeter = args.perimeter.as_deref().map(read_json).transpose()?;
    let location = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(Location::new(lat, lon)),
        _ => None,
    };

    Ok(AnalysisRequest {
        disaster_type: DisasterType::from(args.disaster_type.as_str()),
        location,
        weather: WeatherObservation {
            wind_speed_ms: args.wind_speed,
            wind_direction_deg: args.wind_direction,
            temperature_c: args.temperature,
            humidity_percent: args.humidity,
        },
        fire_perimeter,
        critical_points: None,
    })
}

fn to_json(value: &impl serde::Serialize, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PredictionConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PredictionConfig::default(),
    };
    let coordinator = PredictionCoordinator::new(&config)?;

    let output = match &args.request {
        Some(path) => match read_json(path)? {
            serde_json::Value::Array(items) => {
                let requests = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| {
                        serde_json::from_value::<AnalysisRequest>(item)
                            .with_context(|| format!("request #{i} in {} is invalid", path.display()))
                    })
                    .collect::<Result<Vec<_>>>()?;
                if requests.is_empty() {
                    bail!("{} contains an empty request list", path.display());
                }
                to_json(&coordinator.analyze_batch(&requests), args.pretty)?
            }
            value => {
                let request: AnalysisRequest = serde_json::from_value(value)
                    .with_context(|| format!("{} is not a valid request", path.display()))?;
                to_json(&coordinator.analyze_request(&request), args.pretty)?
            }
        },
        None => {
            let request = request_from_flags(&args)?;
            to_json(&coordinator.analyze_request(&request), args.pretty)?
        }
    };

    info!("Analysis complete");
    println!("{output}");
    Ok(())
}
