//! TerraDiff CLI - bitemporal change detection over remote imagery

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use terradiff_algorithms::change::{Comparator, DeltaOrder};
use terradiff_algorithms::detect::{presets, ChangeDetector, DetectParams};
use terradiff_algorithms::imagery::IndexFormula;
use terradiff_cloud::{EngineOptions, HttpExport, RemoteImagery};
use terradiff_core::io::FileExport;
use terradiff_core::{
    AreaOfInterest, DateRange, ExportFormat, ExportSink, FeatureCollection, LayerStyle, MapView,
    Reducer,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "terradiff")]
#[command(author, version, about = "Bitemporal change detection over remote imagery", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Scene service endpoint
    #[arg(long, global = true, default_value = "http://localhost:8787")]
    endpoint: String,

    /// Directory for exported GeoJSON (file delivery)
    #[arg(long, global = true, default_value = "exports")]
    export_root: String,

    /// Export over HTTP to this storage base URL instead of to disk
    #[arg(long, global = true)]
    export_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Burnt-area detection (pre/post NBR-style index drop)
    Fire {
        /// Override the preset threshold
        #[arg(long)]
        threshold: Option<f64>,
        /// Override the pre-event window, as start/end
        #[arg(long)]
        before: Option<String>,
        /// Override the post-event window, as start/end
        #[arg(long)]
        after: Option<String>,
    },
    /// Flood detection (radar backscatter rise)
    Flood {
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        before: Option<String>,
        #[arg(long)]
        after: Option<String>,
    },
    /// Forest-loss detection (NDVI drop, median composites)
    ForestLoss {
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        before: Option<String>,
        #[arg(long)]
        after: Option<String>,
    },
    /// Fully parameterized detection
    Detect {
        /// Catalog collection identifier
        #[arg(long)]
        collection: String,
        /// Rectangle area as "west,south,east,north"
        #[arg(long, conflicts_with = "polygon")]
        bbox: Option<String>,
        /// Polygon area as "lon,lat;lon,lat;..."
        #[arg(long)]
        polygon: Option<String>,
        /// Pre-event window, as start/end
        #[arg(long)]
        before: String,
        /// Post-event window, as start/end
        #[arg(long)]
        after: String,
        /// Index: "nd:BAND_A,BAND_B" or "band:NAME"
        #[arg(long)]
        index: String,
        /// Temporal reducer: mean, median
        #[arg(long, default_value = "mean")]
        reducer: String,
        /// Delta order: before-after, after-before
        #[arg(long, default_value = "before-after")]
        order: String,
        /// Comparator: gt, lt
        #[arg(long, default_value = "gt")]
        comparator: String,
        #[arg(long)]
        threshold: f64,
        /// Export description (output file stem)
        #[arg(long, default_value = "change_post")]
        description: String,
        /// Export destination (folder or bucket)
        #[arg(long, default_value = "drive")]
        destination: String,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Map view that narrates display side effects into the log
struct TraceMapView;

impl MapView for TraceMapView {
    fn center(&self, area: &AreaOfInterest, zoom: u8) {
        let [w, s, e, n] = area.bbox();
        info!("Map centered on [{w:.4}, {s:.4}, {e:.4}, {n:.4}] at zoom {zoom}");
    }

    fn add_layer(&self, label: &str, style: &LayerStyle) {
        info!("Layer {:?} (palette: {})", label, style.palette.join(", "));
    }
}

fn parse_interval(s: &str) -> Result<DateRange> {
    let (start, end) = s
        .split_once('/')
        .with_context(|| format!("Interval must be start/end, got: {s}"))?;
    DateRange::parse(start.trim(), end.trim())
        .with_context(|| format!("Invalid date range: {s}"))
}

fn parse_bbox(s: &str) -> Result<AreaOfInterest> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().context("Invalid bbox coordinate"))
        .collect::<Result<_>>()?;
    if parts.len() != 4 {
        anyhow::bail!("Bbox must be west,south,east,north, got: {}", s);
    }
    Ok(AreaOfInterest::rect(parts[0], parts[1], parts[2], parts[3]))
}

fn parse_polygon(s: &str) -> Result<AreaOfInterest> {
    let vertices: Vec<(f64, f64)> = s
        .split(';')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(',').collect();
            if parts.len() != 2 {
                anyhow::bail!("Vertex must be 'lon,lat', got: {}", pair);
            }
            let lon: f64 = parts[0].trim().parse().context("Invalid longitude")?;
            let lat: f64 = parts[1].trim().parse().context("Invalid latitude")?;
            Ok((lon, lat))
        })
        .collect::<Result<_>>()?;
    Ok(AreaOfInterest::polygon(vertices))
}

fn parse_index(s: &str) -> Result<IndexFormula> {
    match s.split_once(':') {
        Some(("nd", bands)) => {
            let (a, b) = bands
                .split_once(',')
                .with_context(|| format!("nd index needs two bands, got: {bands}"))?;
            Ok(IndexFormula::normalized_difference(a.trim(), b.trim()))
        }
        Some(("band", name)) => Ok(IndexFormula::band(name.trim())),
        _ => anyhow::bail!("Unknown index: {}. Use nd:BAND_A,BAND_B or band:NAME.", s),
    }
}

fn parse_reducer(s: &str) -> Result<Reducer> {
    match s.to_lowercase().as_str() {
        "mean" | "avg" => Ok(Reducer::Mean),
        "median" | "med" => Ok(Reducer::Median),
        _ => anyhow::bail!("Unknown reducer: {}. Use mean or median.", s),
    }
}

fn parse_order(s: &str) -> Result<DeltaOrder> {
    match s.to_lowercase().as_str() {
        "before-after" | "before-minus-after" => Ok(DeltaOrder::BeforeMinusAfter),
        "after-before" | "after-minus-before" => Ok(DeltaOrder::AfterMinusBefore),
        _ => anyhow::bail!(
            "Unknown delta order: {}. Use before-after or after-before.",
            s
        ),
    }
}

fn parse_comparator(s: &str) -> Result<Comparator> {
    match s.to_lowercase().as_str() {
        "gt" | ">" => Ok(Comparator::Gt),
        "lt" | "<" => Ok(Comparator::Lt),
        _ => anyhow::bail!("Unknown comparator: {}. Use gt or lt.", s),
    }
}

fn apply_overrides(
    mut params: DetectParams,
    threshold: Option<f64>,
    before: Option<String>,
    after: Option<String>,
) -> Result<DetectParams> {
    if let Some(t) = threshold {
        params.threshold = t;
    }
    if let Some(b) = before {
        params.range_before = parse_interval(&b)?;
    }
    if let Some(a) = after {
        params.range_after = parse_interval(&a)?;
    }
    Ok(params)
}

/// Run one detection and export the resulting regions
fn run(
    cli: &Cli,
    params: &DetectParams,
    layer: &str,
    palette: &str,
    destination: &str,
    description: &str,
) -> Result<()> {
    let map = TraceMapView;
    map.center(&params.area, 9);

    let service = RemoteImagery::connect(&cli.endpoint, EngineOptions::default())
        .context("Failed to connect to the scene service")?;
    let detector = ChangeDetector::new(&service);

    let pb = spinner("Detecting changes...");
    let start = Instant::now();
    let regions = detector.detect(params).context("Detection failed")?;
    let elapsed = start.elapsed();
    pb.finish_and_clear();

    info!("{} change region(s) in {:.2?}", regions.len(), elapsed);
    map.add_layer(layer, &LayerStyle::palette(&[palette]));

    let table = FeatureCollection::from_polygons(regions);
    let sink: Box<dyn ExportSink> = match &cli.export_url {
        Some(url) => Box::new(HttpExport::connect(url).context("Failed to set up HTTP export")?),
        None => Box::new(FileExport::new(&cli.export_root)),
    };
    sink.export_table(&table, destination, description, ExportFormat::GeoJson)
        .context("Export failed")?;

    println!(
        "{} exported as {}.geojson ({} region(s))",
        layer,
        description,
        table.len()
    );
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match &cli.command {
        Commands::Fire {
            threshold,
            before,
            after,
        } => {
            let params =
                apply_overrides(presets::fire(), *threshold, before.clone(), after.clone())?;
            run(&cli, &params, "Burnt Area", "orange", "drive", "fire_post")?;
        }

        Commands::Flood {
            threshold,
            before,
            after,
        } => {
            let params =
                apply_overrides(presets::flood(), *threshold, before.clone(), after.clone())?;
            run(&cli, &params, "Flooded", "blue", "drive", "flood_post")?;
        }

        Commands::ForestLoss {
            threshold,
            before,
            after,
        } => {
            let params = apply_overrides(
                presets::forest_loss(),
                *threshold,
                before.clone(),
                after.clone(),
            )?;
            run(&cli, &params, "Forest Loss", "red", "drive", "forest_post")?;
        }

        Commands::Detect {
            collection,
            bbox,
            polygon,
            before,
            after,
            index,
            reducer,
            order,
            comparator,
            threshold,
            description,
            destination,
        } => {
            let area = match (bbox, polygon) {
                (Some(b), None) => parse_bbox(b)?,
                (None, Some(p)) => parse_polygon(p)?,
                _ => anyhow::bail!("Provide exactly one of --bbox or --polygon"),
            };
            area.validate().context("Invalid area of interest")?;

            let params = DetectParams {
                area,
                collection: collection.clone(),
                range_before: parse_interval(before)?,
                range_after: parse_interval(after)?,
                formula: parse_index(index)?,
                reducer: parse_reducer(reducer)?,
                delta_order: parse_order(order)?,
                comparator: parse_comparator(comparator)?,
                threshold: *threshold,
            };
            run(&cli, &params, "Change", "orange", destination, description)?;
        }
    }

    Ok(())
}
