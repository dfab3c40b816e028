use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use aseanmap::api::{LoadError, Source, load_geometry, load_records};
use aseanmap::config::FileConfig;
use aseanmap::domain::{CertificationRecord, FeatureCollection};
use aseanmap::map::{MapOptions, MapPaths, build_map_paths};
use aseanmap::render::{render_map, render_table, write_svg};
use aseanmap::stage::{MapStage, Selection};

/// Render the ASEAN low-voltage certification table and member-state map
///
/// Examples:
///   # Render the full region and the whole table
///   aseanmap
///
///   # Zoom to Vietnam and filter the table
///   aseanmap --select Vietnam --search "IEC 60335" -o vietnam.svg
///
///   # Use remote sources, trying two map mirrors in order
///   aseanmap --data https://example.org/cert.json \
///       --map https://example.org/asean.geojson --map data/asean.geojson
#[derive(Parser, Debug)]
#[command(name = "aseanmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches aseanmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Certification table source (URL or file)
    #[arg(short = 'd', long)]
    data: Option<String>,

    /// Map geometry source; repeat to give fallbacks in order
    #[arg(short = 'm', long = "map")]
    map: Vec<String>,

    /// Member state to zoom to, or "all"
    #[arg(short = 's', long)]
    select: Option<String>,

    /// Keyword filter for the table
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Output SVG file path
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Path simplification tolerance in canvas pixels (0 = off)
    #[arg(long)]
    simplify: Option<f64>,

    /// Frame rate of the simulated animation clock
    #[arg(long)]
    fps: Option<u32>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            FileConfig::load_from(config_path)?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;

    let data = args.data.clone().unwrap_or(file_config.data.clone());
    let map_candidates = if args.map.is_empty() {
        file_config.map_candidates.clone()
    } else {
        args.map.clone()
    };
    let output = args.output.clone().unwrap_or(file_config.output.clone());
    let search = args
        .search
        .clone()
        .or_else(|| file_config.search.clone())
        .unwrap_or_default();
    let simplify = args.simplify.unwrap_or(file_config.simplify);
    let mut animation = file_config.animation.clone();
    if let Some(fps) = args.fps {
        animation.fps = fps;
    }

    let selection = match args.select.as_deref().or(file_config.select.as_deref()) {
        Some(name) => match Selection::parse(name) {
            Some(selection) => selection,
            None => bail!("Unknown member state: {}", name),
        },
        None => Selection::All,
    };

    println!("aseanmap - ASEAN Low-Voltage Certification Map");
    println!("===============================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Data: {}", data);
        println!("  Map sources: {}", map_candidates.join(", "));
        println!("  Selection: {:?}", selection);
        println!("  Search: {:?}", search);
        println!("  Simplify: {}px", simplify);
        println!(
            "  Animation: zoom {}ms, reset {}ms, {} fps",
            animation.zoom_ms, animation.reset_ms, animation.fps
        );
        println!("  Output: {}", output.display());
        println!();
    }

    let data_source = Source::parse(&data);
    let map_sources: Vec<Source> = map_candidates.iter().map(|s| Source::parse(s)).collect();
    let (records, geometry) = load_resources(&data_source, &map_sources);

    let spinner = create_spinner("Building map paths...");
    let start = Instant::now();
    let options = MapOptions::default().with_simplify(simplify);
    let map = match &geometry {
        Ok(collection) => build_map_paths(&collection.features, &options),
        Err(_) => MapPaths::empty(),
    };
    spinner.finish_with_message(format!(
        "Built {} paths ({} member states) [{:.1}s]",
        map.paths.len(),
        map.country_bounds.len(),
        start.elapsed().as_secs_f32()
    ));

    let mut stage = MapStage::new(map, animation.timings());
    if selection != Selection::All {
        let spinner = create_spinner("Playing selection animation...");
        let frames = play_selection(
            &mut stage,
            selection,
            animation.frame_interval(),
            animation.max_frames(),
        )?;
        spinner.finish_with_message(format!(
            "Settled on {} after {} frames, viewBox {}",
            selection.country().unwrap_or("all"),
            frames,
            stage.view_box().to_attribute()
        ));
    }

    let map_error = geometry.as_ref().err().map(|e| e.to_string());
    let svg = render_map(stage.map(), &stage.snapshot(), map_error.as_deref());
    write_svg(&output, &svg).context("Failed to write map output")?;

    println!();
    let table_input = records.as_ref().map(|r| r.as_slice());
    print!("{}", render_table(table_input, &search));

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!("Output: {}", output.display());

    Ok(())
}

/// Fetch the table and the map geometry at the same time
///
/// Each load reports its own result; one failing leaves the other intact.
fn load_resources(
    data: &Source,
    map_sources: &[Source],
) -> (
    Result<Vec<CertificationRecord>, LoadError>,
    Result<FeatureCollection, LoadError>,
) {
    let progress = MultiProgress::new();
    let records_spinner = progress.add(create_spinner("Fetching certification data..."));
    let geometry_spinner = progress.add(create_spinner("Fetching map geometry..."));
    let start = Instant::now();

    std::thread::scope(|scope| {
        let records = scope.spawn(|| {
            let result = load_records(data);
            match &result {
                Ok(records) => records_spinner.finish_with_message(format!(
                    "Loaded {} certification records [{:.1}s]",
                    records.len(),
                    start.elapsed().as_secs_f32()
                )),
                Err(e) => records_spinner.finish_with_message(format!("Certification data: {}", e)),
            }
            result
        });
        let geometry = scope.spawn(|| {
            let result = load_geometry(map_sources);
            match &result {
                Ok(collection) => geometry_spinner.finish_with_message(format!(
                    "Loaded {} map features [{:.1}s]",
                    collection.len(),
                    start.elapsed().as_secs_f32()
                )),
                Err(e) => geometry_spinner.finish_with_message(format!("Map geometry: {}", e)),
            }
            result
        });

        // a panicking loader thread is a bug; re-raise it here
        let records = records
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        let geometry = geometry
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (records, geometry)
    })
}

/// Run the selection choreography on a simulated display clock
fn play_selection(
    stage: &mut MapStage,
    selection: Selection,
    interval: Duration,
    max_frames: u64,
) -> Result<u64> {
    let mut now = Duration::ZERO;
    stage.select(selection, now);

    let mut frames = 0;
    while !stage.is_settled() {
        if frames >= max_frames {
            bail!("Animation did not settle after {} frames", max_frames);
        }
        now += interval;
        stage.tick(now);
        frames += 1;
    }
    debug!(
        "Selection {:?} settled at {:.0}ms",
        selection,
        now.as_secs_f64() * 1000.0
    );
    if let Some(label) = stage.active_label() {
        info!("Showing label for {} ({:?})", label.country, label.phase);
    }
    Ok(frames)
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
