use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::stage::{EXIT_DURATION, RESET_DURATION, StageTimings, ZOOM_DURATION};

/// Shortest step of the simulated display clock
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);
const FRAME_SLACK: u64 = 120;

fn default_data() -> String {
    "data/certifications.json".to_string()
}
fn default_map_candidates() -> Vec<String> {
    vec![
        "data/asean.geojson".to_string(),
        "data/asean-countries.geojson".to_string(),
        "data/world.geojson".to_string(),
    ]
}
fn default_output() -> PathBuf {
    PathBuf::from("asean-map.svg")
}
fn default_simplify() -> f64 {
    0.0
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    /// Certification table source, URL or path
    #[serde(default = "default_data")]
    pub data: String,
    /// Map geometry sources, tried in order
    #[serde(default = "default_map_candidates")]
    pub map_candidates: Vec<String>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub select: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    /// Ramer-Douglas-Peucker tolerance in canvas pixels; 0 disables
    #[serde(default = "default_simplify")]
    pub simplify: f64,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            data: default_data(),
            map_candidates: default_map_candidates(),
            output: default_output(),
            select: None,
            search: None,
            simplify: default_simplify(),
            verbose: default_verbose(),
            animation: AnimationConfig::default(),
        }
    }
}

fn default_zoom_ms() -> u64 {
    ZOOM_DURATION.as_millis() as u64
}

fn default_reset_ms() -> u64 {
    RESET_DURATION.as_millis() as u64
}

fn default_fps() -> u32 {
    60
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AnimationConfig {
    #[serde(default = "default_zoom_ms")]
    pub zoom_ms: u64,
    #[serde(default = "default_reset_ms")]
    pub reset_ms: u64,
    /// Frame rate of the simulated display clock
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            zoom_ms: default_zoom_ms(),
            reset_ms: default_reset_ms(),
            fps: default_fps(),
        }
    }
}

impl AnimationConfig {
    pub fn timings(&self) -> StageTimings {
        StageTimings {
            zoom: Duration::from_millis(self.zoom_ms),
            reset: Duration::from_millis(self.reset_ms),
        }
    }

    /// Interval between simulated frames; a zero fps falls back to 60
    ///
    /// Never shorter than [`MIN_FRAME_INTERVAL`].
    pub fn frame_interval(&self) -> Duration {
        let fps = if self.fps == 0 { default_fps() } else { self.fps };
        Duration::from_secs_f64(1.0 / fps as f64).max(MIN_FRAME_INTERVAL)
    }

    /// Frames a single selection may take before the clock gives up
    ///
    /// Covers a label exit followed by the longer of the two animations,
    /// plus a little slack for the reveal frame.
    pub fn max_frames(&self) -> u64 {
        let timings = self.timings();
        let longest = EXIT_DURATION.saturating_add(timings.zoom.max(timings.reset));
        let frames = longest.as_nanos() / self.frame_interval().as_nanos();
        u64::try_from(frames)
            .unwrap_or(u64::MAX)
            .saturating_add(FRAME_SLACK)
    }
}

impl FileConfig {
    /// First parseable config file from the standard search paths
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly named config file; errors are fatal here
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("aseanmap.toml"));
    paths.push(PathBuf::from(".aseanmap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("aseanmap").join("config.toml"));
        paths.push(config_dir.join("aseanmap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".aseanmap.toml"));
        paths.push(home.join(".config").join("aseanmap").join("config.toml"));
    }

    paths
}
