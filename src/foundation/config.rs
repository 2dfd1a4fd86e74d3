use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

use crate::foundation::error::{FramegifError, FramegifResult};

pub const DEFAULT_EXTENSION: &str = "svg";
pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_DURATION_MS: u32 = 750;
pub const DEFAULT_LOOP_COUNT: u32 = 0;
pub const DEFAULT_SPEED: u8 = 10;

/// GIF frame delays are stored in centiseconds as a `u16`.
pub const MIN_DURATION_MS: u32 = 10;
pub const MAX_DURATION_MS: u32 = u16::MAX as u32 * 10;

/// Everything one `create_gif` run needs.
///
/// Only `directory` and `output` are required when deserializing; every other field falls back to
/// the documented default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GifConfig {
    /// Directory scanned for frames (not recursive).
    pub directory: PathBuf,
    /// Destination of the animated GIF.
    pub output: PathBuf,
    /// Target file extension, matched case-insensitively. Default `"svg"`.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Resolution used to resolve physical units when rasterizing SVG. Default 300.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Display time of every frame in milliseconds. Default 750.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,
    /// Additional repetitions after the first play-through; 0 loops forever. Default 0.
    #[serde(default)]
    pub loop_count: u32,
    /// Order frames by the first number in their file name instead of by name. Default true.
    #[serde(default = "default_true")]
    pub sort_by_numbers: bool,
    /// GIF quantization speed, 1 (best) ..= 30 (fastest). Default 10.
    #[serde(default = "default_speed")]
    pub speed: u8,
    /// Also write every normalized PNG frame into this directory.
    #[serde(default)]
    pub keep_pngs: Option<PathBuf>,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_dpi() -> u32 {
    DEFAULT_DPI
}

fn default_duration_ms() -> u32 {
    DEFAULT_DURATION_MS
}

fn default_true() -> bool {
    true
}

fn default_speed() -> u8 {
    DEFAULT_SPEED
}

impl GifConfig {
    pub fn new(directory: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            output: output.into(),
            extension: default_extension(),
            dpi: DEFAULT_DPI,
            duration_ms: DEFAULT_DURATION_MS,
            loop_count: DEFAULT_LOOP_COUNT,
            sort_by_numbers: true,
            speed: DEFAULT_SPEED,
            keep_pngs: None,
        }
    }

    pub fn from_json_file(path: &Path) -> FramegifResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Target extension without a leading dot.
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim().trim_start_matches('.')
    }

    pub fn validate(&self) -> FramegifResult<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(FramegifError::validation("input directory must be set"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(FramegifError::validation("output path must be set"));
        }

        let ext = self.normalized_extension();
        if ext.is_empty() {
            return Err(FramegifError::validation("file extension must be non-empty"));
        }
        if ext.contains(['/', '\\']) {
            return Err(FramegifError::validation(format!(
                "file extension '{ext}' must not contain path separators"
            )));
        }

        if self.dpi == 0 {
            return Err(FramegifError::validation("dpi must be positive"));
        }
        if !(MIN_DURATION_MS..=MAX_DURATION_MS).contains(&self.duration_ms) {
            return Err(FramegifError::validation(format!(
                "duration must be within {MIN_DURATION_MS}..={MAX_DURATION_MS} ms, got {}",
                self.duration_ms
            )));
        }
        if self.loop_count > u32::from(u16::MAX) {
            return Err(FramegifError::validation(format!(
                "loop count must be at most {}, got {}",
                u16::MAX,
                self.loop_count
            )));
        }
        if !(1..=30).contains(&self.speed) {
            return Err(FramegifError::validation(format!(
                "speed must be within 1..=30, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}
