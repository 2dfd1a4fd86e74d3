use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Assemble a directory of still images into an animated GIF.
#[derive(Parser, Debug)]
#[command(name = "framegif", version)]
struct Cli {
    /// Directory containing the frames.
    #[arg(long = "in")]
    in_dir: Option<PathBuf>,

    /// Output GIF path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON config file; flags given on the command line override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extension of the frames to pick up [default: svg].
    #[arg(long = "ext")]
    extension: Option<String>,

    /// Resolution for physical SVG units [default: 300].
    #[arg(long)]
    dpi: Option<u32>,

    /// Milliseconds each frame is shown [default: 750].
    #[arg(long)]
    duration: Option<u32>,

    /// Extra repetitions after the first play-through, 0 loops forever [default: 0].
    #[arg(long = "loop")]
    loop_count: Option<u32>,

    /// Order frames by file name instead of by the first number in it.
    #[arg(long)]
    no_numeric_sort: bool,

    /// GIF quantization speed, 1 (best) to 30 (fastest) [default: 10].
    #[arg(long)]
    speed: Option<u8>,

    /// Also write every normalized PNG frame into this directory.
    #[arg(long)]
    keep_pngs: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<framegif::GifConfig> {
        let mut cfg = match &self.config {
            Some(path) => framegif::GifConfig::from_json_file(path)?,
            None => {
                let dir = self.in_dir.clone().context("--in is required without --config")?;
                let out = self.out.clone().context("--out is required without --config")?;
                framegif::GifConfig::new(dir, out)
            }
        };

        if let Some(dir) = self.in_dir {
            cfg.directory = dir;
        }
        if let Some(out) = self.out {
            cfg.output = out;
        }
        if let Some(ext) = self.extension {
            cfg.extension = ext;
        }
        if let Some(dpi) = self.dpi {
            cfg.dpi = dpi;
        }
        if let Some(ms) = self.duration {
            cfg.duration_ms = ms;
        }
        if let Some(n) = self.loop_count {
            cfg.loop_count = n;
        }
        if self.no_numeric_sort {
            cfg.sort_by_numbers = false;
        }
        if let Some(speed) = self.speed {
            cfg.speed = speed;
        }
        if let Some(dir) = self.keep_pngs {
            cfg.keep_pngs = Some(dir);
        }
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = Cli::parse().into_config()?;
    let report = framegif::create_gif(&cfg)?;

    // Skipped files were already reported by the pipeline's warnings.
    eprintln!(
        "wrote {} ({} frames, {} skipped)",
        report.output.display(),
        report.frames,
        report.failures.len()
    );
    Ok(())
}
