use std::path::{Path, PathBuf};

use crate::{
    assets::{NormalizedFrame, normalize::Normalizer},
    encode::{
        gif::{AnimationSpec, encode_animated_gif},
        output::{OutputArtifact, write_atomic},
    },
    foundation::{
        config::GifConfig,
        error::{ConversionError, FramegifError, FramegifResult},
    },
    locate::{FrameOrder, ImageReference, locate_frames},
};

/// Outcome of a successful [`create_gif`] run.
#[derive(Debug)]
pub struct GifReport {
    pub output: PathBuf,
    /// Frames in the written animation.
    pub frames: usize,
    pub bytes_written: usize,
    /// Files that were skipped, in the order they were attempted.
    pub failures: Vec<ConversionError>,
}

/// Frames that converted, plus the files that did not.
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    pub frames: Vec<NormalizedFrame>,
    pub failures: Vec<ConversionError>,
}

/// Convert every reference in order, skipping (and logging) the ones that fail.
pub fn normalize_all(normalizer: &Normalizer, refs: &[ImageReference]) -> NormalizeOutcome {
    let mut out = NormalizeOutcome::default();
    for r in refs {
        match normalizer.normalize(r) {
            Ok(frame) => out.frames.push(frame),
            Err(err) => {
                tracing::warn!(
                    path = %err.path.display(),
                    error = %format!("{:#}", err.source),
                    "skipping file that failed to convert"
                );
                out.failures.push(err);
            }
        }
    }
    out
}

fn keep_png(dir: &Path, source: &Path, png: &[u8]) -> FramegifResult<()> {
    let stem = source.file_stem().unwrap_or(source.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".png");
    write_atomic(&dir.join(name), png)
}

/// Locate, normalize and assemble the frames described by `cfg`, then write the GIF.
///
/// Per-file conversion failures are skipped and returned in [`GifReport::failures`]; everything
/// else is fatal. No output file is created when the run fails.
#[tracing::instrument(skip(cfg), fields(dir = %cfg.directory.display(), out = %cfg.output.display()))]
pub fn create_gif(cfg: &GifConfig) -> FramegifResult<GifReport> {
    cfg.validate()?;

    let order = if cfg.sort_by_numbers {
        FrameOrder::Numeric
    } else {
        FrameOrder::Lexicographic
    };
    let refs = locate_frames(&cfg.directory, cfg.normalized_extension(), order)?;

    let normalizer = Normalizer::new(cfg.dpi);
    let NormalizeOutcome { frames, failures } = normalize_all(&normalizer, &refs);

    if frames.is_empty() {
        return Err(FramegifError::empty_input(format!(
            "all {} input files failed to convert",
            refs.len()
        )));
    }

    let frame_count = frames.len();
    let mut buffers = Vec::with_capacity(frame_count);
    let mut pngs = Vec::new();
    for f in frames {
        buffers.push(f.frame);
        if cfg.keep_pngs.is_some() {
            pngs.push((f.source, f.png));
        }
    }

    let loop_count = u16::try_from(cfg.loop_count).map_err(|_| {
        FramegifError::validation(format!("loop count {} does not fit u16", cfg.loop_count))
    })?;
    let spec = AnimationSpec::new(buffers, cfg.duration_ms, loop_count).with_speed(cfg.speed);

    let artifact = OutputArtifact::new(&cfg.output, encode_animated_gif(spec)?);
    artifact.write()?;

    // Only once the GIF is in place, so a failed run leaves no kept frames behind.
    if let Some(dir) = &cfg.keep_pngs {
        for (source, png) in &pngs {
            keep_png(dir, source, png)?;
        }
    }

    tracing::info!(
        frames = frame_count,
        skipped = failures.len(),
        path = %artifact.path.display(),
        "gif saved"
    );

    Ok(GifReport {
        output: artifact.path,
        frames: frame_count,
        bytes_written: artifact.bytes.len(),
        failures,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const SVG: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"></svg>"#;

    #[test]
    fn normalize_all_keeps_order_and_collects_failures() {
        let dir = tempfile::tempdir().unwrap();
        let names = ["f_1.svg", "f_2.svg", "f_3.svg"];
        for n in names {
            std::fs::write(dir.path().join(n), SVG).unwrap();
        }
        std::fs::write(dir.path().join("f_2.svg"), b"<svg").unwrap();

        let refs: Vec<_> = names
            .iter()
            .map(|n| ImageReference::new(dir.path().join(n)))
            .collect();
        let normalizer = Normalizer::with_fontdb(96, Arc::new(usvg::fontdb::Database::new()));
        let out = normalize_all(&normalizer, &refs);

        assert_eq!(
            out.frames.iter().map(|f| f.source.clone()).collect::<Vec<_>>(),
            [dir.path().join("f_1.svg"), dir.path().join("f_3.svg")]
        );
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].path, dir.path().join("f_2.svg"));
    }

    #[test]
    fn kept_png_uses_source_stem() {
        let dir = tempfile::tempdir().unwrap();
        keep_png(dir.path(), Path::new("frames/a_1.svg"), b"png").unwrap();
        assert_eq!(std::fs::read(dir.path().join("a_1.png")).unwrap(), b"png");
    }

    #[test]
    fn invalid_config_fails_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.gif");
        let mut cfg = GifConfig::new(dir.path(), &out);
        cfg.dpi = 0;

        let err = create_gif(&cfg).unwrap_err();
        assert!(matches!(err, FramegifError::Validation(_)), "{err}");
        assert!(!out.exists());
    }
}
