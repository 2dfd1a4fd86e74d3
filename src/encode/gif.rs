use crate::{
    assets::FrameBuffer,
    foundation::{
        config::{DEFAULT_SPEED, MAX_DURATION_MS, MIN_DURATION_MS},
        error::{FramegifError, FramegifResult},
    },
};

/// Everything the encoder needs for one animation.
#[derive(Clone, Debug)]
pub struct AnimationSpec {
    /// Frames in playback order.
    pub frames: Vec<FrameBuffer>,
    /// Display time of every frame.
    pub duration_ms: u32,
    /// Additional repetitions after the first play-through; 0 loops forever.
    pub loop_count: u16,
    /// Quantization speed, 1 ..= 30.
    pub speed: u8,
}

impl AnimationSpec {
    pub fn new(frames: Vec<FrameBuffer>, duration_ms: u32, loop_count: u16) -> Self {
        Self {
            frames,
            duration_ms,
            loop_count,
            speed: DEFAULT_SPEED,
        }
    }

    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = speed;
        self
    }

    pub fn validate(&self) -> FramegifResult<()> {
        if self.frames.is_empty() {
            return Err(FramegifError::empty_input(
                "no frames left to assemble after conversion",
            ));
        }
        if !(MIN_DURATION_MS..=MAX_DURATION_MS).contains(&self.duration_ms) {
            return Err(FramegifError::validation(format!(
                "frame duration {} ms is outside {MIN_DURATION_MS}..={MAX_DURATION_MS}",
                self.duration_ms
            )));
        }
        if !(1..=30).contains(&self.speed) {
            return Err(FramegifError::validation(format!(
                "gif speed {} is outside 1..=30",
                self.speed
            )));
        }
        Ok(())
    }

    /// NETSCAPE2.0 repeat value written for this spec.
    ///
    /// The `gif` crate writes `Finite(n)` verbatim, which decoders treat as `n` repetitions after
    /// the first play-through, and `Infinite` as a loop count of 0.
    pub fn repeat(&self) -> gif::Repeat {
        match self.loop_count {
            0 => gif::Repeat::Infinite,
            n => gif::Repeat::Finite(n),
        }
    }

    /// Frame delay as stored in the file. GIF counts centiseconds; sub-10ms remainders are
    /// dropped.
    pub fn delay_centis(&self) -> u16 {
        u16::try_from(self.duration_ms / 10).unwrap_or(u16::MAX)
    }

    /// Logical screen size: the largest width and height over all frames.
    pub fn canvas_size(&self) -> (u32, u32) {
        self.frames.iter().fold((0, 0), |(w, h), f| {
            (w.max(f.width), h.max(f.height))
        })
    }
}

fn gif_dim(v: u32, what: &str) -> FramegifResult<u16> {
    u16::try_from(v).map_err(|_| {
        FramegifError::encode(format!("{what} {v} exceeds the gif limit of {}", u16::MAX))
    })
}

/// Encode `spec` into the bytes of an animated GIF.
///
/// Consumes the frames. Fails with [`FramegifError::EmptyInput`] when `spec` has none.
pub fn encode_animated_gif(spec: AnimationSpec) -> FramegifResult<Vec<u8>> {
    spec.validate()?;

    let delay = spec.delay_centis();
    let (canvas_w, canvas_h) = spec.canvas_size();
    let screen_w = gif_dim(canvas_w, "canvas width")?;
    let screen_h = gif_dim(canvas_h, "canvas height")?;
    let frame_count = spec.frames.len();

    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, screen_w, screen_h, &[])
            .map_err(|e| FramegifError::encode(format!("start gif stream: {e}")))?;
        encoder
            .set_repeat(spec.repeat())
            .map_err(|e| FramegifError::encode(format!("set gif repeat: {e}")))?;

        for (i, frame) in spec.frames.into_iter().enumerate() {
            if (frame.width, frame.height) != (canvas_w, canvas_h) {
                tracing::debug!(
                    frame = i,
                    width = frame.width,
                    height = frame.height,
                    canvas_w,
                    canvas_h,
                    "frame smaller than canvas, placed at top-left"
                );
            }
            let (w, h) = (frame.width, frame.height);
            let mut rgba = frame.into_rgba_image()?.into_raw();
            let mut gif_frame = gif::Frame::from_rgba_speed(
                gif_dim(w, "frame width")?,
                gif_dim(h, "frame height")?,
                &mut rgba,
                i32::from(spec.speed),
            );
            gif_frame.delay = delay;
            // Clear this frame's area before the next one so smaller frames don't show leftovers.
            gif_frame.dispose = gif::DisposalMethod::Background;
            encoder
                .write_frame(&gif_frame)
                .map_err(|e| FramegifError::encode(format!("encode gif frame {i}: {e}")))?;
        }
        // Dropping the encoder writes the GIF trailer.
    }

    tracing::debug!(
        frames = frame_count,
        bytes = out.len(),
        duration_ms = spec.duration_ms,
        loop_count = spec.loop_count,
        "encoded animated gif"
    );

    Ok(out)
}
