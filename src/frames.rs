use crate::error::{Result, SpectraError};

/// Frame geometry derived from a frame size and an overlap percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    frame_size: usize,
    new_data_size: usize,
    overlap_size: usize,
}

impl FrameLayout {
    /// Validate the pair and derive the hop (`new_data_size`) and the number
    /// of samples carried over between frames (`overlap_size`).
    pub fn new(frame_size: usize, overlap_percent: u32) -> Result<Self> {
        if frame_size == 0 || !frame_size.is_power_of_two() {
            return Err(SpectraError::config(format!(
                "frame size must be a positive power of two, got {}",
                frame_size
            )));
        }
        if overlap_percent >= 100 {
            return Err(SpectraError::config(format!(
                "overlap must be below 100%, got {}%",
                overlap_percent
            )));
        }

        // Integer form of round((100 - p) * size / 100), halves rounding up
        let new_data_size = (100 - overlap_percent as usize)
            .checked_mul(frame_size)
            .and_then(|scaled| scaled.checked_add(50))
            .map(|scaled| scaled / 100)
            .ok_or_else(|| {
                SpectraError::config(format!("frame size {} is too large", frame_size))
            })?;
        if new_data_size == 0 {
            return Err(SpectraError::config(format!(
                "{}% overlap leaves no new samples per {}-sample frame",
                overlap_percent, frame_size
            )));
        }

        Ok(Self {
            frame_size,
            new_data_size,
            overlap_size: frame_size - new_data_size,
        })
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn new_data_size(&self) -> usize {
        self.new_data_size
    }

    pub fn overlap_size(&self) -> usize {
        self.overlap_size
    }
}

/// Exactly `frame_size` consecutive (possibly zero-padded) samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    samples: Vec<f32>,
}

impl Frame {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Tail of this frame followed by `fresh`, zero-filled up to a full hop.
    fn follow(&self, fresh: &[f32], layout: &FrameLayout) -> Frame {
        let mut samples = Vec::with_capacity(layout.frame_size);
        samples.extend_from_slice(&self.samples[layout.frame_size - layout.overlap_size..]);
        samples.extend_from_slice(fresh);
        samples.resize(layout.frame_size, 0.0);
        Frame { samples }
    }
}

/// Split `samples` into overlapping frames in one left-to-right pass.
///
/// The first `frame_size` samples form the first frame. Past that point a
/// frame is emitted whenever the sample index is a multiple of the hop: the
/// previous frame's last `overlap_size` samples followed by the samples
/// gathered since the last emission. When the hop does not divide the frame
/// size, samples between the end of the first frame and the first such
/// multiple are skipped. Whatever is left after the last sample becomes a
/// final frame, zero-padded to full length. That includes a lone last sample
/// sitting exactly on a hop boundary (length `k * hop + 1`), which gets its
/// own frame of overlap tail, one sample and zeros rather than being dropped.
pub fn segment(samples: &[f32], layout: &FrameLayout) -> Vec<Frame> {
    let frame_size = layout.frame_size;
    let hop = layout.new_data_size;

    let mut frames: Vec<Frame> = Vec::with_capacity(samples.len() / hop + 2);
    let mut first: Vec<f32> = Vec::with_capacity(frame_size);
    let mut fresh: Vec<f32> = Vec::with_capacity(hop);

    for (i, &sample) in samples.iter().enumerate() {
        if i < frame_size {
            first.push(sample);
        } else if i % hop != 0 {
            fresh.push(sample);
        } else {
            let frame = match frames.last() {
                Some(prev) => {
                    debug_assert_eq!(fresh.len(), hop);
                    prev.follow(&fresh, layout)
                }
                None => Frame {
                    samples: std::mem::take(&mut first),
                },
            };
            frames.push(frame);
            fresh.clear();
            fresh.push(sample);
        }
    }

    if samples.is_empty() {
        return frames;
    }

    // Signal ended before the first frame was emitted
    if frames.is_empty() {
        first.resize(frame_size, 0.0);
        frames.push(Frame { samples: first });
    }

    if !fresh.is_empty() {
        if let Some(prev) = frames.last() {
            let last = prev.follow(&fresh, layout);
            frames.push(last);
        }
    }

    log::debug!(
        "Segmented {} samples into {} frames (size {}, hop {}, overlap {})",
        samples.len(),
        frames.len(),
        frame_size,
        hop,
        layout.overlap_size
    );

    frames
}
