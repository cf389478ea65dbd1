use serde::{Deserialize, Serialize};

/// A single channel of decoded audio.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Where zero samples are inserted when a signal is padded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PadPosition {
    /// Zeros follow the existing samples.
    #[default]
    End,
    /// Zeros precede the existing samples.
    Start,
    /// Leave the signal as decoded.
    None,
}

impl Signal {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Number of zeros needed to bring `len` up to a multiple of `frame_size`.
pub fn pad_count_for(len: usize, frame_size: usize) -> usize {
    (frame_size - len % frame_size) % frame_size
}

/// Zero-pad `signal` so its length becomes a multiple of `frame_size`, or by
/// exactly `explicit_count` zeros when given.
///
/// Returns the input untouched when there is nothing to add, so preparing an
/// already prepared signal is a no-op.
pub fn prepare(
    signal: Signal,
    frame_size: usize,
    position: PadPosition,
    explicit_count: Option<usize>,
) -> Signal {
    if position == PadPosition::None {
        return signal;
    }

    let pad = explicit_count.unwrap_or_else(|| pad_count_for(signal.len(), frame_size));
    if pad == 0 {
        return signal;
    }

    let mut samples = Vec::with_capacity(signal.len() + pad);
    match position {
        PadPosition::Start => {
            samples.resize(pad, 0.0);
            samples.extend_from_slice(&signal.samples);
        }
        _ => {
            samples.extend_from_slice(&signal.samples);
            samples.resize(signal.len() + pad, 0.0);
        }
    }

    log::debug!(
        "Padded signal with {} zeros at {:?}: {} -> {} samples",
        pad,
        position,
        signal.len(),
        samples.len()
    );

    Signal::new(samples, signal.sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Signal {
        Signal::new((1..=len).map(|i| i as f32).collect(), 44100)
    }

    #[test]
    fn pads_to_next_frame_multiple_at_end() {
        let padded = prepare(ramp(5), 4, PadPosition::End, None);
        assert_eq!(padded.samples, vec![1.0, 2.0, 3.0, 4.0, 5.0, 0.0, 0.0, 0.0]);
        assert_eq!(padded.sample_rate, 44100);
    }

    #[test]
    fn pads_at_start() {
        let padded = prepare(ramp(3), 4, PadPosition::Start, None);
        assert_eq!(padded.samples, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn exact_multiple_is_unchanged() {
        let signal = ramp(8);
        let padded = prepare(signal.clone(), 4, PadPosition::End, None);
        assert_eq!(padded, signal);
    }

    #[test]
    fn preparing_twice_is_idempotent() {
        let once = prepare(ramp(2049), 2048, PadPosition::End, None);
        assert_eq!(once.len(), 4096);
        let twice = prepare(once.clone(), 2048, PadPosition::End, None);
        assert_eq!(twice, once);
    }

    #[test]
    fn explicit_count_overrides_computed_padding() {
        let padded = prepare(ramp(4), 4, PadPosition::End, Some(3));
        assert_eq!(padded.len(), 7);
        assert!(padded.samples[4..].iter().all(|&s| s == 0.0));

        let untouched = prepare(ramp(5), 4, PadPosition::End, Some(0));
        assert_eq!(untouched.len(), 5);
    }

    #[test]
    fn none_position_skips_padding() {
        let padded = prepare(ramp(5), 4, PadPosition::None, None);
        assert_eq!(padded.len(), 5);
    }

    #[test]
    fn empty_signal_needs_no_padding() {
        assert_eq!(pad_count_for(0, 2048), 0);
        let padded = prepare(Signal::new(Vec::new(), 44100), 2048, PadPosition::End, None);
        assert!(padded.is_empty());
    }
}
