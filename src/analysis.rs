use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, SpectraError};
use crate::fft::FftEngine;
use crate::frames::Frame;
use crate::window::{apply_coefficients, WindowType};

/// Magnitude spectrum of one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Spectrum {
    pub magnitudes: Vec<f32>,
}

impl Spectrum {
    /// Index of the strongest bin, `None` for an empty spectrum.
    pub fn peak_bin(&self) -> Option<usize> {
        self.magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }

    pub fn peak_magnitude(&self) -> f32 {
        self.magnitudes.iter().copied().fold(0.0f32, f32::max)
    }
}

/// Spectra in the same order as the frames they were computed from.
#[derive(Clone, Debug, Serialize)]
pub struct Spectrogram {
    pub fft_size: usize,
    pub hop_size: usize,
    pub sample_rate: u32,
    pub window: WindowType,
    pub spectra: Vec<Spectrum>,
}

impl Spectrogram {
    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    /// Frequency resolution in Hz.
    pub fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    pub fn bin_to_hz(&self, bin: usize) -> f32 {
        bin as f32 * self.bin_width()
    }

    /// Nominal start time of frame `index`, assuming a steady hop.
    pub fn frame_start_seconds(&self, index: usize) -> f32 {
        (index * self.hop_size) as f32 / self.sample_rate as f32
    }

    pub fn peak_frequency(&self, index: usize) -> Option<f32> {
        self.spectra
            .get(index)
            .and_then(Spectrum::peak_bin)
            .map(|bin| self.bin_to_hz(bin))
    }
}

/// Window and transform every frame. Frames are copied before windowing so
/// the same sequence can be analysed again with another window.
pub fn analyze(
    frames: &[Frame],
    fft_size: usize,
    hop_size: usize,
    sample_rate: u32,
    window: WindowType,
) -> Result<Spectrogram> {
    if let Some(bad) = frames.iter().find(|f| f.len() != fft_size) {
        return Err(SpectraError::config(format!(
            "FFT size {} does not match frame size {}",
            fft_size,
            bad.len()
        )));
    }

    let engine = FftEngine::new(fft_size)?;
    let coefficients = window.coefficients(fft_size);

    log::info!(
        "Analyzing {} frames (FFT {}, {:?} window, {}Hz)",
        frames.len(),
        engine.size(),
        window,
        sample_rate
    );

    let spectra = frames
        .par_iter()
        .map(|frame| {
            let mut working = frame.samples().to_vec();
            apply_coefficients(&mut working, &coefficients);
            engine
                .forward(&working)
                .map(|magnitudes| Spectrum { magnitudes })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Spectrogram {
        fft_size,
        hop_size,
        sample_rate,
        window,
        spectra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{segment, FrameLayout};

    fn sine(len: usize, freq: f32, sample_rate: u32) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn frames_of(samples: &[f32], size: usize, overlap: u32) -> (Vec<Frame>, FrameLayout) {
        let layout = FrameLayout::new(size, overlap).unwrap();
        (segment(samples, &layout), layout)
    }

    #[test]
    fn one_spectrum_per_frame() {
        let (frames, layout) = frames_of(&sine(10_000, 440.0, 44100), 2048, 50);
        let spectrogram = analyze(&frames, 2048, layout.new_data_size(), 44100, WindowType::Hamming).unwrap();
        assert_eq!(spectrogram.len(), frames.len());
        assert!(spectrogram.spectra.iter().all(|s| s.magnitudes.len() == 1024));
    }

    #[test]
    fn silent_frame_gives_single_spectrum() {
        let (frames, layout) = frames_of(&vec![0.0; 2048], 2048, 50);
        let spectrogram = analyze(&frames, 2048, layout.new_data_size(), 44100, WindowType::Hann).unwrap();
        assert_eq!(spectrogram.len(), 1);
        assert_eq!(spectrogram.spectra[0].peak_magnitude(), 0.0);
    }

    #[test]
    fn sinusoid_peaks_within_one_bin() {
        let sample_rate = 44100;
        for freq in [440.0f32, 1000.0, 5512.5, 12000.0] {
            let (frames, layout) = frames_of(&sine(2048 * 3, freq, sample_rate), 2048, 50);
            let spectrogram =
                analyze(&frames, 2048, layout.new_data_size(), sample_rate, WindowType::Hamming).unwrap();
            let resolution = spectrogram.bin_width();
            for index in 0..spectrogram.len() - 1 {
                let peak = spectrogram.peak_frequency(index).unwrap();
                assert!(
                    (peak - freq).abs() <= resolution,
                    "frame {} peak {} for {}",
                    index,
                    peak,
                    freq
                );
            }
        }
    }

    #[test]
    fn mismatched_fft_size_fails_fast() {
        let (frames, layout) = frames_of(&vec![0.1; 4096], 1024, 50);
        let result = analyze(&frames, 2048, layout.new_data_size(), 44100, WindowType::Hamming);
        assert!(matches!(result, Err(SpectraError::Configuration(_))));
    }

    #[test]
    fn analysis_leaves_frames_untouched() {
        let (frames, layout) = frames_of(&vec![1.0; 256], 128, 50);
        let before = frames.clone();
        let hamming = analyze(&frames, 128, layout.new_data_size(), 8000, WindowType::Hamming).unwrap();
        let rect = analyze(&frames, 128, layout.new_data_size(), 8000, WindowType::Rectangular).unwrap();
        assert_eq!(frames, before);
        assert_ne!(hamming.spectra[0], rect.spectra[0]);
    }

    #[test]
    fn empty_sequence_yields_empty_spectrogram() {
        let spectrogram = analyze(&[], 2048, 1024, 44100, WindowType::Hamming).unwrap();
        assert!(spectrogram.is_empty());
    }

    #[test]
    fn frame_timing_follows_hop() {
        let spectrogram = analyze(&[], 2048, 1024, 44100, WindowType::Hamming).unwrap();
        assert!((spectrogram.frame_start_seconds(43) - 43.0 * 1024.0 / 44100.0).abs() < 1e-6);
        assert!((spectrogram.bin_to_hz(1) - 44100.0 / 2048.0).abs() < 1e-4);
    }
}
