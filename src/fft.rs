use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::error::{Result, SpectraError};

/// Forward real-input FFT producing per-bin magnitudes.
///
/// Holds one plan that is shared by reference, so a single engine can serve
/// every rayon worker.
#[derive(Clone)]
pub struct FftEngine {
    size: usize,
    fft: Arc<dyn Fft<f32>>,
}

impl FftEngine {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || !size.is_power_of_two() {
            return Err(SpectraError::config(format!(
                "FFT size must be a positive power of two, got {}",
                size
            )));
        }
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);
        Ok(Self { size, fft })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of magnitude bins per spectrum (DC up to, excluding, Nyquist).
    pub fn bins(&self) -> usize {
        (self.size / 2).max(1)
    }

    /// Transform `frame` and return `size / 2` magnitudes scaled by `2 / size`,
    /// so a full-scale sinusoid centred on a bin reads close to its amplitude.
    pub fn forward(&self, frame: &[f32]) -> Result<Vec<f32>> {
        if frame.len() != self.size {
            return Err(SpectraError::config(format!(
                "frame of {} samples does not match FFT size {}",
                frame.len(),
                self.size
            )));
        }

        let mut buffer: Vec<Complex<f32>> = frame.iter().map(|&s| Complex::new(s, 0.0)).collect();
        self.fft.process(&mut buffer);

        let scale = 2.0 / self.size as f32;
        Ok(buffer[..self.bins()].iter().map(|c| c.norm() * scale).collect())
    }
}

impl std::fmt::Debug for FftEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftEngine").field("size", &self.size).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two() {
        assert!(FftEngine::new(1000).is_err());
        assert!(FftEngine::new(0).is_err());
    }

    #[test]
    fn rejects_mismatched_frame() {
        let engine = FftEngine::new(64).unwrap();
        assert!(matches!(
            engine.forward(&[0.0; 32]),
            Err(SpectraError::Configuration(_))
        ));
    }

    #[test]
    fn dc_signal_lands_in_bin_zero() {
        let engine = FftEngine::new(64).unwrap();
        let spectrum = engine.forward(&[0.5; 64]).unwrap();
        assert_eq!(spectrum.len(), 32);
        // DC is not halved by the one-sided scaling
        assert!((spectrum[0] - 1.0).abs() < 1e-4);
        assert!(spectrum[1..].iter().all(|&m| m < 1e-4));
    }

    #[test]
    fn bin_centred_sinusoid_reports_its_amplitude() {
        let size = 256;
        let engine = FftEngine::new(size).unwrap();
        let frame: Vec<f32> = (0..size)
            .map(|i| 0.8 * (2.0 * std::f32::consts::PI * 10.0 * i as f32 / size as f32).sin())
            .collect();
        let spectrum = engine.forward(&frame).unwrap();
        assert!((spectrum[10] - 0.8).abs() < 1e-3);
        assert!(spectrum[20] < 1e-3);
    }

    #[test]
    fn silence_has_flat_zero_spectrum() {
        let engine = FftEngine::new(2048).unwrap();
        assert_eq!(engine.size(), 2048);
        let spectrum = engine.forward(&vec![0.0; 2048]).unwrap();
        assert_eq!(spectrum.len(), 1024);
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }
}
