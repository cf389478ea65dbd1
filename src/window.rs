use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Tapering functions applied to a frame before the transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    Rectangular,
    /// Triangular, zero at both ends.
    Bartlett,
    Blackman,
    Cosine,
    /// 0.54 - 0.46 cos(2πn/(N-1))
    #[default]
    Hamming,
    /// 0.5 - 0.5 cos(2πn/(N-1))
    Hann,
}

impl WindowType {
    /// Weight of sample `index` in a window of `length` samples.
    pub fn coefficient(self, index: usize, length: usize) -> f32 {
        if length <= 1 {
            return 1.0;
        }
        let denom = (length - 1) as f32;
        let x = index as f32;

        match self {
            WindowType::Rectangular => 1.0,
            WindowType::Bartlett => 2.0 / denom * (denom / 2.0 - (x - denom / 2.0).abs()),
            WindowType::Blackman => {
                0.42 - 0.5 * (2.0 * PI * x / denom).cos() + 0.08 * (4.0 * PI * x / denom).cos()
            }
            WindowType::Cosine => (PI * x / denom - PI / 2.0).cos(),
            WindowType::Hamming => 0.54 - 0.46 * (2.0 * PI * x / denom).cos(),
            WindowType::Hann => 0.5 * (1.0 - (2.0 * PI * x / denom).cos()),
        }
    }

    pub fn coefficients(self, length: usize) -> Vec<f32> {
        (0..length).map(|i| self.coefficient(i, length)).collect()
    }
}

/// Multiply `frame` in place by the window coefficients.
pub fn apply_window(frame: &mut [f32], window: WindowType) {
    let length = frame.len();
    for (i, sample) in frame.iter_mut().enumerate() {
        *sample *= window.coefficient(i, length);
    }
}

/// Multiply `frame` in place by precomputed coefficients of the same length.
pub fn apply_coefficients(frame: &mut [f32], coefficients: &[f32]) {
    debug_assert_eq!(frame.len(), coefficients.len());
    for (sample, w) in frame.iter_mut().zip(coefficients) {
        *sample *= w;
    }
}
