//! Offline short-time spectral analysis of a single audio channel.
//!
//! Samples are zero-padded, cut into overlapping frames, windowed and
//! transformed, giving one magnitude spectrum per frame.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod fft;
pub mod frames;
pub mod session;
pub mod signal;
pub mod window;

pub use analysis::{Spectrogram, Spectrum};
pub use audio::decode::{PcmDecoder, SymphoniaDecoder};
pub use audio::loader::{Loader, PendingLoad};
pub use audio::source::AudioSource;
pub use config::AnalysisConfig;
pub use error::{Result, SpectraError};
pub use frames::{Frame, FrameLayout};
pub use session::{Session, Stage};
pub use signal::{PadPosition, Signal};
pub use window::WindowType;
