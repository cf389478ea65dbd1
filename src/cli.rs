use clap::Parser;
use std::path::PathBuf;

use specframe::{PadPosition, WindowType};

#[derive(Parser, Debug)]
#[command(name = "specframe", about = "Overlapping-frame FFT analysis of an audio file")]
pub struct Cli {
    /// Input audio file or http(s) URL (WAV, MP3, FLAC, OGG)
    pub input: String,

    /// Config file (defaults to ./specframe.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Samples per frame and FFT length (power of two)
    #[arg(short, long, default_value_t = 2048)]
    pub frame_size: usize,

    /// Percentage of each frame shared with the previous one (0-99)
    #[arg(short, long, default_value_t = 50)]
    pub overlap: u32,

    /// Window applied before the transform
    #[arg(short, long, value_enum, default_value_t = WindowType::Hamming)]
    pub window: WindowType,

    /// Where to add zeros so the signal fills whole frames
    #[arg(long, value_enum, default_value_t = PadPosition::End)]
    pub pad: PadPosition,

    /// Pad with exactly this many zeros instead
    #[arg(long)]
    pub pad_count: Option<usize>,

    /// Expected sample rate; a mismatch is only reported
    #[arg(long, default_value_t = 44100)]
    pub sample_rate: u32,

    /// Print the full spectrogram as JSON
    #[arg(long)]
    pub json: bool,

    /// Strongest bins listed per frame in the text summary
    #[arg(long, default_value_t = 1)]
    pub top: usize,
}
