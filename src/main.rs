mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use cli::Cli;
use specframe::config::{self, AnalysisConfig};
use specframe::{AudioSource, Loader, PadPosition, Session, Spectrogram, SymphoniaDecoder, WindowType};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let analysis = resolve_config(&cli)?;

    // Fail on bad parameters before downloading anything
    let mut session = Session::new(analysis.clone()).context("Invalid analysis settings")?;

    let source = AudioSource::parse(&cli.input);
    log::info!("specframe - offline spectral analysis");
    log::info!("Input: {}", source);
    log::info!(
        "Frame: {} samples, {}% overlap, {:?} window",
        analysis.frame_size,
        analysis.overlap_percent,
        analysis.window
    );

    let pending = Loader::new(Arc::new(SymphoniaDecoder))
        .on_finished(|src| log::debug!("Load callback for {}", src))
        .spawn(source);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} [{elapsed_precise}]")
            .context("Invalid progress template")?,
    );
    spinner.set_message(format!("Loading {}", pending.source()));
    while !pending.is_finished() {
        spinner.tick();
        std::thread::sleep(Duration::from_millis(80));
    }
    spinner.finish_and_clear();

    let signal = pending.wait().context("Failed to load audio")?;
    log::info!(
        "Signal: {} samples at {}Hz ({:.2}s)",
        signal.len(),
        signal.sample_rate,
        signal.duration_secs()
    );

    session.load(signal)?;
    session.pad()?;
    session.segment()?;
    session.analyze()?;

    let spectrogram = session
        .into_spectrogram()
        .context("Analysis produced no spectrogram")?;

    if cli.json {
        let out = serde_json::to_string(&spectrogram).context("Failed to serialize spectrogram")?;
        println!("{}", out);
    } else {
        print_summary(&spectrogram, cli.top.max(1));
    }

    log::info!("Done: {} spectra", spectrogram.len());
    Ok(())
}

/// CLI flags win; file values apply only where a flag is at its default.
fn resolve_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut analysis = AnalysisConfig {
        frame_size: cli.frame_size,
        sample_rate: cli.sample_rate,
        overlap_percent: cli.overlap,
        window: cli.window,
        pad: cli.pad,
        pad_count: cli.pad_count,
    };

    let Some(path) = config::find_config(cli.config.as_deref()) else {
        return Ok(analysis);
    };

    match config::load_config(&path) {
        Ok(cfg) => {
            log::info!("Loaded config from {}", path.display());
            let file = cfg.analysis;
            if cli.frame_size == config::default_frame_size() { analysis.frame_size = file.frame_size; }
            if cli.sample_rate == config::default_sample_rate() { analysis.sample_rate = file.sample_rate; }
            if cli.overlap == config::default_overlap_percent() { analysis.overlap_percent = file.overlap_percent; }
            if cli.window == WindowType::default() { analysis.window = file.window; }
            if cli.pad == PadPosition::default() { analysis.pad = file.pad; }
            if cli.pad_count.is_none() { analysis.pad_count = file.pad_count; }
        }
        Err(err) if cli.config.is_some() => {
            return Err(err).context("Failed to load the requested config file");
        }
        Err(err) => log::warn!("Ignoring config {}: {}", path.display(), err),
    }

    Ok(analysis)
}

fn print_summary(spectrogram: &Spectrogram, top: usize) {
    println!(
        "# {} frames, {} bins of {:.2}Hz, hop {} samples",
        spectrogram.len(),
        spectrogram.fft_size / 2,
        spectrogram.bin_width(),
        spectrogram.hop_size
    );
    println!("{:>6} {:>10}  peaks (Hz:magnitude)", "frame", "start_s");

    for (index, spectrum) in spectrogram.spectra.iter().enumerate() {
        let mut bins: Vec<(usize, f32)> = spectrum.magnitudes.iter().copied().enumerate().collect();
        bins.sort_by(|a, b| b.1.total_cmp(&a.1));
        let peaks = bins
            .iter()
            .take(top)
            .map(|&(bin, mag)| format!("{:.1}:{:.4}", spectrogram.bin_to_hz(bin), mag))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{:>6} {:>10.4}  {}",
            index,
            spectrogram.frame_start_seconds(index),
            peaks
        );
    }
}
