use crate::analysis::{self, Spectrogram};
use crate::config::AnalysisConfig;
use crate::error::{Result, SpectraError};
use crate::frames::{self, Frame, FrameLayout};
use crate::signal::{self, PadPosition, Signal};

/// Progress of a session. Each step happens at most once, in this order;
/// padding may be skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Empty,
    Loaded,
    Padded,
    Segmented,
    Analyzed,
}

/// One pass of the signal -> frames -> spectra pipeline.
#[derive(Debug)]
pub struct Session {
    config: AnalysisConfig,
    layout: FrameLayout,
    stage: Stage,
    signal: Option<Signal>,
    frames: Vec<Frame>,
    spectrogram: Option<Spectrogram>,
}

impl Session {
    /// Fails on an invalid configuration before any audio is touched.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let layout = config.validate()?;
        Ok(Self {
            config,
            layout,
            stage: Stage::Empty,
            signal: None,
            frames: Vec::new(),
            spectrogram: None,
        })
    }

    /// Validate the config, then load, pad, segment and analyze `signal`.
    pub fn run(config: AnalysisConfig, signal: Signal) -> Result<Self> {
        let mut session = Session::new(config)?;
        session.load(signal)?;
        session.pad()?;
        session.segment()?;
        session.analyze()?;
        Ok(session)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn signal(&self) -> Option<&Signal> {
        self.signal.as_ref()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn spectrogram(&self) -> Option<&Spectrogram> {
        self.spectrogram.as_ref()
    }

    pub fn into_spectrogram(self) -> Option<Spectrogram> {
        self.spectrogram
    }

    pub fn load(&mut self, signal: Signal) -> Result<()> {
        self.require_stage(&[Stage::Empty], "load")?;
        if signal.sample_rate != self.config.sample_rate {
            log::warn!(
                "Signal is {}Hz, configured for {}Hz; analyzing at {}Hz",
                signal.sample_rate,
                self.config.sample_rate,
                signal.sample_rate
            );
        }
        self.signal = Some(signal);
        self.stage = Stage::Loaded;
        Ok(())
    }

    /// Pad using the configured position and count.
    pub fn pad(&mut self) -> Result<()> {
        self.pad_with(self.config.pad, self.config.pad_count)
    }

    pub fn pad_with(&mut self, position: PadPosition, explicit_count: Option<usize>) -> Result<()> {
        self.require_stage(&[Stage::Loaded], "pad")?;
        if let Some(raw) = self.signal.take() {
            self.signal = Some(signal::prepare(
                raw,
                self.layout.frame_size(),
                position,
                explicit_count,
            ));
        }
        self.stage = Stage::Padded;
        Ok(())
    }

    pub fn segment(&mut self) -> Result<()> {
        self.require_stage(&[Stage::Loaded, Stage::Padded], "segment")?;
        let samples = self.signal.as_ref().map_or(&[][..], |s| s.samples.as_slice());
        self.frames = frames::segment(samples, &self.layout);
        log::info!(
            "Segmented {} samples into {} frames",
            samples.len(),
            self.frames.len()
        );
        self.stage = Stage::Segmented;
        Ok(())
    }

    pub fn analyze(&mut self) -> Result<()> {
        self.require_stage(&[Stage::Segmented], "analyze")?;
        let sample_rate = self
            .signal
            .as_ref()
            .map_or(self.config.sample_rate, |s| s.sample_rate);
        let spectrogram = analysis::analyze(
            &self.frames,
            self.layout.frame_size(),
            self.layout.new_data_size(),
            sample_rate,
            self.config.window,
        )?;
        self.spectrogram = Some(spectrogram);
        self.stage = Stage::Analyzed;
        Ok(())
    }

    fn require_stage(&self, allowed: &[Stage], operation: &'static str) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(SpectraError::Stage {
                operation,
                actual: self.stage,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowType;

    fn tone(len: usize) -> Signal {
        let samples = (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 44100.0).sin())
            .collect();
        Signal::new(samples, 44100)
    }

    #[test]
    fn runs_full_pipeline() {
        let session = Session::run(AnalysisConfig::default(), tone(5000)).unwrap();
        assert_eq!(session.stage(), Stage::Analyzed);
        // 5000 padded to 6144: frames at 2048, 3072, 4096, 5120 and the tail
        assert_eq!(session.signal().unwrap().len(), 6144);
        assert_eq!(session.frames().len(), 5);
        let spectrogram = session.spectrogram().unwrap();
        assert_eq!(spectrogram.len(), session.frames().len());
        let peak = spectrogram.peak_frequency(0).unwrap();
        assert!((peak - 1000.0).abs() <= spectrogram.bin_width());
    }

    #[test]
    fn invalid_config_fails_before_loading() {
        let config = AnalysisConfig {
            overlap_percent: 120,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(config),
            Err(SpectraError::Configuration(_))
        ));
    }

    #[test]
    fn padding_is_optional() {
        let mut session = Session::new(AnalysisConfig::default()).unwrap();
        session.load(tone(2048)).unwrap();
        session.segment().unwrap();
        session.analyze().unwrap();
        assert_eq!(session.frames().len(), 1);
        assert_eq!(session.spectrogram().unwrap().len(), 1);
    }

    #[test]
    fn out_of_order_steps_are_rejected() {
        let mut session = Session::new(AnalysisConfig::default()).unwrap();
        assert!(matches!(
            session.segment(),
            Err(SpectraError::Stage { actual: Stage::Empty, .. })
        ));

        session.load(tone(100)).unwrap();
        assert!(session.load(tone(100)).is_err());
        assert!(session.analyze().is_err());

        session.pad().unwrap();
        assert!(session.pad().is_err());
        session.segment().unwrap();
        session.analyze().unwrap();
        assert!(session.analyze().is_err());
        assert_eq!(session.stage(), Stage::Analyzed);
    }

    #[test]
    fn pad_at_start_shifts_samples() {
        let config = AnalysisConfig {
            frame_size: 8,
            overlap_percent: 50,
            pad: PadPosition::Start,
            window: WindowType::Rectangular,
            ..Default::default()
        };
        let mut session = Session::new(config).unwrap();
        session.load(Signal::new(vec![1.0; 5], 44100)).unwrap();
        session.pad().unwrap();
        assert_eq!(
            session.signal().unwrap().samples,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn empty_signal_yields_empty_spectrogram() {
        let session = Session::run(AnalysisConfig::default(), Signal::new(Vec::new(), 44100)).unwrap();
        assert!(session.frames().is_empty());
        assert!(session.spectrogram().unwrap().is_empty());
    }
}
