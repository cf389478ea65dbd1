use std::sync::Arc;
use std::thread::JoinHandle;

use super::decode::PcmDecoder;
use super::source::AudioSource;
use crate::error::{Result, SpectraError};
use crate::signal::Signal;

type FinishedCallback = Box<dyn FnOnce(&AudioSource) + Send>;

/// Fetches and decodes audio off the calling thread.
pub struct Loader {
    decoder: Arc<dyn PcmDecoder>,
    on_finished: Option<FinishedCallback>,
}

/// Handle to a load running in the background.
pub struct PendingLoad {
    source: AudioSource,
    handle: JoinHandle<Result<Signal>>,
}

impl Loader {
    pub fn new(decoder: Arc<dyn PcmDecoder>) -> Self {
        Self {
            decoder,
            on_finished: None,
        }
    }

    /// Called once, from the loading thread, after a successful decode.
    pub fn on_finished(mut self, callback: impl FnOnce(&AudioSource) + Send + 'static) -> Self {
        self.on_finished = Some(Box::new(callback));
        self
    }

    /// Load on the current thread.
    pub fn load(self, source: &AudioSource) -> Result<Signal> {
        let bytes = source.fetch()?;
        let signal = self.decoder.decode(bytes, source.extension().as_deref())?;
        log::info!("Finished loading: {}", source);
        if let Some(callback) = self.on_finished {
            callback(source);
        }
        Ok(signal)
    }

    pub fn spawn(self, source: AudioSource) -> PendingLoad {
        let thread_source = source.clone();
        let handle = std::thread::spawn(move || self.load(&thread_source));
        PendingLoad { source, handle }
    }
}

impl PendingLoad {
    pub fn source(&self) -> &AudioSource {
        &self.source
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the load completes.
    pub fn wait(self) -> Result<Signal> {
        self.handle.join().map_err(|_| SpectraError::Acquisition {
            source_name: self.source.to_string(),
            message: "loader thread panicked".into(),
        })?
    }
}
