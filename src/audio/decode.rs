use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{Result, SpectraError};
use crate::signal::Signal;

/// Turns encoded audio bytes into one channel of samples.
pub trait PcmDecoder: Send + Sync {
    /// `hint` is a lowercase file extension when one is known.
    fn decode(&self, bytes: Vec<u8>, hint: Option<&str>) -> Result<Signal>;
}

/// Decoder backed by symphonia's default probe and codec registry.
///
/// Keeps only the first channel of multichannel streams.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymphoniaDecoder;

impl PcmDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: Vec<u8>, hint_ext: Option<&str>) -> Result<Signal> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = hint_ext {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| SpectraError::decode(format!("unrecognized audio format: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| SpectraError::decode("no audio tracks found"))?;

        let track_id = track.id;
        let channels = track.codec_params.channels.map_or(1, |c| c.count()).max(1);
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| SpectraError::decode("unknown sample rate"))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())?;

        let mut samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(symphonia::core::errors::Error::DecodeError(msg)) => {
                    log::debug!("Skipping undecodable packet: {}", msg);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            let mut sample_buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);

            extend_first_channel(&mut samples, sample_buf.samples(), spec.channels.count());
        }

        log::info!(
            "Decoded audio: {} samples, {}Hz, {:.1}s ({} channel{}, using first)",
            samples.len(),
            sample_rate,
            samples.len() as f32 / sample_rate as f32,
            channels,
            if channels == 1 { "" } else { "s" }
        );

        Ok(Signal::new(samples, sample_rate))
    }
}

/// Append channel 0 of an interleaved buffer laid out with `channels` lanes.
fn extend_first_channel(out: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    out.extend(interleaved.iter().step_by(channels.max(1)));
}
