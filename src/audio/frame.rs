//! Peak normalization and fixed-window framing.

use crate::audio::{AudioClip, decode_audio_bytes, resample};
use crate::constants::framing;
use crate::error::{Error, Result};
use tracing::{debug, info};

/// Mono waveform at the model's target rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Samples in playback order.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Duration in seconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Maximum absolute sample value.
    pub fn peak(&self) -> f32 {
        peak(&self.samples)
    }
}

/// Sample-count bounds of the framing window at a given rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameWindow {
    /// Minimum length; shorter input is zero-padded to this.
    pub min_samples: usize,
    /// Maximum length; longer input is truncated to this.
    pub max_samples: usize,
}

impl FrameWindow {
    /// The [2s, 5s] window at `sample_rate`.
    pub fn for_rate(sample_rate: u32) -> Self {
        Self {
            min_samples: (sample_rate * framing::MIN_SECONDS) as usize,
            max_samples: (sample_rate * framing::MAX_SECONDS) as usize,
        }
    }
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

/// Divide by the peak absolute value. Silence is returned unchanged.
pub fn peak_normalize(mut samples: Vec<f32>) -> Vec<f32> {
    let max = peak(&samples);
    if max > 0.0 {
        for s in &mut samples {
            *s /= max;
        }
    }
    samples
}

/// Right-pad with zeros or truncate so the length falls inside `window`.
pub fn frame(mut samples: Vec<f32>, window: FrameWindow) -> Vec<f32> {
    let len = samples.len();
    if len < window.min_samples {
        debug!("Padding audio from {} -> {}", len, window.min_samples);
        samples.resize(window.min_samples, 0.0);
    } else if len > window.max_samples {
        debug!("Truncating audio from {} -> {}", len, window.max_samples);
        samples.truncate(window.max_samples);
    }
    samples
}

/// Decode, resample, normalize and frame an uploaded clip.
///
/// Normalization runs before framing, so padded regions are exact zeros.
pub fn preprocess_audio(clip: AudioClip, target_rate: u32) -> Result<Waveform> {
    let decoded = decode_audio_bytes(clip)?;
    info!(
        "Audio loaded: {} samples @ {} Hz",
        decoded.samples.len(),
        decoded.sample_rate
    );

    let samples = resample(decoded.samples, decoded.sample_rate, target_rate)?;
    if samples.is_empty() {
        return Err(Error::EmptyAudio);
    }

    let samples = peak_normalize(samples);
    info!("Audio normalized, max amplitude: {:.4}", peak(&samples));

    let samples = frame(samples, FrameWindow::for_rate(target_rate));

    Ok(Waveform {
        samples,
        sample_rate: target_rate,
    })
}
