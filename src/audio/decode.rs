//! Audio decoding using symphonia.

use crate::error::{Error, Result};
use std::io::Cursor;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::conv::IntoSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::{debug, warn};

/// An uploaded audio clip, alive for one request.
#[derive(Debug, Clone, Default)]
pub struct AudioClip {
    /// Raw upload bytes.
    pub bytes: Vec<u8>,
    /// Original file name, used as a format hint.
    pub file_name: Option<String>,
    /// Declared MIME type, used as a format hint.
    pub content_type: Option<String>,
}

impl AudioClip {
    /// Wrap raw bytes without any format hints.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            ..Self::default()
        }
    }

    fn hint(&self) -> Hint {
        let mut hint = Hint::new();
        if let Some(ext) = self
            .file_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
        {
            hint.with_extension(ext);
        }
        if let Some(mime) = self.content_type.as_deref() {
            hint.mime_type(mime);
        }
        hint
    }
}

/// Decoded audio data.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Audio samples as mono f32.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Duration in seconds.
    pub duration_secs: f32,
}

/// Decode an in-memory audio clip to mono f32 samples.
///
/// The container is probed from the bytes themselves; file name and MIME
/// type only steer the probe. The clip's buffer is handed to the decoder
/// without copying.
pub fn decode_audio_bytes(clip: AudioClip) -> Result<DecodedAudio> {
    let hint = clip.hint();
    let source = Cursor::new(clip.bytes);
    let mss = MediaSourceStream::new(Box::new(source), MediaSourceStreamOptions::default());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::UnsupportedAudioFormat {
            reason: e.to_string(),
        })?;

    let mut format = probed.format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(Error::NoAudioTracks)?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode {
            reason: "missing sample rate".to_string(),
        })?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            reason: e.to_string(),
        })?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(symphonia::core::errors::Error::ResetRequired) => break,
            Err(e) => {
                return Err(Error::AudioDecode {
                    reason: e.to_string(),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => append_samples(&decoded, &mut samples),
            // A corrupt packet is recoverable; the rest of the stream may still decode.
            Err(symphonia::core::errors::Error::DecodeError(reason)) => {
                warn!("Skipping undecodable packet: {reason}");
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    reason: e.to_string(),
                });
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let duration_secs = samples.len() as f32 / sample_rate as f32;

    debug!(
        "Decoded {} samples @ {} Hz ({:.2}s)",
        samples.len(),
        sample_rate,
        duration_secs
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        duration_secs,
    })
}

/// Append decoded samples to the output buffer, converting to mono.
fn append_samples(buffer: &AudioBufferRef, output: &mut Vec<f32>) {
    match buffer {
        AudioBufferRef::U8(buf) => mix_to_mono(buf, output),
        AudioBufferRef::U16(buf) => mix_to_mono(buf, output),
        AudioBufferRef::U24(buf) => mix_to_mono(buf, output),
        AudioBufferRef::U32(buf) => mix_to_mono(buf, output),
        AudioBufferRef::S8(buf) => mix_to_mono(buf, output),
        AudioBufferRef::S16(buf) => mix_to_mono(buf, output),
        AudioBufferRef::S24(buf) => mix_to_mono(buf, output),
        AudioBufferRef::S32(buf) => mix_to_mono(buf, output),
        AudioBufferRef::F32(buf) => mix_to_mono(buf, output),
        AudioBufferRef::F64(buf) => mix_to_mono(buf, output),
    }
}

/// Average all channels of a planar buffer into mono f32.
fn mix_to_mono<S>(buf: &AudioBuffer<S>, output: &mut Vec<f32>)
where
    S: Sample + IntoSample<f32>,
{
    let channels = buf.spec().channels.count();
    if channels == 1 {
        output.extend(buf.chan(0).iter().map(|&s| s.into_sample()));
        return;
    }

    let frames = buf.frames();
    output.reserve(frames);
    for i in 0..frames {
        let mut sum = 0.0f32;
        for ch in 0..channels {
            let sample: f32 = buf.chan(ch)[i].into_sample();
            sum += sample;
        }
        #[allow(clippy::cast_precision_loss)]
        output.push(sum / channels as f32);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn wav_bytes(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_mono_wav() {
        let bytes = wav_bytes(16_000, 1, &[0, 16384, -16384, 0]);
        let decoded = decode_audio_bytes(AudioClip::from_bytes(bytes)).unwrap();
        assert_eq!(decoded.sample_rate, 16_000);
        assert_eq!(decoded.samples.len(), 4);
        assert!((decoded.samples[1] - 0.5).abs() < 1e-3);
        assert!((decoded.samples[2] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decode_stereo_mixes_to_mono() {
        // Interleaved L/R pairs: (0.5, -0.5) averages to 0, (0.5, 0.5) to 0.5
        let bytes = wav_bytes(8_000, 2, &[16384, -16384, 16384, 16384]);
        let decoded = decode_audio_bytes(AudioClip::from_bytes(bytes)).unwrap();
        assert_eq!(decoded.samples.len(), 2);
        assert!(decoded.samples[0].abs() < 1e-3);
        assert!((decoded.samples[1] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decode_garbage_is_unsupported_format() {
        let bytes: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
        let result = decode_audio_bytes(AudioClip::from_bytes(bytes));
        assert!(matches!(
            result,
            Err(Error::UnsupportedAudioFormat { .. } | Error::AudioDecode { .. })
        ));
    }

    #[test]
    fn test_hint_uses_file_extension() {
        let clip = AudioClip {
            bytes: wav_bytes(16_000, 1, &[1, 2, 3]),
            file_name: Some("call.wav".to_string()),
            content_type: Some("audio/wav".to_string()),
        };
        let decoded = decode_audio_bytes(clip).unwrap();
        assert_eq!(decoded.samples.len(), 3);
    }
}
