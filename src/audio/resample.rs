//! Audio resampling using rubato.

use crate::error::{Error, Result};
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

const CHUNK_SIZE: usize = 1024;
const CHANNELS: usize = 1;

/// Resample mono audio to the target sample rate.
///
/// Returns the input unchanged if already at the target rate.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples);
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(Error::Resample {
            reason: format!("invalid sample rate conversion {from_rate} Hz -> {to_rate} Hz"),
        });
    }

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        1,
        CHANNELS,
        FixedSync::Both,
    )
    .map_err(|e| Error::Resample {
        reason: e.to_string(),
    })?;

    let frames_needed = resampler.input_frames_next();
    let delay = resampler.output_delay();
    let expected_len = expected_output_len(samples.len(), from_rate, to_rate);
    let mut output = Vec::with_capacity(delay + expected_len + CHUNK_SIZE);

    let mut chunks = samples.chunks_exact(frames_needed);
    for chunk in chunks.by_ref() {
        output.extend(process_chunk(&mut resampler, chunk)?);
    }

    // Zero-pad the tail to a full chunk
    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut padded = tail.to_vec();
        padded.resize(frames_needed, 0.0);
        output.extend(process_chunk(&mut resampler, &padded)?);
    }

    // Flush the filter so the last `delay` frames of real signal come out
    let silence = vec![0.0; frames_needed];
    while output.len() < delay + expected_len {
        output.extend(process_chunk(&mut resampler, &silence)?);
    }

    output.drain(..delay);
    output.truncate(expected_len);
    Ok(output)
}

fn process_chunk(resampler: &mut Fft<f32>, chunk: &[f32]) -> Result<Vec<f32>> {
    let input = SequentialSlice::new(chunk, CHANNELS, chunk.len()).map_err(|e| Error::Resample {
        reason: format!("failed to create input adapter: {e}"),
    })?;

    let resampled = resampler
        .process(&input, 0, None)
        .map_err(|e| Error::Resample {
            reason: e.to_string(),
        })?;

    Ok(resampled.take_data())
}

/// Output length proportional to the input duration.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn expected_output_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    ((input_len as f64) * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize
}
