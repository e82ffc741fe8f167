//! Integration tests for audio preprocessing.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

mod common;

use amd_service::audio::{AudioClip, FrameWindow, frame, peak_normalize, preprocess_audio};
use amd_service::error::FailureKind;

#[test]
fn test_one_second_clip_is_padded_to_two_seconds() {
    let clip = AudioClip::from_bytes(common::sine_wav(1.0, 16_000));
    let waveform = preprocess_audio(clip, 16_000).unwrap();

    assert_eq!(waveform.samples.len(), 32_000);
    assert!((waveform.peak() - 1.0).abs() < 1e-6);
    assert!(waveform.samples[16_000..].iter().all(|s| *s == 0.0));
}

#[test]
fn test_long_clip_is_truncated_to_five_seconds() {
    let clip = AudioClip::from_bytes(common::sine_wav(7.0, 16_000));
    let waveform = preprocess_audio(clip, 16_000).unwrap();

    assert_eq!(waveform.samples.len(), 80_000);
    assert!((waveform.duration_secs() - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_resampled_clip_lands_in_window() {
    let clip = AudioClip::from_bytes(common::sine_wav(3.0, 44_100));
    let waveform = preprocess_audio(clip, 16_000).unwrap();

    let window = FrameWindow::for_rate(16_000);
    assert_eq!(waveform.sample_rate, 16_000);
    assert!(waveform.samples.len() >= window.min_samples);
    assert!(waveform.samples.len() <= window.max_samples);
    assert!(waveform.peak() <= 1.0 + 1e-6);
}

#[test]
fn test_garbage_is_bad_input() {
    let clip = AudioClip::from_bytes(common::garbage(4096));
    let err = preprocess_audio(clip, 16_000).unwrap_err();
    assert_eq!(err.kind(), FailureKind::BadInput);
}

#[test]
fn test_silence_survives_normalization() {
    let window = FrameWindow::for_rate(16_000);
    let framed = frame(peak_normalize(vec![0.0; 1_000]), window);
    assert_eq!(framed.len(), window.min_samples);
    assert!(framed.iter().all(|s| *s == 0.0));
}
