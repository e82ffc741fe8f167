//! Shared fixtures for integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use amd_service::inference::{
    Classifier, ComputeDevice, FeatureExtractor, FeatureTensor, LabelTable,
};
use amd_service::model::ModelState;
use amd_service::{Error, Result};
use std::io::Cursor;

/// Classifier returning fixed logits regardless of input.
pub struct FixedLogits(pub Vec<f32>);

impl Classifier for FixedLogits {
    fn logits(&self, _features: &FeatureTensor) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }
}

/// Classifier whose forward pass always fails.
pub struct BrokenSession;

impl Classifier for BrokenSession {
    fn logits(&self, _features: &FeatureTensor) -> Result<Vec<f32>> {
        Err(Error::Inference {
            reason: "CUDA out of memory".to_string(),
        })
    }
}

fn model_with(classifier: Box<dyn Classifier>) -> ModelState {
    ModelState::new(
        "acme/amd-test",
        ComputeDevice::Cpu,
        FeatureExtractor::default(),
        classifier,
        LabelTable::new([(0, "Human".to_string()), (1, "VOICEMAIL".to_string())]),
        4_000_000,
    )
}

/// Model state with a stub classifier favouring `voicemail`.
pub fn stub_model() -> ModelState {
    model_with(Box::new(FixedLogits(vec![-1.0, 2.0])))
}

/// Model state whose classifier fails every forward pass.
pub fn broken_model() -> ModelState {
    model_with(Box::new(BrokenSession))
}

/// 16-bit mono sine wave encoded as WAV.
#[allow(clippy::cast_precision_loss)]
pub fn sine_wav(seconds: f32, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total = (seconds * sample_rate as f32) as usize;
        for i in 0..total {
            let t = i as f32 / sample_rate as f32;
            #[allow(clippy::cast_possible_truncation)]
            let s = ((t * 440.0 * std::f32::consts::TAU).sin() * 6_000.0) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Bytes that no audio demuxer accepts.
pub fn garbage(len: usize) -> Vec<u8> {
    #[allow(clippy::cast_possible_truncation)]
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}
