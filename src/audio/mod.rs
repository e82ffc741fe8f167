//! Audio processing pipeline.

mod decode;
mod frame;
mod resample;

pub use decode::{AudioClip, DecodedAudio, decode_audio_bytes};
pub use frame::{FrameWindow, Waveform, frame, peak_normalize, preprocess_audio};
pub use resample::resample;
