//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "amd-service";

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "HuggingFace AMD Service";

/// Default pretrained model repository.
pub const DEFAULT_MODEL_ID: &str = "jakeBland/wav2vec-vm-finetune";

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default maximum upload size in bytes (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Multipart field carrying the audio upload.
pub const UPLOAD_FIELD: &str = "file";

/// Framing window applied after normalization.
pub mod framing {
    /// Clips shorter than this are zero-padded.
    pub const MIN_SECONDS: u32 = 2;
    /// Clips longer than this are truncated.
    pub const MAX_SECONDS: u32 = 5;
}

/// Model repository file names.
pub mod model_files {
    /// Feature extractor configuration.
    pub const PREPROCESSOR_CONFIG: &str = "preprocessor_config.json";
    /// Model configuration holding `id2label`.
    pub const MODEL_CONFIG: &str = "config.json";
    /// ONNX weight candidates, tried in order.
    pub const ONNX_CANDIDATES: &[&str] = &["model.onnx", "onnx/model.onnx"];
}

/// ONNX graph tensor names used by Hugging Face exports.
pub mod tensor_names {
    /// Waveform input.
    pub const INPUT_VALUES: &str = "input_values";
    /// Optional attention mask input.
    pub const ATTENTION_MASK: &str = "attention_mask";
    /// Classification logits output.
    pub const LOGITS: &str = "logits";
}

/// Wav2Vec2 feature extractor defaults.
pub mod feature_extractor {
    /// Sample rate Wav2Vec2 checkpoints are trained on.
    pub const DEFAULT_SAMPLING_RATE: u32 = 16_000;
    /// Variance epsilon for zero-mean unit-variance normalization.
    pub const NORMALIZE_EPSILON: f32 = 1e-7;
}

/// Byte conversion used for model size reporting.
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;
