//! Error types for amd-service.

/// Result type alias for amd-service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// How a failure surfaces to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The model is not loaded yet (503).
    ServiceUnavailable,
    /// The uploaded audio could not be decoded or resampled (400).
    BadInput,
    /// Feature extraction or the forward pass failed (500).
    InferenceFault,
    /// Model or configuration failure that prevents serving.
    StartupFault,
}

/// Top-level error type for amd-service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A model repository file could not be resolved.
    #[error("failed to resolve '{file}' from model repository '{repo}': {reason}")]
    ModelResolve {
        /// Repository identifier or local path.
        repo: String,
        /// Requested file name.
        file: String,
        /// Description of the failure.
        reason: String,
    },

    /// A model metadata file could not be parsed.
    #[error("failed to parse model metadata '{path}'")]
    ModelMetadata {
        /// Path to the metadata file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to build the inference session.
    #[error("failed to load model: {reason}")]
    ModelLoad {
        /// Description of the load failure.
        reason: String,
    },

    /// A model-dependent operation ran before the model was loaded.
    #[error("Model not loaded")]
    ModelNotLoaded,

    /// Unsupported or unrecognized audio container.
    #[error("unsupported audio format: {reason}")]
    UnsupportedAudioFormat {
        /// Description from the probe.
        reason: String,
    },

    /// Failed to decode audio.
    #[error("failed to decode audio: {reason}")]
    AudioDecode {
        /// Description of the decode failure.
        reason: String,
    },

    /// No audio tracks found.
    #[error("no audio tracks found in upload")]
    NoAudioTracks,

    /// The upload decoded to zero samples.
    #[error("audio contains no samples")]
    EmptyAudio,

    /// The request did not carry an audio upload.
    #[error("missing audio upload: {reason}")]
    MissingUpload {
        /// Description of what was missing.
        reason: String,
    },

    /// Failed to resample audio.
    #[error("failed to resample audio: {reason}")]
    Resample {
        /// Description of the resampling failure.
        reason: String,
    },

    /// Feature extraction failed.
    #[error("feature extraction failed: {reason}")]
    FeatureExtraction {
        /// Description of the failure.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Predicted class index has no entry in the label table.
    #[error("predicted class {index} has no label")]
    UnknownLabel {
        /// Predicted class index.
        index: usize,
    },

    /// Failed to bind the HTTP listener.
    #[error("failed to bind {addr}")]
    Bind {
        /// Address that could not be bound.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Classify this error for the HTTP boundary.
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::ModelNotLoaded => FailureKind::ServiceUnavailable,
            Self::UnsupportedAudioFormat { .. }
            | Self::AudioDecode { .. }
            | Self::NoAudioTracks
            | Self::EmptyAudio
            | Self::MissingUpload { .. }
            | Self::Resample { .. } => FailureKind::BadInput,
            Self::FeatureExtraction { .. } | Self::Inference { .. } | Self::UnknownLabel { .. } => {
                FailureKind::InferenceFault
            }
            Self::Io(_)
            | Self::ConfigDirNotFound
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValidation { .. }
            | Self::ModelResolve { .. }
            | Self::ModelMetadata { .. }
            | Self::ModelLoad { .. }
            | Self::Bind { .. } => FailureKind::StartupFault,
        }
    }
}
