//! Model repository resolution over local paths and the Hugging Face Hub.

use crate::config::{ModelConfig, ModelSource};
use crate::error::{Error, Result};
use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Cache, CacheRepo, Repo, RepoType};
use std::path::PathBuf;
use tracing::debug;

/// Model repository sources.
#[derive(Debug)]
pub enum ModelRepo {
    /// Local filesystem path
    Path(PathBuf),
    /// Hugging Face cache repository
    Cache(CacheRepo),
    /// Hugging Face API repository
    Api(ApiRepo),
}

impl ModelRepo {
    /// Open the repository described by the model configuration.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let repo = || match &config.revision {
            Some(revision) => Repo::with_revision(config.id.clone(), RepoType::Model, revision.clone()),
            None => Repo::model(config.id.clone()),
        };

        match config.source {
            ModelSource::Auto => match &config.path {
                Some(path) if path.is_dir() => Ok(Self::Path(path.clone())),
                _ => Self::api(repo()),
            },
            ModelSource::Path => config
                .path
                .clone()
                .map(Self::Path)
                .ok_or_else(|| Error::ConfigValidation {
                    message: "model.source = \"path\" requires model.path".to_string(),
                }),
            ModelSource::Cache => Ok(Self::Cache(Cache::from_env().repo(repo()))),
            ModelSource::Api => Self::api(repo()),
        }
    }

    fn api(repo: Repo) -> Result<Self> {
        let id = repo.url();
        let api = ApiBuilder::from_env()
            .with_progress(false)
            .build()
            .map_err(|e| Error::ModelResolve {
                repo: id,
                file: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self::Api(api.repo(repo)))
    }

    /// Human-readable repository identifier for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Cache(_) => "hf-cache".to_string(),
            Self::Api(api_repo) => api_repo.url(""),
        }
    }

    /// Resolve a file name to its full path in this repository.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        debug!("Resolving {file_name} from {}", self.describe());
        let error = |reason: String| Error::ModelResolve {
            repo: self.describe(),
            file: file_name.to_string(),
            reason,
        };

        match self {
            Self::Path(path) => {
                let candidate = path.join(file_name);
                if candidate.is_file() {
                    Ok(candidate)
                } else {
                    Err(error("file not found".to_string()))
                }
            }
            Self::Cache(cache_repo) => cache_repo
                .get(file_name)
                .ok_or_else(|| error("not present in local cache".to_string())),
            Self::Api(api_repo) => api_repo.get(file_name).map_err(|e| error(e.to_string())),
        }
    }

    /// Try resolving multiple file names, return first successful match.
    pub fn resolve_any(&self, candidates: &[String]) -> Result<PathBuf> {
        let mut last_error = None;
        for name in candidates {
            match self.resolve(name) {
                Ok(path) => return Ok(path),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| Error::ModelResolve {
            repo: self.describe(),
            file: String::new(),
            reason: "no candidate file names given".to_string(),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_repo_resolves_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();

        let repo = ModelRepo::Path(dir.path().to_path_buf());
        let path = repo.resolve("config.json").unwrap();
        assert!(path.ends_with("config.json"));
    }

    #[test]
    fn test_path_repo_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let repo = ModelRepo::Path(dir.path().to_path_buf());
        assert!(matches!(
            repo.resolve("model.onnx"),
            Err(Error::ModelResolve { .. })
        ));
    }

    #[test]
    fn test_resolve_any_returns_first_match() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("onnx")).unwrap();
        std::fs::write(dir.path().join("onnx/model.onnx"), b"onnx").unwrap();

        let repo = ModelRepo::Path(dir.path().to_path_buf());
        let candidates = vec!["model.onnx".to_string(), "onnx/model.onnx".to_string()];
        let path = repo.resolve_any(&candidates).unwrap();
        assert!(path.ends_with("onnx/model.onnx"));
    }

    #[test]
    fn test_auto_source_prefers_existing_local_dir() {
        let dir = TempDir::new().unwrap();
        let config = ModelConfig {
            path: Some(dir.path().to_path_buf()),
            ..ModelConfig::default()
        };
        let repo = ModelRepo::from_config(&config).unwrap();
        assert!(matches!(repo, ModelRepo::Path(_)));
    }
}
