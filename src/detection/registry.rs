use std::path::{Path, PathBuf};

use crate::error::PoseError;

/// Extension of model files in the registry directory.
pub const MODEL_EXTENSION: &str = "rten";

/// Environment variable overriding the registry directory.
pub const MODEL_DIR_ENV: &str = "ISHPOSE_MODEL_DIR";

/// Resolves model identifiers to model files on disk.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    dir: PathBuf,
}

impl ModelRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Registry rooted at `$ISHPOSE_MODEL_DIR`, or the user cache directory.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
            return Ok(Self::new(dir));
        }
        Ok(Self::new(default_model_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Find the file for `id`.
    ///
    /// An id naming an existing file is used as-is. Otherwise the id is
    /// looked up as `<dir>/<id>.rten`, with `/` in versioned ids such as
    /// `ish/3` mapped to `-`.
    pub fn resolve(&self, id: &str) -> Result<PathBuf, PoseError> {
        let direct = Path::new(id);
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }

        let candidate = self.dir.join(format!("{}.{}", file_stem_for(id), MODEL_EXTENSION));
        if candidate.is_file() {
            return Ok(candidate);
        }

        Err(PoseError::ModelNotFound {
            id: id.to_string(),
            searched: vec![direct.to_path_buf(), candidate],
        })
    }
}

fn file_stem_for(id: &str) -> String {
    id.trim_matches('/').replace('/', "-")
}

/// `ishpose` under the platform cache directory (`~/.cache` on Linux,
/// `~/Library/Caches` on macOS, `%LOCALAPPDATA%` on Windows).
pub fn default_model_dir() -> anyhow::Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join("ishpose"))
        .ok_or_else(|| anyhow::anyhow!("no cache directory for this user; pass --model-dir"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_ids_map_to_dashed_file_names() {
        assert_eq!(file_stem_for("ish"), "ish");
        assert_eq!(file_stem_for("ish/3"), "ish-3");
        assert_eq!(file_stem_for("/ish/3/"), "ish-3");
    }

    #[test]
    fn default_dir_lives_under_the_platform_cache() {
        if let Some(cache) = dirs::cache_dir() {
            assert_eq!(default_model_dir().unwrap(), cache.join("ishpose"));
        } else {
            assert!(default_model_dir().is_err());
        }
    }
}
