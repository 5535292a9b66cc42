use std::path::PathBuf;

/// Failures that callers need to tell apart by stage.
#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("model '{id}' not found (searched: {})", display_paths(.searched))]
    ModelNotFound { id: String, searched: Vec<PathBuf> },

    #[error("failed to load model {}: {message}", .path.display())]
    ModelLoad { path: PathBuf, message: String },

    #[error("failed to read image {}: {source}", .path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unexpected model output shape {shape:?}")]
    UnexpectedOutput { shape: Vec<usize> },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid color '{0}' (expected a name like 'green' or '#rrggbb')")]
    InvalidColor(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
