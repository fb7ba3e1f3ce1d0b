use thiserror::Error;

/// Why an asset did not make it into the scene. Logged, never retried.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch failed for {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("invalid glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF buffer {0} is not available")]
    MissingBuffer(String),
    #[error("data URI buffers are not supported")]
    DataUriBuffer,
    #[error("asset contains no triangle geometry")]
    NoGeometry,
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("asset {name:?}: {reason}")]
    InvalidAsset { name: String, reason: String },
    #[error("duplicate asset name {0:?}")]
    DuplicateAsset(String),
    #[error("{count} linked assets configured, at most {max} are supported")]
    TooManyLinks { count: usize, max: usize },
    #[error("{0}")]
    Invalid(String),
}
