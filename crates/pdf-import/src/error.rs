use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("no decodable FlateDecode content stream found")]
    NoContentStreams,

    #[error("no geometry found in content streams")]
    NoGeometry,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
