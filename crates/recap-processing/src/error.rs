/// Failures of the normalization pipeline. Either one aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("unsupported or corrupt image: {0}")]
    Decode(String),

    #[error("failed to encode JPEG: {0}")]
    Encode(String),
}
