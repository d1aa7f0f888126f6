#[derive(thiserror::Error, Debug)]
pub enum PresentationError {
    #[error("presentation script is not valid slide JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("presentation script contains no slides")]
    NoSlides,

    #[error("audio duration must be a finite, non-negative number of seconds (got {0})")]
    InvalidDuration(f64),
}
