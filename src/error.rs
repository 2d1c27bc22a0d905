use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid viewport width: {width}")]
    InvalidViewport { width: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
