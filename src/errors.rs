use thiserror::Error;

#[derive(Debug, Error)]
pub enum JogError {
    #[error("Invalid sample period. Expected: > 0 ms, Received: {0} ms")]
    InvalidSamplePeriod(u64),
    #[error("The pulse output reports a zero duty range.")]
    ZeroDutyRange,
}
