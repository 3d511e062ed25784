use thiserror::Error;

/// failures while loading a rain height probability table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("unable to read the rain height table")]
    Io(#[from] std::io::Error),
    #[error("expected 49 rain height intervals, found {found}")]
    RowCount { found: usize },
    #[error("line {line}: expected an offset and a probability")]
    MalformedRow { line: usize },
    #[error("line {line}: invalid number '{field}'")]
    InvalidNumber { line: usize, field: String },
    #[error("line {line}: negative probability")]
    NegativeProbability { line: usize },
    #[error("line {line}: first offset must be -2400 m, got {found} m")]
    FirstOffset { line: usize, found: f64 },
    #[error("line {line}: offset does not follow the previous one by 100 m")]
    OffsetStep { line: usize },
}

#[derive(Debug, Error)]
pub enum AttenuationError {
    #[error("rain height table unavailable")]
    Table(#[from] TableError),
    #[error("frequency must be positive, got {0} Hz")]
    NonPositiveFrequency(f64),
    #[error("distance must not be negative, got {0} m")]
    NegativeDistance(f64),
    #[error("rain rate must not be negative, got {0} mm/h")]
    NegativeRainRate(f64),
    #[error("{0} is not a finite number")]
    NonFinite(&'static str),
}

/// reject NaN and infinities before they reach a formula
pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, AttenuationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AttenuationError::NonFinite(name))
    }
}
