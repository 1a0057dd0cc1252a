use thiserror::Error;

/// A label that does not name one of the 52 cards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card label: {0:?}")]
pub struct ParseCardError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown suit {0:?}, expected C, D, H, S or a suit name")]
pub struct ParseSuitError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("invalid card label: {0:?}")]
    InvalidCardLabel(String),
    #[error("trick already complete, start a new trick")]
    TrickAlreadyComplete,
    #[error("trick has only {0} of 4 cards")]
    IncompleteTrick(usize),
}

impl From<ParseCardError> for TrickError {
    fn from(err: ParseCardError) -> Self {
        TrickError::InvalidCardLabel(err.0)
    }
}

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("line {line}: bad confidence {value:?}, expected 0.0-1.0")]
    BadConfidence { line: usize, value: String },
    #[error("failed to read detections: {0}")]
    Io(#[from] std::io::Error),
}
