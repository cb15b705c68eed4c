use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("Invalid stadium '{stadium}': {reason}")]
    InvalidStadium { stadium: String, reason: String },

    #[error("Invalid team: {0}")]
    InvalidTeam(String),

    #[error("Invalid kick type: {0}")]
    InvalidKickType(String),

    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Missing frame data: {0}")]
    MissingFrameData(String),
}

impl FeatureError {
    /// Feature computations never substitute a default for these.
    ///
    /// `MissingFrameData` is the only non-fatal kind: the feature functions
    /// already map absent samples to sentinel values, so it only surfaces
    /// when a caller explicitly demands the data.
    pub fn is_fatal(&self) -> bool {
        match self {
            FeatureError::InvalidStadium { .. } => true,
            FeatureError::InvalidTeam(_) => true,
            FeatureError::InvalidKickType(_) => true,
            FeatureError::PreconditionViolation(_) => true,
            FeatureError::MissingFrameData(_) => false,
        }
    }

    pub(crate) fn invalid_stadium(stadium: &str, reason: impl Into<String>) -> Self {
        FeatureError::InvalidStadium { stadium: stadium.to_string(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, FeatureError>;
