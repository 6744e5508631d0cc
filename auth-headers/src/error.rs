use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Missing authentication scheme")]
    MissingScheme,

    #[error("Invalid authentication scheme: {0:?}")]
    InvalidScheme(String),

    #[error("Invalid parameter name: {0:?}")]
    InvalidParameterName(String),

    #[error("Invalid value for parameter {name:?}: {reason}")]
    InvalidParameterValue { name: String, reason: &'static str },

    #[error("Failed to parse header near {fragment:?}: {reason}")]
    Parse { fragment: String, reason: String },

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(String),
}

impl HeaderError {
    pub(crate) fn parse(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_value(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidParameterValue {
            name: name.into(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, HeaderError>;
