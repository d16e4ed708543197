use thiserror::Error;

/// Contract errors raised by the normalization pipeline.
///
/// `InvalidArgument` and `UnsupportedValue` signal a caller bug and are meant to
/// fail fast. `UpstreamFailure` is an expected runtime condition; the dashboard
/// turns it into a "not found" view instead of propagating it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),
}

impl CoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedValue(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFailure(message.into())
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamFailure(_))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArgument(format!("malformed weather record: {err}"))
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_errors_become_invalid_argument() {
        let err: CoreError = serde_json::from_str::<u8>("\"abc\"").unwrap_err().into();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
        assert!(err.to_string().contains("malformed weather record"));
    }

    #[test]
    fn only_upstream_is_upstream() {
        assert!(CoreError::upstream("404").is_upstream());
        assert!(!CoreError::unsupported("kelvin").is_upstream());
        assert!(!CoreError::invalid_argument("x").is_upstream());
    }
}
