//! Error types for the report formatter.

/// Failures surfaced to the caller.
///
/// Extraction misses and unrecognized lines are not errors; only structural
/// problems with the input and invalid settings are.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A report type requires an anchor (date line, header) that is absent.
    #[error("missing anchor: {0}")]
    MissingAnchor(String),

    /// A settings value was out of range or referred to an unknown section.
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    /// The settings document could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The report type tag is not one of the supported formats.
    #[error("unknown report type: {0}")]
    UnknownReportType(String),
}

/// Convenience type alias for Results with FormatError.
pub type FormatResult<T> = Result<T, FormatError>;

impl FormatError {
    pub fn missing_anchor(msg: impl Into<String>) -> Self {
        Self::MissingAnchor(msg.into())
    }

    pub fn invalid_setting(msg: impl Into<String>) -> Self {
        Self::InvalidSetting(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<toml::de::Error> for FormatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormatError::missing_anchor("no dated lines in kingdom news");
        assert_eq!(err.to_string(), "missing anchor: no dated lines in kingdom news");

        let err = FormatError::UnknownReportType("foo".into());
        assert_eq!(err.to_string(), "unknown report type: foo");
    }

    #[test]
    fn test_toml_error_conversion() {
        let parsed: Result<toml::Value, _> = toml::from_str("[unclosed");
        let err: FormatError = parsed.unwrap_err().into();
        assert!(matches!(err, FormatError::Config(_)));
    }
}
