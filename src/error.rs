use thiserror::Error;

/// Raised while building an [`AnnotationPolicy`](crate::AnnotationPolicy)
/// from user-supplied options.  Conversion itself never fails, so this is
/// reported before any document is touched.
#[derive(Debug, Error)]
pub enum PolicyConfigError {
    #[error("unknown annotation option `{0}`")]
    UnknownOption(String),

    #[error("invalid value `{value}` for option `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: &'static str,
    },

    #[error("expected KEY=VALUE, found `{0}`")]
    MalformedOption(String),

    #[error("invalid policy JSON: {0}")]
    Json(#[from] serde_json::Error),
}
