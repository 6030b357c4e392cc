pub type StardriftResult<T> = Result<T, StardriftError>;

#[derive(thiserror::Error, Debug)]
pub enum StardriftError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StardriftError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for StardriftError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            StardriftError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            StardriftError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            StardriftError::encode("x")
                .to_string()
                .contains("encode error:")
        );
        assert!(
            StardriftError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = StardriftError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn json_errors_map_to_serde_variant() {
        let err: StardriftError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, StardriftError::Serde(_)));
    }
}
