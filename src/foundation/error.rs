pub type WeaveResult<T> = Result<T, WeaveError>;

#[derive(thiserror::Error, Debug)]
pub enum WeaveError {
    #[error("validation error: {0}")]
    Validation(String),

    /// Export was rejected because these panels have neither a background
    /// color nor a background image.
    #[error("incomplete panels: {}", join_names(.0))]
    IncompletePanels(Vec<String>),

    #[error("layer load error: {0}")]
    LayerLoad(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn join_names(names: &[String]) -> String {
    names.join(", ")
}

impl WeaveError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn layer_load(msg: impl Into<String>) -> Self {
        Self::LayerLoad(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            WeaveError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            WeaveError::layer_load("x")
                .to_string()
                .contains("layer load error:")
        );
        assert!(
            WeaveError::encoding("x")
                .to_string()
                .contains("encoding error:")
        );
    }

    #[test]
    fn incomplete_panels_names_every_offender() {
        let err = WeaveError::IncompletePanels(vec!["BACK".to_string(), "LID".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("BACK"));
        assert!(msg.contains("LID"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = WeaveError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
