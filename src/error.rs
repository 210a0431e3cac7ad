use crate::state::Stage;
use thiserror::Error;

/// Model output that does not match the shape a stage expects.
#[derive(Debug, Error)]
#[error("failed to parse {target}: {source}")]
pub struct ParseError {
    pub target: &'static str,
    #[source]
    pub source: serde_json::Error,
    pub payload: String,
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("text generation failed: {0:#}")]
    Service(anyhow::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("pipeline invariant violated: {0}")]
    Invariant(String),
}

/// Terminal error of a run, attributed to the stage that failed.
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: StageError) -> Self {
        Self { stage, source }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self.source, StageError::Parse(_))
    }

    pub fn is_service_error(&self) -> bool {
        matches!(self.source, StageError::Service(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_display_names_stage() {
        let err = PipelineError::new(
            Stage::Writing,
            StageError::Service(anyhow::anyhow!("quota exceeded")),
        );
        assert_eq!(
            err.to_string(),
            "Writing failed: text generation failed: quota exceeded"
        );
        assert!(err.is_service_error());
        assert!(!err.is_parse_error());
    }
}
