//! # Errors
//!
//! Error taxonomy for the essay pipeline.
//!
//! Only per-query search failures are recovered (turned into placeholder
//! snippets by the researcher). Everything else aborts the run.

use crate::orchestrator::pipeline::Step;
use thiserror::Error;

/// Failure talking to an external service (language model or search).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered but the body was not what we expected
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The model returned no choices or no text
    #[error("empty response from model")]
    EmptyResponse,
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing credential or invalid setting; raised before the run starts
    #[error("configuration error: {0}")]
    Config(String),

    /// The model's answer could not be coerced into the query-list shape
    #[error("could not decode search queries during {step}: {reason}")]
    Decode { step: Step, reason: String },

    /// A language-model call failed
    #[error("language model call failed during {step}: {source}")]
    Llm {
        step: Step,
        #[source]
        source: GatewayError,
    },

    /// The run stopped before its last step (dropped stream, panic or shutdown)
    #[error("run aborted: {0}")]
    Aborted(String),
}

impl PipelineError {
    /// Step the error occurred in, if it happened inside a step
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Decode { step, .. } | Self::Llm { step, .. } => Some(*step),
            Self::Config(_) | Self::Aborted(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = GatewayError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 429: rate limited");
    }

    #[test]
    fn test_llm_error_names_step() {
        let err = PipelineError::Llm {
            step: Step::Reflect,
            source: GatewayError::EmptyResponse,
        };
        assert_eq!(err.step(), Some(Step::Reflect));
        assert!(err.to_string().contains("reflect"));
        assert!(err.to_string().contains("empty response"));
    }

    #[test]
    fn test_config_error_has_no_step() {
        let err = PipelineError::Config("OPENAI_API_KEY missing".to_string());
        assert_eq!(err.step(), None);
    }
}
