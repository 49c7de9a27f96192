//! # Structured Output
//!
//! Schema-constrained decoding of model answers. The JSON schema sent to
//! the model is derived from the Rust type; the answer is parsed back into
//! that type and validated, or the call fails. There is no lenient fallback
//! beyond stripping a markdown code fence.

use crate::error::PipelineError;
use crate::gateways::LanguageModel;
use crate::orchestrator::pipeline::Step;
use regex::Regex;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Upper bound on search queries per research step
pub const MAX_QUERIES: usize = 3;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*```(?:json|JSON)?\s*\n?([\s\S]*?)\s*```\s*$").unwrap()
});

/// A type the model can be asked to produce
pub trait StructuredOutput: DeserializeOwned + JsonSchema {
    /// Schema name sent with the request
    const NAME: &'static str;

    /// Constraints serde cannot express
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Search queries for a research step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QueryPlan {
    /// Web search queries, at most three
    #[schemars(length(max = 3))]
    pub queries: Vec<String>,
}

impl StructuredOutput for QueryPlan {
    const NAME: &'static str = "queries";

    fn validate(&self) -> Result<(), String> {
        if self.queries.len() > MAX_QUERIES {
            return Err(format!(
                "expected at most {} queries, got {}",
                MAX_QUERIES,
                self.queries.len()
            ));
        }
        Ok(())
    }
}

/// Parse and validate a raw model answer
pub fn decode<T: StructuredOutput>(raw: &str) -> Result<T, String> {
    let body = CODE_FENCE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |m| m.as_str());

    let value: T = serde_json::from_str(body.trim()).map_err(|e| e.to_string())?;
    value.validate()?;
    Ok(value)
}

/// Ask the model for a `T` and decode it.
///
/// Gateway failures surface as [`PipelineError::Llm`], unusable answers as
/// [`PipelineError::Decode`]; both are attributed to `step`.
pub async fn generate_structured<T: StructuredOutput>(
    llm: &dyn LanguageModel,
    step: Step,
    system: &str,
    user: &str,
) -> Result<T, PipelineError> {
    let schema = serde_json::to_value(schemars::schema_for!(T)).map_err(|e| {
        PipelineError::Decode {
            step,
            reason: format!("schema generation failed: {}", e),
        }
    })?;

    let raw = llm
        .generate_json(system, user, T::NAME, &schema)
        .await
        .map_err(|source| PipelineError::Llm { step, source })?;

    decode::<T>(&raw).map_err(|reason| {
        tracing::warn!(%step, %reason, "structured output rejected");
        PipelineError::Decode { step, reason }
    })
}
