use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confidence gained per folded response unless configured otherwise.
pub const DEFAULT_CONFIDENCE_STEP: u32 = 5;
/// Confidence never exceeds this value.
pub const MAX_CONFIDENCE: u32 = 100;

/// Which responses count toward a subcategory's averaging denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominatorPolicy {
    /// Every folded response, answered or not; blank responses pull averages down.
    #[default]
    AllResponses,
    /// Only responses that answered at least one of the subcategory's questions.
    AnsweringResponses,
}

impl DenominatorPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AllResponses => "all_responses",
            Self::AnsweringResponses => "answering_responses",
        }
    }
}

impl fmt::Display for DenominatorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDenominatorPolicy(pub String);

impl fmt::Display for UnknownDenominatorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown denominator policy '{}'; expected all_responses or answering_responses",
            self.0
        )
    }
}

impl std::error::Error for UnknownDenominatorPolicy {}

impl FromStr for DenominatorPolicy {
    type Err = UnknownDenominatorPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all_responses" | "all" => Ok(Self::AllResponses),
            "answering_responses" | "answering" => Ok(Self::AnsweringResponses),
            other => Err(UnknownDenominatorPolicy(other.to_string())),
        }
    }
}

/// Tunables for the manager aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub confidence_step: u32,
    pub denominator: DenominatorPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            confidence_step: DEFAULT_CONFIDENCE_STEP,
            denominator: DenominatorPolicy::default(),
        }
    }
}

impl ScoringConfig {
    pub fn confidence(&self, total_assessments: usize) -> u32 {
        let count = u32::try_from(total_assessments).unwrap_or(u32::MAX);
        count
            .saturating_mul(self.confidence_step)
            .min(MAX_CONFIDENCE)
    }
}
