mod config;
mod rules;

pub use config::{
    CoinRange, ExperienceWeights, ScoringConfig, ScoringConfigError, DEFAULT_DEMO_BONUS,
    DEFAULT_TOP_N,
};
pub use rules::score_provider;

use serde::{Deserialize, Serialize};

use super::catalog::Provider;

/// Machine-readable tag for a match justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ServesRegion,
    SupportsBankTransfer,
    SupportsCardPurchase,
    CoinSelection,
    FeeStructure,
    EaseOfUse,
    ComplexityTradeoff,
    AdvancedFeatures,
    BalancedPlatform,
    Established,
    DemoMode,
    /// Informational only; never paired with a score change.
    ContextNote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReason {
    pub code: ReasonCode,
    pub text: String,
}

impl MatchReason {
    pub fn new(code: ReasonCode, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }
}

/// Suitability score and its justification trail for one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderScore {
    pub score: f64,
    pub reasons: Vec<MatchReason>,
}

impl ProviderScore {
    pub fn has_reason(&self, code: ReasonCode) -> bool {
        self.reasons.iter().any(|reason| reason.code == code)
    }
}

/// Eligible provider paired with its score, awaiting ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProvider<'a> {
    pub provider: &'a Provider,
    pub score: ProviderScore,
}
