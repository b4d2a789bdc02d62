//! Quiz-driven exchange matching: hard eligibility filters, configurable scoring, deterministic
//! ranking and per-rule exclusion explanations over a read-only provider catalog.

pub mod answers;
pub mod catalog;
pub mod comparison;
pub mod coverage;
pub mod eligibility;
pub mod exclusion;
pub mod fees;
pub mod ranking;
pub mod redirect;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use answers::{
    AccountType, Currency, ExperienceLevel, FundingMethod, Priority, QuizAnswers, QuizQuery,
    UnknownOption,
};
pub use catalog::{
    CatalogError, ExchangeOrigin, FundingRail, FundingRails, Promo, Provider, ProviderCatalog,
};
pub use comparison::{
    ComparisonFilter, ComparisonListing, ComparisonQuery, ComparisonSort, FeatureFlag, Region,
};
pub use coverage::{CoverageError, CoverageReport, ProviderCoverage};
pub use eligibility::filter_eligible;
pub use exclusion::{explain_exclusions, ExcludedProvider, ExclusionCode, ExclusionReason};
pub use ranking::{rank, MatchResult};
pub use redirect::{AffiliateDirectory, RedirectFailure, RedirectOutcome};
pub use router::match_router;
pub use scoring::{
    score_provider, ExperienceWeights, MatchReason, ProviderScore, ReasonCode, ScoredProvider,
    ScoringConfig, ScoringConfigError,
};
pub use service::{MatchReport, MatchService};
