use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::answers::QuizAnswers;
use super::catalog::{Provider, ProviderCatalog};
use super::comparison::{compare, ComparisonFilter, ComparisonListing, ComparisonSort};
use super::eligibility::filter_eligible;
use super::exclusion::{explain_exclusions, ExcludedProvider};
use super::ranking::{rank, MatchResult};
use super::redirect::{resolve_redirect, AffiliateDirectory, RedirectOutcome};
use super::scoring::{score_provider, ScoredProvider, ScoringConfig};

pub const DEFAULT_REDIRECT_FALLBACK: &str = "/";

/// Facade composing filter, scoring, ranking and explanation over an injected catalog.
pub struct MatchService {
    catalog: Arc<ProviderCatalog>,
    config: ScoringConfig,
    affiliates: AffiliateDirectory,
    redirect_fallback: String,
}

/// Ranked matches plus the transparency list for one set of answers.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport<'a> {
    pub answers: QuizAnswers,
    pub results: Vec<MatchResult<'a>>,
    pub excluded: Vec<ExcludedProvider<'a>>,
}

impl<'a> MatchReport<'a> {
    pub fn top_matches(&self) -> impl Iterator<Item = &MatchResult<'a>> + '_ {
        self.results.iter().filter(|result| result.is_top_match)
    }
}

impl MatchService {
    pub fn new(catalog: Arc<ProviderCatalog>, config: ScoringConfig) -> Self {
        Self {
            catalog,
            config,
            affiliates: AffiliateDirectory::default(),
            redirect_fallback: DEFAULT_REDIRECT_FALLBACK.to_string(),
        }
    }

    pub fn with_affiliates(mut self, affiliates: AffiliateDirectory) -> Self {
        self.affiliates = affiliates;
        self
    }

    pub fn with_redirect_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.redirect_fallback = fallback.into();
        self
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn provider(&self, id: &str) -> Option<&Provider> {
        self.catalog.get(id)
    }

    /// Filter, score and rank eligible providers for the answers.
    pub fn match_providers(&self, answers: &QuizAnswers) -> Vec<MatchResult<'_>> {
        let scored: Vec<ScoredProvider<'_>> = filter_eligible(&self.catalog, answers)
            .into_iter()
            .map(|provider| ScoredProvider {
                provider,
                score: score_provider(provider, answers, &self.config),
            })
            .collect();

        let results = rank(scored, answers, self.config.top_n);
        debug!(
            currency = %answers.currency,
            experience = %answers.experience_level,
            priority = %answers.priority,
            eligible = results.len(),
            "computed provider matches"
        );
        results
    }

    pub fn explain_exclusions(&self, answers: &QuizAnswers) -> Vec<ExcludedProvider<'_>> {
        explain_exclusions(&self.catalog, answers)
    }

    pub fn evaluate(&self, answers: QuizAnswers) -> MatchReport<'_> {
        let results = self.match_providers(&answers);
        let excluded = self.explain_exclusions(&answers);
        if results.is_empty() {
            info!(excluded = excluded.len(), "no providers satisfy the selected answers");
        }
        MatchReport {
            answers,
            results,
            excluded,
        }
    }

    pub fn resolve_redirect(&self, provider_id: &str) -> RedirectOutcome {
        let outcome = resolve_redirect(
            &self.catalog,
            &self.affiliates,
            provider_id,
            &self.redirect_fallback,
        );
        if let RedirectOutcome::Fallback { failure, .. } = &outcome {
            warn!(%provider_id, ?failure, "redirecting to fallback location");
        }
        outcome
    }

    pub fn compare(&self, filter: &ComparisonFilter, sort: ComparisonSort) -> ComparisonListing<'_> {
        let listing = compare(&self.catalog, filter, sort);
        if listing.unfiltered {
            debug!(?filter, "comparison filter matched nothing, listing full catalog");
        }
        listing
    }
}
