use std::cmp::Ordering;

use serde::Serialize;

use super::answers::{ExperienceLevel, Priority, QuizAnswers};
use super::catalog::Provider;
use super::scoring::{MatchReason, ScoredProvider};

/// Ranked entry handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub provider: &'a Provider,
    pub score: f64,
    pub reasons: Vec<MatchReason>,
    pub is_top_match: bool,
}

/// Orders scored providers and flags the first `top_n` as top matches.
pub fn rank<'a>(
    mut scored: Vec<ScoredProvider<'a>>,
    answers: &QuizAnswers,
    top_n: usize,
) -> Vec<MatchResult<'a>> {
    scored.sort_by(|a, b| compare(a, b, answers));

    scored
        .into_iter()
        .enumerate()
        .map(|(index, entry)| MatchResult {
            provider: entry.provider,
            score: entry.score.score,
            reasons: entry.score.reasons,
            is_top_match: index < top_n,
        })
        .collect()
}

fn compare(a: &ScoredProvider<'_>, b: &ScoredProvider<'_>, answers: &QuizAnswers) -> Ordering {
    b.score
        .score
        .total_cmp(&a.score.score)
        .then_with(|| {
            let currency = answers.currency;
            b.provider
                .rail_count(currency)
                .cmp(&a.provider.rail_count(currency))
        })
        .then_with(|| complexity_preference(a.provider, b.provider, answers.experience_level))
        .then_with(|| priority_preference(a.provider, b.provider, answers.priority))
        .then_with(|| alphabetical(a.provider, b.provider))
}

fn complexity_preference(a: &Provider, b: &Provider, level: ExperienceLevel) -> Ordering {
    match level {
        // false sorts before true: simple platforms first.
        ExperienceLevel::Beginner => a
            .advanced_features
            .cmp(&b.advanced_features)
            .then_with(|| b.ease_of_setup.total_cmp(&a.ease_of_setup)),
        ExperienceLevel::Advanced => b
            .advanced_features
            .cmp(&a.advanced_features)
            .then_with(|| a.established_year.cmp(&b.established_year)),
        ExperienceLevel::Intermediate => b.ease_of_setup.total_cmp(&a.ease_of_setup),
    }
}

fn priority_preference(a: &Provider, b: &Provider, priority: Priority) -> Ordering {
    match priority {
        Priority::Ease => a.coins_supported.cmp(&b.coins_supported),
        Priority::Coins => b.coins_supported.cmp(&a.coins_supported),
        Priority::Fees | Priority::Advanced => Ordering::Equal,
    }
}

fn alphabetical(a: &Provider, b: &Provider) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
