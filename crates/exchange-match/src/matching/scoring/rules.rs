use super::config::{ExperienceWeights, ScoringConfig};
use super::{MatchReason, ProviderScore, ReasonCode};
use crate::matching::answers::{Currency, ExperienceLevel, FundingMethod, Priority, QuizAnswers};
use crate::matching::catalog::{FundingRail, Provider};
use crate::matching::fees::fee_score;

struct ScoreSheet {
    score: f64,
    reasons: Vec<MatchReason>,
}

impl ScoreSheet {
    fn add(&mut self, delta: f64) {
        self.score += delta;
    }

    fn note(&mut self, code: ReasonCode, text: &str) {
        self.reasons.push(MatchReason::new(code, text));
    }
}

/// Scores one provider against the answers. Pure and deterministic.
pub fn score_provider(
    provider: &Provider,
    answers: &QuizAnswers,
    config: &ScoringConfig,
) -> ProviderScore {
    let weights = config.weights(answers.experience_level);
    let mut sheet = ScoreSheet {
        score: 0.0,
        reasons: Vec::new(),
    };

    region_and_funding_reasons(&mut sheet, provider, answers);

    match answers.priority {
        Priority::Coins => coins_priority(&mut sheet, provider, answers.experience_level, weights),
        Priority::Fees => fees_priority(&mut sheet, provider, answers.experience_level, weights),
        Priority::Ease => ease_priority(&mut sheet, provider, answers.experience_level, weights),
        Priority::Advanced => {
            advanced_priority(&mut sheet, provider, answers.experience_level, weights)
        }
    }

    experience_adjustments(&mut sheet, provider, answers, weights);

    if answers.wants_demo && provider.demo_mode {
        sheet.add(config.demo_bonus);
        sheet.note(ReasonCode::DemoMode, "Demo mode available to practise first");
    }

    contextual_notes(&mut sheet, provider, answers.experience_level);

    ProviderScore {
        score: sheet.score,
        reasons: sheet.reasons,
    }
}

fn region_and_funding_reasons(sheet: &mut ScoreSheet, provider: &Provider, answers: &QuizAnswers) {
    if provider.serves(answers.currency) {
        let text = match answers.currency {
            Currency::Aud => "Serves Australian customers",
            Currency::Nzd => "Serves New Zealand customers",
        };
        sheet.note(ReasonCode::ServesRegion, text);
    }

    for method in &answers.funding {
        if !provider.supports(FundingRail::for_selection(answers.currency, *method)) {
            continue;
        }
        let code = answers.currency.code();
        match method {
            FundingMethod::BankTransfer => sheet.note(
                ReasonCode::SupportsBankTransfer,
                &format!("Supports {code} bank transfer"),
            ),
            FundingMethod::CardBuy => sheet.note(
                ReasonCode::SupportsCardPurchase,
                &format!("Supports {code} card purchases"),
            ),
        }
    }
}

fn coins_priority(
    sheet: &mut ScoreSheet,
    provider: &Provider,
    level: ExperienceLevel,
    weights: &ExperienceWeights,
) {
    let coins = provider.coins_supported;
    let coins_score = f64::from(coins) / 100.0;

    match level {
        ExperienceLevel::Beginner => {
            sheet.add(coins_score.min(weights.coins_cap));
            if weights
                .coins_sweet_spot
                .map(|range| range.contains(coins))
                .unwrap_or(false)
            {
                sheet.note(
                    ReasonCode::CoinSelection,
                    "Good selection of major coins without overwhelming choices",
                );
            }
        }
        ExperienceLevel::Intermediate => {
            sheet.add(coins_score * weights.coins_bonus);
            if coins > weights.coins_highlight_threshold {
                sheet.note(ReasonCode::CoinSelection, "Wide range of coins available");
            }
        }
        ExperienceLevel::Advanced => {
            sheet.add(coins_score * weights.coins_bonus);
            if coins > weights.coins_highlight_threshold {
                sheet.note(
                    ReasonCode::CoinSelection,
                    "Extensive range of coins including altcoins",
                );
            }
        }
    }
}

fn fees_priority(
    sheet: &mut ScoreSheet,
    provider: &Provider,
    level: ExperienceLevel,
    weights: &ExperienceWeights,
) {
    let fees = fee_score(&provider.fee_info);

    match level {
        ExperienceLevel::Beginner => {
            sheet.add(fees * weights.fee_weight);
            if fees > 1.5 {
                sheet.note(ReasonCode::FeeStructure, "Competitive and transparent fees");
            }
            if provider.advanced_features {
                sheet.add(-weights.fee_complexity_penalty);
            } else if provider.ease_of_setup >= 4.0 && fees > 1.2 {
                sheet.note(ReasonCode::FeeStructure, "Simple platform with good fees");
            } else if provider.ease_of_setup >= 4.0 {
                sheet.note(ReasonCode::EaseOfUse, "Straightforward platform");
            }
        }
        ExperienceLevel::Intermediate => {
            sheet.add(fees * weights.fee_weight);
            if fees > 1.5 {
                sheet.note(ReasonCode::FeeStructure, "Competitive fee structure");
            }
            if provider.advanced_features {
                sheet.add(-weights.fee_complexity_penalty);
            }
        }
        ExperienceLevel::Advanced => {
            sheet.add(fees * weights.fee_weight);
            if fees > 1.5 {
                sheet.note(
                    ReasonCode::FeeStructure,
                    "Excellent fee structure for active traders",
                );
            }
        }
    }
}

fn ease_priority(
    sheet: &mut ScoreSheet,
    provider: &Provider,
    level: ExperienceLevel,
    weights: &ExperienceWeights,
) {
    let ease = provider.ease_of_setup;

    match level {
        ExperienceLevel::Beginner => {
            sheet.add(ease * weights.ease_multiplier);
            if ease >= 4.0 {
                sheet.note(ReasonCode::EaseOfUse, "User-friendly for beginners");
            }
            if provider.advanced_features {
                sheet.add(-weights.complexity_penalty);
                sheet.note(
                    ReasonCode::ComplexityTradeoff,
                    "Simplicity prioritized over complexity",
                );
            }
        }
        ExperienceLevel::Intermediate => {
            sheet.add(ease * weights.ease_multiplier);
            if ease >= 4.0 {
                sheet.note(ReasonCode::EaseOfUse, "Easy account setup");
            }
            if provider.advanced_features {
                sheet.add(-weights.complexity_penalty);
            }
        }
        ExperienceLevel::Advanced => {
            sheet.add(ease * weights.ease_multiplier);
            if ease >= 4.0 && provider.advanced_features {
                sheet.note(
                    ReasonCode::ComplexityTradeoff,
                    "Complex interface with powerful features",
                );
            }
        }
    }
}

fn advanced_priority(
    sheet: &mut ScoreSheet,
    provider: &Provider,
    level: ExperienceLevel,
    weights: &ExperienceWeights,
) {
    match level {
        ExperienceLevel::Beginner => {
            if provider.advanced_features && provider.ease_of_setup >= 3.0 {
                sheet.add(weights.features_bonus);
                sheet.note(
                    ReasonCode::AdvancedFeatures,
                    "Advanced features with beginner-friendly design",
                );
            } else if !provider.advanced_features {
                sheet.add(weights.simple_platform_bonus);
                sheet.note(
                    ReasonCode::ComplexityTradeoff,
                    "Simple platform to start with, room to grow",
                );
            }
        }
        ExperienceLevel::Intermediate => {
            if provider.advanced_features {
                sheet.add(weights.features_bonus);
                sheet.note(
                    ReasonCode::AdvancedFeatures,
                    "Advanced features available as you grow",
                );
            }
        }
        ExperienceLevel::Advanced => {
            if provider.advanced_features {
                sheet.add(weights.features_bonus);
                sheet.note(
                    ReasonCode::AdvancedFeatures,
                    "Professional-grade trading features",
                );
            }
        }
    }
}

fn experience_adjustments(
    sheet: &mut ScoreSheet,
    provider: &Provider,
    answers: &QuizAnswers,
    weights: &ExperienceWeights,
) {
    let ease = provider.ease_of_setup;

    match answers.experience_level {
        ExperienceLevel::Beginner => {
            if ease >= 4.5 {
                sheet.add(weights.very_easy_bonus);
                // The ease branch already said this.
                if answers.priority != Priority::Ease {
                    sheet.note(ReasonCode::EaseOfUse, "User-friendly for beginners");
                }
            }
            if ease < 3.0 {
                sheet.add(-weights.hard_setup_penalty);
            }
        }
        ExperienceLevel::Intermediate => {
            if ease >= 3.5 && provider.advanced_features {
                sheet.add(weights.balanced_bonus);
                sheet.note(
                    ReasonCode::BalancedPlatform,
                    "Good balance of usability and features",
                );
            }
        }
        ExperienceLevel::Advanced => {
            if provider.established_year <= weights.establishment_threshold {
                sheet.add(weights.establishment_bonus);
                sheet.note(ReasonCode::Established, "Established and mature platform");
            }
            if !provider.advanced_features && ease > 4.5 {
                sheet.add(-weights.oversimplified_penalty);
            }
        }
    }
}

fn contextual_notes(sheet: &mut ScoreSheet, provider: &Provider, level: ExperienceLevel) {
    match level {
        ExperienceLevel::Beginner => {
            if provider.advanced_features && provider.ease_of_setup < 3.5 {
                sheet.note(
                    ReasonCode::ContextNote,
                    "Note: This is a more complex platform - consider starting simple",
                );
            }
            if provider.ease_of_setup >= 4.0 && provider.coins_supported <= 100 {
                sheet.note(
                    ReasonCode::ContextNote,
                    "Great starting point with essential coins",
                );
            }
        }
        ExperienceLevel::Intermediate => {
            if provider.advanced_features && provider.ease_of_setup >= 3.0 {
                sheet.note(
                    ReasonCode::ContextNote,
                    "Room to grow as your trading skills develop",
                );
            }
        }
        ExperienceLevel::Advanced => {
            if provider.advanced_features && provider.coins_supported > 150 {
                sheet.note(
                    ReasonCode::ContextNote,
                    "Comprehensive platform for serious traders",
                );
            }
            if !provider.advanced_features {
                sheet.note(
                    ReasonCode::ContextNote,
                    "Simple platform - may lack advanced trading tools",
                );
            }
        }
    }
}
