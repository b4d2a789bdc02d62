use serde::{Deserialize, Serialize};

use super::answers::{AccountType, Currency, FundingMethod, QuizAnswers};
use super::catalog::{FundingRail, Provider, ProviderCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionCode {
    RegionNotServed,
    MissingBankTransfer,
    MissingCardPurchase,
    NoSmsfSupport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionReason {
    pub code: ExclusionCode,
    pub text: String,
}

/// Provider that failed at least one hard constraint, with every failed rule listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedProvider<'a> {
    pub provider: &'a Provider,
    pub reasons: Vec<ExclusionReason>,
}

impl ExcludedProvider<'_> {
    pub fn has_reason(&self, code: ExclusionCode) -> bool {
        self.reasons.iter().any(|reason| reason.code == code)
    }
}

/// Re-checks each hard rule on its own so callers learn which rules failed.
pub fn explain_exclusions<'a>(
    catalog: &'a ProviderCatalog,
    answers: &QuizAnswers,
) -> Vec<ExcludedProvider<'a>> {
    catalog
        .providers()
        .iter()
        .filter_map(|provider| {
            let reasons = exclusion_reasons(provider, answers);
            if reasons.is_empty() {
                None
            } else {
                Some(ExcludedProvider { provider, reasons })
            }
        })
        .collect()
}

pub fn exclusion_reasons(provider: &Provider, answers: &QuizAnswers) -> Vec<ExclusionReason> {
    let mut reasons = Vec::new();
    let currency = answers.currency;

    let serves = match currency {
        Currency::Aud => provider.au_serving,
        Currency::Nzd => provider.nz_serving,
    };
    if !serves {
        reasons.push(ExclusionReason {
            code: ExclusionCode::RegionNotServed,
            text: match currency {
                Currency::Aud => "Doesn't serve Australian customers",
                Currency::Nzd => "Doesn't serve New Zealand customers",
            }
            .to_string(),
        });
    }

    if answers.wants(FundingMethod::BankTransfer)
        && !provider
            .funding
            .supports(FundingRail::for_selection(currency, FundingMethod::BankTransfer))
    {
        reasons.push(ExclusionReason {
            code: ExclusionCode::MissingBankTransfer,
            text: match currency {
                Currency::Aud => "No AUD bank transfer/PayID",
                Currency::Nzd => "No NZD bank transfer",
            }
            .to_string(),
        });
    }

    if answers.wants(FundingMethod::CardBuy)
        && !provider
            .funding
            .supports(FundingRail::for_selection(currency, FundingMethod::CardBuy))
    {
        reasons.push(ExclusionReason {
            code: ExclusionCode::MissingCardPurchase,
            text: format!("No {} card purchases", currency.code()),
        });
    }

    if answers.account_type == AccountType::Smsf && !provider.smsf_support {
        reasons.push(ExclusionReason {
            code: ExclusionCode::NoSmsfSupport,
            text: "No SMSF account support".to_string(),
        });
    }

    reasons
}
