use super::answers::{AccountType, QuizAnswers};
use super::catalog::{FundingRail, Provider, ProviderCatalog};

/// Providers passing every hard constraint, in catalog order.
pub fn filter_eligible<'a>(catalog: &'a ProviderCatalog, answers: &QuizAnswers) -> Vec<&'a Provider> {
    catalog
        .providers()
        .iter()
        .filter(|provider| is_eligible(provider, answers))
        .collect()
}

pub fn is_eligible(provider: &Provider, answers: &QuizAnswers) -> bool {
    if !provider.serves(answers.currency) {
        return false;
    }

    let rails_ok = answers
        .funding
        .iter()
        .all(|method| provider.supports(FundingRail::for_selection(answers.currency, *method)));
    if !rails_ok {
        return false;
    }

    if answers.account_type == AccountType::Smsf && !provider.smsf_support {
        return false;
    }

    true
}
