use std::sync::Arc;

use crate::matching::answers::{Currency, ExperienceLevel, FundingMethod, Priority, QuizAnswers};
use crate::matching::catalog::{FundingRails, Provider, ProviderCatalog};
use crate::matching::redirect::AffiliateDirectory;
use crate::matching::scoring::ScoringConfig;
use crate::matching::service::MatchService;

pub(super) const EPSILON: f64 = 1e-9;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// AU-serving, AUD bank transfer only, simple platform with a 0.5% taker fee.
pub(super) fn provider(id: &str, name: &str) -> Provider {
    Provider {
        id: id.to_string(),
        affiliate_id: id.to_string(),
        name: name.to_string(),
        au_serving: true,
        nz_serving: false,
        funding: FundingRails {
            aud_payid_bank: true,
            aud_card_buy: false,
            nzd_bank_transfer: false,
            nzd_card_buy: false,
        },
        smsf_support: false,
        advanced_features: false,
        demo_mode: false,
        fee_info: "Taker 0.5%".to_string(),
        coins_supported: 50,
        ease_of_setup: 4.0,
        established_year: 2015,
        partner: false,
        sponsored: false,
        custom_badge: None,
        promos: Vec::new(),
        exchange_origin: None,
    }
}

pub(super) fn simple_exchange() -> Provider {
    let mut provider = provider("simple_au", "Simple AU");
    provider.ease_of_setup = 4.8;
    provider.partner = true;
    provider
}

pub(super) fn pro_exchange() -> Provider {
    let mut provider = provider("pro_au", "Pro AU");
    provider.advanced_features = true;
    provider.ease_of_setup = 4.0;
    provider.coins_supported = 300;
    provider.funding.aud_card_buy = true;
    provider.partner = true;
    provider
}

pub(super) fn kiwi_exchange() -> Provider {
    let mut provider = provider("kiwi_only", "Kiwi Only");
    provider.au_serving = false;
    provider.nz_serving = true;
    provider.funding = FundingRails {
        aud_payid_bank: false,
        aud_card_buy: false,
        nzd_bank_transfer: true,
        nzd_card_buy: true,
    };
    provider
}

pub(super) fn railless_exchange() -> Provider {
    let mut provider = provider("no_aud_rails", "No AUD Rails");
    provider.nz_serving = true;
    provider.funding = FundingRails {
        aud_payid_bank: false,
        aud_card_buy: false,
        nzd_bank_transfer: true,
        nzd_card_buy: false,
    };
    provider
}

pub(super) fn smsf_exchange() -> Provider {
    let mut provider = provider("smsf_desk", "SMSF Desk");
    provider.smsf_support = true;
    provider.advanced_features = true;
    provider.ease_of_setup = 3.2;
    provider.established_year = 2014;
    provider.funding.aud_card_buy = true;
    provider.demo_mode = true;
    provider
}

pub(super) fn catalog() -> ProviderCatalog {
    ProviderCatalog::new(vec![
        simple_exchange(),
        pro_exchange(),
        kiwi_exchange(),
        railless_exchange(),
        smsf_exchange(),
    ])
    .expect("fixture catalog is valid")
}

pub(super) fn answers(
    currency: Currency,
    level: ExperienceLevel,
    funding: &[FundingMethod],
    priority: Priority,
) -> QuizAnswers {
    QuizAnswers::new(currency, level, funding.iter().copied(), priority)
}

pub(super) fn aud_beginner(priority: Priority) -> QuizAnswers {
    answers(
        Currency::Aud,
        ExperienceLevel::Beginner,
        &[FundingMethod::BankTransfer],
        priority,
    )
}

pub(super) fn service() -> MatchService {
    MatchService::new(Arc::new(catalog()), ScoringConfig::default()).with_affiliates(
        AffiliateDirectory::default().with_url("simple_au", "https://partners.example/simple"),
    )
}

pub(super) fn ids<'a>(providers: impl IntoIterator<Item = &'a Provider>) -> Vec<&'a str> {
    providers
        .into_iter()
        .map(|provider| provider.id.as_str())
        .collect()
}
