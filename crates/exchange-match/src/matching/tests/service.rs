use super::common::*;
use crate::matching::answers::{AccountType, Currency, ExperienceLevel, FundingMethod, Priority};
use crate::matching::comparison::{ComparisonFilter, ComparisonSort};
use crate::matching::scoring::ScoringConfig;
use crate::matching::service::MatchService;
use std::sync::Arc;

#[test]
fn evaluate_bundles_results_and_exclusions() {
    let service = service();

    let report = service.evaluate(aud_beginner(Priority::Ease));

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.excluded.len(), 2);
    assert_eq!(report.top_matches().count(), 3);
    assert_eq!(report.results[0].provider.id, "simple_au");
}

#[test]
fn configured_top_n_limits_flags() {
    let config = ScoringConfig {
        top_n: 1,
        ..ScoringConfig::default()
    };
    let service = MatchService::new(Arc::new(catalog()), config);

    let report = service.evaluate(aud_beginner(Priority::Fees));

    assert_eq!(report.top_matches().count(), 1);
    assert!(report.results[0].is_top_match);
}

#[test]
fn no_matches_still_explains_every_provider() {
    let service = service();
    let answers = answers(
        Currency::Nzd,
        ExperienceLevel::Advanced,
        &[FundingMethod::BankTransfer],
        Priority::Advanced,
    )
    .with_account_type(AccountType::Smsf);

    let report = service.evaluate(answers);

    assert!(report.results.is_empty());
    assert_eq!(report.excluded.len(), service.catalog().len());
}

#[test]
fn redirect_uses_configured_fallback() {
    let service = service().with_redirect_fallback("/compare");

    assert_eq!(
        service.resolve_redirect("simple_au").location(),
        "https://partners.example/simple"
    );
    assert_eq!(
        service.resolve_redirect("pro_au").location(),
        "/compare?error=no-affiliate-url"
    );
}

#[test]
fn compare_delegates_to_catalog_view() {
    let service = service();

    let listing = service.compare(&ComparisonFilter::default(), ComparisonSort::Coins);

    assert_eq!(listing.providers.len(), service.catalog().len());
    assert!(!listing.unfiltered);
    assert!(service.provider("kiwi_only").is_some());
    assert!(service.provider("missing").is_none());
}
