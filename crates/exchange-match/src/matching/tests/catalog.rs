use super::common::*;
use crate::matching::answers::Currency;
use crate::matching::catalog::{CatalogError, ExchangeOrigin, FundingRail, ProviderCatalog};

const WRAPPED: &str = r#"{
    "last_reviewed": "2025-09-01",
    "providers": [
        {
            "id": "harbour",
            "affiliate_id": "harbour_aff",
            "name": "Harbour Exchange",
            "au_serving": true,
            "nz_serving": true,
            "funding": {
                "aud_payid_bank": true,
                "aud_card_buy": false,
                "nzd_bank_transfer": true,
                "nzd_card_buy": false
            },
            "smsf_support": false,
            "advanced_features": false,
            "demo_mode": false,
            "fee_info": "0.6% instant buy",
            "coins_supported": 120,
            "ease_of_setup": 4.2,
            "established_year": 2017,
            "partner": true,
            "sponsored": false,
            "promos": [
                { "type": "signup", "active": true, "title": "Fee-free first trade" },
                { "type": "referral", "active": false, "title": "Refer a friend" }
            ],
            "exchange_origin": "local"
        }
    ]
}"#;

#[test]
fn loads_reviewed_wrapper() {
    let catalog = ProviderCatalog::from_reader(WRAPPED.as_bytes()).expect("catalog parses");

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.last_reviewed(), Some("2025-09-01"));

    let provider = catalog.get("harbour").expect("provider present");
    assert_eq!(provider.affiliate_id, "harbour_aff");
    assert_eq!(provider.exchange_origin, Some(ExchangeOrigin::Local));
    assert_eq!(provider.origin_label(), "Local (AU & NZ)");
    assert_eq!(provider.rail_count(Currency::Aud), 1);
    assert!(provider.supports(FundingRail::NzdBankTransfer));

    let active: Vec<&str> = provider
        .active_promos()
        .map(|promo| promo.title.as_str())
        .collect();
    assert_eq!(active, vec!["Fee-free first trade"]);
}

#[test]
fn loads_bare_provider_array() {
    let json = serde_json::to_string(&vec![simple_exchange(), kiwi_exchange()])
        .expect("fixtures serialize");

    let catalog = ProviderCatalog::from_reader(json.as_bytes()).expect("catalog parses");

    assert_eq!(catalog.last_reviewed(), None);
    assert_eq!(ids(catalog.serving(Currency::Nzd)), vec!["kiwi_only"]);
}

#[test]
fn rejects_unknown_provider_fields() {
    let json = WRAPPED.replace("\"sponsored\": false,", "\"sponsored\": false, \"rating\": 5,");

    let err = ProviderCatalog::from_reader(json.as_bytes()).expect_err("unknown field");
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[test]
fn rejects_duplicate_ids() {
    let err = ProviderCatalog::new(vec![simple_exchange(), simple_exchange()])
        .expect_err("duplicate id");
    assert!(matches!(err, CatalogError::DuplicateId(id) if id == "simple_au"));
}

#[test]
fn rejects_blank_ids() {
    let err = ProviderCatalog::new(vec![provider("  ", "Nameless")]).expect_err("blank id");
    assert!(matches!(err, CatalogError::MissingId { name } if name == "Nameless"));
}

#[test]
fn rejects_ease_outside_rating_scale() {
    let mut broken = provider("broken", "Broken");
    broken.ease_of_setup = 7.5;

    let err = ProviderCatalog::new(vec![broken]).expect_err("ease out of range");
    assert!(matches!(err, CatalogError::InvalidEaseRating { value, .. } if value == 7.5));
}

#[test]
fn missing_file_reports_path() {
    let err = ProviderCatalog::from_path("/nonexistent/providers.json").expect_err("missing file");
    assert!(err.to_string().contains("/nonexistent/providers.json"));
}

#[test]
fn partner_names_are_sorted() {
    assert_eq!(catalog().partner_names(), vec!["Pro AU", "Simple AU"]);
}

#[test]
fn origin_label_covers_unspecified_and_international() {
    let mut exchange = provider("intl", "Intl");
    assert_eq!(exchange.origin_label(), "Not specified");
    exchange.exchange_origin = Some(ExchangeOrigin::International);
    assert_eq!(exchange.origin_label(), "International");
}
