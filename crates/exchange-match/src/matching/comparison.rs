//! Browse view over the full catalog: filter chips plus a sort selector.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::answers::{Currency, FundingMethod};
use super::catalog::{FundingRail, Provider, ProviderCatalog};
use super::fees::fee_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    Smsf,
    Advanced,
    Demo,
}

impl FeatureFlag {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "smsf" => Some(FeatureFlag::Smsf),
            "advanced" => Some(FeatureFlag::Advanced),
            "demo" => Some(FeatureFlag::Demo),
            _ => None,
        }
    }

    fn present_on(self, provider: &Provider) -> bool {
        match self {
            FeatureFlag::Smsf => provider.smsf_support,
            FeatureFlag::Advanced => provider.advanced_features,
            FeatureFlag::Demo => provider.demo_mode,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonSort {
    #[default]
    Name,
    Coins,
    Established,
    Fees,
}

impl ComparisonSort {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Some(ComparisonSort::Name),
            "coins" => Some(ComparisonSort::Coins),
            "established" => Some(ComparisonSort::Established),
            "fees" => Some(ComparisonSort::Fees),
            _ => None,
        }
    }
}

/// Browse region; also picks which rails a funding filter consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    Au,
    Nz,
}

impl Region {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "au" => Some(Region::Au),
            "nz" => Some(Region::Nz),
            _ => None,
        }
    }

    pub const fn currency(self) -> Currency {
        match self {
            Region::Au => Currency::Aud,
            Region::Nz => Currency::Nzd,
        }
    }
}

/// Empty groups do not filter. Funding matches any-of against the rails of the selected
/// region (AU when no region is given); features must all be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonFilter {
    pub region: Option<Region>,
    pub funding: Vec<FundingMethod>,
    pub features: Vec<FeatureFlag>,
}

impl ComparisonFilter {
    pub fn is_active(&self) -> bool {
        self.region.is_some() || !self.funding.is_empty() || !self.features.is_empty()
    }

    fn admits(&self, provider: &Provider) -> bool {
        let region_ok = self
            .region
            .map_or(true, |region| provider.serves(region.currency()));
        let currency = self.region.unwrap_or_default().currency();
        let funding_ok = self.funding.is_empty()
            || self
                .funding
                .iter()
                .any(|method| provider.supports(FundingRail::for_selection(currency, *method)));
        let features_ok = self
            .features
            .iter()
            .all(|feature| feature.present_on(provider));

        region_ok && funding_ok && features_ok
    }
}

/// Comma separated query parameters for the comparison endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComparisonQuery {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub funding: Option<String>,
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

impl ComparisonQuery {
    /// Unknown tokens are dropped; an unknown sort falls back to name order.
    pub fn sanitize(&self) -> (ComparisonFilter, ComparisonSort) {
        let filter = ComparisonFilter {
            region: self.region.as_deref().and_then(Region::parse),
            funding: tokens(self.funding.as_deref(), |raw| raw.parse().ok()),
            features: tokens(self.features.as_deref(), FeatureFlag::parse),
        };
        let sort = self
            .sort
            .as_deref()
            .and_then(ComparisonSort::parse)
            .unwrap_or_default();
        (filter, sort)
    }
}

fn tokens<T: PartialEq>(raw: Option<&str>, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    let mut values = Vec::new();
    for value in raw.unwrap_or_default().split(',').filter_map(parse) {
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// Sorted browse rows. `unfiltered` is set when the filter matched nothing and the whole
/// catalog is shown instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonListing<'a> {
    pub providers: Vec<&'a Provider>,
    pub unfiltered: bool,
}

pub fn compare<'a>(
    catalog: &'a ProviderCatalog,
    filter: &ComparisonFilter,
    sort: ComparisonSort,
) -> ComparisonListing<'a> {
    let mut providers: Vec<&Provider> = catalog
        .providers()
        .iter()
        .filter(|provider| filter.admits(provider))
        .collect();

    let unfiltered = providers.is_empty() && filter.is_active();
    if unfiltered {
        providers = catalog.providers().iter().collect();
    }

    match sort {
        ComparisonSort::Name => providers.sort_by(|a, b| by_name(a, b)),
        ComparisonSort::Coins => providers.sort_by(|a, b| {
            b.coins_supported
                .cmp(&a.coins_supported)
                .then_with(|| by_name(a, b))
        }),
        ComparisonSort::Established => providers.sort_by(|a, b| {
            a.established_year
                .cmp(&b.established_year)
                .then_with(|| by_name(a, b))
        }),
        ComparisonSort::Fees => providers.sort_by(|a, b| {
            fee_score(&b.fee_info)
                .total_cmp(&fee_score(&a.fee_info))
                .then_with(|| by_name(a, b))
        }),
    }

    ComparisonListing {
        providers,
        unfiltered,
    }
}

fn by_name(a: &Provider, b: &Provider) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}
