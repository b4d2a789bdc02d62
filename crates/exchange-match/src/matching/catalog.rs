use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::answers::{Currency, FundingMethod};

/// Exchange record as published in the provider catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Provider {
    pub id: String,
    pub affiliate_id: String,
    pub name: String,
    pub au_serving: bool,
    pub nz_serving: bool,
    pub funding: FundingRails,
    pub smsf_support: bool,
    pub advanced_features: bool,
    pub demo_mode: bool,
    pub fee_info: String,
    pub coins_supported: u32,
    pub ease_of_setup: f64,
    pub established_year: i32,
    pub partner: bool,
    pub sponsored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_badge: Option<String>,
    #[serde(default)]
    pub promos: Vec<Promo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_origin: Option<ExchangeOrigin>,
}

impl Provider {
    pub fn serves(&self, currency: Currency) -> bool {
        match currency {
            Currency::Aud => self.au_serving,
            Currency::Nzd => self.nz_serving,
        }
    }

    pub fn supports(&self, rail: FundingRail) -> bool {
        self.funding.supports(rail)
    }

    /// Number of funding rails available in the given currency (0..=2).
    pub fn rail_count(&self, currency: Currency) -> usize {
        FundingMethod::ALL
            .iter()
            .filter(|method| self.supports(FundingRail::for_selection(currency, **method)))
            .count()
    }

    pub fn active_promos(&self) -> impl Iterator<Item = &Promo> {
        self.promos.iter().filter(|promo| promo.active)
    }

    pub fn origin_label(&self) -> &'static str {
        match self.exchange_origin {
            Some(ExchangeOrigin::Local) => match (self.au_serving, self.nz_serving) {
                (true, true) => "Local (AU & NZ)",
                (true, false) => "Local (Australia)",
                (false, true) => "Local (New Zealand)",
                (false, false) => "Local",
            },
            Some(ExchangeOrigin::International) => "International",
            None => "Not specified",
        }
    }
}

/// Currency-specific deposit capabilities. Each rail is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FundingRails {
    pub aud_payid_bank: bool,
    pub aud_card_buy: bool,
    pub nzd_bank_transfer: bool,
    pub nzd_card_buy: bool,
}

impl FundingRails {
    pub fn supports(&self, rail: FundingRail) -> bool {
        match rail {
            FundingRail::AudPayidBank => self.aud_payid_bank,
            FundingRail::AudCardBuy => self.aud_card_buy,
            FundingRail::NzdBankTransfer => self.nzd_bank_transfer,
            FundingRail::NzdCardBuy => self.nzd_card_buy,
        }
    }
}

/// One of the four funding booleans carried by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingRail {
    AudPayidBank,
    AudCardBuy,
    NzdBankTransfer,
    NzdCardBuy,
}

impl FundingRail {
    pub const ALL: [FundingRail; 4] = [
        FundingRail::AudPayidBank,
        FundingRail::AudCardBuy,
        FundingRail::NzdBankTransfer,
        FundingRail::NzdCardBuy,
    ];

    /// Maps a quiz funding selection onto the rail consulted for the chosen currency.
    pub const fn for_selection(currency: Currency, method: FundingMethod) -> Self {
        match (currency, method) {
            (Currency::Aud, FundingMethod::BankTransfer) => FundingRail::AudPayidBank,
            (Currency::Aud, FundingMethod::CardBuy) => FundingRail::AudCardBuy,
            (Currency::Nzd, FundingMethod::BankTransfer) => FundingRail::NzdBankTransfer,
            (Currency::Nzd, FundingMethod::CardBuy) => FundingRail::NzdCardBuy,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FundingRail::AudPayidBank => "AUD Bank Transfer/PayID",
            FundingRail::AudCardBuy => "AUD Card Purchase",
            FundingRail::NzdBankTransfer => "NZD Bank Transfer",
            FundingRail::NzdCardBuy => "NZD Card Purchase",
        }
    }
}

/// Promotion attached to a provider listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Promo {
    #[serde(rename = "type")]
    pub kind: String,
    pub active: bool,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeOrigin {
    Local,
    International,
}

/// Read-only provider dataset, loaded once and shared by every match computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderCatalog {
    #[serde(skip_serializing_if = "Option::is_none")]
    last_reviewed: Option<String>,
    providers: Vec<Provider>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReviewedCatalog {
    #[serde(default)]
    last_reviewed: Option<String>,
    providers: Vec<Provider>,
}

impl ProviderCatalog {
    /// Builds a catalog from already-typed records, applying the same checks as file loads.
    pub fn new(providers: Vec<Provider>) -> Result<Self, CatalogError> {
        Self::validated(providers, None)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Accepts either a bare provider array or a `{ last_reviewed, providers }` wrapper.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_reader(reader)?;

        let (providers, last_reviewed) = if document.is_array() {
            (serde_json::from_value::<Vec<Provider>>(document)?, None)
        } else {
            let wrapper: ReviewedCatalog = serde_json::from_value(document)?;
            (wrapper.providers, wrapper.last_reviewed)
        };

        Self::validated(providers, last_reviewed)
    }

    fn validated(
        providers: Vec<Provider>,
        last_reviewed: Option<String>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for provider in &providers {
            if provider.id.trim().is_empty() {
                return Err(CatalogError::MissingId {
                    name: provider.name.clone(),
                });
            }
            if !seen.insert(provider.id.as_str()) {
                return Err(CatalogError::DuplicateId(provider.id.clone()));
            }
            if !provider.ease_of_setup.is_finite() || !(0.0..=5.0).contains(&provider.ease_of_setup)
            {
                return Err(CatalogError::InvalidEaseRating {
                    id: provider.id.clone(),
                    value: provider.ease_of_setup,
                });
            }
        }

        Ok(Self {
            last_reviewed,
            providers,
        })
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn last_reviewed(&self) -> Option<&str> {
        self.last_reviewed.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|provider| provider.id == id)
    }

    pub fn serving(&self, currency: Currency) -> impl Iterator<Item = &Provider> {
        self.providers
            .iter()
            .filter(move |provider| provider.serves(currency))
    }

    /// Partner display names, alphabetised for disclosure pages.
    pub fn partner_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .providers
            .iter()
            .filter(|provider| provider.partner)
            .map(|provider| provider.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Failures raised while loading the catalog at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read provider catalog at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("provider catalog is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("provider '{name}' is missing an id")]
    MissingId { name: String },
    #[error("provider id '{0}' appears more than once")]
    DuplicateId(String),
    #[error("provider '{id}' has ease_of_setup {value} outside 0.0..=5.0")]
    InvalidEaseRating { id: String, value: f64 },
}
