use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use super::catalog::ProviderCatalog;

/// Environment prefix for outbound partner links, e.g. `AFFILIATE_COINSPOT`.
pub const AFFILIATE_ENV_PREFIX: &str = "AFFILIATE_";

/// Affiliate id to partner URL lookup. A missing entry is a normal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffiliateDirectory {
    urls: BTreeMap<String, String>,
}

impl AffiliateDirectory {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Keeps `AFFILIATE_*` entries whose value is an http(s) URL; the key suffix is
    /// lowercased to form the affiliate id.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut urls = BTreeMap::new();

        for (key, value) in vars {
            let Some(suffix) = key.as_ref().strip_prefix(AFFILIATE_ENV_PREFIX) else {
                continue;
            };
            let affiliate_id = suffix.trim().to_ascii_lowercase();
            let url = value.as_ref().trim();

            if affiliate_id.is_empty() || url.is_empty() {
                continue;
            }
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                warn!(%affiliate_id, "ignoring affiliate url without http(s) scheme");
                continue;
            }

            urls.insert(affiliate_id, url.to_string());
        }

        Self { urls }
    }

    pub fn with_url(mut self, affiliate_id: impl Into<String>, url: impl Into<String>) -> Self {
        self.urls.insert(affiliate_id.into(), url.into());
        self
    }

    pub fn resolve(&self, affiliate_id: &str) -> Option<&str> {
        self.urls.get(affiliate_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectFailure {
    UnknownProvider,
    AffiliateNotConfigured,
}

impl RedirectFailure {
    pub const fn error_flag(self) -> &'static str {
        match self {
            RedirectFailure::UnknownProvider => "unknown-provider",
            RedirectFailure::AffiliateNotConfigured => "no-affiliate-url",
        }
    }
}

/// Where the outbound `/go/:id` hop should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    Partner { url: String },
    Fallback { location: String, failure: RedirectFailure },
}

impl RedirectOutcome {
    pub fn location(&self) -> &str {
        match self {
            RedirectOutcome::Partner { url } => url,
            RedirectOutcome::Fallback { location, .. } => location,
        }
    }

    pub fn is_partner(&self) -> bool {
        matches!(self, RedirectOutcome::Partner { .. })
    }
}

pub fn resolve_redirect(
    catalog: &ProviderCatalog,
    directory: &AffiliateDirectory,
    provider_id: &str,
    fallback: &str,
) -> RedirectOutcome {
    let Some(provider) = catalog.get(provider_id) else {
        return fallback_outcome(fallback, RedirectFailure::UnknownProvider);
    };

    match directory.resolve(&provider.affiliate_id) {
        Some(url) => RedirectOutcome::Partner {
            url: url.to_string(),
        },
        None => fallback_outcome(fallback, RedirectFailure::AffiliateNotConfigured),
    }
}

fn fallback_outcome(fallback: &str, failure: RedirectFailure) -> RedirectOutcome {
    let separator = if fallback.contains('?') { '&' } else { '?' };
    RedirectOutcome::Fallback {
        location: format!("{fallback}{separator}error={}", failure.error_flag()),
        failure,
    }
}
