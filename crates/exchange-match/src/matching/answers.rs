use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Quiz currency; selects both the region flag and the funding rails consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Aud,
    Nzd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingMethod {
    BankTransfer,
    CardBuy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Fees,
    Ease,
    Coins,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Individual,
    Smsf,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Aud, Currency::Nzd];

    pub const fn code(self) -> &'static str {
        match self {
            Currency::Aud => "AUD",
            Currency::Nzd => "NZD",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Currency::Aud => "aud",
            Currency::Nzd => "nzd",
        }
    }
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }
}

impl FundingMethod {
    pub const ALL: [FundingMethod; 2] = [FundingMethod::BankTransfer, FundingMethod::CardBuy];

    pub const fn as_str(self) -> &'static str {
        match self {
            FundingMethod::BankTransfer => "bank_transfer",
            FundingMethod::CardBuy => "card_buy",
        }
    }
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Fees,
        Priority::Ease,
        Priority::Coins,
        Priority::Advanced,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Priority::Fees => "fees",
            Priority::Ease => "ease",
            Priority::Coins => "coins",
            Priority::Advanced => "advanced",
        }
    }
}

impl AccountType {
    pub const ALL: [AccountType; 2] = [AccountType::Individual, AccountType::Smsf];

    pub const fn as_str(self) -> &'static str {
        match self {
            AccountType::Individual => "individual",
            AccountType::Smsf => "smsf",
        }
    }
}

macro_rules! quiz_token {
    ($ty:ty, $field:literal) => {
        impl FromStr for $ty {
            type Err = UnknownOption;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let normalized = raw.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == normalized)
                    .ok_or_else(|| UnknownOption {
                        field: $field,
                        value: raw.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

quiz_token!(Currency, "currency");
quiz_token!(ExperienceLevel, "experience_level");
quiz_token!(FundingMethod, "funding");
quiz_token!(Priority, "priority");
quiz_token!(AccountType, "account_type");

/// Raised when a quiz token is outside its enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {field}")]
pub struct UnknownOption {
    pub field: &'static str,
    pub value: String,
}

/// Sanitized answers for a single match computation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswers {
    pub currency: Currency,
    pub experience_level: ExperienceLevel,
    pub funding: BTreeSet<FundingMethod>,
    pub priority: Priority,
    #[serde(default = "default_account_type")]
    pub account_type: AccountType,
    #[serde(default)]
    pub wants_demo: bool,
}

fn default_account_type() -> AccountType {
    AccountType::Individual
}

impl QuizAnswers {
    pub fn new(
        currency: Currency,
        experience_level: ExperienceLevel,
        funding: impl IntoIterator<Item = FundingMethod>,
        priority: Priority,
    ) -> Self {
        Self {
            currency,
            experience_level,
            funding: funding.into_iter().collect(),
            priority,
            account_type: AccountType::Individual,
            wants_demo: false,
        }
    }

    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }

    pub fn with_demo(mut self, wants_demo: bool) -> Self {
        self.wants_demo = wants_demo;
        self
    }

    pub fn wants(&self, method: FundingMethod) -> bool {
        self.funding.contains(&method)
    }

    /// Recovers a complete answer set from untrusted query values.
    ///
    /// Out-of-enum values fall back to the defaults (`aud`, `beginner`, `fees`, `individual`)
    /// and unknown funding tokens are dropped rather than rejected.
    pub fn from_query(query: &QuizQuery) -> Self {
        let currency = parse_or(query.currency.as_deref(), Currency::Aud);
        let experience_level =
            parse_or(query.experience_level.as_deref(), ExperienceLevel::Beginner);
        let priority = parse_or(query.priority.as_deref(), Priority::Fees);
        let account_type = parse_or(query.account_type.as_deref(), AccountType::Individual);

        let funding = query
            .funding
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .filter_map(|token| token.parse::<FundingMethod>().ok())
                    .collect()
            })
            .unwrap_or_default();

        let wants_demo = query
            .wants_demo
            .as_deref()
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "yes" | "true" | "1"))
            .unwrap_or(false);

        Self {
            currency,
            experience_level,
            funding,
            priority,
            account_type,
            wants_demo,
        }
    }
}

fn parse_or<T: FromStr>(raw: Option<&str>, fallback: T) -> T {
    raw.and_then(|value| value.parse().ok()).unwrap_or(fallback)
}

/// Raw query-string shape accepted at the HTTP boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizQuery {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    /// Comma separated, e.g. `bank_transfer,card_buy`.
    #[serde(default)]
    pub funding: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub wants_demo: Option<String>,
}
