use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::matching::answers::ExperienceLevel;

pub const DEFAULT_TOP_N: usize = 3;
pub const DEFAULT_DEMO_BONUS: f64 = 1.0;

/// Inclusive-upper coin range used to praise "not overwhelming" selections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoinRange {
    pub min: u32,
    pub max: u32,
}

impl CoinRange {
    pub fn contains(&self, coins: u32) -> bool {
        coins > self.min && coins <= self.max
    }
}

/// Weights applied by the scoring rules for one experience level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceWeights {
    pub coins_cap: f64,
    pub coins_sweet_spot: Option<CoinRange>,
    pub coins_bonus: f64,
    pub coins_highlight_threshold: u32,
    pub fee_weight: f64,
    pub fee_complexity_penalty: f64,
    pub ease_multiplier: f64,
    pub complexity_penalty: f64,
    pub features_bonus: f64,
    pub simple_platform_bonus: f64,
    pub very_easy_bonus: f64,
    pub hard_setup_penalty: f64,
    pub balanced_bonus: f64,
    pub establishment_threshold: i32,
    pub establishment_bonus: f64,
    pub oversimplified_penalty: f64,
}

impl ExperienceWeights {
    pub fn beginner() -> Self {
        Self {
            coins_cap: 1.5,
            coins_sweet_spot: Some(CoinRange { min: 20, max: 150 }),
            coins_bonus: 1.0,
            coins_highlight_threshold: 100,
            fee_weight: 1.0,
            fee_complexity_penalty: 1.0,
            ease_multiplier: 1.5,
            complexity_penalty: 1.5,
            features_bonus: 1.0,
            simple_platform_bonus: 0.5,
            very_easy_bonus: 0.5,
            hard_setup_penalty: 1.0,
            balanced_bonus: 0.0,
            establishment_threshold: 2018,
            establishment_bonus: 0.0,
            oversimplified_penalty: 0.0,
        }
    }

    pub fn intermediate() -> Self {
        Self {
            coins_cap: 1.5,
            coins_sweet_spot: None,
            coins_bonus: 1.0,
            coins_highlight_threshold: 100,
            fee_weight: 1.0,
            fee_complexity_penalty: 0.3,
            ease_multiplier: 1.0,
            complexity_penalty: 0.5,
            features_bonus: 2.0,
            simple_platform_bonus: 0.0,
            very_easy_bonus: 0.0,
            hard_setup_penalty: 0.0,
            balanced_bonus: 0.3,
            establishment_threshold: 2018,
            establishment_bonus: 0.0,
            oversimplified_penalty: 0.0,
        }
    }

    pub fn advanced() -> Self {
        Self {
            coins_cap: 1.5,
            coins_sweet_spot: None,
            coins_bonus: 1.2,
            coins_highlight_threshold: 200,
            fee_weight: 1.3,
            fee_complexity_penalty: 0.0,
            ease_multiplier: 0.8,
            complexity_penalty: 0.0,
            features_bonus: 3.0,
            simple_platform_bonus: 0.0,
            very_easy_bonus: 0.0,
            hard_setup_penalty: 0.0,
            balanced_bonus: 0.0,
            establishment_threshold: 2018,
            establishment_bonus: 0.2,
            oversimplified_penalty: 0.2,
        }
    }
}

/// Tunable scoring inputs passed into every score computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub beginner: ExperienceWeights,
    pub intermediate: ExperienceWeights,
    pub advanced: ExperienceWeights,
    pub top_n: usize,
    pub demo_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            beginner: ExperienceWeights::beginner(),
            intermediate: ExperienceWeights::intermediate(),
            advanced: ExperienceWeights::advanced(),
            top_n: DEFAULT_TOP_N,
            demo_bonus: DEFAULT_DEMO_BONUS,
        }
    }
}

impl ScoringConfig {
    pub fn weights(&self, level: ExperienceLevel) -> &ExperienceWeights {
        match level {
            ExperienceLevel::Beginner => &self.beginner,
            ExperienceLevel::Intermediate => &self.intermediate,
            ExperienceLevel::Advanced => &self.advanced,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScoringConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ScoringConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Layers a JSON override document on top of the defaults.
    ///
    /// Only the fields present in the document change; every other weight keeps its
    /// per-level default.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScoringConfigError> {
        let document: ScoringDocument = serde_json::from_reader(reader)?;
        let mut config = Self::default();

        for (level, overrides) in document.experience_scoring {
            let weights = match level {
                ExperienceLevel::Beginner => &mut config.beginner,
                ExperienceLevel::Intermediate => &mut config.intermediate,
                ExperienceLevel::Advanced => &mut config.advanced,
            };
            overrides.apply(weights);
        }

        if let Some(top_n) = document.ui.and_then(|ui| ui.top_n) {
            config.top_n = top_n;
        }
        if let Some(bonus) = document.demo_bonus {
            config.demo_bonus = bonus;
        }

        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScoringDocument {
    #[serde(default)]
    experience_scoring: BTreeMap<ExperienceLevel, WeightOverrides>,
    #[serde(default)]
    ui: Option<UiSettings>,
    #[serde(default)]
    demo_bonus: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UiSettings {
    #[serde(default)]
    top_n: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WeightOverrides {
    coins_cap: Option<f64>,
    coins_sweet_spot: Option<CoinRange>,
    coins_bonus: Option<f64>,
    coins_highlight_threshold: Option<u32>,
    fee_weight: Option<f64>,
    fee_complexity_penalty: Option<f64>,
    ease_multiplier: Option<f64>,
    complexity_penalty: Option<f64>,
    features_bonus: Option<f64>,
    simple_platform_bonus: Option<f64>,
    very_easy_bonus: Option<f64>,
    hard_setup_penalty: Option<f64>,
    balanced_bonus: Option<f64>,
    establishment_threshold: Option<i32>,
    establishment_bonus: Option<f64>,
    oversimplified_penalty: Option<f64>,
}

macro_rules! apply_overrides {
    ($source:expr, $target:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $source.$field {
                $target.$field = value;
            }
        )+
    };
}

impl WeightOverrides {
    fn apply(self, weights: &mut ExperienceWeights) {
        if self.coins_sweet_spot.is_some() {
            weights.coins_sweet_spot = self.coins_sweet_spot;
        }
        apply_overrides!(
            self,
            weights,
            coins_cap,
            coins_bonus,
            coins_highlight_threshold,
            fee_weight,
            fee_complexity_penalty,
            ease_multiplier,
            complexity_penalty,
            features_bonus,
            simple_platform_bonus,
            very_easy_bonus,
            hard_setup_penalty,
            balanced_bonus,
            establishment_threshold,
            establishment_bonus,
            oversimplified_penalty,
        );
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("unable to read scoring config at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("scoring config is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}
