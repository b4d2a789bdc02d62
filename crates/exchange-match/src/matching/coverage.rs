//! Offline sweep over every quiz answer combination, used to spot dead-end answer sets
//! and providers that never surface.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use super::answers::{AccountType, Currency, ExperienceLevel, FundingMethod, Priority, QuizAnswers};
use super::service::MatchService;

const ZERO_RESULT_EXAMPLES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderCoverage {
    pub id: String,
    pub name: String,
    pub appearances: usize,
    pub top_one: usize,
    pub top_n: usize,
    rank_total: usize,
    pub by_priority: BTreeMap<Priority, usize>,
}

impl ProviderCoverage {
    pub fn average_rank(&self) -> f64 {
        if self.appearances == 0 {
            0.0
        } else {
            self.rank_total as f64 / self.appearances as f64
        }
    }

    pub fn for_priority(&self, priority: Priority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub generated_on: NaiveDate,
    pub last_reviewed: Option<String>,
    pub top_n: usize,
    pub total_combinations: usize,
    pub zero_result_combinations: usize,
    pub zero_result_examples: Vec<QuizAnswers>,
    pub providers: Vec<ProviderCoverage>,
}

/// Every non-empty funding selection.
fn funding_selections() -> Vec<Vec<FundingMethod>> {
    let methods = FundingMethod::ALL;
    (1..(1u32 << methods.len()))
        .map(|mask| {
            methods
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, method)| *method)
                .collect()
        })
        .collect()
}

pub fn answer_combinations() -> Vec<QuizAnswers> {
    let mut combinations = Vec::new();
    let selections = funding_selections();

    for currency in Currency::ALL {
        for level in ExperienceLevel::ALL {
            for account_type in AccountType::ALL {
                for funding in &selections {
                    for priority in Priority::ALL {
                        for wants_demo in [false, true] {
                            combinations.push(
                                QuizAnswers::new(currency, level, funding.iter().copied(), priority)
                                    .with_account_type(account_type)
                                    .with_demo(wants_demo),
                            );
                        }
                    }
                }
            }
        }
    }

    combinations
}

impl CoverageReport {
    pub fn generate(service: &MatchService, generated_on: NaiveDate) -> Self {
        let top_n = service.config().top_n;
        let mut providers: Vec<ProviderCoverage> = service
            .catalog()
            .providers()
            .iter()
            .map(|provider| ProviderCoverage {
                id: provider.id.clone(),
                name: provider.name.clone(),
                appearances: 0,
                top_one: 0,
                top_n: 0,
                rank_total: 0,
                by_priority: BTreeMap::new(),
            })
            .collect();
        let index: BTreeMap<String, usize> = providers
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.id.clone(), position))
            .collect();

        let mut total_combinations = 0;
        let mut zero_result_combinations = 0;
        let mut zero_result_examples = Vec::new();

        for answers in answer_combinations() {
            total_combinations += 1;
            let results = service.match_providers(&answers);

            if results.is_empty() {
                zero_result_combinations += 1;
                if zero_result_examples.len() < ZERO_RESULT_EXAMPLES {
                    zero_result_examples.push(answers);
                }
                continue;
            }

            for (position, result) in results.iter().enumerate() {
                let Some(slot) = index.get(&result.provider.id) else {
                    continue;
                };
                let stats = &mut providers[*slot];
                stats.appearances += 1;
                stats.rank_total += position + 1;
                if position == 0 {
                    stats.top_one += 1;
                }
                if result.is_top_match {
                    stats.top_n += 1;
                }
                *stats.by_priority.entry(answers.priority).or_insert(0) += 1;
            }
        }

        Self {
            generated_on,
            last_reviewed: service.catalog().last_reviewed().map(str::to_string),
            top_n,
            total_combinations,
            zero_result_combinations,
            zero_result_examples,
            providers,
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# Match Coverage Report\n");
        let _ = writeln!(md, "- Generated: {}", self.generated_on);
        let _ = writeln!(
            md,
            "- Total answer combinations evaluated: {}",
            self.total_combinations
        );
        let _ = writeln!(
            md,
            "- Combinations with zero eligible providers: {}",
            self.zero_result_combinations
        );
        let _ = writeln!(md, "- Top N considered: {}", self.top_n);
        if let Some(reviewed) = &self.last_reviewed {
            let _ = writeln!(md, "- Data last reviewed: {reviewed}");
        }
        md.push('\n');

        if !self.zero_result_examples.is_empty() {
            let _ = writeln!(
                md,
                "## Example zero-result combinations (first {ZERO_RESULT_EXAMPLES})\n"
            );
            for (position, answers) in self.zero_result_examples.iter().enumerate() {
                let _ = writeln!(md, "{}. {}", position + 1, describe(answers));
            }
            md.push('\n');
        }

        md.push_str("## Provider Appearance Summary\n\n");
        md.push_str(
            "| Provider | Appearances | Top 1 | Top N | Avg Rank | Coins | Ease | Fees | Advanced |\n",
        );
        md.push_str("|---|---:|---:|---:|---:|---:|---:|---:|---:|\n");
        for entry in &self.providers {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {:.2} | {} | {} | {} | {} |",
                entry.name,
                entry.appearances,
                entry.top_one,
                entry.top_n,
                entry.average_rank(),
                entry.for_priority(Priority::Coins),
                entry.for_priority(Priority::Ease),
                entry.for_priority(Priority::Fees),
                entry.for_priority(Priority::Advanced),
            );
        }

        md
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), CoverageError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in &self.providers {
            csv_writer.serialize(CoverageRow {
                provider_id: &entry.id,
                provider: &entry.name,
                appearances: entry.appearances,
                top_one: entry.top_one,
                top_n: entry.top_n,
                average_rank: format!("{:.2}", entry.average_rank()),
                coins: entry.for_priority(Priority::Coins),
                ease: entry.for_priority(Priority::Ease),
                fees: entry.for_priority(Priority::Fees),
                advanced: entry.for_priority(Priority::Advanced),
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CoverageRow<'a> {
    provider_id: &'a str,
    provider: &'a str,
    appearances: usize,
    top_one: usize,
    top_n: usize,
    average_rank: String,
    coins: usize,
    ease: usize,
    fees: usize,
    advanced: usize,
}

fn describe(answers: &QuizAnswers) -> String {
    let funding: Vec<&str> = answers.funding.iter().map(|method| method.as_str()).collect();
    format!(
        "{} / {} / {} / {} / {} / demo {}",
        answers.currency.code(),
        answers.experience_level,
        answers.account_type,
        funding.join("+"),
        answers.priority,
        if answers.wants_demo { "yes" } else { "no" },
    )
}

#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    #[error("failed to write coverage csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush coverage output: {0}")]
    Io(#[from] std::io::Error),
}
