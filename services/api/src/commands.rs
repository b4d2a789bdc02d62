use crate::infra::{load_match_service, parse_date};
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use exchange_match::config::AppConfig;
use exchange_match::error::AppError;
use exchange_match::matching::{
    AccountType, CoverageReport, Currency, ExperienceLevel, FundingMethod, MatchReport, Priority,
    ProviderCatalog, QuizAnswers,
};
use exchange_match::telemetry::{self, LogSink};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Trading currency (aud or nzd)
    #[arg(long, default_value = "aud")]
    pub(crate) currency: Currency,
    /// Experience level (beginner, intermediate, advanced)
    #[arg(long, default_value = "beginner")]
    pub(crate) experience: ExperienceLevel,
    /// Funding methods, comma separated (bank_transfer, card_buy)
    #[arg(long, value_delimiter = ',')]
    pub(crate) funding: Vec<FundingMethod>,
    /// What matters most (fees, ease, coins, advanced)
    #[arg(long, default_value = "fees")]
    pub(crate) priority: Priority,
    /// Account type (individual or smsf)
    #[arg(long, default_value = "individual")]
    pub(crate) account_type: AccountType,
    /// Prefer exchanges with a demo mode
    #[arg(long)]
    pub(crate) wants_demo: bool,
    /// Also list excluded exchanges and why
    #[arg(long)]
    pub(crate) show_excluded: bool,
}

impl MatchArgs {
    fn answers(&self) -> QuizAnswers {
        QuizAnswers::new(
            self.currency,
            self.experience,
            self.funding.iter().copied(),
            self.priority,
        )
        .with_account_type(self.account_type)
        .with_demo(self.wants_demo)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    #[default]
    Markdown,
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct CoverageArgs {
    /// Output format for the coverage report
    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
    pub(crate) format: ReportFormat,
    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let service = load_match_service(&config)?;
    let report = service.evaluate(args.answers());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_match_report(&mut out, &report, service.catalog(), args.show_excluded)?;
    out.flush()?;
    Ok(())
}

pub(crate) fn run_coverage(args: CoverageArgs) -> Result<(), AppError> {
    let CoverageArgs {
        format,
        output,
        date,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let service = load_match_service(&config)?;
    let generated_on = date.unwrap_or_else(|| Local::now().date_naive());
    let report = CoverageReport::generate(&service, generated_on);

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    match format {
        ReportFormat::Markdown => writer.write_all(report.to_markdown().as_bytes())?,
        ReportFormat::Csv => report.write_csv(&mut writer)?,
    }
    writer.flush()?;

    info!(
        combinations = report.total_combinations,
        zero_results = report.zero_result_combinations,
        output = ?output,
        "coverage report written"
    );
    Ok(())
}

fn render_match_report<W: Write>(
    out: &mut W,
    report: &MatchReport<'_>,
    catalog: &ProviderCatalog,
    show_excluded: bool,
) -> io::Result<()> {
    let answers = &report.answers;
    let funding: Vec<&str> = answers.funding.iter().map(|method| method.as_str()).collect();
    writeln!(
        out,
        "Exchange matches for {} / {} / {} / funding {} / priority {}",
        answers.currency.code(),
        answers.experience_level,
        answers.account_type,
        if funding.is_empty() {
            "any".to_string()
        } else {
            funding.join("+")
        },
        answers.priority,
    )?;
    if let Some(reviewed) = catalog.last_reviewed() {
        writeln!(out, "Data last reviewed {reviewed}")?;
    }

    if report.results.is_empty() {
        writeln!(
            out,
            "\nNo exchanges satisfy every answer. Try fewer funding methods or another currency."
        )?;
    }

    for (position, result) in report.results.iter().enumerate() {
        let provider = result.provider;
        let mut tags = Vec::new();
        if result.is_top_match {
            tags.push("top match");
        }
        if provider.partner {
            tags.push("partner");
        }
        if let Some(badge) = provider.custom_badge.as_deref() {
            tags.push(badge);
        }
        writeln!(
            out,
            "\n{}. {} ({}) score {:.2}{}",
            position + 1,
            provider.name,
            provider.origin_label(),
            result.score,
            if tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", tags.join(", "))
            },
        )?;
        writeln!(out, "   Fees: {}", provider.fee_info)?;
        for reason in &result.reasons {
            writeln!(out, "   - {}", reason.text)?;
        }
        for promo in provider.active_promos() {
            writeln!(out, "   Promo: {}", promo.title)?;
        }
    }

    if show_excluded && !report.excluded.is_empty() {
        writeln!(out, "\nExcluded ({})", report.excluded.len())?;
        for entry in &report.excluded {
            let reasons: Vec<&str> = entry
                .reasons
                .iter()
                .map(|reason| reason.text.as_str())
                .collect();
            writeln!(out, "- {}: {}", entry.provider.name, reasons.join("; "))?;
        }
    }

    let partners = catalog.partner_names();
    if !partners.is_empty() {
        writeln!(
            out,
            "\nAffiliate partners: {}. Rankings are not influenced by partnerships.",
            partners.join(", ")
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tests::bundled_config;

    fn args() -> MatchArgs {
        MatchArgs {
            currency: Currency::Nzd,
            experience: ExperienceLevel::Intermediate,
            funding: vec![FundingMethod::BankTransfer, FundingMethod::CardBuy],
            priority: Priority::Ease,
            account_type: AccountType::Individual,
            wants_demo: false,
            show_excluded: true,
        }
    }

    #[test]
    fn args_convert_to_answers() {
        let answers = MatchArgs {
            wants_demo: true,
            account_type: AccountType::Smsf,
            ..args()
        }
        .answers();

        assert_eq!(answers.currency, Currency::Nzd);
        assert!(answers.wants(FundingMethod::CardBuy));
        assert_eq!(answers.account_type, AccountType::Smsf);
        assert!(answers.wants_demo);
    }

    #[test]
    fn rendered_report_lists_matches_exclusions_and_partners() {
        let service = load_match_service(&bundled_config()).expect("service loads");
        let report = service.evaluate(args().answers());
        let mut buffer = Vec::new();

        render_match_report(&mut buffer, &report, service.catalog(), true).expect("renders");

        let text = String::from_utf8(buffer).expect("utf8 output");
        assert!(text.starts_with(
            "Exchange matches for NZD / intermediate / individual / funding bank_transfer+card_buy / priority ease"
        ));
        assert!(text.contains("1. Easy Crypto (Local (AU & NZ))"));
        assert!(text.contains("Excluded ("));
        assert!(text.contains("- Independent Reserve: No NZD card purchases"));
        assert!(text.contains("Affiliate partners: CoinSpot, Coinstash, Independent Reserve."));
    }

    #[test]
    fn empty_results_explain_next_step() {
        let service = load_match_service(&bundled_config()).expect("service loads");
        let answers = args().answers().with_account_type(AccountType::Smsf);
        let report = service.evaluate(answers);
        let mut buffer = Vec::new();

        render_match_report(&mut buffer, &report, service.catalog(), false).expect("renders");

        let text = String::from_utf8(buffer).expect("utf8 output");
        assert!(text.contains("No exchanges satisfy every answer"));
        assert!(!text.contains("Excluded ("));
    }
}
