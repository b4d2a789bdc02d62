use std::sync::OnceLock;

use regex::Regex;

fn percent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([0-9]+(?:\.[0-9]+)?)%").expect("static fee pattern compiles")
    })
}

/// Pulls the headline percentage out of a free-text fee description.
///
/// Prefers the first percentage after the word "taker" and otherwise takes the first
/// percentage anywhere. Multiple candidates are not disambiguated.
pub fn extract_base_percent(fee_info: &str) -> Option<f64> {
    let lower = fee_info.to_ascii_lowercase();
    if let Some(index) = lower.find("taker") {
        if let Some(value) = first_percent(&fee_info[index..]) {
            return Some(value);
        }
    }
    first_percent(fee_info)
}

fn first_percent(text: &str) -> Option<f64> {
    percent_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse::<f64>().ok())
}

/// Descending step function; a lower base fee never maps to a lower score.
pub fn score_for_percent(base: f64) -> f64 {
    if base <= 0.10 {
        2.0
    } else if base <= 0.25 {
        1.6
    } else if base <= 0.40 {
        1.5
    } else if base <= 0.50 {
        1.4
    } else if base <= 0.60 {
        1.2
    } else if base <= 0.85 {
        1.05
    } else if base <= 1.00 {
        1.0
    } else {
        0.8
    }
}

pub fn fee_score(fee_info: &str) -> f64 {
    if let Some(base) = extract_base_percent(fee_info) {
        return score_for_percent(base);
    }

    if fee_info.contains("0.02%") || fee_info.contains("0.1%") {
        2.0
    } else if fee_info.contains("0.5%") {
        1.5
    } else if fee_info.contains("0.6%") {
        1.2
    } else if fee_info.contains("1%") {
        1.0
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_taker_rate_over_earlier_percentages() {
        let base = extract_base_percent("Maker 0.10%, taker 0.40% on spot markets");
        assert_eq!(base, Some(0.40));
    }

    #[test]
    fn taker_lookup_is_case_insensitive() {
        assert_eq!(extract_base_percent("TAKER fee: 0.25%"), Some(0.25));
    }

    #[test]
    fn falls_back_to_first_percentage_without_taker() {
        assert_eq!(extract_base_percent("1% instant buy, 0.1% markets"), Some(1.0));
    }

    #[test]
    fn taker_without_trailing_percent_uses_first_match() {
        assert_eq!(
            extract_base_percent("0.6% spread; taker rebates available"),
            Some(0.6)
        );
    }

    #[test]
    fn ranges_take_the_upper_bound_token() {
        // "1-2%" only exposes "2%" to the pattern; kept as first-match-wins.
        assert_eq!(extract_base_percent("Spread typically 1-2%"), Some(2.0));
    }

    #[test]
    fn only_ascii_digits_count_as_percentages() {
        assert_eq!(extract_base_percent("٢% promo spread, 0.5% trading"), Some(0.5));
        assert_eq!(fee_score("٢% promo spread, 0.5% trading"), 1.4);
    }

    #[test]
    fn step_function_boundaries() {
        assert_eq!(score_for_percent(0.10), 2.0);
        assert_eq!(score_for_percent(0.11), 1.6);
        assert_eq!(score_for_percent(0.25), 1.6);
        assert_eq!(score_for_percent(0.40), 1.5);
        assert_eq!(score_for_percent(0.50), 1.4);
        assert_eq!(score_for_percent(0.60), 1.2);
        assert_eq!(score_for_percent(0.85), 1.05);
        assert_eq!(score_for_percent(1.00), 1.0);
        assert_eq!(score_for_percent(1.01), 0.8);
    }

    #[test]
    fn lower_fees_never_score_worse() {
        let samples = [0.0, 0.02, 0.1, 0.2, 0.3, 0.45, 0.55, 0.7, 0.9, 1.0, 1.5, 3.0];
        for pair in samples.windows(2) {
            assert!(score_for_percent(pair[0]) >= score_for_percent(pair[1]));
        }
    }

    #[test]
    fn unparseable_text_uses_fallback_score() {
        assert_eq!(fee_score("Spread-based pricing"), 0.5);
        assert_eq!(fee_score(""), 0.5);
    }

    #[test]
    fn fee_score_maps_parsed_percentages() {
        assert_eq!(fee_score("Flat 0.5% brokerage"), 1.4);
        assert_eq!(fee_score("Taker fees from 0.85% down to 0.10%"), 1.05);
    }
}
