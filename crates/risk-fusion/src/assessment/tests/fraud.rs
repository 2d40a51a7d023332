use super::common::*;
use crate::assessment::fraud::{FraudDetector, FraudRiskLevel};

const FUTURE_DATES: &str = "Document contains future dates";

fn detector() -> FraudDetector {
    FraudDetector::with_reference_year(REFERENCE_YEAR)
}

fn descriptions(text: &str) -> Vec<String> {
    detector()
        .detect(text)
        .signals
        .into_iter()
        .map(|signal| signal.description)
        .collect()
}

#[test]
fn future_date_is_flagged() {
    let report = detector().detect("Statement date 12/03/2099");

    assert!(report.fraud_score >= 25);
    assert!(report
        .signals
        .iter()
        .any(|signal| signal.description == FUTURE_DATES && signal.score_contribution == 25));
}

#[test]
fn two_digit_years_are_read_as_this_century() {
    assert!(descriptions("Payslip dated 01/01/99").contains(&FUTURE_DATES.to_string()));
    assert!(!descriptions("Payslip dated 01/01/24").contains(&FUTURE_DATES.to_string()));
}

#[test]
fn future_dates_count_once() {
    let report = detector().detect("Dated 01/02/2030 and 03/04/2031 and 05/06/2032");
    let hits = report
        .signals
        .iter()
        .filter(|signal| signal.description == FUTURE_DATES)
        .count();
    assert_eq!(hits, 1);
}

#[test]
fn clean_document_reports_placeholder_signal() {
    let text = "Name: Lim Wei Jie\nAddress: Penang\nMonthly Income: RM 6,000\nEmployment: 4 years";
    let report = detector().detect(text);

    assert_eq!(report.fraud_score, 0);
    assert_eq!(report.authenticity_confidence, 100);
    assert_eq!(report.risk_level, FraudRiskLevel::Low);
    assert_eq!(report.total_signals, 0);
    assert_eq!(report.signals.len(), 1);
    assert_eq!(report.signals[0].description, "No fraud indicators detected");
    assert_eq!(report.signals[0].score_contribution, 0);
}

#[test]
fn missing_fields_scale_with_count() {
    let report = detector().detect("Monthly Income: RM 6,000");
    let signal = report
        .signals
        .iter()
        .find(|signal| signal.description.starts_with("Missing critical fields"))
        .expect("missing field signal");

    assert_eq!(
        signal.description,
        "Missing critical fields: name, employment, address"
    );
    assert_eq!(signal.score_contribution, 30);
}

#[test]
fn single_missing_field_is_tolerated() {
    let text = "Name: Tan\nIncome RM 5,000\nEmployment 3 years";
    assert!(descriptions(text)
        .iter()
        .all(|description| !description.starts_with("Missing critical fields")));
}

#[test]
fn implausible_income_fires_once_per_class() {
    let text = "Name: A\nAddress: B\nEmployment: 2 years\n\
                Income RM 250,000\nIncome RM 300,000\nIncome RM 500";
    let report = detector().detect(text);

    let high = report
        .signals
        .iter()
        .filter(|signal| signal.description == "Unusually high income reported")
        .count();
    let low = report
        .signals
        .iter()
        .filter(|signal| signal.description == "Suspiciously low income")
        .count();
    assert_eq!((high, low), (1, 1));
}

#[test]
fn repeated_lines_and_amendments_are_flagged() {
    let mut text = String::from("Name: A\nAddress: B\nEmployment: 2 years\nIncome RM 5,000\n");
    for _ in 0..7 {
        text.push_str("same line\n");
    }
    text.push_str("correction: amended figure, updated twice ** see note");

    let found = descriptions(&text);
    assert!(found.contains(&"High duplicate content detected".to_string()));
    assert!(found.contains(&"Multiple corrections/amendments detected".to_string()));
}

#[test]
fn score_is_capped_and_confidence_complements_it() {
    let mut text = String::new();
    for _ in 0..10 {
        text.push_str("dup\n");
    }
    text.push_str("income RM 900,000 income RM 10 RM 1,1 RM 22 RM 333 RM 4444\n");
    text.push_str("01/01/2099 ** correction amended updated");

    let report = detector().detect(&text);
    assert_eq!(report.fraud_score, 100);
    assert_eq!(report.authenticity_confidence, 0);
    assert_eq!(report.risk_level, FraudRiskLevel::High);
}

#[test]
fn adding_anomalies_never_lowers_the_score() {
    let base = "Name: A\nAddress: B\nEmployment: 2 years\nIncome RM 5,000";
    let with_date = format!("{base}\nSigned 01/01/2099");
    let with_amendments = format!("{with_date}\ncorrection amended updated ***");

    let detector = detector();
    let scores: Vec<u8> = [base.to_string(), with_date, with_amendments]
        .iter()
        .map(|text| detector.detect(text).fraud_score)
        .collect();

    assert!(scores.windows(2).all(|pair| pair[0] <= pair[1]), "{scores:?}");
    assert_eq!(scores, vec![0, 25, 40]);
}

#[test]
fn risk_labels_follow_thresholds() {
    assert_eq!(FraudRiskLevel::from_score(0), FraudRiskLevel::Low);
    assert_eq!(FraudRiskLevel::from_score(24), FraudRiskLevel::Low);
    assert_eq!(FraudRiskLevel::from_score(25), FraudRiskLevel::Medium);
    assert_eq!(FraudRiskLevel::from_score(50), FraudRiskLevel::High);
    assert_eq!(FraudRiskLevel::High.to_string(), "HIGH FRAUD RISK");
}

#[test]
fn strong_application_only_trips_amount_formatting() {
    let report = detector().detect(STRONG_APPLICATION);

    assert_eq!(report.fraud_score, 10);
    assert_eq!(report.total_signals, 1);
    assert_eq!(report.signals[0].description, "Inconsistent number formatting");
}

#[test]
fn quality_rewards_long_numeric_documents() {
    let detector = detector();
    let sparse = detector.assess_quality("hello world");
    assert_eq!(sparse.quality_score, 0);
    assert_eq!(sparse.completeness, "0/5 key fields");

    let mut rich = String::new();
    for month in 1..=24 {
        rich.push_str(&format!(
            "Month {month} income RM {month}000 employment bank loan debt statement line\n"
        ));
    }
    let quality = detector.assess_quality(&rich);

    assert_eq!(quality.word_count, 24 * 11);
    assert_eq!(quality.currency_mentions, 24);
    assert_eq!(quality.completeness, "5/5 key fields");
    // >100 words, density >10, >10 currency mentions, >20 lines, 5 keywords
    assert_eq!(quality.quality_score, 20 + 20 + 10 + 20 + 10 + 10 + 10);
}
