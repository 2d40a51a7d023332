//! Heuristic document authenticity checks and a completeness score over raw text.

use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::extraction::parse_amount;

const MAX_FRAUD_SCORE: u8 = 100;
const NO_INDICATORS: &str = "No fraud indicators detected";
const REQUIRED_FIELDS: [&str; 4] = ["name", "income", "employment", "address"];
const QUALITY_KEYWORDS: [&str; 5] = ["income", "employment", "debt", "loan", "bank"];

/// Single anomaly found in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudSignal {
    pub description: String,
    pub score_contribution: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FraudRiskLevel {
    #[serde(rename = "LOW FRAUD RISK")]
    Low,
    #[serde(rename = "MEDIUM FRAUD RISK")]
    Medium,
    #[serde(rename = "HIGH FRAUD RISK")]
    High,
}

impl FraudRiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= 50 {
            FraudRiskLevel::High
        } else if score >= 25 {
            FraudRiskLevel::Medium
        } else {
            FraudRiskLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FraudRiskLevel::Low => "LOW FRAUD RISK",
            FraudRiskLevel::Medium => "MEDIUM FRAUD RISK",
            FraudRiskLevel::High => "HIGH FRAUD RISK",
        }
    }
}

impl fmt::Display for FraudRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregated authenticity verdict. `signals` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudReport {
    pub fraud_score: u8,
    pub authenticity_confidence: u8,
    pub risk_level: FraudRiskLevel,
    pub signals: Vec<FraudSignal>,
    pub total_signals: usize,
}

/// Completeness and financial-density metrics for the submitted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentQuality {
    pub quality_score: u8,
    pub word_count: usize,
    pub numerical_density: f64,
    pub currency_mentions: usize,
    pub completeness: String,
}

struct FraudPatterns {
    currency: Regex,
    income: Regex,
    date: Regex,
    amendment: Regex,
    number: Regex,
}

impl FraudPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            currency: Regex::new(r"RM\s*[0-9,]+\.?[0-9]*")?,
            income: Regex::new(r"(?i)income.*?RM\s*([0-9,]+)")?,
            date: Regex::new(r"\b[0-9]{1,2}[-/][0-9]{1,2}[-/]([0-9]{2,4})\b")?,
            amendment: Regex::new(r"(?i)\*+|correction|amended|updated")?,
            number: Regex::new(r"[0-9]+")?,
        })
    }
}

/// Stateless fraud scorer; the reference year decides what counts as a future date.
pub struct FraudDetector {
    patterns: Option<FraudPatterns>,
    reference_year: i32,
}

impl Default for FraudDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FraudDetector {
    pub fn new() -> Self {
        Self::with_reference_year(Local::now().year())
    }

    pub fn with_reference_year(reference_year: i32) -> Self {
        Self {
            patterns: FraudPatterns::compile().ok(),
            reference_year,
        }
    }

    pub fn detect(&self, text: &str) -> FraudReport {
        let mut signals = Vec::new();

        if duplicate_lines(text) > 5 {
            signals.push(signal("High duplicate content detected", 15));
        }

        if let Some(patterns) = &self.patterns {
            if currency_formats(&patterns.currency, text) > 3 {
                signals.push(signal("Inconsistent number formatting", 10));
            }

            let (high, low) = implausible_incomes(&patterns.income, text);
            if high {
                signals.push(signal("Unusually high income reported", 20));
            }
            if low {
                signals.push(signal("Suspiciously low income", 15));
            }
        }

        let missing = missing_fields(text);
        if missing.len() > 1 {
            let contribution = u8::try_from(missing.len() * 10).unwrap_or(MAX_FRAUD_SCORE);
            signals.push(signal(
                &format!("Missing critical fields: {}", missing.join(", ")),
                contribution,
            ));
        }

        if let Some(patterns) = &self.patterns {
            if self.has_future_date(&patterns.date, text) {
                signals.push(signal("Document contains future dates", 25));
            }

            if patterns.amendment.find_iter(text).count() > 3 {
                signals.push(signal("Multiple corrections/amendments detected", 15));
            }
        }

        let raw_score: u32 = signals
            .iter()
            .map(|signal| u32::from(signal.score_contribution))
            .sum();
        let fraud_score = u8::try_from(raw_score.min(u32::from(MAX_FRAUD_SCORE)))
            .unwrap_or(MAX_FRAUD_SCORE);
        let total_signals = signals.len();

        if signals.is_empty() {
            signals.push(signal(NO_INDICATORS, 0));
        }

        FraudReport {
            fraud_score,
            authenticity_confidence: MAX_FRAUD_SCORE - fraud_score,
            risk_level: FraudRiskLevel::from_score(fraud_score),
            signals,
            total_signals,
        }
    }

    pub fn assess_quality(&self, text: &str) -> DocumentQuality {
        let word_count = text.split_whitespace().count();
        let line_count = text.split('\n').count();
        let (numbers, currency_mentions) = match &self.patterns {
            Some(patterns) => (
                patterns.number.find_iter(text).count(),
                patterns.currency.find_iter(text).count(),
            ),
            None => (0, 0),
        };
        let numerical_density = numbers as f64 / word_count.max(1) as f64 * 100.0;

        let mut score: u32 = 0;
        if word_count > 100 {
            score += 20;
        }
        if word_count > 500 {
            score += 10;
        }
        if numerical_density > 5.0 {
            score += 20;
        }
        if numerical_density > 10.0 {
            score += 10;
        }
        if currency_mentions > 5 {
            score += 20;
        }
        if currency_mentions > 10 {
            score += 10;
        }
        if line_count > 20 {
            score += 10;
        }

        let lowered = text.to_lowercase();
        let found = QUALITY_KEYWORDS
            .iter()
            .filter(|keyword| lowered.contains(*keyword))
            .count();
        score += found as u32 * 2;

        DocumentQuality {
            quality_score: u8::try_from(score.min(100)).unwrap_or(100),
            word_count,
            numerical_density: (numerical_density * 100.0).round() / 100.0,
            currency_mentions,
            completeness: format!("{found}/{} key fields", QUALITY_KEYWORDS.len()),
        }
    }

    fn has_future_date(&self, pattern: &Regex, text: &str) -> bool {
        pattern.captures_iter(text).any(|captures| {
            let Some(year) = captures
                .get(1)
                .and_then(|m| m.as_str().parse::<i32>().ok())
            else {
                return false;
            };
            let year = if year < 100 { year + 2000 } else { year };
            year > self.reference_year
        })
    }
}

fn signal(description: &str, score_contribution: u8) -> FraudSignal {
    FraudSignal {
        description: description.to_string(),
        score_contribution,
    }
}

fn duplicate_lines(text: &str) -> usize {
    let lines: Vec<&str> = text.split('\n').collect();
    let distinct: HashSet<&str> = lines.iter().copied().collect();
    lines.len() - distinct.len()
}

fn currency_formats(pattern: &Regex, text: &str) -> usize {
    pattern
        .find_iter(text)
        .map(|m| {
            m.as_str()
                .replace("RM", "")
                .trim()
                .chars()
                .take(3)
                .collect::<String>()
        })
        .collect::<HashSet<_>>()
        .len()
}

fn implausible_incomes(pattern: &Regex, text: &str) -> (bool, bool) {
    let mut high = false;
    let mut low = false;
    for captures in pattern.captures_iter(text) {
        let Some(value) = captures.get(1).and_then(|m| parse_amount(m.as_str())) else {
            continue;
        };
        if value > 100_000 {
            high = true;
        } else if value < 1_000 {
            low = true;
        }
    }
    (high, low)
}

fn missing_fields(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !lowered.contains(field))
        .collect()
}
