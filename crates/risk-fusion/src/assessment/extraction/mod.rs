mod patterns;

pub use patterns::FactField;

use std::collections::BTreeMap;

use chrono::{Datelike, Local};
use regex::Regex;

use super::domain::FinancialFacts;
use patterns::{Aggregation, ValueParser, FIELD_PATTERNS};

struct CompiledPattern {
    field: FactField,
    regex: Regex,
    parser: ValueParser,
}

/// Pattern-cascade extractor turning document text into [`FinancialFacts`].
///
/// Extraction never fails: a field without a usable match stays at zero.
pub struct FeatureExtractor {
    patterns: Vec<CompiledPattern>,
    reference_year: i32,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor {
    /// Compile the pattern table, resolving birth years against the current year.
    pub fn new() -> Self {
        Self::with_reference_year(Local::now().year())
    }

    pub fn with_reference_year(reference_year: i32) -> Self {
        let patterns = FIELD_PATTERNS
            .iter()
            .filter_map(|p| {
                Regex::new(p.pattern).ok().map(|regex| CompiledPattern {
                    field: p.field,
                    regex,
                    parser: p.parser,
                })
            })
            .collect();

        Self {
            patterns,
            reference_year,
        }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn extract(&self, text: &str) -> FinancialFacts {
        let mut facts = FinancialFacts::default();

        for field in FactField::ALL {
            let value = match field.aggregation() {
                Aggregation::FirstMatch => self.first_match(field, text),
                Aggregation::SumAll => self.sum_all(field, text),
            };
            let Some(value) = value else { continue };

            match field {
                FactField::MonthlyIncome => facts.monthly_income = value,
                FactField::MonthlyDebt => facts.monthly_debt = value,
                FactField::PropertyValue => facts.property_value = value,
                FactField::LoanAmount => facts.loan_amount = value,
                FactField::Savings => facts.savings = value,
                FactField::EmploymentYears => {
                    facts.employment_years = u32::try_from(value).unwrap_or_default()
                }
                FactField::Age => facts.age = u32::try_from(value).unwrap_or_default(),
            }
        }

        facts
    }

    fn patterns_for(&self, field: FactField) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter().filter(move |p| p.field == field)
    }

    fn first_match(&self, field: FactField, text: &str) -> Option<u64> {
        self.patterns_for(field).find_map(|pattern| {
            let capture = pattern.regex.captures(text)?.get(1)?;
            self.parse(pattern.parser, capture.as_str())
        })
    }

    fn sum_all(&self, field: FactField, text: &str) -> Option<u64> {
        // Keyed by capture offset so one figure hit by two alternatives counts once.
        let mut hits: BTreeMap<usize, u64> = BTreeMap::new();
        for pattern in self.patterns_for(field) {
            for captures in pattern.regex.captures_iter(text) {
                let Some(capture) = captures.get(1) else {
                    continue;
                };
                if let Some(value) = self.parse(pattern.parser, capture.as_str()) {
                    hits.entry(capture.start()).or_insert(value);
                }
            }
        }

        if hits.is_empty() {
            return None;
        }
        Some(hits.values().fold(0u64, |acc, value| acc.saturating_add(*value)))
    }

    fn parse(&self, parser: ValueParser, raw: &str) -> Option<u64> {
        match parser {
            ValueParser::Amount => parse_amount(raw),
            ValueParser::Count => raw.trim().parse().ok(),
            ValueParser::AgeOrBirthYear => {
                let value: i32 = raw.trim().parse().ok()?;
                if value > 1900 {
                    let age = self.reference_year.checked_sub(value)?;
                    u64::try_from(age).ok()
                } else {
                    u64::try_from(value).ok()
                }
            }
        }
    }
}

/// Parse a currency figure such as `12,500`; separator-only captures are rejected.
pub fn parse_amount(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
