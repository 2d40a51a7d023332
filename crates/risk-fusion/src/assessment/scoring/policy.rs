use std::fmt;

use serde::{Deserialize, Serialize};

use super::super::domain::FinancialFacts;
use super::config::{AdvisoryThresholds, CategoryFloors};

/// Credit risk band derived from the bounded score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditRiskCategory {
    #[serde(rename = "LOW RISK")]
    Low,
    #[serde(rename = "MEDIUM-LOW RISK")]
    MediumLow,
    #[serde(rename = "MEDIUM RISK")]
    Medium,
    #[serde(rename = "MEDIUM-HIGH RISK")]
    MediumHigh,
    #[serde(rename = "HIGH RISK")]
    High,
}

impl CreditRiskCategory {
    pub fn from_score(score: u16, floors: &CategoryFloors) -> Self {
        if score >= floors.low {
            CreditRiskCategory::Low
        } else if score >= floors.medium_low {
            CreditRiskCategory::MediumLow
        } else if score >= floors.medium {
            CreditRiskCategory::Medium
        } else if score >= floors.medium_high {
            CreditRiskCategory::MediumHigh
        } else {
            CreditRiskCategory::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CreditRiskCategory::Low => "LOW RISK",
            CreditRiskCategory::MediumLow => "MEDIUM-LOW RISK",
            CreditRiskCategory::Medium => "MEDIUM RISK",
            CreditRiskCategory::MediumHigh => "MEDIUM-HIGH RISK",
            CreditRiskCategory::High => "HIGH RISK",
        }
    }
}

impl fmt::Display for CreditRiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Advisory raised when a scoring threshold is breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditAdvisory {
    DsrAboveLimit,
    HighLoanToValue,
    LimitedEmploymentHistory,
    LimitedSavingsBuffer,
    BelowOptimalScore,
    AllMetricsAcceptable,
}

impl CreditAdvisory {
    pub fn message(self) -> &'static str {
        match self {
            CreditAdvisory::DsrAboveLimit => {
                "DSR exceeds Bank Negara guidelines. Consider debt consolidation or higher income verification."
            }
            CreditAdvisory::HighLoanToValue => {
                "High LTV ratio. Recommend larger down payment to reduce loan amount."
            }
            CreditAdvisory::LimitedEmploymentHistory => {
                "Limited employment history. May require co-borrower or guarantor."
            }
            CreditAdvisory::LimitedSavingsBuffer => {
                "Limited savings buffer. Recommend building emergency fund before approval."
            }
            CreditAdvisory::BelowOptimalScore => {
                "Below optimal credit score. Consider credit improvement measures before reapplication."
            }
            CreditAdvisory::AllMetricsAcceptable => {
                "All metrics within acceptable ranges. Applicant qualifies for standard terms."
            }
        }
    }
}

pub(crate) fn advisories_for(
    score: u16,
    dsr: f64,
    ltv: f64,
    facts: &FinancialFacts,
    thresholds: &AdvisoryThresholds,
) -> Vec<CreditAdvisory> {
    let mut advisories = Vec::new();

    if dsr > thresholds.max_dsr {
        advisories.push(CreditAdvisory::DsrAboveLimit);
    }

    if ltv > thresholds.max_ltv {
        advisories.push(CreditAdvisory::HighLoanToValue);
    }

    if facts.employment_years < thresholds.min_employment_years {
        advisories.push(CreditAdvisory::LimitedEmploymentHistory);
    }

    let buffer = facts
        .monthly_income
        .saturating_mul(thresholds.min_savings_months);
    if facts.savings < buffer {
        advisories.push(CreditAdvisory::LimitedSavingsBuffer);
    }

    if score < thresholds.min_credit_score {
        advisories.push(CreditAdvisory::BelowOptimalScore);
    }

    if advisories.is_empty() {
        advisories.push(CreditAdvisory::AllMetricsAcceptable);
    }

    advisories
}
