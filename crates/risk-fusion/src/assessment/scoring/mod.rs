mod config;
mod policy;
mod rules;

pub use config::{
    AdvisoryThresholds, Band, BandOutcome, CategoryFloors, CeilingBands, FloorBands,
    ScoringPolicy,
};
pub use policy::{CreditAdvisory, CreditRiskCategory};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::FinancialFacts;
use policy::advisories_for;

/// Stateless scorer that applies the rubric to extracted facts.
#[derive(Debug, Clone, Default)]
pub struct CreditScorer {
    policy: ScoringPolicy,
}

impl CreditScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Bounded credit score and the per-factor trail that produced it.
    pub fn score(&self, facts: &FinancialFacts) -> (u16, ScoreBreakdown) {
        let breakdown = rules::score_facts(facts, &self.policy);
        let score = self.bounded(i32::from(self.policy.base_score) + breakdown.total_points());
        (score, breakdown)
    }

    pub fn analyze(&self, facts: &FinancialFacts) -> CreditAssessment {
        let (credit_score, breakdown) = self.score(facts);
        let dsr = facts.debt_service_ratio();
        let ltv = facts.loan_to_value();
        let risk_category = CreditRiskCategory::from_score(credit_score, &self.policy.categories);
        let advisories = advisories_for(credit_score, dsr, ltv, facts, &self.policy.advisories);

        CreditAssessment {
            credit_score,
            risk_category,
            dsr: round2(dsr),
            ltv: round2(ltv),
            facts: *facts,
            breakdown,
            recommendations: advisories
                .iter()
                .map(|advisory| advisory.message().to_string())
                .collect(),
        }
    }

    fn bounded(&self, raw: i32) -> u16 {
        let floor = i32::from(self.policy.min_score);
        let ceiling = i32::from(self.policy.max_score);
        let clamped = raw.max(floor).min(ceiling).max(0);
        u16::try_from(clamped).unwrap_or(self.policy.max_score)
    }
}

/// Factors contributing to the credit score, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Dsr,
    Employment,
    Income,
    Ltv,
    Savings,
}

/// Qualitative reading attached to a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Excellent,
    Strong,
    High,
    Good,
    Moderate,
    Fair,
    Limited,
    Low,
    Poor,
    #[serde(rename = "High Risk")]
    HighRisk,
    Neutral,
    Unknown,
}

/// Input value a factor was scored on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FactorValue {
    Percent(f64),
    Years(u32),
    Currency(u64),
    Months(f64),
    Unknown,
}

impl fmt::Display for FactorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorValue::Percent(value) => write!(f, "{value:.1}%"),
            FactorValue::Years(years) => write!(f, "{years} years"),
            FactorValue::Currency(amount) => write!(f, "RM {}", group_thousands(*amount)),
            FactorValue::Months(months) => write!(f, "{months:.1} months"),
            FactorValue::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Discrete contribution to the credit score, kept for audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub raw_value: FactorValue,
    pub points: i16,
    pub impact: Impact,
}

impl FactorScore {
    fn unknown(impact: Impact) -> Self {
        Self {
            raw_value: FactorValue::Unknown,
            points: 0,
            impact,
        }
    }
}

/// Ordered factor → contribution map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBreakdown(BTreeMap<ScoreFactor, FactorScore>);

impl ScoreBreakdown {
    fn insert(&mut self, factor: ScoreFactor, score: FactorScore) {
        self.0.insert(factor, score);
    }

    pub fn get(&self, factor: ScoreFactor) -> Option<&FactorScore> {
        self.0.get(&factor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScoreFactor, &FactorScore)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_points(&self) -> i32 {
        self.0.values().map(|score| i32::from(score.points)).sum()
    }
}

/// Full deterministic credit assessment for one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub credit_score: u16,
    pub risk_category: CreditRiskCategory,
    pub dsr: f64,
    pub ltv: f64,
    pub facts: FinancialFacts,
    pub breakdown: ScoreBreakdown,
    pub recommendations: Vec<String>,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
