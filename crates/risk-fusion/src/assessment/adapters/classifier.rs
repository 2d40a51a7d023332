use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::super::domain::{ClassifierPrediction, DataQuality, FinancialFacts, RiskLevel};
use super::super::scoring::round2;

/// Inputs the approval classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierFeatures {
    pub annual_income: u64,
    pub credit_score: u16,
    pub loan_amount: u64,
    pub dti_ratio: f64,
    pub employed: bool,
}

impl ClassifierFeatures {
    pub fn from_facts(facts: &FinancialFacts) -> Self {
        let dti_ratio = facts.debt_service_ratio();
        Self {
            annual_income: facts.annual_income(),
            credit_score: credit_score_proxy(dti_ratio),
            loan_amount: facts.loan_amount,
            dti_ratio,
            employed: facts.employment_years > 0,
        }
    }

    /// The classifier is only meaningful once both income and the requested amount are known.
    pub fn is_sufficient(&self) -> bool {
        self.annual_income > 0 && self.loan_amount > 0
    }
}

/// Stand-in bureau score derived from DSR, since documents rarely carry one.
pub fn credit_score_proxy(dti_ratio: f64) -> u16 {
    if dti_ratio == 0.0 {
        650
    } else if dti_ratio <= 20.0 {
        750
    } else if dti_ratio <= 35.0 {
        700
    } else if dti_ratio <= 50.0 {
        650
    } else if dti_ratio <= 70.0 {
        600
    } else {
        550
    }
}

/// Approval-probability model consulted by the assessment service.
pub trait ApprovalClassifier: Send + Sync {
    fn predict(&self, features: &ClassifierFeatures) -> Result<ClassifierPrediction, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier needs a non-zero income and loan amount")]
    InsufficientData,
    #[error("classifier produced a non-finite score")]
    NonFinite,
    #[error("failed to read classifier model: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse classifier model: {0}")]
    Model(#[from] serde_json::Error),
}

/// Coefficients over scaled features; credit score is centred on 650.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticCoefficients {
    pub intercept: f64,
    pub per_10k_annual_income: f64,
    pub per_100_credit_points: f64,
    pub per_100k_loan: f64,
    pub per_10_dti_points: f64,
    pub employed: f64,
}

impl Default for LogisticCoefficients {
    fn default() -> Self {
        Self {
            intercept: 0.0,
            per_10k_annual_income: 0.08,
            per_100_credit_points: 1.2,
            per_100k_loan: -0.15,
            per_10_dti_points: -0.35,
            employed: 0.9,
        }
    }
}

/// Logistic-regression approval model.
#[derive(Debug, Clone, Default)]
pub struct LogisticClassifier {
    coefficients: LogisticCoefficients,
}

impl LogisticClassifier {
    pub fn new(coefficients: LogisticCoefficients) -> Self {
        Self { coefficients }
    }

    /// Load coefficients from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let raw = fs::read_to_string(path)?;
        let coefficients = serde_json::from_str(&raw)?;
        Ok(Self::new(coefficients))
    }

    pub fn coefficients(&self) -> &LogisticCoefficients {
        &self.coefficients
    }

    fn logit(&self, features: &ClassifierFeatures) -> f64 {
        let c = &self.coefficients;
        let employed = if features.employed { 1.0 } else { 0.0 };
        c.intercept
            + c.per_10k_annual_income * (features.annual_income as f64 / 10_000.0)
            + c.per_100_credit_points * ((f64::from(features.credit_score) - 650.0) / 100.0)
            + c.per_100k_loan * (features.loan_amount as f64 / 100_000.0)
            + c.per_10_dti_points * (features.dti_ratio / 10.0)
            + c.employed * employed
    }
}

impl ApprovalClassifier for LogisticClassifier {
    fn predict(&self, features: &ClassifierFeatures) -> Result<ClassifierPrediction, ClassifierError> {
        if !features.is_sufficient() {
            return Err(ClassifierError::InsufficientData);
        }

        let z = self.logit(features);
        if !z.is_finite() {
            return Err(ClassifierError::NonFinite);
        }

        let approval = 1.0 / (1.0 + (-z).exp());
        let approval_probability = round2(approval * 100.0);
        let risk_tier = if approval_probability >= 70.0 {
            RiskLevel::Low
        } else if approval_probability >= 50.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };

        Ok(ClassifierPrediction {
            approval_probability,
            risk_tier,
            confidence: round2(approval.max(1.0 - approval) * 100.0),
            data_quality: DataQuality::Good,
        })
    }
}
