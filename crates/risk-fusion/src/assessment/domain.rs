use std::fmt;

use serde::{Deserialize, Serialize};

/// Financial facts pulled from the combined application text. Zero means the value was not
/// found, so downstream scorers treat it as unknown rather than as a literal zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinancialFacts {
    pub monthly_income: u64,
    pub monthly_debt: u64,
    pub employment_years: u32,
    pub property_value: u64,
    pub loan_amount: u64,
    pub savings: u64,
    pub age: u32,
}

impl FinancialFacts {
    /// Debt service ratio as a percentage; 0 when income is unknown.
    pub fn debt_service_ratio(&self) -> f64 {
        percentage(self.monthly_debt, self.monthly_income)
    }

    /// Loan-to-value ratio as a percentage; 0 when the property value is unknown.
    pub fn loan_to_value(&self) -> f64 {
        percentage(self.loan_amount, self.property_value)
    }

    /// Months of income covered by savings, or `None` when income is unknown.
    pub fn savings_months(&self) -> Option<f64> {
        if self.monthly_income == 0 {
            return None;
        }
        Some(self.savings as f64 / self.monthly_income as f64)
    }

    pub fn annual_income(&self) -> u64 {
        self.monthly_income.saturating_mul(12)
    }
}

fn percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator as f64 * 100.0) / denominator as f64
}

/// Five-step risk scale shared by the qualitative assessor and the fused decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "LOW-MEDIUM")]
    LowMedium,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "MEDIUM-HIGH")]
    MediumHigh,
    #[serde(rename = "HIGH")]
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Low,
        RiskLevel::LowMedium,
        RiskLevel::Medium,
        RiskLevel::MediumHigh,
        RiskLevel::High,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::LowMedium => "LOW-MEDIUM",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::MediumHigh => "MEDIUM-HIGH",
            RiskLevel::High => "HIGH",
        }
    }

    /// Normalise the loose labels produced by model output ("Low Risk", "MEDIUM_HIGH",
    /// "moderate") into a level. Unrecognised labels yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        let stripped = upper.trim_end_matches('.').trim();
        let stripped = stripped.strip_suffix("RISK").unwrap_or(stripped).trim();
        let normalized: String = stripped
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-' || c == '/')
            .filter(|part| !part.is_empty() && *part != "TO")
            .collect::<Vec<_>>()
            .join("-");

        match normalized.as_str() {
            "LOW" | "VERY-LOW" => Some(RiskLevel::Low),
            "LOW-MEDIUM" | "MEDIUM-LOW" | "LOW-MODERATE" | "MODERATE-LOW" => {
                Some(RiskLevel::LowMedium)
            }
            "MEDIUM" | "MODERATE" => Some(RiskLevel::Medium),
            "MEDIUM-HIGH" | "HIGH-MEDIUM" | "MODERATE-HIGH" => Some(RiskLevel::MediumHigh),
            "HIGH" | "VERY-HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How much usable input backed an adapter result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQuality {
    Good,
    Limited,
    Insufficient,
}

pub const FALLBACK_APPROVAL_PROBABILITY: f64 = 50.0;
pub const FALLBACK_CONFIDENCE: f64 = 30.0;

/// Output contract of the approval classifier adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierPrediction {
    pub approval_probability: f64,
    pub risk_tier: RiskLevel,
    pub confidence: f64,
    pub data_quality: DataQuality,
}

impl ClassifierPrediction {
    /// Conservative stand-in used whenever the classifier cannot produce a real prediction.
    pub fn fallback() -> Self {
        Self {
            approval_probability: FALLBACK_APPROVAL_PROBABILITY,
            risk_tier: RiskLevel::Medium,
            confidence: FALLBACK_CONFIDENCE,
            data_quality: DataQuality::Insufficient,
        }
    }
}

/// Finding surfaced by a qualitative assessor, kept for presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitativeFinding {
    pub category: String,
    pub title: String,
    pub description: String,
    pub status: FindingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    Positive,
    Warning,
}

/// Output contract of the qualitative assessor adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitativeAssessment {
    /// Label exactly as the assessor produced it.
    pub label: String,
    /// Recognised level, `None` when the label is outside the five-step scale.
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<QualitativeFinding>,
    pub data_quality: DataQuality,
}

impl QualitativeAssessment {
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let risk_level = RiskLevel::parse(&label);
        Self {
            label,
            risk_level,
            confidence: None,
            executive_summary: None,
            recommendation: None,
            findings: Vec::new(),
            data_quality: DataQuality::Good,
        }
    }

    pub fn fallback() -> Self {
        Self {
            label: RiskLevel::Medium.label().to_string(),
            risk_level: Some(RiskLevel::Medium),
            confidence: Some(FALLBACK_CONFIDENCE),
            executive_summary: None,
            recommendation: None,
            findings: Vec::new(),
            data_quality: DataQuality::Insufficient,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BankingSystem {
    #[default]
    Conventional,
    Islamic,
}

impl BankingSystem {
    pub const fn readable(self) -> &'static str {
        match self {
            BankingSystem::Conventional => "Conventional Banking (interest-based)",
            BankingSystem::Islamic => "Islamic Banking (Shariah-compliant)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanType {
    #[default]
    Home,
    Car,
    Personal,
    Business,
}

impl LoanType {
    pub const fn readable(self) -> &'static str {
        match self {
            LoanType::Home => "Home Loan/Financing",
            LoanType::Car => "Car Loan/Financing",
            LoanType::Personal => "Personal Loan/Financing",
            LoanType::Business => "Business Loan/Financing",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustomerType {
    #[default]
    Salaried,
    Rental,
    SmallBusiness,
    LargeBusiness,
}

impl CustomerType {
    pub const fn readable(self) -> &'static str {
        match self {
            CustomerType::Salaried => "Salaried Employee",
            CustomerType::Rental => "Rental Income",
            CustomerType::SmallBusiness => "Small Business Owner",
            CustomerType::LargeBusiness => "Large Enterprise",
        }
    }
}

/// Loan and customer context passed to the qualitative assessor alongside the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationContext {
    #[serde(default)]
    pub banking_system: BankingSystem,
    #[serde(default)]
    pub loan_type: LoanType,
    #[serde(default)]
    pub customer_type: CustomerType,
}

/// One uploaded document after upstream text extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    pub name: String,
    pub text: String,
}

/// Join per-document text into the single body every scorer reads.
pub fn combine_documents(documents: &[DocumentText]) -> String {
    documents
        .iter()
        .filter(|document| !document.text.trim().is_empty())
        .map(|document| format!("=== DOCUMENT: {} ===\n{}", document.name, document.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
