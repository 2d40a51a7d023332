use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::super::domain::{
    ApplicationContext, BankingSystem, FindingStatus, QualitativeAssessment, QualitativeFinding,
};
use super::completion::{CompletionClient, CompletionError, CompletionRequest};

const TRUNCATE_ABOVE: usize = 12_000;
const KEEP_EACH_END: usize = 6_000;
const TRUNCATION_MARKER: &str = "\n\n[... Content truncated for length ...]\n\n";
const EMPTY_DOCUMENT: &str = "[NO DOCUMENT TEXT PROVIDED]";

const STRUCTURED_SYSTEM: &str =
    "You are an expert Malaysian credit risk analyst. Output structured JSON only.";
const FREE_TEXT_SYSTEM: &str =
    "You are an expert Malaysian credit risk analyst. Answer using the labelled sections requested.";

const STRUCTURED_FORMAT: &str = r#"Respond with a single JSON object:
{
  "risk_analysis": {
    "risk_level": "<LOW RISK | LOW-MEDIUM RISK | MEDIUM RISK | MEDIUM-HIGH RISK | HIGH RISK>",
    "ai_confidence": <float 0-100>
  },
  "executive_summary": "<2-3 sentence summary>",
  "findings": [
    {"category": "<CATEGORY>", "title": "<title>", "description": "<evidence>", "status": "<positive | warning>"}
  ],
  "recommendation": "<recommendation text>"
}
Provide 4-5 findings mixing positive and warning items. Output only the JSON object."#;

const FREE_TEXT_FORMAT: &str = "Respond using exactly these labelled lines:
RISK_LEVEL: <Low Risk | Medium Risk | High Risk>
EXECUTIVE_SUMMARY: <2-3 sentence summary>
RECOMMENDATION: <APPROVE | REVIEW | REJECT>";

/// Which reply shape the qualitative backend is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualitativeFormat {
    #[default]
    Structured,
    FreeText,
}

impl QualitativeFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            QualitativeFormat::Structured => "structured",
            QualitativeFormat::FreeText => "free_text",
        }
    }
}

impl fmt::Display for QualitativeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualitativeFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(QualitativeFormat::Structured),
            "free_text" | "free-text" | "text" => Ok(QualitativeFormat::FreeText),
            other => Err(format!("unknown qualitative format '{other}'")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessorError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error("malformed qualitative reply: {0}")]
    Malformed(String),
}

/// Qualitative risk opinion over the combined document text.
pub trait QualitativeAssessor: Send + Sync {
    fn assess(
        &self,
        document: &str,
        context: &ApplicationContext,
    ) -> impl Future<Output = Result<QualitativeAssessment, AssessorError>> + Send;
}

/// Build the user prompt: context labels, banking guidance, the (possibly truncated)
/// document and the reply format.
pub fn build_prompt(document: &str, context: &ApplicationContext, format: QualitativeFormat) -> String {
    let guidance = match context.banking_system {
        BankingSystem::Islamic => {
            "Use Malaysian banking practice and Bank Negara Malaysia guidelines. \
             The financing is Shariah-compliant: do not use the terms 'interest' or 'riba', \
             frame pricing as profit rate, and reference contracts such as Murabaha or Ijara."
        }
        BankingSystem::Conventional => {
            "Use Malaysian banking practice and Bank Negara Malaysia guidelines \
             with standard interest-based terminology."
        }
    };
    let reply_format = match format {
        QualitativeFormat::Structured => STRUCTURED_FORMAT,
        QualitativeFormat::FreeText => FREE_TEXT_FORMAT,
    };

    format!(
        "Assess the credit risk of this loan application.\n\n\
         CONTEXT:\n- Banking System: {}\n- Loan Type: {}\n- Customer Type: {}\n\n\
         {guidance}\n\n\
         DOCUMENTS TO ANALYZE:\n\"\"\"\n{}\n\"\"\"\n\n\
         {reply_format}",
        context.banking_system.readable(),
        context.loan_type.readable(),
        context.customer_type.readable(),
        document_snippet(document),
    )
}

/// Keep the head and tail of long documents so the prompt stays bounded.
pub fn document_snippet(document: &str) -> String {
    if document.trim().is_empty() {
        return EMPTY_DOCUMENT.to_string();
    }

    let length = document.chars().count();
    if length <= TRUNCATE_ABOVE {
        return document.to_string();
    }

    let head: String = document.chars().take(KEEP_EACH_END).collect();
    let tail: String = document.chars().skip(length - KEEP_EACH_END).collect();
    format!("{head}{TRUNCATION_MARKER}{tail}")
}

/// Assessor asking for a JSON object and reading `risk_analysis` from it.
pub struct StructuredAssessor<C> {
    client: Arc<C>,
}

impl<C: CompletionClient> StructuredAssessor<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

impl<C: CompletionClient> QualitativeAssessor for StructuredAssessor<C> {
    async fn assess(
        &self,
        document: &str,
        context: &ApplicationContext,
    ) -> Result<QualitativeAssessment, AssessorError> {
        let request = CompletionRequest {
            system: STRUCTURED_SYSTEM.to_string(),
            prompt: build_prompt(document, context, QualitativeFormat::Structured),
            json_mode: true,
        };
        let reply = self.client.complete(&request).await?;
        parse_structured(&reply)
    }
}

/// Read a JSON reply, taking the label from `risk_analysis.risk_level`, then
/// `risk_analysis.risk_category`, then a top-level `risk_level`.
pub fn parse_structured(reply: &str) -> Result<QualitativeAssessment, AssessorError> {
    let body = strip_code_fence(reply);
    let value: Value = serde_json::from_str(body)
        .map_err(|error| AssessorError::Malformed(error.to_string()))?;

    let analysis = value.get("risk_analysis");
    let label = analysis
        .and_then(|risk| text_field(risk, "risk_level"))
        .or_else(|| analysis.and_then(|risk| text_field(risk, "risk_category")))
        .or_else(|| text_field(&value, "risk_level"))
        .ok_or_else(|| AssessorError::Malformed("reply carries no risk level".to_string()))?;

    let mut assessment = QualitativeAssessment::from_label(label);
    assessment.confidence = analysis
        .and_then(|risk| risk.get("ai_confidence"))
        .and_then(number);
    assessment.executive_summary = text_field(&value, "executive_summary");
    assessment.recommendation = text_field(&value, "recommendation");
    assessment.findings = value
        .get("findings")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(finding).collect())
        .unwrap_or_default();

    Ok(assessment)
}

struct FreeTextPatterns {
    risk_level: Regex,
    summary: Regex,
    recommendation: Regex,
}

impl FreeTextPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            risk_level: Regex::new(r"(?im)^\s*RISK_LEVEL:\s*(.+?)\s*$")?,
            summary: Regex::new(
                r"(?is)EXECUTIVE_SUMMARY:\s*(.+?)\s*(?:\n\s*(?:FINDINGS|RECOMMENDATION)\w*:|\z)",
            )?,
            recommendation: Regex::new(r"(?im)^\s*RECOMMENDATION:\s*(.+?)\s*$")?,
        })
    }
}

/// Assessor reading `RISK_LEVEL:` style labelled lines.
pub struct FreeTextAssessor<C> {
    client: Arc<C>,
    patterns: Option<FreeTextPatterns>,
}

impl<C: CompletionClient> FreeTextAssessor<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            patterns: FreeTextPatterns::compile().ok(),
        }
    }

    pub fn parse(&self, reply: &str) -> Result<QualitativeAssessment, AssessorError> {
        let patterns = self
            .patterns
            .as_ref()
            .ok_or_else(|| AssessorError::Malformed("reply patterns unavailable".to_string()))?;

        let capture = |regex: &Regex| {
            regex
                .captures(reply)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|text| !text.is_empty())
        };

        let label = capture(&patterns.risk_level)
            .ok_or_else(|| AssessorError::Malformed("reply has no RISK_LEVEL line".to_string()))?;

        let mut assessment = QualitativeAssessment::from_label(label);
        assessment.executive_summary = capture(&patterns.summary);
        assessment.recommendation = capture(&patterns.recommendation);
        Ok(assessment)
    }
}

impl<C: CompletionClient> QualitativeAssessor for FreeTextAssessor<C> {
    async fn assess(
        &self,
        document: &str,
        context: &ApplicationContext,
    ) -> Result<QualitativeAssessment, AssessorError> {
        let request = CompletionRequest {
            system: FREE_TEXT_SYSTEM.to_string(),
            prompt: build_prompt(document, context, QualitativeFormat::FreeText),
            json_mode: false,
        };
        let reply = self.client.complete(&request).await?;
        self.parse(&reply)
    }
}

/// Assessor chosen at start-up from [`QualitativeFormat`].
pub enum ConfiguredAssessor<C> {
    Structured(StructuredAssessor<C>),
    FreeText(FreeTextAssessor<C>),
}

impl<C: CompletionClient> ConfiguredAssessor<C> {
    pub fn new(format: QualitativeFormat, client: Arc<C>) -> Self {
        match format {
            QualitativeFormat::Structured => {
                ConfiguredAssessor::Structured(StructuredAssessor::new(client))
            }
            QualitativeFormat::FreeText => ConfiguredAssessor::FreeText(FreeTextAssessor::new(client)),
        }
    }

    pub fn format(&self) -> QualitativeFormat {
        match self {
            ConfiguredAssessor::Structured(_) => QualitativeFormat::Structured,
            ConfiguredAssessor::FreeText(_) => QualitativeFormat::FreeText,
        }
    }
}

impl<C: CompletionClient> QualitativeAssessor for ConfiguredAssessor<C> {
    async fn assess(
        &self,
        document: &str,
        context: &ApplicationContext,
    ) -> Result<QualitativeAssessment, AssessorError> {
        match self {
            ConfiguredAssessor::Structured(assessor) => assessor.assess(document, context).await,
            ConfiguredAssessor::FreeText(assessor) => assessor.assess(document, context).await,
        }
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

fn finding(value: &Value) -> Option<QualitativeFinding> {
    let title = text_field(value, "title")?;
    let status = match text_field(value, "status").as_deref() {
        Some(status) if status.eq_ignore_ascii_case("positive") => FindingStatus::Positive,
        _ => FindingStatus::Warning,
    };
    Some(QualitativeFinding {
        category: text_field(value, "category").unwrap_or_else(|| "GENERAL".to_string()),
        title,
        description: text_field(value, "description").unwrap_or_default(),
        status,
    })
}
