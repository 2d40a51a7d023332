use std::sync::Arc;
use std::time::Duration;

use super::common::*;
use crate::assessment::adapters::{
    build_prompt, document_snippet, parse_structured, AssessorError, CompletionClient,
    CompletionError, CompletionRequest, ConfiguredAssessor, FreeTextAssessor,
    HttpCompletionClient, QualitativeAssessor, QualitativeFormat, StructuredAssessor,
};
use crate::assessment::domain::{
    ApplicationContext, BankingSystem, CustomerType, DataQuality, FindingStatus, LoanType,
    RiskLevel,
};

const STRUCTURED_REPLY: &str = r#"{
  "risk_analysis": {
    "risk_category": "MEDIUM RISK",
    "risk_level": "Low Risk",
    "ai_confidence": 82.5
  },
  "executive_summary": "Stable salaried applicant with moderate leverage.",
  "findings": [
    {"category": "INCOME", "title": "Consistent payslips", "description": "Six months at RM 12,500", "status": "positive"},
    {"category": "DEBT", "title": "Two car loans", "description": "Combined RM 2,000 monthly", "status": "warning"},
    {"category": "NOISE", "description": "missing a title"}
  ],
  "recommendation": "Approve at standard terms."
}"#;

#[test]
fn structured_reply_prefers_risk_level() {
    let assessment = parse_structured(STRUCTURED_REPLY).expect("parses");

    assert_eq!(assessment.label, "Low Risk");
    assert_eq!(assessment.risk_level, Some(RiskLevel::Low));
    assert_eq!(assessment.confidence, Some(82.5));
    assert_eq!(assessment.data_quality, DataQuality::Good);
    assert_eq!(
        assessment.recommendation.as_deref(),
        Some("Approve at standard terms.")
    );
    assert_eq!(assessment.findings.len(), 2);
    assert_eq!(assessment.findings[0].status, FindingStatus::Positive);
    assert_eq!(assessment.findings[1].status, FindingStatus::Warning);
}

#[test]
fn structured_reply_falls_back_to_category_then_top_level() {
    let reply = r#"{"risk_analysis": {"risk_category": "HIGH RISK", "ai_confidence": "64%"}}"#;
    let assessment = parse_structured(reply).expect("parses");
    assert_eq!(assessment.risk_level, Some(RiskLevel::High));
    assert_eq!(assessment.confidence, Some(64.0));

    let reply = r#"{"risk_level": "MEDIUM_HIGH"}"#;
    let assessment = parse_structured(reply).expect("parses");
    assert_eq!(assessment.risk_level, Some(RiskLevel::MediumHigh));
}

#[test]
fn structured_reply_accepts_code_fences() {
    let reply = "```json\n{\"risk_level\": \"moderate\"}\n```";
    let assessment = parse_structured(reply).expect("parses");
    assert_eq!(assessment.risk_level, Some(RiskLevel::Medium));
}

#[test]
fn structured_reply_without_label_is_malformed() {
    for reply in ["not json", "{}", r#"{"risk_analysis": {"risk_level": ""}}"#] {
        assert!(
            matches!(parse_structured(reply), Err(AssessorError::Malformed(_))),
            "{reply}"
        );
    }
}

#[test]
fn unrecognised_label_is_kept_verbatim() {
    let assessment = parse_structured(r#"{"risk_level": "Needs committee"}"#).expect("parses");
    assert_eq!(assessment.label, "Needs committee");
    assert_eq!(assessment.risk_level, None);
}

#[tokio::test]
async fn free_text_reply_reads_labelled_lines() {
    let reply = "RISK_LEVEL: Medium Risk\n\
                 EXECUTIVE_SUMMARY: Income is steady but commitments are high.\n\
                 Savings cover two months.\n\
                 RECOMMENDATION: REVIEW\n\
                 RECOMMENDATION_TEXT: Verify the car loan statements.";
    let client = Arc::new(CannedCompletion::new(reply));
    let assessor = FreeTextAssessor::new(client.clone());

    let assessment = assessor
        .assess("Monthly Income: RM 5,000", &ApplicationContext::default())
        .await
        .expect("assessment");

    assert_eq!(assessment.risk_level, Some(RiskLevel::Medium));
    assert_eq!(
        assessment.executive_summary.as_deref(),
        Some("Income is steady but commitments are high.\nSavings cover two months.")
    );
    assert_eq!(assessment.recommendation.as_deref(), Some("REVIEW"));

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].json_mode);
    assert!(requests[0].prompt.contains("RISK_LEVEL:"));
}

#[tokio::test]
async fn free_text_reply_without_risk_level_is_malformed() {
    let client = Arc::new(CannedCompletion::new("I cannot assess this document."));
    let assessor = FreeTextAssessor::new(client);

    let result = assessor
        .assess("Monthly Income: RM 5,000", &ApplicationContext::default())
        .await;
    assert!(matches!(result, Err(AssessorError::Malformed(_))));
}

#[tokio::test]
async fn configured_assessor_dispatches_on_format() {
    let client = Arc::new(CannedCompletion::new(STRUCTURED_REPLY));
    let assessor = ConfiguredAssessor::new(QualitativeFormat::Structured, client.clone());
    assert_eq!(assessor.format(), QualitativeFormat::Structured);

    let assessment = assessor
        .assess("Monthly Income: RM 12,500", &ApplicationContext::default())
        .await
        .expect("assessment");
    assert_eq!(assessment.risk_level, Some(RiskLevel::Low));
    assert!(client.requests()[0].json_mode);

    let client = Arc::new(CannedCompletion::new("RISK_LEVEL: High Risk"));
    let assessor = ConfiguredAssessor::new(QualitativeFormat::FreeText, client);
    let assessment = assessor
        .assess("Monthly Income: RM 900", &ApplicationContext::default())
        .await
        .expect("assessment");
    assert_eq!(assessment.risk_level, Some(RiskLevel::High));
}

#[tokio::test]
async fn structured_assessor_passes_context_into_prompt() {
    let client = Arc::new(CannedCompletion::new(STRUCTURED_REPLY));
    let assessor = StructuredAssessor::new(client.clone());
    let context = ApplicationContext {
        banking_system: BankingSystem::Islamic,
        loan_type: LoanType::Car,
        customer_type: CustomerType::SmallBusiness,
    };

    assessor
        .assess("Business revenue RM 40,000", &context)
        .await
        .expect("assessment");

    let prompt = &client.requests()[0].prompt;
    assert!(prompt.contains("Islamic Banking (Shariah-compliant)"));
    assert!(prompt.contains("Car Loan/Financing"));
    assert!(prompt.contains("Small Business Owner"));
    assert!(prompt.contains("Business revenue RM 40,000"));
}

#[tokio::test]
async fn http_client_without_key_is_not_configured() {
    let client = HttpCompletionClient::new(
        "http://127.0.0.1:9/v1/chat/completions",
        "gpt-4o",
        Some("   ".to_string()),
        Duration::from_secs(1),
    )
    .expect("client builds");
    assert!(!client.is_configured());

    let request = CompletionRequest {
        system: "system".to_string(),
        prompt: "prompt".to_string(),
        json_mode: true,
    };
    assert!(matches!(
        client.complete(&request).await,
        Err(CompletionError::NotConfigured)
    ));
}

#[test]
fn long_documents_keep_head_and_tail() {
    let document = format!("{}{}{}", "A".repeat(7_000), "B".repeat(1_000), "C".repeat(7_000));
    let snippet = document_snippet(&document);

    assert!(snippet.starts_with(&"A".repeat(6_000)));
    assert!(snippet.ends_with(&"C".repeat(6_000)));
    assert!(!snippet.contains('B'));
    assert!(snippet.contains("[... Content truncated for length ...]"));

    let short = "A".repeat(12_000);
    assert_eq!(document_snippet(&short), short);
    assert_eq!(document_snippet("  "), "[NO DOCUMENT TEXT PROVIDED]");
}

#[test]
fn conventional_prompt_uses_interest_terminology() {
    let prompt = build_prompt(
        "Monthly Income: RM 5,000",
        &ApplicationContext::default(),
        QualitativeFormat::Structured,
    );
    assert!(prompt.contains("Conventional Banking"));
    assert!(prompt.contains("interest-based"));
    assert!(prompt.contains("\"risk_analysis\""));
}

#[test]
fn qualitative_format_parses_aliases() {
    assert_eq!("json".parse::<QualitativeFormat>(), Ok(QualitativeFormat::Structured));
    assert_eq!("free-text".parse::<QualitativeFormat>(), Ok(QualitativeFormat::FreeText));
    assert!("xml".parse::<QualitativeFormat>().is_err());
}
