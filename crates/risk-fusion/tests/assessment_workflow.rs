use std::sync::Arc;
use std::time::Duration;

use risk_fusion::assessment::adapters::DEFAULT_ENDPOINT;
use risk_fusion::assessment::{
    ApplicationContext, AssessmentRequest, ConfiguredAssessor, DataQuality, DocumentText,
    HttpCompletionClient, LogisticClassifier, QualitativeFormat, RiskAssessmentService, RiskLevel,
    RiskPolicy,
};

const PAYSLIP: &str = "\
Employee Name: Farid Hakim
Address: 8 Jalan Tun Razak, Kuala Lumpur
Monthly Salary: RM 9,800
Employment: 6 years with the company";

const COMMITMENTS: &str = "\
Car loan repayment RM 1,150 per month
PTPTN loan RM 300 monthly
Property Value: RM 520,000
Loan Amount: RM 440,000
Savings balance RM 35,000";

fn service_without_llm(
    policy: RiskPolicy,
) -> RiskAssessmentService<LogisticClassifier, ConfiguredAssessor<HttpCompletionClient>> {
    let client = HttpCompletionClient::new(DEFAULT_ENDPOINT, "gpt-4o", None, Duration::from_secs(1))
        .expect("client builds");
    let assessor = ConfiguredAssessor::new(QualitativeFormat::Structured, Arc::new(client));

    RiskAssessmentService::new(
        Arc::new(LogisticClassifier::default()),
        Arc::new(assessor),
        policy,
    )
    .with_reference_year(2025)
}

fn documents() -> Vec<DocumentText> {
    vec![
        DocumentText {
            name: "payslip.txt".to_string(),
            text: PAYSLIP.to_string(),
        },
        DocumentText {
            name: "commitments.txt".to_string(),
            text: COMMITMENTS.to_string(),
        },
    ]
}

#[tokio::test]
async fn unconfigured_llm_degrades_to_conservative_qualitative_signal() {
    let service = service_without_llm(RiskPolicy::default());

    let report = service
        .assess(AssessmentRequest::from_documents(
            documents(),
            ApplicationContext::default(),
        ))
        .await
        .expect("assessment succeeds");

    assert_eq!(report.facts.monthly_income, 9_800);
    assert_eq!(report.facts.monthly_debt, 1_450);
    assert_eq!(report.facts.employment_years, 6);
    assert_eq!(report.facts.loan_amount, 440_000);

    assert!((300..=850).contains(&report.credit.credit_score));
    assert_eq!(report.classifier.data_quality, DataQuality::Good);
    assert!((0.0..=100.0).contains(&report.classifier.approval_probability));

    assert_eq!(report.qualitative.risk_level, Some(RiskLevel::Medium));
    assert_eq!(report.qualitative.data_quality, DataQuality::Insufficient);

    let expected = 0.7 * report.classifier.approval_probability + 0.3 * 55.0;
    assert!((report.decision.fused_probability - expected).abs() < 0.01);
}

#[tokio::test]
async fn policy_file_overrides_thresholds() {
    let policy = RiskPolicy::from_json(
        r#"{"fusion": {"classifier_weight": 0.0, "qualitative_weight": 1.0,
            "agreement_tolerance": 20.0,
            "proxies": {"low": 85.0, "low_medium": 70.0, "medium": 55.0,
                        "medium_high": 40.0, "high": 20.0, "unknown": 50.0},
            "tiers": {"low": 75.0, "low_medium": 60.0, "medium": 45.0, "medium_high": 30.0}}}"#,
    )
    .expect("policy parses");
    assert_eq!(policy.scoring, RiskPolicy::default().scoring);

    let service = service_without_llm(policy);
    let report = service
        .assess(AssessmentRequest::from_text(
            format!("{PAYSLIP}\n{COMMITMENTS}"),
            ApplicationContext::default(),
        ))
        .await
        .expect("assessment succeeds");

    assert_eq!(report.decision.fused_probability, 55.0);
    assert_eq!(report.decision.fused_risk_tier, RiskLevel::Medium);
}

#[tokio::test]
async fn policy_json_round_trips() {
    let policy = RiskPolicy::default();
    let json = policy.to_json_pretty().expect("serialize");
    assert_eq!(RiskPolicy::from_json(&json).expect("parse"), policy);
}
