//! Multi-signal loan risk assessment.
//!
//! Four independent paths read the same document text: regex fact extraction feeding a
//! deterministic credit score, heuristic fraud checks, an approval classifier and a
//! qualitative model opinion. The last two are fused into a single decision; the
//! deterministic outputs travel alongside it for audit.

pub mod adapters;
pub mod domain;
pub mod extraction;
pub mod fraud;
pub mod fusion;
pub mod policy;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use adapters::{
    ApprovalClassifier, AssessorError, ClassifierError, ClassifierFeatures, CompletionClient,
    CompletionError, ConfiguredAssessor, HttpCompletionClient, LogisticClassifier,
    QualitativeAssessor, QualitativeFormat,
};
pub use domain::{
    combine_documents, ApplicationContext, BankingSystem, ClassifierPrediction, CustomerType,
    DataQuality, DocumentText, FinancialFacts, LoanType, QualitativeAssessment, RiskLevel,
};
pub use extraction::FeatureExtractor;
pub use fraud::{DocumentQuality, FraudDetector, FraudReport, FraudRiskLevel, FraudSignal};
pub use fusion::{FusedDecision, FusionEngine, FusionPolicy};
pub use policy::{PolicyError, RiskPolicy};
pub use router::assessment_router;
pub use scoring::{CreditAssessment, CreditScorer, ScoreBreakdown, ScoringPolicy};
pub use service::{AssessmentError, AssessmentReport, AssessmentRequest, RiskAssessmentService};
