use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::adapters::{ApprovalClassifier, ClassifierFeatures, QualitativeAssessor};
use super::domain::{
    combine_documents, ApplicationContext, ClassifierPrediction, DocumentText, FinancialFacts,
    QualitativeAssessment,
};
use super::extraction::FeatureExtractor;
use super::fraud::{DocumentQuality, FraudDetector, FraudReport};
use super::fusion::{FusedDecision, FusionEngine};
use super::policy::RiskPolicy;
use super::scoring::{CreditAssessment, CreditScorer};

pub const DEFAULT_QUALITATIVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Inbound assessment: either named documents or a single pre-combined body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub documents: Vec<DocumentText>,
    #[serde(default)]
    pub document_text: Option<String>,
    #[serde(flatten)]
    pub context: ApplicationContext,
}

impl AssessmentRequest {
    pub fn from_text(text: impl Into<String>, context: ApplicationContext) -> Self {
        Self {
            documents: Vec::new(),
            document_text: Some(text.into()),
            context,
        }
    }

    pub fn from_documents(documents: Vec<DocumentText>, context: ApplicationContext) -> Self {
        Self {
            documents,
            document_text: None,
            context,
        }
    }

    /// Text every scorer reads; named documents take precedence over `document_text`.
    pub fn combined_text(&self) -> String {
        if self.documents.is_empty() {
            self.document_text.clone().unwrap_or_default()
        } else {
            combine_documents(&self.documents)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub assessed_at: DateTime<Utc>,
    pub context: ApplicationContext,
    pub facts: FinancialFacts,
    pub credit: CreditAssessment,
    pub fraud: FraudReport,
    pub document_quality: DocumentQuality,
    pub classifier: ClassifierPrediction,
    pub qualitative: QualitativeAssessment,
    pub decision: FusedDecision,
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("document text is empty")]
    EmptyDocument,
}

struct DeterministicSignals {
    facts: FinancialFacts,
    credit: CreditAssessment,
    fraud: FraudReport,
    document_quality: DocumentQuality,
    classifier: ClassifierPrediction,
}

/// Service running the four scoring paths over one application and fusing the result.
pub struct RiskAssessmentService<C, Q> {
    extractor: FeatureExtractor,
    scorer: CreditScorer,
    fraud: FraudDetector,
    fusion: FusionEngine,
    classifier: Arc<C>,
    assessor: Arc<Q>,
    qualitative_timeout: Duration,
}

impl<C, Q> RiskAssessmentService<C, Q>
where
    C: ApprovalClassifier + 'static,
    Q: QualitativeAssessor + 'static,
{
    pub fn new(classifier: Arc<C>, assessor: Arc<Q>, policy: RiskPolicy) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            scorer: CreditScorer::new(policy.scoring),
            fraud: FraudDetector::new(),
            fusion: FusionEngine::new(policy.fusion),
            classifier,
            assessor,
            qualitative_timeout: DEFAULT_QUALITATIVE_TIMEOUT,
        }
    }

    pub fn with_qualitative_timeout(mut self, timeout: Duration) -> Self {
        self.qualitative_timeout = timeout;
        self
    }

    /// Pin date-sensitive checks (birth years, future dates) to a fixed year.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.extractor = FeatureExtractor::with_reference_year(year);
        self.fraud = FraudDetector::with_reference_year(year);
        self
    }

    pub fn policy(&self) -> RiskPolicy {
        RiskPolicy {
            scoring: self.scorer.policy().clone(),
            fusion: *self.fusion.policy(),
        }
    }

    pub async fn assess(
        &self,
        request: AssessmentRequest,
    ) -> Result<AssessmentReport, AssessmentError> {
        let text = request.combined_text();
        if text.trim().is_empty() {
            return Err(AssessmentError::EmptyDocument);
        }
        let context = request.context;

        let (qualitative, signals) = tokio::join!(self.qualitative(&text, &context), async {
            self.deterministic(&text)
        });

        let decision = self.fusion.fuse(&signals.classifier, &qualitative);

        info!(
            credit_score = signals.credit.credit_score,
            fraud_score = signals.fraud.fraud_score,
            fused_probability = decision.fused_probability,
            fused_tier = %decision.fused_risk_tier,
            model_agreement = decision.model_agreement,
            "assessment completed"
        );

        Ok(AssessmentReport {
            assessed_at: Utc::now(),
            context,
            facts: signals.facts,
            credit: signals.credit,
            fraud: signals.fraud,
            document_quality: signals.document_quality,
            classifier: signals.classifier,
            qualitative,
            decision,
        })
    }

    fn deterministic(&self, text: &str) -> DeterministicSignals {
        let facts = self.extractor.extract(text);
        let credit = self.scorer.analyze(&facts);
        let fraud = self.fraud.detect(text);
        let document_quality = self.fraud.assess_quality(text);
        let classifier = self.classify(&facts);

        DeterministicSignals {
            facts,
            credit,
            fraud,
            document_quality,
            classifier,
        }
    }

    fn classify(&self, facts: &FinancialFacts) -> ClassifierPrediction {
        let features = ClassifierFeatures::from_facts(facts);
        if !features.is_sufficient() {
            return ClassifierPrediction::fallback();
        }

        match self.classifier.predict(&features) {
            Ok(prediction) => prediction,
            Err(error) => {
                warn!(error = %error, "classifier failed, using conservative fallback");
                ClassifierPrediction::fallback()
            }
        }
    }

    async fn qualitative(&self, text: &str, context: &ApplicationContext) -> QualitativeAssessment {
        match tokio::time::timeout(self.qualitative_timeout, self.assessor.assess(text, context)).await
        {
            Ok(Ok(assessment)) => assessment,
            Ok(Err(error)) => {
                warn!(error = %error, "qualitative assessment failed, using conservative fallback");
                QualitativeAssessment::fallback()
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.qualitative_timeout.as_secs_f64(),
                    "qualitative assessment timed out, using conservative fallback"
                );
                QualitativeAssessment::fallback()
            }
        }
    }
}
