use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::assessment::adapters::{
    ApprovalClassifier, AssessorError, ClassifierError, ClassifierFeatures, CompletionClient,
    CompletionError, CompletionRequest, QualitativeAssessor,
};
use crate::assessment::domain::{
    ApplicationContext, ClassifierPrediction, DataQuality, QualitativeAssessment, RiskLevel,
};
use crate::assessment::policy::RiskPolicy;
use crate::assessment::service::RiskAssessmentService;

pub(super) const REFERENCE_YEAR: i32 = 2025;

/// Applicant pack whose figures land in known bands:
/// DSR 16%, 8 years employed, RM 12,500 income, LTV 80%, 7.2 months of savings.
pub(super) const STRONG_APPLICATION: &str = "\
Applicant Name: Aisyah binti Rahman
Address: 12 Jalan Ampang, Kuala Lumpur
Monthly Income: RM 12,500
Employment: 8 years with current employer
Car loan repayment RM 1,200 per month
Personal loan installment RM 800 monthly
Property Value: RM 600,000
Loan Amount: RM 480,000
Savings account balance RM 90,000";

pub(super) fn prediction(approval_probability: f64) -> ClassifierPrediction {
    ClassifierPrediction {
        approval_probability,
        risk_tier: if approval_probability >= 70.0 {
            RiskLevel::Low
        } else if approval_probability >= 50.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        },
        confidence: approval_probability.max(100.0 - approval_probability),
        data_quality: DataQuality::Good,
    }
}

pub(super) enum ClassifierBehaviour {
    Predict(f64),
    Fail,
}

pub(super) struct StubClassifier {
    behaviour: ClassifierBehaviour,
    calls: AtomicUsize,
}

impl StubClassifier {
    pub(super) fn predicting(probability: f64) -> Self {
        Self {
            behaviour: ClassifierBehaviour::Predict(probability),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            behaviour: ClassifierBehaviour::Fail,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ApprovalClassifier for StubClassifier {
    fn predict(
        &self,
        _features: &ClassifierFeatures,
    ) -> Result<ClassifierPrediction, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            ClassifierBehaviour::Predict(probability) => Ok(prediction(probability)),
            ClassifierBehaviour::Fail => Err(ClassifierError::NonFinite),
        }
    }
}

pub(super) enum AssessorBehaviour {
    Label(&'static str),
    Malformed,
    Unavailable,
    Hang(Duration),
}

pub(super) struct StubAssessor {
    behaviour: AssessorBehaviour,
    seen: Mutex<Vec<ApplicationContext>>,
}

impl StubAssessor {
    pub(super) fn new(behaviour: AssessorBehaviour) -> Self {
        Self {
            behaviour,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn labelled(label: &'static str) -> Self {
        Self::new(AssessorBehaviour::Label(label))
    }

    pub(super) fn seen(&self) -> Vec<ApplicationContext> {
        self.seen.lock().expect("assessor mutex poisoned").clone()
    }
}

impl QualitativeAssessor for StubAssessor {
    async fn assess(
        &self,
        _document: &str,
        context: &ApplicationContext,
    ) -> Result<QualitativeAssessment, AssessorError> {
        self.seen
            .lock()
            .expect("assessor mutex poisoned")
            .push(*context);

        match self.behaviour {
            AssessorBehaviour::Label(label) => Ok(QualitativeAssessment::from_label(label)),
            AssessorBehaviour::Malformed => Err(AssessorError::Malformed(
                "reply carries no risk level".to_string(),
            )),
            AssessorBehaviour::Unavailable => {
                Err(AssessorError::Completion(CompletionError::NotConfigured))
            }
            AssessorBehaviour::Hang(duration) => {
                tokio::time::sleep(duration).await;
                Ok(QualitativeAssessment::from_label("LOW RISK"))
            }
        }
    }
}

/// Completion backend replaying a canned reply and recording the prompts it saw.
pub(super) struct CannedCompletion {
    reply: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl CannedCompletion {
    pub(super) fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("completion mutex poisoned").clone()
    }
}

impl CompletionClient for CannedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests
            .lock()
            .expect("completion mutex poisoned")
            .push(request.clone());
        Ok(self.reply.clone())
    }
}

pub(super) fn build_service(
    classifier: StubClassifier,
    assessor: StubAssessor,
) -> (
    RiskAssessmentService<StubClassifier, StubAssessor>,
    Arc<StubClassifier>,
    Arc<StubAssessor>,
) {
    let classifier = Arc::new(classifier);
    let assessor = Arc::new(assessor);
    let service =
        RiskAssessmentService::new(classifier.clone(), assessor.clone(), RiskPolicy::default())
            .with_reference_year(REFERENCE_YEAR)
            .with_qualitative_timeout(Duration::from_millis(200));
    (service, classifier, assessor)
}
