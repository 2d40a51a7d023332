//! Seams to the two model-backed signals: the approval classifier and the
//! qualitative assessor. Both degrade to a conservative fallback in the service.

mod classifier;
mod completion;
mod qualitative;

pub use classifier::{
    credit_score_proxy, ApprovalClassifier, ClassifierError, ClassifierFeatures,
    LogisticClassifier, LogisticCoefficients,
};
pub use completion::{
    CompletionClient, CompletionError, CompletionRequest, HttpCompletionClient, DEFAULT_ENDPOINT,
    DEFAULT_MODEL,
};
pub use qualitative::{
    build_prompt, document_snippet, parse_structured, AssessorError, ConfiguredAssessor,
    FreeTextAssessor, QualitativeAssessor, QualitativeFormat, StructuredAssessor,
};
