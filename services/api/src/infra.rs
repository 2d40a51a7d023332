use metrics_exporter_prometheus::PrometheusHandle;
use risk_fusion::assessment::{
    ConfiguredAssessor, HttpCompletionClient, LogisticClassifier, RiskAssessmentService,
    RiskPolicy,
};
use risk_fusion::config::{AppConfig, ModelConfig};
use risk_fusion::error::AppError;
use serde::de::DeserializeOwned;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ApiAssessmentService =
    RiskAssessmentService<LogisticClassifier, ConfiguredAssessor<HttpCompletionClient>>;

pub(crate) fn load_policy(models: &ModelConfig) -> Result<RiskPolicy, AppError> {
    match &models.risk_policy_path {
        Some(path) => {
            let policy = RiskPolicy::from_path(path)?;
            info!(path = %path.display(), "loaded risk policy");
            Ok(policy)
        }
        None => Ok(RiskPolicy::default()),
    }
}

pub(crate) fn load_classifier(models: &ModelConfig) -> Result<LogisticClassifier, AppError> {
    match &models.classifier_model_path {
        Some(path) => {
            let classifier = LogisticClassifier::from_path(path)?;
            info!(path = %path.display(), "loaded classifier coefficients");
            Ok(classifier)
        }
        None => Ok(LogisticClassifier::default()),
    }
}

pub(crate) fn build_assessment_service(
    config: &AppConfig,
) -> Result<ApiAssessmentService, AppError> {
    let policy = load_policy(&config.models)?;
    let classifier = load_classifier(&config.models)?;

    let llm = &config.llm;
    let client = HttpCompletionClient::new(
        llm.endpoint.clone(),
        llm.model.clone(),
        llm.api_key.clone(),
        llm.timeout,
    )?;
    info!(
        model = client.model(),
        configured = client.is_configured(),
        format = %llm.format,
        "qualitative assessor ready"
    );
    let assessor = ConfiguredAssessor::new(llm.format, Arc::new(client));

    Ok(
        RiskAssessmentService::new(Arc::new(classifier), Arc::new(assessor), policy)
            .with_qualitative_timeout(llm.timeout),
    )
}

/// Parse a CLI context flag with the same spelling the JSON API accepts.
pub(crate) fn parse_context<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let value = serde_json::Value::String(raw.trim().to_ascii_lowercase());
    serde_json::from_value(value).map_err(|_| format!("unsupported value '{raw}'"))
}
