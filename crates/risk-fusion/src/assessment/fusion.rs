use serde::{Deserialize, Serialize};

use super::domain::{ClassifierPrediction, DataQuality, QualitativeAssessment, RiskLevel};
use super::scoring::round2;

const DEFAULT_CLASSIFIER_WEIGHT: f64 = 0.70;
const DEFAULT_QUALITATIVE_WEIGHT: f64 = 0.30;

/// Approval-probability proxy assigned to each qualitative label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProxyTable {
    pub low: f64,
    pub low_medium: f64,
    pub medium: f64,
    pub medium_high: f64,
    pub high: f64,
    pub unknown: f64,
}

impl ProxyTable {
    pub fn proxy(&self, level: Option<RiskLevel>) -> f64 {
        match level {
            Some(RiskLevel::Low) => self.low,
            Some(RiskLevel::LowMedium) => self.low_medium,
            Some(RiskLevel::Medium) => self.medium,
            Some(RiskLevel::MediumHigh) => self.medium_high,
            Some(RiskLevel::High) => self.high,
            None => self.unknown,
        }
    }
}

/// Minimum fused probability for each tier, evaluated from LOW downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierFloors {
    pub low: f64,
    pub low_medium: f64,
    pub medium: f64,
    pub medium_high: f64,
}

/// Weights and thresholds for blending both adapters into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionPolicy {
    pub classifier_weight: f64,
    pub qualitative_weight: f64,
    pub agreement_tolerance: f64,
    pub proxies: ProxyTable,
    pub tiers: TierFloors,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self {
            classifier_weight: DEFAULT_CLASSIFIER_WEIGHT,
            qualitative_weight: DEFAULT_QUALITATIVE_WEIGHT,
            agreement_tolerance: 20.0,
            proxies: ProxyTable {
                low: 85.0,
                low_medium: 70.0,
                medium: 55.0,
                medium_high: 40.0,
                high: 20.0,
                unknown: 50.0,
            },
            tiers: TierFloors {
                low: 75.0,
                low_medium: 60.0,
                medium: 45.0,
                medium_high: 30.0,
            },
        }
    }
}

impl FusionPolicy {
    /// Weights that are negative, non-finite, or both zero revert to 0.70 / 0.30.
    pub fn sanitized(mut self) -> Self {
        let valid = |weight: f64| weight.is_finite() && weight >= 0.0;
        if !valid(self.classifier_weight)
            || !valid(self.qualitative_weight)
            || self.classifier_weight + self.qualitative_weight == 0.0
        {
            self.classifier_weight = DEFAULT_CLASSIFIER_WEIGHT;
            self.qualitative_weight = DEFAULT_QUALITATIVE_WEIGHT;
        }
        self
    }
}

/// Inputs and weights that produced a fused decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    pub classifier_probability: f64,
    pub classifier_weight: f64,
    pub classifier_data_quality: DataQuality,
    pub qualitative_label: String,
    pub qualitative_proxy: f64,
    pub qualitative_weight: f64,
    pub qualitative_data_quality: DataQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedDecision {
    pub fused_probability: f64,
    pub fused_risk_tier: RiskLevel,
    pub recommendation_text: String,
    pub model_agreement: bool,
    pub component_breakdown: ComponentBreakdown,
}

/// Pure weighted blend of the classifier probability and the qualitative label.
#[derive(Debug, Clone, Default)]
pub struct FusionEngine {
    policy: FusionPolicy,
}

impl FusionEngine {
    pub fn new(policy: FusionPolicy) -> Self {
        Self {
            policy: policy.sanitized(),
        }
    }

    pub fn policy(&self) -> &FusionPolicy {
        &self.policy
    }

    pub fn fuse(
        &self,
        classifier: &ClassifierPrediction,
        qualitative: &QualitativeAssessment,
    ) -> FusedDecision {
        let policy = &self.policy;
        let probability = classifier.approval_probability;
        let proxy = policy.proxies.proxy(qualitative.risk_level);

        // Tier on the exact blend; only the reported probability is rounded.
        let blend = policy.classifier_weight * probability + policy.qualitative_weight * proxy;
        let tier = self.tier(blend);

        FusedDecision {
            fused_probability: round2(blend),
            fused_risk_tier: tier,
            recommendation_text: recommendation(tier).to_string(),
            model_agreement: (probability - proxy).abs() < policy.agreement_tolerance,
            component_breakdown: ComponentBreakdown {
                classifier_probability: probability,
                classifier_weight: policy.classifier_weight,
                classifier_data_quality: classifier.data_quality,
                qualitative_label: qualitative.label.clone(),
                qualitative_proxy: proxy,
                qualitative_weight: policy.qualitative_weight,
                qualitative_data_quality: qualitative.data_quality,
            },
        }
    }

    fn tier(&self, fused: f64) -> RiskLevel {
        let floors = &self.policy.tiers;
        if fused >= floors.low {
            RiskLevel::Low
        } else if fused >= floors.low_medium {
            RiskLevel::LowMedium
        } else if fused >= floors.medium {
            RiskLevel::Medium
        } else if fused >= floors.medium_high {
            RiskLevel::MediumHigh
        } else {
            RiskLevel::High
        }
    }
}

pub fn recommendation(tier: RiskLevel) -> &'static str {
    match tier {
        RiskLevel::Low => "APPROVED – strong candidate",
        RiskLevel::LowMedium => "APPROVED with conditions",
        RiskLevel::Medium => "REVIEW REQUIRED",
        RiskLevel::MediumHigh => "DECLINE with reapplication option",
        RiskLevel::High => "DECLINE – high risk",
    }
}
