use serde::{Deserialize, Serialize};

use super::Impact;

/// Points and impact awarded when a band applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandOutcome {
    pub points: i16,
    pub impact: Impact,
}

/// One threshold step within a band table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub limit: f64,
    pub points: i16,
    pub impact: Impact,
}

/// Bands where lower values are better; each `limit` is an inclusive upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeilingBands {
    pub bands: Vec<Band>,
    pub above: BandOutcome,
}

impl CeilingBands {
    pub fn outcome(&self, value: f64) -> BandOutcome {
        self.bands
            .iter()
            .find(|band| value <= band.limit)
            .map(|band| BandOutcome {
                points: band.points,
                impact: band.impact,
            })
            .unwrap_or(self.above)
    }
}

/// Bands where higher values are better; each `limit` is an inclusive lower bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorBands {
    pub bands: Vec<Band>,
    pub below: BandOutcome,
}

impl FloorBands {
    pub fn outcome(&self, value: f64) -> BandOutcome {
        self.bands
            .iter()
            .find(|band| value >= band.limit)
            .map(|band| BandOutcome {
                points: band.points,
                impact: band.impact,
            })
            .unwrap_or(self.below)
    }
}

/// Minimum scores for each credit risk category, evaluated high to low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFloors {
    pub low: u16,
    pub medium_low: u16,
    pub medium: u16,
    pub medium_high: u16,
}

/// Breach points that trigger advisory text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryThresholds {
    pub max_dsr: f64,
    pub max_ltv: f64,
    pub min_employment_years: u32,
    pub min_savings_months: u64,
    pub min_credit_score: u16,
}

/// Tunable scoring rubric. `Default` carries the standard Malaysian retail bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub base_score: i16,
    pub min_score: u16,
    pub max_score: u16,
    pub dsr: CeilingBands,
    pub employment: FloorBands,
    pub income: FloorBands,
    pub ltv: CeilingBands,
    pub savings: FloorBands,
    pub categories: CategoryFloors,
    pub advisories: AdvisoryThresholds,
}

fn band(limit: f64, points: i16, impact: Impact) -> Band {
    Band {
        limit,
        points,
        impact,
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_score: 500,
            min_score: 300,
            max_score: 850,
            dsr: CeilingBands {
                bands: vec![
                    band(40.0, 120, Impact::Excellent),
                    band(50.0, 80, Impact::Good),
                    band(70.0, 40, Impact::Fair),
                ],
                above: BandOutcome {
                    points: -50,
                    impact: Impact::Poor,
                },
            },
            employment: FloorBands {
                bands: vec![
                    band(5.0, 90, Impact::Excellent),
                    band(3.0, 60, Impact::Good),
                    band(1.0, 30, Impact::Fair),
                ],
                below: BandOutcome {
                    points: 0,
                    impact: Impact::Limited,
                },
            },
            income: FloorBands {
                bands: vec![
                    band(10_000.0, 55, Impact::High),
                    band(5_000.0, 35, Impact::Good),
                    band(3_000.0, 20, Impact::Moderate),
                ],
                below: BandOutcome {
                    points: 0,
                    impact: Impact::Low,
                },
            },
            ltv: CeilingBands {
                bands: vec![
                    band(70.0, 55, Impact::Excellent),
                    band(80.0, 35, Impact::Good),
                    band(90.0, 15, Impact::Fair),
                ],
                above: BandOutcome {
                    points: -20,
                    impact: Impact::HighRisk,
                },
            },
            savings: FloorBands {
                bands: vec![
                    band(6.0, 35, Impact::Strong),
                    band(3.0, 20, Impact::Good),
                    band(1.0, 10, Impact::Fair),
                ],
                below: BandOutcome {
                    points: 0,
                    impact: Impact::Limited,
                },
            },
            categories: CategoryFloors {
                low: 750,
                medium_low: 650,
                medium: 550,
                medium_high: 450,
            },
            advisories: AdvisoryThresholds {
                max_dsr: 70.0,
                max_ltv: 90.0,
                min_employment_years: 2,
                min_savings_months: 3,
                min_credit_score: 550,
            },
        }
    }
}
