use super::super::domain::FinancialFacts;
use super::config::{BandOutcome, ScoringPolicy};
use super::{round2, FactorScore, FactorValue, Impact, ScoreBreakdown, ScoreFactor};

pub(crate) fn score_facts(facts: &FinancialFacts, policy: &ScoringPolicy) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    let dsr = facts.debt_service_ratio();
    if dsr == 0.0 {
        breakdown.insert(ScoreFactor::Dsr, FactorScore::unknown(Impact::Neutral));
    } else {
        let outcome = policy.dsr.outcome(dsr);
        breakdown.insert(
            ScoreFactor::Dsr,
            scored(FactorValue::Percent(round2(dsr)), outcome),
        );
    }

    let years = facts.employment_years;
    let outcome = policy.employment.outcome(f64::from(years));
    breakdown.insert(
        ScoreFactor::Employment,
        scored(FactorValue::Years(years), outcome),
    );

    let income = facts.monthly_income;
    let outcome = policy.income.outcome(income as f64);
    breakdown.insert(
        ScoreFactor::Income,
        scored(FactorValue::Currency(income), outcome),
    );

    let ltv = facts.loan_to_value();
    if ltv == 0.0 {
        breakdown.insert(ScoreFactor::Ltv, FactorScore::unknown(Impact::Neutral));
    } else {
        let outcome = policy.ltv.outcome(ltv);
        breakdown.insert(
            ScoreFactor::Ltv,
            scored(FactorValue::Percent(round2(ltv)), outcome),
        );
    }

    match facts.savings_months() {
        Some(months) => {
            let outcome = policy.savings.outcome(months);
            breakdown.insert(
                ScoreFactor::Savings,
                scored(FactorValue::Months(round2(months)), outcome),
            );
        }
        None => {
            breakdown.insert(ScoreFactor::Savings, FactorScore::unknown(Impact::Unknown));
        }
    }

    breakdown
}

fn scored(raw_value: FactorValue, outcome: BandOutcome) -> FactorScore {
    FactorScore {
        raw_value,
        points: outcome.points,
        impact: outcome.impact,
    }
}
