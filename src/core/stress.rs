use serde::Serialize;

use super::metrics::compute_metrics;
use super::types::{Classification, FinanceMode, MetricsResult, PropertyFinancialInputs};

/// A shocked deal is a warning (rather than outright negative) while its
/// monthly cash flow stays within this fraction of the base cash flow
/// magnitude below zero.
pub const WARNING_TOLERANCE_RATIO: f64 = 0.10;

#[derive(Clone, Debug, PartialEq)]
pub enum Shock {
    /// Adds percentage points to the mortgage rate.
    RateRisePoints(f64),
    /// Replaces the void percentage outright.
    VoidPercent(f64),
    /// Scales gross rental income, e.g. 0.9 for a 10% rent cut.
    RentMultiplier(f64),
}

impl Shock {
    pub fn apply(&self, inputs: &PropertyFinancialInputs) -> PropertyFinancialInputs {
        match self {
            Shock::RateRisePoints(points) => {
                let mut shocked = inputs.clone();
                shocked.mortgage_rate_percent += points;
                shocked
            }
            Shock::VoidPercent(percent) => {
                let mut shocked = inputs.clone();
                shocked.void_percent = *percent;
                shocked
            }
            Shock::RentMultiplier(factor) => inputs.with_scaled_income(*factor),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StressScenarioDef {
    pub name: String,
    pub shock: Shock,
}

impl StressScenarioDef {
    pub fn new(name: &str, shock: Shock) -> Self {
        Self {
            name: name.to_string(),
            shock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressOutcome {
    pub name: String,
    pub classification: Classification,
    pub metrics: MetricsResult,
}

pub fn standard_battery() -> Vec<StressScenarioDef> {
    vec![
        StressScenarioDef::new("+1% rate", Shock::RateRisePoints(1.0)),
        StressScenarioDef::new("+2% rate", Shock::RateRisePoints(2.0)),
        StressScenarioDef::new("+3% rate", Shock::RateRisePoints(3.0)),
        StressScenarioDef::new("15% voids", Shock::VoidPercent(15.0)),
        StressScenarioDef::new("20% voids", Shock::VoidPercent(20.0)),
        StressScenarioDef::new("-10% rent", Shock::RentMultiplier(0.9)),
        StressScenarioDef::new("-20% rent", Shock::RentMultiplier(0.8)),
    ]
}

/// Runs every definition against the base inputs, preserving input order.
pub fn run_stress_tests(
    base: &PropertyFinancialInputs,
    mode: FinanceMode,
    definitions: &[StressScenarioDef],
) -> Vec<StressOutcome> {
    let base_cash_flow = compute_metrics(base, mode).monthly_cash_flow;
    let warning_floor = -WARNING_TOLERANCE_RATIO * base_cash_flow.abs();

    definitions
        .iter()
        .map(|definition| {
            let metrics = compute_metrics(&definition.shock.apply(base), mode);
            let classification = if metrics.monthly_cash_flow >= 0.0 {
                Classification::Positive
            } else if metrics.monthly_cash_flow >= warning_floor {
                Classification::Warning
            } else {
                Classification::Negative
            };
            StressOutcome {
                name: definition.name.clone(),
                classification,
                metrics,
            }
        })
        .collect()
}
