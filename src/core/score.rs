use super::metrics::round2;
use super::types::{Classification, DealScoreBreakdown, MetricsResult, Strategy};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScoreWeights {
    pub cash_flow: f64,
    pub roi: f64,
    pub risk: f64,
    pub growth: f64,
    pub exit_options: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.cash_flow + self.roi + self.risk + self.growth + self.exit_options
    }
}

/// Every curve breakpoint and weight used by the scorer. The defaults are
/// the product's standard qualification profile; callers tune them rather
/// than patching scoring code.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreConfig {
    pub weights: ScoreWeights,
    /// Monthly cash flow at which the cash-flow sub-score saturates at 100.
    pub excellent_monthly_cash_flow: f64,
    /// Cash-on-cash ROI (percent) at which the ROI sub-score saturates.
    pub excellent_roi_percent: f64,
    pub excellent_rent_growth_percent: f64,
    pub excellent_capital_growth_percent: f64,
    /// Share of the exit sub-score taken from equity headroom (100 - LTV);
    /// the remainder comes from the per-strategy liquidity score.
    pub equity_blend: f64,
    pub liquidity_buy_to_let: f64,
    pub liquidity_hmo: f64,
    pub liquidity_serviced_accommodation: f64,
    pub liquidity_flip: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights {
                cash_flow: 0.30,
                roi: 0.25,
                risk: 0.20,
                growth: 0.15,
                exit_options: 0.10,
            },
            excellent_monthly_cash_flow: 500.0,
            excellent_roi_percent: 12.0,
            excellent_rent_growth_percent: 4.0,
            excellent_capital_growth_percent: 5.0,
            equity_blend: 0.6,
            liquidity_buy_to_let: 70.0,
            liquidity_hmo: 40.0,
            liquidity_serviced_accommodation: 50.0,
            liquidity_flip: 80.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RiskInputs {
    pub classifications: Vec<Classification>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GrowthInputs {
    pub annual_rent_growth_percent: f64,
    pub annual_capital_growth_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExitInputs {
    pub loan_to_value_percent: f64,
    pub strategy: Strategy,
}

fn linear_score(value: f64, excellent: f64) -> f64 {
    if excellent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / excellent * 100.0).clamp(0.0, 100.0)
}

fn classification_score(classification: Classification) -> f64 {
    match classification {
        Classification::Positive => 100.0,
        Classification::Warning => 50.0,
        Classification::Negative => 0.0,
    }
}

pub fn score_deal(
    metrics: &MetricsResult,
    risk: &RiskInputs,
    growth: &GrowthInputs,
    exit: &ExitInputs,
    config: &ScoreConfig,
) -> DealScoreBreakdown {
    let cash_flow = linear_score(metrics.monthly_cash_flow, config.excellent_monthly_cash_flow);
    let roi = linear_score(metrics.roi_percent, config.excellent_roi_percent);

    // No battery run means no evidence either way; score it neutral.
    let risk_score = if risk.classifications.is_empty() {
        50.0
    } else {
        risk.classifications
            .iter()
            .map(|c| classification_score(*c))
            .sum::<f64>()
            / risk.classifications.len() as f64
    };

    let growth_score = (linear_score(
        growth.annual_rent_growth_percent,
        config.excellent_rent_growth_percent,
    ) + linear_score(
        growth.annual_capital_growth_percent,
        config.excellent_capital_growth_percent,
    )) / 2.0;

    let equity_headroom = (100.0 - exit.loan_to_value_percent).clamp(0.0, 100.0);
    let liquidity = match exit.strategy {
        Strategy::BuyToLet => config.liquidity_buy_to_let,
        Strategy::Hmo { .. } => config.liquidity_hmo,
        Strategy::ServicedAccommodation { .. } => config.liquidity_serviced_accommodation,
        Strategy::Flip { .. } => config.liquidity_flip,
    }
    .clamp(0.0, 100.0);
    let blend = config.equity_blend.clamp(0.0, 1.0);
    let exit_options = (blend * equity_headroom + (1.0 - blend) * liquidity).clamp(0.0, 100.0);

    let weights = &config.weights;
    let weight_sum = weights.sum();
    let total = if weight_sum > 0.0 {
        (weights.cash_flow * cash_flow
            + weights.roi * roi
            + weights.risk * risk_score
            + weights.growth * growth_score
            + weights.exit_options * exit_options)
            / weight_sum
    } else {
        0.0
    };

    DealScoreBreakdown {
        cash_flow: round2(cash_flow),
        roi: round2(roi),
        risk: round2(risk_score),
        growth: round2(growth_score),
        exit_options: round2(exit_options),
        total: round2(total.clamp(0.0, 100.0)),
    }
}
