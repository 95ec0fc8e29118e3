mod forecast;
mod metrics;
mod mortgage;
mod scenario;
mod score;
mod stress;
mod types;

pub use forecast::{HIGH_CONFIDENCE_MAX_MONTH, MEDIUM_CONFIDENCE_MAX_MONTH, project_forecast};
pub use metrics::compute_metrics;
pub use mortgage::{interest_only_payment, monthly_payment};
pub use scenario::{FieldChange, InputField, MetricsDiff, ScenarioEngine, ScenarioVariation};
pub use score::{ExitInputs, GrowthInputs, RiskInputs, ScoreConfig, ScoreWeights, score_deal};
pub use stress::{
    Shock, StressOutcome, StressScenarioDef, WARNING_TOLERANCE_RATIO, run_stress_tests,
    standard_battery,
};
pub use types::{
    Classification, Confidence, CostBreakdown, DealScoreBreakdown, FinanceMode, ForecastPoint,
    GrowthAssumptions, MetricsResult, PropertyFinancialInputs, Strategy,
};
