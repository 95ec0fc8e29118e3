use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FinanceMode {
    Repayment,
    InterestOnly,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Strategy {
    BuyToLet,
    Hmo {
        rooms: u32,
        rent_per_room: f64,
    },
    ServicedAccommodation {
        nightly_rate: f64,
        occupancy_percent: f64,
    },
    Flip {
        expected_resale_price: f64,
        holding_months: u32,
    },
}

const DAYS_PER_MONTH: f64 = 365.0 / 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFinancialInputs {
    pub price: f64,
    pub deposit_percent: f64,
    pub mortgage_rate_percent: f64,
    pub mortgage_term_years: f64,
    pub legal_fees: f64,
    pub survey_fees: f64,
    pub broker_fees: f64,
    pub refurbishment: f64,
    pub monthly_rent: f64,
    pub void_percent: f64,
    pub letting_fee_percent: f64,
    pub management_fee_percent: f64,
    pub annual_insurance: f64,
    pub maintenance_percent: f64,
    pub annual_service_charge: f64,
    pub annual_ground_rent: f64,
    pub strategy: Strategy,
}

impl PropertyFinancialInputs {
    pub fn deposit(&self) -> f64 {
        self.price.max(0.0) * (self.deposit_percent.clamp(0.0, 100.0) / 100.0)
    }

    pub fn loan_amount(&self) -> f64 {
        (self.price.max(0.0) - self.deposit()).max(0.0)
    }

    pub fn one_off_costs(&self) -> f64 {
        self.legal_fees.max(0.0)
            + self.survey_fees.max(0.0)
            + self.broker_fees.max(0.0)
            + self.refurbishment.max(0.0)
    }

    pub fn gross_monthly_income(&self) -> f64 {
        match &self.strategy {
            Strategy::BuyToLet | Strategy::Flip { .. } => self.monthly_rent.max(0.0),
            Strategy::Hmo {
                rooms,
                rent_per_room,
            } => *rooms as f64 * rent_per_room.max(0.0),
            Strategy::ServicedAccommodation {
                nightly_rate,
                occupancy_percent,
            } => {
                nightly_rate.max(0.0)
                    * DAYS_PER_MONTH
                    * (occupancy_percent.clamp(0.0, 100.0) / 100.0)
            }
        }
    }

    pub fn with_scaled_income(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        let mut scaled = self.clone();
        scaled.monthly_rent *= factor;
        match &mut scaled.strategy {
            Strategy::BuyToLet | Strategy::Flip { .. } => {}
            Strategy::Hmo { rent_per_room, .. } => *rent_per_room *= factor,
            Strategy::ServicedAccommodation { nightly_rate, .. } => *nightly_rate *= factor,
        }
        scaled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub monthly_mortgage: f64,
    pub monthly_letting_fee: f64,
    pub monthly_management_fee: f64,
    pub monthly_maintenance: f64,
    pub monthly_fixed_costs: f64,
    pub monthly_operating_costs: f64,
    pub one_off_costs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    pub monthly_mortgage: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    pub gross_yield_percent: f64,
    pub net_yield_percent: f64,
    pub roi_percent: f64,
    pub total_cash_required: f64,
    pub break_even_rent: f64,
    pub break_even_degenerate: bool,
    pub cost_breakdown: CostBreakdown,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Positive,
    Warning,
    Negative,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GrowthAssumptions {
    pub annual_rent_growth_percent: f64,
    pub annual_expense_inflation_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub month: u32,
    pub label: String,
    pub income: f64,
    pub expenses: f64,
    pub net_cash_flow: f64,
    pub cumulative_cash_flow: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealScoreBreakdown {
    pub cash_flow: f64,
    pub roi: f64,
    pub risk: f64,
    pub growth: f64,
    pub exit_options: f64,
    pub total: f64,
}
