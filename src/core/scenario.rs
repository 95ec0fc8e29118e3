use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::metrics::compute_metrics;
use super::types::{FinanceMode, MetricsResult, PropertyFinancialInputs};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    Price,
    DepositPercent,
    MortgageRatePercent,
    MortgageTermYears,
    LegalFees,
    SurveyFees,
    BrokerFees,
    Refurbishment,
    MonthlyRent,
    VoidPercent,
    LettingFeePercent,
    ManagementFeePercent,
    AnnualInsurance,
    MaintenancePercent,
    AnnualServiceCharge,
    AnnualGroundRent,
}

impl InputField {
    pub const ALL: [InputField; 16] = [
        InputField::Price,
        InputField::DepositPercent,
        InputField::MortgageRatePercent,
        InputField::MortgageTermYears,
        InputField::LegalFees,
        InputField::SurveyFees,
        InputField::BrokerFees,
        InputField::Refurbishment,
        InputField::MonthlyRent,
        InputField::VoidPercent,
        InputField::LettingFeePercent,
        InputField::ManagementFeePercent,
        InputField::AnnualInsurance,
        InputField::MaintenancePercent,
        InputField::AnnualServiceCharge,
        InputField::AnnualGroundRent,
    ];

    pub fn get(self, inputs: &PropertyFinancialInputs) -> f64 {
        match self {
            InputField::Price => inputs.price,
            InputField::DepositPercent => inputs.deposit_percent,
            InputField::MortgageRatePercent => inputs.mortgage_rate_percent,
            InputField::MortgageTermYears => inputs.mortgage_term_years,
            InputField::LegalFees => inputs.legal_fees,
            InputField::SurveyFees => inputs.survey_fees,
            InputField::BrokerFees => inputs.broker_fees,
            InputField::Refurbishment => inputs.refurbishment,
            InputField::MonthlyRent => inputs.monthly_rent,
            InputField::VoidPercent => inputs.void_percent,
            InputField::LettingFeePercent => inputs.letting_fee_percent,
            InputField::ManagementFeePercent => inputs.management_fee_percent,
            InputField::AnnualInsurance => inputs.annual_insurance,
            InputField::MaintenancePercent => inputs.maintenance_percent,
            InputField::AnnualServiceCharge => inputs.annual_service_charge,
            InputField::AnnualGroundRent => inputs.annual_ground_rent,
        }
    }

    pub fn set(self, inputs: &mut PropertyFinancialInputs, value: f64) {
        match self {
            InputField::Price => inputs.price = value,
            InputField::DepositPercent => inputs.deposit_percent = value,
            InputField::MortgageRatePercent => inputs.mortgage_rate_percent = value,
            InputField::MortgageTermYears => inputs.mortgage_term_years = value,
            InputField::LegalFees => inputs.legal_fees = value,
            InputField::SurveyFees => inputs.survey_fees = value,
            InputField::BrokerFees => inputs.broker_fees = value,
            InputField::Refurbishment => inputs.refurbishment = value,
            InputField::MonthlyRent => inputs.monthly_rent = value,
            InputField::VoidPercent => inputs.void_percent = value,
            InputField::LettingFeePercent => inputs.letting_fee_percent = value,
            InputField::ManagementFeePercent => inputs.management_fee_percent = value,
            InputField::AnnualInsurance => inputs.annual_insurance = value,
            InputField::MaintenancePercent => inputs.maintenance_percent = value,
            InputField::AnnualServiceCharge => inputs.annual_service_charge = value,
            InputField::AnnualGroundRent => inputs.annual_ground_rent = value,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: InputField,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioVariation {
    pub id: u64,
    pub name: String,
    pub created_at_unix_secs: u64,
    pub changes: Vec<FieldChange>,
    pub metrics: MetricsResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDiff {
    pub monthly_mortgage: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    pub gross_yield_percent: f64,
    pub net_yield_percent: f64,
    pub roi_percent: f64,
    pub total_cash_required: f64,
    pub break_even_rent: f64,
}

fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A comparison session: one base case, one working copy and a list of
/// saved variations. Owned by a single caller; nothing here is global.
#[derive(Debug, Clone)]
pub struct ScenarioEngine {
    base: PropertyFinancialInputs,
    current: PropertyFinancialInputs,
    finance_mode: FinanceMode,
    variations: Vec<ScenarioVariation>,
    next_id: u64,
}

impl ScenarioEngine {
    pub fn new(base: PropertyFinancialInputs, finance_mode: FinanceMode) -> Self {
        Self {
            current: base.clone(),
            base,
            finance_mode,
            variations: Vec::new(),
            next_id: 1,
        }
    }

    pub fn base(&self) -> &PropertyFinancialInputs {
        &self.base
    }

    pub fn current(&self) -> &PropertyFinancialInputs {
        &self.current
    }

    pub fn finance_mode(&self) -> FinanceMode {
        self.finance_mode
    }

    pub fn variations(&self) -> &[ScenarioVariation] {
        &self.variations
    }

    pub fn variation(&self, id: u64) -> Option<&ScenarioVariation> {
        self.variations.iter().find(|v| v.id == id)
    }

    /// Replaces the base case and discards unsaved edits. Saved variations
    /// are kept; their deltas now apply against the new base.
    pub fn set_base(&mut self, base: PropertyFinancialInputs) {
        self.current = base.clone();
        self.base = base;
    }

    pub fn update_field(&mut self, field: InputField, value: f64) {
        field.set(&mut self.current, value);
    }

    pub fn reset_to_base(&mut self) {
        self.current = self.base.clone();
    }

    pub fn changes_from_base(&self) -> Vec<FieldChange> {
        InputField::ALL
            .iter()
            .filter(|field| field.get(&self.current) != field.get(&self.base))
            .map(|field| FieldChange {
                field: *field,
                value: field.get(&self.current),
            })
            .collect()
    }

    /// Snapshots the working copy as a named variation and returns its id.
    /// An empty change-set is permitted: the variation then records the base
    /// case itself, which is useful as an explicit "as listed" entry.
    pub fn save_variation(&mut self, name: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.variations.push(ScenarioVariation {
            id,
            name: name.to_string(),
            created_at_unix_secs: unix_now_secs(),
            changes: self.changes_from_base(),
            metrics: compute_metrics(&self.current, self.finance_mode),
        });
        id
    }

    /// Rebuilds the working copy as base merged with the variation's
    /// changes. Unknown ids are a no-op.
    pub fn load_variation(&mut self, id: u64) {
        let Some(variation) = self.variations.iter().find(|v| v.id == id) else {
            return;
        };
        let mut merged = self.base.clone();
        for change in &variation.changes {
            change.field.set(&mut merged, change.value);
        }
        self.current = merged;
    }

    /// Removes a variation by id; idempotent when the id is absent.
    pub fn delete_variation(&mut self, id: u64) {
        self.variations.retain(|v| v.id != id);
    }

    pub fn base_metrics(&self) -> MetricsResult {
        compute_metrics(&self.base, self.finance_mode)
    }

    pub fn current_metrics(&self) -> MetricsResult {
        compute_metrics(&self.current, self.finance_mode)
    }

    pub fn diff_against_base(&self, other: &MetricsResult) -> MetricsDiff {
        let base = self.base_metrics();
        MetricsDiff {
            monthly_mortgage: other.monthly_mortgage - base.monthly_mortgage,
            monthly_cash_flow: other.monthly_cash_flow - base.monthly_cash_flow,
            annual_cash_flow: other.annual_cash_flow - base.annual_cash_flow,
            gross_yield_percent: other.gross_yield_percent - base.gross_yield_percent,
            net_yield_percent: other.net_yield_percent - base.net_yield_percent,
            roi_percent: other.roi_percent - base.roi_percent,
            total_cash_required: other.total_cash_required - base.total_cash_required,
            break_even_rent: other.break_even_rent - base.break_even_rent,
        }
    }
}
