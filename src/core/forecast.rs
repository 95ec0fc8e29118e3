use super::metrics::{compute_metrics, round2};
use super::types::{Confidence, FinanceMode, ForecastPoint, GrowthAssumptions,
    PropertyFinancialInputs};

/// Confidence tiers decay with distance from period 0: near-term periods are
/// backed by current lettings data, far periods are extrapolation.
pub const HIGH_CONFIDENCE_MAX_MONTH: u32 = 2;
pub const MEDIUM_CONFIDENCE_MAX_MONTH: u32 = 8;

fn confidence_for_month(month: u32) -> Confidence {
    if month <= HIGH_CONFIDENCE_MAX_MONTH {
        Confidence::High
    } else if month <= MEDIUM_CONFIDENCE_MAX_MONTH {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

pub fn project_forecast(
    base: &PropertyFinancialInputs,
    mode: FinanceMode,
    months: u32,
    assumptions: &GrowthAssumptions,
) -> Vec<ForecastPoint> {
    let rent_growth = 1.0 + assumptions.annual_rent_growth_percent / 100.0;
    let expense_inflation = 1.0 + assumptions.annual_expense_inflation_percent / 100.0;

    let mut points = Vec::with_capacity(months as usize);
    let mut cumulative = 0.0;
    for month in 0..months {
        let years_elapsed = month as f64 / 12.0;
        let rent_factor = rent_growth.powf(years_elapsed).max(0.0);
        let expense_factor = expense_inflation.powf(years_elapsed).max(0.0);

        let mut period_inputs = base.with_scaled_income(rent_factor);
        period_inputs.annual_insurance *= expense_factor;
        period_inputs.annual_service_charge *= expense_factor;
        period_inputs.annual_ground_rent *= expense_factor;

        let metrics = compute_metrics(&period_inputs, mode);
        let void = period_inputs.void_percent.clamp(0.0, 100.0) / 100.0;
        let income = round2(period_inputs.gross_monthly_income() * (1.0 - void));
        let net_cash_flow = metrics.monthly_cash_flow;
        cumulative += net_cash_flow;

        points.push(ForecastPoint {
            month,
            label: format!("Month {}", month + 1),
            income,
            expenses: round2(income - net_cash_flow),
            net_cash_flow,
            cumulative_cash_flow: round2(cumulative),
            confidence: confidence_for_month(month),
        });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Strategy;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn base_inputs() -> PropertyFinancialInputs {
        PropertyFinancialInputs {
            price: 250_000.0,
            deposit_percent: 25.0,
            mortgage_rate_percent: 5.5,
            mortgage_term_years: 25.0,
            legal_fees: 0.0,
            survey_fees: 0.0,
            broker_fees: 0.0,
            refurbishment: 0.0,
            monthly_rent: 1_200.0,
            void_percent: 5.0,
            letting_fee_percent: 8.0,
            management_fee_percent: 10.0,
            annual_insurance: 300.0,
            maintenance_percent: 10.0,
            annual_service_charge: 0.0,
            annual_ground_rent: 0.0,
            strategy: Strategy::BuyToLet,
        }
    }

    fn no_growth() -> GrowthAssumptions {
        GrowthAssumptions::default()
    }

    #[test]
    fn zero_months_yields_an_empty_forecast() {
        let points = project_forecast(&base_inputs(), FinanceMode::Repayment, 0, &no_growth());
        assert!(points.is_empty());
    }

    #[test]
    fn output_length_equals_requested_months() {
        for months in [1, 6, 12, 60] {
            let points =
                project_forecast(&base_inputs(), FinanceMode::Repayment, months, &no_growth());
            assert_eq!(points.len(), months as usize);
        }
    }

    #[test]
    fn flat_assumptions_repeat_the_base_cash_flow() {
        let inputs = base_inputs();
        let metrics = compute_metrics(&inputs, FinanceMode::Repayment);
        let points = project_forecast(&inputs, FinanceMode::Repayment, 24, &no_growth());

        for (index, point) in points.iter().enumerate() {
            assert_eq!(point.net_cash_flow, metrics.monthly_cash_flow);
            let expected_cumulative = metrics.monthly_cash_flow * (index as f64 + 1.0);
            assert!(
                (point.cumulative_cash_flow - expected_cumulative).abs() <= 0.01,
                "month {index}: cumulative {} vs expected {expected_cumulative}",
                point.cumulative_cash_flow
            );
            assert!(
                (point.income - point.expenses - point.net_cash_flow).abs() <= 1e-9,
                "income/expense identity broke at month {index}"
            );
        }
    }

    #[test]
    fn confidence_tiers_follow_the_documented_breakpoints() {
        let points = project_forecast(&base_inputs(), FinanceMode::Repayment, 12, &no_growth());
        let tiers: Vec<Confidence> = points.iter().map(|p| p.confidence).collect();
        assert_eq!(&tiers[0..3], &[Confidence::High; 3]);
        assert_eq!(&tiers[3..9], &[Confidence::Medium; 6]);
        assert_eq!(&tiers[9..12], &[Confidence::Low; 3]);
    }

    #[test]
    fn rent_growth_compounds_income_upward() {
        let assumptions = GrowthAssumptions {
            annual_rent_growth_percent: 4.0,
            annual_expense_inflation_percent: 0.0,
        };
        let points = project_forecast(&base_inputs(), FinanceMode::Repayment, 36, &assumptions);

        assert!(points[35].income > points[0].income);
        // One full year out the income factor is exactly 1.04.
        assert!((points[12].income - points[0].income * 1.04).abs() <= 0.02);
        for pair in points.windows(2) {
            assert!(pair[1].income >= pair[0].income);
        }
    }

    #[test]
    fn expense_inflation_erodes_cash_flow() {
        let assumptions = GrowthAssumptions {
            annual_rent_growth_percent: 0.0,
            annual_expense_inflation_percent: 10.0,
        };
        let points = project_forecast(&base_inputs(), FinanceMode::Repayment, 24, &assumptions);
        assert!(points[23].net_cash_flow < points[0].net_cash_flow);
        assert_eq!(points[23].income, points[0].income);
    }

    proptest! {
        #[test]
        fn prop_confidence_never_increases_with_horizon(
            months in 9u32..121,
            rent_growth_bp in -500i32..1_000,
            inflation_bp in -500i32..1_000
        ) {
            let assumptions = GrowthAssumptions {
                annual_rent_growth_percent: rent_growth_bp as f64 / 100.0,
                annual_expense_inflation_percent: inflation_bp as f64 / 100.0,
            };
            let points = project_forecast(
                &base_inputs(),
                FinanceMode::Repayment,
                months,
                &assumptions,
            );
            prop_assert_eq!(points.len(), months as usize);

            fn rank(confidence: Confidence) -> u8 {
                match confidence {
                    Confidence::High => 0,
                    Confidence::Medium => 1,
                    Confidence::Low => 2,
                }
            }
            for pair in points.windows(2) {
                prop_assert!(rank(pair[1].confidence) >= rank(pair[0].confidence));
            }
            prop_assert_eq!(points[0].confidence, Confidence::High);
            prop_assert_eq!(points[months as usize - 1].confidence, Confidence::Low);
        }
    }
}
