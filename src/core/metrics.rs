use super::mortgage::{interest_only_payment, monthly_payment};
use super::types::{CostBreakdown, FinanceMode, MetricsResult, PropertyFinancialInputs};

/// Margins smaller than this are treated as a degenerate break-even case
/// rather than producing an absurdly large (or infinite) rent.
const BREAK_EVEN_MIN_MARGIN: f64 = 1e-9;

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn compute_metrics(inputs: &PropertyFinancialInputs, mode: FinanceMode) -> MetricsResult {
    let loan = inputs.loan_amount();
    let rate = inputs.mortgage_rate_percent.max(0.0);
    let term = inputs.mortgage_term_years.max(0.0);

    let monthly_mortgage = match mode {
        FinanceMode::Repayment => monthly_payment(loan, rate, term),
        FinanceMode::InterestOnly => interest_only_payment(loan, rate),
    };

    let gross_income = inputs.gross_monthly_income();
    let void = inputs.void_percent.clamp(0.0, 100.0) / 100.0;
    let letting = inputs.letting_fee_percent.clamp(0.0, 100.0) / 100.0;
    let management = inputs.management_fee_percent.clamp(0.0, 100.0) / 100.0;
    let maintenance = inputs.maintenance_percent.clamp(0.0, 100.0) / 100.0;

    let effective_income = gross_income * (1.0 - void);
    let monthly_letting_fee = effective_income * letting;
    let monthly_management_fee = effective_income * management;
    // Maintenance accrues on the gross rent: repairs do not pause during voids.
    let monthly_maintenance = gross_income * maintenance;
    let fixed_annuals = inputs.annual_insurance.max(0.0)
        + inputs.annual_service_charge.max(0.0)
        + inputs.annual_ground_rent.max(0.0);
    let monthly_fixed_costs = fixed_annuals / 12.0;
    let monthly_operating_costs =
        monthly_letting_fee + monthly_management_fee + monthly_maintenance + monthly_fixed_costs;

    let monthly_cash_flow = effective_income - monthly_mortgage - monthly_operating_costs;
    let annual_cash_flow = monthly_cash_flow * 12.0;

    let price = inputs.price.max(0.0);
    let annual_gross_income = gross_income * 12.0;
    let gross_yield_percent = if price > 0.0 {
        annual_gross_income / price * 100.0
    } else {
        0.0
    };
    // Net yield normalizes with the interest-only mortgage cost so repayment
    // principal does not distort the reported yield.
    let annual_interest_only = interest_only_payment(loan, rate) * 12.0;
    let net_yield_percent = if price > 0.0 {
        (annual_gross_income - monthly_operating_costs * 12.0 - annual_interest_only) / price
            * 100.0
    } else {
        0.0
    };

    let total_cash_required = inputs.deposit() + inputs.one_off_costs();
    let roi_percent = if total_cash_required > 0.0 {
        annual_cash_flow / total_cash_required * 100.0
    } else {
        0.0
    };

    // Break-even solves cash flow = 0 for the gross rent term. Letting and
    // management apply post-void, maintenance applies to gross rent, so:
    //   rent * ((1 - void)(1 - letting - management) - maintenance)
    //     = monthly_mortgage + fixed_annuals / 12
    let margin = (1.0 - void) * (1.0 - letting - management) - maintenance;
    let (break_even_rent, break_even_degenerate) = if margin > BREAK_EVEN_MIN_MARGIN {
        (
            (12.0 * monthly_mortgage + fixed_annuals) / (12.0 * margin),
            false,
        )
    } else {
        (0.0, true)
    };

    MetricsResult {
        monthly_mortgage: round2(monthly_mortgage),
        monthly_cash_flow: round2(monthly_cash_flow),
        annual_cash_flow: round2(annual_cash_flow),
        gross_yield_percent: round2(gross_yield_percent),
        net_yield_percent: round2(net_yield_percent),
        roi_percent: round2(roi_percent),
        total_cash_required: round2(total_cash_required),
        break_even_rent: round2(break_even_rent),
        break_even_degenerate,
        cost_breakdown: CostBreakdown {
            monthly_mortgage: round2(monthly_mortgage),
            monthly_letting_fee: round2(monthly_letting_fee),
            monthly_management_fee: round2(monthly_management_fee),
            monthly_maintenance: round2(monthly_maintenance),
            monthly_fixed_costs: round2(monthly_fixed_costs),
            monthly_operating_costs: round2(monthly_operating_costs),
            one_off_costs: round2(inputs.one_off_costs()),
        },
    }
}
