pub fn monthly_payment(principal: f64, annual_rate_percent: f64, term_years: f64) -> f64 {
    let payments = term_years * 12.0;
    if payments <= 0.0 || principal <= 0.0 {
        return 0.0;
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    if monthly_rate == 0.0 {
        // Degenerate zero-rate case: straight-line repayment, exact.
        return principal / payments;
    }

    let growth = (1.0 + monthly_rate).powf(payments);
    principal * monthly_rate * growth / (growth - 1.0)
}

pub fn interest_only_payment(principal: f64, annual_rate_percent: f64) -> f64 {
    if principal <= 0.0 {
        return 0.0;
    }
    principal * annual_rate_percent / 100.0 / 12.0
}
