use axum::{
    Router,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    DealScoreBreakdown, ExitInputs, FinanceMode, ForecastPoint, GrowthAssumptions, GrowthInputs,
    MetricsResult, PropertyFinancialInputs, RiskInputs, ScoreConfig, ScoreWeights, Strategy,
    StressOutcome, compute_metrics, project_forecast, run_stress_tests, score_deal,
    standard_battery,
};

const MAX_FORECAST_MONTHS: u32 = 600;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFinanceMode {
    Repayment,
    InterestOnly,
}

impl From<CliFinanceMode> for FinanceMode {
    fn from(value: CliFinanceMode) -> Self {
        match value {
            CliFinanceMode::Repayment => FinanceMode::Repayment,
            CliFinanceMode::InterestOnly => FinanceMode::InterestOnly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliStrategy {
    BuyToLet,
    Hmo,
    ServicedAccommodation,
    Flip,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiFinanceMode {
    Repayment,
    #[serde(alias = "interestOnly", alias = "interest_only")]
    InterestOnly,
}

impl From<ApiFinanceMode> for CliFinanceMode {
    fn from(value: ApiFinanceMode) -> Self {
        match value {
            ApiFinanceMode::Repayment => CliFinanceMode::Repayment,
            ApiFinanceMode::InterestOnly => CliFinanceMode::InterestOnly,
        }
    }
}

impl From<FinanceMode> for ApiFinanceMode {
    fn from(value: FinanceMode) -> Self {
        match value {
            FinanceMode::Repayment => ApiFinanceMode::Repayment,
            FinanceMode::InterestOnly => ApiFinanceMode::InterestOnly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiStrategy {
    #[serde(alias = "buyToLet", alias = "buy_to_let", alias = "btl")]
    BuyToLet,
    Hmo,
    #[serde(alias = "servicedAccommodation", alias = "serviced_accommodation", alias = "sa")]
    ServicedAccommodation,
    Flip,
}

impl From<ApiStrategy> for CliStrategy {
    fn from(value: ApiStrategy) -> Self {
        match value {
            ApiStrategy::BuyToLet => CliStrategy::BuyToLet,
            ApiStrategy::Hmo => CliStrategy::Hmo,
            ApiStrategy::ServicedAccommodation => CliStrategy::ServicedAccommodation,
            ApiStrategy::Flip => CliStrategy::Flip,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "btl",
    about = "Property deal analyzer (metrics + stress battery + forecast + deal score)"
)]
struct Cli {
    #[arg(long, help = "Purchase price")]
    price: f64,
    #[arg(long, default_value_t = 25.0, help = "Deposit as a percent of price")]
    deposit_percent: f64,
    #[arg(
        long,
        default_value_t = 5.5,
        help = "Mortgage interest rate, annual percent"
    )]
    mortgage_rate_percent: f64,
    #[arg(long, default_value_t = 25.0, help = "Mortgage term in years")]
    mortgage_term_years: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliFinanceMode::Repayment,
        help = "Mortgage product: repayment or interest-only"
    )]
    finance_mode: CliFinanceMode,
    #[arg(long, default_value_t = 0.0)]
    legal_fees: f64,
    #[arg(long, default_value_t = 0.0)]
    survey_fees: f64,
    #[arg(long, default_value_t = 0.0)]
    broker_fees: f64,
    #[arg(long, default_value_t = 0.0, help = "One-off refurbishment budget")]
    refurbishment: f64,
    #[arg(long, help = "Gross monthly rent")]
    monthly_rent: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Expected void periods as a percent of the year"
    )]
    void_percent: f64,
    #[arg(long, default_value_t = 8.0, help = "Letting agent fee, percent of rent")]
    letting_fee_percent: f64,
    #[arg(long, default_value_t = 10.0, help = "Management fee, percent of rent")]
    management_fee_percent: f64,
    #[arg(long, default_value_t = 300.0, help = "Landlord insurance per year")]
    annual_insurance: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Maintenance allowance, percent of gross rent"
    )]
    maintenance_percent: f64,
    #[arg(long, default_value_t = 0.0)]
    annual_service_charge: f64,
    #[arg(long, default_value_t = 0.0)]
    annual_ground_rent: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliStrategy::BuyToLet,
        help = "Investment strategy; HMO/SA/flip take their own flags below"
    )]
    strategy: CliStrategy,
    #[arg(long, default_value_t = 0, help = "Lettable rooms, HMO strategy only")]
    hmo_rooms: u32,
    #[arg(long, default_value_t = 0.0, help = "Monthly rent per room, HMO only")]
    hmo_rent_per_room: f64,
    #[arg(long, default_value_t = 0.0, help = "Nightly rate, serviced accommodation only")]
    sa_nightly_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Occupancy percent, serviced accommodation only"
    )]
    sa_occupancy_percent: f64,
    #[arg(long, default_value_t = 0.0, help = "Expected resale price, flip only")]
    flip_resale_price: f64,
    #[arg(long, default_value_t = 6, help = "Months to refurbish and sell, flip only")]
    flip_holding_months: u32,
    #[arg(long, default_value_t = 24, help = "Forecast horizon in months")]
    forecast_months: u32,
    #[arg(long, default_value_t = 0.0, help = "Annual rent growth percent")]
    rent_growth_percent: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual expense inflation percent")]
    expense_inflation_percent: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual capital growth percent")]
    capital_growth_percent: f64,
    #[arg(long, default_value_t = 0.30, help = "Deal-score weight: cash flow")]
    score_weight_cash_flow: f64,
    #[arg(long, default_value_t = 0.25, help = "Deal-score weight: ROI")]
    score_weight_roi: f64,
    #[arg(long, default_value_t = 0.20, help = "Deal-score weight: stress risk")]
    score_weight_risk: f64,
    #[arg(long, default_value_t = 0.15, help = "Deal-score weight: growth")]
    score_weight_growth: f64,
    #[arg(long, default_value_t = 0.10, help = "Deal-score weight: exit options")]
    score_weight_exit_options: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnalyzePayload {
    price: Option<f64>,
    deposit_percent: Option<f64>,
    mortgage_rate_percent: Option<f64>,
    mortgage_term_years: Option<f64>,
    finance_mode: Option<ApiFinanceMode>,

    legal_fees: Option<f64>,
    survey_fees: Option<f64>,
    broker_fees: Option<f64>,
    refurbishment: Option<f64>,

    monthly_rent: Option<f64>,
    void_percent: Option<f64>,
    letting_fee_percent: Option<f64>,
    management_fee_percent: Option<f64>,
    annual_insurance: Option<f64>,
    maintenance_percent: Option<f64>,
    annual_service_charge: Option<f64>,
    annual_ground_rent: Option<f64>,

    strategy: Option<ApiStrategy>,
    hmo_rooms: Option<u32>,
    hmo_rent_per_room: Option<f64>,
    sa_nightly_rate: Option<f64>,
    sa_occupancy_percent: Option<f64>,
    flip_resale_price: Option<f64>,
    flip_holding_months: Option<u32>,

    forecast_months: Option<u32>,
    rent_growth_percent: Option<f64>,
    expense_inflation_percent: Option<f64>,
    capital_growth_percent: Option<f64>,

    score_weight_cash_flow: Option<f64>,
    score_weight_roi: Option<f64>,
    score_weight_risk: Option<f64>,
    score_weight_growth: Option<f64>,
    score_weight_exit_options: Option<f64>,
}

#[derive(Debug, Clone)]
struct ApiOptions {
    forecast_months: u32,
    growth: GrowthAssumptions,
    capital_growth_percent: f64,
    score_config: ScoreConfig,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: PropertyFinancialInputs,
    mode: FinanceMode,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    finance_mode: ApiFinanceMode,
    forecast_months: u32,
    metrics: MetricsResult,
    stress: Vec<StressOutcome>,
    forecast: Vec<ForecastPoint>,
    score: DealScoreBreakdown,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn percent_in_range(value: f64, flag: &str) -> Result<(), String> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(format!("{flag} must be between 0 and 100"));
    }
    Ok(())
}

fn non_negative(value: f64, flag: &str) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{flag} must be >= 0"));
    }
    Ok(())
}

fn build_strategy(cli: &Cli) -> Result<Strategy, String> {
    match cli.strategy {
        CliStrategy::BuyToLet => Ok(Strategy::BuyToLet),
        CliStrategy::Hmo => {
            if cli.hmo_rooms == 0 {
                return Err("--hmo-rooms must be >= 1 for the hmo strategy".to_string());
            }
            if !cli.hmo_rent_per_room.is_finite() || cli.hmo_rent_per_room <= 0.0 {
                return Err("--hmo-rent-per-room must be > 0 for the hmo strategy".to_string());
            }
            Ok(Strategy::Hmo {
                rooms: cli.hmo_rooms,
                rent_per_room: cli.hmo_rent_per_room,
            })
        }
        CliStrategy::ServicedAccommodation => {
            if !cli.sa_nightly_rate.is_finite() || cli.sa_nightly_rate <= 0.0 {
                return Err(
                    "--sa-nightly-rate must be > 0 for the serviced-accommodation strategy"
                        .to_string(),
                );
            }
            percent_in_range(cli.sa_occupancy_percent, "--sa-occupancy-percent")?;
            Ok(Strategy::ServicedAccommodation {
                nightly_rate: cli.sa_nightly_rate,
                occupancy_percent: cli.sa_occupancy_percent,
            })
        }
        CliStrategy::Flip => {
            if !cli.flip_resale_price.is_finite() || cli.flip_resale_price <= 0.0 {
                return Err("--flip-resale-price must be > 0 for the flip strategy".to_string());
            }
            if cli.flip_holding_months == 0 {
                return Err("--flip-holding-months must be >= 1 for the flip strategy".to_string());
            }
            Ok(Strategy::Flip {
                expected_resale_price: cli.flip_resale_price,
                holding_months: cli.flip_holding_months,
            })
        }
    }
}

fn build_inputs(cli: &Cli) -> Result<(PropertyFinancialInputs, FinanceMode), String> {
    if !cli.price.is_finite() || cli.price <= 0.0 {
        return Err("--price must be > 0".to_string());
    }
    percent_in_range(cli.deposit_percent, "--deposit-percent")?;
    percent_in_range(cli.mortgage_rate_percent, "--mortgage-rate-percent")?;
    if !cli.mortgage_term_years.is_finite() || cli.mortgage_term_years <= 0.0 {
        return Err("--mortgage-term-years must be > 0".to_string());
    }

    non_negative(cli.legal_fees, "--legal-fees")?;
    non_negative(cli.survey_fees, "--survey-fees")?;
    non_negative(cli.broker_fees, "--broker-fees")?;
    non_negative(cli.refurbishment, "--refurbishment")?;
    non_negative(cli.monthly_rent, "--monthly-rent")?;
    non_negative(cli.annual_insurance, "--annual-insurance")?;
    non_negative(cli.annual_service_charge, "--annual-service-charge")?;
    non_negative(cli.annual_ground_rent, "--annual-ground-rent")?;

    percent_in_range(cli.void_percent, "--void-percent")?;
    percent_in_range(cli.letting_fee_percent, "--letting-fee-percent")?;
    percent_in_range(cli.management_fee_percent, "--management-fee-percent")?;
    percent_in_range(cli.maintenance_percent, "--maintenance-percent")?;

    let strategy = build_strategy(cli)?;

    Ok((
        PropertyFinancialInputs {
            price: cli.price,
            deposit_percent: cli.deposit_percent,
            mortgage_rate_percent: cli.mortgage_rate_percent,
            mortgage_term_years: cli.mortgage_term_years,
            legal_fees: cli.legal_fees,
            survey_fees: cli.survey_fees,
            broker_fees: cli.broker_fees,
            refurbishment: cli.refurbishment,
            monthly_rent: cli.monthly_rent,
            void_percent: cli.void_percent,
            letting_fee_percent: cli.letting_fee_percent,
            management_fee_percent: cli.management_fee_percent,
            annual_insurance: cli.annual_insurance,
            maintenance_percent: cli.maintenance_percent,
            annual_service_charge: cli.annual_service_charge,
            annual_ground_rent: cli.annual_ground_rent,
            strategy,
        },
        cli.finance_mode.into(),
    ))
}

fn build_options(cli: &Cli) -> Result<ApiOptions, String> {
    if cli.forecast_months > MAX_FORECAST_MONTHS {
        return Err(format!(
            "--forecast-months must be <= {MAX_FORECAST_MONTHS}"
        ));
    }
    for (value, flag) in [
        (cli.rent_growth_percent, "--rent-growth-percent"),
        (cli.expense_inflation_percent, "--expense-inflation-percent"),
        (cli.capital_growth_percent, "--capital-growth-percent"),
    ] {
        if !value.is_finite() || value <= -100.0 {
            return Err(format!("{flag} must be > -100"));
        }
    }

    let weights = ScoreWeights {
        cash_flow: cli.score_weight_cash_flow,
        roi: cli.score_weight_roi,
        risk: cli.score_weight_risk,
        growth: cli.score_weight_growth,
        exit_options: cli.score_weight_exit_options,
    };
    for (value, flag) in [
        (weights.cash_flow, "--score-weight-cash-flow"),
        (weights.roi, "--score-weight-roi"),
        (weights.risk, "--score-weight-risk"),
        (weights.growth, "--score-weight-growth"),
        (weights.exit_options, "--score-weight-exit-options"),
    ] {
        non_negative(value, flag)?;
    }
    if weights.sum() <= 0.0 {
        return Err("--score-weight-* values must sum to a positive total".to_string());
    }

    Ok(ApiOptions {
        forecast_months: cli.forecast_months,
        growth: GrowthAssumptions {
            annual_rent_growth_percent: cli.rent_growth_percent,
            annual_expense_inflation_percent: cli.expense_inflation_percent,
        },
        capital_growth_percent: cli.capital_growth_percent,
        score_config: ScoreConfig {
            weights,
            ..ScoreConfig::default()
        },
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        price: 250_000.0,
        deposit_percent: 25.0,
        mortgage_rate_percent: 5.5,
        mortgage_term_years: 25.0,
        finance_mode: CliFinanceMode::Repayment,
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
        strategy: CliStrategy::BuyToLet,
        hmo_rooms: 0,
        hmo_rent_per_room: 0.0,
        sa_nightly_rate: 0.0,
        sa_occupancy_percent: 0.0,
        flip_resale_price: 0.0,
        flip_holding_months: 6,
        forecast_months: 24,
        rent_growth_percent: 0.0,
        expense_inflation_percent: 0.0,
        capital_growth_percent: 0.0,
        score_weight_cash_flow: 0.30,
        score_weight_roi: 0.25,
        score_weight_risk: 0.20,
        score_weight_growth: 0.15,
        score_weight_exit_options: 0.10,
    }
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<AnalyzePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: AnalyzePayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.price {
        cli.price = v;
    }
    if let Some(v) = payload.deposit_percent {
        cli.deposit_percent = v;
    }
    if let Some(v) = payload.mortgage_rate_percent {
        cli.mortgage_rate_percent = v;
    }
    if let Some(v) = payload.mortgage_term_years {
        cli.mortgage_term_years = v;
    }
    if let Some(v) = payload.finance_mode {
        cli.finance_mode = v.into();
    }

    if let Some(v) = payload.legal_fees {
        cli.legal_fees = v;
    }
    if let Some(v) = payload.survey_fees {
        cli.survey_fees = v;
    }
    if let Some(v) = payload.broker_fees {
        cli.broker_fees = v;
    }
    if let Some(v) = payload.refurbishment {
        cli.refurbishment = v;
    }

    if let Some(v) = payload.monthly_rent {
        cli.monthly_rent = v;
    }
    if let Some(v) = payload.void_percent {
        cli.void_percent = v;
    }
    if let Some(v) = payload.letting_fee_percent {
        cli.letting_fee_percent = v;
    }
    if let Some(v) = payload.management_fee_percent {
        cli.management_fee_percent = v;
    }
    if let Some(v) = payload.annual_insurance {
        cli.annual_insurance = v;
    }
    if let Some(v) = payload.maintenance_percent {
        cli.maintenance_percent = v;
    }
    if let Some(v) = payload.annual_service_charge {
        cli.annual_service_charge = v;
    }
    if let Some(v) = payload.annual_ground_rent {
        cli.annual_ground_rent = v;
    }

    if let Some(v) = payload.strategy {
        cli.strategy = v.into();
    }
    if let Some(v) = payload.hmo_rooms {
        cli.hmo_rooms = v;
    }
    if let Some(v) = payload.hmo_rent_per_room {
        cli.hmo_rent_per_room = v;
    }
    if let Some(v) = payload.sa_nightly_rate {
        cli.sa_nightly_rate = v;
    }
    if let Some(v) = payload.sa_occupancy_percent {
        cli.sa_occupancy_percent = v;
    }
    if let Some(v) = payload.flip_resale_price {
        cli.flip_resale_price = v;
    }
    if let Some(v) = payload.flip_holding_months {
        cli.flip_holding_months = v;
    }

    if let Some(v) = payload.forecast_months {
        cli.forecast_months = v;
    }
    if let Some(v) = payload.rent_growth_percent {
        cli.rent_growth_percent = v;
    }
    if let Some(v) = payload.expense_inflation_percent {
        cli.expense_inflation_percent = v;
    }
    if let Some(v) = payload.capital_growth_percent {
        cli.capital_growth_percent = v;
    }
    if let Some(v) = payload.score_weight_cash_flow {
        cli.score_weight_cash_flow = v;
    }
    if let Some(v) = payload.score_weight_roi {
        cli.score_weight_roi = v;
    }
    if let Some(v) = payload.score_weight_risk {
        cli.score_weight_risk = v;
    }
    if let Some(v) = payload.score_weight_growth {
        cli.score_weight_growth = v;
    }
    if let Some(v) = payload.score_weight_exit_options {
        cli.score_weight_exit_options = v;
    }

    let (inputs, mode) = build_inputs(&cli)?;
    let options = build_options(&cli)?;
    Ok(ApiRequest {
        inputs,
        mode,
        options,
    })
}

fn build_analyze_response(request: &ApiRequest) -> AnalyzeResponse {
    let ApiRequest {
        inputs,
        mode,
        options,
    } = request;

    let metrics = compute_metrics(inputs, *mode);
    let stress = run_stress_tests(inputs, *mode, &standard_battery());
    let forecast = project_forecast(inputs, *mode, options.forecast_months, &options.growth);

    let risk = RiskInputs {
        classifications: stress.iter().map(|o| o.classification).collect(),
    };
    let growth = GrowthInputs {
        annual_rent_growth_percent: options.growth.annual_rent_growth_percent,
        annual_capital_growth_percent: options.capital_growth_percent,
    };
    let exit = ExitInputs {
        loan_to_value_percent: (100.0 - inputs.deposit_percent).clamp(0.0, 100.0),
        strategy: inputs.strategy.clone(),
    };
    let score = score_deal(&metrics, &risk, &growth, &exit, &options.score_config);

    AnalyzeResponse {
        finance_mode: (*mode).into(),
        forecast_months: options.forecast_months,
        metrics,
        stress,
        forecast,
        score,
    }
}

pub fn run_analyze_cli(raw_args: Vec<String>) -> Result<String, String> {
    let program = raw_args.first().cloned().unwrap_or_else(|| "btl".to_string());
    let args = std::iter::once(program).chain(raw_args.into_iter().skip(2));
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    let (inputs, mode) = build_inputs(&cli)?;
    let options = build_options(&cli)?;
    let response = build_analyze_response(&ApiRequest {
        inputs,
        mode,
        options,
    });
    serde_json::to_string_pretty(&response).map_err(|e| format!("Serialization error: {e}"))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/analyze",
            get(analyze_get_handler).post(analyze_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("btl HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/analyze");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn analyze_get_handler(Query(payload): Query<AnalyzePayload>) -> Response {
    analyze_handler_impl(payload)
}

async fn analyze_post_handler(Json(payload): Json<AnalyzePayload>) -> Response {
    analyze_handler_impl(payload)
}

fn analyze_handler_impl(payload: AnalyzePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    json_response(StatusCode::OK, build_analyze_response(&request))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn build_inputs_accepts_the_defaults() {
        let (inputs, mode) = build_inputs(&sample_cli()).expect("valid inputs");
        assert_approx(inputs.price, 250_000.0);
        assert_approx(inputs.monthly_rent, 1_200.0);
        assert_eq!(mode, FinanceMode::Repayment);
        assert_eq!(inputs.strategy, Strategy::BuyToLet);
    }

    #[test]
    fn build_inputs_rejects_non_positive_price() {
        let mut cli = sample_cli();
        cli.price = 0.0;
        let err = build_inputs(&cli).expect_err("must reject zero price");
        assert!(err.contains("--price"));
    }

    #[test]
    fn build_inputs_rejects_out_of_range_percentages() {
        let mut cli = sample_cli();
        cli.deposit_percent = 120.0;
        let err = build_inputs(&cli).expect_err("must reject deposit > 100%");
        assert!(err.contains("--deposit-percent"));

        let mut cli = sample_cli();
        cli.void_percent = -5.0;
        let err = build_inputs(&cli).expect_err("must reject negative voids");
        assert!(err.contains("--void-percent"));
    }

    #[test]
    fn build_inputs_rejects_non_positive_term() {
        let mut cli = sample_cli();
        cli.mortgage_term_years = 0.0;
        let err = build_inputs(&cli).expect_err("must reject zero term");
        assert!(err.contains("--mortgage-term-years"));
    }

    #[test]
    fn build_inputs_requires_hmo_flags_for_the_hmo_strategy() {
        let mut cli = sample_cli();
        cli.strategy = CliStrategy::Hmo;
        let err = build_inputs(&cli).expect_err("must require room count");
        assert!(err.contains("--hmo-rooms"));

        cli.hmo_rooms = 4;
        let err = build_inputs(&cli).expect_err("must require room rent");
        assert!(err.contains("--hmo-rent-per-room"));

        cli.hmo_rent_per_room = 550.0;
        let (inputs, _) = build_inputs(&cli).expect("valid hmo inputs");
        assert_eq!(
            inputs.strategy,
            Strategy::Hmo {
                rooms: 4,
                rent_per_room: 550.0
            }
        );
    }

    #[test]
    fn build_options_caps_the_forecast_horizon() {
        let mut cli = sample_cli();
        cli.forecast_months = MAX_FORECAST_MONTHS + 1;
        let err = build_options(&cli).expect_err("must cap horizon");
        assert!(err.contains("--forecast-months"));
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "price": 180000,
          "depositPercent": 20,
          "mortgageRatePercent": 4.75,
          "mortgageTermYears": 30,
          "financeMode": "interest-only",
          "monthlyRent": 950,
          "voidPercent": 6,
          "refurbishment": 8000,
          "forecastMonths": 36,
          "rentGrowthPercent": 3,
          "capitalGrowthPercent": 4
        }"#;
        let request = api_request_from_json(json).expect("json should parse");

        assert_approx(request.inputs.price, 180_000.0);
        assert_approx(request.inputs.deposit_percent, 20.0);
        assert_approx(request.inputs.mortgage_rate_percent, 4.75);
        assert_approx(request.inputs.monthly_rent, 950.0);
        assert_approx(request.inputs.refurbishment, 8_000.0);
        assert_eq!(request.mode, FinanceMode::InterestOnly);
        assert_eq!(request.options.forecast_months, 36);
        assert_approx(request.options.growth.annual_rent_growth_percent, 3.0);
        assert_approx(request.options.capital_growth_percent, 4.0);
    }

    #[test]
    fn api_request_from_json_parses_strategy_aliases() {
        let json = r#"{
          "strategy": "hmo",
          "hmoRooms": 5,
          "hmoRentPerRoom": 520
        }"#;
        let request = api_request_from_json(json).expect("json should parse");
        assert_eq!(
            request.inputs.strategy,
            Strategy::Hmo {
                rooms: 5,
                rent_per_room: 520.0
            }
        );

        let json = r#"{ "strategy": "buyToLet" }"#;
        let request = api_request_from_json(json).expect("alias should parse");
        assert_eq!(request.inputs.strategy, Strategy::BuyToLet);
    }

    #[test]
    fn api_request_from_json_rejects_invalid_merged_inputs() {
        let err = api_request_from_json(r#"{ "price": -1 }"#).expect_err("must reject");
        assert!(err.contains("--price"));
    }

    #[test]
    fn analyze_response_serialization_contains_expected_fields() {
        let cli = sample_cli();
        let (inputs, mode) = build_inputs(&cli).expect("valid inputs");
        let options = build_options(&cli).expect("valid options");
        let response = build_analyze_response(&ApiRequest {
            inputs,
            mode,
            options,
        });

        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"financeMode\""));
        assert!(json.contains("\"metrics\""));
        assert!(json.contains("\"monthlyCashFlow\""));
        assert!(json.contains("\"breakEvenRent\""));
        assert!(json.contains("\"stress\""));
        assert!(json.contains("\"classification\""));
        assert!(json.contains("\"forecast\""));
        assert!(json.contains("\"cumulativeCashFlow\""));
        assert!(json.contains("\"score\""));
        assert!(json.contains("\"exitOptions\""));
    }

    #[test]
    fn analyze_response_wires_stress_results_into_the_risk_score() {
        let mut cli = sample_cli();
        // A heavily cash-positive deal: whole battery should classify positive.
        cli.deposit_percent = 100.0;
        cli.monthly_rent = 2_500.0;
        let (inputs, mode) = build_inputs(&cli).expect("valid inputs");
        let options = build_options(&cli).expect("valid options");
        let response = build_analyze_response(&ApiRequest {
            inputs,
            mode,
            options,
        });

        assert_eq!(response.stress.len(), standard_battery().len());
        assert_approx(response.score.risk, 100.0);
    }

    #[test]
    fn score_weight_overrides_reshape_the_total() {
        let json = r#"{
          "scoreWeightCashFlow": 0,
          "scoreWeightRoi": 0,
          "scoreWeightRisk": 1,
          "scoreWeightGrowth": 0,
          "scoreWeightExitOptions": 0
        }"#;
        let request = api_request_from_json(json).expect("json should parse");
        let response = build_analyze_response(&request);
        assert_approx(response.score.total, response.score.risk);
    }

    #[test]
    fn score_weights_must_sum_to_a_positive_total() {
        let json = r#"{
          "scoreWeightCashFlow": 0,
          "scoreWeightRoi": 0,
          "scoreWeightRisk": 0,
          "scoreWeightGrowth": 0,
          "scoreWeightExitOptions": 0
        }"#;
        let err = api_request_from_json(json).expect_err("must reject all-zero weights");
        assert!(err.contains("--score-weight"));

        let err = api_request_from_json(r#"{ "scoreWeightRoi": -0.5 }"#)
            .expect_err("must reject negative weights");
        assert!(err.contains("--score-weight-roi"));
    }

    #[test]
    fn run_analyze_cli_produces_json_output() {
        let args = vec![
            "btl".to_string(),
            "analyze".to_string(),
            "--price".to_string(),
            "200000".to_string(),
            "--monthly-rent".to_string(),
            "1100".to_string(),
        ];
        let json = run_analyze_cli(args).expect("analysis should succeed");
        assert!(json.contains("\"metrics\""));
        assert!(json.contains("\"score\""));
    }

    #[test]
    fn run_analyze_cli_reports_validation_errors() {
        let args = vec![
            "btl".to_string(),
            "analyze".to_string(),
            "--price".to_string(),
            "200000".to_string(),
            "--monthly-rent".to_string(),
            "1100".to_string(),
            "--deposit-percent".to_string(),
            "150".to_string(),
        ];
        let err = run_analyze_cli(args).expect_err("must reject deposit > 100%");
        assert!(err.contains("--deposit-percent"));
    }
}
