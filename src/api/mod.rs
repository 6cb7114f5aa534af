use axum::{
    Router,
    extract::{Json, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    AmountIssue, CategoryShare, DEFAULT_INFLATION_RATE, DEFAULT_YEARS_TO_HORIZON,
    ExpenseCategories, ExpenseCategory, InflationHorizon, Preset, ProjectionAssumptions,
    ProjectionError, ProjectionResult, category_breakdown, compute_projection, parse_amount,
    validate_amount,
};

mod report;

pub use report::{format_currency, format_percent};
use report::render_text_report;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const MAX_DECIMALS: usize = 6;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPreset {
    Family,
    Household,
}

impl From<CliPreset> for Preset {
    fn from(value: CliPreset) -> Self {
        match value {
            CliPreset::Family => Preset::Family,
            CliPreset::Household => Preset::Household,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiPreset {
    Family,
    Household,
}

impl From<ApiPreset> for CliPreset {
    fn from(value: ApiPreset) -> Self {
        match value {
            ApiPreset::Family => CliPreset::Family,
            ApiPreset::Household => CliPreset::Household,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "nest-egg",
    about = "Household expense totals and 25x nest-egg target, optionally adjusted for inflation"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a projection and print it
    Project(ProjectArgs),
    /// Serve the calculator page and JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone)]
struct ProjectArgs {
    #[arg(
        long,
        value_enum,
        default_value_t = CliPreset::Family,
        help = "Category set and default amounts to start from"
    )]
    preset: CliPreset,
    #[arg(long, help = "Start from an empty category set instead of the preset defaults")]
    clear_defaults: bool,
    #[arg(
        long = "expense",
        value_name = "NAME=AMOUNT",
        help = "Monthly amount for a category; adds it or overrides the preset value"
    )]
    expenses: Vec<String>,
    #[arg(
        long,
        conflicts_with = "withdrawal_rate",
        help = "Nest egg as a multiple of annual spending [default: 25]"
    )]
    withdrawal_multiplier: Option<f64>,
    #[arg(long, help = "Safe withdrawal rate in percent, e.g. 4 for the 25x rule")]
    withdrawal_rate: Option<f64>,
    #[arg(long, help = "Annual inflation in percent [default: 3]")]
    inflation_rate: Option<f64>,
    #[arg(long, help = "Years until retirement for the inflation projection [default: 20]")]
    years_to_horizon: Option<f64>,
    #[arg(long, help = "Skip the inflation-adjusted projection")]
    no_inflation: bool,
    #[arg(long, help = "Decimal places for currency output; defaults to the preset's")]
    decimals: Option<usize>,
    #[arg(long, help = "Print the JSON response instead of a text report")]
    json: bool,
}

#[derive(Debug, Error)]
enum RequestError {
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error("{0}")]
    Invalid(String),
}

impl RequestError {
    fn kind(&self) -> &'static str {
        match self {
            RequestError::Projection(err) => err.kind(),
            RequestError::Invalid(_) => "invalid-request",
        }
    }
}

/// Raw inputs shared by the command line and the JSON payload, before defaults apply.
#[derive(Debug, Clone)]
struct ProjectionSettings {
    preset: CliPreset,
    clear_defaults: bool,
    expenses: Vec<(String, f64)>,
    withdrawal_multiplier: Option<f64>,
    withdrawal_rate: Option<f64>,
    inflation_rate: Option<f64>,
    years_to_horizon: Option<f64>,
    project_inflation: Option<bool>,
    decimals: Option<usize>,
}

#[derive(Debug)]
struct ProjectionRequest {
    preset: Preset,
    categories: ExpenseCategories,
    assumptions: ProjectionAssumptions,
    decimals: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionPayload {
    preset: Option<ApiPreset>,
    clear_defaults: Option<bool>,
    expenses: Option<Vec<ExpensePayload>>,
    withdrawal_multiplier: Option<f64>,
    withdrawal_rate: Option<f64>,
    inflation_rate: Option<f64>,
    years_to_horizon: Option<f64>,
    project_inflation: Option<bool>,
    decimals: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ExpensePayload {
    category: String,
    #[serde(default)]
    amount: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedFigures {
    monthly_total: String,
    annual_total: String,
    nest_egg_today: String,
    nest_egg_future: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    preset: Preset,
    withdrawal_multiplier: f64,
    inflation: Option<InflationHorizon>,
    #[serde(flatten)]
    result: ProjectionResult,
    breakdown: Vec<CategoryShare>,
    decimals: usize,
    formatted: FormattedFigures,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetResponse {
    name: Preset,
    title: &'static str,
    categories: Vec<ExpenseCategory>,
    /// Percent, matching the projection payload.
    inflation_rate: Option<f64>,
    years_to_horizon: Option<f64>,
    decimals: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
}

pub async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Serve { port } => run_http_server(port)
            .await
            .map_err(|e| format!("Server error: {e}")),
        Command::Project(args) => {
            let output = run_project_command(args)?;
            print!("{output}");
            Ok(())
        }
    }
}

fn run_project_command(args: ProjectArgs) -> Result<String, String> {
    let as_json = args.json;
    let settings = settings_from_args(args).map_err(|e| e.to_string())?;
    let request = build_request(settings).map_err(|e| e.to_string())?;
    let response = run_projection(&request).map_err(|e| e.to_string())?;
    debug!(
        monthly_total = response.result.monthly_total,
        nest_egg_today = response.result.nest_egg_today,
        "projection computed"
    );

    if as_json {
        serde_json::to_string_pretty(&response)
            .map(|json| format!("{json}\n"))
            .map_err(|e| format!("Failed to serialize projection: {e}"))
    } else {
        Ok(render_text_report(&response))
    }
}

fn settings_from_args(args: ProjectArgs) -> Result<ProjectionSettings, RequestError> {
    let mut expenses = Vec::with_capacity(args.expenses.len());
    for raw in &args.expenses {
        expenses.push(parse_expense_arg(raw)?);
    }

    Ok(ProjectionSettings {
        preset: args.preset,
        clear_defaults: args.clear_defaults,
        expenses,
        withdrawal_multiplier: args.withdrawal_multiplier,
        withdrawal_rate: args.withdrawal_rate,
        inflation_rate: args.inflation_rate,
        years_to_horizon: args.years_to_horizon,
        project_inflation: if args.no_inflation { Some(false) } else { None },
        decimals: args.decimals,
    })
}

fn parse_expense_arg(raw: &str) -> Result<(String, f64), RequestError> {
    let Some((name, amount)) = raw.rsplit_once('=') else {
        return Err(RequestError::Invalid(format!(
            "--expense expects NAME=AMOUNT, got {raw:?}"
        )));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(RequestError::Invalid(format!(
            "--expense category name must not be empty, got {raw:?}"
        )));
    }
    Ok((name.to_string(), parse_amount(name, amount)?))
}

fn build_request(settings: ProjectionSettings) -> Result<ProjectionRequest, RequestError> {
    let preset: Preset = settings.preset.into();

    let mut categories = if settings.clear_defaults {
        ExpenseCategories::new()
    } else {
        preset.categories()
    };
    for (name, amount) in settings.expenses {
        categories.insert(name, amount);
    }

    let mut assumptions = match (settings.withdrawal_multiplier, settings.withdrawal_rate) {
        (Some(_), Some(_)) => {
            return Err(RequestError::Invalid(
                "set either the withdrawal multiplier or the withdrawal rate, not both"
                    .to_string(),
            ));
        }
        (None, Some(rate)) => ProjectionAssumptions::from_withdrawal_rate(rate / 100.0)?,
        (Some(multiplier), None) => ProjectionAssumptions {
            withdrawal_multiplier: multiplier,
            inflation: None,
        },
        (None, None) => ProjectionAssumptions::default(),
    };

    let project_inflation = settings.project_inflation.unwrap_or(
        settings.inflation_rate.is_some()
            || settings.years_to_horizon.is_some()
            || preset.default_inflation().is_some(),
    );
    if project_inflation {
        let (default_rate, default_years) = preset
            .default_inflation()
            .unwrap_or((DEFAULT_INFLATION_RATE, DEFAULT_YEARS_TO_HORIZON));
        assumptions = assumptions.with_inflation(
            settings
                .inflation_rate
                .map(|pct| pct / 100.0)
                .unwrap_or(default_rate),
            settings.years_to_horizon.unwrap_or(default_years),
        );
    }

    let decimals = settings.decimals.unwrap_or(preset.display_decimals());
    if decimals > MAX_DECIMALS {
        return Err(RequestError::Invalid(format!(
            "decimals must be <= {MAX_DECIMALS}"
        )));
    }

    Ok(ProjectionRequest {
        preset,
        categories,
        assumptions,
        decimals,
    })
}

fn run_projection(request: &ProjectionRequest) -> Result<ProjectionResponse, RequestError> {
    let result = compute_projection(&request.categories, &request.assumptions)?;
    let breakdown = category_breakdown(&request.categories)?;
    let decimals = request.decimals;

    Ok(ProjectionResponse {
        preset: request.preset,
        withdrawal_multiplier: request.assumptions.withdrawal_multiplier,
        inflation: request.assumptions.inflation,
        result,
        breakdown,
        decimals,
        formatted: FormattedFigures {
            monthly_total: format_currency(result.monthly_total, decimals),
            annual_total: format_currency(result.annual_total, decimals),
            nest_egg_today: format_currency(result.nest_egg_today, decimals),
            nest_egg_future: result
                .nest_egg_future
                .map(|value| format_currency(value, decimals)),
        },
    })
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/presets", get(presets_handler))
        .route("/api/projection", post(projection_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "nest-egg HTTP API listening");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        ErrorResponse {
            error: "Not found".to_string(),
            kind: "not-found",
        },
    )
}

async fn presets_handler() -> Response {
    json_response(StatusCode::OK, preset_responses())
}

async fn projection_handler(payload: Result<Json<ProjectionPayload>, JsonRejection>) -> Response {
    let outcome = payload
        .map_err(|rejection| {
            RequestError::Invalid(format!(
                "Invalid API JSON payload: {}",
                rejection.body_text()
            ))
        })
        .and_then(|Json(payload)| {
            debug!(?payload, "projection request");
            api_request_from_payload(payload)
        })
        .and_then(|request| run_projection(&request));
    match outcome {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "rejected projection request");
            error_response(StatusCode::BAD_REQUEST, &err)
        }
    }
}

fn preset_responses() -> Vec<PresetResponse> {
    Preset::ALL
        .into_iter()
        .map(|preset| {
            let inflation = preset.default_inflation();
            PresetResponse {
                name: preset,
                title: preset.title(),
                categories: preset.categories().iter().cloned().collect(),
                inflation_rate: inflation.map(|(rate, _)| rate * 100.0),
                years_to_horizon: inflation.map(|(_, years)| years),
                decimals: preset.display_decimals(),
            }
        })
        .collect()
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, err: &RequestError) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: err.to_string(),
            kind: err.kind(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ProjectionRequest, RequestError> {
    let payload = serde_json::from_str::<ProjectionPayload>(json)
        .map_err(|e| RequestError::Invalid(format!("Invalid API JSON payload: {e}")))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: ProjectionPayload) -> Result<ProjectionRequest, RequestError> {
    let mut settings = default_settings_for_api();

    if let Some(v) = payload.preset {
        settings.preset = v.into();
    }
    if let Some(v) = payload.clear_defaults {
        settings.clear_defaults = v;
    }
    if let Some(expenses) = payload.expenses {
        for expense in expenses {
            let name = expense.category.trim().to_string();
            if name.is_empty() {
                return Err(RequestError::Invalid(
                    "expense category name must not be empty".to_string(),
                ));
            }
            let amount = coerce_amount(&name, &expense.amount)?;
            settings.expenses.push((name, amount));
        }
    }
    settings.withdrawal_multiplier = payload.withdrawal_multiplier;
    settings.withdrawal_rate = payload.withdrawal_rate;
    settings.inflation_rate = payload.inflation_rate;
    settings.years_to_horizon = payload.years_to_horizon;
    settings.project_inflation = payload.project_inflation;
    settings.decimals = payload.decimals;

    build_request(settings)
}

/// Form fields arrive as JSON numbers or as the raw text typed into the field.
fn coerce_amount(category: &str, raw: &Value) -> Result<f64, ProjectionError> {
    match raw {
        Value::Number(number) => match number.as_f64() {
            Some(value) => validate_amount(category, value),
            None => Err(ProjectionError::amount(category, AmountIssue::NotANumber)),
        },
        Value::String(text) => parse_amount(category, text),
        _ => Err(ProjectionError::amount(category, AmountIssue::NotANumber)),
    }
}

fn default_settings_for_api() -> ProjectionSettings {
    ProjectionSettings {
        preset: CliPreset::Family,
        clear_defaults: false,
        expenses: Vec::new(),
        withdrawal_multiplier: None,
        withdrawal_rate: None,
        inflation_rate: None,
        years_to_horizon: None,
        project_inflation: None,
        decimals: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn project_args(argv: &[&str]) -> ProjectArgs {
        let mut full = vec!["nest-egg", "project"];
        full.extend_from_slice(argv);
        let cli = Cli::try_parse_from(full).expect("arguments should parse");
        match cli.command {
            Command::Project(args) => args,
            other => panic!("expected project command, got {other:?}"),
        }
    }

    fn request_from_argv(argv: &[&str]) -> Result<ProjectionRequest, RequestError> {
        build_request(settings_from_args(project_args(argv))?)
    }

    async fn post_projection(body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/projection")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        let response = router().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&header::HeaderValue::from_static("no-store"))
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let json = serde_json::from_slice(&bytes).expect("body should be JSON");
        (status, json)
    }

    #[tokio::test]
    async fn malformed_payloads_return_json_error_bodies() {
        for body in [
            r#"{"inflationRate": "3"}"#,
            r#"{"preset": "retired"}"#,
            r#"{"expenses": [{"amount": 5}]}"#,
            r#"{"decimals": -1}"#,
            "{not json",
        ] {
            let (status, json) = post_projection(body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(json["kind"], "invalid-request", "body {body}");
            let message = json["error"].as_str().expect("error message");
            assert!(message.starts_with("Invalid API JSON payload"), "{message}");
        }
    }

    #[tokio::test]
    async fn missing_content_type_is_an_invalid_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/projection")
            .body(Body::from("{}"))
            .expect("valid request");
        let response = router().oneshot(request).await.expect("router is infallible");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let json: Value = serde_json::from_slice(&bytes).expect("body should be JSON");
        assert_eq!(json["kind"], "invalid-request");
    }

    #[tokio::test]
    async fn router_projects_valid_payload_and_flags_bad_amounts() {
        let (status, json) = post_projection("{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["formatted"]["nestEggToday"], "$1,740,000.00");

        let (status, json) =
            post_projection(r#"{"expenses": [{"category": "Food", "amount": "-$5"}]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "invalid-amount");
        assert_eq!(json["error"], "Food amount must be >= 0");
    }

    #[test]
    fn empty_payload_uses_family_preset_with_inflation() {
        let request = api_request_from_json("{}").expect("json should parse");
        assert_eq!(request.preset, Preset::Family);
        assert_eq!(request.categories.len(), 8);
        assert_eq!(request.decimals, 2);
        assert_approx(request.assumptions.withdrawal_multiplier, 25.0);

        let horizon = request.assumptions.inflation.expect("family projects inflation");
        assert_approx(horizon.inflation_rate, 0.03);
        assert_approx(horizon.years_to_horizon, 20.0);
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "preset": "household",
          "expenses": [
            {"category": "Housing", "amount": 1800},
            {"category": "Shopping", "amount": "$1,250.50"},
            {"category": "Pets", "amount": " 75 "}
          ],
          "withdrawalRate": 4,
          "inflationRate": 2.5,
          "yearsToHorizon": 15,
          "decimals": 2
        }"#;
        let request = api_request_from_json(json).expect("json should parse");

        assert_eq!(request.preset, Preset::Household);
        assert_eq!(request.categories.len(), 11);
        assert_eq!(request.categories.get("Housing"), Some(1800.0));
        assert_eq!(request.categories.get("Shopping"), Some(1250.5));
        assert_eq!(request.categories.get("Pets"), Some(75.0));
        assert_approx(request.assumptions.withdrawal_multiplier, 25.0);
        let horizon = request.assumptions.inflation.expect("inflation requested");
        assert_approx(horizon.inflation_rate, 0.025);
        assert_approx(horizon.years_to_horizon, 15.0);
        assert_eq!(request.decimals, 2);
    }

    #[test]
    fn household_preset_skips_inflation_unless_asked() {
        let request =
            api_request_from_json(r#"{"preset": "household"}"#).expect("json should parse");
        assert!(request.assumptions.inflation.is_none());
        assert_eq!(request.decimals, 0);

        let request = api_request_from_json(r#"{"preset": "household", "yearsToHorizon": 10}"#)
            .expect("json should parse");
        let horizon = request.assumptions.inflation.expect("inflation requested");
        assert_approx(horizon.inflation_rate, 0.03);
        assert_approx(horizon.years_to_horizon, 10.0);
    }

    #[test]
    fn project_inflation_false_disables_family_projection() {
        let request = api_request_from_json(r#"{"projectInflation": false}"#)
            .expect("json should parse");
        assert!(request.assumptions.inflation.is_none());
    }

    #[test]
    fn non_numeric_amounts_are_invalid_amount_errors() {
        for amount in [r#""twelve""#, "true", "null", "[1]", r#""-20""#] {
            let json = format!(r#"{{"expenses": [{{"category": "Food", "amount": {amount}}}]}}"#);
            let err = api_request_from_json(&json).expect_err("must reject amount");
            assert_eq!(err.kind(), "invalid-amount", "amount {amount}");
            assert!(err.to_string().starts_with("Food amount"));
        }
    }

    #[test]
    fn missing_amount_is_not_a_number() {
        let err = api_request_from_json(r#"{"expenses": [{"category": "Food"}]}"#)
            .expect_err("must reject missing amount");
        assert_eq!(err.kind(), "invalid-amount");
    }

    #[test]
    fn blank_category_name_is_rejected() {
        let err = api_request_from_json(r#"{"expenses": [{"category": "  ", "amount": 1}]}"#)
            .expect_err("must reject blank name");
        assert_eq!(err.kind(), "invalid-request");
    }

    #[test]
    fn multiplier_and_rate_together_are_rejected() {
        let err = api_request_from_json(r#"{"withdrawalMultiplier": 25, "withdrawalRate": 4}"#)
            .expect_err("must reject both");
        assert_eq!(err.kind(), "invalid-request");
    }

    #[test]
    fn zero_multiplier_surfaces_invalid_assumption() {
        let request = api_request_from_json(r#"{"withdrawalMultiplier": 0}"#)
            .expect("request builds; the calculator validates");
        let err = run_projection(&request).expect_err("must reject multiplier");
        assert_eq!(err.kind(), "invalid-assumption");
        assert!(err.to_string().contains("withdrawal_multiplier"));
    }

    #[test]
    fn negative_inflation_surfaces_invalid_assumption() {
        let request = api_request_from_json(r#"{"inflationRate": -1}"#).expect("json should parse");
        let err = run_projection(&request).expect_err("must reject inflation");
        assert_eq!(err.kind(), "invalid-assumption");
    }

    #[test]
    fn excessive_decimals_are_rejected() {
        let err =
            api_request_from_json(r#"{"decimals": 12}"#).expect_err("must reject decimals");
        assert_eq!(err.kind(), "invalid-request");
    }

    #[test]
    fn cli_expenses_override_and_extend_preset() {
        let request = request_from_argv(&[
            "--expense",
            "Housing=2500",
            "--expense",
            "Vacation=$1,200",
            "--no-inflation",
        ])
        .expect("valid arguments");

        assert_eq!(request.categories.get("Housing"), Some(2500.0));
        assert_eq!(request.categories.get("Vacation"), Some(1200.0));
        assert_eq!(request.categories.len(), 9);
        assert!(request.assumptions.inflation.is_none());
    }

    #[test]
    fn cli_clear_defaults_uses_only_listed_expenses() {
        let request = request_from_argv(&[
            "--clear-defaults",
            "--expense",
            "Rent=1000",
            "--withdrawal-multiplier",
            "30",
        ])
        .expect("valid arguments");

        assert_eq!(request.categories.len(), 1);
        assert_approx(request.assumptions.withdrawal_multiplier, 30.0);

        let response = run_projection(&request).expect("valid projection");
        assert_approx(response.result.nest_egg_today, 360_000.0);
    }

    #[test]
    fn cli_rejects_malformed_expense() {
        let err = request_from_argv(&["--expense", "Housing"]).expect_err("must reject");
        assert!(err.to_string().contains("--expense"));

        let err = request_from_argv(&["--expense", "=100"]).expect_err("must reject");
        assert_eq!(err.kind(), "invalid-request");

        let err = request_from_argv(&["--expense", "Food=-3"]).expect_err("must reject");
        assert_eq!(err.kind(), "invalid-amount");
    }

    #[test]
    fn cli_multiplier_conflicts_with_rate() {
        let result = Cli::try_parse_from([
            "nest-egg",
            "project",
            "--withdrawal-multiplier",
            "25",
            "--withdrawal-rate",
            "4",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_serve_defaults_to_port_8080() {
        let cli = Cli::try_parse_from(["nest-egg", "serve"]).expect("arguments should parse");
        match cli.command {
            Command::Serve { port } => assert_eq!(port, 8080),
            other => panic!("expected serve command, got {other:?}"),
        }
    }

    #[test]
    fn projection_response_serialization_contains_expected_fields() {
        let request = api_request_from_json("{}").expect("json should parse");
        let response = run_projection(&request).expect("valid projection");
        let json = serde_json::to_value(&response).expect("response should serialize");

        assert_eq!(json["preset"], "family");
        assert_eq!(json["monthlyTotal"], 5800.0);
        assert_eq!(json["annualTotal"], 69_600.0);
        assert_eq!(json["nestEggToday"], 1_740_000.0);
        assert!(json["nestEggFuture"].is_number());
        assert_eq!(json["inflation"]["yearsToHorizon"], 20.0);
        assert_eq!(json["breakdown"][0]["name"], "Housing");
        assert_eq!(json["breakdown"][0]["monthlyAmount"], 2000.0);
        assert_eq!(json["formatted"]["monthlyTotal"], "$5,800.00");
        assert_eq!(json["formatted"]["nestEggToday"], "$1,740,000.00");
        assert_eq!(json["formatted"]["nestEggFuture"], "$3,142,633.55");
    }

    #[test]
    fn household_response_formats_without_decimals() {
        let json = r#"{"preset": "household", "expenses": [{"category": "Housing", "amount": 1500}]}"#;
        let request = api_request_from_json(json).expect("json should parse");
        let response = run_projection(&request).expect("valid projection");

        assert_eq!(response.formatted.monthly_total, "$1,500");
        assert_eq!(response.formatted.nest_egg_today, "$450,000");
        assert_eq!(response.formatted.nest_egg_future, None);
    }

    #[test]
    fn text_report_lists_metrics_and_breakdown() {
        let output = run_project_command(project_args(&[])).expect("valid projection");

        assert!(output.starts_with("Family Expense & Nest Egg Calculator"));
        assert!(output.contains("Total Monthly Expenses  $5,800.00"));
        assert!(output.contains("Total Annual Expenses   $69,600.00"));
        assert!(output.contains("$1,740,000.00  (25x annual spending, today's dollars)"));
        assert!(output.contains("$3,142,633.55  (in 20 years at 3.0% inflation)"));
        assert!(output.contains("Expense Breakdown"));
        assert!(output.contains("34.5%"));
    }

    #[test]
    fn breakdown_columns_align_for_non_ascii_names() {
        let output = run_project_command(project_args(&[
            "--clear-defaults",
            "--expense",
            "Housing=100",
            "--expense",
            "Café crème=100",
            "--no-inflation",
        ]))
        .expect("valid projection");

        let dollar_column = |name: &str| {
            output
                .lines()
                .find(|line| line.contains(name))
                .and_then(|line| line.chars().position(|c| c == '$'))
                .expect("row with an amount")
        };
        assert_eq!(dollar_column("Housing"), dollar_column("Café crème"));
    }

    #[test]
    fn json_output_is_parseable() {
        let output = run_project_command(project_args(&["--json", "--preset", "household"]))
            .expect("valid projection");
        let json: Value = serde_json::from_str(&output).expect("output should be JSON");
        assert_eq!(json["preset"], "household");
        assert_eq!(json["monthlyTotal"], 0.0);
        assert!(json["nestEggFuture"].is_null());
    }

    #[test]
    fn presets_endpoint_reports_percent_inflation() {
        let presets = preset_responses();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].name, Preset::Family);
        assert_approx(presets[0].inflation_rate.expect("family inflation"), 3.0);
        assert_eq!(presets[1].years_to_horizon, None);
        assert_eq!(presets[1].categories.len(), 10);
    }
}
