use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;
use validator::Validate;

use crate::{
    api::{
        error::ApiError,
        response::{success, ApiResponse},
    },
    chart::{chart_data, ChartData, ViewMode},
    domain::{ApplianceProfile, Month},
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/consumption", get(get_consumption).put(set_consumption))
        .route("/consumption/yearly", get(get_yearly_data))
        .route("/consumption/monthly/:month", get(get_monthly_data))
        .route("/consumption/daily/:month", get(get_daily_data))
        .route("/chart", get(get_chart))
        .route("/appliances", get(list_appliances))
        .route("/appliances/:id", get(get_appliance).put(upsert_appliance))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConsumptionSummary {
    pub yearly_consumption_kwh: f64,
    pub total_generated_kwh: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct YearlyConsumptionRequest {
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub yearly_consumption_kwh: f64,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub view: Option<ViewMode>,
    pub month: Option<String>,
}

fn parse_month(raw: &str) -> Result<Month, ApiError> {
    Month::from_str(raw).map_err(|_| ApiError::BadRequest(format!("unknown month '{raw}'")))
}

fn summary(state: &AppState) -> ConsumptionSummary {
    state.read(|model| ConsumptionSummary {
        yearly_consumption_kwh: model.yearly_consumption(),
        total_generated_kwh: model.total(),
    })
}

/// GET /api/v1/consumption
pub async fn get_consumption(
    State(st): State<AppState>,
) -> Result<ApiResponse<ConsumptionSummary>, ApiError> {
    Ok(success(summary(&st)))
}

/// PUT /api/v1/consumption - set the yearly total and regenerate
pub async fn set_consumption(
    State(st): State<AppState>,
    Json(req): Json<YearlyConsumptionRequest>,
) -> Result<ApiResponse<ConsumptionSummary>, ApiError> {
    req.validate()?;
    let started = Instant::now();
    st.set_yearly_consumption(req.yearly_consumption_kwh);
    Ok(success(summary(&st)).with_duration(started.elapsed().as_millis() as u64))
}

/// GET /api/v1/consumption/yearly - consumption per month
pub async fn get_yearly_data(State(st): State<AppState>) -> Result<ApiResponse<Vec<f64>>, ApiError> {
    let data = st.read(|model| model.yearly_by_month().to_vec());
    Ok(success(data))
}

/// GET /api/v1/consumption/monthly/:month - consumption per day of a month
pub async fn get_monthly_data(
    State(st): State<AppState>,
    Path(month): Path<String>,
) -> Result<ApiResponse<Vec<f64>>, ApiError> {
    let month = parse_month(&month)?;
    let data = st.read(|model| model.monthly_by_day(month));
    let count = data.len();
    Ok(success(data).with_count(count))
}

/// GET /api/v1/consumption/daily/:month - hourly values of the month's first day
pub async fn get_daily_data(
    State(st): State<AppState>,
    Path(month): Path<String>,
) -> Result<ApiResponse<Vec<f64>>, ApiError> {
    let month = parse_month(&month)?;
    let data = st.read(|model| model.daily_profile(month).to_vec());
    Ok(success(data))
}

/// GET /api/v1/chart?view=year|month|day&month=<name>
pub async fn get_chart(
    State(st): State<AppState>,
    Query(q): Query<ChartQuery>,
) -> Result<ApiResponse<ChartData>, ApiError> {
    let view = q.view.unwrap_or_default();
    let month = match q.month.as_deref() {
        Some(raw) => parse_month(raw)?,
        None => Month::January,
    };
    let chart = st.read(|model| chart_data(view, month, model));
    Ok(success(chart))
}

/// GET /api/v1/appliances
pub async fn list_appliances(
    State(st): State<AppState>,
) -> Result<ApiResponse<Vec<ApplianceProfile>>, ApiError> {
    let profiles = st.read(|model| model.appliance_profiles().to_vec());
    let count = profiles.len();
    Ok(success(profiles).with_count(count))
}

/// GET /api/v1/appliances/:id
pub async fn get_appliance(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ApplianceProfile>, ApiError> {
    st.read(|model| model.appliance_profile(&id).cloned())
        .map(success)
        .ok_or_else(|| ApiError::NotFound(format!("appliance '{id}'")))
}

/// PUT /api/v1/appliances/:id - insert or replace a profile
pub async fn upsert_appliance(
    State(st): State<AppState>,
    Path(id): Path<String>,
    Json(profile): Json<ApplianceProfile>,
) -> Result<ApiResponse<ApplianceProfile>, ApiError> {
    if profile.id != id {
        return Err(ApiError::BadRequest(format!(
            "path id '{id}' does not match body id '{}'",
            profile.id
        )));
    }
    let started = Instant::now();
    let stored = st.upsert_appliance(profile)?;
    Ok(success(stored).with_duration(started.elapsed().as_millis() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("october").unwrap(), Month::October);
        assert!(matches!(parse_month("undecember"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_yearly_request_validation() {
        let ok = YearlyConsumptionRequest { yearly_consumption_kwh: 3500.0 };
        assert!(ok.validate().is_ok());

        let negative = YearlyConsumptionRequest { yearly_consumption_kwh: -1.0 };
        assert!(negative.validate().is_err());
    }
}
