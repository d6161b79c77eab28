//! Health metric endpoints.
//!
//! - `POST /api/metrics/bmi` — compute BMI and describe the reading

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::UserContext;
use crate::bmi;
use crate::models::enums::{BmiCategory, UnitSystem};
use crate::models::HealthMetric;

#[derive(Debug, Deserialize)]
pub struct BmiRequest {
    pub height: f64,
    pub weight: f64,
    #[serde(default, deserialize_with = "unit_or_metric")]
    pub unit: UnitSystem,
}

/// Only `"imperial"` selects imperial units; anything else, including
/// null and unknown strings, is metric.
fn unit_or_metric<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UnitSystem, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if s == UnitSystem::Imperial.as_str() => UnitSystem::Imperial,
        _ => UnitSystem::Metric,
    })
}

#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub bmi: f64,
    pub category: BmiCategory,
    pub metric: HealthMetric,
}

/// `POST /api/metrics/bmi` — metric (cm/kg) by default, or imperial (in/lb).
pub async fn bmi(
    Extension(user): Extension<UserContext>,
    payload: Result<Json<BmiRequest>, JsonRejection>,
) -> Result<Json<BmiResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let result = bmi::compute_bmi(request.height, request.weight, request.unit)?;
    let metric = bmi::bmi_metric(
        &user.user_id,
        request.height,
        request.weight,
        request.unit,
        &result,
    );

    Ok(Json(BmiResponse {
        bmi: result.bmi,
        category: result.category,
        metric,
    }))
}
