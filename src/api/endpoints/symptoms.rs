//! Symptom check endpoints.
//!
//! - `POST /api/symptoms/analyze` — analyze and store a symptom check
//! - `GET /api/symptoms/history` — caller's checks, newest first
//! - `GET /api/symptoms/analytics` — aggregate report over all checks
//! - `DELETE /api/symptoms/:id` — delete one of the caller's checks

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis;
use crate::analytics::{self, AnalyticsReport};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::{self, SortOrder};
use crate::models::enums::Severity;
use crate::models::SymptomRecord;

/// Raw body; shape is checked by [`AnalyzeRequest::validate`] so that
/// every violation gets a specific message.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub symptoms: Value,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

/// A request that passed boundary validation.
#[derive(Debug, PartialEq)]
pub struct SymptomCheck {
    pub symptoms: Vec<String>,
    pub duration: String,
    pub severity: Severity,
}

impl AnalyzeRequest {
    pub fn validate(self) -> Result<SymptomCheck, ApiError> {
        let items = match self.symptoms {
            Value::Array(items) => items,
            _ => return Err(ApiError::BadRequest("Symptoms must be an array".into())),
        };
        if items.is_empty() {
            return Err(ApiError::BadRequest("At least one symptom is required".into()));
        }
        let symptoms = items
            .into_iter()
            .map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Ok(s),
                _ => Err(ApiError::BadRequest(
                    "Each symptom must be a non-empty string".into(),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let duration = self
            .duration
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Duration is required".into()))?;

        let severity = self
            .severity
            .as_deref()
            .and_then(|s| s.parse::<Severity>().ok())
            .ok_or_else(|| {
                ApiError::BadRequest("Severity must be one of Mild, Moderate, Severe".into())
            })?;

        Ok(SymptomCheck {
            symptoms,
            duration,
            severity,
        })
    }
}

/// `POST /api/symptoms/analyze` — run the analyzer and persist the check.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SymptomRecord>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let check = request.validate()?;

    let result = analysis::analyze(ctx.core.knowledge(), &check.symptoms);
    let record = SymptomRecord::new(
        user.user_id,
        check.symptoms,
        check.duration,
        check.severity,
        result,
    );

    ctx.core
        .with_db(|conn| db::insert_symptom_record(conn, &record))?;

    tracing::info!(
        record_id = %record.id,
        symptoms = record.symptoms.len(),
        conditions = record.analysis_result.conditions.len(),
        emergency = record.analysis_result.emergency_warning,
        "Symptom check stored"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/symptoms/history` — caller's checks, newest first.
pub async fn history(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Vec<SymptomRecord>>, ApiError> {
    let records = ctx
        .core
        .with_db(|conn| db::list_symptom_records(conn, &user.user_id, SortOrder::NewestFirst))?;
    Ok(Json(records))
}

/// `GET /api/symptoms/analytics` — recomputed from the full history.
pub async fn analytics(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let records = ctx
        .core
        .with_db(|conn| db::list_symptom_records(conn, &user.user_id, SortOrder::OldestFirst))?;
    Ok(Json(analytics::aggregate(&records)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `DELETE /api/symptoms/:id` — owner-only delete.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid record id".into()))?;

    ctx.core
        .with_db(|conn| db::delete_symptom_record(conn, &id, &user.user_id))?;

    tracing::info!(record_id = %id, "Symptom check deleted");

    Ok(Json(MessageResponse {
        message: "Record deleted successfully".into(),
    }))
}
