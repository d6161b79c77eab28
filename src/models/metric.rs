use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MetricType;

/// Reading value, shaped by the metric type it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    BloodPressure { systolic: f64, diastolic: f64 },
    Scalar(f64),
}

impl MetricValue {
    /// Whether this value shape is valid for the given metric type.
    pub fn matches(&self, metric_type: MetricType) -> bool {
        match self {
            Self::BloodPressure { .. } => metric_type == MetricType::BloodPressure,
            Self::Scalar(_) => metric_type != MetricType::BloodPressure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetric {
    pub id: Uuid,
    pub user_id: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    pub value: MetricValue,
    pub unit: String,
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

impl HealthMetric {
    /// New reading stamped with the current time. `value` must have the
    /// shape `metric_type` calls for.
    pub fn new(
        user_id: impl Into<String>,
        metric_type: MetricType,
        value: MetricValue,
        unit: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        debug_assert!(
            value.matches(metric_type),
            "{value:?} is not a valid {metric_type} value"
        );
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            metric_type,
            value,
            unit: unit.into(),
            notes: notes.into(),
            recorded_at: Utc::now(),
        }
    }
}
