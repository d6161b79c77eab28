//! Body-mass-index calculation.

use serde::{Deserialize, Serialize};

use crate::models::enums::{BmiCategory, MetricType, UnitSystem};
use crate::models::{HealthMetric, MetricValue};

const INCHES_TO_METERS: f64 = 0.0254;
const POUNDS_TO_KG: f64 = 0.453592;

pub const BMI_UNIT: &str = "kg/m²";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BmiError {
    #[error("{0} must be a positive number")]
    InvalidMeasurement(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bmi {
    /// Rounded to two decimals.
    pub bmi: f64,
    pub category: BmiCategory,
}

/// Category thresholds are strict upper bounds: 18.5 is Normal, 25 is
/// Overweight, 30 is Obese.
pub fn categorize(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute BMI. Metric takes centimeters and kilograms; imperial takes
/// inches and pounds. The category is derived from the unrounded value.
pub fn compute_bmi(height: f64, weight: f64, unit: UnitSystem) -> Result<Bmi, BmiError> {
    if !height.is_finite() || height <= 0.0 {
        return Err(BmiError::InvalidMeasurement("height"));
    }
    if !weight.is_finite() || weight <= 0.0 {
        return Err(BmiError::InvalidMeasurement("weight"));
    }

    let (height_m, weight_kg) = match unit {
        UnitSystem::Imperial => (height * INCHES_TO_METERS, weight * POUNDS_TO_KG),
        UnitSystem::Metric => (height / 100.0, weight),
    };

    let bmi = weight_kg / (height_m * height_m);

    Ok(Bmi {
        bmi: round2(bmi),
        category: categorize(bmi),
    })
}

/// Health metric reading describing a BMI calculation.
pub fn bmi_metric(
    user_id: &str,
    height: f64,
    weight: f64,
    unit: UnitSystem,
    result: &Bmi,
) -> HealthMetric {
    let (height_unit, weight_unit) = match unit {
        UnitSystem::Imperial => ("in", "lbs"),
        UnitSystem::Metric => ("cm", "kg"),
    };
    HealthMetric::new(
        user_id,
        MetricType::Bmi,
        MetricValue::Scalar(result.bmi),
        BMI_UNIT,
        format!("Height: {height}{height_unit}, Weight: {weight}{weight_unit}"),
    )
}
