use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Probability, Severity};

/// One candidate condition produced by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub probability: Probability,
}

/// Outcome of one symptom analysis. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub conditions: Vec<Condition>,
    /// Specializations joined with `", "` in first-seen order.
    pub recommended_doctor: String,
    pub suggested_medicine: Vec<String>,
    pub emergency_warning: bool,
}

/// A persisted symptom check, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomRecord {
    pub id: Uuid,
    pub user_id: String,
    /// Raw phrases as entered, case preserved.
    pub symptoms: Vec<String>,
    pub duration: String,
    pub severity: Severity,
    pub analysis_result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl SymptomRecord {
    /// Wrap a fresh analysis into a new record stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        symptoms: Vec<String>,
        duration: impl Into<String>,
        severity: Severity,
        analysis_result: AnalysisResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            symptoms,
            duration: duration.into(),
            severity,
            analysis_result,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            conditions: vec![Condition {
                name: "Possible issue related to headache".into(),
                probability: Probability::Medium,
            }],
            recommended_doctor: "Neurologist".into(),
            suggested_medicine: vec!["Paracetamol".into()],
            emergency_warning: false,
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let record = SymptomRecord::new(
            "user-1",
            vec!["Headache".into()],
            "2 days",
            Severity::Mild,
            sample_result(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["severity"], "Mild");
        assert_eq!(json["analysisResult"]["recommendedDoctor"], "Neurologist");
        assert_eq!(json["analysisResult"]["emergencyWarning"], false);
        assert_eq!(json["analysisResult"]["conditions"][0]["probability"], "Medium");
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn ownership_is_exact_match() {
        let record = SymptomRecord::new("abc", vec![], "1 week", Severity::Moderate, sample_result());
        assert!(record.is_owned_by("abc"));
        assert!(!record.is_owned_by("ABC"));
        assert!(!record.is_owned_by(""));
    }
}
