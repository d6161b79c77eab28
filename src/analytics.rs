//! History analytics over a user's stored symptom checks.
//!
//! Recomputed from the full record set on every request; nothing is
//! cached or maintained incrementally. Callers pass records ordered by
//! creation time, oldest first.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::enums::Severity;
use crate::models::SymptomRecord;

/// How many records `recent_records` carries.
pub const RECENT_RECORD_LIMIT: usize = 5;

/// `chrono` format for trend bucket keys, e.g. "Jan 2025".
const TREND_KEY_FORMAT: &str = "%b %Y";

/// String-keyed map that keeps first-insertion order and serializes as a
/// JSON object in that order. Lookup is linear; each map holds one entry
/// per distinct symptom, condition or month.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    /// Value for `key`, appending `make()` if absent.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let i = match self.0.iter().position(|(k, _)| k == key) {
            Some(i) => i,
            None => {
                self.0.push((key.to_string(), make()));
                self.0.len() - 1
            }
        };
        &mut self.0[i].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Occurrence counts keyed by string, in first-seen order.
pub type Frequency = OrderedMap<usize>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityDistribution {
    #[serde(rename = "Mild")]
    pub mild: usize,
    #[serde(rename = "Moderate")]
    pub moderate: usize,
    #[serde(rename = "Severe")]
    pub severe: usize,
}

impl SeverityDistribution {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Mild => self.mild += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::Severe => self.severe += 1,
        }
    }
}

/// Checks in one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrendBucket {
    pub count: usize,
    pub severe: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_checks: usize,
    pub symptom_frequency: Frequency,
    pub severity_distribution: SeverityDistribution,
    /// Month buckets in the order first encountered (chronological for
    /// oldest-first input).
    pub trend_data: OrderedMap<TrendBucket>,
    pub condition_frequency: Frequency,
    /// Last records of the input, most recent first.
    pub recent_records: Vec<SymptomRecord>,
}

impl AnalyticsReport {
    fn empty() -> Self {
        Self {
            total_checks: 0,
            symptom_frequency: Frequency::default(),
            severity_distribution: SeverityDistribution::default(),
            trend_data: OrderedMap::default(),
            condition_frequency: Frequency::default(),
            recent_records: Vec::new(),
        }
    }

    fn absorb(mut self, record: &SymptomRecord) -> Self {
        self.total_checks += 1;

        for symptom in &record.symptoms {
            *self.symptom_frequency.get_or_insert_with(symptom, || 0) += 1;
        }

        self.severity_distribution.record(record.severity);

        let month = trend_key(record);
        let bucket = self.trend_data.get_or_insert_with(&month, TrendBucket::default);
        bucket.count += 1;
        if record.severity == Severity::Severe {
            bucket.severe += 1;
        }

        for condition in &record.analysis_result.conditions {
            *self.condition_frequency.get_or_insert_with(&condition.name, || 0) += 1;
        }

        self
    }
}

fn trend_key(record: &SymptomRecord) -> String {
    record.created_at.format(TREND_KEY_FORMAT).to_string()
}

/// Compute the analytics report for one user's records (oldest first).
pub fn aggregate(records: &[SymptomRecord]) -> AnalyticsReport {
    let mut report = records.iter().fold(AnalyticsReport::empty(), AnalyticsReport::absorb);

    let start = records.len().saturating_sub(RECENT_RECORD_LIMIT);
    report.recent_records = records[start..].iter().rev().cloned().collect();

    report
}
