//! Rule-based symptom analysis.
//!
//! Deterministic substring matching against the knowledge base, not
//! inference. Each input phrase matches at most one entry: the first one,
//! in declaration order, whose symptom is contained in the phrase.

use crate::knowledge::{KnowledgeBase, SymptomKnowledgeEntry};
use crate::models::enums::Probability;
use crate::models::{AnalysisResult, Condition};

/// Phrases that force an emergency warning regardless of knowledge base matches.
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "chest pain",
    "heart attack",
    "unconscious",
    "breathing",
    "stroke",
];

pub const FALLBACK_CONDITION: &str = "Unidentified general symptoms";
pub const FALLBACK_SPECIALIST: &str = "General Physician";

const CONDITION_PREFIX: &str = "Possible issue related to ";

/// Accumulated matches from one pass over the input phrases.
#[derive(Debug, Default)]
struct Findings {
    conditions: Vec<Condition>,
    specialists: Vec<String>,
    medicines: Vec<String>,
    emergency: bool,
}

impl Findings {
    fn absorb(mut self, entry: &SymptomKnowledgeEntry) -> Self {
        push_unique(&mut self.specialists, &entry.specialization);
        for medicine in &entry.common_medicines {
            push_unique(&mut self.medicines, medicine);
        }
        self.emergency |= entry.emergency;
        // Not deduplicated: one condition per matching phrase.
        self.conditions.push(Condition {
            name: format!("{CONDITION_PREFIX}{}", entry.symptom),
            probability: Probability::Medium,
        });
        self
    }
}

/// Insert preserving first-seen order; exact string equality.
fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|existing| existing == item) {
        items.push(item.to_string());
    }
}

fn normalize(phrase: &str) -> String {
    phrase.to_lowercase().trim().to_string()
}

/// Whether a normalized phrase contains one of [`EMERGENCY_KEYWORDS`].
pub fn contains_emergency_keyword(phrase: &str) -> bool {
    EMERGENCY_KEYWORDS.iter().any(|k| phrase.contains(k))
}

/// Analyze user-entered symptom phrases against the knowledge base.
///
/// Callers validate that `symptoms` is a non-empty list of non-blank
/// strings; this function does no defensive checking of its own.
pub fn analyze<S: AsRef<str>>(kb: &KnowledgeBase, symptoms: &[S]) -> AnalysisResult {
    let phrases: Vec<String> = symptoms.iter().map(|s| normalize(s.as_ref())).collect();

    let mut findings = phrases
        .iter()
        .filter_map(|phrase| kb.first_match(phrase))
        .fold(Findings::default(), Findings::absorb);

    if findings.conditions.is_empty() {
        push_unique(&mut findings.specialists, FALLBACK_SPECIALIST);
        findings.conditions.push(Condition {
            name: FALLBACK_CONDITION.to_string(),
            probability: Probability::Low,
        });
    }

    let keyword_emergency = phrases.iter().any(|p| contains_emergency_keyword(p));
    let emergency_warning = findings.emergency || keyword_emergency;

    if emergency_warning {
        tracing::warn!(
            entry_flag = findings.emergency,
            keyword = keyword_emergency,
            "Symptom analysis escalated to emergency"
        );
    }

    AnalysisResult {
        conditions: findings.conditions,
        recommended_doctor: findings.specialists.join(", "),
        suggested_medicine: findings.medicines,
        emergency_warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::SymptomKnowledgeEntry;

    fn test_kb() -> KnowledgeBase {
        KnowledgeBase::from_entries(vec![
            SymptomKnowledgeEntry::new("chest pain", "Cardiologist", &["Aspirin"], true),
            SymptomKnowledgeEntry::new("headache", "Neurologist", &["Paracetamol", "Ibuprofen"], false),
            SymptomKnowledgeEntry::new("fever", "General Physician", &["Paracetamol"], false),
            SymptomKnowledgeEntry::new("cough", "Pulmonologist", &["Dextromethorphan"], false),
            SymptomKnowledgeEntry::new("rash", "Dermatologist", &[], false),
        ])
        .unwrap()
    }

    fn empty_kb() -> KnowledgeBase {
        KnowledgeBase::from_entries(vec![]).unwrap()
    }

    #[test]
    fn first_match_wins_over_longer_phrase() {
        let kb = KnowledgeBase::from_entries(vec![
            SymptomKnowledgeEntry::new("fever", "GP", &[], false),
            SymptomKnowledgeEntry::new("high fever", "ID", &[], false),
        ])
        .unwrap();
        let result = analyze(&kb, &["high fever"]);
        assert_eq!(result.recommended_doctor, "GP");
        assert_eq!(result.conditions.len(), 1);
        assert_eq!(result.conditions[0].name, "Possible issue related to fever");
        assert_eq!(result.conditions[0].probability, Probability::Medium);
    }

    #[test]
    fn containment_is_input_contains_entry_not_reverse() {
        // "head" is contained in the entry "headache", but not vice versa.
        let result = analyze(&test_kb(), &["head"]);
        assert_eq!(result.conditions[0].name, FALLBACK_CONDITION);
    }

    #[test]
    fn input_is_lowercased_and_trimmed() {
        let result = analyze(&test_kb(), &["   Severe HEADACHE since morning  "]);
        assert_eq!(result.recommended_doctor, "Neurologist");
        assert_eq!(result.suggested_medicine, vec!["Paracetamol", "Ibuprofen"]);
    }

    #[test]
    fn same_entry_twice_dedups_sets_but_not_conditions() {
        let result = analyze(&test_kb(), &["headache", "bad headache at night"]);
        assert_eq!(result.recommended_doctor, "Neurologist");
        assert_eq!(result.suggested_medicine, vec!["Paracetamol", "Ibuprofen"]);
        assert_eq!(result.conditions.len(), 2);
        assert_eq!(result.conditions[0], result.conditions[1]);
    }

    #[test]
    fn specialists_and_medicines_keep_first_seen_order() {
        let result = analyze(&test_kb(), &["cough", "fever", "headache"]);
        assert_eq!(
            result.recommended_doctor,
            "Pulmonologist, General Physician, Neurologist"
        );
        assert_eq!(
            result.suggested_medicine,
            vec!["Dextromethorphan", "Paracetamol", "Ibuprofen"]
        );
        let names: Vec<&str> = result.conditions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Possible issue related to cough",
                "Possible issue related to fever",
                "Possible issue related to headache",
            ]
        );
    }

    #[test]
    fn unmatched_phrase_contributes_nothing() {
        let result = analyze(&test_kb(), &["rash", "qwxyz"]);
        assert_eq!(result.conditions.len(), 1);
        assert_eq!(result.recommended_doctor, "Dermatologist");
        assert!(result.suggested_medicine.is_empty());
    }

    #[test]
    fn entry_emergency_flag_is_sticky() {
        let result = analyze(&test_kb(), &["chest pain", "rash"]);
        assert!(result.emergency_warning);
        let result = analyze(&test_kb(), &["rash", "chest pain", "cough"]);
        assert!(result.emergency_warning);
    }

    #[test]
    fn keyword_emergency_without_any_match() {
        let result = analyze(&empty_kb(), &["I am having trouble breathing"]);
        assert!(result.emergency_warning);
        // No condition was collected, so the fallback still applies.
        assert_eq!(result.conditions.len(), 1);
        assert_eq!(result.conditions[0].name, FALLBACK_CONDITION);
        assert_eq!(result.recommended_doctor, FALLBACK_SPECIALIST);
    }

    #[test]
    fn keyword_emergency_alongside_non_emergency_match() {
        let result = analyze(&test_kb(), &["fever", "suspected stroke"]);
        assert!(result.emergency_warning);
        assert_eq!(result.recommended_doctor, "General Physician");
        assert_eq!(result.conditions.len(), 1);
    }

    #[test]
    fn fallback_when_nothing_matches() {
        let result = analyze(&test_kb(), &["qwxyz nonsense"]);
        assert_eq!(
            result.conditions,
            vec![Condition {
                name: FALLBACK_CONDITION.into(),
                probability: Probability::Low,
            }]
        );
        assert!(result.recommended_doctor.contains(FALLBACK_SPECIALIST));
        assert!(result.suggested_medicine.is_empty());
        assert!(!result.emergency_warning);
    }

    #[test]
    fn fallback_not_added_when_something_matched() {
        let result = analyze(&test_kb(), &["rash", "qwxyz"]);
        assert!(result.conditions.iter().all(|c| c.name != FALLBACK_CONDITION));
        assert!(!result.recommended_doctor.contains(FALLBACK_SPECIALIST));
    }

    #[test]
    fn deterministic_for_same_input() {
        let kb = test_kb();
        let input = ["cough", "chest pain", "fever"];
        assert_eq!(analyze(&kb, &input), analyze(&kb, &input));
    }

    #[test]
    fn accepts_owned_strings() {
        let input: Vec<String> = vec!["Fever".into()];
        let result = analyze(&test_kb(), &input);
        assert_eq!(result.recommended_doctor, "General Physician");
    }

    #[test]
    fn keyword_detection() {
        assert!(contains_emergency_keyword("sudden heart attack symptoms"));
        assert!(contains_emergency_keyword("found unconscious"));
        assert!(!contains_emergency_keyword("mild headache"));
    }
}
