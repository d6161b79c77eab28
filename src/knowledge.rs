//! Symptom knowledge base: an ordered, validated list of symptom phrases
//! mapped to a specialization, common OTC medicines and an emergency flag.
//!
//! Loaded once at startup and shared read-only (`Arc<KnowledgeBase>`).
//! Entry order is significant: the analyzer takes the first entry whose
//! phrase is contained in the user's input.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Knowledge base shipped with the binary.
const BUNDLED_SYMPTOMS: &str = include_str!("../resources/symptoms.json");

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge base {0}: {1}")]
    Load(String, String),
    #[error("Failed to parse knowledge base {0}: {1}")]
    Parse(String, String),
    #[error("Duplicate symptom in knowledge base: {0:?}")]
    DuplicateSymptom(String),
    #[error("Invalid knowledge base entry at index {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomKnowledgeEntry {
    /// Canonical lowercase phrase, e.g. "chest pain".
    pub symptom: String,
    pub specialization: String,
    #[serde(default)]
    pub common_medicines: Vec<String>,
    #[serde(default)]
    pub emergency: bool,
}

impl SymptomKnowledgeEntry {
    pub fn new(
        symptom: impl Into<String>,
        specialization: impl Into<String>,
        common_medicines: &[&str],
        emergency: bool,
    ) -> Self {
        Self {
            symptom: symptom.into(),
            specialization: specialization.into(),
            common_medicines: common_medicines.iter().map(|m| m.to_string()).collect(),
            emergency,
        }
    }
}

/// Immutable, validated knowledge base.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<SymptomKnowledgeEntry>,
}

impl KnowledgeBase {
    /// Validate and normalize entries, preserving declaration order.
    ///
    /// Symptoms are trimmed and lowercased; they must be non-empty and
    /// unique after normalization. Specializations must be non-blank.
    pub fn from_entries(entries: Vec<SymptomKnowledgeEntry>) -> Result<Self, KnowledgeError> {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut normalized = Vec::with_capacity(entries.len());

        for (index, mut entry) in entries.into_iter().enumerate() {
            entry.symptom = entry.symptom.trim().to_lowercase();
            if entry.symptom.is_empty() {
                return Err(KnowledgeError::InvalidEntry {
                    index,
                    reason: "symptom is empty".into(),
                });
            }
            let specialization = entry.specialization.trim();
            if specialization.is_empty() {
                return Err(KnowledgeError::InvalidEntry {
                    index,
                    reason: format!("specialization is empty for {:?}", entry.symptom),
                });
            }
            entry.specialization = specialization.to_string();
            if !seen.insert(entry.symptom.clone()) {
                return Err(KnowledgeError::DuplicateSymptom(entry.symptom));
            }
            normalized.push(entry);
        }

        Ok(Self { entries: normalized })
    }

    /// Parse a JSON array of entries. `source` names the input in errors.
    pub fn from_json(json: &str, source: &str) -> Result<Self, KnowledgeError> {
        let entries: Vec<SymptomKnowledgeEntry> = serde_json::from_str(json)
            .map_err(|e| KnowledgeError::Parse(source.to_string(), e.to_string()))?;
        Self::from_entries(entries)
    }

    /// Load from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| KnowledgeError::Load(path.display().to_string(), e.to_string()))?;
        Self::from_json(&json, &path.display().to_string())
    }

    /// The knowledge base embedded at build time.
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Self::from_json(BUNDLED_SYMPTOMS, "bundled symptoms.json")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry (in declaration order) whose symptom occurs inside `phrase`.
    /// `phrase` is expected to be normalized already.
    pub fn first_match(&self, phrase: &str) -> Option<&SymptomKnowledgeEntry> {
        self.entries.iter().find(|e| phrase.contains(e.symptom.as_str()))
    }
}
