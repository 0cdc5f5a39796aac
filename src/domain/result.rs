use serde::{Deserialize, Serialize};
use tracing::warn;

use super::entity::EntitySpan;
use super::mode::AnalysisMode;

/// One sentence as segmented by the service. Entity offsets are relative to
/// `sentence`, never to the enclosing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceResult {
    pub sentence: String,
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
}

/// NER response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
    #[serde(default)]
    pub sentences: Vec<SentenceResult>,
    #[serde(
        default,
        rename = "entity_count",
        alias = "entityCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub reported_entity_count: Option<usize>,
}

impl AnalysisResult {
    pub fn new(entities: Vec<EntitySpan>, sentences: Vec<SentenceResult>) -> Self {
        Self {
            text: None,
            reported_entity_count: Some(entities.len()),
            entities,
            sentences,
        }
    }

    /// Entity count re-derived from the delivered list. The service's own
    /// `entity_count` is advisory only.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn count_is_consistent(&self) -> bool {
        self.reported_entity_count
            .map_or(true, |reported| reported == self.entities.len())
    }

    pub(crate) fn audit(&self) {
        if !self.count_is_consistent() {
            warn!(
                reported = ?self.reported_entity_count,
                delivered = self.entities.len(),
                "entity_count disagrees with entity list, using list length"
            );
        }
    }
}

/// MLM response envelope. `predictions` are ranked best-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub predictions: Vec<String>,
}

impl PredictionResult {
    pub fn new(predictions: Vec<String>) -> Self {
        Self {
            text: None,
            predictions,
        }
    }

    /// Predictions paired with their 1-based rank, in delivery order.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.predictions
            .iter()
            .enumerate()
            .map(|(idx, token)| (idx + 1, token.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Entities(AnalysisResult),
    Predictions(PredictionResult),
}

impl AnalysisOutcome {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            AnalysisOutcome::Entities(_) => AnalysisMode::Ner,
            AnalysisOutcome::Predictions(_) => AnalysisMode::Mlm,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AnalysisOutcome::Entities(result) => {
                result.entities.is_empty() && result.sentences.is_empty()
            }
            AnalysisOutcome::Predictions(result) => result.predictions.is_empty(),
        }
    }
}
