use serde::{Deserialize, Serialize};
use std::fmt;

/// One recognized entity occurrence, as delivered by the NER service.
///
/// `start` and `end` are half-open character offsets (Unicode scalar values,
/// not bytes) into whatever text the span was extracted from: the full
/// document for combined entities, the sentence itself for per-sentence ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySpan {
    pub word: String,
    #[serde(alias = "entityType")]
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
}

impl EntitySpan {
    pub fn new(
        word: impl Into<String>,
        entity_type: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            word: word.into(),
            entity_type: entity_type.into(),
            start,
            end,
        }
    }

    pub fn contains(&self, char_index: usize) -> bool {
        self.start <= char_index && char_index < self.end
    }

    pub fn char_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span satisfies `start < end <= char_len` for a source text
    /// of `char_len` characters.
    pub fn is_within(&self, char_len: usize) -> bool {
        self.start < self.end && self.end <= char_len
    }
}

impl fmt::Display for EntitySpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.word, self.entity_type)
    }
}
