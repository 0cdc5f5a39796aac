use tracing::warn;

use crate::domain::{AnalysisResult, EntitySpan, SentenceResult};
use crate::utils::{char_len, truncate_for_display};

/// One sentence of a multi-sentence breakdown. Entity offsets stay relative to
/// `sentence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceBreakdown<'a> {
    /// 1-based position in service order.
    pub index: usize,
    pub sentence: &'a str,
    pub entities: &'a [EntitySpan],
}

impl<'a> SentenceBreakdown<'a> {
    pub fn label(&self) -> String {
        format!("Sentence {}", self.index)
    }

    pub fn display_text(&self, cap: usize) -> String {
        truncate_for_display(self.sentence, cap)
    }

    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }
}

/// Two independently sourced views over one NER response: the per-sentence
/// breakdown and the document-level combined entity list. Neither is derived
/// from the other, since sentence-local offsets cannot be compared with
/// document offsets.
#[derive(Debug, Clone, Copy)]
pub struct SentenceAggregator<'a> {
    sentences: &'a [SentenceResult],
    entities: &'a [EntitySpan],
}

impl<'a> SentenceAggregator<'a> {
    pub fn new(result: &'a AnalysisResult) -> Self {
        result.audit();
        Self {
            sentences: &result.sentences,
            entities: &result.entities,
        }
    }

    /// Sentences with their 1-based index, or `None` unless there are at
    /// least two of them.
    pub fn sentence_breakdown(&self) -> Option<Vec<SentenceBreakdown<'a>>> {
        if self.sentences.len() <= 1 {
            return None;
        }
        Some(
            self.sentences
                .iter()
                .enumerate()
                .map(|(idx, sentence)| SentenceBreakdown {
                    index: idx + 1,
                    sentence: &sentence.sentence,
                    entities: &sentence.entities,
                })
                .collect(),
        )
    }

    /// Document-level entities exactly as delivered.
    pub fn combined_entities(&self) -> &'a [EntitySpan] {
        self.entities
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Combined entities whose offsets fall outside `source`. They are kept
    /// as-is; the highlighter simply never reaches their missing characters.
    pub fn out_of_bounds_entities(&self, source: &str) -> Vec<&'a EntitySpan> {
        let len = char_len(source);
        let invalid: Vec<&EntitySpan> = self
            .entities
            .iter()
            .filter(|span| !span.is_within(len))
            .collect();
        if !invalid.is_empty() {
            warn!(
                count = invalid.len(),
                text_len = len,
                "entity offsets outside the analyzed text"
            );
        }
        invalid
    }
}
