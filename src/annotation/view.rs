//! Toolkit-independent view of a finished analysis.

use serde::Serialize;
use std::str::FromStr;

use super::aggregator::SentenceAggregator;
use super::color::{ColorProfile, Rgba};
use super::highlight::{HighlightRenderer, RenderPlan, Segment};
use crate::domain::{AnalysisOutcome, AnalysisResult, EntitySpan, PredictionResult};

/// Display context: how long sentence snippets may get and which labels get
/// their own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewProfile {
    /// Card/grid view of the main analysis page.
    Dashboard,
    /// Single-document inline analyzer.
    Inline,
}

impl ViewProfile {
    pub fn display_cap(self) -> usize {
        match self {
            ViewProfile::Dashboard => 100,
            ViewProfile::Inline => 80,
        }
    }

    pub fn colors(self) -> ColorProfile {
        match self {
            ViewProfile::Dashboard => ColorProfile::Cyber,
            ViewProfile::Inline => ColorProfile::Inline,
        }
    }
}

impl Default for ViewProfile {
    fn default() -> Self {
        ViewProfile::Dashboard
    }
}

impl FromStr for ViewProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" | "combined" => Ok(ViewProfile::Dashboard),
            "inline" => Ok(ViewProfile::Inline),
            _ => anyhow::bail!("unknown view profile: {}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityTag<'a> {
    pub word: &'a str,
    pub entity_type: &'a str,
    pub background: Rgba,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "tags", rename_all = "snake_case")]
pub enum EntityListing<'a> {
    /// Analyzed, nothing found.
    NoEntities,
    Tags(Vec<EntityTag<'a>>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceView<'a> {
    pub label: String,
    pub text: String,
    pub entities: EntityListing<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityCard<'a> {
    pub word: &'a str,
    pub entity_type: &'a str,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledSegment<'a> {
    #[serde(flatten)]
    pub segment: Segment<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgba>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NerView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<SentenceView<'a>>>,
    pub entity_count: usize,
    pub combined: Vec<EntityCard<'a>>,
    pub highlight: Vec<StyledSegment<'a>>,
}

impl<'a> NerView<'a> {
    pub fn build(source: &'a str, result: &'a AnalysisResult, profile: ViewProfile) -> Self {
        let aggregator = SentenceAggregator::new(result);
        let colors = profile.colors();
        aggregator.out_of_bounds_entities(source);

        let breakdown = aggregator.sentence_breakdown().map(|sentences| {
            sentences
                .iter()
                .map(|sentence| SentenceView {
                    label: sentence.label(),
                    text: sentence.display_text(profile.display_cap()),
                    entities: if sentence.has_entities() {
                        EntityListing::Tags(
                            sentence
                                .entities
                                .iter()
                                .map(|span| EntityTag {
                                    word: &span.word,
                                    entity_type: &span.entity_type,
                                    background: colors.color_for(&span.entity_type).wash(),
                                })
                                .collect(),
                        )
                    } else {
                        EntityListing::NoEntities
                    },
                })
                .collect()
        });

        let combined_entities: &'a [EntitySpan] = aggregator.combined_entities();
        let combined = combined_entities
            .iter()
            .map(|span| EntityCard {
                word: &span.word,
                entity_type: &span.entity_type,
                color: colors.color_for(&span.entity_type).emphasis(),
            })
            .collect();

        let highlight = HighlightRenderer::render(source, combined_entities)
            .segments
            .into_iter()
            .map(|segment| StyledSegment {
                background: segment
                    .entity()
                    .map(|span| colors.color_for(&span.entity_type).wash()),
                segment,
            })
            .collect();

        Self {
            breakdown,
            entity_count: result.entity_count(),
            combined,
            highlight,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.combined.is_empty()
    }

    pub fn plan(&self) -> RenderPlan<'a> {
        RenderPlan {
            segments: self.highlight.iter().map(|styled| styled.segment.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPrediction<'a> {
    pub rank: usize,
    pub token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionView<'a> {
    pub ranked: Vec<RankedPrediction<'a>>,
}

impl<'a> PredictionView<'a> {
    pub fn build(result: &'a PredictionResult) -> Self {
        Self {
            ranked: result
                .ranked()
                .map(|(rank, token)| RankedPrediction { rank, token })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultView<'a> {
    Entities(NerView<'a>),
    Predictions(PredictionView<'a>),
}

impl<'a> ResultView<'a> {
    /// `source` is the text that was submitted; entity offsets refer to it.
    pub fn build(source: &'a str, outcome: &'a AnalysisOutcome, profile: ViewProfile) -> Self {
        match outcome {
            AnalysisOutcome::Entities(result) => {
                ResultView::Entities(NerView::build(source, result, profile))
            }
            AnalysisOutcome::Predictions(result) => {
                ResultView::Predictions(PredictionView::build(result))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::color::FALLBACK_COLOR;
    use crate::domain::SentenceResult;

    fn scenario() -> (String, AnalysisResult) {
        let text = "APT28 exploited CVE-2023-12345.".to_string();
        let result = AnalysisResult::new(
            vec![
                EntitySpan::new("APT28", "THREAT_ACTOR", 0, 5),
                EntitySpan::new("CVE-2023-12345", "VULNERABILITY", 16, 30),
            ],
            vec![],
        );
        (text, result)
    }

    #[test]
    fn ner_view_colors_cards_and_highlight() {
        let (text, result) = scenario();
        let view = NerView::build(&text, &result, ViewProfile::Dashboard);

        assert!(view.breakdown.is_none());
        assert_eq!(view.entity_count, 2);
        assert_eq!(view.combined[0].color.to_string(), "#ff6b6b");
        assert_eq!(view.highlight.len(), 4);
        assert_eq!(view.highlight[0].background.unwrap().to_string(), "#ff6b6b40");
        assert!(view.highlight[1].background.is_none());
        assert_eq!(view.plan().to_text(), text);
    }

    #[test]
    fn unknown_labels_use_fallback_in_every_part() {
        let text = "Beacon seen.".to_string();
        let result = AnalysisResult::new(vec![EntitySpan::new("Beacon", "C2_FRAMEWORK", 0, 6)], vec![]);
        let view = NerView::build(&text, &result, ViewProfile::Inline);
        assert_eq!(view.combined[0].color, FALLBACK_COLOR.emphasis());
        assert_eq!(view.highlight[0].background, Some(FALLBACK_COLOR.wash()));
    }

    #[test]
    fn empty_sentence_renders_no_entities_marker() {
        let text = "Conti hit. Nothing else.".to_string();
        let result = AnalysisResult::new(
            vec![EntitySpan::new("Conti", "MALWARE", 0, 5)],
            vec![
                SentenceResult {
                    sentence: "Conti hit.".to_string(),
                    entities: vec![EntitySpan::new("Conti", "MALWARE", 0, 5)],
                },
                SentenceResult {
                    sentence: "Nothing else.".to_string(),
                    entities: vec![],
                },
            ],
        );
        let view = NerView::build(&text, &result, ViewProfile::Dashboard);
        let breakdown = view.breakdown.unwrap();
        assert_eq!(breakdown.len(), 2);
        assert!(matches!(breakdown[0].entities, EntityListing::Tags(ref tags) if tags.len() == 1));
        assert_eq!(breakdown[1].entities, EntityListing::NoEntities);
    }

    #[test]
    fn prediction_ranks_keep_service_order() {
        let outcome = AnalysisOutcome::Predictions(PredictionResult::new(vec![
            "phishing".to_string(),
            "malware".to_string(),
            "ransomware".to_string(),
        ]));
        let view = ResultView::build("A [MASK] attack.", &outcome, ViewProfile::Dashboard);
        let ResultView::Predictions(predictions) = view else {
            panic!("expected predictions view");
        };
        let ranked: Vec<(usize, &str)> = predictions.ranked.iter().map(|p| (p.rank, p.token)).collect();
        assert_eq!(ranked, vec![(1, "phishing"), (2, "malware"), (3, "ransomware")]);
    }

    #[test]
    fn empty_predictions_are_a_valid_state() {
        let result = PredictionResult::default();
        assert!(PredictionView::build(&result).is_empty());
    }
}
