//! Character-accurate highlighting of entity spans over the original text.
//!
//! Each character of the source belongs to the first entity in list order
//! whose `[start, end)` range contains it, or to no entity at all. Runs of
//! characters with the same owner become one [`Segment`]. Overlaps are
//! resolved purely by list position: a later span never claims a character an
//! earlier span already covers, regardless of length or specificity.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::domain::EntitySpan;
use crate::utils::char_boundaries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentKind<'a> {
    Plain,
    Entity {
        /// Position of the span in the combined entity list.
        index: usize,
        span: &'a EntitySpan,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    /// Character offsets of this segment within the source text.
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: SegmentKind<'a>,
}

impl<'a> Segment<'a> {
    pub fn entity(&self) -> Option<&'a EntitySpan> {
        match self.kind {
            SegmentKind::Entity { span, .. } => Some(span),
            SegmentKind::Plain => None,
        }
    }

    pub fn owner(&self) -> Option<usize> {
        match self.kind {
            SegmentKind::Entity { index, .. } => Some(index),
            SegmentKind::Plain => None,
        }
    }
}

/// Ordered, gap-free, non-overlapping segmentation of a source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderPlan<'a> {
    pub segments: Vec<Segment<'a>>,
}

impl<'a> RenderPlan<'a> {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment<'a>> {
        self.segments.iter()
    }

    /// Concatenation of every segment, which is always the original text.
    pub fn to_text(&self) -> String {
        self.segments.iter().map(|segment| segment.text).collect()
    }

    /// Per-character owner, expanded back out of the coalesced segments.
    pub fn classification(&self) -> Vec<Option<usize>> {
        self.segments
            .iter()
            .flat_map(|segment| std::iter::repeat(segment.owner()).take(segment.end - segment.start))
            .collect()
    }
}

impl<'a> IntoIterator for &'a RenderPlan<'a> {
    type Item = &'a Segment<'a>;
    type IntoIter = std::slice::Iter<'a, Segment<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

pub struct HighlightRenderer;

impl HighlightRenderer {
    /// Builds the render plan with a boundary sweep. Between two consecutive
    /// span boundaries the set of covering spans is constant, so the owner of
    /// the whole run is the smallest list index in the active set.
    pub fn render<'a>(text: &'a str, entities: &'a [EntitySpan]) -> RenderPlan<'a> {
        let boundaries = char_boundaries(text);
        let char_count = boundaries.len() - 1;

        let mut starts: Vec<(usize, usize)> = Vec::with_capacity(entities.len());
        let mut ends: Vec<(usize, usize)> = Vec::with_capacity(entities.len());
        let mut cuts: Vec<usize> = Vec::with_capacity(entities.len() * 2 + 2);
        cuts.push(0);
        cuts.push(char_count);

        for (index, span) in entities.iter().enumerate() {
            let start = span.start.min(char_count);
            let end = span.end.min(char_count);
            if start >= end {
                continue;
            }
            starts.push((start, index));
            ends.push((end, index));
            cuts.push(start);
            cuts.push(end);
        }

        starts.sort_unstable();
        ends.sort_unstable();
        cuts.sort_unstable();
        cuts.dedup();

        let mut active: BTreeSet<usize> = BTreeSet::new();
        let mut next_start = 0;
        let mut next_end = 0;
        let mut segments: Vec<Segment<'a>> = Vec::new();

        for window in cuts.windows(2) {
            let (lo, hi) = (window[0], window[1]);
            while next_start < starts.len() && starts[next_start].0 <= lo {
                active.insert(starts[next_start].1);
                next_start += 1;
            }
            while next_end < ends.len() && ends[next_end].0 <= lo {
                active.remove(&ends[next_end].1);
                next_end += 1;
            }

            let owner = active.first().copied();
            match segments.last_mut() {
                Some(last) if last.owner() == owner && last.end == lo => {
                    last.end = hi;
                    last.text = &text[boundaries[last.start]..boundaries[hi]];
                }
                _ => segments.push(Segment {
                    text: &text[boundaries[lo]..boundaries[hi]],
                    start: lo,
                    end: hi,
                    kind: match owner {
                        Some(index) => SegmentKind::Entity {
                            index,
                            span: &entities[index],
                        },
                        None => SegmentKind::Plain,
                    },
                }),
            }
        }

        RenderPlan { segments }
    }
}

/// Reference classifier: for each character, the index of the first span in
/// list order that contains it. Quadratic; used to check the sweep.
pub fn classify_chars(text: &str, entities: &[EntitySpan]) -> Vec<Option<usize>> {
    (0..text.chars().count())
        .map(|i| entities.iter().position(|span| span.contains(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(entity_type: &str, start: usize, end: usize) -> EntitySpan {
        EntitySpan::new(format!("{}-{}", start, end), entity_type, start, end)
    }

    #[test]
    fn scenario_threat_actor_and_cve() {
        let text = "APT28 exploited CVE-2023-12345.";
        let entities = vec![
            EntitySpan::new("APT28", "THREAT_ACTOR", 0, 5),
            EntitySpan::new("CVE-2023-12345", "VULNERABILITY", 16, 30),
        ];
        let plan = HighlightRenderer::render(text, &entities);

        let shape: Vec<(&str, Option<usize>)> =
            plan.iter().map(|s| (s.text, s.owner())).collect();
        assert_eq!(
            shape,
            vec![
                ("APT28", Some(0)),
                (" exploited ", None),
                ("CVE-2023-12345", Some(1)),
                (".", None),
            ]
        );
        assert_eq!(plan.segments[2].entity().unwrap().entity_type, "VULNERABILITY");
    }

    #[test]
    fn first_listed_span_wins_overlap() {
        let text = "abcdefghij";
        let entities = vec![span("A", 0, 5), span("B", 3, 8)];
        let plan = HighlightRenderer::render(text, &entities);
        let owners = plan.classification();
        assert_eq!(owners[3], Some(0));
        assert_eq!(owners[4], Some(0));
        assert_eq!(owners[5], Some(1));
        assert_eq!(
            plan.iter().map(|s| s.text).collect::<Vec<_>>(),
            vec!["abcde", "fgh", "ij"]
        );
    }

    #[test]
    fn later_span_fully_hidden_by_earlier_one() {
        let entities = vec![span("OUTER", 0, 10), span("INNER", 2, 4)];
        let plan = HighlightRenderer::render("0123456789", &entities);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.segments[0].owner(), Some(0));
    }

    #[test]
    fn earlier_short_span_splits_later_long_one() {
        let entities = vec![span("INNER", 2, 4), span("OUTER", 0, 10)];
        let plan = HighlightRenderer::render("0123456789", &entities);
        let owners: Vec<_> = plan.iter().map(|s| s.owner()).collect();
        assert_eq!(owners, vec![Some(1), Some(0), Some(1)]);
    }

    #[test]
    fn adjacent_spans_stay_separate() {
        let entities = vec![span("A", 0, 2), span("B", 2, 4)];
        let plan = HighlightRenderer::render("abcd", &entities);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn duplicate_spans_coalesce_under_first() {
        let entities = vec![span("A", 1, 3), span("A", 1, 3)];
        let plan = HighlightRenderer::render("abcd", &entities);
        let owners: Vec<_> = plan.iter().map(|s| s.owner()).collect();
        assert_eq!(owners, vec![None, Some(0), None]);
    }

    #[test]
    fn out_of_range_and_inverted_spans_are_ignored() {
        let text = "short";
        let entities = vec![span("PAST", 10, 20), span("BACKWARDS", 4, 1), span("TAIL", 3, 99)];
        let plan = HighlightRenderer::render(text, &entities);
        assert_eq!(plan.to_text(), text);
        assert_eq!(plan.classification(), classify_chars(text, &entities));
        assert_eq!(plan.segments.last().unwrap().owner(), Some(2));
    }

    #[test]
    fn multibyte_text_is_sliced_on_characters() {
        let text = "Le groupe «Sandworm» a frappé.";
        let start = text.chars().position(|c| c == 'S').unwrap();
        let entities = vec![EntitySpan::new("Sandworm", "THREAT_ACTOR", start, start + 8)];
        let plan = HighlightRenderer::render(text, &entities);
        assert_eq!(plan.segments[1].text, "Sandworm");
        assert_eq!(plan.to_text(), text);
    }

    #[test]
    fn empty_text_yields_empty_plan() {
        let entities = vec![span("A", 0, 3)];
        let plan = HighlightRenderer::render("", &entities);
        assert!(plan.is_empty());
        assert_eq!(plan.to_text(), "");
    }

    #[test]
    fn no_entities_is_one_plain_segment() {
        let plan = HighlightRenderer::render("nothing to see", &[]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.segments[0].kind, SegmentKind::Plain);
    }
}
