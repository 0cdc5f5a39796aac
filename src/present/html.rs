//! HTML fragment rendering of a [`ResultView`].

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::annotation::{
    EntityListing, NerView, PredictionView, ResultView, SentenceView, StyledSegment,
};
use crate::domain::MASK_TOKEN;

pub fn render_html(view: &ResultView<'_>) -> String {
    match view {
        ResultView::Entities(ner) => render_entities(ner),
        ResultView::Predictions(predictions) => render_predictions(predictions),
    }
}

fn render_entities(view: &NerView<'_>) -> String {
    let mut parts = vec![r#"<div class="results-section">"#.to_string()];

    if let Some(sentences) = &view.breakdown {
        parts.push(render_breakdown(sentences));
    }

    parts.push(format!("<h3>Combined entities ({})</h3>", view.entity_count));
    if view.is_empty() {
        parts.push("<p>No entities detected</p>".to_string());
    } else {
        let cards: Vec<String> = view
            .combined
            .iter()
            .map(|card| {
                format!(
                    concat!(
                        r#"<div class="entity-card" style="border-left-color:{color};">"#,
                        r#"<div class="entity-word">{word}</div>"#,
                        r#"<div class="entity-type" style="background-color:{color};">{label}</div>"#,
                        "</div>"
                    ),
                    color = card.color,
                    word = encode_text(card.word),
                    label = encode_text(card.entity_type),
                )
            })
            .collect();
        parts.push(format!(
            r#"<div class="entities-grid">{}</div>"#,
            cards.join("")
        ));
    }

    parts.push(format!(
        r#"<div class="highlighted-text"><h3>Highlighted Text</h3><div class="text-display">{}</div></div>"#,
        render_highlight(&view.highlight)
    ));
    parts.push("</div>".to_string());
    parts.join("")
}

fn render_breakdown(sentences: &[SentenceView<'_>]) -> String {
    let blocks: Vec<String> = sentences
        .iter()
        .map(|sentence| {
            let entities = match &sentence.entities {
                EntityListing::NoEntities => {
                    r#"<span class="no-entities">No entities</span>"#.to_string()
                }
                EntityListing::Tags(tags) => {
                    let tags: Vec<String> = tags
                        .iter()
                        .map(|tag| {
                            format!(
                                r#"<span class="sentence-entity-tag" style="background-color:{};">{} ({})</span>"#,
                                tag.background,
                                encode_text(tag.word),
                                encode_text(tag.entity_type)
                            )
                        })
                        .collect();
                    format!(r#"<div class="sentence-entities">{}</div>"#, tags.join(""))
                }
            };
            format!(
                concat!(
                    r#"<div class="sentence-block">"#,
                    r#"<span class="sentence-label">{}:</span>"#,
                    r#"<span class="sentence-text">{}</span>{}</div>"#
                ),
                encode_text(&sentence.label),
                encode_text(&sentence.text),
                entities
            )
        })
        .collect();

    format!(
        r#"<div class="sentences-breakdown"><h4>By sentence ({} sentences)</h4>{}</div>"#,
        sentences.len(),
        blocks.join("")
    )
}

/// Entity runs become `<mark>` elements carrying the wash color; plain runs
/// are escaped text.
pub fn render_highlight(segments: &[StyledSegment<'_>]) -> String {
    segments
        .iter()
        .map(|styled| match (styled.segment.entity(), styled.background) {
            (Some(span), Some(background)) => format!(
                r#"<mark class="highlighted" data-type="{}" style="background-color:{};">{}</mark>"#,
                encode_double_quoted_attribute(&span.entity_type),
                background,
                encode_text(styled.segment.text)
            ),
            _ => encode_text(styled.segment.text).to_string(),
        })
        .collect()
}

fn render_predictions(view: &PredictionView<'_>) -> String {
    let body = if view.is_empty() {
        "<p>No predictions available</p>".to_string()
    } else {
        let items: Vec<String> = view
            .ranked
            .iter()
            .map(|prediction| {
                format!(
                    r#"<div class="prediction-item"><span class="prediction-rank">{}</span><span class="prediction-word">{}</span></div>"#,
                    prediction.rank,
                    encode_text(prediction.token)
                )
            })
            .collect();
        format!(r#"<div class="predictions-list">{}</div>"#, items.join(""))
    };
    format!(
        r#"<div class="results-section"><h3>Predictions for {}</h3>{}</div>"#,
        MASK_TOKEN, body
    )
}
