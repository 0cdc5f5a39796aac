use crate::annotation::{EntityListing, NerView, PredictionView, ResultView};
use crate::domain::MASK_TOKEN;

/// Plain-text rendering for terminals and logs. Entities in the highlighted
/// text are written as `[word](TYPE)`.
pub fn render_text(view: &ResultView<'_>) -> String {
    match view {
        ResultView::Entities(ner) => render_entities(ner),
        ResultView::Predictions(predictions) => render_predictions(predictions),
    }
}

fn render_entities(view: &NerView<'_>) -> String {
    let mut out = String::new();

    if let Some(sentences) = &view.breakdown {
        out.push_str(&format!("By sentence ({} sentences)\n", sentences.len()));
        for sentence in sentences {
            out.push_str(&format!("  {}: {}\n", sentence.label, sentence.text));
            match &sentence.entities {
                EntityListing::NoEntities => out.push_str("    No entities\n"),
                EntityListing::Tags(tags) => {
                    for tag in tags {
                        out.push_str(&format!("    - {} ({})\n", tag.word, tag.entity_type));
                    }
                }
            }
        }
        out.push('\n');
    }

    out.push_str(&format!("Combined entities ({})\n", view.entity_count));
    if view.is_empty() {
        out.push_str("  No entities detected\n");
    }
    for card in &view.combined {
        out.push_str(&format!("  {:<24} {}\n", card.word, card.entity_type));
    }

    out.push('\n');
    let highlighted: String = view
        .highlight
        .iter()
        .map(|styled| match styled.segment.entity() {
            Some(span) => format!("[{}]({})", styled.segment.text, span.entity_type),
            None => styled.segment.text.to_string(),
        })
        .collect();
    out.push_str(&highlighted);
    out.push('\n');
    out
}

fn render_predictions(view: &PredictionView<'_>) -> String {
    let mut out = format!("Predictions for {}\n", MASK_TOKEN);
    if view.is_empty() {
        out.push_str("  No predictions available\n");
    }
    for prediction in &view.ranked {
        out.push_str(&format!("  {}. {}\n", prediction.rank, prediction.token));
    }
    out
}
