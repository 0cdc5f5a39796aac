//! End-to-end flows through the orchestrator with a scripted service.

use std::sync::Arc;

use cybert::annotation::{ColorProfile, EntityListing, ResultView, SegmentKind, FALLBACK_COLOR};
use cybert::present::{render_html, render_text};
use cybert::{
    AnalysisError, AnalysisMode, AnalysisOrchestrator, AnalysisResult, EntitySpan,
    MockInferenceClient, PredictionResult, SentenceResult, ViewProfile,
};

fn setup() -> (MockInferenceClient, AnalysisOrchestrator<MockInferenceClient>) {
    let mock = MockInferenceClient::new();
    let orchestrator = AnalysisOrchestrator::new(Arc::new(mock.clone()));
    (mock, orchestrator)
}

#[test]
fn threat_actor_and_cve_render_plan() {
    let (mock, mut orchestrator) = setup();
    mock.push_entities(AnalysisResult::new(
        vec![
            EntitySpan::new("APT28", "THREAT_ACTOR", 0, 5),
            EntitySpan::new("CVE-2023-12345", "VULNERABILITY", 16, 30),
        ],
        vec![],
    ));

    let record = orchestrator
        .submit(AnalysisMode::Ner, "APT28 exploited CVE-2023-12345.")
        .unwrap();
    let ResultView::Entities(view) = record.view(ViewProfile::Dashboard) else {
        panic!("expected entity view");
    };

    let plan: Vec<(&str, bool)> = view
        .highlight
        .iter()
        .map(|s| (s.segment.text, matches!(s.segment.kind, SegmentKind::Entity { .. })))
        .collect();
    assert_eq!(
        plan,
        vec![
            ("APT28", true),
            (" exploited ", false),
            ("CVE-2023-12345", true),
            (".", false),
        ]
    );
}

#[test]
fn mask_predictions_keep_rank_order() {
    let (mock, mut orchestrator) = setup();
    mock.push_predictions(PredictionResult::new(vec![
        "phishing".to_string(),
        "malware".to_string(),
        "ransomware".to_string(),
    ]));

    let record = orchestrator.submit(AnalysisMode::Mlm, "A [MASK] attack.").unwrap();
    let ResultView::Predictions(view) = record.view(ViewProfile::Dashboard) else {
        panic!("expected prediction view");
    };
    let ranked: Vec<(usize, &str)> = view.ranked.iter().map(|p| (p.rank, p.token)).collect();
    assert_eq!(ranked, vec![(1, "phishing"), (2, "malware"), (3, "ransomware")]);
}

#[test]
fn validation_gate_sends_nothing() {
    let (mock, mut orchestrator) = setup();
    for mode in [AnalysisMode::Ner, AnalysisMode::Mlm] {
        assert_eq!(orchestrator.submit(mode, "").unwrap_err(), AnalysisError::EmptyInput);
    }
    assert_eq!(
        orchestrator
            .submit(AnalysisMode::Mlm, "The attacker used a phishing exploit.")
            .unwrap_err(),
        AnalysisError::MissingMask
    );
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn breakdown_appears_only_for_multiple_sentences() {
    let (mock, mut orchestrator) = setup();
    let one = AnalysisResult::new(
        vec![],
        vec![SentenceResult {
            sentence: "Only one.".to_string(),
            entities: vec![],
        }],
    );
    let three = AnalysisResult::new(
        vec![EntitySpan::new("Conti", "MALWARE", 4, 9)],
        vec![
            SentenceResult {
                sentence: "The Conti gang.".to_string(),
                entities: vec![EntitySpan::new("Conti", "MALWARE", 4, 9)],
            },
            SentenceResult {
                sentence: "It hit hospitals.".to_string(),
                entities: vec![],
            },
            SentenceResult {
                sentence: "Then it stopped.".to_string(),
                entities: vec![],
            },
        ],
    );
    mock.push_entities(one);
    mock.push_entities(three);

    let record = orchestrator.submit(AnalysisMode::Ner, "Only one.").unwrap();
    let ResultView::Entities(view) = record.view(ViewProfile::Dashboard) else {
        panic!("expected entity view");
    };
    assert!(view.breakdown.is_none());

    let record = orchestrator
        .submit(
            AnalysisMode::Ner,
            "The Conti gang. It hit hospitals. Then it stopped.",
        )
        .unwrap();
    let ResultView::Entities(view) = record.view(ViewProfile::Inline) else {
        panic!("expected entity view");
    };
    let breakdown = view.breakdown.unwrap();
    let labels: Vec<&str> = breakdown.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Sentence 1", "Sentence 2", "Sentence 3"]);
    assert_eq!(breakdown[2].entities, EntityListing::NoEntities);
}

#[test]
fn unknown_labels_degrade_to_gray_everywhere() {
    let (mock, mut orchestrator) = setup();
    mock.push_entities(AnalysisResult::new(
        vec![EntitySpan::new("Cobalt", "C2_FRAMEWORK", 0, 6)],
        vec![],
    ));
    let record = orchestrator.submit(AnalysisMode::Ner, "Cobalt beacons.").unwrap();
    let view = record.view(ViewProfile::Dashboard);

    let html = render_html(&view);
    assert!(html.contains(&FALLBACK_COLOR.wash().to_string()));
    assert!(render_text(&view).contains("[Cobalt](C2_FRAMEWORK)"));
    assert_eq!(ColorProfile::Cyber.color_for("C2_FRAMEWORK"), FALLBACK_COLOR);
}

#[test]
fn failure_then_success_clears_the_error_slot() {
    let (mock, mut orchestrator) = setup();
    mock.push_failure("connection reset");
    mock.push_entities(AnalysisResult::default());

    let err = orchestrator.submit(AnalysisMode::Ner, "APT28").unwrap_err();
    assert_eq!(err.to_string(), "Analysis failed");
    assert!(orchestrator.error().is_some());

    orchestrator.submit(AnalysisMode::Ner, "APT28").unwrap();
    assert!(orchestrator.error().is_none());
    assert_eq!(mock.call_count(), 2);
}
