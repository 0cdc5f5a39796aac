pub mod annotation;
pub mod config;
pub mod domain;
pub mod error;
pub mod health;
pub mod orchestrator;
pub mod present;
pub mod samples;
pub mod service;
pub mod utils;

pub use annotation::{
    ColorProfile, HighlightRenderer, RenderPlan, ResultView, SentenceAggregator, ViewProfile,
};
pub use config::ClientConfig;
pub use domain::{
    AnalysisMode, AnalysisOutcome, AnalysisResult, EntitySpan, PredictionResult, SentenceResult,
};
pub use error::{AnalysisError, ErrorKind};
pub use orchestrator::{AnalysisOrchestrator, Completion, Phase};
pub use service::{HttpInferenceClient, InferenceClient, MockInferenceClient};
