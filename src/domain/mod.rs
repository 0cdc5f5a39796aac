mod entity;
mod mode;
mod result;

pub use entity::EntitySpan;
pub use mode::{AnalysisMode, ModeMetadata, MASK_TOKEN};
pub use result::{AnalysisOutcome, AnalysisResult, PredictionResult, SentenceResult};
