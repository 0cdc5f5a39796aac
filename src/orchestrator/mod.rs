mod analysis;

pub use analysis::{AnalysisOrchestrator, AnalysisRecord, Completion, Phase, RequestTicket};
