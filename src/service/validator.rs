use crate::domain::{AnalysisMode, MASK_TOKEN};
use crate::error::AnalysisError;

/// Local checks run before any request is sent.
pub fn validate_input(mode: AnalysisMode, text: &str) -> Result<(), AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    if mode == AnalysisMode::Mlm && !text.contains(MASK_TOKEN) {
        return Err(AnalysisError::MissingMask);
    }
    Ok(())
}
