use anyhow::{self, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Literal placeholder the MLM service fills in.
pub const MASK_TOKEN: &str = "[MASK]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Ner,
    Mlm,
}

pub struct ModeMetadata {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub description: &'static str,
}

impl AnalysisMode {
    pub fn metadata(self) -> ModeMetadata {
        match self {
            AnalysisMode::Ner => ModeMetadata {
                name: "ner",
                endpoint: "/api/ner/analyze",
                description: "Extract cybersecurity entities",
            },
            AnalysisMode::Mlm => ModeMetadata {
                name: "mlm",
                endpoint: "/api/mlm/predict",
                description: "Predict masked words (use [MASK])",
            },
        }
    }

    pub fn endpoint(self) -> &'static str {
        self.metadata().endpoint
    }

    pub fn all() -> &'static [AnalysisMode] {
        const ALL: &[AnalysisMode] = &[AnalysisMode::Ner, AnalysisMode::Mlm];
        ALL
    }
}

impl Default for AnalysisMode {
    fn default() -> Self {
        AnalysisMode::Ner
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metadata().name)
    }
}

impl FromStr for AnalysisMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ner" | "entities" => Ok(AnalysisMode::Ner),
            "mlm" | "mask" | "fill-mask" => Ok(AnalysisMode::Mlm),
            _ => anyhow::bail!("unknown analysis mode: {}", s),
        }
    }
}
