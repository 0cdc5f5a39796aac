use serde::{Deserialize, Serialize};

/// Body shared by both analysis endpoints.
#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

/// Body of `GET /api/health`. Only the status code decides connectivity;
/// these fields are informational and may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ner_loaded: Option<bool>,
    #[serde(default)]
    pub mlm_loaded: Option<bool>,
}

/// Error body the service sends along with a failing status.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}
