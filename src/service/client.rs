use anyhow::{anyhow, bail, Context, Result};
use parking_lot::Mutex;
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

use super::response::{HealthReport, ServiceErrorBody, TextRequest};
use crate::config::ClientConfig;
use crate::domain::{AnalysisMode, AnalysisOutcome, AnalysisResult, PredictionResult};

const HEALTH_PATH: &str = "/api/health";

/// The remote inference service. One call per method invocation, no retries.
pub trait InferenceClient: Send + Sync {
    fn analyze_entities(&self, text: &str) -> Result<AnalysisResult>;

    fn predict_masked(&self, text: &str) -> Result<PredictionResult>;

    /// Succeeds on any 2xx answer from the health endpoint.
    fn health(&self) -> Result<HealthReport>;

    fn request(&self, mode: AnalysisMode, text: &str) -> Result<AnalysisOutcome> {
        match mode {
            AnalysisMode::Ner => self.analyze_entities(text).map(AnalysisOutcome::Entities),
            AnalysisMode::Mlm => self.predict_masked(text).map(AnalysisOutcome::Predictions),
        }
    }
}

impl<C: InferenceClient + ?Sized> InferenceClient for Arc<C> {
    fn analyze_entities(&self, text: &str) -> Result<AnalysisResult> {
        (**self).analyze_entities(text)
    }

    fn predict_masked(&self, text: &str) -> Result<PredictionResult> {
        (**self).predict_masked(text)
    }

    fn health(&self) -> Result<HealthReport> {
        (**self).health()
    }
}

pub struct HttpInferenceClient {
    config: ClientConfig,
    http: HttpClient,
}

impl HttpInferenceClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .with_context(|| format!("invalid user agent {:?}", config.user_agent))?;
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client for the inference service")?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn post_text<T: DeserializeOwned>(&self, path: &str, text: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(%url, chars = text.chars().count(), "posting analysis request");

        let response = self
            .http
            .post(&url)
            .json(&TextRequest { text })
            .send()
            .with_context(|| format!("request to {} failed", url))?;

        let response = check_status(response, &url)?;
        response
            .json()
            .with_context(|| format!("unreadable response body from {}", url))
    }
}

impl InferenceClient for HttpInferenceClient {
    fn analyze_entities(&self, text: &str) -> Result<AnalysisResult> {
        self.post_text(AnalysisMode::Ner.endpoint(), text)
    }

    fn predict_masked(&self, text: &str) -> Result<PredictionResult> {
        self.post_text(AnalysisMode::Mlm.endpoint(), text)
    }

    fn health(&self) -> Result<HealthReport> {
        let url = self.config.endpoint(HEALTH_PATH);
        let response = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("health probe to {} failed", url))?;
        let response = check_status(response, &url)?;
        Ok(response.json().unwrap_or_default())
    }
}

fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .json::<ServiceErrorBody>()
        .map(|body| body.error)
        .unwrap_or_default();
    bail!("{} answered {} {}", url, status, detail)
}

/// Scripted reply for [`MockInferenceClient`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Entities(AnalysisResult),
    Predictions(PredictionResult),
    Failure(String),
}

#[derive(Default)]
struct MockState {
    replies: VecDeque<MockReply>,
    calls: Vec<(AnalysisMode, String)>,
    healthy: bool,
    health_probes: usize,
}

/// In-memory stand-in that answers from a queue and records every call.
#[derive(Clone, Default)]
pub struct MockInferenceClient {
    state: Arc<Mutex<MockState>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: MockReply) {
        self.state.lock().replies.push_back(reply);
    }

    pub fn push_entities(&self, result: AnalysisResult) {
        self.push_reply(MockReply::Entities(result));
    }

    pub fn push_predictions(&self, result: PredictionResult) {
        self.push_reply(MockReply::Predictions(result));
    }

    pub fn push_failure(&self, reason: impl Into<String>) {
        self.push_reply(MockReply::Failure(reason.into()));
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state.lock().healthy = healthy;
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    pub fn calls(&self) -> Vec<(AnalysisMode, String)> {
        self.state.lock().calls.clone()
    }

    pub fn health_probe_count(&self) -> usize {
        self.state.lock().health_probes
    }

    fn next_reply(&self, mode: AnalysisMode, text: &str) -> Result<MockReply> {
        let mut state = self.state.lock();
        state.calls.push((mode, text.to_string()));
        state
            .replies
            .pop_front()
            .ok_or_else(|| anyhow!("no mock reply queued for {}", mode))
    }
}

impl InferenceClient for MockInferenceClient {
    fn analyze_entities(&self, text: &str) -> Result<AnalysisResult> {
        match self.next_reply(AnalysisMode::Ner, text)? {
            MockReply::Entities(result) => Ok(result),
            MockReply::Failure(reason) => Err(anyhow!(reason)),
            MockReply::Predictions(_) => bail!("mock queued a prediction for an NER call"),
        }
    }

    fn predict_masked(&self, text: &str) -> Result<PredictionResult> {
        match self.next_reply(AnalysisMode::Mlm, text)? {
            MockReply::Predictions(result) => Ok(result),
            MockReply::Failure(reason) => Err(anyhow!(reason)),
            MockReply::Entities(_) => bail!("mock queued entities for an MLM call"),
        }
    }

    fn health(&self) -> Result<HealthReport> {
        let mut state = self.state.lock();
        state.health_probes += 1;
        if state.healthy {
            Ok(HealthReport {
                status: Some("healthy".to_string()),
                ner_loaded: Some(true),
                mlm_loaded: Some(true),
            })
        } else {
            bail!("mock service offline")
        }
    }
}
