mod client;
mod response;
mod validator;

pub use client::{HttpInferenceClient, InferenceClient, MockInferenceClient, MockReply};
pub use response::{HealthReport, ServiceErrorBody, TextRequest};
pub use validator::validate_input;
