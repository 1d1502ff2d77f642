use alice_rs_protocol::{LanguageModel, ModelError, ModelRequest};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Model that always replies with the same text.
#[derive(Debug, Clone)]
pub struct FixedModel {
    reply: String,
}

impl FixedModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl LanguageModel for FixedModel {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn generate(&self, _request: &ModelRequest) -> Result<String, ModelError> {
        Ok(self.reply.clone())
    }
}

/// Fixed-reply model that keeps every request it receives.
#[derive(Debug, Clone)]
pub struct RecordingModel {
    reply: String,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
}

impl RecordingModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<ModelRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl LanguageModel for RecordingModel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError> {
        self.requests.lock().push(request.clone());
        Ok(self.reply.clone())
    }
}

/// Model that is never available.
#[derive(Debug, Clone, Default)]
pub struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: &ModelRequest) -> Result<String, ModelError> {
        Err(ModelError::Unavailable("offline".to_string()))
    }
}
