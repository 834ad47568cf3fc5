use anyhow::{Result, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{Prediction, Reader};
use crate::registry::ModelSpec;

/// A scripted reader for tests. Returns canned predictions per model label.
#[derive(Default)]
pub struct MockReader {
    answers: HashMap<String, std::result::Result<Prediction, String>>,
    load_failures: HashMap<String, String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful answer for `label`.
    pub fn with_answer(mut self, label: &str, prediction: Prediction) -> Self {
        self.answers.insert(label.to_string(), Ok(prediction));
        self
    }

    /// Script an inference failure for `label`.
    pub fn with_error(mut self, label: &str, message: &str) -> Self {
        self.answers
            .insert(label.to_string(), Err(message.to_string()));
        self
    }

    /// Make `load` fail for `label`.
    pub fn with_load_failure(mut self, label: &str, message: &str) -> Self {
        self.load_failures
            .insert(label.to_string(), message.to_string());
        self
    }

    /// Sleep before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Labels passed to `answer`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Reader for MockReader {
    async fn load(&self, model: &ModelSpec) -> Result<()> {
        if let Some(message) = self.load_failures.get(&model.label) {
            bail!("{message}");
        }
        Ok(())
    }

    async fn answer(
        &self,
        model: &ModelSpec,
        _question: &str,
        _context: &str,
    ) -> Result<Prediction> {
        self.calls.lock().unwrap().push(model.label.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.answers.get(&model.label) {
            Some(Ok(prediction)) => Ok(prediction.clone()),
            Some(Err(message)) => bail!("{message}"),
            None => bail!("MockReader: no answer scripted for {}", model.label),
        }
    }
}
