//! Runs one question against every registered model and collects the
//! display triple (answer, confidence, highlighted context) for each.

use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::consts::DEFAULT_TIMEOUT_SECS;
use crate::highlight::{escape_html, highlight_answer};
use crate::reader::{Prediction, Reader};
use crate::registry::{ModelRegistry, ModelSpec};

pub const EMPTY_INPUT_MESSAGE: &str = "Please provide both context and question.";
const ZERO_CONFIDENCE: &str = "0%";

pub struct CompareConfig {
    /// Upper bound on a single model's inference call.
    pub model_timeout: Duration,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            model_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Whether a model passed its startup load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Availability {
    Ready,
    Unavailable(String),
}

/// One model's output, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelAnswer {
    pub label: String,
    pub answer: String,
    pub confidence: String,
    /// HTML fragment. Empty when no question was asked.
    pub highlighted: String,
}

impl ModelAnswer {
    fn from_prediction(model: &ModelSpec, context: &str, p: &Prediction) -> Self {
        Self {
            label: model.label.clone(),
            answer: p.answer.clone(),
            confidence: format_confidence(p.score),
            highlighted: highlight_answer(context, &p.answer, p.start, p.end, p.score, &model.color),
        }
    }

    fn error(model: &ModelSpec, context: &str, message: &str) -> Self {
        Self {
            label: model.label.clone(),
            answer: format!("Error: {message}"),
            confidence: ZERO_CONFIDENCE.to_string(),
            highlighted: escape_html(context),
        }
    }

    fn empty_input(model: &ModelSpec) -> Self {
        Self {
            label: model.label.clone(),
            answer: EMPTY_INPUT_MESSAGE.to_string(),
            confidence: ZERO_CONFIDENCE.to_string(),
            highlighted: String::new(),
        }
    }
}

/// Answers from every model, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub answers: Vec<ModelAnswer>,
}

impl Comparison {
    pub fn get(&self, label: &str) -> Option<&ModelAnswer> {
        self.answers
            .iter()
            .find(|a| a.label.eq_ignore_ascii_case(label))
    }

    /// Flattened `answer, confidence, highlighted` per model.
    pub fn outputs(&self) -> Vec<&str> {
        self.answers
            .iter()
            .flat_map(|a| [a.answer.as_str(), a.confidence.as_str(), a.highlighted.as_str()])
            .collect()
    }
}

/// Outcome of [`Comparator::load`].
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub ready: usize,
    pub failed: Vec<String>,
}

/// Wires a [`ModelRegistry`] to a [`Reader`].
pub struct Comparator {
    registry: ModelRegistry,
    reader: Box<dyn Reader>,
    availability: HashMap<String, Availability>,
    config: CompareConfig,
}

impl Comparator {
    pub fn new(registry: ModelRegistry, reader: Box<dyn Reader>, config: CompareConfig) -> Self {
        let availability = registry
            .iter()
            .map(|m| (m.label.clone(), Availability::Ready))
            .collect();
        Self {
            registry,
            reader,
            availability,
            config,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn availability(&self, label: &str) -> Availability {
        self.availability
            .get(label)
            .cloned()
            .unwrap_or_else(|| Availability::Unavailable("unknown model".to_string()))
    }

    pub fn ready_count(&self) -> usize {
        self.availability
            .values()
            .filter(|a| **a == Availability::Ready)
            .count()
    }

    /// Load every model in order. A model that fails is marked unavailable;
    /// the others are unaffected.
    pub async fn load(&mut self) -> LoadReport {
        let mut report = LoadReport::default();

        for model in self.registry.iter() {
            tracing::info!(model = %model.label, repo = %model.repo_id, "loading model");
            let status = match self.reader.load(model).await {
                Ok(()) => {
                    tracing::info!(model = %model.label, "model loaded");
                    report.ready += 1;
                    Availability::Ready
                }
                Err(e) => {
                    tracing::warn!(model = %model.label, error = %e, "failed to load model");
                    report.failed.push(model.label.clone());
                    Availability::Unavailable(e.to_string())
                }
            };
            self.availability.insert(model.label.clone(), status);
        }

        tracing::info!(ready = report.ready, total = self.registry.len(), "models loaded");
        report
    }

    pub async fn compare(&self, context: &str, question: &str) -> Comparison {
        self.compare_with(context, question, |_| {}).await
    }

    /// Like [`compare`](Self::compare), calling `on_model` before each model runs.
    pub async fn compare_with<F>(&self, context: &str, question: &str, mut on_model: F) -> Comparison
    where
        F: FnMut(&ModelSpec),
    {
        if context.trim().is_empty() || question.trim().is_empty() {
            return Comparison {
                answers: self.registry.iter().map(ModelAnswer::empty_input).collect(),
            };
        }

        let mut answers = Vec::with_capacity(self.registry.len());

        for model in self.registry.iter() {
            on_model(model);

            if let Availability::Unavailable(reason) = self.availability(&model.label) {
                answers.push(ModelAnswer::error(
                    model,
                    context,
                    &format!("model not loaded: {reason}"),
                ));
                continue;
            }

            let call = self.reader.answer(model, question, context);
            let answer = match tokio::time::timeout(self.config.model_timeout, call).await {
                Ok(Ok(prediction)) => {
                    tracing::debug!(
                        model = %model.label,
                        score = prediction.score,
                        start = prediction.start,
                        end = prediction.end,
                        "answered"
                    );
                    ModelAnswer::from_prediction(model, context, &prediction)
                }
                Ok(Err(e)) => {
                    tracing::warn!(model = %model.label, error = %e, "inference failed");
                    ModelAnswer::error(model, context, &e.to_string())
                }
                Err(_) => {
                    tracing::warn!(model = %model.label, "inference timed out");
                    ModelAnswer::error(model, context, "timed out")
                }
            };
            answers.push(answer);
        }

        Comparison { answers }
    }
}

/// Format a 0..1 score as a percentage with two decimals.
pub fn format_confidence(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}
