pub mod hf;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::registry::ModelSpec;

/// An extracted answer. `start` and `end` are character offsets into the context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub answer: String,
    pub score: f64,
    pub start: usize,
    pub end: usize,
}

/// Runs extractive question answering for a model. Could be a hosted API,
/// a local runtime, or a test script.
#[async_trait]
pub trait Reader: Send + Sync {
    /// Make sure the model can serve requests. Called once per model at startup.
    async fn load(&self, _model: &ModelSpec) -> Result<()> {
        Ok(())
    }

    async fn answer(&self, model: &ModelSpec, question: &str, context: &str)
    -> Result<Prediction>;
}
