//! The fixed set of models being compared.

use serde::Serialize;

/// One question-answering model and the metadata shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSpec {
    /// Display label, e.g. `"RoBERTa"`.
    pub label: String,
    /// Hub repository id, e.g. `"owner/model-name"`.
    pub repo_id: String,
    pub params: String,
    pub f1: String,
    pub exact_match: String,
    /// CSS color used for the highlight span.
    pub color: String,
    /// Column marker in the UI heading.
    pub emoji: String,
}

impl ModelSpec {
    pub fn new(
        label: &str,
        repo_id: &str,
        params: &str,
        f1: &str,
        exact_match: &str,
        color: &str,
        emoji: &str,
    ) -> Self {
        Self {
            label: label.to_string(),
            repo_id: repo_id.to_string(),
            params: params.to_string(),
            f1: f1.to_string(),
            exact_match: exact_match.to_string(),
            color: color.to_string(),
            emoji: emoji.to_string(),
        }
    }
}

/// Ordered list of models. Order is display order and invocation order.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Vec<ModelSpec>,
}

impl ModelRegistry {
    pub fn new(models: Vec<ModelSpec>) -> Self {
        Self { models }
    }

    /// The three SQuAD v1.1 fine-tunes: DistilBERT, RoBERTa, DeBERTa.
    pub fn builtin() -> Self {
        Self::new(vec![
            ModelSpec::new(
                "DistilBERT",
                "khaledbouabdallah/distilbert-squad-finetuned",
                "66M",
                "84.41%",
                "75.81%",
                "#FF6B6B",
                "🔴",
            ),
            ModelSpec::new(
                "RoBERTa",
                "khaledbouabdallah/roberta-squad-finetuned",
                "125M",
                "91.96%",
                "85.65%",
                "#4ECDC4",
                "🔵",
            ),
            ModelSpec::new(
                "DeBERTa",
                "khaledbouabdallah/deberta-squad-finetuned",
                "184M",
                "93.01%",
                "86.58%",
                "#95E1D3",
                "🟢",
            ),
        ])
    }

    /// Case-insensitive lookup by label.
    pub fn get(&self, label: &str) -> Option<&ModelSpec> {
        self.models
            .iter()
            .find(|m| m.label.eq_ignore_ascii_case(label))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelSpec> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.label.as_str()).collect()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a ModelRegistry {
    type Item = &'a ModelSpec;
    type IntoIter = std::slice::Iter<'a, ModelSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
