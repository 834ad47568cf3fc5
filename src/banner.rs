//! Startup banner and terminal output for one-shot comparisons.

use crate::compare::{Availability, Comparator, Comparison};
use crate::consts::{AUTHOR, HOMEPAGE, REPO};

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub url: &'a str,
    pub inference_url: &'a str,
    pub auth_status: &'a str,
    pub db: &'a str,
}

/// Print the startup banner with session info and per-model status.
pub fn print_banner(info: &BannerInfo, comparator: &Comparator) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║          Q A - C O M P A R E          ║
   ║   three readers, one question         ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   ui        {}
   inference {}
   auth      {}
   db        {}
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.url,
        info.inference_url,
        info.auth_status,
        info.db,
    );
    print!("{}", model_lines(comparator));
}

fn model_lines(comparator: &Comparator) -> String {
    let mut out = String::new();
    for model in comparator.registry() {
        let status = match comparator.availability(&model.label) {
            Availability::Ready => "✓".to_string(),
            Availability::Unavailable(reason) => format!("✗ {reason}"),
        };
        out.push_str(&format!(
            "   {:<10} {:>5}  {}\n",
            model.label, model.params, status
        ));
    }
    out
}

/// Render a comparison for the terminal: one block per model.
pub fn format_comparison(comparison: &Comparison) -> String {
    let mut out = String::new();
    for answer in &comparison.answers {
        out.push_str(&format!(
            "\n[{}]\n  answer      {}\n  confidence  {}\n",
            answer.label, answer.answer, answer.confidence
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{CompareConfig, ModelAnswer};
    use crate::reader::mock::MockReader;
    use crate::registry::ModelRegistry;

    fn comparator() -> Comparator {
        Comparator::new(
            ModelRegistry::builtin(),
            Box::new(MockReader::new()),
            CompareConfig::default(),
        )
    }

    #[test]
    fn print_banner_does_not_panic() {
        let info = BannerInfo {
            url: "http://127.0.0.1:7860",
            inference_url: "https://example.test",
            auth_status: "anonymous",
            db: "ephemeral",
        };
        print_banner(&info, &comparator());
    }

    #[test]
    fn model_lines_list_every_model() {
        let lines = model_lines(&comparator());
        assert_eq!(lines.lines().count(), 3);
        assert!(lines.contains("DistilBERT"));
        assert!(lines.contains("184M"));
        assert!(lines.contains("✓"));
    }

    #[tokio::test]
    async fn model_lines_show_load_failures() {
        let mut comparator = Comparator::new(
            ModelRegistry::builtin(),
            Box::new(MockReader::new().with_load_failure("RoBERTa", "404 Not Found")),
            CompareConfig::default(),
        );
        comparator.load().await;
        let lines = model_lines(&comparator);
        assert!(lines.contains("✗ 404 Not Found"));
    }

    #[test]
    fn format_comparison_blocks() {
        let comparison = Comparison {
            answers: vec![ModelAnswer {
                label: "RoBERTa".to_string(),
                answer: "1889".to_string(),
                confidence: "97.10%".to_string(),
                highlighted: String::new(),
            }],
        };
        let text = format_comparison(&comparison);
        assert!(text.contains("[RoBERTa]"));
        assert!(text.contains("answer      1889"));
        assert!(text.contains("confidence  97.10%"));
    }
}
