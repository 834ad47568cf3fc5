//! Server-rendered HTML for the comparison page.

use crate::compare::{Availability, Comparator, Comparison, ModelAnswer};
use crate::gallery;
use crate::highlight::escape_html;
use crate::registry::{ModelRegistry, ModelSpec};

pub const TITLE: &str = "SQuAD QA - Model Comparison";

/// What the page shows: the current inputs and, after a submit, the answers.
pub struct PageView<'a> {
    pub context: &'a str,
    pub question: &'a str,
    pub comparison: Option<&'a Comparison>,
}

pub fn render_page(comparator: &Comparator, view: &PageView) -> String {
    let registry = comparator.registry();
    let columns: String = registry
        .iter()
        .map(|model| {
            let answer = view.comparison.and_then(|c| c.get(&model.label));
            render_column(model, &comparator.availability(&model.label), answer)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
      body {{ font-family: system-ui, sans-serif; margin: 1.5rem auto; max-width: 72rem; padding: 0 1rem; color: #222; }}
      h1 {{ margin-bottom: 0.2rem; }}
      h2 {{ margin-top: 0; color: #555; font-weight: normal; }}
      table {{ border-collapse: collapse; margin-bottom: 1.5rem; }}
      th, td {{ text-align: left; padding: 0.4rem 0.8rem; border-bottom: 1px solid #eee; }}
      label {{ display: block; font-weight: bold; margin: 0.8rem 0 0.3rem; }}
      textarea {{ width: 100%; box-sizing: border-box; font: inherit; padding: 0.5rem; border: 1px solid #ccc; border-radius: 6px; }}
      button {{ margin-top: 0.8rem; padding: 0.7rem 1.4rem; font-size: 1.05rem; border: 0; border-radius: 6px; background: #f97316; color: #fff; cursor: pointer; }}
      .columns {{ display: flex; gap: 1rem; margin-top: 1.5rem; }}
      .column {{ flex: 1; min-width: 0; }}
      .field {{ border: 1px solid #ddd; border-radius: 6px; padding: 0.5rem; min-height: 1.4rem; white-space: pre-wrap; }}
      .unavailable {{ color: #b91c1c; font-size: 0.85rem; }}
      .examples a {{ display: block; margin: 0.3rem 0; }}
      footer {{ margin-top: 2rem; border-top: 1px solid #ddd; padding-top: 1rem; color: #444; }}
    </style>
  </head>
  <body>
    <h1>🤖 Question Answering: Model Comparison</h1>
    <h2>Compare {names} on SQuAD</h2>
    <p>Ask the same question to all three models and compare their answers, confidence scores, and highlighted predictions.</p>

    <h3>📊 Model Performance on SQuAD v1.1</h3>
{table}

    <form method="post" action="/">
      <label for="context">📝 Context</label>
      <textarea id="context" name="context" rows="8" placeholder="Enter the text containing the answer...">
{context}</textarea>
      <label for="question">❓ Question</label>
      <textarea id="question" name="question" rows="2" placeholder="Ask a question about the context...">
{question}</textarea>
      <button type="submit">🚀 Get Answers from All Models</button>
    </form>

    <div class="columns">
{columns}
    </div>

    <h3>📝 Try these examples:</h3>
{examples}

{footer}
  </body>
</html>
"#,
        title = TITLE,
        names = model_names(registry),
        table = render_table(registry),
        context = escape_html(view.context),
        question = escape_html(view.question),
        columns = columns,
        examples = render_examples(),
        footer = FOOTER,
    )
}

/// "A, B, and C".
fn model_names(registry: &ModelRegistry) -> String {
    let labels = registry.labels();
    match labels.as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        [a, b] => format!("{a} and {b}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

fn render_table(registry: &ModelRegistry) -> String {
    let rows: String = registry
        .iter()
        .map(|m| {
            format!(
                "      <tr><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&m.label),
                escape_html(&m.params),
                escape_html(&m.f1),
                escape_html(&m.exact_match)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "    <table>\n      <tr><th>Model</th><th>Parameters</th><th>F1 Score</th><th>Exact Match</th></tr>\n{rows}\n    </table>"
    )
}

fn render_column(model: &ModelSpec, availability: &Availability, answer: Option<&ModelAnswer>) -> String {
    let note = match availability {
        Availability::Ready => String::new(),
        Availability::Unavailable(reason) => format!(
            "\n        <div class=\"unavailable\">not loaded: {}</div>",
            escape_html(reason)
        ),
    };

    let (text, confidence, highlighted) = match answer {
        Some(a) => (escape_html(&a.answer), escape_html(&a.confidence), a.highlighted.as_str()),
        None => (String::new(), String::new(), ""),
    };

    format!(
        r#"      <div class="column">
        <h3>{emoji} {label} ({params})</h3>{note}
        <label>Answer</label>
        <div class="field answer">{text}</div>
        <label>Confidence</label>
        <div class="field confidence">{confidence}</div>
        <label>Highlighted Context</label>
        <div class="highlight">{highlighted}</div>
      </div>"#,
        emoji = model.emoji,
        label = escape_html(&model.label),
        params = escape_html(&model.params),
    )
}

fn render_examples() -> String {
    let links: String = gallery::examples()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "      <a href=\"/?example={i}\">{}</a>",
                escape_html(e.question)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("    <div class=\"examples\">\n{links}\n    </div>")
}

const FOOTER: &str = r#"    <footer>
      <p><strong>About:</strong> All models fine-tuned on SQuAD v1.1 (87,599 training examples) for 3 epochs with batch size 64.</p>
      <p><strong>Confidence colors</strong> show where each model found the answer (color intensity = confidence level).</p>
      <p><strong>Training Details:</strong></p>
      <ul>
        <li>Learning Rate: 3e-5</li>
        <li>Warmup Ratio: 0.1</li>
        <li>Max Length: 384 tokens</li>
        <li>Document Stride: 128 tokens</li>
      </ul>
    </footer>"#;
