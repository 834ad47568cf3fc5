//! Renders the context with the answer span marked up.

/// Escape text for safe insertion into HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Byte index of the `n`th character, or `s.len()` past the end.
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

/// Wrap the answer in a colored span inside the context.
///
/// `start` and `end` are character offsets into `context`. Out-of-range
/// offsets clamp to the context, and `end` never precedes `start`. The span's
/// opacity follows `confidence`, clamped to `0.3..=0.9` so low-confidence
/// answers stay visible.
pub fn highlight_answer(
    context: &str,
    answer: &str,
    start: usize,
    end: usize,
    confidence: f64,
    color: &str,
) -> String {
    let opacity = confidence.clamp(0.3, 0.9);

    let start_byte = byte_offset(context, start);
    let end_byte = byte_offset(context, end.max(start));
    let before = escape_html(&context[..start_byte]);
    let after = escape_html(&context[end_byte..]);

    let highlighted = format!(
        r#"<span style="background-color: {color}; opacity: {opacity}; padding: 2px 4px; border-radius: 3px; font-weight: bold;">{}</span>"#,
        escape_html(answer)
    );

    format!(r#"<div style="line-height: 1.8; font-family: system-ui;">{before}{highlighted}{after}</div>"#)
}
