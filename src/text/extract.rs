/// Plain narration text extracted from a source document.
///
/// Invariants: no `<`/`>`-delimited markup spans, whitespace runs collapsed
/// to single spaces, no leading/trailing whitespace. An empty value is valid
/// here but is rejected by pipeline input validation before any external
/// process is invoked.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NarrationText(String);

impl NarrationText {
    /// Normalize arbitrary plain text into narration form (whitespace runs
    /// collapsed, ends trimmed). Markup is *not* stripped here; use
    /// [`extract_text`] for HTML input.
    pub fn from_plain(text: &str) -> Self {
        Self(collapse_whitespace(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl std::fmt::Display for NarrationText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip markup from raw HTML into narration text.
///
/// This is a minimal, non-validating tag stripper: everything between a `<`
/// and the next `>` is deleted (a trailing unterminated `<...` is dropped to
/// end of input), then whitespace runs are collapsed and the ends trimmed.
/// Never fails; empty or markup-only input yields an empty narration.
pub fn extract_text(html: &str) -> NarrationText {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Tags act as word separators, matching the original
                // replace-with-space behavior.
                out.push(' ');
            }
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    NarrationText(collapse_whitespace(&out))
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/extract.rs"]
mod tests;
