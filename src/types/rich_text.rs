use serde::{Deserialize, Serialize};

/// A contiguous span of plain text within a block or a text property.
///
/// Deserializes from the API's rich-text object, keeping only `plain_text`;
/// annotations, links and mention payloads are not part of the journal model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextRun {
    #[serde(rename = "plain_text", default)]
    pub text: String,
}

impl RichTextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Concatenates runs in order with no separator.
pub fn concat_plain_text(runs: &[RichTextRun]) -> String {
    let capacity = runs.iter().map(|r| r.text.len()).sum();
    runs.iter().fold(String::with_capacity(capacity), |mut acc, run| {
        acc.push_str(&run.text);
        acc
    })
}

/// Splits `text` into runs of at most `max_chars` characters each.
///
/// Splitting is done on character boundaries, never inside a code point.
/// Empty input yields no runs.
pub fn split_into_runs(text: &str, max_chars: usize) -> Vec<RichTextRun> {
    let max_chars = max_chars.max(1);
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for c in text.chars() {
        if count == max_chars {
            runs.push(RichTextRun::new(std::mem::take(&mut current)));
            count = 0;
        }
        current.push(c);
        count += 1;
    }

    if !current.is_empty() {
        runs.push(RichTextRun::new(current));
    }
    runs
}
