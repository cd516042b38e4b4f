//! Text shaping for display labels

/// Placeholder label for entities without any paraphrasis
pub const EMPTY_LABEL: &str = "/";

/// Default maximum line width for wrapped labels
pub const WRAP_WIDTH: usize = 50;

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Short form of an excerpt: texts longer than five words keep the first
/// three and the last two around an ellipsis
pub fn snippet(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= 5 {
        return words.join(" ");
    }
    format!(
        "{} ... {}",
        words[..3].join(" "),
        words[words.len() - 2..].join(" ")
    )
}

/// Greedy word wrap; words longer than `width` get their own line
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Reduce a reference to its bare identifier (`doc.xml#plut.t1` -> `plut.t1`)
pub fn normalize_ref(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.rfind('#') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}
