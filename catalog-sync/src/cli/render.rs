//! Two-column tables for the stat commands.

use serde_json::Value;

use crate::stats::IndexStats;

const INDEX_KEY_WIDTH: usize = 45;
const INDEX_VALUE_WIDTH: usize = 45;
const PRODUCT_KEY_WIDTH: usize = 20;
const PRODUCT_VALUE_WIDTH: usize = 100;

fn separator(key_width: usize, value_width: usize) -> String {
    format!("+{}+{}+", "-".repeat(key_width + 1), "-".repeat(value_width))
}

/// Key left-aligned, value right-aligned.
fn row(key: &str, value: &str, key_width: usize, value_width: usize) -> String {
    let key_pad = key_width.saturating_sub(key.chars().count());
    let value_pad = value_width
        .saturating_sub(1)
        .saturating_sub(value.chars().count());
    format!(
        "| {}{}|{}{} |",
        key,
        " ".repeat(key_pad),
        " ".repeat(value_pad),
        value
    )
}

pub fn render_index_stats(stats: &IndexStats) -> String {
    let rows = [
        ("Search Version", stats.display_version().to_string()),
        ("Index Name", stats.name.clone()),
        ("Index Ping", stats.display_ping().to_string()),
        ("Products in index", stats.doc_count.to_string()),
        ("Index Size", stats.display_size()),
        ("Last Full Reindex", stats.display_last_reindex()),
    ];

    let mut lines = vec![separator(INDEX_KEY_WIDTH, INDEX_VALUE_WIDTH)];
    for (key, value) in rows {
        lines.push(row(key, &value, INDEX_KEY_WIDTH, INDEX_VALUE_WIDTH));
        lines.push(separator(INDEX_KEY_WIDTH, INDEX_VALUE_WIDTH));
    }
    lines.join("\n")
}

/// Render the stored fields of a document, one field per row.
///
/// Long values wrap onto continuation rows that leave the key cell blank.
pub fn render_document(source: &Value) -> String {
    let fields: Vec<(String, String)> = match source {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| (key.clone(), value_text(value)))
            .collect(),
        other => vec![("_source".to_string(), value_text(other))],
    };

    let wrap_width = PRODUCT_VALUE_WIDTH - 2;
    let mut lines = vec![separator(PRODUCT_KEY_WIDTH, PRODUCT_VALUE_WIDTH)];

    for (key, text) in fields {
        for (position, line) in wrap_words(&text, wrap_width).iter().enumerate() {
            let label = if position == 0 { key.as_str() } else { " " };
            lines.push(row(label, line, PRODUCT_KEY_WIDTH, PRODUCT_VALUE_WIDTH));
        }
        lines.push(separator(PRODUCT_KEY_WIDTH, PRODUCT_VALUE_WIDTH));
    }
    lines.join("\n")
}

/// Display text of a field value with whitespace runs collapsed.
fn value_text(value: &Value) -> String {
    let text = match value {
        Value::Array(items) => format!(
            "(array) {}",
            items.iter().map(scalar_text).collect::<Vec<_>>().join(", ")
        ),
        other => scalar_text(other),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Greedy word wrap; words longer than `width` keep a line of their own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
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

    lines.push(current);
    lines
}
