//! Text shaping for template fields: line splitting, word wrap, dates, hours.

use chrono::NaiveDate;

use crate::metrics::text_width;

/// Greedy word wrap against Helvetica-Bold widths at `size`.
///
/// A single word wider than the budget is hard-broken at the glyph that
/// overflows; wrapping never produces an empty line.
pub fn wrap_words(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    let push_word = |lines: &mut Vec<String>, line: &mut String, word: &str| {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&candidate, size) <= max_width {
            *line = candidate;
            return;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(line));
        }
        if text_width(word, size) <= max_width {
            *line = word.to_string();
            return;
        }
        // Oversized word: break at glyph granularity.
        let mut chunk = String::new();
        for c in word.chars() {
            let mut widened = chunk.clone();
            widened.push(c);
            if !chunk.is_empty() && text_width(&widened, size) > max_width {
                lines.push(std::mem::take(&mut chunk));
                chunk.push(c);
            } else {
                chunk = widened;
            }
        }
        *line = chunk;
    };

    for word in text.split_whitespace() {
        push_word(&mut lines, &mut line, word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Shape a free-text narrative into at most `max_lines` rendered lines.
///
/// Explicit newlines split first, then each paragraph is word-wrapped;
/// overflow beyond the line budget is dropped, never carried to an adjacent
/// field or page.
pub fn shape_narrative(text: &str, size: f32, max_width: f32, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        for line in wrap_words(paragraph, size, max_width) {
            if lines.len() == max_lines {
                return lines;
            }
            lines.push(line);
        }
    }
    lines
}

/// Reformat an ISO `YYYY-MM-DD` date (optional time suffix) as `DD/MM/YYYY`.
///
/// Unparseable input degrades to an empty string.
pub fn format_date_br(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    let date_part = value.split(['T', ' ']).next().unwrap_or_default();
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => String::new(),
    }
}

/// Strip interior whitespace from an hour field (`"10: 30"` -> `"10:30"`).
pub fn normalize_hour(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
