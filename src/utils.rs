use chrono::NaiveDate;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static DRAW_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\s*(?:st|nd|rd|th)?\s*([A-Za-z]+)\s*(\d{4})").expect("valid date regex")
});

/// Text nodes of an element joined by single spaces, so neighbouring cells
/// like `<td>6543</td><td>3rd</td>` never fuse into one digit run.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text of an element read as a ball value. Only plain ASCII digit
/// runs count; anything else (or a value that overflows) is `None`.
pub fn ball_value(element: &ElementRef<'_>) -> Option<u32> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Finds the first `<day><suffix?> <month name> <year>` phrase, e.g.
/// "3rd January 2024", and reads it as a date. Month names may be full or
/// abbreviated, in any case.
pub fn parse_draw_date(text: &str) -> Option<NaiveDate> {
    let caps = DRAW_DATE.captures(text)?;
    let formatted = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&formatted, "%d %B %Y").ok()
}

pub fn format_numbers(numbers: &[u8]) -> String {
    let joined = numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}
