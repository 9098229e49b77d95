const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Formats a byte count for display using base-1024 units.
///
/// Picks the largest unit in which the value is at least 1 (capped at TB) and
/// rounds to the nearest whole number.
///
/// # Example
///
/// ```
/// use filestore_bot::core::utils::format_file_size;
///
/// assert_eq!(format_file_size(Some(2048)), "2 KB");
/// assert_eq!(format_file_size(None), "Unknown size");
/// ```
pub fn format_file_size(bytes: Option<u64>) -> String {
    let bytes = match bytes {
        Some(0) => return "0 Byte".to_string(),
        Some(b) => b,
        None => return "Unknown size".to_string(),
    };

    let mut unit = 0;
    while unit < SIZE_UNITS.len() - 1 && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let value = (bytes as f64 / 1024f64.powi(unit as i32)).round();
    format!("{} {}", value, SIZE_UNITS[unit])
}

/// Escapes special characters for Telegram's MarkdownV2 format.
///
/// The backslash is escaped first so already inserted escapes are not doubled.
///
/// # Example
///
/// ```
/// use filestore_bot::core::utils::escape_markdown_v2;
///
/// assert_eq!(escape_markdown_v2("report.pdf"), "report\\.pdf");
/// ```
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|' | '{' | '}' | '.'
            | '!' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}
