//! CLI output formatting utilities.
//!
//! JSON syntax highlighting and small cell formatters for tables.

use colored::Colorize;

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
/// - Punctuation: White
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json));
}

/// Colors a pretty-printed JSON document.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut chars = json.chars().peekable();
    let mut containers: Vec<char> = Vec::new();
    let mut expecting_value = false;

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                let mut literal = String::from('"');
                let mut escaped = false;
                for next in chars.by_ref() {
                    literal.push(next);
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == '"' {
                        break;
                    }
                }
                let colored = if expecting_value { literal.green() } else { literal.cyan() };
                out.push_str(&colored.to_string());
                expecting_value = false;
            }
            ':' => {
                out.push_str(&":".white().to_string());
                expecting_value = true;
            }
            ',' => {
                out.push_str(&",".white().to_string());
                expecting_value = containers.last() == Some(&'[');
            }
            '{' | '[' => {
                out.push_str(&ch.to_string().white().bold().to_string());
                containers.push(ch);
                // Array elements are values, object members start with a key.
                expecting_value = ch == '[';
            }
            '}' | ']' => {
                out.push_str(&ch.to_string().white().bold().to_string());
                containers.pop();
                expecting_value = false;
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                let mut scalar = String::from(ch);
                while let Some(&next) = chars.peek() {
                    if next == ',' || next.is_whitespace() || matches!(next, '}' | ']') {
                        break;
                    }
                    scalar.push(next);
                    chars.next();
                }
                let colored = match scalar.as_str() {
                    "true" | "false" | "null" => scalar.magenta(),
                    _ => scalar.yellow(),
                };
                out.push_str(&colored.to_string());
            }
        }
    }

    out
}

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
///
/// Counts characters rather than bytes.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".to_string();
    }

    let mut truncated: String = s.chars().take(max_chars - 1).collect();
    truncated.push('…');
    truncated
}

/// Formats a boolean as a colored check mark.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
