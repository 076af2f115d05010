use chrono::{DateTime, Utc};

/// Milliseconds between the Unix epoch and the first second of 2015.
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Discord's message content limit.
pub const MESSAGE_LIMIT: usize = 2000;

/// Format an RGB integer as `#RRGGBB`.
pub fn int_to_hex(color: u32) -> String {
    format!("#{:06X}", color & 0x00FF_FFFF)
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// `MANAGE_ROLES` -> `Manage Roles`
pub fn title_case_flag(flag: &str) -> String {
    flag.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Group digits in thousands: 15420 -> "15,420".
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Client-rendered timestamp markup, e.g. `<t:1700000000:F>`.
pub fn discord_timestamp(at: DateTime<Utc>, style: char) -> String {
    format!("<t:{}:{}>", at.timestamp(), style)
}

/// Creation time encoded in the upper bits of a snowflake id.
pub fn snowflake_created_at(id: u64) -> DateTime<Utc> {
    let ms = (id >> 22) + DISCORD_EPOCH_MS;
    DateTime::<Utc>::from_timestamp_millis(ms as i64).unwrap_or_default()
}

/// Parse an id from a raw argument. Accepts bare ids and mentions:
/// - `123456789012345678`
/// - `<@123456789012345678>` / `<@!123…>` (users)
/// - `<@&123456789012345678>` (roles)
pub fn parse_snowflake(arg: &str) -> Option<u64> {
    let cleaned: String = arg
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '@' | '!' | '&'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<u64>().ok()
}

/// Split text into chunks of at most `max_len` characters, breaking on lines.
///
/// Chunks are trimmed and never empty, so blank input yields no chunks.
/// A single line longer than `max_len` is cut at character boundaries.
pub fn split_content(content: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    if content.chars().count() <= max_len {
        push_trimmed(&mut chunks, content);
        return chunks;
    }

    let mut current = String::new();
    let mut current_len = 0;

    for line in content.split('\n') {
        for piece in hard_wrap(line, max_len) {
            let piece_len = piece.chars().count() + 1;
            if current_len + piece_len > max_len && !current.is_empty() {
                push_trimmed(&mut chunks, &current);
                current.clear();
                current_len = 0;
            }
            current.push_str(piece);
            current.push('\n');
            current_len += piece_len;
        }
    }

    if !current.is_empty() {
        push_trimmed(&mut chunks, &current);
    }

    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Cut `line` into pieces that leave room for a trailing newline.
fn hard_wrap(line: &str, max_len: usize) -> Vec<&str> {
    let width = max_len.saturating_sub(1).max(1);
    if line.chars().count() <= width {
        return vec![line];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in line.char_indices() {
        if count == width {
            pieces.push(&line[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    pieces.push(&line[start..]);
    pieces
}
