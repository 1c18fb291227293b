/// Longest text the Translate TTS endpoint accepts in one request, in characters.
pub const MAX_CHARS: usize = 100;

/// Split `text` into request-sized pieces.
///
/// Text is first cut after sentence and clause punctuation (Latin and Arabic),
/// then any piece longer than `max_chars` is cut at the last whitespace that
/// fits. Pieces without a single letter or digit are dropped.
pub fn split_for_request(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    split_at_punctuation(&join_hyphenated_lines(text))
        .iter()
        .flat_map(|part| minimize(part, max_chars))
        .filter(|part| is_speakable(part))
        .collect()
}

/// `"infor-\nmation"` becomes `"information"`.
fn join_hyphenated_lines(text: &str) -> String {
    text.replace("-\r\n", "").replace("-\n", "")
}

fn split_at_punctuation(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for (idx, ch) in text.char_indices() {
        if ch == '\n' || ch == '\r' {
            flush(&mut parts, &mut current);
            continue;
        }

        if ch.is_whitespace() {
            if !current.is_empty() && !current.ends_with(' ') {
                current.push(' ');
            }
            continue;
        }

        current.push(ch);
        if is_split_point(text, idx, ch) {
            flush(&mut parts, &mut current);
        }
    }

    flush(&mut parts, &mut current);
    parts
}

fn flush(parts: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
    current.clear();
}

fn is_split_point(text: &str, idx: usize, ch: char) -> bool {
    let next = text[idx + ch.len_utf8()..].chars().next();
    match ch {
        '?' | '!' | '…' | ';' | '\u{061F}' | '\u{061B}' | '\u{060C}' | '\u{06D4}' => true,
        // "3.5", "1,000", "10:30" and "example.com" stay in one piece.
        '.' | ',' | ':' => next.map_or(true, char::is_whitespace),
        _ => false,
    }
}

fn minimize(part: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = part.trim();

    while rest.chars().count() > max_chars {
        let limit = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(i, _)| i);
        let cut = rest[..=limit_boundary(rest, limit)]
            .rfind(char::is_whitespace)
            .filter(|&i| i > 0)
            .unwrap_or(limit);
        out.push(rest[..cut].trim_end().to_string());
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() {
        out.push(rest.to_string());
    }
    out
}

/// Byte index of the last byte of the char starting at `limit`, so a
/// whitespace exactly at the limit is still a valid cut.
fn limit_boundary(s: &str, limit: usize) -> usize {
    s[limit..]
        .chars()
        .next()
        .map_or(s.len() - 1, |c| limit + c.len_utf8() - 1)
}

fn is_speakable(part: &str) -> bool {
    part.chars().any(char::is_alphanumeric)
}
