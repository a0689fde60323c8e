pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Shortens `s` to at most `max_len` characters, ending in `…` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    match max_len {
        0 => return String::new(),
        1 => return "…".to_string(),
        _ => {}
    }
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// Formats a dissociation constant for display, e.g. `3.1e-7 M`.
pub fn molar(kd: f64) -> String {
    format!("{kd:.2e} M")
}
